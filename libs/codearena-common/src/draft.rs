/// Problem Draft Validation
///
/// Mirrors the rules the admin problem form enforces before a draft is
/// posted to /problem/create or /problem/update/{id}. Every violation is collected so an author
/// sees the whole list at once.

use crate::types::ProblemDraft;
use thiserror::Error;

/// Stored language names every draft must cover exactly once
pub const STORED_LANGUAGES: &[&str] = &["c++", "java", "python"];

#[derive(Debug, Error, PartialEq)]
#[error("invalid problem draft: {}", .violations.join("; "))]
pub struct DraftError {
    pub violations: Vec<String>,
}

pub fn validate(draft: &ProblemDraft) -> Result<(), DraftError> {
    let mut violations = Vec::new();

    if draft.title.trim().is_empty() {
        violations.push("title is required".to_string());
    }
    if draft.description.trim().is_empty() {
        violations.push("description is required".to_string());
    }

    if draft.visible_test_cases.is_empty() {
        violations.push("at least one visible test case required".to_string());
    }
    for (idx, tc) in draft.visible_test_cases.iter().enumerate() {
        if tc.input.is_empty() || tc.output.is_empty() || tc.explanation.is_empty() {
            violations.push(format!(
                "visible test case {} needs input, output and explanation",
                idx + 1
            ));
        }
    }

    if draft.hidden_test_cases.is_empty() {
        violations.push("at least one hidden test case required".to_string());
    }
    for (idx, tc) in draft.hidden_test_cases.iter().enumerate() {
        if tc.input.is_empty() || tc.output.is_empty() {
            violations.push(format!("hidden test case {} needs input and output", idx + 1));
        }
    }

    check_languages(
        "starter code",
        draft
            .starter_code
            .iter()
            .map(|sc| (sc.language.as_str(), sc.initial_code.as_str())),
        &mut violations,
    );
    check_languages(
        "solution",
        draft
            .solutions
            .iter()
            .map(|s| (s.language.as_str(), s.complete_code.as_str())),
        &mut violations,
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DraftError { violations })
    }
}

fn check_languages<'a>(
    what: &str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
    violations: &mut Vec<String>,
) {
    let mut seen: Vec<&str> = Vec::new();

    for (language, code) in entries {
        if !STORED_LANGUAGES.contains(&language) {
            violations.push(format!("{what}: unsupported language {language:?}"));
            continue;
        }
        if seen.contains(&language) {
            violations.push(format!("{what}: duplicate entry for {language}"));
            continue;
        }
        if code.trim().is_empty() {
            violations.push(format!("{what}: code for {language} is empty"));
        }
        seen.push(language);
    }

    for required in STORED_LANGUAGES {
        if !seen.contains(required) {
            violations.push(format!("{what}: missing entry for {required}"));
        }
    }
}
