/// Starter Code Resolution
///
/// Problems store languages by their authoring names ("c++", "java",
/// "python") while the workspace speaks UI keys (`Language`). This table is
/// the only place the two vocabularies meet. It must list every
/// `Language` variant.

use codearena_common::types::{Language, Problem};
use tracing::{debug, warn};

const STORED_NAMES: &[(Language, &[&str])] = &[
    (Language::Python, &["python"]),
    (Language::Java, &["java"]),
    (Language::Cpp, &["c++"]),
];

/// Stored names a language key matches
pub fn stored_names(language: Language) -> &'static [&'static str] {
    STORED_NAMES
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// Case-insensitive match of a stored language name against a key
pub fn matches(stored: &str, language: Language) -> bool {
    let stored = stored.trim().to_lowercase();
    stored_names(language).iter().any(|name| *name == stored)
}

/// Starter code the workspace is seeded with for `language`
///
/// Falls back to an empty string when the problem has no matching entry.
pub fn starter_code_for(problem: &Problem, language: Language) -> String {
    match problem
        .starter_code
        .iter()
        .find(|sc| matches(&sc.language, language))
    {
        Some(sc) => {
            debug!(problem_id = %problem.id, %language, "seeded starter code");
            sc.initial_code.clone()
        }
        None => {
            warn!(
                problem_id = %problem.id,
                %language,
                "no starter code for language, seeding empty editor"
            );
            String::new()
        }
    }
}

/// Reference solution for `language`, if the problem exposes one
pub fn solution_for(problem: &Problem, language: Language) -> Option<&str> {
    problem
        .solutions
        .iter()
        .find(|s| matches(&s.language, language))
        .map(|s| s.complete_code.as_str())
}
