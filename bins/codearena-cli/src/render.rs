// Terminal presentation of problems and workspace results

use crate::starter;
use crate::workspace::{ResultView, Workspace};
use codearena_common::types::{Language, Problem, ProblemSummary, RunResult, SubmitResult};
use std::collections::HashSet;
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════════════════";

pub fn problem_table(problems: &[&ProblemSummary], solved: &HashSet<String>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<3} {:<26} {:<40} {:<8} {:<12}",
        "", "Id", "Title", "Level", "Tag"
    );
    let _ = writeln!(out, "{}", "─".repeat(92));

    for p in problems {
        let mark = if solved.contains(&p.id) { "✓" } else { "" };
        let _ = writeln!(
            out,
            "{:<3} {:<26} {:<40} {:<8} {:<12}",
            mark, p.id, p.title, p.difficulty, p.tags
        );
    }
    out
}

pub fn problem_details(problem: &Problem, show_solutions: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}  [{}] [{}]", problem.title, problem.difficulty, problem.tags);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{}", problem.description.trim_end());

    for (idx, example) in problem.visible_test_cases.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Example {}:", idx + 1);
        let _ = writeln!(out, "  Input:       {}", example.input);
        let _ = writeln!(out, "  Output:      {}", example.output);
        let _ = writeln!(out, "  Explanation: {}", example.explanation);
    }

    if show_solutions {
        let _ = writeln!(out);
        if problem.solutions.is_empty() {
            let _ = writeln!(out, "Solutions will be available after you solve the problem.");
        }
        for language in Language::all_variants() {
            if let Some(code) = starter::solution_for(problem, *language) {
                let _ = writeln!(out, "── {} - {} ──", problem.title, language.label());
                let _ = writeln!(out, "{}", code.trim_end());
            }
        }
    }
    out
}

/// Testcase tab
pub fn run_panel(result: Option<&RunResult>) -> String {
    let Some(result) = result else {
        return "Run your code to test it against the example test cases.\n".to_string();
    };

    let mut out = String::new();
    if result.success {
        let _ = writeln!(out, "✅ All test cases passed!");
        if let Some(runtime) = result.runtime_seconds {
            let _ = writeln!(out, "  Runtime: {} sec", runtime);
        }
        if let Some(memory) = result.memory_kb {
            let _ = writeln!(out, "  Memory: {} KB", memory);
        }
    } else {
        let message = result.error_message.as_deref().unwrap_or("Some test cases failed");
        let _ = writeln!(out, "❌ {}", message);
    }

    // absent on transport failure
    if let Some(cases) = &result.test_cases {
        for (idx, tc) in cases.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Case {}: {}", idx + 1, if tc.passed() { "✓ Passed" } else { "✗ Failed" });
            let _ = writeln!(out, "  Input:    {}", tc.stdin.trim_end());
            let _ = writeln!(out, "  Expected: {}", tc.expected_output.trim_end());
            let _ = writeln!(out, "  Output:   {}", tc.stdout.trim_end());
        }
    }
    out
}

/// Result tab
///
/// A failed submit transport leaves no result, so this renders the same
/// as a workspace that never submitted.
pub fn submit_panel(result: Option<&SubmitResult>) -> String {
    let Some(result) = result else {
        return "Submit your solution for evaluation.\n".to_string();
    };

    let mut out = String::new();
    if result.accepted {
        let _ = writeln!(out, "🎉 Accepted");
    } else {
        let _ = writeln!(
            out,
            "❌ {}",
            result.error_message.as_deref().unwrap_or("Not accepted")
        );
    }
    let _ = writeln!(
        out,
        "  Test Cases Passed: {}/{}",
        result.test_cases_passed, result.test_cases_total
    );
    if result.accepted {
        if let Some(runtime) = result.runtime_seconds {
            let _ = writeln!(out, "  Runtime: {} sec", runtime);
        }
        if let Some(memory) = result.memory_kb {
            let _ = writeln!(out, "  Memory: {} KB", memory);
        }
    }
    out
}

/// Whatever tab the workspace has active
pub fn active_panel(ws: &Workspace) -> String {
    match ws.active_view() {
        ResultView::Code => format!(
            "── {} ──\n{}\n",
            ws.selected_language().label(),
            ws.source_code()
        ),
        ResultView::Testcase => run_panel(ws.last_run_result()),
        ResultView::Result => submit_panel(ws.last_submit_result()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codearena_common::types::{Difficulty, Tag, TestCaseOutcome};

    #[test]
    fn test_run_panel_handles_missing_test_cases() {
        let panel = run_panel(Some(&RunResult::internal_error()));
        assert_eq!(panel, "❌ Internal server error\n");
    }

    #[test]
    fn test_run_panel_lists_cases() {
        let result = RunResult {
            success: false,
            runtime_seconds: None,
            memory_kb: None,
            test_cases: Some(vec![TestCaseOutcome {
                stdin: "1 2".to_string(),
                expected_output: "3".to_string(),
                stdout: "4".to_string(),
                status_id: 4,
            }]),
            error_message: None,
        };

        let panel = run_panel(Some(&result));
        assert!(panel.contains("Case 1: ✗ Failed"));
        assert!(panel.contains("Expected: 3"));
        assert!(panel.contains("Output:   4"));
    }

    #[test]
    fn test_empty_submit_panel_matches_never_submitted() {
        assert_eq!(submit_panel(None), "Submit your solution for evaluation.\n");
    }

    #[test]
    fn test_submit_panel_accepted() {
        let panel = submit_panel(Some(&SubmitResult {
            accepted: true,
            test_cases_passed: 12,
            test_cases_total: 12,
            runtime_seconds: Some(0.25),
            memory_kb: Some(4096.0),
            error_message: None,
        }));

        assert!(panel.starts_with("🎉 Accepted"));
        assert!(panel.contains("12/12"));
        assert!(panel.contains("Runtime: 0.25 sec"));
    }

    #[test]
    fn test_problem_table_marks_solved() {
        let problems = vec![
            ProblemSummary {
                id: "1".to_string(),
                title: "Two Sum".to_string(),
                difficulty: Difficulty::Easy,
                tags: Tag::Array,
            },
            ProblemSummary {
                id: "2".to_string(),
                title: "Islands".to_string(),
                difficulty: Difficulty::Hard,
                tags: Tag::Graph,
            },
        ];
        let refs: Vec<&ProblemSummary> = problems.iter().collect();
        let solved: HashSet<String> = ["1".to_string()].into_iter().collect();

        let table = problem_table(&refs, &solved);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with('✓'));
        assert!(!lines[3].starts_with('✓'));
    }
}
