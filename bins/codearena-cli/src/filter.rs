// Problem list filtering - pure, order preserving

use codearena_common::types::{Difficulty, ProblemSummary, Tag};
use std::collections::HashSet;
use std::str::FromStr;

/// "all" or one specific value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Solved,
    Unsolved,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "solved" => Ok(StatusFilter::Solved),
            "unsolved" => Ok(StatusFilter::Unsolved),
            other => Err(format!(
                "unknown status '{}' (expected all, solved, unsolved)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProblemFilters {
    pub difficulty: Choice<Difficulty>,
    pub tag: Choice<Tag>,
    pub status: StatusFilter,
}

/// clap value parser for `--difficulty`
pub fn parse_difficulty(s: &str) -> Result<Choice<Difficulty>, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(Choice::All);
    }
    Difficulty::from_str(s)
        .map(Choice::Only)
        .ok_or_else(|| format!("unknown difficulty '{}' (expected all, easy, medium, hard)", s))
}

/// clap value parser for `--tag`
pub fn parse_tag(s: &str) -> Result<Choice<Tag>, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(Choice::All);
    }
    Tag::from_str(s).map(Choice::Only).ok_or_else(|| {
        format!(
            "unknown tag '{}' (expected all, array, linked-list, graph, dp, string)",
            s
        )
    })
}

/// Subsequence of `problems` admitted by every filter, in input order
pub fn filter_problems<'a>(
    problems: &'a [ProblemSummary],
    solved: &HashSet<String>,
    filters: &ProblemFilters,
) -> Vec<&'a ProblemSummary> {
    problems
        .iter()
        .filter(|p| filters.difficulty.admits(&p.difficulty))
        .filter(|p| filters.tag.admits(&p.tags))
        .filter(|p| match filters.status {
            StatusFilter::All => true,
            StatusFilter::Solved => solved.contains(&p.id),
            StatusFilter::Unsolved => !solved.contains(&p.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, difficulty: Difficulty, tags: Tag) -> ProblemSummary {
        ProblemSummary {
            id: id.to_string(),
            title: format!("Problem {}", id),
            difficulty,
            tags,
        }
    }

    fn sample() -> Vec<ProblemSummary> {
        vec![
            summary("1", Difficulty::Easy, Tag::Array),
            summary("2", Difficulty::Hard, Tag::Graph),
        ]
    }

    fn solved(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn ids(problems: &[&ProblemSummary]) -> Vec<String> {
        problems.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_solved_status() {
        let problems = sample();
        let filters = ProblemFilters {
            status: StatusFilter::Solved,
            ..Default::default()
        };

        let result = filter_problems(&problems, &solved(&["1"]), &filters);
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn test_unsolved_status() {
        let problems = sample();
        let filters = ProblemFilters {
            status: StatusFilter::Unsolved,
            ..Default::default()
        };

        let result = filter_problems(&problems, &solved(&["1"]), &filters);
        assert_eq!(ids(&result), vec!["2"]);
    }

    #[test]
    fn test_all_filters_keep_input_order() {
        let problems = vec![
            summary("c", Difficulty::Medium, Tag::Dp),
            summary("a", Difficulty::Easy, Tag::String),
            summary("b", Difficulty::Hard, Tag::LinkedList),
        ];

        let result = filter_problems(&problems, &solved(&[]), &ProblemFilters::default());
        assert_eq!(ids(&result), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_filters_combine() {
        let problems = vec![
            summary("1", Difficulty::Easy, Tag::Array),
            summary("2", Difficulty::Easy, Tag::Graph),
            summary("3", Difficulty::Easy, Tag::Array),
            summary("4", Difficulty::Hard, Tag::Array),
        ];
        let filters = ProblemFilters {
            difficulty: Choice::Only(Difficulty::Easy),
            tag: Choice::Only(Tag::Array),
            status: StatusFilter::Unsolved,
        };

        let result = filter_problems(&problems, &solved(&["1"]), &filters);
        assert_eq!(ids(&result), vec!["3"]);
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_difficulty("ALL"), Ok(Choice::All));
        assert_eq!(parse_difficulty("hard"), Ok(Choice::Only(Difficulty::Hard)));
        assert!(parse_difficulty("brutal").is_err());

        assert_eq!(parse_tag("linked-list"), Ok(Choice::Only(Tag::LinkedList)));
        assert!(parse_tag("trees").is_err());

        assert_eq!("Unsolved".parse::<StatusFilter>(), Ok(StatusFilter::Unsolved));
        assert!("maybe".parse::<StatusFilter>().is_err());
    }
}
