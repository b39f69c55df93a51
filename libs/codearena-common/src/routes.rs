/// Backend path semantics - defines only the REST contract, not transport logic
/// Keeps the client and its tests from drifting on endpoint shapes
///
/// Per-resource endpoints are a prefix plus one identifier segment. The
/// client appends the identifier as a single escaped path segment, so an id
/// can never walk into a neighbouring endpoint.

pub const PROBLEMS_ALL: &str = "/question/all";
pub const PROBLEMS_SOLVED: &str = "/question/getAllProblemsSolved";
pub const PROBLEM_CREATE: &str = "/problem/create";

pub const PROBLEM_PREFIX: &str = "/question";
pub const ADMIN_PROBLEM_PREFIX: &str = "/question/admin";
pub const RUN_PREFIX: &str = "/submission/run";
pub const SUBMIT_PREFIX: &str = "/submission/submit";
pub const PROBLEM_UPDATE_PREFIX: &str = "/problem/update";
pub const VIDEO_DELETE_PREFIX: &str = "/video/delete";

/// Whether `id` can stand as a single path segment
///
/// Segment escaping covers `/`, `?`, `#` and `%`. Dot segments survive
/// escaping and would be collapsed by URL normalization, so they are refused.
pub fn is_valid_id(id: &str) -> bool {
    !matches!(id, "" | "." | "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(is_valid_id("665f1c"));
        assert!(is_valid_id("a/b"));
        assert!(is_valid_id("..."));
    }

    #[test]
    fn test_dot_segments_rejected() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("."));
        assert!(!is_valid_id(".."));
    }

    #[test]
    fn test_fixed_paths_share_prefixes() {
        // "all" is reserved by the backend router ahead of /question/{id}
        assert_eq!(PROBLEMS_ALL, format!("{}/all", PROBLEM_PREFIX));
        assert!(PROBLEMS_SOLVED.starts_with(PROBLEM_PREFIX));
        assert!(ADMIN_PROBLEM_PREFIX.starts_with(PROBLEM_PREFIX));
    }
}
