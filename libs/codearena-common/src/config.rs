use crate::types::Language;
use std::env;
use std::fmt;

/// What a workspace does with a run/submit issued while another is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmissionPolicy {
    /// Reject the second request until the first resolves
    #[default]
    Exclusive,
    /// No precondition; requests may overlap
    Overlapping,
}

impl AdmissionPolicy {
    pub fn from_str(s: &str) -> Option<AdmissionPolicy> {
        match s.to_lowercase().as_str() {
            "exclusive" => Some(AdmissionPolicy::Exclusive),
            "overlapping" => Some(AdmissionPolicy::Overlapping),
            _ => None,
        }
    }
}

impl fmt::Display for AdmissionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdmissionPolicy::Exclusive => write!(f, "exclusive"),
            AdmissionPolicy::Overlapping => write!(f, "overlapping"),
        }
    }
}

/// How late responses are applied to a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Every response lands, the later-completing one wins
    #[default]
    Completion,
    /// Responses older than the latest issued request of the same kind are dropped
    LatestIssued,
}

impl ResponseOrdering {
    pub fn from_str(s: &str) -> Option<ResponseOrdering> {
        match s.to_lowercase().as_str() {
            "completion" => Some(ResponseOrdering::Completion),
            "latest-issued" | "latest_issued" => Some(ResponseOrdering::LatestIssued),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseOrdering::Completion => write!(f, "completion"),
            ResponseOrdering::LatestIssued => write!(f, "latest-issued"),
        }
    }
}

/// Application configuration
/// Provides defaults with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// None keeps the transport default (no timeout)
    pub request_timeout_ms: Option<u64>,
    pub user: Option<String>,
    pub token: Option<String>,
    pub default_language: Language,
    pub admission: AdmissionPolicy,
    pub ordering: ResponseOrdering,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_base_url: lookup("CODEARENA_API_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            request_timeout_ms: lookup("CODEARENA_REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok()),
            user: lookup("CODEARENA_USER").filter(|v| !v.is_empty()),
            token: lookup("CODEARENA_TOKEN").filter(|v| !v.is_empty()),
            default_language: lookup("CODEARENA_LANGUAGE")
                .and_then(|v| Language::from_str(&v))
                .unwrap_or(Language::Python),
            admission: lookup("CODEARENA_ADMISSION")
                .and_then(|v| AdmissionPolicy::from_str(&v))
                .unwrap_or_default(),
            ordering: lookup("CODEARENA_ORDERING")
                .and_then(|v| ResponseOrdering::from_str(&v))
                .unwrap_or_default(),
        }
    }

    pub fn new() -> Self {
        Self::from_env()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout_ms, None);
        assert_eq!(config.default_language, Language::Python);
        assert_eq!(config.admission, AdmissionPolicy::Exclusive);
        assert_eq!(config.ordering, ResponseOrdering::Completion);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = config_with(&[
            ("CODEARENA_API_URL", "https://judge.example.com"),
            ("CODEARENA_REQUEST_TIMEOUT_MS", "2500"),
            ("CODEARENA_LANGUAGE", "CPP"),
            ("CODEARENA_ADMISSION", "overlapping"),
            ("CODEARENA_ORDERING", "latest-issued"),
            ("CODEARENA_USER", "ada"),
            ("CODEARENA_TOKEN", "t0k"),
        ]);

        assert_eq!(config.api_base_url, "https://judge.example.com");
        assert_eq!(config.request_timeout_ms, Some(2500));
        assert_eq!(config.default_language, Language::Cpp);
        assert_eq!(config.admission, AdmissionPolicy::Overlapping);
        assert_eq!(config.ordering, ResponseOrdering::LatestIssued);
        assert_eq!(config.user.as_deref(), Some("ada"));
        assert_eq!(config.token.as_deref(), Some("t0k"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_with(&[
            ("CODEARENA_REQUEST_TIMEOUT_MS", "soon"),
            ("CODEARENA_LANGUAGE", "cobol"),
            ("CODEARENA_ADMISSION", "whatever"),
            ("CODEARENA_TOKEN", ""),
        ]);

        assert_eq!(config.request_timeout_ms, None);
        assert_eq!(config.default_language, Language::Python);
        assert_eq!(config.admission, AdmissionPolicy::Exclusive);
        assert!(config.token.is_none());
    }
}
