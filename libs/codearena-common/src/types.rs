use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Judge status id the execution backend uses for a passed test case
pub const PASSED_STATUS_ID: u32 = 3;

/// Message carried by the synthetic run result produced on transport failure
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Strongly-typed language enum
/// Serializes to the UI key sent to the judge ("python", "java", "cpp")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Cpp,
}

impl Language {
    /// Returns all language variants
    /// This is the single source of truth for the languages a workspace can select
    pub fn all_variants() -> &'static [Language] {
        &[Language::Python, Language::Java, Language::Cpp]
    }

    /// Parse a language from its UI key (case-insensitive)
    pub fn from_str(s: &str) -> Option<Language> {
        match s.to_lowercase().as_str() {
            "python" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Human-facing label used by language pickers
    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
            Language::Cpp => write!(f, "cpp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all_variants() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn from_str(s: &str) -> Option<Difficulty> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.pad("easy"),
            Difficulty::Medium => f.pad("medium"),
            Difficulty::Hard => f.pad("hard"),
        }
    }
}

/// Fixed tag vocabulary
/// A problem carries exactly one tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "linked list")]
    LinkedList,
    #[serde(rename = "graph")]
    Graph,
    #[serde(rename = "dp")]
    Dp,
    #[serde(rename = "string")]
    String,
}

impl Tag {
    pub fn all_variants() -> &'static [Tag] {
        &[Tag::Array, Tag::LinkedList, Tag::Graph, Tag::Dp, Tag::String]
    }

    /// Accepts "linked-list" as well, since a space is awkward on a command line
    pub fn from_str(s: &str) -> Option<Tag> {
        match s.to_lowercase().as_str() {
            "array" => Some(Tag::Array),
            "linked list" | "linked-list" => Some(Tag::LinkedList),
            "graph" => Some(Tag::Graph),
            "dp" => Some(Tag::Dp),
            "string" => Some(Tag::String),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Array => f.pad("array"),
            Tag::LinkedList => f.pad("linked list"),
            Tag::Graph => f.pad("graph"),
            Tag::Dp => f.pad("dp"),
            Tag::String => f.pad("string"),
        }
    }
}

/// Example shown to the user with its expected output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleTestCase {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: String,
}

/// Scoring-only test case, never rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenTestCase {
    pub input: String,
    pub output: String,
}

/// Template code for one language
/// `language` is the stored name ("c++", "java", "python"), not the UI key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarterCode {
    pub language: String,
    #[serde(rename = "initialCode")]
    pub initial_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSolution {
    pub language: String,
    #[serde(rename = "completeCode")]
    pub complete_code: String,
}

/// Full problem as returned by GET /question/{id}
/// Read-only from the client's point of view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: Tag,
    #[serde(rename = "visibleTestCases", default)]
    pub visible_test_cases: Vec<VisibleTestCase>,
    #[serde(rename = "hiddenTestCases", default)]
    pub hidden_test_cases: Vec<HiddenTestCase>,
    #[serde(rename = "starterCode", default)]
    pub starter_code: Vec<StarterCode>,
    #[serde(rename = "Solution", alias = "referenceSolution", default)]
    pub solutions: Vec<ReferenceSolution>,
}

/// Row of GET /question/all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub tags: Tag,
}

/// Payload of the admin create and update endpoints
/// Same shape as a problem, minus the server-assigned identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDraft {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: Tag,
    #[serde(rename = "visibleTestCases", default)]
    pub visible_test_cases: Vec<VisibleTestCase>,
    #[serde(rename = "hiddenTestCases", default)]
    pub hidden_test_cases: Vec<HiddenTestCase>,
    #[serde(rename = "starterCode", default)]
    pub starter_code: Vec<StarterCode>,
    #[serde(rename = "Solution", default)]
    pub solutions: Vec<ReferenceSolution>,
}

/// Request body of the run and submit endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeSubmission {
    #[serde(rename = "Solution")]
    pub solution: SubmittedCode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedCode {
    pub language: Language,
    #[serde(rename = "completeCode")]
    pub complete_code: String,
}

impl CodeSubmission {
    pub fn new(language: Language, code: impl Into<String>) -> Self {
        Self {
            solution: SubmittedCode {
                language,
                complete_code: code.into(),
            },
        }
    }
}

/// Per visible test case outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseOutcome {
    #[serde(default)]
    pub stdin: String,
    #[serde(alias = "expectedOutput", default)]
    pub expected_output: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub stdout: String,
    pub status_id: u32,
}

impl TestCaseOutcome {
    pub fn passed(&self) -> bool {
        self.status_id == PASSED_STATUS_ID
    }
}

/// Outcome of a run cycle
///
/// `test_cases` is absent on the synthetic transport-failure result,
/// so consumers must not assume it is populated when `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    #[serde(rename = "runtime", default, deserialize_with = "lenient_number")]
    pub runtime_seconds: Option<f64>,
    #[serde(rename = "memory", default, deserialize_with = "lenient_number")]
    pub memory_kb: Option<f64>,
    #[serde(rename = "testCases", default)]
    pub test_cases: Option<Vec<TestCaseOutcome>>,
    #[serde(rename = "error", default)]
    pub error_message: Option<String>,
}

impl RunResult {
    /// Sentinel stored when the run request never produced a judge response
    pub fn internal_error() -> Self {
        Self {
            success: false,
            runtime_seconds: None,
            memory_kb: None,
            test_cases: None,
            error_message: Some(INTERNAL_SERVER_ERROR.to_string()),
        }
    }

    pub fn passed_count(&self) -> usize {
        self.test_cases
            .as_ref()
            .map(|cases| cases.iter().filter(|tc| tc.passed()).count())
            .unwrap_or(0)
    }
}

/// Outcome of a submit cycle
/// Invariant after normalization: test_cases_passed <= test_cases_total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub accepted: bool,
    #[serde(rename = "testCasesPassed", default)]
    pub test_cases_passed: u32,
    #[serde(rename = "testCasesTotal", default)]
    pub test_cases_total: u32,
    #[serde(rename = "runtime", default, deserialize_with = "lenient_number")]
    pub runtime_seconds: Option<f64>,
    #[serde(rename = "memory", default, deserialize_with = "lenient_number")]
    pub memory_kb: Option<f64>,
    #[serde(rename = "error", default)]
    pub error_message: Option<String>,
}

/// Entry of GET /question/getAllProblemsSolved
/// The backend returns either bare ids or populated problem documents
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SolvedEntry {
    Id(String),
    Problem {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl SolvedEntry {
    pub fn into_id(self) -> String {
        match self {
            SolvedEntry::Id(id) => id,
            SolvedEntry::Problem { id } => id,
        }
    }
}

// The judge reports time as "0.012" on some paths and 0.012 on others.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", s))),
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
