pub mod types;
pub mod routes;
pub mod config;
pub mod client;
pub mod draft;

// Re-export commonly used types for convenience
pub use types::{Language, Problem, ProblemSummary, RunResult, SubmitResult};
pub use config::{AdmissionPolicy, Config, ResponseOrdering};
pub use client::{ClientError, ExecutionBackend, HttpJudgeClient, ProblemCatalog};
