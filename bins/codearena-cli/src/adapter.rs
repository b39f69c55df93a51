/// Execution Request Adapter
///
/// **Core Responsibility:**
/// Turn a (problem id, language, code) triple into exactly one request to
/// the judge and classify whatever comes back into the workspace's result
/// shapes.
///
/// **Failure Classification:**
/// - run: any transport error becomes the fixed "Internal server error"
///   result with no test cases
/// - submit: any transport error becomes `None`, indistinguishable from
///   "never submitted"
/// - backend-reported failures (wrong answer, compile error) are data and
///   pass through untouched
///
/// Causes are logged, never returned. No retries, no backoff.

use codearena_common::client::ExecutionBackend;
use codearena_common::types::{CodeSubmission, Language, RunResult, SubmitResult};
use tracing::{info, warn};

pub struct ExecutionAdapter<B> {
    backend: B,
}

impl<B: ExecutionBackend> ExecutionAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn run(&self, problem_id: &str, language: Language, code: &str) -> RunResult {
        let submission = CodeSubmission::new(language, code);

        match self.backend.run_code(problem_id, &submission).await {
            Ok(result) => {
                info!(
                    problem_id,
                    %language,
                    success = result.success,
                    passed = result.passed_count(),
                    "run completed"
                );
                normalize_run(result)
            }
            Err(e) => {
                warn!(problem_id, %language, error = %e, "run request failed");
                RunResult::internal_error()
            }
        }
    }

    pub async fn submit(
        &self,
        problem_id: &str,
        language: Language,
        code: &str,
    ) -> Option<SubmitResult> {
        let submission = CodeSubmission::new(language, code);

        match self.backend.submit_code(problem_id, &submission).await {
            Ok(result) => {
                info!(
                    problem_id,
                    %language,
                    accepted = result.accepted,
                    passed = result.test_cases_passed,
                    total = result.test_cases_total,
                    "submit completed"
                );
                Some(normalize_submit(result))
            }
            Err(e) => {
                warn!(problem_id, %language, error = %e, "submit request failed");
                None
            }
        }
    }
}

/// Metrics are only meaningful for a successful run
fn normalize_run(mut result: RunResult) -> RunResult {
    if !result.success {
        result.runtime_seconds = None;
        result.memory_kb = None;
    }
    result
}

fn normalize_submit(mut result: SubmitResult) -> SubmitResult {
    if !result.accepted {
        result.runtime_seconds = None;
        result.memory_kb = None;
    }
    if result.test_cases_passed > result.test_cases_total {
        warn!(
            passed = result.test_cases_passed,
            total = result.test_cases_total,
            "judge reported more passes than cases, clamping"
        );
        result.test_cases_passed = result.test_cases_total;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codearena_common::client::{ClientError, ClientResult, HttpJudgeClient};
    use codearena_common::types::TestCaseOutcome;
    use std::sync::Mutex;

    /// Backend that replays canned responses and records what it was sent
    struct CannedBackend {
        run: Mutex<Option<ClientResult<RunResult>>>,
        submit: Mutex<Option<ClientResult<SubmitResult>>>,
        seen: Mutex<Vec<(String, CodeSubmission)>>,
    }

    impl CannedBackend {
        fn new() -> Self {
            Self {
                run: Mutex::new(None),
                submit: Mutex::new(None),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn with_run(self, response: ClientResult<RunResult>) -> Self {
            *self.run.lock().unwrap() = Some(response);
            self
        }

        fn with_submit(self, response: ClientResult<SubmitResult>) -> Self {
            *self.submit.lock().unwrap() = Some(response);
            self
        }
    }

    #[async_trait]
    impl ExecutionBackend for CannedBackend {
        async fn run_code(
            &self,
            problem_id: &str,
            submission: &CodeSubmission,
        ) -> ClientResult<RunResult> {
            self.seen
                .lock()
                .unwrap()
                .push((problem_id.to_string(), submission.clone()));
            self.run.lock().unwrap().take().expect("unexpected run request")
        }

        async fn submit_code(
            &self,
            problem_id: &str,
            submission: &CodeSubmission,
        ) -> ClientResult<SubmitResult> {
            self.seen
                .lock()
                .unwrap()
                .push((problem_id.to_string(), submission.clone()));
            self.submit
                .lock()
                .unwrap()
                .take()
                .expect("unexpected submit request")
        }
    }

    fn api_error() -> ClientError {
        ClientError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        }
    }

    fn passing_case() -> TestCaseOutcome {
        TestCaseOutcome {
            stdin: "1".to_string(),
            expected_output: "1".to_string(),
            stdout: "1".to_string(),
            status_id: 3,
        }
    }

    #[tokio::test]
    async fn test_run_success_passes_through() {
        let backend = CannedBackend::new().with_run(Ok(RunResult {
            success: true,
            runtime_seconds: Some(0.02),
            memory_kb: Some(900.0),
            test_cases: Some(vec![passing_case()]),
            error_message: None,
        }));
        let adapter = ExecutionAdapter::new(backend);

        let result = adapter.run("p1", Language::Java, "class A {}").await;
        assert!(result.success);
        assert_eq!(result.runtime_seconds, Some(0.02));
        assert_eq!(result.passed_count(), 1);

        let seen = adapter.backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "p1");
        assert_eq!(seen[0].1, CodeSubmission::new(Language::Java, "class A {}"));
    }

    #[tokio::test]
    async fn test_run_transport_failure_yields_sentinel() {
        let adapter = ExecutionAdapter::new(CannedBackend::new().with_run(Err(api_error())));

        let result = adapter.run("p1", Language::Python, "print(1)").await;
        assert_eq!(result, RunResult::internal_error());
        assert!(result.test_cases.is_none());
    }

    #[tokio::test]
    async fn test_run_backend_failure_is_data() {
        let mut failing = passing_case();
        failing.status_id = 6;
        let adapter = ExecutionAdapter::new(CannedBackend::new().with_run(Ok(RunResult {
            success: false,
            runtime_seconds: Some(0.5),
            memory_kb: Some(10.0),
            test_cases: Some(vec![failing]),
            error_message: Some("Compilation Error".to_string()),
        })));

        let result = adapter.run("p1", Language::Cpp, "int main(").await;
        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some("Compilation Error"));
        assert_eq!(result.test_cases.as_ref().map(Vec::len), Some(1));
        assert_eq!(result.runtime_seconds, None);
        assert_eq!(result.memory_kb, None);
    }

    #[tokio::test]
    async fn test_submit_transport_failure_yields_none() {
        let adapter =
            ExecutionAdapter::new(CannedBackend::new().with_submit(Err(api_error())));

        assert_eq!(adapter.submit("p1", Language::Python, "x").await, None);
    }

    #[tokio::test]
    async fn test_submit_clamps_pass_count() {
        let adapter = ExecutionAdapter::new(CannedBackend::new().with_submit(Ok(SubmitResult {
            accepted: false,
            test_cases_passed: 9,
            test_cases_total: 4,
            runtime_seconds: Some(1.0),
            memory_kb: None,
            error_message: Some("Wrong Answer".to_string()),
        })));

        let result = adapter.submit("p1", Language::Java, "x").await.unwrap();
        assert_eq!(result.test_cases_passed, 4);
        assert_eq!(result.test_cases_total, 4);
        assert_eq!(result.runtime_seconds, None);
    }

    #[tokio::test]
    async fn test_unreachable_judge_is_a_transport_error() {
        // grab a free port, then release it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpJudgeClient::new(&format!("http://{}", addr), None).unwrap();
        let adapter = ExecutionAdapter::new(client);

        let run = adapter.run("p1", Language::Python, "print(1)").await;
        assert_eq!(run, RunResult::internal_error());

        let submit = adapter.submit("p1", Language::Python, "print(1)").await;
        assert!(submit.is_none());
    }
}
