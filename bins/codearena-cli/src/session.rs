//! Explicit authenticated-session context
//!
//! Handed to whatever needs to know who is signed in. Created at startup,
//! torn down on logout. The solved set only exists while a session does.

use codearena_common::client::{ClientResult, ProblemCatalog};
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub name: String,
    pub token: String,
}

#[derive(Debug, Default)]
pub struct Session {
    user: Option<SessionUser>,
    solved: HashSet<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Start a session from configured credentials, if both are present
    pub fn from_credentials(user: Option<String>, token: Option<String>) -> Self {
        let mut session = Self::anonymous();
        if let Some(token) = token {
            session.begin(user.unwrap_or_else(|| "anonymous".to_string()), token);
        }
        session
    }

    pub fn begin(&mut self, name: impl Into<String>, token: impl Into<String>) {
        let user = SessionUser {
            name: name.into(),
            token: token.into(),
        };
        info!(user = %user.name, "session started");
        self.user = Some(user);
        self.solved.clear();
    }

    /// Logout: forget the user and everything fetched on their behalf
    pub fn end(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.name, "session ended");
        }
        self.solved.clear();
    }

    pub fn is_active(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.token.as_str())
    }

    pub fn solved_ids(&self) -> &HashSet<String> {
        &self.solved
    }

    pub fn has_solved(&self, problem_id: &str) -> bool {
        self.solved.contains(problem_id)
    }

    /// Reload the solved set; a no-op without an active session
    pub async fn refresh_solved<C: ProblemCatalog + ?Sized>(&mut self, catalog: &C) -> ClientResult<()> {
        if !self.is_active() {
            debug!("no active session, solved set stays empty");
            return Ok(());
        }

        let ids = catalog.solved_problem_ids().await?;
        debug!(count = ids.len(), "solved set refreshed");
        self.solved = ids.into_iter().collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codearena_common::types::{Problem, ProblemSummary};
    use codearena_common::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SolvedCatalog {
        ids: Vec<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProblemCatalog for SolvedCatalog {
        async fn fetch_problem(&self, problem_id: &str) -> ClientResult<Problem> {
            Err(ClientError::NotFound(problem_id.to_string()))
        }

        async fn list_problems(&self) -> ClientResult<Vec<ProblemSummary>> {
            Ok(vec![])
        }

        async fn solved_problem_ids(&self) -> ClientResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.ids.clone())
        }
    }

    fn catalog() -> SolvedCatalog {
        SolvedCatalog {
            ids: vec!["1".to_string(), "3".to_string()],
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_anonymous_session_skips_solved_fetch() {
        let catalog = catalog();
        let mut session = Session::anonymous();

        session.refresh_solved(&catalog).await.unwrap();

        assert!(session.solved_ids().is_empty());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_solved_set() {
        let catalog = catalog();
        let mut session = Session::anonymous();
        session.begin("ada", "t0k");
        session.refresh_solved(&catalog).await.unwrap();
        assert!(session.has_solved("3"));
        assert_eq!(session.token(), Some("t0k"));

        session.end();

        assert!(!session.is_active());
        assert!(session.solved_ids().is_empty());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_from_credentials() {
        assert!(!Session::from_credentials(Some("ada".to_string()), None).is_active());

        let session = Session::from_credentials(None, Some("t0k".to_string()));
        assert_eq!(session.user().map(|u| u.name.as_str()), Some("anonymous"));
    }
}
