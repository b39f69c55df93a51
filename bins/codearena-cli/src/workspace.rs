/// Workspace State Machine
///
/// **Core Responsibility:**
/// Hold the selected language, the source code and the last run/submit
/// outcome for one problem, and mediate Editing → Pending → Editing.
///
/// **Lifecycle:**
/// ```text
/// Editing ──begin_run/begin_submit──▶ Pending(kind) ──apply_*──▶ Editing
/// ```
/// A cycle is split into `begin_*` (admission + ticket) and `apply_*`
/// (store the adapter's result). `run`/`submit` compose both around one
/// adapter call. Splitting lets an event loop hold several tickets when the
/// admission policy is `Overlapping`.
///
/// **Known race (kept on purpose under `ResponseOrdering::Completion`):**
/// nothing cancels an in-flight request. A response lands on whatever the
/// workspace looks like when it arrives, even after a language switch or an
/// edit, and among overlapping requests the later-completing one wins.
/// `ResponseOrdering::LatestIssued` drops responses older than the newest
/// ticket of the same kind instead.

use crate::adapter::ExecutionAdapter;
use crate::starter;
use codearena_common::client::ExecutionBackend;
use codearena_common::config::{AdmissionPolicy, ResponseOrdering};
use codearena_common::types::{Language, Problem, RunResult, SubmitResult};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Result tab currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Code,
    Testcase,
    Result,
}

impl ResultView {
    pub fn all_variants() -> &'static [ResultView] {
        &[ResultView::Code, ResultView::Testcase, ResultView::Result]
    }

    /// Parse a tab name (case-insensitive)
    pub fn from_str(s: &str) -> Option<ResultView> {
        ResultView::all_variants()
            .iter()
            .copied()
            .find(|view| view.to_string().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultView::Code => write!(f, "code"),
            ResultView::Testcase => write!(f, "testcase"),
            ResultView::Result => write!(f, "result"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Run,
    Submit,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Run => write!(f, "run"),
            RequestKind::Submit => write!(f, "submit"),
        }
    }
}

/// Observable machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    Editing,
    /// Kind of the most recently issued request still in flight
    Pending(RequestKind),
}

#[derive(Debug, Error, PartialEq)]
pub enum WorkspaceError {
    #[error("a {0} request is already in flight")]
    Busy(RequestKind),

    #[error("ticket #{seq} is a {actual} ticket, expected {expected}")]
    WrongTicket {
        seq: u64,
        expected: RequestKind,
        actual: RequestKind,
    },

    #[error("ticket #{0} is not in flight on this workspace")]
    UnknownTicket(u64),
}

/// Snapshot of what an in-flight request was issued with
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    pub seq: u64,
    pub kind: RequestKind,
    pub problem_id: String,
    pub language: Language,
    pub code: String,
}

/// What happened to a response handed to `apply_*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Stored,
    /// Dropped because a newer request of the same kind was issued
    Stale,
}

pub struct Workspace {
    problem: Problem,
    selected_language: Language,
    source_code: String,
    in_flight: BTreeMap<u64, RequestKind>,
    next_seq: u64,
    latest_run_seq: Option<u64>,
    latest_submit_seq: Option<u64>,
    last_run_result: Option<RunResult>,
    last_submit_result: Option<SubmitResult>,
    active_view: ResultView,
    admission: AdmissionPolicy,
    ordering: ResponseOrdering,
}

impl Workspace {
    /// Open a workspace seeded with the starter code of `language`
    pub fn open(problem: Problem, language: Language) -> Self {
        let source_code = starter::starter_code_for(&problem, language);
        debug!(problem_id = %problem.id, %language, "workspace opened");

        Self {
            problem,
            selected_language: language,
            source_code,
            in_flight: BTreeMap::new(),
            next_seq: 1,
            latest_run_seq: None,
            latest_submit_seq: None,
            last_run_result: None,
            last_submit_result: None,
            active_view: ResultView::Code,
            admission: AdmissionPolicy::default(),
            ordering: ResponseOrdering::default(),
        }
    }

    pub fn with_admission(mut self, admission: AdmissionPolicy) -> Self {
        self.admission = admission;
        self
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn selected_language(&self) -> Language {
        self.selected_language
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    pub fn is_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn state(&self) -> WorkspaceState {
        match self.in_flight.values().next_back() {
            Some(kind) => WorkspaceState::Pending(*kind),
            None => WorkspaceState::Editing,
        }
    }

    pub fn last_run_result(&self) -> Option<&RunResult> {
        self.last_run_result.as_ref()
    }

    pub fn last_submit_result(&self) -> Option<&SubmitResult> {
        self.last_submit_result.as_ref()
    }

    pub fn active_view(&self) -> ResultView {
        self.active_view
    }

    /// Switch language and re-seed the editor
    ///
    /// Unsaved edits are discarded unconditionally. Allowed while pending;
    /// the outstanding request is not cancelled.
    pub fn select_language(&mut self, language: Language) {
        if self.is_pending() {
            debug!(%language, "language switched while a request is in flight");
        }
        self.selected_language = language;
        self.source_code = starter::starter_code_for(&self.problem, language);
    }

    pub fn edit_code(&mut self, text: impl Into<String>) {
        self.source_code = text.into();
    }

    pub fn set_active_view(&mut self, view: ResultView) {
        self.active_view = view;
    }

    pub fn begin_run(&mut self) -> Result<RequestTicket, WorkspaceError> {
        self.begin(RequestKind::Run)
    }

    pub fn begin_submit(&mut self) -> Result<RequestTicket, WorkspaceError> {
        self.begin(RequestKind::Submit)
    }

    fn begin(&mut self, kind: RequestKind) -> Result<RequestTicket, WorkspaceError> {
        if self.admission == AdmissionPolicy::Exclusive {
            if let WorkspaceState::Pending(current) = self.state() {
                return Err(WorkspaceError::Busy(current));
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight.insert(seq, kind);
        match kind {
            RequestKind::Run => self.latest_run_seq = Some(seq),
            RequestKind::Submit => self.latest_submit_seq = Some(seq),
        }

        debug!(seq, %kind, language = %self.selected_language, "request issued");

        Ok(RequestTicket {
            seq,
            kind,
            problem_id: self.problem.id.clone(),
            language: self.selected_language,
            code: self.source_code.clone(),
        })
    }

    /// Store a run outcome and switch to the testcase tab
    pub fn apply_run(
        &mut self,
        ticket: RequestTicket,
        result: RunResult,
    ) -> Result<Applied, WorkspaceError> {
        self.settle(&ticket, RequestKind::Run)?;
        if self.is_stale(&ticket, self.latest_run_seq) {
            return Ok(Applied::Stale);
        }

        self.last_run_result = Some(result);
        self.active_view = ResultView::Testcase;
        Ok(Applied::Stored)
    }

    /// Store a submit outcome (None on transport failure) and switch to the result tab
    pub fn apply_submit(
        &mut self,
        ticket: RequestTicket,
        result: Option<SubmitResult>,
    ) -> Result<Applied, WorkspaceError> {
        self.settle(&ticket, RequestKind::Submit)?;
        if self.is_stale(&ticket, self.latest_submit_seq) {
            return Ok(Applied::Stale);
        }

        self.last_submit_result = result;
        self.active_view = ResultView::Result;
        Ok(Applied::Stored)
    }

    /// Issue a run through `adapter` and apply its outcome
    pub async fn run<B: ExecutionBackend>(
        &mut self,
        adapter: &ExecutionAdapter<B>,
    ) -> Result<Applied, WorkspaceError> {
        let ticket = self.begin_run()?;
        let result = adapter
            .run(&ticket.problem_id, ticket.language, &ticket.code)
            .await;
        self.apply_run(ticket, result)
    }

    /// Issue a submit through `adapter` and apply its outcome
    pub async fn submit<B: ExecutionBackend>(
        &mut self,
        adapter: &ExecutionAdapter<B>,
    ) -> Result<Applied, WorkspaceError> {
        let ticket = self.begin_submit()?;
        let result = adapter
            .submit(&ticket.problem_id, ticket.language, &ticket.code)
            .await;
        self.apply_submit(ticket, result)
    }

    fn settle(&mut self, ticket: &RequestTicket, expected: RequestKind) -> Result<(), WorkspaceError> {
        match self.in_flight.get(&ticket.seq) {
            None => return Err(WorkspaceError::UnknownTicket(ticket.seq)),
            Some(actual) if *actual != expected => {
                return Err(WorkspaceError::WrongTicket {
                    seq: ticket.seq,
                    expected,
                    actual: *actual,
                })
            }
            Some(_) => {}
        }
        self.in_flight.remove(&ticket.seq);

        if ticket.language != self.selected_language || ticket.code != self.source_code {
            warn!(
                seq = ticket.seq,
                kind = %expected,
                issued_language = %ticket.language,
                current_language = %self.selected_language,
                "response belongs to code that has since changed"
            );
        }
        Ok(())
    }

    fn is_stale(&self, ticket: &RequestTicket, latest: Option<u64>) -> bool {
        let stale = self.ordering == ResponseOrdering::LatestIssued
            && latest.is_some_and(|latest| ticket.seq < latest);
        if stale {
            info!(seq = ticket.seq, kind = %ticket.kind, "discarding stale response");
        }
        stale
    }
}
