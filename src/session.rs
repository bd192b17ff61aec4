//! Analysis Session
//!
//! One user's walk through the app: fill the upload form, submit, look at
//! the results, start over. The session owns the form, the configured
//! analyzer and the last completed result.
//!
//! Locks are never held across an await; the processing flag is cleared by
//! a drop guard so an abandoned submission cannot leave the form stuck.

use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use thiserror::Error;

use crate::analysis::{AnalysisError, AnalysisResult, Analyzer};
use crate::intake::{IntakeError, UploadForm, UploadedFile};

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    Results,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Upload => "upload",
            View::Results => "results",
        }
    }
}

/// Submission failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    /// The session was reset while the submission was processing
    #[error("The session was reset before the analysis finished")]
    AnalysisCancelled,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Intake(e) => e.code(),
            SessionError::Analysis(e) => e.code(),
            SessionError::AnalysisInProgress => "ANALYSIS_IN_PROGRESS",
            SessionError::AnalysisCancelled => "ANALYSIS_CANCELLED",
        }
    }
}

/// A result together with when it arrived
#[derive(Debug, Clone)]
pub struct CompletedAnalysis {
    pub result: AnalysisResult,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SessionState {
    form: UploadForm,
    completed: Option<CompletedAnalysis>,
    /// Bumped on every reset; a submission only stores its result if the
    /// generation it started under is still current
    generation: u64,
}

impl SessionState {
    fn view(&self) -> View {
        if self.completed.is_some() {
            View::Results
        } else {
            View::Upload
        }
    }
}

/// Point-in-time copy of the session for display
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub view: View,
    pub analyzer: String,
    pub file: Option<UploadedFile>,
    pub subject_id: String,
    pub is_loading: bool,
    pub completed: Option<CompletedAnalysis>,
}

/// Upload-analyze-present session
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    analyzer: Arc<dyn Analyzer>,
    processing_delay: Duration,
}

impl Session {
    pub fn new(analyzer: Arc<dyn Analyzer>, processing_delay: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            analyzer,
            processing_delay,
        }
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offer a file to the upload form
    pub fn select_file(&self, name: &str, bytes: Vec<u8>) -> Result<UploadedFile, IntakeError> {
        let mut state = self.write();
        let accepted = state.form.select_file(name, bytes)?.clone();
        tracing::info!(
            filename = %accepted.name(),
            format = %accepted.format(),
            size_bytes = accepted.size_bytes(),
            "File uploaded successfully"
        );
        Ok(accepted)
    }

    pub fn set_subject_id(&self, subject_id: &str) {
        self.write().form.set_subject_id(subject_id);
    }

    /// Submit the form with the subject ID already on it
    pub async fn submit(&self) -> Result<AnalysisResult, SessionError> {
        self.run_submission(None).await.map(|completed| completed.result)
    }

    /// Fill in the subject ID and submit, under one lock so a concurrent
    /// submission cannot swap the ID in between
    pub async fn submit_with(&self, subject_id: &str) -> Result<CompletedAnalysis, SessionError> {
        self.run_submission(Some(subject_id)).await
    }

    /// Guards run in order (processing, file, subject ID) and none of them
    /// reaches the analyzer. Past the guards the form is marked loading, the
    /// processing delay elapses and the analyzer is called exactly once. A
    /// failed analysis leaves the form filled in so it can be resubmitted; a
    /// reset while processing discards the result.
    async fn run_submission(&self, subject_id: Option<&str>) -> Result<CompletedAnalysis, SessionError> {
        let (file, subject_id, generation) = {
            let mut state = self.write();
            if state.form.is_loading() {
                return Err(SessionError::AnalysisInProgress);
            }
            if let Some(subject_id) = subject_id {
                state.form.set_subject_id(subject_id);
            }
            let (file, subject_id) = state.form.check_submission()?;
            state.form.set_loading(true);
            (file, subject_id, state.generation)
        };
        let _processing = ProcessingGuard {
            state: Arc::clone(&self.state),
            generation,
        };

        tracing::info!(
            subject_id = %subject_id,
            filename = %file.name(),
            analyzer = self.analyzer.name(),
            "Starting analysis"
        );

        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }

        let start = std::time::Instant::now();
        let outcome = self.analyzer.analyze(&file, &subject_id).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                let mut state = self.write();
                if state.generation != generation {
                    tracing::debug!(subject_id = %subject_id, "Session reset during analysis, result discarded");
                    return Err(SessionError::AnalysisCancelled);
                }
                tracing::info!(
                    subject_id = %result.subject_id,
                    depression_probability = result.depression_probability,
                    duration_ms,
                    "Analysis completed"
                );
                let completed = CompletedAnalysis {
                    result,
                    completed_at: Utc::now(),
                };
                state.completed = Some(completed.clone());
                Ok(completed)
            }
            Err(e) => {
                tracing::warn!(subject_id = %subject_id, error = %e, duration_ms, "Analysis failed");
                Err(e.into())
            }
        }
    }

    /// Last completed analysis, if any
    pub fn completed(&self) -> Option<CompletedAnalysis> {
        self.read().completed.clone()
    }

    /// Back to an empty upload form
    pub fn new_analysis(&self) {
        let mut state = self.write();
        state.form.clear();
        state.completed = None;
        state.generation += 1;
        tracing::info!("Session reset for a new analysis");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            view: state.view(),
            analyzer: self.analyzer.name().to_string(),
            file: state.form.file().cloned(),
            subject_id: state.form.subject_id().to_string(),
            is_loading: state.form.is_loading(),
            completed: state.completed.clone(),
        }
    }
}

/// Clears the loading flag when a submission ends, however it ends.
///
/// After a reset the flag belongs to whatever was submitted next, so a
/// guard from an older generation leaves it alone.
struct ProcessingGuard {
    state: Arc<RwLock<SessionState>>,
    generation: u64,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.form.set_loading(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisOutcome, MockAnalyzer};
    use crate::presenter::ResultsView;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock analyzer that counts calls and can be told to fail
    #[derive(Default)]
    struct CountingAnalyzer {
        calls: AtomicUsize,
        fail_with: Option<AnalysisError>,
    }

    #[async_trait]
    impl Analyzer for CountingAnalyzer {
        fn name(&self) -> &str {
            "counting"
        }

        async fn analyze(&self, _file: &UploadedFile, subject_id: &str) -> AnalysisOutcome<AnalysisResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(MockAnalyzer::fixed_result(subject_id)),
            }
        }
    }

    fn session_with(analyzer: Arc<CountingAnalyzer>) -> Session {
        Session::new(analyzer, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_guards_never_reach_analyzer() {
        let analyzer = Arc::new(CountingAnalyzer::default());
        let session = session_with(analyzer.clone());

        assert_eq!(
            session.submit().await.unwrap_err(),
            SessionError::Intake(IntakeError::MissingFile)
        );

        session.select_file("sample.edf", vec![1, 2]).unwrap();
        session.set_subject_id("   ");
        assert_eq!(
            session.submit().await.unwrap_err(),
            SessionError::Intake(IntakeError::MissingSubjectId)
        );

        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.snapshot().view, View::Upload);
        assert!(!session.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_submit_calls_analyzer_once() {
        let analyzer = Arc::new(CountingAnalyzer::default());
        let session = session_with(analyzer.clone());

        session.select_file("sample.edf", vec![1, 2]).unwrap();
        session.set_subject_id(" 001 ");
        let result = session.submit().await.unwrap();

        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.subject_id, " 001 ");
        assert_eq!(session.snapshot().view, View::Results);
        assert!(!session.snapshot().is_loading);

        let view = ResultsView::new(session.completed().unwrap().result);
        assert_eq!(view.depression_percent, "82%");
        assert_eq!(view.risk.label, "High Risk");
    }

    #[tokio::test]
    async fn test_failed_analysis_keeps_form() {
        let analyzer = Arc::new(CountingAnalyzer {
            calls: AtomicUsize::new(0),
            fail_with: Some(AnalysisError::ModelUnavailable("down".to_string())),
        });
        let session = session_with(analyzer.clone());

        session.select_file("sample.npy", vec![0; 4]).unwrap();
        session.set_subject_id("S42");
        let err = session.submit().await.unwrap_err();
        assert_eq!(err.code(), "MODEL_UNAVAILABLE");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.view, View::Upload);
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.file.unwrap().name(), "sample.npy");
        assert_eq!(snapshot.subject_id, "S42");

        // Retry is allowed and reaches the analyzer again
        assert!(session.submit().await.is_err());
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resubmit_while_processing_rejected() {
        let analyzer = Arc::new(CountingAnalyzer::default());
        let session = Arc::new(Session::new(analyzer.clone(), Duration::from_millis(200)));

        session.select_file("sample.edf", vec![1]).unwrap();
        session.set_subject_id("001");

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.snapshot().is_loading);

        assert_eq!(
            session.submit().await.unwrap_err(),
            SessionError::AnalysisInProgress
        );

        first.await.unwrap().unwrap();
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
        assert!(!session.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_abandoned_submission_clears_loading() {
        let analyzer = Arc::new(CountingAnalyzer::default());
        let session = Session::new(analyzer.clone(), Duration::from_secs(60));

        session.select_file("sample.edf", vec![1]).unwrap();
        session.set_subject_id("001");

        let timed_out = tokio::time::timeout(Duration::from_millis(20), session.submit()).await;
        assert!(timed_out.is_err());
        assert!(!session.snapshot().is_loading);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_new_analysis_resets() {
        let session = Session::new(Arc::new(MockAnalyzer::new()), Duration::ZERO);
        session.select_file("sample.edf", vec![1]).unwrap();
        session.set_subject_id("001");
        session.submit().await.unwrap();
        assert_eq!(session.snapshot().view, View::Results);

        session.new_analysis();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.view, View::Upload);
        assert!(snapshot.file.is_none());
        assert_eq!(snapshot.subject_id, "");
        assert!(snapshot.completed.is_none());
    }

    #[tokio::test]
    async fn test_reset_during_analysis_discards_result() {
        let session = Arc::new(Session::new(
            Arc::new(MockAnalyzer::new()),
            Duration::from_millis(100),
        ));
        session.select_file("sample.edf", vec![1]).unwrap();
        session.set_subject_id("001");

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        session.new_analysis();

        assert_eq!(
            pending.await.unwrap().unwrap_err(),
            SessionError::AnalysisCancelled
        );
        assert_eq!(session.snapshot().view, View::Upload);
        assert!(session.completed().is_none());
    }

    #[tokio::test]
    async fn test_stale_submission_does_not_unlock_newer_one() {
        let analyzer = Arc::new(CountingAnalyzer::default());
        let session = Arc::new(Session::new(analyzer.clone(), Duration::from_millis(200)));
        session.select_file("first.edf", vec![1]).unwrap();
        session.set_subject_id("A");

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.new_analysis();

        session.select_file("second.edf", vec![2]).unwrap();
        let second = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.submit_with("B").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(first.await.unwrap().unwrap_err(), SessionError::AnalysisCancelled);
        assert!(session.snapshot().is_loading);
        assert_eq!(
            session.submit().await.unwrap_err(),
            SessionError::AnalysisInProgress
        );

        let completed = second.await.unwrap().unwrap();
        assert_eq!(completed.result.subject_id, "B");
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 2);
        assert!(!session.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_submit_with_sets_subject_id() {
        let session = Session::new(Arc::new(MockAnalyzer::new()), Duration::ZERO);
        session.select_file("sample.edf", vec![1]).unwrap();

        assert_eq!(
            session.submit_with("  ").await.unwrap_err(),
            SessionError::Intake(IntakeError::MissingSubjectId)
        );

        let completed = session.submit_with("S42").await.unwrap();
        assert_eq!(completed.result.subject_id, "S42");
        assert_eq!(session.snapshot().subject_id, "S42");
        assert_eq!(session.completed().unwrap().completed_at, completed.completed_at);
    }
}
