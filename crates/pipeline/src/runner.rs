//! The pipeline runner.

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use quickmd_config::AppConfig;
use quickmd_core::history::{HistoryEntry, RunMode, TaskOutcome};
use quickmd_core::provider::Provider;
use quickmd_core::session::Session;
use quickmd_core::task::TaskId;
use quickmd_core::{Case, Result, build_prompt};
use quickmd_providers::{CompletionClient, RetryPolicy};

/// Which tasks a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single(TaskId),
    All,
}

impl Selection {
    pub fn mode(&self) -> RunMode {
        match self {
            Selection::Single(_) => RunMode::SingleTask,
            Selection::All => RunMode::AllTasks,
        }
    }

    pub fn tasks(&self) -> Vec<TaskId> {
        match self {
            Selection::Single(task) => vec![*task],
            Selection::All => TaskId::ALL.to_vec(),
        }
    }
}

/// Prompt builder + completion client + retry policy.
#[derive(Clone)]
pub struct Pipeline {
    client: CompletionClient,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(client: CompletionClient, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Build a pipeline from a provider and the model settings in `config`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(
            CompletionClient::from_config(provider, config),
            RetryPolicy::from_config(config),
        )
    }

    /// Run one task. Provider failures are captured in the outcome.
    pub async fn run_task(&self, task: TaskId, case: &Case) -> TaskOutcome {
        let system = build_prompt(task.task());

        info!(task = %task, case_len = case.len(), "Running task");

        let result = self.retry.run(&self.client, &system, case.as_str()).await;
        if let Err(e) = &result {
            warn!(task = %task, error = %e, "Task failed");
        }
        result.into()
    }

    /// Run all three tasks concurrently, keyed by task.
    pub async fn run_all(&self, case: &Case) -> BTreeMap<TaskId, TaskOutcome> {
        self.run_tasks(&TaskId::ALL, case).await
    }

    async fn run_tasks(&self, tasks: &[TaskId], case: &Case) -> BTreeMap<TaskId, TaskOutcome> {
        let outcomes = join_all(tasks.iter().map(|task| self.run_task(*task, case))).await;
        tasks.iter().copied().zip(outcomes).collect()
    }

    /// Validate `case_text` and run `selection`, producing a history entry.
    ///
    /// An invalid case is rejected before any remote call.
    pub async fn execute(&self, selection: Selection, case_text: &str) -> Result<HistoryEntry> {
        let case = Case::new(case_text)?;
        let results = self.run_tasks(&selection.tasks(), &case).await;
        Ok(HistoryEntry::new(selection.mode(), case.as_str(), results))
    }

    /// Run `selection` on the session's draft case and record the result.
    pub async fn run_in_session(
        &self,
        session: &mut Session,
        selection: Selection,
    ) -> Result<HistoryEntry> {
        if let Selection::Single(task) = selection {
            session.select_task(task);
        }
        let entry = self.execute(selection, &session.case).await?;
        session.record(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quickmd_core::error::{Error, ProviderError};
    use quickmd_core::message::Message;
    use quickmd_core::provider::{ProviderRequest, ProviderResponse};
    use std::sync::Mutex;

    /// Answers based on which task instruction is in the system prompt;
    /// fails for one configurable task.
    struct TaskAwareProvider {
        failing: Option<TaskId>,
        empty: Option<TaskId>,
        calls: Mutex<usize>,
    }

    impl TaskAwareProvider {
        fn new() -> Self {
            Self {
                failing: None,
                empty: None,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Provider for TaskAwareProvider {
        fn name(&self) -> &str {
            "task_aware"
        }

        async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            let system = &request.messages[0].content;
            let task = TaskId::ALL
                .into_iter()
                .find(|t| system.contains(t.task().instruction))
                .unwrap();

            if Some(task) == self.failing {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "upstream exploded".into(),
                });
            }

            let text = if Some(task) == self.empty {
                String::new()
            } else {
                format!("{} answer per IDSA 2024", task.as_str())
            };

            Ok(ProviderResponse {
                message: Message::assistant(text),
                usage: None,
                model: "mock".into(),
            })
        }
    }

    fn pipeline(provider: Arc<TaskAwareProvider>) -> Pipeline {
        Pipeline::new(CompletionClient::new(provider, "o3", 0.3), RetryPolicy::default())
    }

    fn case() -> Case {
        Case::new("45yo M with chest pain").unwrap()
    }

    #[tokio::test]
    async fn single_task_answers() {
        let provider = Arc::new(TaskAwareProvider::new());
        let outcome = pipeline(provider.clone())
            .run_task(TaskId::Treatment, &case())
            .await;

        assert_eq!(
            outcome,
            TaskOutcome::Answer {
                text: "treatment answer per IDSA 2024".into()
            }
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn run_all_isolates_failures() {
        let provider = Arc::new(TaskAwareProvider {
            failing: Some(TaskId::ConfirmatoryTest),
            ..TaskAwareProvider::new()
        });
        let results = pipeline(provider).run_all(&case()).await;

        assert_eq!(results.len(), 3);
        assert!(matches!(
            results[&TaskId::Treatment],
            TaskOutcome::Answer { ref text } if text.starts_with("treatment")
        ));
        assert!(matches!(
            results[&TaskId::Differential],
            TaskOutcome::Answer { ref text } if text.starts_with("differential")
        ));
        match &results[&TaskId::ConfirmatoryTest] {
            TaskOutcome::Failed { kind, message } => {
                assert_eq!(kind, "api_error");
                assert!(message.contains("upstream exploded"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_all_keeps_task_order() {
        let provider = Arc::new(TaskAwareProvider::new());
        let results = pipeline(provider).run_all(&case()).await;
        let keys: Vec<TaskId> = results.keys().copied().collect();
        assert_eq!(keys, TaskId::ALL.to_vec());
    }

    #[tokio::test]
    async fn empty_task_becomes_no_content_after_retry() {
        let provider = Arc::new(TaskAwareProvider {
            empty: Some(TaskId::Differential),
            ..TaskAwareProvider::new()
        });
        let outcome = pipeline(provider.clone())
            .run_task(TaskId::Differential, &case())
            .await;
        assert_eq!(outcome, TaskOutcome::NoContent);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn blank_case_is_rejected_before_any_call() {
        let provider = Arc::new(TaskAwareProvider::new());
        let result = pipeline(provider.clone()).execute(Selection::All, "   ").await;
        assert!(matches!(result, Err(Error::InvalidCase(_))));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn run_in_session_records_history() {
        let provider = Arc::new(TaskAwareProvider::new());
        let pipeline = pipeline(provider);
        let mut session = Session::new();
        session.set_case("  28yo F dysuria  ");

        pipeline
            .run_in_session(&mut session, Selection::Single(TaskId::ConfirmatoryTest))
            .await
            .unwrap();
        pipeline
            .run_in_session(&mut session, Selection::All)
            .await
            .unwrap();

        let entries = session.history().list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].mode, RunMode::AllTasks);
        assert_eq!(entries[0].results.len(), 3);
        assert_eq!(entries[1].mode, RunMode::SingleTask);
        assert_eq!(entries[1].case, "28yo F dysuria");
        assert_eq!(session.task, TaskId::ConfirmatoryTest);
    }

    #[tokio::test]
    async fn failed_run_in_session_records_nothing() {
        let provider = Arc::new(TaskAwareProvider::new());
        let mut session = Session::new();
        let result = pipeline(provider)
            .run_in_session(&mut session, Selection::All)
            .await;
        assert!(result.is_err());
        assert!(session.history().is_empty());
    }
}
