//! Conversation orchestration.
//!
//! [`ChatService`] owns the per-conversation policy (model, system directive,
//! context window in pairs) but not the history itself. The caller keeps the
//! `Vec<Entry>` and lends it out for one [`ChatService::reply`] at a time.

use std::sync::Arc;

use tracing::{debug, instrument};
use tutor_core::Entry;
use tutor_llm::{GenerateError, GenerateResult, Generator, effective_directive, validate_request};

use crate::history::{count_pairs, trim};

/// Smallest context window, in pairs, a conversation may use.
pub const MIN_HISTORY_PAIRS: usize = 2;

/// Runs one conversation turn at a time against a [`Generator`].
pub struct ChatService {
    generator: Arc<dyn Generator>,
    model_id: String,
    system_directive: Option<String>,
    max_pairs: usize,
}

impl ChatService {
    /// Create a service.
    ///
    /// `max_pairs` is raised to [`MIN_HISTORY_PAIRS`] when smaller. A blank
    /// system prompt disables the directive.
    pub fn new(
        generator: Arc<dyn Generator>,
        model_id: impl Into<String>,
        system_prompt: Option<String>,
        max_pairs: usize,
    ) -> GenerateResult<Self> {
        let model_id = model_id.into();
        validate_request(&model_id)?;
        let system_directive = system_prompt
            .as_deref()
            .and_then(|p| effective_directive(Some(p)))
            .map(str::to_string);
        Ok(Self {
            generator,
            model_id,
            system_directive,
            max_pairs: max_pairs.max(MIN_HISTORY_PAIRS),
        })
    }

    /// Model identifier sent with every request.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Effective context window in pairs.
    pub fn max_pairs(&self) -> usize {
        self.max_pairs
    }

    /// Answer `user_input` in the context of `history`.
    ///
    /// On success appends the user entry and then the model entry to
    /// `history` and returns the answer. On failure `history` is left exactly
    /// as it was and the generator's error is returned unchanged.
    #[instrument(skip_all, fields(model = %self.model_id, history_len = history.len()))]
    pub async fn reply(
        &self,
        history: &mut Vec<Entry>,
        user_input: &str,
    ) -> Result<String, GenerateError> {
        let context = trim(history, self.max_pairs);
        debug!(
            stored_pairs = count_pairs(history),
            sent_pairs = count_pairs(context),
            sent = context.len(),
            "trimmed history"
        );

        let answer = self
            .generator
            .generate(
                &self.model_id,
                context,
                user_input,
                self.system_directive.as_deref(),
            )
            .await?;

        history.push(Entry::user(user_input));
        history.push(Entry::model(answer.clone()));
        Ok(answer)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use tutor_core::Role;
    use tutor_llm::RemoteError;

    use super::*;

    /// Echoes the input and records what it was sent.
    #[derive(Default)]
    struct EchoGenerator {
        calls: Mutex<Vec<(String, Vec<Entry>, String, Option<String>)>>,
    }

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(
            &self,
            model_id: &str,
            history: &[Entry],
            user_input: &str,
            system_directive: Option<&str>,
        ) -> GenerateResult<String> {
            validate_request(model_id)?;
            self.calls.lock().unwrap().push((
                model_id.to_string(),
                history.to_vec(),
                user_input.to_string(),
                system_directive.map(str::to_string),
            ));
            Ok(format!("eco: {user_input}"))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(
            &self,
            _model_id: &str,
            _history: &[Entry],
            _user_input: &str,
            _system_directive: Option<&str>,
        ) -> GenerateResult<String> {
            Err(GenerateError::Failed {
                attempts: 3,
                source: RemoteError::Status {
                    status: 503,
                    message: "API error".to_string(),
                },
            })
        }
    }

    fn service(generator: Arc<dyn Generator>, max_pairs: usize) -> ChatService {
        ChatService::new(generator, "test-model", Some("Be a tutor".to_string()), max_pairs).unwrap()
    }

    // ── construction ────────────────────────────────────────────────

    #[test]
    fn max_pairs_clamped_to_minimum() {
        let svc = service(Arc::new(EchoGenerator::default()), 0);
        assert_eq!(svc.max_pairs(), MIN_HISTORY_PAIRS);
        let svc = service(Arc::new(EchoGenerator::default()), 7);
        assert_eq!(svc.max_pairs(), 7);
    }

    #[test]
    fn blank_model_rejected() {
        let result = ChatService::new(Arc::new(EchoGenerator::default()), "  ", None, 5);
        assert_matches!(result.err(), Some(GenerateError::InvalidArgument(_)));
    }

    // ── reply ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn success_appends_user_then_model() {
        let svc = service(Arc::new(EchoGenerator::default()), 5);
        let mut history = Vec::new();

        let answer = svc.reply(&mut history, "Hello").await.unwrap();

        assert_eq!(answer, "eco: Hello");
        assert_eq!(history, vec![Entry::user("Hello"), Entry::model("eco: Hello")]);
    }

    #[tokio::test]
    async fn failure_leaves_history_untouched() {
        let svc = service(Arc::new(FailingGenerator), 5);
        let mut history = vec![Entry::user("earlier"), Entry::model("answer")];

        let err = svc.reply(&mut history, "Hello").await.unwrap_err();

        assert_matches!(
            err,
            GenerateError::Failed { attempts: 3, source: RemoteError::Status { status: 503, ref message } } if message == "API error"
        );
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn empty_history_stays_empty_on_failure() {
        let svc = service(Arc::new(FailingGenerator), 5);
        let mut history = Vec::new();
        assert!(svc.reply(&mut history, "Hello").await.is_err());
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn forwards_model_directive_and_trimmed_history() {
        let generator = Arc::new(EchoGenerator::default());
        let svc = service(generator.clone(), 2);
        let mut history = Vec::new();

        for turn in ["one", "two", "three"] {
            let _ = svc.reply(&mut history, turn).await.unwrap();
        }
        let _ = svc.reply(&mut history, "four").await.unwrap();

        assert_eq!(history.len(), 8);
        let calls = generator.calls.lock().unwrap();
        let (model, sent, input, directive) = calls.last().unwrap();
        assert_eq!(model, "test-model");
        assert_eq!(input, "four");
        assert_eq!(directive.as_deref(), Some("Be a tutor"));
        // three stored pairs trimmed to the last two
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], Entry::user("two"));
        assert_eq!(sent[3], Entry::model("eco: three"));
    }

    #[tokio::test]
    async fn full_history_keeps_growing() {
        let svc = service(Arc::new(EchoGenerator::default()), 2);
        let mut history = Vec::new();
        for i in 0..6 {
            let _ = svc.reply(&mut history, &format!("q{i}")).await.unwrap();
        }
        assert_eq!(history.len(), 12);
        assert!(history.iter().step_by(2).all(|e| e.role() == Role::User));
    }

    #[tokio::test]
    async fn blank_directive_not_forwarded() {
        let generator = Arc::new(EchoGenerator::default());
        let svc = ChatService::new(generator.clone(), "m", Some("   ".to_string()), 5).unwrap();
        let _ = svc.reply(&mut Vec::new(), "hi").await.unwrap();
        assert_eq!(generator.calls.lock().unwrap()[0].3, None);
    }
}
