//! Chat completion pipeline
//!
//! Validates a chat request, assembles the context, asks the completion
//! provider for a reply, and appends the user/assistant pair to the
//! conversation. A failed completion writes nothing; a failed append is
//! reported to the caller and the generated reply is not returned.

use std::sync::Arc;

use threadline_common::{Error, Result};
use threadline_llm::{CompletionRequest, LlmMessage, LlmService};

use crate::domain::context::{ContextAssembler, RawTurn};
use crate::domain::entities::{MessageContext, MAX_CONVERSATION_ID_LENGTH, MAX_MODEL_LENGTH};
use crate::domain::state::{PipelineEvent, PipelineStage, PipelineStateMachine};
use crate::repository::ConversationStore;

/// One inbound chat exchange
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    pub conversation_id: String,
    pub message: String,
    pub model: String,
    pub attachment: Option<String>,
    pub prior_turns: Vec<RawTurn>,
}

/// Tracks the stage of a single run and logs where it failed
struct PipelineRun<'a> {
    conversation_id: &'a str,
    stage: PipelineStage,
}

impl<'a> PipelineRun<'a> {
    fn new(conversation_id: &'a str) -> Self {
        Self {
            conversation_id,
            stage: PipelineStage::Validating,
        }
    }

    fn advance(&mut self, event: PipelineEvent) -> Result<()> {
        self.stage = PipelineStateMachine::transition(self.stage, event)
            .map_err(|e| Error::Internal(e.to_string()))?;
        Ok(())
    }

    fn fail(&mut self, err: Error) -> Error {
        tracing::warn!(
            conversation_id = %self.conversation_id,
            stage = %self.stage,
            error = %err,
            "Chat pipeline failed"
        );
        if let Ok(next) = PipelineStateMachine::transition(self.stage, PipelineEvent::Fail) {
            self.stage = next;
        }
        err
    }
}

fn to_llm_message(turn: &MessageContext) -> LlmMessage {
    if turn.is_user() {
        LlmMessage::user(turn.text())
    } else {
        LlmMessage::assistant(turn.text())
    }
}

/// Orchestrates context assembly, completion and persistence
#[derive(Clone)]
pub struct ChatPipeline {
    llm: Arc<dyn LlmService>,
    store: Arc<dyn ConversationStore>,
}

impl ChatPipeline {
    pub fn new(llm: Arc<dyn LlmService>, store: Arc<dyn ConversationStore>) -> Self {
        Self { llm, store }
    }

    /// Run one chat exchange and return the assistant's reply
    pub async fn handle(&self, input: ChatInput) -> Result<String> {
        let mut run = PipelineRun::new(&input.conversation_id);

        let conversation_id = input.conversation_id.as_str();
        if conversation_id.trim().is_empty() {
            return Err(run.fail(Error::Validation(
                "conversation_id is required".to_string(),
            )));
        }
        if conversation_id.len() > MAX_CONVERSATION_ID_LENGTH {
            return Err(run.fail(Error::Validation(format!(
                "conversation_id must be at most {} characters",
                MAX_CONVERSATION_ID_LENGTH
            ))));
        }
        if input.model.len() > MAX_MODEL_LENGTH {
            return Err(run.fail(Error::Validation(format!(
                "model must be at most {} characters",
                MAX_MODEL_LENGTH
            ))));
        }
        let model = self.llm.resolve_model(&input.model);
        run.advance(PipelineEvent::Validated)?;

        let prompt = MessageContext::user(input.message.as_str(), input.attachment.clone());
        let turns = ContextAssembler::assemble(&input.prior_turns, &input.message);
        run.advance(PipelineEvent::Assembled)?;

        tracing::debug!(
            conversation_id = %conversation_id,
            model = %model,
            turns = turns.len(),
            "Requesting completion"
        );

        let request = CompletionRequest {
            model: model.clone(),
            messages: turns.iter().map(to_llm_message).collect(),
        };
        let completion = match self.llm.complete(request).await {
            Ok(response) if !response.content.is_empty() => response.content,
            Ok(_) => {
                return Err(run.fail(Error::CompletionFailed(
                    "Provider returned no completion text".to_string(),
                )))
            }
            Err(e) => return Err(run.fail(Error::CompletionFailed(e.to_string()))),
        };
        run.advance(PipelineEvent::Completed)?;

        let reply = MessageContext::reply_to(&prompt, completion.as_str());
        let delta = [prompt, reply];

        if let Err(e) = self.store.append(conversation_id, &delta, &model).await {
            tracing::error!(
                conversation_id = %conversation_id,
                model = %model,
                completion_chars = completion.chars().count(),
                error = %e,
                "Completion generated but transcript was not persisted"
            );
            return Err(run.fail(Error::PersistenceFailed(e.to_string())));
        }
        run.advance(PipelineEvent::Persisted)?;

        tracing::info!(
            conversation_id = %conversation_id,
            model = %model,
            "Chat exchange persisted"
        );

        Ok(completion)
    }
}
