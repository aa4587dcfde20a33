//! Conversations domain state

use std::sync::Arc;

use threadline_llm::LlmService;
use threadline_media::MediaStorage;

use crate::pipeline::ChatPipeline;
use crate::repository::ConversationStore;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub pipeline: ChatPipeline,
    pub store: Arc<dyn ConversationStore>,
    pub media: Arc<dyn MediaStorage>,
}

impl ConversationsState {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        llm: Arc<dyn LlmService>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            pipeline: ChatPipeline::new(llm, store.clone()),
            store,
            media,
        }
    }
}
