//! Conversations domain: chat pipeline, transcript persistence, history

pub mod api;
pub mod domain;
pub mod pipeline;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::context::{ContextAssembler, RawTurn};
pub use domain::entities::{Conversation, ConversationSummary, MessageContext, MessageRole};
pub use domain::state::{PipelineEvent, PipelineStage, PipelineStateMachine, StateError};

// Re-export pipeline and repository types
pub use pipeline::{ChatInput, ChatPipeline};
pub use repository::{
    ConversationStore, ConversationStoreFactory, MemoryConversationStore, PgConversationStore,
};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
