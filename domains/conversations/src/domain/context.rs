//! Context assembly: client-supplied prior turns plus the new message

use serde::{Deserialize, Serialize};

use super::entities::MessageContext;

/// A prior turn as submitted by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTurn {
    pub is_user: bool,
    #[serde(default)]
    pub text: String,
}

impl RawTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            is_user: true,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            is_user: false,
            text: text.into(),
        }
    }
}

/// Builds the ordered turn sequence sent to the completion provider
pub struct ContextAssembler;

impl ContextAssembler {
    /// Prior turns in the order given, minus those with empty text, followed
    /// by `new_message` as the single trailing user turn. The new message is
    /// kept even when empty.
    pub fn assemble(prior_turns: &[RawTurn], new_message: &str) -> Vec<MessageContext> {
        let mut turns: Vec<MessageContext> = prior_turns
            .iter()
            .filter(|turn| !turn.text.is_empty())
            .map(|turn| {
                if turn.is_user {
                    MessageContext::user(turn.text.clone(), None)
                } else {
                    MessageContext::assistant(turn.text.clone())
                }
            })
            .collect();

        turns.push(MessageContext::user(new_message, None));
        turns
    }
}
