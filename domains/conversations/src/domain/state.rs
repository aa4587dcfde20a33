//! State machine for a single chat pipeline run
//!
//! Validating → Assembling → Completing → Persisting → Done, with Failed
//! reachable from every non-terminal stage. No stage is ever revisited.

pub use threadline_common::StateError;
use serde::{Deserialize, Serialize};

/// Pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Validating,
    Assembling,
    Completing,
    Persisting,
    Done,
    Failed,
}

impl PipelineStage {
    /// Check if this is a terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Get all valid next stages from the current stage
    pub fn valid_transitions(&self) -> &'static [PipelineStage] {
        match self {
            Self::Validating => &[Self::Assembling, Self::Failed],
            Self::Assembling => &[Self::Completing, Self::Failed],
            Self::Completing => &[Self::Persisting, Self::Failed],
            Self::Persisting => &[Self::Done, Self::Failed],
            Self::Done | Self::Failed => &[],
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::Assembling => write!(f, "assembling"),
            Self::Completing => write!(f, "completing"),
            Self::Persisting => write!(f, "persisting"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Events that move a pipeline run forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEvent {
    Validated,
    Assembled,
    Completed,
    Persisted,
    Fail,
}

impl std::fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validated => write!(f, "validated"),
            Self::Assembled => write!(f, "assembled"),
            Self::Completed => write!(f, "completed"),
            Self::Persisted => write!(f, "persisted"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Pipeline state machine
pub struct PipelineStateMachine;

impl PipelineStateMachine {
    /// Attempt a stage transition
    pub fn transition(
        current: PipelineStage,
        event: PipelineEvent,
    ) -> Result<PipelineStage, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (current, event) {
            (_, PipelineEvent::Fail) => PipelineStage::Failed,
            (PipelineStage::Validating, PipelineEvent::Validated) => PipelineStage::Assembling,
            (PipelineStage::Assembling, PipelineEvent::Assembled) => PipelineStage::Completing,
            (PipelineStage::Completing, PipelineEvent::Completed) => PipelineStage::Persisting,
            (PipelineStage::Persisting, PipelineEvent::Persisted) => PipelineStage::Done,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }
}
