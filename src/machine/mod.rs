//! The machine engine and its operation surface.

mod engine;
mod error;
mod result;

pub use engine::StateMachine;
pub use error::DefinitionError;
pub use result::TransitionResult;
