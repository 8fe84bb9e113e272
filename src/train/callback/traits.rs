//! Core trait for phase callbacks

use super::context::PhaseContext;
use crate::error::Result;

/// Trait for callbacks bound to a phase of the training loop
///
/// A callback is invoked once per dispatch of every phase it was registered
/// for. Returning an error aborts the rest of that dispatch.
pub trait PhaseCallback: Send {
    /// Run the callback against the current context
    fn on_phase(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()>;

    /// Get callback name for logging
    fn name(&self) -> &'static str {
        "PhaseCallback"
    }
}
