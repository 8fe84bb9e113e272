//! Callback manager for dispatching phases to bound callbacks

use super::context::PhaseContext;
use super::phase::Phase;
use super::scheduler::LrSchedulerCallback;
use super::traits::PhaseCallback;
use crate::error::Result;
use crate::logging::{default_logger, SharedLogger};
use crate::optim::LrPolicy;

/// A callback bound to one phase
struct Binding {
    phase: Phase,
    callback: Box<dyn PhaseCallback>,
}

/// Holds (phase, callback) bindings and dispatches phases to them
///
/// Callbacks bound to the same phase run in registration order. The first
/// error aborts the remaining callbacks of that dispatch and is returned to
/// the loop.
pub struct CallbackManager {
    bindings: Vec<Binding>,
    logger: SharedLogger,
}

impl CallbackManager {
    /// Create new callback manager logging through `tracing`
    pub fn new() -> Self {
        Self::with_logger(default_logger())
    }

    /// Create new callback manager logging through `logger`
    pub fn with_logger(logger: SharedLogger) -> Self {
        Self { bindings: Vec::new(), logger }
    }

    /// Bind a callback to a phase
    pub fn register<C: PhaseCallback + 'static>(&mut self, phase: Phase, callback: C) {
        self.register_boxed(phase, Box::new(callback));
    }

    /// Bind an already boxed callback to a phase
    pub fn register_boxed(&mut self, phase: Phase, callback: Box<dyn PhaseCallback>) {
        self.logger.debug(&format!("registered {} at {phase}", callback.name()));
        self.bindings.push(Binding { phase, callback });
    }

    /// Bind a learning-rate policy to its own phase
    pub fn register_scheduler<P: LrPolicy + 'static>(&mut self, policy: P) {
        let phase = policy.phase();
        self.register(phase, LrSchedulerCallback::new(policy));
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get number of bindings across all phases
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Names of the callbacks bound to `phase`, in dispatch order
    pub fn callback_names(&self, phase: Phase) -> Vec<&'static str> {
        self.bindings.iter().filter(|b| b.phase == phase).map(|b| b.callback.name()).collect()
    }

    /// Invoke every callback bound to `phase`, in registration order
    ///
    /// # Errors
    /// Returns the first callback error; later callbacks of this phase do not
    /// run.
    pub fn dispatch(&mut self, phase: Phase, ctx: &mut PhaseContext<'_>) -> Result<()> {
        for binding in self.bindings.iter_mut().filter(|b| b.phase == phase) {
            if let Err(e) = binding.callback.on_phase(ctx) {
                self.logger.error(&format!(
                    "{} failed at {phase} (epoch {}, batch {}): {e}",
                    binding.callback.name(),
                    ctx.epoch,
                    ctx.batch_idx
                ));
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Default for CallbackManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bindings: Vec<(Phase, &'static str)> =
            self.bindings.iter().map(|b| (b.phase, b.callback.name())).collect();
        f.debug_struct("CallbackManager").field("bindings", &bindings).finish_non_exhaustive()
    }
}
