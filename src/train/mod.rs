//! Training loop plumbing
//!
//! - [`callback`]: phases, the callback manager and the built-in callbacks
//! - [`simulate`]: a model-free run of the phase sequence for previewing
//!   schedules

pub mod callback;
pub mod simulate;

pub use callback::{CallbackManager, Phase, PhaseCallback, PhaseContext};
pub use simulate::{simulate_run, LrSample};
