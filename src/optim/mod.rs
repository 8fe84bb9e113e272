//! Optimizer boundary and learning rate scheduling

mod optimizer;
mod scheduler;

pub use optimizer::{
    LrMultiplierUpdater, Optimizer, ParamGroup, ParamGroupOptimizer, ParamGroupUpdater,
};
pub use scheduler::{
    BatchStepLinearWarmupLr, CosineLr, EpochStepWarmupLr, ExponentialLr, FunctionLr, LrMode,
    LrPolicy, LrState, MetricScheduler, PlateauMode, PolyLr, ReduceLrOnPlateau, ScheduleFn,
    ScheduleFnArgs, ScheduleFnRegistry, StepLr,
};
