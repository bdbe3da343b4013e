pub mod datetime;
pub mod deferred;
pub mod log_ticks;
pub mod numeric;
pub mod stack;
pub mod types;

pub use datetime::{
    NormalizedTimeInterval, TimeTickInfo, TimeTicks, TimeUnit, TimeUnitRule, TimeZoneMode,
};
pub use deferred::DeferredTasks;
pub use log_ticks::{LogTickRequest, LogTicks};
pub use stack::{StackItem, StackKey, StackSeries, Stacks, StackingMode};
pub use types::{PlotArea, Viewport};
