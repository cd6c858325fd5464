//! Utility helpers: handle arena, logging timers, and tick profiling.

pub mod allocator;
pub mod logging;
pub mod profiling;

pub use allocator::{Arena, SolidId};
pub use profiling::TickProfiler;
