use std::time::{Duration, Instant};

/// Per-tick counters and timings collected by the world.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickProfiler {
    pub flush_time: Duration,
    pub motion_time: Duration,
    pub total_tick_time: Duration,

    pub solid_count: usize,
    pub resets_flushed: usize,
    pub moves_resolved: usize,
    pub moves_blocked: usize,
    pub pushes_attempted: usize,
    pub pushes_rolled_back: usize,
    pub index_queries: usize,
}

impl TickProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self) {
        let total_us = self.total_tick_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "tick: {} solids, {} resets, {} moves ({} blocked), {} pushes ({} rolled back), {} queries",
            self.solid_count,
            self.resets_flushed,
            self.moves_resolved,
            self.moves_blocked,
            self.pushes_attempted,
            self.pushes_rolled_back,
            self.index_queries
        );
        log::debug!(
            "tick: total {:.2} ms, flush {:.2} ms ({:.1}%), motion {:.2} ms ({:.1}%)",
            self.total_tick_time.as_secs_f32() * 1000.0,
            self.flush_time.as_secs_f32() * 1000.0,
            (self.flush_time.as_micros() as f32 / total_us) * 100.0,
            self.motion_time.as_secs_f32() * 1000.0,
            (self.motion_time.as_micros() as f32 / total_us) * 100.0
        );
    }
}

/// Accumulates the elapsed time of a scope into a profiler field.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
