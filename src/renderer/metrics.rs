use std::time::{Duration, Instant};

/// Per-phase timing breakdown for a single render.
///
/// Phases a strategy does not have are left at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Converting shapes into render items, including any sort over the
    /// whole list.
    pub flatten: Duration,
    /// Building the spatial index (spatial grid strategy only).
    pub index_build: Duration,
    /// Shading and writing pixels.
    pub tile_render: Duration,
    /// Wall-clock time of the whole render call.
    pub total: Duration,
}

impl PhaseTimings {
    /// Merge another render's timings into this accumulator.
    pub fn accumulate(&mut self, other: &Self) {
        self.flatten += other.flatten;
        self.index_build += other.index_build;
        self.tile_render += other.tile_render;
        self.total += other.total;
    }

    /// Time of the whole render in fractional milliseconds.
    pub fn total_ms(&self) -> f64 {
        self.total.as_secs_f64() * 1_000.0
    }
}

/// Records consecutive phases of one render.
#[derive(Debug)]
pub(super) struct PhaseClock {
    started_at: Instant,
    phase_started_at: Instant,
}

impl PhaseClock {
    pub(super) fn start() -> Self {
        let now = Instant::now();
        Self {
            started_at: now,
            phase_started_at: now,
        }
    }

    /// Time since the previous lap (or since `start`).
    pub(super) fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.phase_started_at);
        self.phase_started_at = now;
        elapsed
    }

    pub(super) fn total(&self) -> Duration {
        self.started_at.elapsed()
    }
}
