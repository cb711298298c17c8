use std::ops::ControlFlow;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

use crate::predict::error::PredictError;

/// Fixed-step clock: samples at `start`, `start + step`, … for `samples` ticks.
///
/// An optional wall-clock deadline bounds the whole run; it is checked before each tick.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    start: DateTime<Utc>,
    step: Duration,
    samples: usize,
    deadline: Option<Instant>,
}

impl Sampler {
    pub fn new(start: DateTime<Utc>, step: Duration, samples: usize) -> Self {
        Self {
            start,
            step,
            samples,
            deadline: None,
        }
    }

    /// Samples covering `[start, start + horizon]`, both ends included.
    pub fn inclusive(start: DateTime<Utc>, step: Duration, horizon: Duration) -> Self {
        Self::new(start, step, ticks_in(horizon, step) + 1)
    }

    /// Samples covering `[start, start + horizon)`.
    pub fn exclusive(start: DateTime<Utc>, step: Duration, horizon: Duration) -> Self {
        Self::new(start, step, ticks_in(horizon, step))
    }

    pub fn deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Instant of the last tick, or `start` when there are none.
    pub fn last(&self) -> DateTime<Utc> {
        self.at(self.samples.saturating_sub(1))
    }

    /// Instant of tick `index`, saturating at the latest representable time.
    pub fn at(&self, index: usize) -> DateTime<Utc> {
        let ticks = i64::try_from(index).unwrap_or(i64::MAX);
        self.step
            .num_milliseconds()
            .checked_mul(ticks)
            .and_then(Duration::try_milliseconds)
            .and_then(|offset| self.start.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Call `on_tick` for each tick until it breaks or the ticks run out.
    ///
    /// Returns the break value, or `None` when every tick was visited.
    pub fn run<B, F>(&self, mut on_tick: F) -> Result<Option<B>, PredictError>
    where
        F: FnMut(usize, DateTime<Utc>) -> Result<ControlFlow<B>, PredictError>,
    {
        let mut cursor = self.start;
        for index in 0..self.samples {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(PredictError::ScanTimeout { samples: index });
                }
            }
            if let ControlFlow::Break(value) = on_tick(index, cursor)? {
                return Ok(Some(value));
            }
            cursor += self.step;
        }
        Ok(None)
    }
}

fn ticks_in(horizon: Duration, step: Duration) -> usize {
    let step_ms = step.num_milliseconds();
    if step_ms <= 0 || horizon <= Duration::zero() {
        return 0;
    }
    (horizon.num_milliseconds() / step_ms) as usize
}
