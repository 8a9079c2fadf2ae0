use std::time::Duration;

use rand::Rng;

use crate::error::{Error, Result};

/// An inclusive range of milliseconds to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min_ms: u64,
    max_ms: u64,
}

impl DelayRange {
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self> {
        if min_ms > max_ms {
            return Err(Error::InvalidDelayRange { min_ms, max_ms });
        }
        Ok(Self { min_ms, max_ms })
    }

    pub const fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    pub fn min_ms(&self) -> u64 {
        self.min_ms
    }

    pub fn max_ms(&self) -> u64 {
        self.max_ms
    }

    fn sample(&self) -> Duration {
        let ms = if self.min_ms == self.max_ms {
            self.min_ms
        } else {
            rand::thread_rng().gen_range(self.min_ms..=self.max_ms)
        };
        Duration::from_millis(ms)
    }
}

/// Randomized waits between UI actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// Added to every sampled delay.
    pub floor: Duration,
    /// After clicking an icon to open its detail popup.
    pub popup: DelayRange,
    /// Between the click / add / close steps for one icon.
    pub action: DelayRange,
    /// Between scrolls while loading the icon grid.
    pub scroll: DelayRange,
    /// After submitting a new collection name.
    pub collection: DelayRange,
}

impl Pacing {
    /// No waiting at all.
    pub fn none() -> Self {
        Self {
            floor: Duration::ZERO,
            popup: DelayRange::fixed(0),
            action: DelayRange::fixed(0),
            scroll: DelayRange::fixed(0),
            collection: DelayRange::fixed(0),
        }
    }

    /// The wait `pause` would perform for `range`, sampled fresh.
    pub fn delay_for(&self, range: DelayRange) -> Duration {
        self.floor + range.sample()
    }

    pub async fn pause(&self, range: DelayRange) {
        let delay = self.delay_for(range);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            floor: Duration::from_millis(50),
            popup: DelayRange { min_ms: 280, max_ms: 320 },
            action: DelayRange { min_ms: 200, max_ms: 300 },
            scroll: DelayRange { min_ms: 400, max_ms: 600 },
            collection: DelayRange { min_ms: 500, max_ms: 700 },
        }
    }
}
