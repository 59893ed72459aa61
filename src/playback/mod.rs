pub mod clock;
pub mod driver;
pub mod player;
pub mod resolver;
pub mod sequencer;

use std::time::Duration;

/// Interval between media position ticks
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
