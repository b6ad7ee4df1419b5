// Poller timing constants

use std::time::Duration;

/// Fixed delay between status fetches for a non-terminal job
pub const POLL_INTERVAL: Duration = Duration::from_millis(4000);
