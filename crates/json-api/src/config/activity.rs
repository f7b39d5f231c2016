//! Activity Feed Config

use clap::Args;

/// In-process activity feed settings.
#[derive(Debug, Args)]
pub struct ActivityConfig {
    /// Events buffered for slow listeners before the oldest are dropped.
    #[arg(long, env = "ACTIVITY_FEED_CAPACITY", default_value_t = 1024_usize)]
    pub activity_feed_capacity: usize,
}
