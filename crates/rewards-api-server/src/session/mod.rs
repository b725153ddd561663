pub mod registry;
pub mod sweeper;

pub use registry::{SessionCounters, SessionError, SessionRegistry};

use std::time::Duration;

/// Idle time after which a session is purged. Fixed, not runtime-tunable.
pub const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// How often the background sweep scans the registry.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
