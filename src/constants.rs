// src/constants.rs

/// Environment variable overriding the signal sent when terminating a tree.
pub const SIGNAL_ENV: &str = "CMKIT_SIGNAL";

/// Environment variable overriding how long a signalled build may take to exit.
pub const GRACE_ENV: &str = "CMKIT_GRACE_MS";

/// Default grace period, in milliseconds, between signalling and force-killing.
pub const DEFAULT_GRACE_MS: u64 = 5000;

/// Exit code used after a user interruption, as a shell would report it.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;
