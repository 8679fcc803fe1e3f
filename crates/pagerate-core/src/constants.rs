//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

use std::time::Duration;

/// Scroll tracking
pub mod scroll {
    use super::*;

    /// Quiet period after the last scroll event before visibility is recomputed
    pub const DEBOUNCE: Duration = Duration::from_millis(50);

    /// Duration of an animated scroll-to-page; visibility is frozen meanwhile
    pub const SETTLE: Duration = Duration::from_millis(600);

    /// Shortest allowed settle window
    pub const MIN_SETTLE: Duration = Duration::from_millis(300);

    /// Longest allowed settle window
    pub const MAX_SETTLE: Duration = Duration::from_millis(800);

    /// Wheel/swipe delta (rows) that must be exceeded to snap one page
    pub const SNAP_THRESHOLD: f64 = 2.0;
}

/// Rating flow timing
pub mod flow {
    use super::*;

    /// Confirmation time for the popup flow before returning to idle
    pub const POPUP_RESET: Duration = Duration::from_secs(2);

    /// Confirmation time for the wizard flow before returning to idle
    pub const WIZARD_RESET: Duration = Duration::from_secs(3);

    /// Confirmation time for the inline sidebar flow
    pub const INLINE_RESET: Duration = Duration::from_secs(2);
}

/// Storage keys, one per presentation mode
pub mod keys {
    /// Per-page records written by the popup flow
    pub const POPUP: &str = "pageFeedback";

    /// Ordered session log written by the wizard flow
    pub const WIZARD: &str = "integratedFeedback";

    /// Per-page records written by the inline sidebar flow
    pub const INLINE: &str = "detailedFeedback";
}

/// Filesystem layout
pub mod fs {
    /// Config and data directory name
    pub const APP_DIR_NAME: &str = "pagerate";

    /// SQLite database file name
    pub const DATABASE_FILE: &str = "pagerate.db";

    /// Config file name
    pub const CONFIG_FILE: &str = "config.toml";

    /// Log file name
    pub const LOG_FILE: &str = "pagerate.log";
}
