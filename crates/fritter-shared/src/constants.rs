/// Application name
pub const APP_NAME: &str = "Fritter";

/// Maximum freet length in characters
pub const MAX_FREET_LENGTH: usize = 140;

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 140;

/// Maximum feed name length in characters
pub const MAX_FEED_NAME_LENGTH: usize = 50;

/// Maximum username length in characters
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Request header carrying the session user's id, set by the upstream
/// session layer.
pub const SESSION_HEADER: &str = "x-session-user";

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default maximum request body size in bytes (64 KiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// Display dates read like `October 19th 2026, 3:04:05 pm`: the month, the
/// day with its ordinal suffix, then this `chrono` format for the rest.
pub const DATE_TAIL_FORMAT: &str = "%Y, %-I:%M:%S %P";
