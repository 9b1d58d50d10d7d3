//! Application-wide constants

pub const SESSION_COOKIE_NAME: &str = "session";
/// Seven days. Advisory only: the registry never checks it unless expiry
/// enforcement is switched on.
pub const SESSION_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;
/// 400 days, the longest Max-Age browsers honor.
pub const SESSION_MAX_AGE_CEILING_SECS: i64 = 60 * 60 * 24 * 400;
pub const SESSION_PURGE_INTERVAL_SECS: u64 = 300;
pub const SESSION_TOKEN_BYTES: usize = 32;
pub const MIN_PASSWORD_LENGTH: u64 = 8;

pub const DEFAULT_USERS_PATH: &str = "/tmp/users.json";

pub const REDIRECT_AFTER_AUTH: &str = "/dashboard";
pub const REDIRECT_AFTER_LOGOUT: &str = "/login";

pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_COMMAND_MAX_OUTPUT_BYTES: usize = 1024 * 1024;
pub const DEFAULT_COMMAND_MAX_ARGS: usize = 8;
pub const DEFAULT_ALLOWED_PROGRAMS: &[&str] = &["uptime", "hostname", "date", "uname", "df", "free"];

/// Arguments each default program may take. Only read-only flags; nothing
/// positional, so `hostname NAME` or `date -s ...` never validate.
pub const DEFAULT_ALLOWED_ARGS: &[(&str, &[&str])] = &[
    ("uptime", &["-p", "-s"]),
    ("hostname", &["-f", "-s", "-i"]),
    ("date", &["-u", "-R", "-I"]),
    ("uname", &["-a", "-s", "-r", "-m", "-n", "-v"]),
    ("df", &["-h", "-k", "-T", "-i", "-P"]),
    ("free", &["-h", "-b", "-k", "-m", "-g"]),
];
