/// Canonical text layouts shared across crates
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MONTH_FORMAT: &str = "%Y-%m";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATETIME_FORMAT: &str = const_str::concat!(DATE_FORMAT, " ", TIME_FORMAT);

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const CONFIG_FILE_STEM: &str = "config";
