pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "futures-order";
pub const APP_NAME: &str = "futures-order";

pub const DEFAULT_CONFIG_EXTENSION: &str = "json";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_FILE: &str = "futures-order.log";
