pub const BASE_URL: &str = "https://fapi.binance.com";
pub const BASE_URL_ENV: &str = "FUTURES_API_URL";
pub const ORDER_PATH: &str = "/fapi/v1/order";
pub const API_KEY_HEADER: &str = "x-mbx-apikey";
pub const USER_AGENT: &str = concat!("futures_api/", env!("CARGO_PKG_VERSION"));
