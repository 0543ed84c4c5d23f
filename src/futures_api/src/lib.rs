pub mod client;
pub mod constants;
pub mod types;

use client::{config::Config, error::ClientError, FuturesClient};

pub fn get_client(api_key: &str, api_secret: &str) -> Result<FuturesClient, ClientError> {
    FuturesClient::new(api_key, api_secret, Config::from_env())
}
