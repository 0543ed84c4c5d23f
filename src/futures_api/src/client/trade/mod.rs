pub mod order;

use super::config::Config;

fn get_endpoint_url(config: &Config, path: &str) -> String {
    format!("{}{}", config.base_url, path)
}
