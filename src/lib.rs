pub mod cli;
pub mod commands;
pub mod services;
pub mod settings;

use anyhow::Result;
use clap::CommandFactory;
use tracing::debug;

use cli::{Cli, UsageError};
use services::{DefaultClientFactory, OrderService};
use settings::JsonFileCredentialsStore;

/// Place the order described by `cli`.
///
/// A missing required flag is not a failure: the help is printed and the
/// function returns `Ok`.
pub async fn run(cli: Cli) -> Result<()> {
    let invocation = match cli.into_invocation() {
        Ok(invocation) => invocation,
        Err(UsageError::MissingFlag(flag)) => {
            debug!(flag, "Required flag missing, printing usage");
            Cli::command().print_help()?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let credentials_store = JsonFileCredentialsStore::new(&invocation.config_path);
    debug!(path = %credentials_store.path().display(), "Using credentials file");

    let service = OrderService::new(&credentials_store, DefaultClientFactory);
    commands::order::handle(invocation.params, &service).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("futures-order").chain(args.iter().copied());
        Cli::try_parse_from(cli::normalize_args(args)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_symbol_prints_usage_and_succeeds() {
        // The config file doesn't exist: reaching the order flow would fail.
        let cli = parse(&["-c", "/nonexistent/keys", "-s", "BUY", "-ps", "LONG", "-q", "0.01"]);

        assert!(run(cli).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_position_side_fails() {
        let cli = parse(&["-c", "keys", "-symbol", "BTCUSDT", "-s", "BUY", "-ps", "NET"]);

        let error = run(cli).await.unwrap_err();

        assert!(matches!(
            error.downcast_ref::<UsageError>(),
            Some(UsageError::InvalidValue(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_config_fails_with_config_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"{\"apiKey\": ").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["-c", &path, "-symbol", "BTCUSDT", "-s", "BUY", "-ps", "LONG", "-q", "0.01"]);

        let error = run(cli).await.unwrap_err();

        assert!(matches!(
            error.downcast_ref::<settings::ConfigError>(),
            Some(settings::ConfigError::Parse { .. })
        ));
    }
}
