use std::{ffi::OsString, path::PathBuf};

use clap::Parser;
use futures_api::{
    client::trade::order::OrderParams,
    types::{OrderType, TimeInForce, ValueError, WorkingType},
};
use thiserror::Error;

/// Multi-letter flags that are also accepted with a single dash (`-symbol BTCUSDT`).
const SINGLE_DASH_LONG_FLAGS: &[&str] = &[
    "symbol", "ps", "ro", "co", "sp", "cp", "ap", "tf", "cr", "wt", "pp",
];

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the credentials JSON file (".json" is appended when the path has no extension)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Symbol of the contract (e.g: "BTCUSDT")
    #[arg(long, value_name = "SYMBOL")]
    pub symbol: Option<String>,

    /// Side of the order (BUY, SELL)
    #[arg(short = 's', long = "side", value_name = "SIDE")]
    pub side: Option<String>,

    /// Position side (BOTH, LONG, SHORT)
    #[arg(long = "ps", visible_alias = "position-side", value_name = "SIDE")]
    pub position_side: Option<String>,

    /// Order type (MARKET, LIMIT, STOP, STOP_MARKET, TAKE_PROFIT, TAKE_PROFIT_MARKET, TRAILING_STOP_MARKET)
    #[arg(short = 't', long = "type", default_value = "MARKET", value_name = "TYPE")]
    pub order_type: String,

    /// Only reduce the current position
    #[arg(
        long = "ro",
        visible_alias = "reduce-only",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub reduce_only: Option<bool>,

    /// Quantity of the order (e.g: "0.01"). Not used with close position
    #[arg(short = 'q', long = "quantity", value_name = "DECIMAL")]
    pub quantity: Option<String>,

    /// Limit price
    #[arg(short = 'p', long = "price", value_name = "DECIMAL")]
    pub price: Option<String>,

    /// Client order ID, used to track the order
    #[arg(long = "co", visible_alias = "client-order-id", value_name = "ID")]
    pub new_client_order_id: Option<String>,

    /// Trigger price of STOP, STOP_MARKET, TAKE_PROFIT and TAKE_PROFIT_MARKET orders
    #[arg(long = "sp", visible_alias = "stop-price", value_name = "DECIMAL")]
    pub stop_price: Option<String>,

    /// Close the whole position, used with STOP_MARKET and TAKE_PROFIT_MARKET
    #[arg(
        long = "cp",
        visible_alias = "close-position",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub close_position: Option<bool>,

    /// Activation price of TRAILING_STOP_MARKET orders
    #[arg(long = "ap", visible_alias = "activation-price", value_name = "DECIMAL")]
    pub activation_price: Option<String>,

    /// Time in force (GTC, IOC, FOK, GTX)
    #[arg(long = "tf", visible_alias = "time-in-force", value_name = "TIF")]
    pub time_in_force: Option<String>,

    /// Callback rate in percent of TRAILING_STOP_MARKET orders
    #[arg(long = "cr", visible_alias = "callback-rate", value_name = "PERCENT")]
    pub callback_rate: Option<String>,

    /// Price triggering stop orders (MARK_PRICE, CONTRACT_PRICE)
    #[arg(long = "wt", visible_alias = "working-type", value_name = "TYPE")]
    pub working_type: Option<String>,

    /// Price protection of conditional orders
    #[arg(
        long = "pp",
        visible_alias = "price-protect",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub price_protect: Option<bool>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing required flag -{0}")]
    MissingFlag(&'static str),
    #[error(transparent)]
    InvalidValue(#[from] ValueError),
}

/// Everything needed to place one order: where the credentials live and what to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub config_path: PathBuf,
    pub params: OrderParams,
}

impl Cli {
    /// Check the required flags and turn the remaining ones into order parameters.
    ///
    /// Only the config path, symbol, side, position side and order type are
    /// checked. The other fields are passed along as given.
    pub fn into_invocation(self) -> Result<Invocation, UsageError> {
        let config_path = required(self.config.as_deref(), "c")?;
        let symbol = required(self.symbol.as_deref(), "symbol")?;
        let side = required(self.side.as_deref(), "s")?;
        let position_side = required(self.position_side.as_deref(), "ps")?;
        let order_type = required(Some(self.order_type.as_str()), "t")?;

        let mut params = OrderParams::new(
            symbol,
            side.parse()?,
            position_side.parse()?,
            OrderType::from(order_type),
        );
        params.reduce_only = self.reduce_only;
        params.quantity = self.quantity;
        params.price = self.price;
        params.new_client_order_id = self.new_client_order_id;
        params.stop_price = self.stop_price;
        params.close_position = self.close_position;
        params.activation_price = self.activation_price;
        params.time_in_force = self.time_in_force.as_deref().map(TimeInForce::from);
        params.callback_rate = self.callback_rate;
        params.working_type = self.working_type.as_deref().map(WorkingType::from);
        params.price_protect = self.price_protect;

        Ok(Invocation {
            config_path: PathBuf::from(config_path),
            params,
        })
    }
}

fn required<'a>(value: Option<&'a str>, flag: &'static str) -> Result<&'a str, UsageError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(UsageError::MissingFlag(flag)),
    }
}

/// Rewrite single-dash multi-letter flags (`-symbol`, `-ps=LONG`) to their
/// double-dash form so clap doesn't read them as bundled short flags.
/// Arguments after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut positional_only = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if positional_only {
                return arg;
            }
            if arg == "--" {
                positional_only = true;
                return arg;
            }
            let rewritten = arg
                .to_str()
                .filter(|flag| is_single_dash_long_flag(flag))
                .map(|flag| OsString::from(format!("-{flag}")));
            rewritten.unwrap_or(arg)
        })
        .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    let Some(name) = arg.strip_prefix('-') else {
        return false;
    };
    if name.starts_with('-') {
        return false;
    }
    let name = name.split_once('=').map_or(name, |(name, _)| name);
    SINGLE_DASH_LONG_FLAGS.contains(&name)
}
