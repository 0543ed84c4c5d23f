use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    client::{
        config::Config,
        error::{error_from_response, ClientError},
        FuturesClient,
    },
    constants::ORDER_PATH,
    types::{OrderSide, OrderType, PositionSide, TimeInForce, WorkingType},
};

use super::get_endpoint_url;

impl FuturesClient {
    /// Place a new order
    ///
    /// # Arguments
    ///
    /// * `request` - Order request, usually built with [`build_order_request`]
    ///
    /// # Returns
    ///
    /// The exchange acknowledgement, or the exchange's error code and message
    /// when the order is rejected
    pub async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, ClientError> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let query = self.signed_query(request, timestamp)?;
        let url = format!("{}?{}", get_order_url(&self.config), query);

        debug!(symbol = %request.symbol, side = %request.side, order_type = %request.order_type, "Submitting order");

        let response = self
            .client
            .post(url)
            .headers(self.get_headers())
            .send()
            .await?;

        let status_code = response.status();

        let body = response.text().await?;

        if status_code != StatusCode::OK {
            return Err(error_from_response(status_code.as_u16(), &body));
        }

        match serde_json::from_str(&body) {
            Ok(response) => Ok(response),
            Err(source) => Err(ClientError::Decode { source, body }),
        }
    }
}

fn get_order_url(config: &Config) -> String {
    get_endpoint_url(config, ORDER_PATH)
}

/// User supplied order parameters, as parsed from the command line.
///
/// Optional attributes keep the difference between "not given" (`None`) and an
/// explicit value, including an explicit `false` or empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    pub symbol: String,
    pub side: OrderSide,
    pub position_side: PositionSide,
    pub order_type: OrderType,
    pub reduce_only: Option<bool>,
    pub quantity: Option<String>,
    pub price: Option<String>,
    pub new_client_order_id: Option<String>,
    pub stop_price: Option<String>,
    pub close_position: Option<bool>,
    /// Only meaningful for `TRAILING_STOP_MARKET`
    pub activation_price: Option<String>,
    pub time_in_force: Option<TimeInForce>,
    /// Percentage, only meaningful for `TRAILING_STOP_MARKET`
    pub callback_rate: Option<String>,
    pub working_type: Option<WorkingType>,
    pub price_protect: Option<bool>,
}

impl OrderParams {
    pub fn new(
        symbol: &str,
        side: OrderSide,
        position_side: PositionSide,
        order_type: OrderType,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            position_side,
            order_type,
            reduce_only: None,
            quantity: None,
            price: None,
            new_client_order_id: None,
            stop_price: None,
            close_position: None,
            activation_price: None,
            time_in_force: None,
            callback_rate: None,
            working_type: None,
            price_protect: None,
        }
    }
}

/// Order fields as sent to the `/fapi/v1/order` endpoint.
///
/// A `None` field is left out of the request entirely, which the exchange
/// treats differently from a zero or `false` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub position_side: PositionSide,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_position: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_type: Option<WorkingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_protect: Option<bool>,
}

/// Build the request for `params`, keeping only the fields the user actually set.
///
/// Flags are sent only when `true` and text fields only when non-empty.
/// Nothing is checked across fields: price with `closePosition`, a missing
/// stop price on a stop order and the like are left for the exchange to reject.
pub fn build_order_request(params: &OrderParams) -> OrderRequest {
    OrderRequest {
        symbol: params.symbol.clone(),
        side: params.side,
        position_side: params.position_side,
        order_type: params.order_type.clone(),
        reduce_only: when_true(params.reduce_only),
        quantity: non_empty(&params.quantity),
        price: non_empty(&params.price),
        new_client_order_id: non_empty(&params.new_client_order_id),
        stop_price: non_empty(&params.stop_price),
        close_position: when_true(params.close_position),
        activation_price: non_empty(&params.activation_price),
        time_in_force: params
            .time_in_force
            .clone()
            .filter(|tif| !tif.as_str().is_empty()),
        callback_rate: non_empty(&params.callback_rate),
        working_type: params
            .working_type
            .clone()
            .filter(|working_type| !working_type.as_str().is_empty()),
        price_protect: when_true(params.price_protect),
    }
}

fn when_true(flag: Option<bool>) -> Option<bool> {
    flag.filter(|set| *set)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Acknowledgement returned by the `/fapi/v1/order` endpoint
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i64,
    pub client_order_id: String,
    pub symbol: String,
    /// Order status (e.g NEW, FILLED)
    pub status: String,
    pub side: String,
    pub position_side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub orig_type: String,
    pub time_in_force: String,
    pub price: String,
    pub avg_price: String,
    pub orig_qty: String,
    pub executed_qty: String,
    pub cum_qty: String,
    pub cum_quote: String,
    pub stop_price: String,
    pub reduce_only: bool,
    pub close_position: bool,
    pub working_type: String,
    pub price_protect: bool,
    /// Only returned for `TRAILING_STOP_MARKET` orders
    pub activate_price: Option<String>,
    /// Only returned for `TRAILING_STOP_MARKET` orders
    pub price_rate: Option<String>,
    /// Milliseconds since epoch
    pub update_time: i64,
    /// Fields not modelled above, kept so the response can be logged in full
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
