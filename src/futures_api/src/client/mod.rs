pub mod config;
pub mod error;
pub mod trade;

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;
use url::form_urlencoded;

use self::{config::Config, error::ClientError};
use crate::constants::API_KEY_HEADER;

pub struct FuturesClient {
    /// The client used to make requests to the futures REST API.
    client: reqwest::Client,
    /// Sent as-is in the API key header.
    api_key: HeaderValue,
    /// Used to sign every request, never sent.
    api_secret: String,
    pub config: Config,
}

impl FuturesClient {
    pub fn new(api_key: &str, api_secret: &str, config: Config) -> Result<FuturesClient, ClientError> {
        let mut api_key = HeaderValue::from_str(api_key)
            .map_err(|_| ClientError::InvalidCredentials("API key is not a valid header value".into()))?;
        api_key.set_sensitive(true);

        Ok(FuturesClient {
            client: reqwest::Client::builder().build()?,
            api_key,
            api_secret: api_secret.to_string(),
            config,
        })
    }

    /// Get the headers needed to make signed requests.
    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(crate::constants::USER_AGENT));
        headers.insert(API_KEY_HEADER, self.api_key.clone());

        headers
    }

    /// HMAC-SHA256 of `payload` keyed with the API secret, hex encoded.
    fn sign(&self, payload: &str) -> Result<String, ClientError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.api_secret.as_bytes())
            .map_err(|e| ClientError::InvalidCredentials(e.to_string()))?;
        mac.update(payload.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Build the full signed query string for `params`.
    ///
    /// `timestamp` and `recvWindow` are appended after the request's own
    /// parameters and the signature covers everything that precedes it.
    fn signed_query<T: Serialize>(&self, params: &T, timestamp: i64) -> Result<String, ClientError> {
        let mut query = encode_query(params)?;
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!("timestamp={timestamp}"));
        if let Some(recv_window) = self.config.recv_window {
            query.push_str(&format!("&recvWindow={recv_window}"));
        }

        let signature = self.sign(&query)?;
        query.push_str(&format!("&signature={signature}"));

        Ok(query)
    }
}

/// URL-encode the fields of a serializable struct. Absent (`None`) fields
/// are skipped, strings are sent as-is and other scalars use their JSON form.
pub(crate) fn encode_query<T: Serialize>(params: &T) -> Result<String, ClientError> {
    let fields = match serde_json::to_value(params).map_err(ClientError::Encode)? {
        Value::Object(fields) => fields,
        _ => return Ok(String::new()),
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &fields {
        match value {
            Value::Null => {}
            Value::String(value) => {
                serializer.append_pair(key, value);
            }
            other => {
                serializer.append_pair(key, &other.to_string());
            }
        }
    }

    Ok(serializer.finish())
}
