use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::settings::{Credentials, CredentialsStore};
use futures_api::client::{
    error::ClientError,
    trade::order::{build_order_request, OrderParams, OrderRequest, OrderResponse},
    FuturesClient,
};

/// Sends a built order to the exchange.
#[allow(async_fn_in_trait)]
pub trait OrderSubmitter {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderResponse, ClientError>;
}

impl OrderSubmitter for FuturesClient {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderResponse, ClientError> {
        self.create_order(request).await
    }
}

pub trait ClientFactory {
    type Client: OrderSubmitter;
    fn new_client(&self, credentials: &Credentials) -> Result<Self::Client>;
}
pub struct DefaultClientFactory;
impl ClientFactory for DefaultClientFactory {
    type Client = FuturesClient;
    fn new_client(&self, credentials: &Credentials) -> Result<FuturesClient> {
        futures_api::get_client(&credentials.api_key, &credentials.api_secret)
            .context("Failed to create the futures API client")
    }
}

pub struct OrderService<'a, F: ClientFactory> {
    credentials_store: &'a dyn CredentialsStore,
    client_factory: F,
}

impl<'a, F: ClientFactory> OrderService<'a, F> {
    pub fn new(credentials_store: &'a dyn CredentialsStore, client_factory: F) -> Self {
        Self {
            credentials_store,
            client_factory,
        }
    }

    /// Load the credentials, build the order request and submit it once.
    ///
    /// Nothing is sent when the credentials can't be loaded. A rejection by the
    /// exchange is returned as an error carrying its code and message.
    pub async fn place(&self, params: &OrderParams) -> Result<OrderResponse> {
        let credentials = self.credentials_store.load()?;

        let request = build_order_request(params);
        debug!(?request, "Order request built");

        let client = self.client_factory.new_client(&credentials)?;
        info!(
            "Placing {} {} order on {}",
            request.side, request.order_type, request.symbol
        );
        let response = client
            .submit(&request)
            .await
            .context("Order submission failed")?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ConfigError;
    use futures_api::types::{OrderSide, OrderType, PositionSide};
    use serde_json::json;
    use std::{cell::RefCell, path::PathBuf, rc::Rc};

    enum StoreContent {
        Valid,
        Malformed,
    }

    struct FakeStore(StoreContent);
    impl CredentialsStore for FakeStore {
        fn load(&self) -> Result<Credentials, ConfigError> {
            match self.0 {
                StoreContent::Valid => Ok(Credentials {
                    api_key: "key".to_string(),
                    api_secret: "secret".to_string(),
                }),
                StoreContent::Malformed => Err(ConfigError::Parse {
                    path: PathBuf::from("keys.json"),
                    source: serde_json::from_str::<Credentials>("{").unwrap_err(),
                }),
            }
        }
    }

    #[derive(Default, Clone)]
    struct Recorder {
        clients: Rc<RefCell<Vec<String>>>,
        requests: Rc<RefCell<Vec<OrderRequest>>>,
    }

    struct FakeSubmitter {
        recorder: Recorder,
        reject: bool,
    }
    impl OrderSubmitter for FakeSubmitter {
        async fn submit(&self, request: &OrderRequest) -> Result<OrderResponse, ClientError> {
            self.recorder.requests.borrow_mut().push(request.clone());
            if self.reject {
                return Err(ClientError::Api {
                    code: -2019,
                    msg: "Margin is insufficient.".to_string(),
                });
            }
            Ok(OrderResponse {
                order_id: 42,
                symbol: request.symbol.clone(),
                status: "NEW".to_string(),
                ..Default::default()
            })
        }
    }

    struct FakeFactory {
        recorder: Recorder,
        reject: bool,
    }
    impl ClientFactory for FakeFactory {
        type Client = FakeSubmitter;
        fn new_client(&self, credentials: &Credentials) -> Result<FakeSubmitter> {
            self.recorder
                .clients
                .borrow_mut()
                .push(credentials.api_key.clone());
            Ok(FakeSubmitter {
                recorder: self.recorder.clone(),
                reject: self.reject,
            })
        }
    }

    fn params() -> OrderParams {
        let mut params =
            OrderParams::new("BTCUSDT", OrderSide::Buy, PositionSide::Long, OrderType::Market);
        params.quantity = Some("0.01".to_string());
        params
    }

    #[tokio::test]
    async fn test_place_submits_built_request() {
        let recorder = Recorder::default();
        let store = FakeStore(StoreContent::Valid);
        let service = OrderService::new(
            &store,
            FakeFactory {
                recorder: recorder.clone(),
                reject: false,
            },
        );

        let response = service.place(&params()).await.unwrap();

        assert_eq!(response.order_id, 42);
        assert_eq!(recorder.clients.borrow().as_slice(), ["key".to_string()]);
        let requests = recorder.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            serde_json::to_value(&requests[0]).unwrap(),
            json!({
                "symbol": "BTCUSDT",
                "side": "BUY",
                "positionSide": "LONG",
                "type": "MARKET",
                "quantity": "0.01"
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_config_stops_before_submission() {
        let recorder = Recorder::default();
        let store = FakeStore(StoreContent::Malformed);
        let service = OrderService::new(
            &store,
            FakeFactory {
                recorder: recorder.clone(),
                reject: false,
            },
        );

        let error = service.place(&params()).await.unwrap_err();

        assert!(matches!(
            error.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse { .. })
        ));
        assert!(recorder.clients.borrow().is_empty());
        assert!(recorder.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_exchange_rejection_is_surfaced() {
        let recorder = Recorder::default();
        let store = FakeStore(StoreContent::Valid);
        let service = OrderService::new(
            &store,
            FakeFactory {
                recorder: recorder.clone(),
                reject: true,
            },
        );

        let error = service.place(&params()).await.unwrap_err();

        match error.downcast_ref::<ClientError>() {
            Some(ClientError::Api { code, msg }) => {
                assert_eq!(*code, -2019);
                assert_eq!(msg, "Margin is insufficient.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(recorder.requests.borrow().len(), 1);
    }
}
