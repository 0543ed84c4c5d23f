use anyhow::Result;
use tracing::info;

use crate::services::{ClientFactory, OrderService};
use futures_api::client::trade::order::OrderParams;

pub async fn handle<F: ClientFactory>(
    params: OrderParams,
    service: &OrderService<'_, F>,
) -> Result<()> {
    let response = service.place(&params).await?;

    info!(order_id = response.order_id, status = %response.status, "Order placed ✅");
    info!(?response, "Exchange response");
    Ok(())
}
