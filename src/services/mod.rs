pub mod order;

pub use order::{ClientFactory, DefaultClientFactory, OrderService, OrderSubmitter};
