//! Order service methods on [`ApiClient`].

use reqwest::Method;
use tracing::instrument;

use crate::checkout::orchestrator::OrderSubmission;

use super::types::OrderConfirmation;
use super::{ApiClient, ApiError, OrderService};

impl OrderService for ApiClient {
    #[instrument(skip(self, order), fields(order_type = %order.summary.order_type))]
    async fn create_order(&self, order: &OrderSubmission) -> Result<OrderConfirmation, ApiError> {
        self.request(Method::POST, "orders", Some(order)).await
    }
}
