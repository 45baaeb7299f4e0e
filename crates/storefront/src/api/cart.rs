//! Cart service methods on [`ApiClient`].

use reqwest::Method;
use tracing::instrument;

use bazario_core::ProductId;

use crate::cart::LineItem;

use super::types::{AddToCartRequest, UpdateCartItemRequest, WireCart};
use super::{ApiClient, ApiError, CartService};

impl CartService for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Vec<LineItem>, ApiError> {
        let cart: WireCart = self.get("cart").await?;
        Ok(cart.normalize())
    }

    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
        selected_size: Option<&str>,
    ) -> Result<Vec<LineItem>, ApiError> {
        let body = AddToCartRequest {
            product_id: product_id.as_str(),
            quantity,
            selected_size,
        };
        let cart: WireCart = self
            .request(Method::POST, "cart/items", Some(&body))
            .await?;
        Ok(cart.normalize())
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_from_cart(&self, product_id: &ProductId) -> Result<Vec<LineItem>, ApiError> {
        let cart: WireCart = self
            .request::<WireCart, ()>(
                Method::DELETE,
                &format!("cart/items/{product_id}"),
                None,
            )
            .await?;
        Ok(cart.normalize())
    }

    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<LineItem>, ApiError> {
        let body = UpdateCartItemRequest { quantity };
        let cart: WireCart = self
            .request(
                Method::PATCH,
                &format!("cart/items/{product_id}"),
                Some(&body),
            )
            .await?;
        Ok(cart.normalize())
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<(), ApiError> {
        // The clear endpoint returns an empty object.
        let _: serde_json::Value = self.request::<_, ()>(Method::DELETE, "cart", None).await?;
        Ok(())
    }
}
