//! Cart commands.

use bazario_core::ProductId;
use bazario_storefront::Storefront;
use tracing::info;

/// Show cart contents and totals.
pub async fn show(storefront: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    storefront.cart().refresh().await?;

    let items = storefront.cart().items();
    if items.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    for item in &items {
        let owner = item
            .vendor
            .as_ref()
            .map_or("Bazario", |v| v.display_name.as_str());
        let size = item
            .selected_size
            .as_ref()
            .map(|s| format!(" (size {s})"))
            .unwrap_or_default();
        info!(
            "{} x{}{size} - {} each, sold by {owner}",
            item.title, item.quantity, item.price
        );
    }

    let stats = storefront.cart().stats();
    info!("{} item(s), total {}", stats.total_items, stats.total_price);

    let analysis = bazario_storefront::cart::analyze(&items);
    if let Some(notice) = analysis.notification {
        for line in &notice.breakdown {
            info!("  {line}");
        }
        info!("  {}", notice.estimate_hint);
    }

    Ok(())
}

/// Add a product to the cart.
pub async fn add(
    storefront: &Storefront,
    product_id: &str,
    quantity: u32,
    size: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(product_id);
    let product = storefront.api().get_product(&product_id).await?;
    storefront.cart().add_item(&product, quantity, size).await?;

    let stats = storefront.cart().stats();
    info!("Cart now has {} item(s)", stats.total_items);
    Ok(())
}

/// Remove a line from the cart.
pub async fn remove(
    storefront: &Storefront,
    product_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    storefront
        .cart()
        .remove_item(&ProductId::new(product_id))
        .await?;
    Ok(())
}

/// Set a line's quantity. Zero removes the line.
pub async fn update(
    storefront: &Storefront,
    product_id: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    storefront
        .cart()
        .update_quantity(&ProductId::new(product_id), quantity)
        .await?;
    Ok(())
}

/// Empty the cart.
pub async fn clear(storefront: &Storefront) -> Result<(), Box<dyn std::error::Error>> {
    storefront.cart().clear().await?;
    info!("Cart cleared");
    Ok(())
}
