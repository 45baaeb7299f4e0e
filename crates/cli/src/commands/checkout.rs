//! Checkout commands.

use bazario_core::{PaymentMethod, ProductId};
use bazario_storefront::Storefront;
use bazario_storefront::cart::LineItem;
use clap::Args;
use tracing::info;

/// Arguments for the checkout wizard.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Check out the buy-now snapshot instead of the cart
    #[arg(long)]
    pub buy_now: bool,

    /// Full name
    #[arg(long)]
    pub name: String,

    /// Contact email (the session email wins for signed-in shoppers)
    #[arg(long)]
    pub email: String,

    /// Contact phone
    #[arg(long)]
    pub phone: String,

    /// Street address
    #[arg(long)]
    pub street: String,

    /// City
    #[arg(long)]
    pub city: String,

    /// Province or state
    #[arg(long)]
    pub state: String,

    /// Postal code
    #[arg(long)]
    pub zip: String,

    /// Country
    #[arg(long, default_value = "Pakistan")]
    pub country: String,

    /// Payment method (card, bank, wallet, cash)
    #[arg(long, default_value = "cash")]
    pub method: PaymentMethod,
}

/// Save a buy-now snapshot for a product.
pub async fn save_buy_now(
    storefront: &Storefront,
    product_id: &str,
    quantity: u32,
    size: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(product_id);
    let product = storefront.api().get_product(&product_id).await?;

    bazario_storefront::stock::check_quantity(product.available_stock(size), quantity)?;

    let item = LineItem {
        product_id,
        title: product.title.clone(),
        price: product.price,
        shipping_cost: product.shipping_cost,
        image: product.image.clone(),
        stock: product.available_stock(size),
        quantity,
        selected_size: size.map(str::to_owned),
        vendor: product.vendor_ref(),
    };

    storefront.buy_now().save(&item)?;
    info!("Saved buy-now snapshot for {}", product.title);
    Ok(())
}

/// Walk the wizard and submit the order.
pub async fn run(
    storefront: &Storefront,
    args: CheckoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut checkout = storefront.begin_checkout();

    let form = checkout.form_mut();
    form.customer.name = args.name;
    form.customer.email = args.email;
    form.customer.phone = args.phone;
    form.address.street = args.street;
    form.address.city = args.city;
    form.address.state = args.state;
    form.address.zip = args.zip;
    form.address.country = args.country;
    form.payment_method = args.method;

    // Walk customer info -> address -> payment -> review. Any invalid
    // step surfaces its field errors and stops here.
    while checkout.step().next().is_some() {
        checkout.advance()?;
    }

    let order_number = if args.buy_now {
        let Some(item) = storefront.buy_now().take()? else {
            return Err("No buy-now snapshot saved; run `bazario buy-now <product-id>` first".into());
        };
        checkout.submit_items(&[item]).await?
    } else {
        storefront.cart().refresh().await?;
        checkout.submit(storefront.cart()).await?
    };

    info!("Order placed: {order_number}");
    Ok(())
}
