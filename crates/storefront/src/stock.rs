//! Pure stock-availability checks.
//!
//! These run client-side against the stock snapshot taken when a product
//! was loaded; the cart service remains authoritative and its rejections
//! are surfaced separately as `StockExceeded`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-size availability for a size-variant product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeStock {
    pub size: String,
    pub stock: u32,
}

/// A requested quantity cannot be satisfied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockError {
    /// Fewer units available than requested.
    #[error("only {available} left in stock (requested {requested})")]
    Insufficient { available: u32, requested: u32 },
    /// The selected size is not offered for this product.
    #[error("size {size} is not available for this product")]
    UnknownSize { size: String },
}

/// Check a requested quantity against overall availability.
///
/// # Errors
///
/// Returns `StockError::Insufficient` when `requested > available`.
pub const fn check_quantity(available: u32, requested: u32) -> Result<(), StockError> {
    if requested > available {
        return Err(StockError::Insufficient {
            available,
            requested,
        });
    }
    Ok(())
}

/// Check a requested quantity against per-size availability.
///
/// # Errors
///
/// Returns `StockError::UnknownSize` when the selected size is not listed,
/// or `StockError::Insufficient` when that size has too few units.
pub fn check_size_quantity(
    sizes: &[SizeStock],
    selected: &str,
    requested: u32,
) -> Result<(), StockError> {
    let entry = sizes
        .iter()
        .find(|s| s.size == selected)
        .ok_or_else(|| StockError::UnknownSize {
            size: selected.to_owned(),
        })?;

    check_quantity(entry.stock, requested)
}
