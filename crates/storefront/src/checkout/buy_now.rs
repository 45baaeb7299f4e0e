//! Buy-now snapshot persistence.
//!
//! Quick-buy sites write a single-item snapshot so a shopper can skip the
//! cart and go straight to checkout. The snapshot is stored as JSON on
//! disk (the client-storage analog) and is consumed when checkout entry
//! reads it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::LineItem;

/// Errors reading or writing the snapshot file.
#[derive(Debug, Error)]
pub enum BuyNowError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    item: LineItem,
    saved_at: DateTime<Utc>,
}

/// Single-item snapshot store at a fixed path.
#[derive(Debug, Clone)]
pub struct BuyNowStore {
    path: PathBuf,
}

impl BuyNowStore {
    /// A store over the given snapshot path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the snapshot with the given item.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, item: &LineItem) -> Result<(), BuyNowError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot {
            item: item.clone(),
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&snapshot)?)?;
        Ok(())
    }

    /// Read the snapshot without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a corrupt snapshot file.
    pub fn peek(&self) -> Result<Option<LineItem>, BuyNowError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        Ok(Some(snapshot.item))
    }

    /// Read and consume the snapshot. Checkout entry uses this so a
    /// completed (or abandoned) quick-buy does not resurface later.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a corrupt snapshot file.
    pub fn take(&self) -> Result<Option<LineItem>, BuyNowError> {
        let item = self.peek()?;
        if item.is_some() {
            fs::remove_file(&self.path)?;
        }
        Ok(item)
    }

    /// Remove the snapshot if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn discard(&self) -> Result<(), BuyNowError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use bazario_core::ProductId;

    use super::*;

    fn store() -> BuyNowStore {
        let path = std::env::temp_dir()
            .join("bazario-tests")
            .join(format!("buy_now_{}.json", uuid::Uuid::new_v4().simple()));
        BuyNowStore::new(path)
    }

    fn item() -> LineItem {
        LineItem {
            product_id: ProductId::new("p1"),
            title: "Sindhi Ajrak".to_string(),
            price: Decimal::from(1800),
            shipping_cost: Decimal::ZERO,
            image: None,
            stock: 5,
            quantity: 1,
            selected_size: None,
            vendor: None,
        }
    }

    #[test]
    fn test_take_on_missing_snapshot_is_none() {
        assert!(store().take().unwrap().is_none());
    }

    #[test]
    fn test_save_then_take_consumes() {
        let store = store();
        store.save(&item()).unwrap();

        let taken = store.take().unwrap().unwrap();
        assert_eq!(taken.product_id.as_str(), "p1");

        // Consumed: a second read finds nothing.
        assert!(store.take().unwrap().is_none());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let store = store();
        store.save(&item()).unwrap();

        assert!(store.peek().unwrap().is_some());
        assert!(store.peek().unwrap().is_some());

        store.discard().unwrap();
        assert!(store.peek().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let store = store();
        store.save(&item()).unwrap();

        let mut second = item();
        second.product_id = ProductId::new("p2");
        store.save(&second).unwrap();

        let taken = store.take().unwrap().unwrap();
        assert_eq!(taken.product_id.as_str(), "p2");
    }
}
