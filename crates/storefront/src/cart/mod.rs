//! Cart state and analysis.
//!
//! [`store::CartStore`] is the single source of truth for cart contents,
//! reconciled against the remote cart service for authenticated sessions.
//! [`analyzer::analyze`] is the pure classification pass that decomposes a
//! cart by fulfillment owner for multi-vendor orders.

pub mod analyzer;
pub mod line_item;
pub mod store;

pub use analyzer::{AnalysisSummary, CartAnalysis, DeliveryNotice, VendorGroup, analyze};
pub use line_item::{LineItem, VendorRef};
pub use store::{CartStats, CartStore};
