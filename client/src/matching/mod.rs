//! Matching-application views: token discovery, pricing, stage checks.
//!
//! Everything here is read-only. The matching program itself enforces
//! the rules; these helpers let a client interpret its state without
//! submitting anything.

pub mod price;
pub mod stage;
pub mod tokens;

pub use price::{current_invoice_price, invoice_face_value, invoice_ownership_token, invoice_price};
pub use stage::{all_bids_collected, is_app_locked, is_app_reset, is_winner_found};
pub use tokens::{app_tokens, is_app_set_up, AppTokens};
