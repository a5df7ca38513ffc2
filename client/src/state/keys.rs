//! Global and local state keys of the matching and minting applications.
//!
//! Key *presence* is load-bearing: the protocol stage is encoded by which
//! of these keys currently exist on the matching application, not by any
//! client-side memory. Absence after a terminal operation (`action`,
//! `reset`) is a postcondition, not missing data.

// Matching application, global.

/// Address of the borrower whose invoice is currently in play. Present
/// from `verify` until `action`/`reset`.
pub const OWNER_ADDRESS: &str = "owner_address";

/// Address of the invoice contract account currently in play.
pub const INVOICE_ADDRESS: &str = "invoice_address";

/// Address of the escrow currently leading the auction. Present from the
/// first accepted bid until `action`/`reset`.
pub const ESCROW_ADDRESS: &str = "escrow_address";

/// Bid timestamp of the current leader. Lower wins; earliest bid takes
/// the invoice on ties in everything else.
pub const LEADING_TIMESTAMP: &str = "leading_timestamp";

/// Deadline after which an unmatched invoice may be reset. Presence of
/// this key is what "the app is locked on an invoice" means. Deleted by
/// `reset`, or after a settled match once the last bidding escrow has
/// reclaimed.
pub const BIDDING_TIMEOUT: &str = "bidding_timeout";

/// Asset id of the currency token, fixed at application creation.
pub const CURRENCY_ID: &str = "currency_id";

/// Application id of the minting application.
pub const MINTER_ID: &str = "minter_id";

/// Asset id of the identity (KYC) token.
pub const IDENTITY_TOKEN_ID: &str = "identity_token_id";

/// Total bidding-token supply held in reserve by the application.
pub const TOKEN_RESERVE_SIZE: &str = "token_reserve_size";

// Matching application, local (per escrow).

/// Owner of an investor escrow, written when the escrow opts in.
pub const INVESTOR_ADDRESS: &str = "investor_address";

/// The escrow's bid timestamp for the current auction.
pub const BID_TIMESTAMP: &str = "bid_timestamp";

/// Borrower recorded on the invoice account after a match.
pub const DEBTOR_ADDRESS: &str = "debtor_address";

// Minting application, local (per invoice).

/// Asset id of the invoice's ownership token.
pub const INVOICE_ASSET_ID: &str = "asa_id";

/// Invoice face value, in cents.
pub const INVOICE_VALUE: &str = "value";

/// Annual interest rate, scaled by [`crate::config::INTEREST_SCALE`].
pub const INVOICE_INTEREST_RATE: &str = "interest_rate";

/// Invoice due date, Unix seconds.
pub const INVOICE_DUE_DATE: &str = "due_date";

/// Invoice risk score.
pub const INVOICE_RISK_SCORE: &str = "risk_score";
