//! # Protocol Configuration & Constants
//!
//! Every magic number the client relies on lives here. These values must
//! stay in lockstep with the deployed matching and minting programs; the
//! client constructs transactions the programs will re-validate, so a
//! drifted constant shows up as a rejected group, not a compile error.

// ---------------------------------------------------------------------------
// Native unit & fees
// ---------------------------------------------------------------------------

/// Minimum fee for a single transaction, in motes (the ledger's smallest
/// native unit).
pub const MIN_TXN_FEE: u64 = 1_000;

/// Flat fee carried by the funding payment of a `setup` group (2 members).
pub const SETUP_FEE: u64 = 2 * MIN_TXN_FEE;

/// Flat fee for an `unfreeze` group: 3 outer members plus the two inner
/// token transfers the program issues back to the escrow.
pub const UNFREEZE_FEE: u64 = 5 * MIN_TXN_FEE;

/// Flat fee for a `freeze` group (3 members, no inner transactions).
pub const FREEZE_FEE: u64 = 3 * MIN_TXN_FEE;

/// Flat fee for a `bid` group (2 members).
pub const BID_FEE: u64 = 2 * MIN_TXN_FEE;

/// Flat fee for an `action` group: 3 outer members plus the inner
/// ownership-token transfer and state bookkeeping.
pub const ACTION_FEE: u64 = 6 * MIN_TXN_FEE;

/// Flat fee for a `reset` call: single member plus the inner transfers
/// returning the bidding token and the ownership token.
pub const RESET_FEE: u64 = 4 * MIN_TXN_FEE;

/// Flat fee for a `verify` group (2 members).
pub const VERIFY_FEE: u64 = 2 * MIN_TXN_FEE;

/// Flat fee for a `repay` group (3 members).
pub const REPAY_FEE: u64 = 3 * MIN_TXN_FEE;

/// Flat fee for a `reclaim` call: single member plus up to two inner
/// transfers (bidding token back, or access token revoked).
pub const RECLAIM_FEE: u64 = 3 * MIN_TXN_FEE;

/// Flat fee for a `withdraw` group (2 members).
pub const WITHDRAW_FEE: u64 = 2 * MIN_TXN_FEE;

/// Worst-case fees an escrow spends across one full bidding cycle
/// (bid, lose, reclaim). Used by the reclaim spendable-balance rule.
pub const MAX_BIDDING_FEES: u64 = 4 * MIN_TXN_FEE;

// ---------------------------------------------------------------------------
// Minimum balances
// ---------------------------------------------------------------------------

/// Base reserve an investor escrow must hold to exist on the ledger with
/// its token holdings and app opt-ins.
pub const INVESTOR_ESCROW_INITIAL_BALANCE: u64 = 500_000;

/// Base reserve for a borrower escrow.
pub const BORROWER_ESCROW_MINIMUM_BALANCE: u64 = 400_000;

/// Base reserve for the matching application account itself.
pub const MATCHING_APP_MINIMUM_BALANCE: u64 = 600_000;

// ---------------------------------------------------------------------------
// Monetary arithmetic
// ---------------------------------------------------------------------------

/// Decimal scale of the currency token (6 decimal places).
pub const CURRENCY_DECIMAL_SCALE: u64 = 1_000_000;

/// Invoice values are stored on-ledger in cents.
pub const CENTS_SCALE: u64 = 100;

/// Fixed-point scale for interest rates: a rate of 5% per year is stored
/// as `0.05 * INTEREST_SCALE`.
pub const INTEREST_SCALE: u64 = 1_000_000;

/// Seconds in a (365-day) year, the denominator of the discount formula.
pub const SECONDS_IN_YEAR: u64 = 31_536_000;

// ---------------------------------------------------------------------------
// Confirmation tracking
// ---------------------------------------------------------------------------

/// Rounds to wait for a submitted transaction before raising a timeout.
pub const DEFAULT_CONFIRMATION_ROUNDS: u64 = 10;

/// Attempts per pending-transaction query before the transient failure
/// is surfaced. Backoff between attempts grows linearly in whole seconds.
pub const MAX_POLL_ATTEMPTS: usize = 5;

// ---------------------------------------------------------------------------
// Token identity
// ---------------------------------------------------------------------------

/// Asset name of the bidding token created by the matching application.
pub const BIDDING_TOKEN_NAME: &str = "FactoraBid";

/// Asset name of the access token created by the matching application.
pub const ACCESS_TOKEN_NAME: &str = "FactoraAccess";

/// Unit name of ownership tokens minted by the minting application.
pub const OWNERSHIP_TOKEN_UNIT: &str = "FC-OWN";

/// Ownership-token balance on an invoice account meaning "repaid".
/// 1 means the invoice is live; 2 is the terminal sentinel written by the
/// external program when the loan has been repaid in full.
pub const OWNERSHIP_REPAID_SENTINEL: u64 = 2;

// ---------------------------------------------------------------------------
// Escrow templates
// ---------------------------------------------------------------------------

/// Template name of the investor escrow program.
pub const INVESTOR_ESCROW_TEMPLATE: &str = "investor-escrow";

/// Template name of the borrower escrow program.
pub const BORROWER_ESCROW_TEMPLATE: &str = "borrower-escrow";

// ---------------------------------------------------------------------------
// Loan bounds
// ---------------------------------------------------------------------------

/// The numeric loan bounds baked into every investor escrow program and
/// passed as arguments of each `bid` call. The matching program rejects a
/// bid whose bounds do not cover the invoice on offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanBounds {
    /// Smallest invoice value (in currency units) the investor accepts.
    pub min_value: u64,
    /// Largest invoice value the investor accepts.
    pub max_value: u64,
    /// Shortest remaining term, in seconds.
    pub min_term: u64,
    /// Longest remaining term, in seconds.
    pub max_term: u64,
    /// Lowest acceptable annual interest rate, scaled by [`INTEREST_SCALE`].
    pub min_interest: u64,
    /// Highest acceptable risk score.
    pub max_risk: u64,
}

impl Default for LoanBounds {
    fn default() -> Self {
        Self {
            min_value: 100 * CURRENCY_DECIMAL_SCALE,
            max_value: 1_000_000 * CURRENCY_DECIMAL_SCALE,
            min_term: 7 * 24 * 3_600,
            max_term: 365 * 24 * 3_600,
            min_interest: INTEREST_SCALE / 100, // 1% per year
            max_risk: 50,
        }
    }
}
