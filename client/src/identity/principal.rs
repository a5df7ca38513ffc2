//! Protocol principals.
//!
//! Three roles interact with the matching application: the admin who
//! brokers matches, investors who fund escrows and bid, and borrowers who
//! tokenize invoices and repay. The same keypair mechanics apply to all of
//! them; the role only determines which workflow operations make sense,
//! so the variants live in one type instead of three parallel ones.

use super::address::Address;
use super::keypair::Keypair;

/// The role a principal plays in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Operates the matching application: setup, unfreeze, action, reset.
    Admin,
    /// Funds an investor escrow and bids on invoices through it.
    Investor,
    /// Tokenizes invoices, receives loans, repays them.
    Borrower,
}

/// A keypair-controlled participant with a protocol role.
///
/// A principal can sign as itself and can resolve its own escrow account
/// (investor and borrower escrows are pure functions of the principal's
/// address, see [`crate::escrow`]).
#[derive(Debug, Clone)]
pub struct Principal {
    role: Role,
    keypair: Keypair,
}

impl Principal {
    /// Wraps an existing keypair with a role.
    pub fn new(role: Role, keypair: Keypair) -> Self {
        Self { role, keypair }
    }

    /// Generates a fresh principal for the given role.
    pub fn generate(role: Role) -> Self {
        Self::new(role, Keypair::generate())
    }

    /// The principal's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The principal's ledger address.
    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    /// The underlying keypair, for signing.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}
