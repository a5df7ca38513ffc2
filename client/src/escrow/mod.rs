//! Stateless escrow accounts.
//!
//! An escrow is an account whose spending authority is a compiled program
//! rather than a private key. Its address is a pure function of the
//! program bytes, which are themselves a pure function of protocol
//! parameters, so escrows are re-derived from scratch on every operation
//! instead of being stored anywhere. Escrows are created by a one-time
//! minimum-balance transfer and never deleted, only drained.

pub mod derive;
pub mod discovery;

use serde::{Deserialize, Serialize};

use crate::identity::Address;

/// A stateless contract account: compiled program plus derived address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowAccount {
    program: Vec<u8>,
    address: Address,
}

impl EscrowAccount {
    /// Wraps compiled program bytes, deriving the account address.
    pub fn from_program(program: Vec<u8>) -> Self {
        let address = Address::for_program(&program);
        Self { program, address }
    }

    /// The escrow's ledger address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The compiled program authorizing spends from this account.
    pub fn program(&self) -> &[u8] {
        &self.program
    }
}

pub use derive::{
    borrower_escrow, escrow_from_escrow_address, investor_address_from_escrow, investor_escrow,
};
pub use discovery::open_escrows;
