//! Protocol workflows.
//!
//! [`MatchingClient`] is the single entry point for every named protocol
//! operation. Each operation follows the same five-step shape: read the
//! current ids and addresses from ledger state, derive the escrows
//! involved, build the minimal operation set, submit it atomically, and
//! await confirmation. The controller keeps no state of its own between
//! calls; everything it needs lives on the ledger and is read fresh.
//!
//! Operations are grouped by the principal who drives them:
//! admin ([`admin`]), investor ([`investor`]), borrower ([`borrower`]).

mod admin;
mod borrower;
mod client;
mod investor;

pub use client::MatchingClient;

use crate::escrow::EscrowAccount;
use crate::identity::{Address, Principal};
use crate::transaction::Signer;

/// A transaction-authorizing party: either a keypair-controlled
/// principal or a stateless escrow account.
///
/// The verify and repay flows are identical whether the borrower acts
/// directly or through their escrow; this is the seam that makes one
/// implementation serve both.
#[derive(Debug, Clone, Copy)]
pub enum Party<'a> {
    /// A principal signing with their own keypair.
    Key(&'a Principal),
    /// An escrow authorizing with its program.
    Escrow(&'a EscrowAccount),
}

impl<'a> Party<'a> {
    /// The address this party spends from.
    pub fn address(&self) -> Address {
        match self {
            Party::Key(principal) => principal.address(),
            Party::Escrow(escrow) => escrow.address(),
        }
    }

    /// The signer bound to this party's address.
    pub fn signer(&self) -> Signer<'a> {
        match self {
            Party::Key(principal) => Signer::Key(principal.keypair()),
            Party::Escrow(escrow) => Signer::Logic(escrow),
        }
    }
}
