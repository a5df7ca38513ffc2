//! Construction of single ledger operations.
//!
//! A [`TxnFactory`] is loaded with one set of [`SuggestedParams`] and
//! stamps out individual, independently-valid operations: plain payments,
//! asset transfers (amount 0 against yourself is the opt-in idiom),
//! application calls and application opt-ins. Everything leaves the
//! factory unsigned and ungrouped; grouping and signing happen in
//! [`super::group`].
//!
//! The transaction id is the SHA-256 of the canonical byte serialization,
//! which *includes* the group id. Ids are therefore only final once a
//! transaction has been assigned to its group (or is known to stay
//! ungrouped).

use serde::{Deserialize, Serialize};

use crate::identity::Address;
use crate::ledger::types::{AppId, AssetId, Round, SuggestedParams};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// What happens when an application call completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnComplete {
    /// Plain call into the program.
    NoOp,
    /// Allocate local state for the sender under the application.
    OptIn,
}

/// The operation a transaction performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnKind {
    /// Native-unit payment.
    Payment {
        /// Receiving account.
        receiver: Address,
        /// Amount in motes.
        amount: u64,
    },
    /// Fungible asset transfer. Amount 0 with `receiver == sender` is the
    /// opt-in idiom; `close_to` sweeps the remaining balance and removes
    /// the sender's holding.
    AssetTransfer {
        /// The transferred asset.
        asset_id: AssetId,
        /// Receiving account.
        receiver: Address,
        /// Amount in the asset's smallest unit.
        amount: u64,
        /// Account receiving the remainder when closing out the holding.
        close_to: Option<Address>,
    },
    /// Call into a stateful application.
    AppCall {
        /// Target application.
        app_id: AppId,
        /// Completion behavior.
        on_complete: OnComplete,
        /// Raw arguments: selector string first, then fixed-width
        /// big-endian numeric arguments.
        args: Vec<Vec<u8>>,
        /// Accounts the program will touch (resource references).
        accounts: Vec<Address>,
        /// Assets the program will touch.
        foreign_assets: Vec<AssetId>,
        /// Sibling applications the program will read.
        foreign_apps: Vec<AppId>,
    },
}

/// One unsigned ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The spending account. Its signer (keypair or program) authorizes
    /// the operation.
    pub sender: Address,
    /// Flat fee in motes. Under fee bundling most group members carry 0.
    pub fee: u64,
    /// First valid round.
    pub first_valid: Round,
    /// Last valid round.
    pub last_valid: Round,
    /// Genesis id the transaction is bound to.
    pub genesis_id: String,
    /// Shared group id, assigned by the orchestrator. `None` until then.
    pub group: Option<[u8; 32]>,
    /// The operation itself.
    pub kind: TxnKind,
}

impl Transaction {
    /// Canonical byte serialization used for the transaction id and for
    /// signing. Deterministic concatenation with length prefixes; serde
    /// formats are avoided because field ordering across formats is not
    /// guaranteed.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.extend_from_slice(self.sender.as_bytes());
        buf.extend_from_slice(&self.fee.to_be_bytes());
        buf.extend_from_slice(&self.first_valid.to_be_bytes());
        buf.extend_from_slice(&self.last_valid.to_be_bytes());
        buf.extend_from_slice(&(self.genesis_id.len() as u32).to_be_bytes());
        buf.extend_from_slice(self.genesis_id.as_bytes());

        match &self.group {
            Some(gid) => {
                buf.push(0x01);
                buf.extend_from_slice(gid);
            }
            None => buf.push(0x00),
        }

        match &self.kind {
            TxnKind::Payment { receiver, amount } => {
                buf.push(0x01);
                buf.extend_from_slice(receiver.as_bytes());
                buf.extend_from_slice(&amount.to_be_bytes());
            }
            TxnKind::AssetTransfer {
                asset_id,
                receiver,
                amount,
                close_to,
            } => {
                buf.push(0x02);
                buf.extend_from_slice(&asset_id.to_be_bytes());
                buf.extend_from_slice(receiver.as_bytes());
                buf.extend_from_slice(&amount.to_be_bytes());
                match close_to {
                    Some(a) => {
                        buf.push(0x01);
                        buf.extend_from_slice(a.as_bytes());
                    }
                    None => buf.push(0x00),
                }
            }
            TxnKind::AppCall {
                app_id,
                on_complete,
                args,
                accounts,
                foreign_assets,
                foreign_apps,
            } => {
                buf.push(0x03);
                buf.extend_from_slice(&app_id.to_be_bytes());
                buf.push(match on_complete {
                    OnComplete::NoOp => 0x00,
                    OnComplete::OptIn => 0x01,
                });
                buf.extend_from_slice(&(args.len() as u32).to_be_bytes());
                for arg in args {
                    buf.extend_from_slice(&(arg.len() as u32).to_be_bytes());
                    buf.extend_from_slice(arg);
                }
                buf.extend_from_slice(&(accounts.len() as u32).to_be_bytes());
                for account in accounts {
                    buf.extend_from_slice(account.as_bytes());
                }
                buf.extend_from_slice(&(foreign_assets.len() as u32).to_be_bytes());
                for id in foreign_assets {
                    buf.extend_from_slice(&id.to_be_bytes());
                }
                buf.extend_from_slice(&(foreign_apps.len() as u32).to_be_bytes());
                for id in foreign_apps {
                    buf.extend_from_slice(&id.to_be_bytes());
                }
            }
        }

        buf
    }

    /// The transaction id: `hex(sha256(signable_bytes))`.
    pub fn id(&self) -> String {
        use sha2::{Digest, Sha256};
        hex::encode(Sha256::digest(self.signable_bytes()))
    }

    /// Overrides the flat fee. Used by the orchestrator's fee bundling.
    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }
}

// ---------------------------------------------------------------------------
// Argument encoding
// ---------------------------------------------------------------------------

/// Encodes a numeric application argument in the fixed 8-byte big-endian
/// width the programs expect.
pub fn encode_u64(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Resource references an application call declares up front. The call is
/// rejected if the program touches anything not listed here, so the list
/// must match what the program will actually access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRefs {
    /// Accounts the program reads or moves tokens between.
    pub accounts: Vec<Address>,
    /// Assets the program transfers or inspects.
    pub assets: Vec<AssetId>,
    /// Sibling applications whose state the program reads.
    pub apps: Vec<AppId>,
}

// ---------------------------------------------------------------------------
// TxnFactory
// ---------------------------------------------------------------------------

/// Builds individual operations against one set of suggested parameters.
///
/// Every produced transaction starts with the suggested minimum fee;
/// callers override fees per operation when bundling.
#[derive(Debug, Clone)]
pub struct TxnFactory {
    params: SuggestedParams,
}

impl TxnFactory {
    /// Creates a factory from freshly fetched parameters.
    pub fn new(params: SuggestedParams) -> Self {
        Self { params }
    }

    /// The minimum single-transaction fee of the loaded parameters.
    pub fn min_fee(&self) -> u64 {
        self.params.min_fee
    }

    fn base(&self, sender: Address, kind: TxnKind) -> Transaction {
        Transaction {
            sender,
            fee: self.params.min_fee,
            first_valid: self.params.first_valid,
            last_valid: self.params.last_valid,
            genesis_id: self.params.genesis_id.clone(),
            group: None,
            kind,
        }
    }

    /// Plain native-unit payment.
    pub fn payment(&self, sender: Address, receiver: Address, amount: u64) -> Transaction {
        self.base(sender, TxnKind::Payment { receiver, amount })
    }

    /// Asset transfer.
    pub fn asset_transfer(
        &self,
        sender: Address,
        receiver: Address,
        asset_id: AssetId,
        amount: u64,
    ) -> Transaction {
        self.base(
            sender,
            TxnKind::AssetTransfer {
                asset_id,
                receiver,
                amount,
                close_to: None,
            },
        )
    }

    /// Asset transfer that also closes the sender's holding out to
    /// `close_to`.
    pub fn asset_transfer_closing(
        &self,
        sender: Address,
        receiver: Address,
        asset_id: AssetId,
        amount: u64,
        close_to: Address,
    ) -> Transaction {
        self.base(
            sender,
            TxnKind::AssetTransfer {
                asset_id,
                receiver,
                amount,
                close_to: Some(close_to),
            },
        )
    }

    /// Asset opt-in: a zero-amount transfer to yourself.
    pub fn asset_opt_in(&self, account: Address, asset_id: AssetId) -> Transaction {
        self.asset_transfer(account, account, asset_id, 0)
    }

    /// Application call with a selector string and fixed-width numeric
    /// arguments.
    pub fn app_call(
        &self,
        sender: Address,
        app_id: AppId,
        selector: &str,
        numeric_args: &[u64],
        refs: ResourceRefs,
    ) -> Transaction {
        let mut args = Vec::with_capacity(1 + numeric_args.len());
        args.push(selector.as_bytes().to_vec());
        args.extend(numeric_args.iter().map(|v| encode_u64(*v)));
        self.base(
            sender,
            TxnKind::AppCall {
                app_id,
                on_complete: OnComplete::NoOp,
                args,
                accounts: refs.accounts,
                foreign_assets: refs.assets,
                foreign_apps: refs.apps,
            },
        )
    }

    /// Application opt-in: allocates the sender's local state.
    pub fn app_opt_in(&self, sender: Address, app_id: AppId) -> Transaction {
        self.base(
            sender,
            TxnKind::AppCall {
                app_id,
                on_complete: OnComplete::OptIn,
                args: Vec::new(),
                accounts: Vec::new(),
                foreign_assets: Vec::new(),
                foreign_apps: Vec::new(),
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
