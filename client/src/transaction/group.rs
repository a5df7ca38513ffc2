//! Atomic group orchestration.
//!
//! A group is an ordered set of operations sharing one group id: the
//! ledger applies every member in the same round or none of them. The
//! orchestrator's obligations are all local and purely constructive:
//!
//! 1. assign one consistent group id across the members,
//! 2. bind each operation to its designated signer (keypair or escrow
//!    program) and refuse mismatches before anything hits the wire,
//! 3. enforce the fee-bundling policy: exactly one member carries a flat
//!    fee sized for the whole group, everyone else carries zero. The fee
//!    payer is the contract call or a preceding funding payment, so the
//!    admin absorbs group costs and escrows keep a minimal reserve.
//!
//! Atomicity itself is the ledger's guarantee, not ours. A rejected group
//! is void in its entirety and is never auto-retried here: resubmission
//! under stale parameters is how double spends happen.

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::builder::Transaction;
use crate::error::{ClientError, Result};
use crate::escrow::EscrowAccount;
use crate::identity::{Address, Keypair};
use crate::ledger::LedgerRpc;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Signed transactions
// ---------------------------------------------------------------------------

/// Authorization attached to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnAuth {
    /// Ed25519 signature by the sender's keypair.
    Sig(Vec<u8>),
    /// Program bytes of a stateless contract account. The ledger checks
    /// that the program hashes to the sender address and that it approves
    /// the transaction.
    Logic(Vec<u8>),
}

/// A transaction plus its authorization, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The authorized transaction.
    pub txn: Transaction,
    /// Keypair signature or escrow program.
    pub auth: TxnAuth,
}

// ---------------------------------------------------------------------------
// Signers
// ---------------------------------------------------------------------------

/// The designated signer of one group member.
#[derive(Debug, Clone)]
pub enum Signer<'a> {
    /// A keypair-controlled account signs with Ed25519.
    Key(&'a Keypair),
    /// A stateless escrow account "signs" by attaching its program.
    Logic(&'a EscrowAccount),
}

impl Signer<'_> {
    /// The address this signer can authorize spends from.
    pub fn address(&self) -> Address {
        match self {
            Signer::Key(kp) => kp.address(),
            Signer::Logic(escrow) => escrow.address(),
        }
    }

    /// Produces the signed form of `txn`. Callers must have verified the
    /// sender binding first; see [`submit_group`].
    pub fn sign(&self, txn: Transaction) -> SignedTransaction {
        let auth = match self {
            Signer::Key(kp) => TxnAuth::Sig(kp.sign(&txn.signable_bytes())),
            Signer::Logic(escrow) => TxnAuth::Logic(escrow.program().to_vec()),
        };
        SignedTransaction { txn, auth }
    }
}

/// One group member: an unsigned operation tagged with its signer.
#[derive(Debug)]
pub struct GroupEntry<'a> {
    /// The operation.
    pub txn: Transaction,
    /// Who authorizes it.
    pub signer: Signer<'a>,
}

impl<'a> GroupEntry<'a> {
    /// Convenience constructor.
    pub fn new(txn: Transaction, signer: Signer<'a>) -> Self {
        Self { txn, signer }
    }
}

/// The outcome of a successful group submission.
#[derive(Debug, Clone)]
pub struct SubmittedGroup {
    /// The shared group id.
    pub group_id: [u8; 32],
    /// Final (post-grouping) transaction ids, in submission order. The
    /// first id is what the node reports and what confirmation tracking
    /// polls for.
    pub txn_ids: Vec<String>,
}

impl SubmittedGroup {
    /// The id used to track the whole group.
    pub fn tracking_id(&self) -> &str {
        &self.txn_ids[0]
    }
}

// ---------------------------------------------------------------------------
// Group construction
// ---------------------------------------------------------------------------

/// Computes and assigns one shared group id over the members' pre-group
/// canonical bytes. Single-member sets stay ungrouped, matching the
/// ledger's rules.
pub fn assign_group_id(txns: &mut [Transaction]) -> Option<[u8; 32]> {
    if txns.len() < 2 {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(b"TxGroup");
    for txn in txns.iter() {
        debug_assert!(txn.group.is_none(), "transaction already grouped");
        hasher.update(txn.signable_bytes());
    }
    let gid: [u8; 32] = hasher.finalize().into();
    for txn in txns.iter_mut() {
        txn.group = Some(gid);
    }
    Some(gid)
}

/// Checks the fee-bundling invariant: exactly one member carries a flat
/// fee covering every member's minimum fee, all others carry zero.
fn check_fee_bundle(txns: &[Transaction], min_fee: u64) -> Result<()> {
    let required = min_fee * txns.len() as u64;
    let payers: Vec<&Transaction> = txns.iter().filter(|t| t.fee > 0).collect();
    match payers.as_slice() {
        [payer] if payer.fee >= required => Ok(()),
        [payer] => Err(ClientError::Validation(format!(
            "bundled fee {} below group minimum {}",
            payer.fee, required
        ))),
        [] => Err(ClientError::Validation(
            "no group member carries the bundled fee".to_string(),
        )),
        many => Err(ClientError::Validation(format!(
            "{} group members carry a fee, expected exactly one",
            many.len()
        ))),
    }
}

/// Groups, signs and submits an ordered list of operations as one atomic
/// unit.
///
/// Local failures (signer/sender mismatch) and ledger-side rejections both
/// surface as [`ClientError::SubmissionRejected`]; in either case nothing
/// was applied. Fee-bundle violations are caught pre-submission as
/// [`ClientError::Validation`].
pub async fn submit_group(
    ledger: &dyn LedgerRpc,
    min_fee: u64,
    entries: Vec<GroupEntry<'_>>,
) -> Result<SubmittedGroup> {
    if entries.is_empty() {
        return Err(ClientError::Validation("empty transaction group".to_string()));
    }

    for entry in &entries {
        let bound = entry.signer.address();
        if bound != entry.txn.sender {
            return Err(ClientError::SubmissionRejected(format!(
                "signer {} cannot authorize sender {}",
                bound, entry.txn.sender
            )));
        }
    }

    let (mut txns, signers): (Vec<Transaction>, Vec<Signer<'_>>) =
        entries.into_iter().map(|e| (e.txn, e.signer)).unzip();

    check_fee_bundle(&txns, min_fee)?;
    let group_id = assign_group_id(&mut txns).unwrap_or([0u8; 32]);

    let txn_ids: Vec<String> = txns.iter().map(Transaction::id).collect();
    let signed: Vec<SignedTransaction> = txns
        .into_iter()
        .zip(signers.iter())
        .map(|(txn, signer)| signer.sign(txn))
        .collect();

    debug!(members = signed.len(), group = %hex::encode(group_id), "submitting group");
    let reported = ledger.submit(&signed).await?;
    info!(txn_id = %reported, members = signed.len(), "group accepted by node");

    Ok(SubmittedGroup { group_id, txn_ids })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
