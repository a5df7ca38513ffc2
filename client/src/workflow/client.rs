//! The workflow controller itself.

use std::sync::Arc;

use tracing::debug;

use crate::config::{LoanBounds, OWNERSHIP_TOKEN_UNIT};
use crate::error::{ClientError, Result};
use crate::escrow::{self, EscrowAccount};
use crate::identity::Address;
use crate::ledger::types::{AppId, AssetId, PendingTxn};
use crate::ledger::{IndexerRpc, LedgerRpc, TemplateCompiler};
use crate::matching::tokens::{app_tokens, AppTokens};
use crate::state::{keys, StateReader};
use crate::transaction::confirm::wait_default;
use crate::transaction::group::{submit_group, GroupEntry};
use crate::transaction::TxnFactory;

/// Stateless controller for one matching application.
///
/// Holds connections and the investor's loan bounds, nothing else. Safe
/// to share (`Clone` is cheap) and to drop between operations; every
/// operation reads whatever it needs from the ledger when it runs.
#[derive(Clone)]
pub struct MatchingClient {
    pub(super) ledger: Arc<dyn LedgerRpc>,
    pub(super) indexer: Arc<dyn IndexerRpc>,
    pub(super) compiler: Arc<dyn TemplateCompiler>,
    pub(super) app_id: AppId,
    pub(super) bounds: LoanBounds,
}

impl MatchingClient {
    /// Creates a controller with the default loan bounds.
    pub fn new(
        ledger: Arc<dyn LedgerRpc>,
        indexer: Arc<dyn IndexerRpc>,
        compiler: Arc<dyn TemplateCompiler>,
        app_id: AppId,
    ) -> Self {
        Self {
            ledger,
            indexer,
            compiler,
            app_id,
            bounds: LoanBounds::default(),
        }
    }

    /// Overrides the loan bounds baked into derived investor escrows and
    /// passed with every bid.
    pub fn with_bounds(mut self, bounds: LoanBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// The matching application this controller drives.
    pub fn app_id(&self) -> AppId {
        self.app_id
    }

    /// The loan bounds in force.
    pub fn bounds(&self) -> &LoanBounds {
        &self.bounds
    }

    /// The matching application's account address.
    pub fn app_address(&self) -> Address {
        Address::for_application(self.app_id)
    }

    /// Resolves the application's token ids.
    pub async fn tokens(&self) -> Result<AppTokens> {
        app_tokens(self.ledger.as_ref(), self.app_id).await
    }

    /// Derives the investor escrow owned by `owner` under this
    /// controller's bounds.
    pub async fn investor_escrow(&self, owner: Address) -> Result<EscrowAccount> {
        escrow::investor_escrow(
            self.ledger.as_ref(),
            self.compiler.as_ref(),
            self.app_id,
            owner,
            &self.bounds,
        )
        .await
    }

    /// Derives the borrower escrow owned by `owner`.
    pub async fn borrower_escrow(&self, owner: Address) -> Result<EscrowAccount> {
        escrow::borrower_escrow(
            self.ledger.as_ref(),
            self.compiler.as_ref(),
            self.app_id,
            owner,
        )
        .await
    }

    /// Enumerates every escrow currently open for matching.
    pub async fn open_escrows(&self) -> Result<Vec<EscrowAccount>> {
        escrow::open_escrows(
            self.ledger.as_ref(),
            self.indexer.as_ref(),
            self.compiler.as_ref(),
            self.app_id,
            &self.bounds,
        )
        .await
    }

    // -- internal plumbing -------------------------------------------------

    pub(super) fn reader(&self) -> StateReader<'_> {
        StateReader::new(self.ledger.as_ref())
    }

    /// Loads a transaction factory from fresh suggested parameters.
    pub(super) async fn factory(&self) -> Result<TxnFactory> {
        Ok(TxnFactory::new(self.ledger.as_ref().suggested_params().await?))
    }

    /// Submits one atomic group and blocks until it is confirmed.
    pub(super) async fn execute(
        &self,
        min_fee: u64,
        entries: Vec<GroupEntry<'_>>,
    ) -> Result<PendingTxn> {
        let submitted = submit_group(self.ledger.as_ref(), min_fee, entries).await?;
        wait_default(self.ledger.as_ref(), submitted.tracking_id()).await
    }

    /// The minting application recorded on the matching application.
    pub(super) async fn minter_id(&self) -> Result<AppId> {
        self.reader().global_u64(self.app_id, keys::MINTER_ID).await
    }

    /// Finds the ownership token held by an invoice account: the single
    /// asset created by the minting application with the ownership unit
    /// name. Anything other than exactly one match means the account is
    /// not a well-formed invoice.
    pub(super) async fn invoice_ownership_asset(&self, invoice: Address) -> Result<AssetId> {
        let minter_address = Address::for_application(self.minter_id().await?);
        let info = self.ledger.account_info(invoice).await?;

        let mut matches = Vec::new();
        for holding in &info.assets {
            let params = self.ledger.asset_info(holding.asset_id).await?;
            if params.creator == minter_address && params.unit_name == OWNERSHIP_TOKEN_UNIT {
                matches.push(holding.asset_id);
            }
        }
        debug!(invoice = %invoice, candidates = matches.len(), "ownership token lookup");

        match matches.as_slice() {
            [asset_id] => Ok(*asset_id),
            other => Err(ClientError::Validation(format!(
                "invoice {} holds {} ownership tokens, expected exactly 1",
                invoice,
                other.len()
            ))),
        }
    }
}
