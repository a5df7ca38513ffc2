//! Investor operations: escrow lifecycle, funding, bidding.

use tracing::info;

use super::client::MatchingClient;
use crate::config::{
    BID_FEE, FREEZE_FEE, INVESTOR_ESCROW_INITIAL_BALANCE, MAX_BIDDING_FEES, MIN_TXN_FEE,
    RECLAIM_FEE, WITHDRAW_FEE,
};
use crate::error::Result;
use crate::escrow::EscrowAccount;
use crate::identity::{Address, Principal};
use crate::ledger::types::PendingTxn;
use crate::state::keys;
use crate::transaction::{GroupEntry, ResourceRefs, Signer};

impl MatchingClient {
    /// Creates the investor's escrow on the ledger: a minimum-balance
    /// funding payment first (its own confirmed step, since the opt-ins
    /// below spend from the escrow), then one atomic group in which the
    /// escrow opts into the currency and the application.
    pub async fn initialise_escrow(&self, investor: &Principal) -> Result<EscrowAccount> {
        let escrow = self.investor_escrow(investor.address()).await?;
        let tokens = self.tokens().await?;

        // The escrow funds its own four lifetime opt-ins.
        let factory = self.factory().await?;
        let funding = factory.payment(
            investor.address(),
            escrow.address(),
            INVESTOR_ESCROW_INITIAL_BALANCE + 4 * MIN_TXN_FEE,
        );
        info!(investor = %investor.address(), escrow = %escrow.address(), "funding escrow");
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(funding, Signer::Key(investor.keypair()))],
        )
        .await?;

        let factory = self.factory().await?;
        let currency_opt_in = factory
            .asset_opt_in(escrow.address(), tokens.currency_id)
            .with_fee(2 * MIN_TXN_FEE);
        let app_opt_in = factory.app_opt_in(escrow.address(), self.app_id).with_fee(0);
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(currency_opt_in, Signer::Logic(&escrow)),
                GroupEntry::new(app_opt_in, Signer::Logic(&escrow)),
            ],
        )
        .await?;

        Ok(escrow)
    }

    /// Moves `amount` currency units from the investor's own account
    /// into their escrow.
    pub async fn invest(&self, investor: &Principal, amount: u64) -> Result<PendingTxn> {
        let escrow = self.investor_escrow(investor.address()).await?;
        let tokens = self.tokens().await?;
        let factory = self.factory().await?;

        let transfer = factory.asset_transfer(
            investor.address(),
            escrow.address(),
            tokens.currency_id,
            amount,
        );
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(transfer, Signer::Key(investor.keypair()))],
        )
        .await
    }

    /// Withdraws `amount` currency units from the escrow back to the
    /// investor. The escrow's payout only validates alongside the
    /// investor-signed `withdraw` call, which is what proves the request
    /// came from the owner.
    pub async fn withdraw(&self, investor: &Principal, amount: u64) -> Result<PendingTxn> {
        let escrow = self.investor_escrow(investor.address()).await?;
        let tokens = self.tokens().await?;
        let factory = self.factory().await?;

        let payout = factory
            .asset_transfer(
                escrow.address(),
                investor.address(),
                tokens.currency_id,
                amount,
            )
            .with_fee(0);
        let call = factory
            .app_call(
                investor.address(),
                self.app_id,
                "withdraw",
                &[],
                ResourceRefs {
                    accounts: vec![escrow.address()],
                    assets: vec![tokens.currency_id, tokens.bidding_id, tokens.access_id],
                    ..ResourceRefs::default()
                },
            )
            .with_fee(WITHDRAW_FEE);

        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(payout, Signer::Logic(&escrow)),
                GroupEntry::new(call, Signer::Key(investor.keypair())),
            ],
        )
        .await
    }

    /// Closes the escrow for bidding: both protocol tokens go back to
    /// the application, under an investor-signed `freeze` call.
    pub async fn freeze(&self, investor: &Principal) -> Result<PendingTxn> {
        let escrow = self.investor_escrow(investor.address()).await?;
        let tokens = self.tokens().await?;
        let identity_token_id = self
            .reader()
            .global_u64(self.app_id, keys::IDENTITY_TOKEN_ID)
            .await?;
        let factory = self.factory().await?;

        let return_bid = factory
            .asset_transfer(escrow.address(), self.app_address(), tokens.bidding_id, 1)
            .with_fee(0);
        let return_access = factory
            .asset_transfer(escrow.address(), self.app_address(), tokens.access_id, 1)
            .with_fee(0);
        let call = factory
            .app_call(
                investor.address(),
                self.app_id,
                "freeze",
                &[],
                ResourceRefs {
                    assets: vec![identity_token_id],
                    ..ResourceRefs::default()
                },
            )
            .with_fee(FREEZE_FEE);

        info!(escrow = %escrow.address(), "freezing escrow");
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(return_bid, Signer::Logic(&escrow)),
                GroupEntry::new(return_access, Signer::Logic(&escrow)),
                GroupEntry::new(call, Signer::Key(investor.keypair())),
            ],
        )
        .await
    }

    /// Bids on the invoice currently in play. Entirely escrow-signed:
    /// the bid token is surrendered to the application and the `bid`
    /// call carries the escrow's loan bounds, which the program checks
    /// against the invoice before considering the bid at all.
    pub async fn bid(&self, investor: Address, invoice: Address) -> Result<PendingTxn> {
        let escrow = self.investor_escrow(investor).await?;
        let tokens = self.tokens().await?;
        let minter_id = self.minter_id().await?;
        let factory = self.factory().await?;

        let surrender = factory
            .asset_transfer(escrow.address(), self.app_address(), tokens.bidding_id, 1)
            .with_fee(BID_FEE);
        let call = factory
            .app_call(
                escrow.address(),
                self.app_id,
                "bid",
                &[
                    self.bounds.min_value,
                    self.bounds.max_value,
                    self.bounds.min_term,
                    self.bounds.max_term,
                    self.bounds.min_interest,
                    self.bounds.max_risk,
                ],
                ResourceRefs {
                    accounts: vec![invoice],
                    assets: vec![tokens.bidding_id, tokens.currency_id],
                    apps: vec![minter_id],
                },
            )
            .with_fee(0);

        info!(escrow = %escrow.address(), invoice = %invoice, "placing bid");
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(surrender, Signer::Logic(&escrow)),
                GroupEntry::new(call, Signer::Logic(&escrow)),
            ],
        )
        .await
    }

    /// Reclaims a superseded or expired bid: the application hands the
    /// bid token back (or, when the escrow can no longer cover another
    /// bidding cycle, revokes its access token instead).
    ///
    /// The fee covers the call plus the application's inner transfers.
    /// When the escrow's spendable balance has fallen below one full
    /// bidding cycle the revocation path costs one extra inner
    /// transaction, so the fee grows by one minimum fee.
    pub async fn reclaim(&self, investor: Address) -> Result<PendingTxn> {
        let escrow = self.investor_escrow(investor).await?;
        let tokens = self.tokens().await?;

        let info = self.ledger.account_info(escrow.address()).await?;
        let spendable = info.balance.saturating_sub(info.min_balance);
        let fee = if spendable < RECLAIM_FEE + MAX_BIDDING_FEES {
            RECLAIM_FEE + MIN_TXN_FEE
        } else {
            RECLAIM_FEE
        };

        let factory = self.factory().await?;
        let call = factory
            .app_call(
                escrow.address(),
                self.app_id,
                "reclaim",
                &[],
                ResourceRefs {
                    assets: vec![tokens.bidding_id, tokens.access_id],
                    ..ResourceRefs::default()
                },
            )
            .with_fee(fee);

        info!(escrow = %escrow.address(), fee, "reclaiming bid");
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(call, Signer::Logic(&escrow))],
        )
        .await
    }
}
