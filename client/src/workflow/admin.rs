//! Admin operations: application setup and the brokered match lifecycle.

use tracing::info;

use super::client::MatchingClient;
use crate::config::{
    ACTION_FEE, MATCHING_APP_MINIMUM_BALANCE, MIN_TXN_FEE, RESET_FEE, SETUP_FEE, UNFREEZE_FEE,
};
use crate::error::Result;
use crate::identity::{Address, Principal};
use crate::ledger::types::PendingTxn;
use crate::matching::price::current_invoice_price;
use crate::state::keys;
use crate::transaction::{GroupEntry, ResourceRefs, Signer};

impl MatchingClient {
    /// Funds the application account and calls `setup`, which opts the
    /// application into the currency and creates the bidding and access
    /// tokens. One atomic group, admin-signed throughout.
    pub async fn setup(&self, admin: &Principal) -> Result<PendingTxn> {
        let factory = self.factory().await?;
        let currency_id = self.reader().global_u64(self.app_id, keys::CURRENCY_ID).await?;

        // The application pays for its own three opt-in/creation inner
        // transactions out of the funded balance.
        let funding = factory
            .payment(
                admin.address(),
                self.app_address(),
                MATCHING_APP_MINIMUM_BALANCE + 3 * MIN_TXN_FEE,
            )
            .with_fee(SETUP_FEE);
        let call = factory
            .app_call(
                admin.address(),
                self.app_id,
                "setup",
                &[],
                ResourceRefs {
                    assets: vec![currency_id],
                    ..ResourceRefs::default()
                },
            )
            .with_fee(0);

        let signer = Signer::Key(admin.keypair());
        info!(app_id = self.app_id, "setting up matching application");
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(funding, signer.clone()),
                GroupEntry::new(call, signer),
            ],
        )
        .await
    }

    /// Sets the length of the bidding window, in seconds.
    pub async fn set_bid_time_limit(
        &self,
        admin: &Principal,
        seconds: u64,
    ) -> Result<PendingTxn> {
        let factory = self.factory().await?;
        let call = factory.app_call(
            admin.address(),
            self.app_id,
            "set_bid_time_limit",
            &[seconds],
            ResourceRefs::default(),
        );
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(call, Signer::Key(admin.keypair()))],
        )
        .await
    }

    /// Opens an investor's escrow for bidding: the escrow opts into the
    /// bidding and access tokens and the admin's `unfreeze` call makes
    /// the application hand one of each back to it.
    pub async fn unfreeze(&self, admin: &Principal, investor: Address) -> Result<PendingTxn> {
        let escrow = self.investor_escrow(investor).await?;
        let tokens = self.tokens().await?;
        let identity_token_id = self
            .reader()
            .global_u64(self.app_id, keys::IDENTITY_TOKEN_ID)
            .await?;
        let factory = self.factory().await?;

        let bid_opt_in = factory
            .asset_opt_in(escrow.address(), tokens.bidding_id)
            .with_fee(UNFREEZE_FEE);
        let access_opt_in = factory
            .asset_opt_in(escrow.address(), tokens.access_id)
            .with_fee(0);
        let call = factory
            .app_call(
                admin.address(),
                self.app_id,
                "unfreeze",
                &[self.bounds.min_value],
                ResourceRefs {
                    accounts: vec![investor, escrow.address()],
                    assets: vec![
                        tokens.currency_id,
                        tokens.bidding_id,
                        tokens.access_id,
                        identity_token_id,
                    ],
                    ..ResourceRefs::default()
                },
            )
            .with_fee(0);

        info!(investor = %investor, escrow = %escrow.address(), "unfreezing escrow");
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(bid_opt_in, Signer::Logic(&escrow)),
                GroupEntry::new(access_opt_in, Signer::Logic(&escrow)),
                GroupEntry::new(call, Signer::Key(admin.keypair())),
            ],
        )
        .await
    }

    /// Settles the current match: the winning escrow opts into the
    /// invoice's ownership token, pays the discounted price to the
    /// borrower, and the `action` call moves the ownership token and
    /// clears the match keys; the bidding timeout stays in place until
    /// every bidding escrow has reclaimed. `price` overrides the computed
    /// settlement amount when given.
    pub async fn action(&self, admin: &Principal, price: Option<u64>) -> Result<PendingTxn> {
        let reader = self.reader();
        let invoice = reader.global_address(self.app_id, keys::INVOICE_ADDRESS).await?;
        let borrower = reader.global_address(self.app_id, keys::OWNER_ADDRESS).await?;
        let escrow_address = reader.global_address(self.app_id, keys::ESCROW_ADDRESS).await?;

        let escrow = crate::escrow::escrow_from_escrow_address(
            self.ledger.as_ref(),
            self.compiler.as_ref(),
            escrow_address,
            self.app_id,
            &self.bounds,
        )
        .await?;
        let tokens = self.tokens().await?;
        let minter_id = self.minter_id().await?;
        let ownership_id = self.invoice_ownership_asset(invoice).await?;

        let amount = match price {
            Some(amount) => amount,
            None => current_invoice_price(self.ledger.as_ref(), self.app_id, invoice, None).await?,
        };

        let factory = self.factory().await?;
        let ownership_opt_in = factory
            .asset_opt_in(escrow.address(), ownership_id)
            .with_fee(ACTION_FEE);
        let loan = factory
            .asset_transfer(escrow.address(), borrower, tokens.currency_id, amount)
            .with_fee(0);
        let call = factory
            .app_call(
                admin.address(),
                self.app_id,
                "action",
                &[],
                ResourceRefs {
                    accounts: vec![invoice, escrow.address(), borrower],
                    assets: vec![tokens.currency_id, tokens.bidding_id, ownership_id],
                    apps: vec![minter_id],
                },
            )
            .with_fee(0);

        info!(
            invoice = %invoice,
            escrow = %escrow.address(),
            amount,
            "settling match"
        );
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(ownership_opt_in, Signer::Logic(&escrow)),
                GroupEntry::new(loan, Signer::Logic(&escrow)),
                GroupEntry::new(call, Signer::Key(admin.keypair())),
            ],
        )
        .await
    }

    /// Clears an expired bidding window that attracted no winning bid,
    /// returning the application to its idle stage.
    pub async fn reset(&self, admin: &Principal) -> Result<PendingTxn> {
        let reader = self.reader();
        let invoice = reader.global_address(self.app_id, keys::INVOICE_ADDRESS).await?;
        let borrower = reader.global_address(self.app_id, keys::OWNER_ADDRESS).await?;
        let tokens = self.tokens().await?;
        let minter_id = self.minter_id().await?;
        let ownership_id = self.invoice_ownership_asset(invoice).await?;

        let factory = self.factory().await?;
        let call = factory
            .app_call(
                admin.address(),
                self.app_id,
                "reset",
                &[],
                ResourceRefs {
                    accounts: vec![invoice, borrower],
                    assets: vec![ownership_id, tokens.bidding_id, tokens.access_id],
                    apps: vec![minter_id],
                },
            )
            .with_fee(RESET_FEE);

        info!(invoice = %invoice, "resetting expired bidding window");
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(call, Signer::Key(admin.keypair()))],
        )
        .await
    }
}
