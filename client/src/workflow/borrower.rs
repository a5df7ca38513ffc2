//! Borrower operations: escrow lifecycle, invoice verification, repayment.
//!
//! Verification and repayment accept a [`Party`], so a borrower can act
//! with their own keypair or through their escrow without two parallel
//! implementations.

use tracing::{info, warn};

use super::client::MatchingClient;
use super::Party;
use crate::config::{BORROWER_ESCROW_MINIMUM_BALANCE, MIN_TXN_FEE, REPAY_FEE, VERIFY_FEE};
use crate::error::Result;
use crate::escrow::EscrowAccount;
use crate::identity::{Address, Principal};
use crate::ledger::types::PendingTxn;
use crate::matching::invoice_face_value;
use crate::state::keys;
use crate::transaction::{GroupEntry, ResourceRefs, Signer};

impl MatchingClient {
    /// Creates the borrower's escrow: minimum-balance funding, then the
    /// currency opt-in and the two application opt-ins (matching and
    /// minting), each as its own confirmed step.
    pub async fn initialise_borrower_escrow(
        &self,
        borrower: &Principal,
    ) -> Result<EscrowAccount> {
        let escrow = self.borrower_escrow(borrower.address()).await?;
        let tokens = self.tokens().await?;
        let minter_id = self.minter_id().await?;

        let factory = self.factory().await?;
        let funding = factory.payment(
            borrower.address(),
            escrow.address(),
            BORROWER_ESCROW_MINIMUM_BALANCE + 4 * MIN_TXN_FEE,
        );
        info!(borrower = %borrower.address(), escrow = %escrow.address(), "funding borrower escrow");
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(funding, Signer::Key(borrower.keypair()))],
        )
        .await?;

        let factory = self.factory().await?;
        let currency_opt_in = factory.asset_opt_in(escrow.address(), tokens.currency_id);
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(currency_opt_in, Signer::Logic(&escrow))],
        )
        .await?;

        let factory = self.factory().await?;
        let matching_opt_in = factory.app_opt_in(escrow.address(), self.app_id);
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(matching_opt_in, Signer::Logic(&escrow))],
        )
        .await?;

        let factory = self.factory().await?;
        let minting_opt_in = factory.app_opt_in(escrow.address(), minter_id);
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(minting_opt_in, Signer::Logic(&escrow))],
        )
        .await?;

        Ok(escrow)
    }

    /// Moves `amount` currency units from the borrower's own account
    /// into their escrow.
    pub async fn send_funds(&self, borrower: &Principal, amount: u64) -> Result<PendingTxn> {
        let escrow = self.borrower_escrow(borrower.address()).await?;
        let tokens = self.tokens().await?;
        let factory = self.factory().await?;

        let transfer = factory.asset_transfer(
            borrower.address(),
            escrow.address(),
            tokens.currency_id,
            amount,
        );
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(transfer, Signer::Key(borrower.keypair()))],
        )
        .await
    }

    /// Pays `amount` currency units out of the borrower escrow back to
    /// its owner. The escrow program itself restricts the destination to
    /// the owner address baked into it.
    pub async fn withdraw_funds(&self, borrower: Address, amount: u64) -> Result<PendingTxn> {
        let escrow = self.borrower_escrow(borrower).await?;
        let tokens = self.tokens().await?;
        let factory = self.factory().await?;

        let payout =
            factory.asset_transfer(escrow.address(), borrower, tokens.currency_id, amount);
        self.execute(
            factory.min_fee(),
            vec![GroupEntry::new(payout, Signer::Logic(&escrow))],
        )
        .await
    }

    /// Verifies an invoice for matching: the invoice account opts into
    /// the matching application (tolerated if it already has), then the
    /// party's `verify` call and the ownership-token deposit go through
    /// as one group.
    pub async fn verify(&self, party: Party<'_>, invoice: &EscrowAccount) -> Result<PendingTxn> {
        let minter_id = self.minter_id().await?;

        let factory = self.factory().await?;
        let invoice_opt_in = factory.app_opt_in(invoice.address(), self.app_id);
        let opted = self
            .execute(
                factory.min_fee(),
                vec![GroupEntry::new(invoice_opt_in, Signer::Logic(invoice))],
            )
            .await;
        if let Err(e) = opted {
            warn!(invoice = %invoice.address(), error = %e, "invoice already opted in");
        }

        let ownership_id = self
            .reader()
            .local_u64(invoice.address(), minter_id, keys::INVOICE_ASSET_ID)
            .await?;

        let factory = self.factory().await?;
        let call = factory
            .app_call(
                party.address(),
                self.app_id,
                "verify",
                &[],
                ResourceRefs {
                    accounts: vec![invoice.address()],
                    assets: vec![ownership_id],
                    apps: vec![minter_id],
                },
            )
            .with_fee(VERIFY_FEE);
        let deposit = factory
            .asset_transfer(party.address(), self.app_address(), ownership_id, 1)
            .with_fee(0);

        info!(invoice = %invoice.address(), party = %party.address(), "verifying invoice");
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(call, party.signer()),
                GroupEntry::new(deposit, party.signer()),
            ],
        )
        .await
    }

    /// Repays a matched loan. Defaults to the invoice's full face value
    /// converted from cents into currency base units. The investor
    /// escrow returns the ownership token to the invoice account with a
    /// close-out, which is what drives the on-ledger balance to the
    /// repaid sentinel.
    pub async fn repay(
        &self,
        party: Party<'_>,
        invoice: &EscrowAccount,
        investor_escrow: &EscrowAccount,
        amount: Option<u64>,
    ) -> Result<PendingTxn> {
        let minter_id = self.minter_id().await?;
        let tokens = self.tokens().await?;
        let reader = self.reader();

        let ownership_id = reader
            .local_u64(invoice.address(), minter_id, keys::INVOICE_ASSET_ID)
            .await?;
        let amount = match amount {
            Some(amount) => amount,
            None => {
                let value_cents = reader
                    .local_u64(invoice.address(), minter_id, keys::INVOICE_VALUE)
                    .await?;
                invoice_face_value(value_cents)?
            }
        };

        let factory = self.factory().await?;
        let call = factory
            .app_call(
                party.address(),
                self.app_id,
                "repay",
                &[],
                ResourceRefs {
                    accounts: vec![invoice.address(), investor_escrow.address()],
                    assets: vec![ownership_id, tokens.currency_id],
                    apps: vec![minter_id],
                },
            )
            .with_fee(REPAY_FEE);
        let settlement = factory
            .asset_transfer(
                party.address(),
                investor_escrow.address(),
                tokens.currency_id,
                amount,
            )
            .with_fee(0);
        let ownership_return = factory
            .asset_transfer_closing(
                investor_escrow.address(),
                invoice.address(),
                ownership_id,
                1,
                invoice.address(),
            )
            .with_fee(0);

        info!(
            invoice = %invoice.address(),
            party = %party.address(),
            amount,
            "repaying loan"
        );
        self.execute(
            factory.min_fee(),
            vec![
                GroupEntry::new(call, party.signer()),
                GroupEntry::new(settlement, party.signer()),
                GroupEntry::new(ownership_return, Signer::Logic(investor_escrow)),
            ],
        )
        .await
    }
}
