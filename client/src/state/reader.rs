//! Reading and interpreting on-ledger key-value state.
//!
//! The ledger stores two value shapes: unsigned integers and raw bytes.
//! It records nothing about what the bytes mean, so the caller chooses
//! the interpretation (`_u64`, `_bytes`, `_address`, `_text` accessors).
//! No type inference is attempted.
//!
//! Absence is modeled explicitly: `try_*` methods return `Ok(None)` for a
//! missing key so that expected-absence branches are type-checked instead
//! of exception-caught. The plain accessors map absence to
//! [`ClientError::KeyNotFound`] for call sites where the key is required.

use std::collections::BTreeMap;

use crate::error::{ClientError, Result};
use crate::identity::Address;
use crate::ledger::types::{AppId, StateValue};
use crate::ledger::LedgerRpc;

impl StateValue {
    /// Interprets the value as an unsigned integer.
    pub fn as_u64(&self) -> Result<u64> {
        match self {
            StateValue::Uint(v) => Ok(*v),
            StateValue::Bytes(_) => Err(ClientError::MalformedState(
                "expected uint, found bytes".to_string(),
            )),
        }
    }

    /// Interprets the value as a raw byte sequence.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            StateValue::Bytes(b) => Ok(b),
            StateValue::Uint(_) => Err(ClientError::MalformedState(
                "expected bytes, found uint".to_string(),
            )),
        }
    }

    /// Interprets the value as a 32-byte ledger address.
    pub fn as_address(&self) -> Result<Address> {
        Address::from_slice(self.as_bytes()?)
    }

    /// Interprets the value as UTF-8 text.
    pub fn as_text(&self) -> Result<String> {
        String::from_utf8(self.as_bytes()?.to_vec())
            .map_err(|e| ClientError::MalformedState(format!("invalid utf-8: {e}")))
    }
}

/// Reads global and local state through the ledger RPC, fresh on every
/// call. Nothing is cached: the remote store is the only source of truth
/// and staleness produces malformed transactions.
pub struct StateReader<'a> {
    ledger: &'a dyn LedgerRpc,
}

impl<'a> StateReader<'a> {
    /// Wraps a ledger connection.
    pub fn new(ledger: &'a dyn LedgerRpc) -> Self {
        Self { ledger }
    }

    // -- global state --------------------------------------------------

    /// Fetches one global key. `Ok(None)` when absent.
    pub async fn try_global(&self, app_id: AppId, key: &str) -> Result<Option<StateValue>> {
        let info = self.ledger.application_info(app_id).await?;
        Ok(info.global_state.get(key).cloned())
    }

    /// Fetches one global key, treating absence as an error.
    pub async fn global(&self, app_id: AppId, key: &str) -> Result<StateValue> {
        self.try_global(app_id, key)
            .await?
            .ok_or_else(|| ClientError::KeyNotFound(key.to_string()))
    }

    /// Required global key as an unsigned integer.
    pub async fn global_u64(&self, app_id: AppId, key: &str) -> Result<u64> {
        self.global(app_id, key).await?.as_u64()
    }

    /// Required global key as raw bytes.
    pub async fn global_bytes(&self, app_id: AppId, key: &str) -> Result<Vec<u8>> {
        Ok(self.global(app_id, key).await?.as_bytes()?.to_vec())
    }

    /// Required global key as an address.
    pub async fn global_address(&self, app_id: AppId, key: &str) -> Result<Address> {
        self.global(app_id, key).await?.as_address()
    }

    /// Existence check. Never raises for absence; used to detect protocol
    /// stage transitions.
    pub async fn has_global_key(&self, app_id: AppId, key: &str) -> Result<bool> {
        Ok(self.try_global(app_id, key).await?.is_some())
    }

    // -- local state ----------------------------------------------------

    /// Fetches one local key of (address, app). `Ok(None)` when either
    /// the account has no local state for the app or the key is absent.
    pub async fn try_local(
        &self,
        address: Address,
        app_id: AppId,
        key: &str,
    ) -> Result<Option<StateValue>> {
        let info = self.ledger.account_info(address).await?;
        Ok(info
            .app_local_state
            .get(&app_id)
            .and_then(|state| state.get(key))
            .cloned())
    }

    /// Fetches one local key, treating absence as an error.
    pub async fn local(&self, address: Address, app_id: AppId, key: &str) -> Result<StateValue> {
        self.try_local(address, app_id, key)
            .await?
            .ok_or_else(|| ClientError::KeyNotFound(key.to_string()))
    }

    /// Required local key as an unsigned integer.
    pub async fn local_u64(&self, address: Address, app_id: AppId, key: &str) -> Result<u64> {
        self.local(address, app_id, key).await?.as_u64()
    }

    /// Required local key as an address.
    pub async fn local_address(
        &self,
        address: Address,
        app_id: AppId,
        key: &str,
    ) -> Result<Address> {
        self.local(address, app_id, key).await?.as_address()
    }

    // -- balances & time -------------------------------------------------

    /// All balances of an account, native balance under asset id 0.
    pub async fn balances(&self, address: Address) -> Result<BTreeMap<u64, u64>> {
        let info = self.ledger.account_info(address).await?;
        let mut balances = BTreeMap::new();
        balances.insert(0, info.balance);
        for holding in info.assets {
            balances.insert(holding.asset_id, holding.amount);
        }
        Ok(balances)
    }

    /// Timestamp of the latest committed block, Unix seconds.
    pub async fn last_block_timestamp(&self) -> Result<u64> {
        let status = self.ledger.status().await?;
        self.ledger.block_timestamp(status.last_round).await
    }
}
