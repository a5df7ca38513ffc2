//! Ledger addresses.
//!
//! Every account on the ledger, keypair-controlled or program-controlled,
//! is identified by a 32-byte address. The human-facing rendering is
//! Bech32 with the `fac` prefix:
//!
//! ```text
//! keypair account: address = public_key (32 bytes)
//! escrow account:  address = SHA-256("Program" || program_bytes)
//! application:     address = SHA-256("AppID" || app_id_be_bytes)
//! ```
//!
//! Program and application addresses are pure functions of their inputs,
//! which is what makes stateless escrow accounts re-derivable from scratch
//! on every call instead of being persisted anywhere.

use bech32::{Bech32, Hrp};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Human-readable prefix of all Factora addresses.
pub const ADDRESS_HRP: &str = "fac";

/// Domain separator hashed in front of program bytes.
const PROGRAM_DOMAIN: &[u8] = b"Program";

/// Domain separator for application account addresses.
const APP_DOMAIN: &[u8] = b"AppID";

/// A 32-byte ledger address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    /// Wraps raw address bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses an address from a byte slice, as read out of on-ledger state.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClientError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ClientError::AddressParse(format!("expected 32 bytes, got {}", bytes.len())))?;
        Ok(Self(arr))
    }

    /// The address of a keypair account is its raw Ed25519 public key.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        Self(*public_key)
    }

    /// The address of a stateless contract account, derived from its
    /// compiled program bytes. Idempotent: same program, same address.
    pub fn for_program(program: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(PROGRAM_DOMAIN);
        hasher.update(program);
        Self(hasher.finalize().into())
    }

    /// The account address owned by a stateful application.
    pub fn for_application(app_id: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(APP_DOMAIN);
        hasher.update(app_id.to_be_bytes());
        Self(hasher.finalize().into())
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Bech32 rendering, e.g. `fac1qw508d6...`.
    pub fn encode(&self) -> String {
        let hrp = Hrp::parse(ADDRESS_HRP).expect("static hrp is valid");
        bech32::encode::<Bech32>(hrp, &self.0).expect("32-byte payload fits bech32")
    }

    /// Parses a Bech32 address string, checking the prefix and length.
    pub fn decode(s: &str) -> Result<Self, ClientError> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| ClientError::AddressParse(e.to_string()))?;
        if hrp.as_str() != ADDRESS_HRP {
            return Err(ClientError::AddressParse(format!(
                "expected hrp '{ADDRESS_HRP}', got '{}'",
                hrp.as_str()
            )));
        }
        Self::from_slice(&data)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl FromStr for Address {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(D::Error::custom)
    }
}
