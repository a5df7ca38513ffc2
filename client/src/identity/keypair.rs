//! Ed25519 keypairs for keypair-controlled accounts.
//!
//! Key generation uses the OS RNG. Private key bytes are never logged and
//! the keypair deliberately does not implement `Serialize`; exporting key
//! material must be an explicit `to_seed()` call.

use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;

use super::address::Address;

/// An Ed25519 keypair controlling a ledger account.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic construction from a 32-byte seed. Used for restoring
    /// accounts from mnemonics and for reproducible tests.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// The 32-byte seed of the signing key.
    pub fn to_seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// The raw Ed25519 public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The ledger address controlled by this keypair.
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key())
    }

    /// Signs arbitrary bytes, returning the 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Public half only. The seed stays out of debug output.
        write!(f, "Keypair({})", self.address())
    }
}
