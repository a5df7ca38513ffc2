//! Identity: addresses, keypairs, and protocol principals.

pub mod address;
pub mod keypair;
pub mod principal;

pub use address::{Address, ADDRESS_HRP};
pub use keypair::Keypair;
pub use principal::{Principal, Role};
