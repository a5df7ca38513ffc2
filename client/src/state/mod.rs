//! On-ledger state access: reader and well-known keys.

pub mod keys;
pub mod reader;

pub use reader::StateReader;
