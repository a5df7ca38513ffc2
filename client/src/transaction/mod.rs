//! Transaction construction, grouping, signing, and confirmation.

pub mod builder;
pub mod confirm;
pub mod group;

pub use builder::{encode_u64, OnComplete, ResourceRefs, Transaction, TxnFactory, TxnKind};
pub use confirm::{wait_default, wait_for_confirmation};
pub use group::{
    assign_group_id, submit_group, GroupEntry, SignedTransaction, Signer, SubmittedGroup, TxnAuth,
};
