//! Remote interfaces: ledger node RPC, index service, template compiler.

pub mod compiler;
pub mod indexer;
pub mod rpc;
pub mod types;

pub use compiler::{TemplateCompiler, TemplateParam, TemplateParams};
pub use indexer::IndexerRpc;
pub use rpc::LedgerRpc;
pub use types::{
    AccountInfo, AppId, ApplicationInfo, AssetBalance, AssetBalancePage, AssetHolding, AssetId,
    AssetParams, CreatedAsset, NodeStatus, PendingTxn, Round, StateMap, StateValue,
    SuggestedParams,
};
