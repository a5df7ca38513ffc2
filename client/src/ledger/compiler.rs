//! The escrow template compiler boundary.
//!
//! Escrow programs are produced by instantiating named templates with
//! protocol parameters and compiling the result. Compilation is a black
//! box to this crate; what matters is that it is deterministic, so the
//! same parameters always yield the same program and therefore the same
//! escrow address. Compilation failures are fatal and never retried.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::identity::Address;

/// A value substituted into an escrow template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateParam {
    /// A numeric parameter (token id, bound, app id).
    Uint(u64),
    /// An address parameter (the escrow owner).
    Address(Address),
}

impl From<u64> for TemplateParam {
    fn from(v: u64) -> Self {
        TemplateParam::Uint(v)
    }
}

impl From<Address> for TemplateParam {
    fn from(v: Address) -> Self {
        TemplateParam::Address(v)
    }
}

/// Parameter map for one template instantiation. `BTreeMap` so the
/// parameter order seen by the compiler is deterministic.
pub type TemplateParams = BTreeMap<String, TemplateParam>;

/// Compiles escrow templates into program bytes.
#[async_trait]
pub trait TemplateCompiler: Send + Sync {
    /// Instantiates `template` with `params` and compiles it.
    async fn compile(&self, template: &str, params: &TemplateParams) -> Result<Vec<u8>>;
}
