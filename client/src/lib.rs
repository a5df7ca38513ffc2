// Copyright (c) 2026 Factora Labs. MIT License.
// See LICENSE for details.

//! # Factora Client — Invoice Lending Orchestration
//!
//! This crate is the off-ledger half of Factora: an invoice-backed
//! lending protocol whose rules are enforced by programs deployed on an
//! external distributed ledger. The programs decide; this library makes
//! sure every request put in front of them is well-formed, atomic, and
//! correctly signed.
//!
//! Invoices are tokenized by a minting application and auctioned through
//! a matching application. Investors fund stateless escrow accounts and
//! bid; borrowers tokenize invoices, receive discounted loans, and repay
//! at face value. This crate builds, groups, signs, submits, and tracks
//! the transactions behind each of those verbs. It holds no state of its
//! own: the ledger is the database and every operation reads it fresh.
//!
//! ## Architecture
//!
//! - **identity** — Addresses, Ed25519 keypairs, protocol principals.
//! - **ledger** — The RPC boundary: node, index service, compiler.
//! - **escrow** — Deterministic derivation and discovery of escrows.
//! - **transaction** — Building, grouping, signing, confirmation.
//! - **state** — Reading on-ledger key-value state; key presence is how
//!   the protocol encodes its stage, so absence is a first-class answer.
//! - **matching** — Read-only views of the matching application: token
//!   discovery, invoice pricing, stage predicates.
//! - **workflow** — [`MatchingClient`], one method per protocol verb.
//! - **config** — Every constant the deployed programs hold us to.
//!
//! ## Ground Rules
//!
//! 1. Money math is integer fixed-point, multiply before divide. No
//!    floats anywhere near a settlement amount.
//! 2. A submitted group is never resubmitted. Most operations are not
//!    idempotent; timeouts are surfaced, not papered over.
//! 3. Races over shared protocol resources are lost cleanly: group
//!    atomicity means a rejected group leaves nothing behind.

pub mod config;
pub mod error;
pub mod escrow;
pub mod identity;
pub mod ledger;
pub mod matching;
pub mod state;
pub mod transaction;
pub mod workflow;

pub use error::{ClientError, Result};
pub use escrow::EscrowAccount;
pub use identity::{Address, Keypair, Principal, Role};
pub use workflow::{MatchingClient, Party};
