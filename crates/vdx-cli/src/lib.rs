//! # vdx-cli — Veridex Command-Line Interface
//!
//! Operator and juror tooling for the dispute engine:
//!
//! - `keys` — Ed25519 key generation and account derivation
//! - `commit` — vote commitment computation for the commit phase
//! - `evidence` — envelope hashing plus attestation signing and checking
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from handlers.
//! - Handlers delegate to the domain crates — no engine logic here.
//! - `anyhow` is used only at this boundary; the domain crates return
//!   typed errors.

pub mod commitment;
pub mod evidence;
pub mod keys;
