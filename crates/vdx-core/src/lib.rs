//! # vdx-core — Foundational Types for the Veridex Dispute Stack
//!
//! This crate is the bedrock of the Veridex stack. It defines the primitives
//! every other crate builds on: account identity, claim/round identifiers,
//! UTC-only timestamps and the logical clock, canonical byte production, and
//! content digests.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AccountId`, `ClaimId`,
//!    `RoundIndex` — validated newtypes, never bare strings or integers.
//!
//! 2. **`CanonicalBytes` newtype.** Everything that is hashed or signed as a
//!    structured value flows through `CanonicalBytes::new()`. No raw
//!    `serde_json::to_vec()` for digests.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces UTC with Z suffix and
//!    seconds precision. The `Clock` trait gives the engine one authoritative
//!    time source; tests drive a `ManualClock` deterministically.
//!
//! 4. **`sha256_digest()` accepts only `&CanonicalBytes`.** Digests over
//!    non-canonical bytes are unrepresentable for structured data.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vdx-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CoreError, CryptoError};
pub use identity::{AccountId, ClaimId, RoundIndex};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
