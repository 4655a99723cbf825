//! # vdx-crypto — Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for the Veridex dispute stack:
//!
//! - **Ed25519** signing and verification for evidence attestations, over
//!   `CanonicalBytes` (structured messages) or a precomputed `ContentDigest`
//!   (the legacy flat-hash attestation scheme).
//! - **Vote commitments** — the domain-separated digest binding a juror's
//!   hidden vote to (claim, round, voter, nonce).
//! - **Raw-blob hashing** for opaque evidence content (the only raw-bytes
//!   digest path in the stack).
//!
//! ## Crate Policy
//!
//! - Depends only on `vdx-core` internally.
//! - No mocking of cryptographic operations in tests — all tests use real
//!   SHA-256 and real Ed25519.
//! - `unsafe` prohibited.

pub mod blob;
pub mod commitment;
pub mod ed25519;

pub use blob::sha256_blob;
pub use commitment::{vote_commitment, VoteNonce};
pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
