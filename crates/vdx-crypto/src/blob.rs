//! # Raw-Blob Hashing
//!
//! Evidence content (scanned reports, photos, PDFs) is opaque to the engine:
//! it is hashed byte-for-byte, not canonicalized. This module is the single
//! raw-bytes digest path in the stack; every structured value goes through
//! `CanonicalBytes` and `vdx_core::sha256_digest` instead.

use sha2::{Digest, Sha256};

use vdx_core::ContentDigest;

/// Compute the SHA-256 digest of an opaque evidence blob.
pub fn sha256_blob(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::from_bytes(bytes)
}
