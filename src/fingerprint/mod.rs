//! Combinatorial fingerprint hashing
//!
//! Pairs each spectral peak with the peaks that follow it inside a bounded
//! lookahead window and hashes every forward-in-time pair into a compact
//! 80-bit identifier carrying the anchor's time offset.

pub mod hashing;

pub use hashing::{generate_fingerprints, Fingerprint, HASH_HEX_LEN};
