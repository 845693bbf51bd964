// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all persisted state.
//!
//! This module wraps `parity-scale-codec` (SCALE). Every record written to the
//! ledger's key-value state and every dispatched call parameter goes through these two
//! functions, so a given value always has exactly one byte representation.

use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from its canonical SCALE byte representation.
///
/// Trailing bytes are rejected, so a value written under one schema can never be
/// silently reinterpreted under a shorter one.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}
