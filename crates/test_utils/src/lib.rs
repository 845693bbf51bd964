// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Gradebook Test Utilities
//!
//! Assertion macros, deterministic fixtures and `proptest` strategies shared by the
//! tests of every gradebook crate.

pub mod assertions;
pub mod fixtures;
pub mod strategies;
