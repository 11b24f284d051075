#![warn(missing_docs)]
//! A Rust implementation of Mirror256, a keyless and reversible digest built from
//! Toffoli and Fredkin gates.
//!
//! Messages are padded and split into 32-byte blocks. Each block goes through a
//! 128-layer zigzag network of reversible 3-bit gates; which gate a layer runs is
//! picked by two bits of the previous block's output (the IV for the first block),
//! and that output is also XORed into the state after every layer. Every step is a
//! permutation, so with the per-block encoding chain at hand a digest can be walked
//! back to its message. This is an experiment in reversible constructions, not a
//! cryptographic hash.
//!
//! # Example
//! ```
//! # extern crate mirror256 as _;
//! use mirror256::mirror256;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!   let mut h = mirror256::Mirror256::new();
//!   h.update("Hello")?.update(", ")?.update("world!")?;
//!   println!("Result: {}", h.hexdigest());
//!
//!   assert_eq!(h.digest(), mirror256::new("Hello, world!")?.digest());
//!   Ok(())
//! }
//! ```
//!
//! The same function is available through the RustCrypto traits:
//! ```
//! use digest::Digest;
//! use mirror256::mirror256core::Mirror256Hasher;
//!
//! let sum = Mirror256Hasher::digest(b"Hello, world!");
//! assert_eq!(sum.len(), 32);
//! ```

/// `encoding` derives the per-layer gate schedule and holds the initialization vectors.
pub mod encoding;
/// `error` is the crate error type.
pub mod error;
/// `gate` holds the four reversible gates.
pub mod gate;
/// `inverse` rebuilds messages from a digest and its encoding chain.
pub mod inverse;
/// `mirror256` is the incremental hasher.
pub mod mirror256;
/// `mirror256core` plugs Mirror256 into the `digest` traits.
pub mod mirror256core;
/// `network` is the zigzag gate network and its inverse.
pub mod network;
/// `padding` is the length-encoding block padding.
pub mod padding;
/// `state` is the lane container the network runs on.
pub mod state;

pub use error::{Error, Result};
