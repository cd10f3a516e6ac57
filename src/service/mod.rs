//! Service layer module.
//!
//! Contains the minting core (suffix generator and minter, both pure and
//! synchronous) and the persisted minting use cases built on top of it.

pub mod generator;
pub mod mint;
pub mod minter;

pub use generator::{ALPHABET, SuffixGenerator, bit_swap};
pub use mint::{MAX_BATCH, MintBatch, MintService};
pub use minter::{Minted, Minter, check_digit};
