//! Storage layer module.
//!
//! This module provides trait-based storage abstraction for the persisted
//! minter state, allowing different backends to be used without changing the
//! minting service.

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

pub use factory::create_storage;
pub use traits::{LockGuard, StateLock, StateStorage, Storage};
