//! Domain models for the noid minter.
//!
//! Templates describe identifier shape; states are what a minter is
//! persisted as between invocations.

pub mod state;
pub mod template;

pub use state::{MinterState, MinterStatus};
pub use template::{MaskChar, Ordering, Template};
