//! This library is an internal component of [`genblocks`],
//! which defines the directional and coordinate types the generator is built on.
//! Do not depend on this library; use only [`genblocks`] instead.
//!
//! [`genblocks`]: https://crates.io/crates/genblocks/

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
#![warn(clippy::missing_inline_in_public_items)]

#[cfg(test)]
#[macro_use]
extern crate std;

/// Do not use this module directly; its contents are re-exported from `genblocks`.
pub mod math;

// reexport for convenience of our tests
#[doc(hidden)]
pub use euclid;
