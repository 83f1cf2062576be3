//! Read and change the default boot entry of a GRUB 0.97 stage2 image.

// SPDX-License-Identifier: Apache-2.0 OR MIT

mod failpoints;

pub mod bootdefault;
pub mod cli;
pub mod stage2;

pub use bootdefault::{DecodedDefault, RawDefault};
