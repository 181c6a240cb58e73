//! Pure domain models shared across slices.
//!
//! This crate holds only serde-friendly data shapes (configuration structures);
//! logic belongs to the kernel, infrastructure, and feature crates.

pub mod config;
