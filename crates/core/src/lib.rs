//! # Flagrast Core
//!
//! Core types for the flagrast bit-field raster renderer.
//!
//! This crate provides:
//! - `Band<T>`: Single-band integer raster grid
//! - `BandElement`: Trait over the integer pixel types (8/16/32/64-bit,
//!   signed or unsigned), supplying the 64-bit working word used for bit
//!   extraction
//! - Shared error types

pub mod band;
pub mod error;

pub use band::{Band, BandElement};
pub use error::{Error, Result};
