//! # Flagrast Render
//!
//! Bit-field flag decoding and RGBA rendering.
//!
//! A flag raster packs several independent small-integer fields into
//! different bit ranges of one integer pixel word (quality-assessment bands
//! are the usual case). This crate holds the styling model for those
//! ranges, the decode/render engine that turns a band into an RGBA buffer,
//! and the legend builder. The main entry point is [`flags_to_rgba`].
//!
//! ## Usage
//!
//! ```ignore
//! use flagrast_core::Band;
//! use flagrast_render::{flags_to_rgba, FlagParameter, RendererConfig};
//!
//! let mut config = RendererConfig::default();
//! config.parameters.push(FlagParameter::new("cloud", 3, 1)?);
//! let rgba = flags_to_rgba(&band, &config);
//! ```

mod color;
mod legend;
mod maybe_rayon;
mod model;
mod render;

pub use color::{next_color, parameter_base_color, ColorRamp, Hsl, Rgba};
pub use legend::{legend, LegendEntry};
pub use model::{FlagParameter, FlagParameterSet, FlagState, RendererConfig, MAX_STATE_BITS};
pub use render::{
    code_counts, flags_to_rgba, flags_to_rgba_cancellable, flags_to_rgba_window, Window,
};
