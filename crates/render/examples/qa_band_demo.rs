//! QA band demo: decode and render a synthetic quality-assessment band
//!
//! Builds a 64x64 band with a Landsat-style bit layout:
//! - bits 0-1: surface class (land / water / snow / unused)
//! - bit  2:   cloud
//! - bits 3-4: cloud confidence
//!
//! Then configures a renderer for it, prints the legend and per-code pixel
//! counts, and renders the band to an RGBA buffer.
//!
//! Run:
//!   cargo run -p flagrast-render --example qa_band_demo

use flagrast_core::Band;
use flagrast_render::{
    code_counts, flags_to_rgba, legend, FlagParameter, FlagParameterSet, RendererConfig, Rgba,
};

const ROWS: usize = 64;
const COLS: usize = 64;

fn main() {
    // --- 1. Synthetic QA band ---
    let mut band: Band<u16> = Band::new(ROWS, COLS);
    for row in 0..ROWS {
        for col in 0..COLS {
            let class = ((col * 3) / COLS) as u16; // land | water | snow stripes
            let cloud = u16::from(row < 12);
            let confidence = (row % 4) as u16;
            band.set(row, col, class | (cloud << 2) | (confidence << 3))
                .unwrap();
        }
    }
    println!("QA band: {}x{} u16", COLS, ROWS);

    // --- 2. Styling configuration ---
    let mut class = FlagParameter::new("surface class", 0, 2).unwrap();
    for (code, name, color) in [
        (0, "land", Rgba::opaque(34, 139, 34)),
        (1, "water", Rgba::opaque(8, 48, 107)),
        (2, "snow", Rgba::opaque(240, 249, 255)),
    ] {
        let state = class.state_mut(code).unwrap();
        state.name = name.into();
        state.color = color;
    }
    class.state_mut(3).unwrap().visible = false; // unused code

    let mut cloud = FlagParameter::new("cloud", 2, 1).unwrap();
    cloud.state_mut(0).unwrap().visible = false;
    cloud.state_mut(1).unwrap().name = "cloudy".into();
    cloud.state_mut(1).unwrap().color = Rgba::new(240, 240, 240, 200);

    let mut parameters = FlagParameterSet::new();
    parameters.push(class);
    parameters.push(cloud);

    let overlaps = parameters.validate();
    println!("overlapping parameter pairs: {}", overlaps.len());

    let config = RendererConfig {
        band_index: 0,
        no_data_color: Rgba::TRANSPARENT,
        parameters,
    };

    // --- 3. Legend ---
    println!("\nLegend:");
    for entry in legend(&config.parameters) {
        let Rgba { r, g, b, a } = entry.color;
        println!("  {:<22} #{:02x}{:02x}{:02x}{:02x}", entry.label, r, g, b, a);
    }

    // --- 4. Per-code pixel counts ---
    println!("\nPixel counts:");
    for parameter in &config.parameters {
        let counts = code_counts(&band, parameter);
        println!("  {}: {:?}", parameter.name, counts);
    }

    // --- 5. Render ---
    let rgba = flags_to_rgba(&band, &config);
    let opaque = rgba.chunks_exact(4).filter(|px| px[3] == 255).count();
    println!(
        "\nRendered {} pixels ({} bytes), {} fully opaque",
        rgba.len() / 4,
        rgba.len(),
        opaque
    );
}
