//! Band-to-RGBA rendering of flag parameters.
//!
//! The engine runs one compositing pass per parameter, in set order, over a
//! shared output buffer pre-filled with the no-data color. Each pass builds
//! a per-code lookup table (color where the state is visible, nothing where
//! it is not) and probes it once per pixel, so the hot loop is a shift, a
//! mask and a table read regardless of how many states the parameter has.
//! Later passes overwrite earlier ones wherever bit ranges overlap.

use crate::color::Rgba;
use crate::maybe_rayon::*;
use crate::model::{FlagParameter, RendererConfig};
use flagrast_core::{Band, BandElement, Error, Result};
use ndarray::ArrayView2;
use std::sync::atomic::{AtomicBool, Ordering};

/// A rectangular sub-region of a band, in pixel coordinates.
///
/// The tile handle a host tiling engine passes to [`flags_to_rgba_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Row of the window's top-left cell in the source band.
    pub row_offset: usize,
    /// Column of the window's top-left cell in the source band.
    pub col_offset: usize,
    /// Number of rows in the window.
    pub rows: usize,
    /// Number of columns in the window.
    pub cols: usize,
}

impl Window {
    pub fn new(row_offset: usize, col_offset: usize, rows: usize, cols: usize) -> Self {
        Self {
            row_offset,
            col_offset,
            rows,
            cols,
        }
    }
}

/// Per-parameter lookup table: extracted code -> RGBA bytes, `None` where
/// the state is invisible.
struct CodeLut {
    first_bit: u32,
    mask: u64,
    colors: Vec<Option<[u8; 4]>>,
}

impl CodeLut {
    fn new(parameter: &FlagParameter) -> Self {
        Self {
            first_bit: parameter.first_bit(),
            mask: parameter.code_mask(),
            colors: parameter
                .states()
                .iter()
                .map(|s| s.visible.then(|| s.color.to_array()))
                .collect(),
        }
    }

    #[inline]
    fn lookup(&self, word: u64) -> Option<[u8; 4]> {
        let code = word.checked_shr(self.first_bit).unwrap_or(0) & self.mask;
        self.colors[code as usize]
    }
}

fn render_view<T: BandElement>(
    view: &ArrayView2<'_, T>,
    nodata: Option<T>,
    config: &RendererConfig,
    cancel: Option<&AtomicBool>,
) -> Result<Vec<u8>> {
    let (rows, cols) = view.dim();
    if rows == 0 || cols == 0 {
        return Ok(Vec::new());
    }

    let mut rgba = config.no_data_color.to_array().repeat(rows * cols);

    if config.parameters.is_empty() {
        tracing::debug!("no flag parameters configured; output is the no-data color");
        return Ok(rgba);
    }

    for parameter in &config.parameters {
        // Cancellation granularity is the parameter pass: a pass that has
        // started always completes, keeping the buffer consistent.
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }

        let lut = CodeLut::new(parameter);
        rgba.par_chunks_exact_mut(cols * 4)
            .enumerate()
            .for_each(|(row, out_row)| {
                for (col, px) in out_row.chunks_exact_mut(4).enumerate() {
                    let value = unsafe { *view.uget((row, col)) };
                    if value.is_nodata(nodata) {
                        continue;
                    }
                    if let Some(color) = lut.lookup(value.to_bits()) {
                        px.copy_from_slice(&color);
                    }
                }
            });
    }

    Ok(rgba)
}

/// Render a band to an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `rows * cols * 4` in row-major order with
/// straight (non-premultiplied) alpha; hosts that composite premultiplied
/// must convert on upload.
///
/// Pixels no visible state claims keep `config.no_data_color`, as do pixels
/// equal to the band's declared no-data value. An empty parameter set
/// yields a buffer entirely in the no-data color; it is not an error.
pub fn flags_to_rgba<T: BandElement>(band: &Band<T>, config: &RendererConfig) -> Vec<u8> {
    // render_view only fails on cancellation, and no cancel flag is passed.
    render_view(&band.view(), band.nodata(), config, None).unwrap_or_default()
}

/// Render a band, checking `cancel` between parameter passes.
///
/// Returns [`Error::Cancelled`] once the flag is observed set. An
/// in-progress pass always completes before the check.
pub fn flags_to_rgba_cancellable<T: BandElement>(
    band: &Band<T>,
    config: &RendererConfig,
    cancel: &AtomicBool,
) -> Result<Vec<u8>> {
    render_view(&band.view(), band.nodata(), config, Some(cancel))
}

/// Render one window of a band, for tiled hosts.
///
/// The output buffer covers exactly `window.rows * window.cols` pixels and
/// matches the corresponding sub-rectangle of a full render.
pub fn flags_to_rgba_window<T: BandElement>(
    band: &Band<T>,
    window: &Window,
    config: &RendererConfig,
) -> Result<Vec<u8>> {
    let view = band.window(window.row_offset, window.col_offset, window.rows, window.cols)?;
    render_view(&view, band.nodata(), config, None)
}

/// Count how many pixels decode to each of a parameter's codes.
///
/// Returns one count per state (indexed by code). Pixels equal to the
/// band's declared no-data value are excluded.
pub fn code_counts<T: BandElement>(band: &Band<T>, parameter: &FlagParameter) -> Vec<u64> {
    let nodata = band.nodata();
    let mut counts = vec![0u64; parameter.states().len()];
    for &value in band.data().iter() {
        if value.is_nodata(nodata) {
            continue;
        }
        counts[parameter.extract(value.to_bits()) as usize] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlagParameter, FlagParameterSet};

    const NO_DATA: Rgba = Rgba::new(9, 9, 9, 9);

    fn config(parameters: FlagParameterSet) -> RendererConfig {
        RendererConfig {
            band_index: 0,
            no_data_color: NO_DATA,
            parameters,
        }
    }

    fn pixel(rgba: &[u8], i: usize) -> [u8; 4] {
        rgba[i * 4..i * 4 + 4].try_into().unwrap()
    }

    #[test]
    fn empty_parameter_set_yields_no_data_color() {
        let band = Band::from_vec(vec![0u16, 1, 2, 3, 4, 5], 2, 3).unwrap();
        let rgba = flags_to_rgba(&band, &config(FlagParameterSet::new()));
        assert_eq!(rgba.len(), 24);
        for i in 0..6 {
            assert_eq!(pixel(&rgba, i), NO_DATA.to_array());
        }
    }

    #[test]
    fn two_bit_parameter_maps_codes_to_state_colors() {
        let band = Band::from_vec(vec![0u8, 1, 2, 3], 1, 4).unwrap();
        let p = FlagParameter::new("p", 0, 2).unwrap();
        let colors: Vec<[u8; 4]> = p.states().iter().map(|s| s.color.to_array()).collect();

        let rgba = flags_to_rgba(&band, &config([p].into_iter().collect()));
        for (i, color) in colors.iter().enumerate() {
            assert_eq!(pixel(&rgba, i), *color);
        }
    }

    #[test]
    fn invisible_states_leave_pixels_untouched() {
        let band = Band::from_vec(vec![0u8, 1], 1, 2).unwrap();
        let mut p = FlagParameter::new("p", 0, 1).unwrap();
        p.state_mut(1).unwrap().visible = false;
        let c0 = p.state(0).unwrap().color.to_array();

        let rgba = flags_to_rgba(&band, &config([p].into_iter().collect()));
        assert_eq!(pixel(&rgba, 0), c0);
        assert_eq!(pixel(&rgba, 1), NO_DATA.to_array());
    }

    #[test]
    fn later_parameter_wins_on_overlap() {
        let band = Band::from_vec(vec![0u8, 1, 0, 1], 1, 4).unwrap();
        let first = FlagParameter::new("first", 0, 1).unwrap();
        let mut second = FlagParameter::new("second", 0, 1).unwrap();
        second.state_mut(0).unwrap().color = Rgba::opaque(10, 20, 30);
        second.state_mut(1).unwrap().color = Rgba::opaque(40, 50, 60);

        let rgba = flags_to_rgba(&band, &config([first, second].into_iter().collect()));
        for i in 0..4 {
            let expected = if i % 2 == 0 {
                [10, 20, 30, 255]
            } else {
                [40, 50, 60, 255]
            };
            assert_eq!(pixel(&rgba, i), expected);
        }
    }

    #[test]
    fn earlier_parameter_shows_through_invisible_overlap() {
        let band = Band::from_vec(vec![0u8, 1], 1, 2).unwrap();
        let first = FlagParameter::new("first", 0, 1).unwrap();
        let c: Vec<[u8; 4]> = first.states().iter().map(|s| s.color.to_array()).collect();
        let mut second = FlagParameter::new("second", 0, 1).unwrap();
        second.state_mut(0).unwrap().visible = false;
        second.state_mut(1).unwrap().visible = false;

        let rgba = flags_to_rgba(&band, &config([first, second].into_iter().collect()));
        assert_eq!(pixel(&rgba, 0), c[0]);
        assert_eq!(pixel(&rgba, 1), c[1]);
    }

    #[test]
    fn declared_nodata_pixels_keep_no_data_color() {
        let mut band = Band::from_vec(vec![0u8, 1, 1], 1, 3).unwrap();
        band.set_nodata(Some(1));
        let p = FlagParameter::new("p", 0, 1).unwrap();
        let c0 = p.state(0).unwrap().color.to_array();

        let rgba = flags_to_rgba(&band, &config([p].into_iter().collect()));
        assert_eq!(pixel(&rgba, 0), c0);
        assert_eq!(pixel(&rgba, 1), NO_DATA.to_array());
        assert_eq!(pixel(&rgba, 2), NO_DATA.to_array());
    }

    #[test]
    fn high_bits_decode_for_signed_sources() {
        // -1i16 has all 16 bits set, so code at bits 14-15 is 0b11.
        let band = Band::from_vec(vec![-1i16, 0], 1, 2).unwrap();
        let p = FlagParameter::new("high", 14, 2).unwrap();
        let c3 = p.state(3).unwrap().color.to_array();
        let c0 = p.state(0).unwrap().color.to_array();

        let rgba = flags_to_rgba(&band, &config([p].into_iter().collect()));
        assert_eq!(pixel(&rgba, 0), c3);
        assert_eq!(pixel(&rgba, 1), c0);
    }

    #[test]
    fn window_render_matches_full_render_sub_rect() {
        let values: Vec<u16> = (0..36).map(|i| i % 8).collect();
        let band = Band::from_vec(values, 6, 6).unwrap();
        let p = FlagParameter::new("p", 0, 3).unwrap();
        let cfg = config([p].into_iter().collect());

        let full = flags_to_rgba(&band, &cfg);
        let window = Window::new(2, 1, 3, 4);
        let tile = flags_to_rgba_window(&band, &window, &cfg).unwrap();

        assert_eq!(tile.len(), 3 * 4 * 4);
        for r in 0..window.rows {
            for c in 0..window.cols {
                let full_i = (window.row_offset + r) * 6 + window.col_offset + c;
                let tile_i = r * window.cols + c;
                assert_eq!(pixel(&tile, tile_i), pixel(&full, full_i));
            }
        }
    }

    #[test]
    fn window_out_of_bounds_is_rejected() {
        let band: Band<u8> = Band::new(4, 4);
        let cfg = config(FlagParameterSet::new());
        let err = flags_to_rgba_window(&band, &Window::new(2, 2, 3, 1), &cfg).unwrap_err();
        assert!(matches!(err, Error::WindowOutOfBounds { .. }));
    }

    #[test]
    fn pre_set_cancel_flag_aborts() {
        let band: Band<u8> = Band::new(8, 8);
        let p = FlagParameter::new("p", 0, 1).unwrap();
        let cancel = AtomicBool::new(true);
        let err = flags_to_rgba_cancellable(&band, &config([p].into_iter().collect()), &cancel)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn unset_cancel_flag_renders_normally() {
        let band = Band::from_vec(vec![1u8; 16], 4, 4).unwrap();
        let p = FlagParameter::new("p", 0, 1).unwrap();
        let cfg = config([p].into_iter().collect());
        let cancel = AtomicBool::new(false);

        let cancellable = flags_to_rgba_cancellable(&band, &cfg, &cancel).unwrap();
        assert_eq!(cancellable, flags_to_rgba(&band, &cfg));
    }

    #[test]
    fn code_counts_histogram() {
        let mut band = Band::from_vec(vec![0u8, 1, 2, 2, 3, 0], 2, 3).unwrap();
        let p = FlagParameter::new("p", 0, 2).unwrap();
        assert_eq!(code_counts(&band, &p), vec![2, 1, 2, 1]);

        band.set_nodata(Some(2));
        assert_eq!(code_counts(&band, &p), vec![2, 1, 0, 1]);
        assert_eq!(code_counts(&band, &p).iter().sum::<u64>(), 4);
    }
}
