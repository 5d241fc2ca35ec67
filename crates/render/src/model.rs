//! Flag styling data model.
//!
//! A [`FlagParameter`] names one contiguous bit range of the band's pixel
//! word and carries one [`FlagState`] per possible code in that range. The
//! active configuration is an ordered [`FlagParameterSet`]; set order is
//! compositing order, so where bit ranges overlap the later parameter wins.

use crate::color::{next_color, parameter_base_color, ColorRamp, Rgba};
use flagrast_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on `bit_count` for dense state tables (`2^bit_count` entries).
pub const MAX_STATE_BITS: u32 = 16;

/// One decoded code within a flag parameter: display name, color, visibility.
///
/// `name`, `color` and `visible` are free to edit; `value` and `bit_offset`
/// are maintained by the owning [`FlagParameter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagState {
    bit_offset: u32,
    value: u32,
    pub name: String,
    pub color: Rgba,
    pub visible: bool,
}

impl FlagState {
    fn new(bit_offset: u32, value: u32, color: Rgba) -> Self {
        Self {
            bit_offset,
            value,
            name: format!("state {}", value + 1),
            color,
            visible: true,
        }
    }

    /// First bit of the owning parameter's range.
    pub fn bit_offset(&self) -> u32 {
        self.bit_offset
    }

    /// The decoded code this state represents.
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// A named contiguous bit range plus the dense table of its states.
///
/// The table always holds `2^bit_count` entries with `states[i].value == i`.
/// Default colors are generated at construction and are a pure function of
/// `(first_bit, value)`; later edits to `first_bit` or the states keep
/// whatever colors are already assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FlagParameterRepr")]
pub struct FlagParameter {
    pub name: String,
    first_bit: u32,
    bit_count: u32,
    states: Vec<FlagState>,
}

impl FlagParameter {
    /// Create a parameter covering `bit_count` bits starting at `first_bit`,
    /// with one default state per possible code.
    ///
    /// Fails with [`Error::InvalidBitCount`] when `bit_count` is 0 or
    /// exceeds 128, and with [`Error::StateTableTooLarge`] beyond
    /// [`MAX_STATE_BITS`].
    pub fn new(name: impl Into<String>, first_bit: u32, bit_count: u32) -> Result<Self> {
        validate_bit_count(bit_count)?;

        let count = 1usize << bit_count;
        let mut states = Vec::with_capacity(count);
        let mut color = parameter_base_color(first_bit);
        states.push(FlagState::new(first_bit, 0, color));
        for value in 1..count as u32 {
            color = next_color(color, ColorRamp::Continuous);
            states.push(FlagState::new(first_bit, value, color));
        }

        Ok(Self {
            name: name.into(),
            first_bit,
            bit_count,
            states,
        })
    }

    /// First bit of the range.
    pub fn first_bit(&self) -> u32 {
        self.first_bit
    }

    /// Width of the range in bits.
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Last bit of the range (inclusive).
    pub fn last_bit(&self) -> u32 {
        self.first_bit + self.bit_count - 1
    }

    /// Mask of the low `bit_count` bits, applied after shifting.
    pub fn code_mask(&self) -> u64 {
        (1u64 << self.bit_count) - 1
    }

    /// Mask of the range within the pixel word. Zero when the range lies
    /// entirely past bit 63.
    pub fn word_mask(&self) -> u64 {
        self.code_mask().checked_shl(self.first_bit).unwrap_or(0)
    }

    /// Extract this parameter's code from a pixel word.
    ///
    /// Total for any `first_bit`: ranges past the 64-bit working word
    /// decode to 0.
    pub fn extract(&self, word: u64) -> u64 {
        word.checked_shr(self.first_bit).unwrap_or(0) & self.code_mask()
    }

    /// The dense state table, indexed by code.
    pub fn states(&self) -> &[FlagState] {
        &self.states
    }

    /// State for a specific code.
    pub fn state(&self, value: u32) -> Option<&FlagState> {
        self.states.get(value as usize)
    }

    /// Mutable state for a specific code (rename, recolor, toggle visibility).
    pub fn state_mut(&mut self, value: u32) -> Option<&mut FlagState> {
        self.states.get_mut(value as usize)
    }

    /// Move the range to a new first bit, keeping the state table and its
    /// colors as they are.
    pub fn set_first_bit(&mut self, first_bit: u32) {
        self.first_bit = first_bit;
        for state in &mut self.states {
            state.bit_offset = first_bit;
        }
    }

    /// Resize the range to `bit_count` bits.
    ///
    /// Growing appends fresh default states, continuing the color sequence
    /// from the last existing state. Shrinking truncates the table: the
    /// removed states' customizations are lost, so callers should confirm
    /// before shrinking.
    pub fn set_bit_count(&mut self, bit_count: u32) -> Result<()> {
        validate_bit_count(bit_count)?;

        let count = 1usize << bit_count;
        if count < self.states.len() {
            self.states.truncate(count);
        } else {
            let mut color = self.states[self.states.len() - 1].color;
            for value in self.states.len() as u32..count as u32 {
                color = next_color(color, ColorRamp::Continuous);
                self.states.push(FlagState::new(self.first_bit, value, color));
            }
        }
        self.bit_count = bit_count;
        Ok(())
    }

    /// Whether this parameter's bit range intersects another's.
    pub fn overlaps(&self, other: &FlagParameter) -> bool {
        self.first_bit <= other.last_bit() && other.first_bit <= self.last_bit()
    }
}

fn validate_bit_count(bit_count: u32) -> Result<()> {
    if bit_count == 0 || bit_count > 128 {
        return Err(Error::InvalidBitCount { bit_count });
    }
    if bit_count > MAX_STATE_BITS {
        return Err(Error::StateTableTooLarge {
            bit_count,
            max_bits: MAX_STATE_BITS,
        });
    }
    Ok(())
}

/// Serde-side mirror of [`FlagParameter`]; deserialization re-validates the
/// dense-table invariants before admitting the value.
#[derive(Deserialize)]
struct FlagParameterRepr {
    name: String,
    first_bit: u32,
    bit_count: u32,
    states: Vec<FlagState>,
}

impl TryFrom<FlagParameterRepr> for FlagParameter {
    type Error = Error;

    fn try_from(repr: FlagParameterRepr) -> Result<Self> {
        validate_bit_count(repr.bit_count)?;
        if repr.states.len() != 1usize << repr.bit_count {
            return Err(Error::Other(format!(
                "flag parameter '{}' has {} states, expected {}",
                repr.name,
                repr.states.len(),
                1usize << repr.bit_count
            )));
        }
        for (i, state) in repr.states.iter().enumerate() {
            if state.value as usize != i || state.bit_offset != repr.first_bit {
                return Err(Error::Other(format!(
                    "flag parameter '{}' has an inconsistent state table at index {}",
                    repr.name, i
                )));
            }
        }
        Ok(Self {
            name: repr.name,
            first_bit: repr.first_bit,
            bit_count: repr.bit_count,
            states: repr.states,
        })
    }
}

/// Ordered collection of flag parameters: the active styling configuration.
///
/// Insertion order is the compositing order. `Clone` is a deep copy and is
/// the snapshot handed to renders running off the editing thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagParameterSet {
    parameters: Vec<FlagParameter>,
}

impl FlagParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter at the end (it will composite over all earlier ones).
    pub fn push(&mut self, parameter: FlagParameter) {
        self.parameters.push(parameter);
    }

    /// Insert a parameter at a specific position in the compositing order.
    pub fn insert(&mut self, index: usize, parameter: FlagParameter) {
        self.parameters.insert(index, parameter);
    }

    /// Remove and return the parameter at `index`.
    pub fn remove(&mut self, index: usize) -> FlagParameter {
        self.parameters.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&FlagParameter> {
        self.parameters.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FlagParameter> {
        self.parameters.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlagParameter> {
        self.parameters.iter()
    }

    /// Reorder to the conventional ascending-by-first-bit layout (stable).
    pub fn sort_by_first_bit(&mut self) {
        self.parameters.sort_by_key(FlagParameter::first_bit);
    }

    /// Index pairs of parameters whose bit ranges intersect.
    pub fn overlaps(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.parameters.len() {
            for j in i + 1..self.parameters.len() {
                if self.parameters[i].overlaps(&self.parameters[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Report overlapping bit ranges, warning once per pair.
    ///
    /// Overlaps are legal (the later parameter wins where both match a
    /// pixel) but usually indicate a misconfigured product.
    pub fn validate(&self) -> Vec<(usize, usize)> {
        let pairs = self.overlaps();
        for &(i, j) in &pairs {
            tracing::warn!(
                "flag parameters '{}' (bits {}-{}) and '{}' (bits {}-{}) overlap; the later one wins where both match",
                self.parameters[i].name,
                self.parameters[i].first_bit(),
                self.parameters[i].last_bit(),
                self.parameters[j].name,
                self.parameters[j].first_bit(),
                self.parameters[j].last_bit(),
            );
        }
        pairs
    }
}

impl<'a> IntoIterator for &'a FlagParameterSet {
    type Item = &'a FlagParameter;
    type IntoIter = std::slice::Iter<'a, FlagParameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

impl FromIterator<FlagParameter> for FlagParameterSet {
    fn from_iter<I: IntoIterator<Item = FlagParameter>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}

/// Complete renderer configuration: which band to decode, the fallback
/// color, and the parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Index of the source band within the host's raster.
    pub band_index: u32,
    /// Color for pixels no visible state claims.
    pub no_data_color: Rgba,
    pub parameters: FlagParameterSet,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            band_index: 0,
            no_data_color: Rgba::TRANSPARENT,
            parameters: FlagParameterSet::new(),
        }
    }
}
