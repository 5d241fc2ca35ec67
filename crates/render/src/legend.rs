//! Legend derivation from a flag parameter set.

use crate::color::Rgba;
use crate::model::FlagParameterSet;

/// One legend row: display label plus the state's color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
}

/// Build the legend for every visible state, in parameter order then code
/// order.
///
/// Labels read `"Bit {first}:{value}:{name}"` for single-bit parameters and
/// `"Bit {first}-{last}:{value}:{name}"` for wider ranges. Invisible states
/// are omitted entirely.
pub fn legend(parameters: &FlagParameterSet) -> Vec<LegendEntry> {
    let mut entries = Vec::new();
    for parameter in parameters {
        let first = parameter.first_bit();
        let last = parameter.last_bit();
        for state in parameter.states().iter().filter(|s| s.visible) {
            let label = if first == last {
                format!("Bit {}:{}:{}", first, state.value(), state.name)
            } else {
                format!("Bit {}-{}:{}:{}", first, last, state.value(), state.name)
            };
            entries.push(LegendEntry {
                label,
                color: state.color,
            });
        }
    }
    entries
}
