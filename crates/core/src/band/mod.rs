//! Band data structures and operations

mod element;
mod grid;

pub use element::BandElement;
pub use grid::Band;
