//! Band element trait for integer cell values

use num_traits::Zero;
use std::fmt::Debug;

/// Trait for types that can be stored in a flag band cell.
///
/// Flag rasters pack small integer fields into the bits of one word, so
/// only fixed-width integer types qualify. Every element converts to a
/// 64-bit working word via [`to_bits`](BandElement::to_bits), which is what
/// the renderer extracts bit ranges from.
pub trait BandElement:
    Copy + Clone + Debug + PartialEq + Eq + PartialOrd + Ord + Zero + Send + Sync + 'static
{
    /// Reinterpret the value as its unsigned bit pattern, zero-extended to 64 bits.
    ///
    /// Signed values keep their two's-complement bits within the source
    /// width: `(-1i16).to_bits() == 0xFFFF`, not `u64::MAX`.
    fn to_bits(self) -> u64;

    /// Check if this value equals the declared no-data value
    fn is_nodata(&self, nodata: Option<Self>) -> bool {
        match nodata {
            Some(nd) => *self == nd,
            None => false,
        }
    }
}

macro_rules! impl_band_element {
    ($t:ty as $u:ty) => {
        impl BandElement for $t {
            fn to_bits(self) -> u64 {
                self as $u as u64
            }
        }
    };
}

impl_band_element!(u8 as u8);
impl_band_element!(u16 as u16);
impl_band_element!(u32 as u32);
impl_band_element!(u64 as u64);
impl_band_element!(i8 as u8);
impl_band_element!(i16 as u16);
impl_band_element!(i32 as u32);
impl_band_element!(i64 as u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bits_zero_extends_unsigned() {
        assert_eq!(200u8.to_bits(), 200);
        assert_eq!(0xFFFFu16.to_bits(), 0xFFFF);
        assert_eq!(u64::MAX.to_bits(), u64::MAX);
    }

    #[test]
    fn to_bits_reinterprets_signed_within_width() {
        assert_eq!((-1i8).to_bits(), 0xFF);
        assert_eq!((-1i16).to_bits(), 0xFFFF);
        assert_eq!((-1i32).to_bits(), 0xFFFF_FFFF);
        assert_eq!(i16::MIN.to_bits(), 0x8000);
    }

    #[test]
    fn nodata_comparison() {
        assert!(42u16.is_nodata(Some(42)));
        assert!(!42u16.is_nodata(Some(0)));
        assert!(!42u16.is_nodata(None));
    }
}
