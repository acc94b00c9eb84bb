//! Scalars: 384-bit integers used to multiply points, encoded as 48
//! little-endian bytes. This crate does not perform modular scalar
//! arithmetic (addition, inversion, reduction) since none of its three
//! multiplication entry points need it; scalars are consumed bit-by-bit by
//! the recoding algorithms in [`crate::recoding`].

use crate::FieldBytes;
use zeroize::DefaultIsZeroes;

/// A 384-bit scalar, stored as 48 little-endian bytes. Unlike
/// [`crate::FieldElement`], a `Scalar` is not required to be reduced modulo
/// the curve order `n`: [`crate::mul::point_mul`] accepts any value in
/// `[0, 2^384)`, matching the scalar multiplication entry point's contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar(pub(crate) FieldBytes);

impl Default for Scalar {
    fn default() -> Self {
        Self([0u8; 48])
    }
}

impl Scalar {
    /// Number of bits in a scalar.
    pub const BITS: usize = 384;

    /// Wrap a 48-byte little-endian integer as a scalar.
    pub fn from_bytes(bytes: FieldBytes) -> Self {
        Self(bytes)
    }

    /// The underlying 48 little-endian bytes.
    pub fn to_bytes(self) -> FieldBytes {
        self.0
    }

    /// Extract bit `i` (0 = least significant), per `fiat_p384_get_bit`:
    /// `i >= 384` reads as 0, which lets callers index one bit past the top
    /// of the scalar without a special case (used by the wNAF recoding's
    /// carry-dependent lookahead).
    pub(crate) fn bit(&self, i: usize) -> u8 {
        if i >= Self::BITS {
            return 0;
        }
        (self.0[i / 8] >> (i % 8)) & 1
    }
}

impl DefaultIsZeroes for Scalar {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_extraction() {
        let mut bytes = [0u8; 48];
        bytes[0] = 0b0000_0101;
        let s = Scalar::from_bytes(bytes);
        assert_eq!(s.bit(0), 1);
        assert_eq!(s.bit(1), 0);
        assert_eq!(s.bit(2), 1);
        assert_eq!(s.bit(3), 0);
    }

    #[test]
    fn bit_beyond_top_is_zero() {
        let s = Scalar::from_bytes([0xff; 48]);
        assert_eq!(s.bit(384), 0);
        assert_eq!(s.bit(1000), 0);
    }
}
