//! Field arithmetic modulo `p = 2^384 - 2^128 - 2^96 + 2^32 - 1`.
//!
//! Every operation here is treated by the rest of the crate as a provided,
//! constant-time primitive (see `fiat-crypto`'s formally verified P-384
//! backend, extracted from the Coq fiat-crypto libraries). This module is
//! the thin adapter between that backend and the [`FieldElement`] newtype
//! the rest of the crate builds on, plus the one piece of field-level logic
//! this crate owns outright: [`FieldElement::inv_square`].

use crate::{Error, FieldBytes, Result};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use crypto_bigint::U384;
use fiat_crypto::p384_64::{
    fiat_p384_add, fiat_p384_from_bytes, fiat_p384_from_montgomery, fiat_p384_mul,
    fiat_p384_montgomery_domain_field_element as MontFe,
    fiat_p384_non_montgomery_domain_field_element as NonMontFe, fiat_p384_nonzero, fiat_p384_opp,
    fiat_p384_selectznz, fiat_p384_square, fiat_p384_sub, fiat_p384_to_bytes,
    fiat_p384_to_montgomery,
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess};
use zeroize::DefaultIsZeroes;

/// Limb layout used by the `fiat-crypto` P-384 backend: 6 x 64-bit words,
/// least-significant limb first.
type Limbs = [u64; 6];

/// The modulus `p = 2^384 - 2^128 - 2^96 + 2^32 - 1`.
pub(crate) const MODULUS: U384 = U384::from_be_hex(
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff",
);

/// An element of `GF(p)`, always held internally in Montgomery form
/// (`a * R mod p` for `R = 2^384`).
#[derive(Clone, Copy, Debug)]
pub struct FieldElement(pub(crate) U384);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(U384::ZERO);

    /// The Montgomery representation of `1`, i.e. `R mod p`.
    ///
    /// The constant used to seed mixed-addition's implicit `z2 = 1`.
    pub const ONE_MONT: Self = Self(U384::from_be_hex(
        "000000000000000000000000000000000000000000000000000000000000000100000000ffffffffffffffff00000001",
    ));

    /// Decode a little-endian 48-byte integer as a canonical (non-Montgomery)
    /// field element and convert it into Montgomery form.
    ///
    /// Fails with [`Error::InvalidEncoding`] if the integer is `>= p`.
    pub fn from_bytes_mont(bytes: &FieldBytes) -> Result<Self> {
        let mut limbs = Limbs::default();
        fiat_p384_from_bytes(&mut limbs, bytes);
        let w = U384::from_words(limbs);
        if w.ct_lt(&MODULUS).into() {
            Ok(Self(w).to_montgomery())
        } else {
            Err(Error::InvalidEncoding)
        }
    }

    /// Convert this (Montgomery-form) element back out to a canonical
    /// little-endian 48-byte encoding.
    pub fn to_bytes_mont(self) -> FieldBytes {
        let canonical = self.to_canonical();
        let mut bytes = [0u8; 48];
        fiat_p384_to_bytes(&mut bytes, &canonical.0.to_words());
        bytes
    }

    /// Returns `self + rhs`.
    #[inline]
    pub fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }

    /// Returns `self - rhs`.
    #[inline]
    pub fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }

    /// Returns `self * rhs`.
    #[inline]
    pub fn mul(&self, rhs: &Self) -> Self {
        self * rhs
    }

    /// Returns `-self`.
    #[inline]
    pub fn neg(&self) -> Self {
        -*self
    }

    /// Returns `2 * self`.
    #[inline]
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `self * self`.
    #[inline]
    pub fn square(&self) -> Self {
        let mut out = MontFe(Limbs::default());
        fiat_p384_square(&mut out, &MontFe(self.0.to_words()));
        Self(U384::from_words(out.0))
    }

    /// Returns `self^(2^n)`, i.e. `n` repeated squarings.
    fn sqn(&self, n: u32) -> Self {
        let mut x = *self;
        for _ in 0..n {
            x = x.square();
        }
        x
    }

    /// `fe_nonzero`: a limb-wide value that is zero iff `self == 0 (mod p)`.
    pub fn is_nonzero(&self) -> Choice {
        let mut nz = 0u64;
        fiat_p384_nonzero(&mut nz, &self.0.to_words());
        !nz.ct_eq(&0)
    }

    /// Determine if this element is zero.
    pub fn is_zero(&self) -> Choice {
        !self.is_nonzero()
    }

    /// Translate out of the Montgomery domain.
    #[inline]
    pub fn to_canonical(self) -> Self {
        let mut out = NonMontFe(Limbs::default());
        fiat_p384_from_montgomery(&mut out, &MontFe(self.0.to_words()));
        Self(U384::from_words(out.0))
    }

    /// Translate into the Montgomery domain.
    #[inline]
    pub(crate) fn to_montgomery(self) -> Self {
        let mut out = MontFe(Limbs::default());
        fiat_p384_to_montgomery(&mut out, &NonMontFe(self.0.to_words()));
        Self(U384::from_words(out.0))
    }

    /// `self^-2 mod p`, computed via the fixed addition chain for `p - 3`
    /// given in Brian Smith's catalogue of ECC inversion addition chains.
    ///
    /// `a^(p-3) = a^(p-1) * a^-2 = a^-2 (mod p)` by Fermat's little theorem,
    /// so this is the square of the modular inverse, computed without ever
    /// forming the inverse itself (cheaper, and all that `get_affine` needs).
    ///
    /// `p - 3` in hex:
    /// `ffffffff ffffffff ffffffff ffffffff ffffffff ffffffff ffffffff fffffffe`
    /// `ffffffff 00000000 00000000 fffffffc`
    pub fn inv_square(&self) -> Self {
        let x2 = self.square().mul(self); // 2^2 - 2^0
        let x3 = x2.square().mul(self); // 2^3 - 2^0
        let x6 = x3.sqn(3).mul(&x3); // 2^6 - 2^0
        let x12 = x6.sqn(6).mul(&x6); // 2^12 - 2^0
        let x15 = x12.sqn(3).mul(&x3); // 2^15 - 2^0
        let x30 = x15.sqn(15).mul(&x15); // 2^30 - 2^0
        let x60 = x30.sqn(30).mul(&x30); // 2^60 - 2^0
        let x120 = x60.sqn(60).mul(&x60); // 2^120 - 2^0

        let mut ret = x120.sqn(120).mul(&x120); // 2^240 - 2^0
        ret = ret.sqn(15).mul(&x15); // 2^255 - 2^0
        ret = ret.sqn(1 + 30).mul(&x30); // 2^286 - 2^30 - 2^0
        ret = ret.square().square().mul(&x2); // 2^288 - 2^32 - 2^0
        ret = ret.sqn(64 + 30).mul(&x30); // 2^382 - 2^126 - 2^94 + 2^30 - 2^0
        ret.square().square() // 2^384 - 2^128 - 2^96 + 2^32 - 2^2 = p - 3
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(U384::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl DefaultIsZeroes for FieldElement {}

impl PartialEq for FieldElement {
    fn eq(&self, rhs: &Self) -> bool {
        self.0.ct_eq(&rhs.0).into()
    }
}

/// Selects `a` if `choice` is false, `b` if `choice` is true, in constant
/// time. This is the sole primitive (`fe_selectznz`) by which table lookup,
/// conditional negation, and final-result selection are expressed.
pub(crate) fn select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
    let mut out = Limbs::default();
    // `choice` is 0 or 1; `fiat_p384_selectznz` copies `arg2` when its first
    // argument is zero and `arg3` otherwise.
    fiat_p384_selectznz(&mut out, choice.unwrap_u8(), &a.0.to_words(), &b.0.to_words());
    FieldElement(U384::from_words(out))
}

macro_rules! impl_field_op {
    ($op:tt, $op_fn:ident, $func:ident) => {
        impl $op for FieldElement {
            type Output = FieldElement;

            #[inline]
            fn $op_fn(self, rhs: FieldElement) -> FieldElement {
                (&self).$op_fn(&rhs)
            }
        }

        impl $op<&FieldElement> for FieldElement {
            type Output = FieldElement;

            #[inline]
            fn $op_fn(self, rhs: &FieldElement) -> FieldElement {
                (&self).$op_fn(rhs)
            }
        }

        impl $op<&FieldElement> for &FieldElement {
            type Output = FieldElement;

            #[inline]
            fn $op_fn(self, rhs: &FieldElement) -> FieldElement {
                let mut out = MontFe(Limbs::default());
                $func(&mut out, &MontFe(self.0.to_words()), &MontFe(rhs.0.to_words()));
                FieldElement(U384::from_words(out.0))
            }
        }
    };
}

impl_field_op!(Add, add, fiat_p384_add);
impl_field_op!(Sub, sub, fiat_p384_sub);
impl_field_op!(Mul, mul, fiat_p384_mul);

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, rhs: FieldElement) {
        *self = *self + rhs;
    }
}

impl SubAssign for FieldElement {
    #[inline]
    fn sub_assign(&mut self, rhs: FieldElement) {
        *self = *self - rhs;
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: FieldElement) {
        *self = *self * rhs;
    }
}

impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self {
        let mut out = MontFe(Limbs::default());
        fiat_p384_opp(&mut out, &MontFe(self.0.to_words()));
        Self(U384::from_words(out.0))
    }
}
