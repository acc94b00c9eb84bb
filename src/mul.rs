//! The three scalar-multiplication entry points this crate exists to
//! provide, plus thin public wrappers around the underlying group law.
//!
//! - [`point_mul`]: constant-time `[k]P` for a variable point `P`.
//! - [`point_mul_base`]: constant-time `[k]G` for the fixed generator `G`,
//!   using a table of odd multiples of `G` computed once and reused.
//! - [`point_mul_public`]: variable-time `[k1]G + [k2]P`, for callers (such
//!   as signature verification) where neither scalar nor point is secret.

use crate::point::{AffinePoint, ProjectivePoint};
use crate::recoding::{regular_wnaf, wnaf, REGULAR_DIGITS, WNAF_DIGITS};
use crate::scalar::Scalar;
use crate::table::{
    build_odd_multiples, select_point, select_point_affine, COMB_ROWS, TABLE_SIZE,
};
use crypto_bigint::U384;
use subtle::{Choice, ConditionallySelectable};

/// Window step used by [`point_mul`] and [`point_mul_base`]'s regular
/// recoding: 5 doublings separate each pair of consecutive digits.
const STEP: u32 = 5;

/// Window width used by [`point_mul_public`]'s textbook wNAF recoding of
/// each scalar: a 6-bit window (`w = 5` plus the sign bit), giving signed
/// odd digits in `{-31, ..., -1, 1, ..., 31}`, matching the 16-entry tables.
const PUBLIC_WNAF_WIDTH: u32 = 6;

fn scalar_words(s: &Scalar) -> [u64; 6] {
    let bytes = s.to_bytes();
    let mut words = [0u64; 6];
    for (i, word) in words.iter_mut().enumerate() {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
        *word = u64::from_le_bytes(buf);
    }
    words
}

/// Constant-time scalar multiplication `[k]P` for an arbitrary point `P`.
///
/// `k` may be any 384-bit value, including 0 and multiples of the group
/// order; both yield the point at infinity. The number of field operations
/// performed depends only on the bit lengths involved, never on the value
/// of `k` or the coordinates of `P`, so this function is safe to call with
/// secret `k` and/or secret `P`.
pub fn point_mul(k: &Scalar, p: &ProjectivePoint) -> ProjectivePoint {
    let mut words = scalar_words(k);
    let is_even = Choice::from((k.bit(0) == 0) as u8);
    let digits = regular_wnaf(&mut words);
    let table = build_odd_multiples(p);

    let mut acc = select_point(&table, digits[REGULAR_DIGITS - 1]);
    for &digit in digits[..REGULAR_DIGITS - 1].iter().rev() {
        for _ in 0..STEP {
            acc = acc.double();
        }
        let term = select_point(&table, digit);
        acc = acc.add_projective(&term);
    }

    // `regular_wnaf` forces the recoded value's low bit to 1, so `acc` is
    // actually `[k]P` if `k` was odd, or `[k + 1]P` if `k` was even; in the
    // latter case subtract `P` back out.
    let compensated = acc.add_projective(&p.neg());
    ProjectivePoint::conditional_select(&acc, &compensated, is_even)
}

fn point_mul_base_with_table(
    k: &Scalar,
    table: &[[AffinePoint; TABLE_SIZE]; COMB_ROWS],
) -> ProjectivePoint {
    let mut words = scalar_words(k);
    let is_even = Choice::from((k.bit(0) == 0) as u8);
    let digits = regular_wnaf(&mut words);

    let mut acc = ProjectivePoint::IDENTITY;
    for g in (0..4usize).rev() {
        if g != 3 {
            for _ in 0..STEP {
                acc = acc.double();
            }
        }
        let mut j = g;
        let mut row = 0usize;
        while j < REGULAR_DIGITS {
            let term = select_point_affine(&table[row], digits[j]);
            acc = acc.add_mixed(&term);
            j += 4;
            row += 1;
        }
    }

    // Same even-scalar compensation as `point_mul`, against the generator.
    let compensated = acc.add_mixed(&AffinePoint::GENERATOR.neg());
    ProjectivePoint::conditional_select(&acc, &compensated, is_even)
}

/// Constant-time scalar multiplication `[k]G` for the fixed generator `G`,
/// using a precomputed comb table of odd multiples of powers of `G`.
#[cfg(feature = "std")]
pub fn point_mul_base(k: &Scalar) -> ProjectivePoint {
    point_mul_base_with_table(k, crate::table::fixed_base_table())
}

/// Constant-time scalar multiplication `[k]G` for the fixed generator `G`.
///
/// Without the `std` feature there is no portable way to cache the
/// generator's table across calls, so it is rebuilt (from the same
/// constant-time group law used everywhere else in this crate) on every
/// call; the arithmetic performed is otherwise identical to the cached
/// `std` path.
#[cfg(not(feature = "std"))]
pub fn point_mul_base(k: &Scalar) -> ProjectivePoint {
    let table = crate::table::fixed_base_table_owned();
    point_mul_base_with_table(k, &table)
}

/// Variable-time joint multiplication `[k1]G + [k2]P`, for use when neither
/// scalar nor point is secret — chiefly, verifying a signature, where `k1`
/// and `k2` are public verifier-derived scalars and `P` is the public key.
///
/// Implemented as two interleaved textbook-wNAF ladders sharing a single
/// sequence of doublings (a form of Shamir's trick): at each bit position,
/// the running accumulator is doubled once and then has zero, one, or both
/// scalars' table entries added in, skipping additions for zero digits.
/// This data-dependent branching is what makes the function faster than
/// [`point_mul`] for public inputs, and unsafe to use for secret ones.
///
/// Doubling is skipped for as long as the accumulator is still the point at
/// infinity, and the first nonzero digit encountered is copied in directly
/// rather than added to it — both are pure performance optimizations valid
/// only because the accumulator's identity-ness is itself public here. If a
/// later cancellation brings the accumulator back to infinity mid-loop, that
/// is not re-detected; the next doubling is simply wasted work, not a
/// correctness problem, since doubling the identity yields the identity.
pub fn point_mul_public(k1: &Scalar, k2: &Scalar, p: &ProjectivePoint) -> ProjectivePoint {
    let g_digits = wnaf(scalar_words(k1), PUBLIC_WNAF_WIDTH);
    let p_digits = wnaf(scalar_words(k2), PUBLIC_WNAF_WIDTH);
    let p_table = build_odd_multiples(p);

    // Only the comb's first row (plain odd multiples of `G` itself) is
    // needed here: this ladder walks bit by bit rather than in 20-bit
    // jumps, unlike `point_mul_base`'s comb-structured ladder.
    #[cfg(feature = "std")]
    let g_table = &crate::table::fixed_base_table()[0];
    #[cfg(not(feature = "std"))]
    let g_table_owned = crate::table::fixed_base_table_owned();
    #[cfg(not(feature = "std"))]
    let g_table = &g_table_owned[0];

    let mut acc = ProjectivePoint::IDENTITY;
    let mut acc_is_inf = true;
    for i in (0..WNAF_DIGITS).rev() {
        if !acc_is_inf {
            acc = acc.double();
        }
        if p_digits[i] != 0 {
            let term = select_point(&p_table, p_digits[i] as i16);
            if acc_is_inf {
                acc = term;
                acc_is_inf = false;
            } else {
                acc = acc.add_projective(&term);
            }
        }
        if g_digits[i] != 0 {
            let term = select_point_affine(g_table, g_digits[i] as i16);
            if acc_is_inf {
                acc = term.to_projective();
                acc_is_inf = false;
            } else {
                acc = acc.add_mixed(&term);
            }
        }
    }
    acc
}

/// Jacobian point doubling. A thin public wrapper around
/// [`ProjectivePoint::double`], named to match this crate's external
/// interface for the underlying group law.
pub fn point_double_generic(p: &ProjectivePoint) -> ProjectivePoint {
    p.double()
}

/// Jacobian point addition. A thin public wrapper around
/// [`ProjectivePoint::add_projective`].
pub fn point_add_generic(p1: &ProjectivePoint, p2: &ProjectivePoint) -> ProjectivePoint {
    p1.add_projective(p2)
}

/// Compare a public candidate value (e.g. an ECDSA signature's `r`) against
/// a point's affine x-coordinate reduced modulo the group order.
pub fn cmp_x_coordinate(p: &ProjectivePoint, r: &U384) -> bool {
    p.cmp_x_coordinate(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldBytes;
    use crypto_bigint::ArrayEncoding;
    use subtle::ConstantTimeEq;

    fn scalar_from_u64(v: u64) -> Scalar {
        let mut bytes: FieldBytes = [0u8; 48];
        bytes[..8].copy_from_slice(&v.to_le_bytes());
        Scalar::from_bytes(bytes)
    }

    #[test]
    fn mul_by_one_is_identity_op() {
        let g = ProjectivePoint::GENERATOR;
        let result = point_mul(&scalar_from_u64(1), &g);
        assert!(bool::from(
            result.get_affine().unwrap().ct_eq(&AffinePoint::GENERATOR)
        ));
    }

    #[test]
    fn mul_by_zero_is_point_at_infinity() {
        let g = ProjectivePoint::GENERATOR;
        let result = point_mul(&scalar_from_u64(0), &g);
        assert!(bool::from(result.is_identity()));
    }

    #[test]
    fn mul_by_two_matches_doubling() {
        let g = ProjectivePoint::GENERATOR;
        let via_mul = point_mul(&scalar_from_u64(2), &g);
        let via_double = g.double();
        assert!(bool::from(via_mul.ct_eq(&via_double)));
    }

    #[test]
    fn mul_base_matches_mul_by_generator() {
        let k = scalar_from_u64(123_456_789);
        let via_base = point_mul_base(&k);
        let via_generic = point_mul(&k, &ProjectivePoint::GENERATOR);
        assert!(bool::from(via_base.ct_eq(&via_generic)));
    }

    #[test]
    fn mul_public_matches_sum_of_muls() {
        let k1 = scalar_from_u64(17);
        let k2 = scalar_from_u64(9_999);
        let p = ProjectivePoint::GENERATOR.double();

        let joint = point_mul_public(&k1, &k2, &p);
        let expected = point_mul_base(&k1).add_projective(&point_mul(&k2, &p));
        assert!(bool::from(joint.ct_eq(&expected)));
    }

    #[test]
    fn mul_by_order_is_point_at_infinity() {
        let mut bytes = [0u8; 48];
        bytes.copy_from_slice(&crate::point::ORDER.to_le_byte_array());
        let k = Scalar::from_bytes(bytes);
        let result = point_mul(&k, &ProjectivePoint::GENERATOR);
        assert!(bool::from(result.is_identity()));
    }
}


