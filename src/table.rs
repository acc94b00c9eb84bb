//! Precomputed tables of odd multiples of a point, and the constant-time
//! lookup used to pull a signed digit's corresponding entry back out of one.

use crate::field::select;
use crate::point::{AffinePoint, ProjectivePoint};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Number of entries in an odd-multiples table: one per magnitude in
/// `{1, 3, 5, ..., 31}`.
pub(crate) const TABLE_SIZE: usize = 16;

/// Build the table `{P, 3P, 5P, ..., 31P}` in Jacobian coordinates.
///
/// Used for the per-call table in [`crate::mul::point_mul`], where `P` is
/// a variable, secret-adjacent point supplied by the caller and the table
/// cannot be amortized across calls.
pub(crate) fn build_odd_multiples(p: &ProjectivePoint) -> [ProjectivePoint; TABLE_SIZE] {
    let double = p.double();
    let mut table = [*p; TABLE_SIZE];
    for i in 1..TABLE_SIZE {
        table[i] = table[i - 1].add_projective(&double);
    }
    table
}

/// Build the table `{P, 3P, 5P, ..., 31P}` in affine coordinates.
///
/// Used for the fixed-base table in [`crate::table::fixed_base_table`],
/// where `P` is the generator and every entry is worth converting to
/// affine once up front: every subsequent [`crate::mul::point_mul_base`]
/// call then does a cheaper mixed addition against each entry instead of a
/// full Jacobian addition.
pub(crate) fn build_odd_multiples_affine(p: &ProjectivePoint) -> [AffinePoint; TABLE_SIZE] {
    let jacobian = build_odd_multiples(p);
    let mut affine = [AffinePoint::GENERATOR; TABLE_SIZE];
    for (dst, src) in affine.iter_mut().zip(jacobian.iter()) {
        // Every entry in an odd-multiples table of a point with nonzero
        // order is itself nonzero, so `get_affine` cannot fail here.
        *dst = src.get_affine().expect("odd multiple of a nonzero point is never the identity");
    }
    affine
}

/// Constant-time lookup of a signed odd digit's table entry: returns
/// `sign(digit) * table[(|digit| - 1) / 2]`. Every entry of `table` is
/// inspected regardless of `digit`'s value, so the memory access pattern
/// does not depend on which entry was selected.
pub(crate) fn select_point(table: &[ProjectivePoint; TABLE_SIZE], digit: i16) -> ProjectivePoint {
    let index = ((digit.unsigned_abs() - 1) / 2) as u8;
    let mut result = table[0];
    for (i, entry) in table.iter().enumerate() {
        let is_match = (i as u8).ct_eq(&index);
        result = ProjectivePoint::conditional_select(&result, entry, is_match);
    }
    result.conditional_neg(Choice::from((digit < 0) as u8))
}

/// Constant-time lookup of a signed odd digit's table entry, from an affine
/// table. Used by the fixed-base ladder.
pub(crate) fn select_point_affine(table: &[AffinePoint; TABLE_SIZE], digit: i16) -> AffinePoint {
    let index = ((digit.unsigned_abs() - 1) / 2) as u8;
    let mut result = table[0];
    for (i, entry) in table.iter().enumerate() {
        let is_match = (i as u8).ct_eq(&index);
        result = AffinePoint::conditional_select(&result, entry, is_match);
    }
    let neg_y = result.y.neg();
    AffinePoint {
        x: result.x,
        y: select(&result.y, &neg_y, Choice::from((digit < 0) as u8)),
    }
}

/// Number of sub-tables in the fixed-base comb: `T_G[k]` holds the odd
/// multiples of `(2^20)^k * G`, so 20 rows cover the full 385-bit range
/// that [`regular_wnaf`](crate::recoding::regular_wnaf) can produce
/// (`20 * 20 = 400 > 385`, with room to spare).
pub(crate) const COMB_ROWS: usize = 20;

/// Bits of scalar covered by each step between comb rows: row `k` is
/// `(2^COMB_ROW_BITS)^k * G`.
pub(crate) const COMB_ROW_BITS: u32 = 20;

/// Build the 20-row, 16-column comb table for the fixed generator `g`:
/// row `k`, column `m` holds `(2m + 1) * (2^COMB_ROW_BITS)^k * g`.
///
/// [`crate::mul::point_mul_base`] groups the 77 regular-wNAF digits of a
/// scalar by `digit_index mod 4` into four groups of roughly 19-20 digits
/// each; digit `d[4k + g]` is looked up in row `k` of this table, so the
/// comb's row count must cover every `k` that can appear, i.e. up to
/// `(REGULAR_DIGITS - 1) / 4 == 19`.
pub(crate) fn build_fixed_base_comb(g: &ProjectivePoint) -> [[AffinePoint; TABLE_SIZE]; COMB_ROWS] {
    let mut rows = [[AffinePoint::GENERATOR; TABLE_SIZE]; COMB_ROWS];
    let mut base = *g;
    for (k, row) in rows.iter_mut().enumerate() {
        *row = build_odd_multiples_affine(&base);
        if k + 1 < COMB_ROWS {
            for _ in 0..COMB_ROW_BITS {
                base = base.double();
            }
        }
    }
    rows
}

#[cfg(feature = "std")]
mod fixed_base {
    use super::*;
    use std::sync::OnceLock;

    static TABLE: OnceLock<[[AffinePoint; TABLE_SIZE]; COMB_ROWS]> = OnceLock::new();

    /// The generator's comb table, built once and reused by every
    /// subsequent [`crate::mul::point_mul_base`] call.
    pub(crate) fn fixed_base_table() -> &'static [[AffinePoint; TABLE_SIZE]; COMB_ROWS] {
        TABLE.get_or_init(|| build_fixed_base_comb(&ProjectivePoint::GENERATOR))
    }
}

#[cfg(not(feature = "std"))]
mod fixed_base {
    use super::*;

    /// Without `std` there is no portable `no_std` cell that is both
    /// `Sync` and safe to initialize lazily from a shared static, so the
    /// table is rebuilt on every call instead of cached. The arithmetic
    /// performed is identical either way.
    pub(crate) fn fixed_base_table_owned() -> [[AffinePoint; TABLE_SIZE]; COMB_ROWS] {
        build_fixed_base_comb(&ProjectivePoint::GENERATOR)
    }
}

#[cfg(feature = "std")]
pub(crate) use fixed_base::fixed_base_table;

#[cfg(not(feature = "std"))]
pub(crate) use fixed_base::fixed_base_table_owned;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_entries_are_odd_multiples() {
        let g = ProjectivePoint::GENERATOR;
        let table = build_odd_multiples(&g);
        for (i, entry) in table.iter().enumerate() {
            let mag = 2 * i as i16 + 1;
            let mut expected = g;
            for _ in 1..mag {
                expected = expected.add_projective(&g);
            }
            assert!(bool::from(
                entry.get_affine().unwrap().ct_eq(&expected.get_affine().unwrap())
            ));
        }
    }

    #[test]
    fn select_point_handles_sign() {
        let g = ProjectivePoint::GENERATOR;
        let table = build_odd_multiples(&g);
        let pos = select_point(&table, 5);
        let neg = select_point(&table, -5);
        assert!(bool::from(pos.ct_eq(&neg.neg())));
    }

    #[test]
    fn comb_row_one_is_row_zero_doubled_twenty_times() {
        let g = ProjectivePoint::GENERATOR;
        let comb = build_fixed_base_comb(&g);

        let mut base = g;
        for _ in 0..COMB_ROW_BITS {
            base = base.double();
        }
        let expected_row = build_odd_multiples_affine(&base);

        for (entry, expected) in comb[1].iter().zip(expected_row.iter()) {
            assert!(bool::from(entry.ct_eq(expected)));
        }
    }
}
