//! Scalar recoding: turning a 384-bit scalar into a sequence of small signed
//! odd digits, each of which indexes a precomputed table of odd multiples of
//! a point, so that multiplication becomes a sequence of table lookups,
//! point additions, and repeated doublings instead of a naive double-and-add
//! over individual bits.
//!
//! Two recodings are implemented, matching the two ladders in [`crate::mul`]:
//!
//! - [`regular_wnaf`]: a *regular* (data-independent-length, fixed digit
//!   count) recoding, for the constant-time variable-point ladder. Every
//!   scalar produces exactly [`REGULAR_DIGITS`] digits, so the number of
//!   loop iterations, table lookups, and point operations never depends on
//!   the scalar's value.
//! - [`wnaf`]: the textbook windowed NAF, which allows zero digits and a
//!   scalar-dependent digit count. This leaks the scalar through timing and
//!   is only ever used on public scalars (verification's `u1`, `u2`).

/// Window step for the regular recoding: digits are spaced 5 bits apart.
const REGULAR_WINDOW: u32 = 5;

/// Number of digits produced by [`regular_wnaf`] for a (possibly
/// one-bit-extended) 385-bit odd scalar: `ceil(385 / 5)`.
pub(crate) const REGULAR_DIGITS: usize = 77;

/// Largest odd digit magnitude produced by [`regular_wnaf`]: `2^5 - 1`.
pub(crate) const REGULAR_MAX_DIGIT: i16 = 31;

/// Recode a scalar into [`REGULAR_DIGITS`] signed odd digits `d_i` in
/// `{-31, -29, ..., -1, 1, ..., 31}` such that
/// `sum_i d_i * 2^(5*i) == k + (1 - (k mod 2))`, i.e. `k` itself if `k` is
/// odd, or `k + 1` if `k` is even.
///
/// This is the regular, fixed-length recoding of Tunstall, Joye, Oswald, and
/// Whelan ("Exponent Recoding and Regular Exponentiation Algorithms",
/// AfricaCrypt 2009, Algorithm 6), specialized to a window step of 5: at
/// each step the low 6 bits of the running value are read off, centered to
/// `[-32, 31]`, and subtracted; since the running value is always odd, the
/// resulting digit is always odd too, and the remaining value (after
/// shifting right by 5) is odd again, so the invariant holds for every one
/// of the fixed [`REGULAR_DIGITS`] steps regardless of the scalar's value.
///
/// This recodes `words` as given if it is already odd; if it is even, bit 0
/// is forced to 1 before recoding starts, so the value actually recoded is
/// `k` if `k` is odd or `k + 1` if `k` is even. Callers that need the exact
/// value `k` (not `k + 1`) are responsible for compensating afterwards,
/// which [`crate::mul`] does with a final constant-time conditional
/// subtraction. This function itself has no data-dependent control flow.
pub(crate) fn regular_wnaf(words: &mut [u64; 6]) -> [i16; REGULAR_DIGITS] {
    words[0] |= 1;
    let mut digits = [0i16; REGULAR_DIGITS];

    for digit in digits.iter_mut().take(REGULAR_DIGITS - 1) {
        let window = (words[0] & 0x3f) as i16;
        // Unconditional centering: since `words` is always odd here, the
        // low 6 bits are too, so `window - 32` is always an odd value in
        // `[-31, 31]` and the remaining value after subtracting it and
        // shifting right by 5 is always odd again. A centering that
        // instead took the low 6 bits' two's-complement interpretation
        // (conditionally subtracting 64 only when `window > 31`) would
        // break this invariant: see `wnaf` below, which does exactly that
        // and is correct there precisely because it has no such invariant
        // to preserve.
        let centered = window - 32;
        *digit = centered;
        sub_signed(words, centered);
        shr5(words);
    }

    // Whatever remains fits in the last digit; the regularity invariant
    // guarantees it is odd and within range.
    digits[REGULAR_DIGITS - 1] = words[0] as i16;

    digits
}

/// Subtract a small signed value (magnitude `<= 32`) from a 384-bit
/// little-endian limb array, wrapping as unsigned 384-bit arithmetic
/// (borrows/carries propagate across all 6 limbs).
fn sub_signed(words: &mut [u64; 6], value: i16) {
    if value >= 0 {
        sub_u64(words, value as u64);
    } else {
        add_u64(words, (-value) as u64);
    }
}

fn sub_u64(words: &mut [u64; 6], value: u64) {
    let (r0, borrow) = words[0].overflowing_sub(value);
    words[0] = r0;
    let mut borrow = borrow;
    for w in words.iter_mut().skip(1) {
        let (r, b) = w.overflowing_sub(borrow as u64);
        *w = r;
        borrow = b;
    }
}

fn add_u64(words: &mut [u64; 6], value: u64) {
    let (r0, carry) = words[0].overflowing_add(value);
    words[0] = r0;
    let mut carry = carry;
    for w in words.iter_mut().skip(1) {
        let (r, c) = w.overflowing_add(carry as u64);
        *w = r;
        carry = c;
    }
}

/// Shift a 6-limb little-endian array right by 5 bits.
fn shr5(words: &mut [u64; 6]) {
    let mut carry = 0u64;
    for w in words.iter_mut().rev() {
        let new_carry = *w & 0x1f;
        *w = (*w >> 5) | (carry << 59);
        carry = new_carry;
    }
}

/// Maximum number of digits produced by [`wnaf`]: one more than the scalar's
/// bit length, so a possible final carry digit always has room.
pub(crate) const WNAF_DIGITS: usize = 385;

/// Textbook windowed non-adjacent form, width `w`. Unlike [`regular_wnaf`],
/// digits may be zero and the effective digit count depends on the scalar's
/// value (trailing positions beyond the scalar's highest set bit are all
/// zero). This recoding is variable-time by construction and must only ever
/// be applied to scalars that are already public, such as the two scalars
/// `u1`, `u2` combined by [`crate::mul::point_mul_public`].
pub(crate) fn wnaf(mut words: [u64; 6], w: u32) -> [i8; WNAF_DIGITS] {
    debug_assert!((2..=7).contains(&w));
    let mut digits = [0i8; WNAF_DIGITS];
    let modulus = 1i32 << w;
    let half = modulus >> 1;

    let mut i = 0;
    while i < WNAF_DIGITS && !is_zero(&words) {
        if words[0] & 1 == 1 {
            let window = (words[0] & (modulus as u64 - 1)) as i32;
            let d = if window >= half { window - modulus } else { window };
            digits[i] = d as i8;
            sub_signed(&mut words, d as i16);
        }
        shr1(&mut words);
        i += 1;
    }

    digits
}

fn is_zero(words: &[u64; 6]) -> bool {
    words.iter().all(|&w| w == 0)
}

fn shr1(words: &mut [u64; 6]) {
    let mut carry = 0u64;
    for w in words.iter_mut().rev() {
        let new_carry = *w & 1;
        *w = (*w >> 1) | (carry << 63);
        carry = new_carry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn to_words(bytes: &[u8; 48]) -> [u64; 6] {
        let mut words = [0u64; 6];
        for (i, word) in words.iter_mut().enumerate() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            *word = u64::from_le_bytes(buf);
        }
        words
    }

    #[test]
    fn regular_wnaf_small_odd_value() {
        let mut bytes = [0u8; 48];
        bytes[0] = 57; // odd
        let mut words = to_words(&bytes);
        let digits = regular_wnaf(&mut words);
        let mut expected = [0u64; 6];
        expected[0] = 57;
        assert_eq!(reconstruct_regular_words(&digits), expected);
        for &d in digits.iter() {
            assert_eq!(d.unsigned_abs() % 2, 1);
        }
    }

    #[test]
    fn regular_wnaf_digits_are_odd_and_bounded() {
        let mut bytes = [0u8; 48];
        bytes[0] = 0xab;
        bytes[10] = 0x13;
        bytes[47] = 0x01;
        let mut words = to_words(&bytes);
        let digits = regular_wnaf(&mut words);
        for &d in digits.iter() {
            assert!(d.unsigned_abs() % 2 == 1);
            assert!(d.unsigned_abs() <= REGULAR_MAX_DIGIT as u16);
        }
    }

    #[test]
    fn wnaf_reconstructs_value() {
        let mut bytes = [0u8; 48];
        bytes[0] = 200;
        bytes[1] = 1;
        let words = to_words(&bytes);
        let digits = wnaf(words, 5);
        let mut expected = [0u64; 6];
        expected[0] = 200 + 256;
        assert_eq!(reconstruct_wnaf_words(&digits), expected);
    }

    #[test]
    fn wnaf_has_no_adjacent_nonzero_digits() {
        let mut bytes = [0u8; 48];
        bytes[3] = 0xff;
        bytes[4] = 0xff;
        let words = to_words(&bytes);
        let digits = wnaf(words, 5);
        for i in 0..digits.len() - 1 {
            if digits[i] != 0 {
                assert_eq!(digits[i + 1], 0);
            }
        }
    }

    /// Mirror of [`shr5`], for reconstructing a recoded value by Horner's
    /// method from the most significant digit down.
    fn shl5(words: &mut [u64; 6]) {
        let mut carry = 0u64;
        for w in words.iter_mut() {
            let new_carry = *w >> 59;
            *w = (*w << 5) | carry;
            carry = new_carry;
        }
    }

    /// Mirror of [`shr1`].
    fn shl1(words: &mut [u64; 6]) {
        let mut carry = 0u64;
        for w in words.iter_mut() {
            let new_carry = *w >> 63;
            *w = (*w << 1) | carry;
            carry = new_carry;
        }
    }

    /// Reconstruct the 384-bit value `sum_i digits[i] * 2^(5*i)` (mod
    /// `2^384`) by Horner's method, most significant digit first. Used to
    /// check [`regular_wnaf`]'s round-trip invariant against the
    /// bit0-forced value it actually recodes.
    fn reconstruct_regular_words(digits: &[i16; REGULAR_DIGITS]) -> [u64; 6] {
        let mut acc = [0u64; 6];
        sub_signed(&mut acc, -digits[REGULAR_DIGITS - 1]);
        for &d in digits[..REGULAR_DIGITS - 1].iter().rev() {
            shl5(&mut acc);
            sub_signed(&mut acc, -d);
        }
        acc
    }

    /// Reconstruct the 384-bit value `sum_i digits[i] * 2^i` (mod `2^384`)
    /// by Horner's method, most significant digit first.
    fn reconstruct_wnaf_words(digits: &[i8; WNAF_DIGITS]) -> [u64; 6] {
        let mut acc = [0u64; 6];
        sub_signed(&mut acc, -(digits[WNAF_DIGITS - 1] as i16));
        for &d in digits[..WNAF_DIGITS - 1].iter().rev() {
            shl1(&mut acc);
            sub_signed(&mut acc, -(d as i16));
        }
        acc
    }

    proptest! {
        /// `regular_wnaf` recodes `words` with bit 0 forced to 1; its digits
        /// must reconstruct exactly that forced value, for every 48-byte
        /// scalar, not just hand-picked ones.
        #[test]
        fn regular_wnaf_round_trips_arbitrary_scalar(bytes in any::<[u8; 48]>()) {
            let mut words = to_words(&bytes);
            let mut forced = words;
            forced[0] |= 1;
            let digits = regular_wnaf(&mut words);
            prop_assert_eq!(reconstruct_regular_words(&digits), forced);
        }

        /// `wnaf` must reconstruct the exact scalar it was given, for every
        /// 48-byte scalar.
        #[test]
        fn wnaf_round_trips_arbitrary_scalar(bytes in any::<[u8; 48]>()) {
            let words = to_words(&bytes);
            let digits = wnaf(words, 6);
            prop_assert_eq!(reconstruct_wnaf_words(&digits), words);
        }
    }
}
