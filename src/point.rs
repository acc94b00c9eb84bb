//! Points on the P-384 curve, in Jacobian and affine coordinates, and the
//! two exceptional-case-aware group-law formulas the rest of the crate is
//! built from.

use crate::field::{select, FieldElement};
use crate::{Error, Result};
use crypto_bigint::U384;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeLess};
use zeroize::DefaultIsZeroes;

/// The curve's order `n`.
pub(crate) const ORDER: U384 = U384::from_be_hex(
    "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973",
);

/// `p - n`, used by [`ProjectivePoint::cmp_x_coordinate`] to handle the case
/// where an ECDSA `r` value wrapped modulo the (smaller) group order.
pub(crate) const FIELD_MINUS_ORDER: U384 = U384::from_be_hex(
    "000000000000000000000000000000000000000000000000389cb27e0bc8d21fa7e5f24cb74f58851313e696333ad68c",
);

/// A point on the curve in affine (x, y) coordinates. There is no
/// representation of the point at infinity here: [`ProjectivePoint::get_affine`]
/// returns [`Error::PointAtInfinity`] instead of an `AffinePoint`, matching
/// this crate's decision to keep infinity entirely inside Jacobian space.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

impl AffinePoint {
    /// The generator point `G`.
    pub const GENERATOR: Self = Self {
        x: FieldElement(U384::from_be_hex(
            "4d3aadc2299e1513812ff723614ede2b6454868459a30eff879c3afc541b4d6e20e378e2a0d6ce383dd0756649c0b528",
        )),
        y: FieldElement(U384::from_be_hex(
            "2b78abc25a15c5e9dd8002263969a840c6c3521968f4ffd98bade7562e83b050a1bfa8bf7bb4a9ac23043dad4b03a4fe",
        )),
    };

    /// The x-coordinate, in Montgomery form.
    pub fn x(&self) -> FieldElement {
        self.x
    }

    /// The y-coordinate, in Montgomery form.
    pub fn y(&self) -> FieldElement {
        self.y
    }

    /// Negate this point (reflect across the x-axis).
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
        }
    }

    /// Lift to Jacobian coordinates with `Z = 1`.
    pub fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint {
            x: self.x,
            y: self.y,
            z: FieldElement::ONE_MONT,
        }
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: select(&a.x, &b.x, choice),
            y: select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl Default for AffinePoint {
    /// Not a point on the curve; exists only so `AffinePoint` can implement
    /// [`zeroize::DefaultIsZeroes`].
    fn default() -> Self {
        Self {
            x: FieldElement::ZERO,
            y: FieldElement::ZERO,
        }
    }
}

impl DefaultIsZeroes for AffinePoint {}

/// A point on the curve in Jacobian projective coordinates `(X : Y : Z)`,
/// representing the affine point `(X/Z^2, Y/Z^3)`. `Z == 0` represents the
/// point at infinity.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl ProjectivePoint {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        z: FieldElement::ZERO,
    };

    /// The generator point `G`, in Jacobian coordinates.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE_MONT,
    };

    /// Construct a point directly from Jacobian coordinates. Not validated
    /// against the curve equation; callers are expected to only ever build
    /// points via the generator, the identity, or the group-law operations.
    pub(crate) fn from_raw_jacobian(x: FieldElement, y: FieldElement, z: FieldElement) -> Self {
        Self { x, y, z }
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Negate this point.
    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    /// Conditionally negate this point's `y` coordinate.
    pub(crate) fn conditional_neg(&self, choice: Choice) -> Self {
        Self {
            x: self.x,
            y: select(&self.y, &self.y.neg(), choice),
            z: self.z,
        }
    }

    /// Point doubling, formula dbl-2001-b (valid for `a = -3` curves, which
    /// P-384 is):
    ///
    /// ```text
    /// delta = Z1^2
    /// gamma = Y1^2
    /// beta  = X1*gamma
    /// alpha = 3*(X1-delta)*(X1+delta)
    /// X3    = alpha^2 - 8*beta
    /// Z3    = (Y1+Z1)^2 - gamma - delta
    /// Y3    = alpha*(4*beta-X3) - 8*gamma^2
    /// ```
    ///
    /// Total, including the case `Z1 == 0` (doubling the identity yields the
    /// identity, since `delta = gamma = beta = 0` forces `X3 = Y3 = Z3 = 0`).
    pub fn double(&self) -> Self {
        let delta = self.z.square();
        let gamma = self.y.square();
        let beta = self.x.mul(&gamma);

        let x_minus_delta = self.x.sub(&delta);
        let x_plus_delta = self.x.add(&delta);
        let xm_xp = x_minus_delta.mul(&x_plus_delta);
        let alpha = xm_xp.double().add(&xm_xp);

        let beta4 = beta.double().double();
        let x3 = alpha.square().sub(&beta4.double());

        let y_plus_z = self.y.add(&self.z);
        let z3 = y_plus_z.square().sub(&gamma).sub(&delta);

        let gamma2 = gamma.square();
        let y3 = alpha.mul(&beta4.sub(&x3)).sub(&gamma2.double().double().double());

        Self { x: x3, y: y3, z: z3 }
    }

    /// Point addition, formula add-2007-bl, generalized over `z2` so the
    /// same code path serves both the fully general case and the
    /// mixed-addition case (`z2 = 1`, an affine right-hand operand) used by
    /// the comb and wNAF ladders:
    ///
    /// ```text
    /// Z1Z1 = Z1^2
    /// Z2Z2 = Z2^2
    /// U1   = X1*Z2Z2
    /// U2   = X2*Z1Z1
    /// S1   = Y1*Z2*Z2Z2
    /// S2   = Y2*Z1*Z1Z1
    /// H    = U2-U1
    /// I    = (2*H)^2
    /// J    = H*I
    /// r    = 2*(S2-S1)
    /// V    = U1*I
    /// X3   = r^2-J-2*V
    /// Y3   = r*(V-X3)-2*S1*J
    /// Z3   = ((Z1+Z2)^2-Z1Z1-Z2Z2)*H
    /// ```
    ///
    /// `H == 0` signals that the two points share an x-coordinate: either
    /// they are equal (the formula's `Z3` degenerates to 0 even though the
    /// correct sum is `double(self)`) or they are mutual negatives (the
    /// correct sum is the identity, which the formula also fails to
    /// produce directly). An identity operand is a third degenerate case,
    /// since the formula implicitly assumes both `Z1` and `Z2` are nonzero.
    /// All three are detected and corrected for with constant-time selects
    /// keyed on `Z1 == 0` and `Z2 == 0`, so this function is total and
    /// branch-free regardless of which operand, if either, is secret.
    pub fn add(&self, x2: &FieldElement, y2: &FieldElement, z2: &FieldElement) -> Self {
        let self_is_identity = self.is_identity();
        let other_is_identity = z2.is_zero();

        let z1z1 = self.z.square();
        let z2z2 = z2.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = x2.mul(&z1z1);
        let s1 = self.y.mul(z2).mul(&z2z2);
        let s2 = y2.mul(&self.z).mul(&z1z1);

        let h = u2.sub(&u1);
        let is_coincident_x: Choice = h.is_zero();
        let r_double = s2.sub(&s1);
        let is_coincident_y: Choice = r_double.is_zero();

        let i = h.double().square();
        let j = h.mul(&i);
        let r = r_double.double();
        let v = u1.mul(&i);

        let x3 = r.square().sub(&j).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&j).double());
        let z3 = self.z.add(z2).square().sub(&z1z1).sub(&z2z2).mul(&h);

        let generic = Self { x: x3, y: y3, z: z3 };
        let doubled = self.double();
        let other = Self { x: *x2, y: *y2, z: *z2 };

        // `is_coincident_x & !is_coincident_y` => mutual negatives => identity.
        // `is_coincident_x & is_coincident_y`  => equal points => use `doubled`.
        let use_double = is_coincident_x & is_coincident_y;
        let use_identity = is_coincident_x & !is_coincident_y;

        let mut result = Self::conditional_select(&generic, &doubled, use_double);
        result = Self::conditional_select(&result, &Self::IDENTITY, use_identity);
        result = Self::conditional_select(&result, &other, self_is_identity);
        result = Self::conditional_select(&result, self, other_is_identity);
        result
    }

    /// Mixed addition: `self + affine`, where `affine` is given in affine
    /// coordinates (implicit `Z = 1`).
    pub fn add_mixed(&self, affine: &AffinePoint) -> Self {
        self.add(&affine.x, &affine.y, &FieldElement::ONE_MONT)
    }

    /// Full addition of two Jacobian points.
    pub fn add_projective(&self, other: &Self) -> Self {
        self.add(&other.x, &other.y, &other.z)
    }

    /// Recover the affine representation, failing on the point at infinity.
    pub fn get_affine(&self) -> Result<AffinePoint> {
        if bool::from(self.is_identity()) {
            return Err(Error::PointAtInfinity);
        }
        let zinv2 = self.z.inv_square();
        let zinv4 = zinv2.square();
        // y = Y/Z^3 = (Y*Z) * Z^-4.
        Ok(AffinePoint {
            x: self.x.mul(&zinv2),
            y: self.y.mul(&self.z).mul(&zinv4),
        })
    }

    /// Compare a (public) candidate signature value `r` against this
    /// point's affine x-coordinate reduced modulo the curve order,
    /// accounting for the rare case where `r` itself wrapped modulo `n`
    /// during signing. Used by ECDSA-style verification; not
    /// constant-time, matching the public, non-secret nature of its inputs
    /// (`r` is a signature component, and the point being compared against
    /// is the caller's computed `[u1]G + [u2]Q`).
    pub fn cmp_x_coordinate(&self, r: &U384) -> bool {
        if bool::from(self.is_identity()) {
            return false;
        }
        let z2 = self.z.square();
        let x_affine_num = self.x.to_canonical();

        let r_mont = FieldElement(*r).to_montgomery();
        let rhs = r_mont.mul(&z2).to_canonical();
        if bool::from(x_affine_num.ct_eq(&rhs)) {
            return true;
        }

        if r.ct_lt(&FIELD_MINUS_ORDER).into() {
            let r_plus_n = r.wrapping_add(&ORDER);
            let r_plus_n_mont = FieldElement(r_plus_n).to_montgomery();
            let rhs2 = r_plus_n_mont.mul(&z2).to_canonical();
            if bool::from(x_affine_num.ct_eq(&rhs2)) {
                return true;
            }
        }

        false
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: select(&a.x, &b.x, choice),
            y: select(&a.y, &b.y, choice),
            z: select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    /// Compares the two points' affine representations without ever
    /// forming them, by cross-multiplying through each `Z`. Both operands
    /// being the identity compares equal; exactly one does not.
    fn ct_eq(&self, other: &Self) -> Choice {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let x1 = self.x.mul(&z2z2);
        let x2 = other.x.mul(&z1z1);
        let y1 = self.y.mul(&other.z).mul(&z2z2);
        let y2 = other.y.mul(&self.z).mul(&z1z1);

        let both_identity = self.is_identity() & other.is_identity();
        let neither_identity = !self.is_identity() & !other.is_identity();
        let coords_equal = x1.ct_eq(&x2) & y1.ct_eq(&y2);

        both_identity | (neither_identity & coords_equal)
    }
}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DefaultIsZeroes for ProjectivePoint {}
