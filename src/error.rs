//! Error type.

use core::fmt::{self, Display};

/// Errors produced by the P-384 scalar-multiplication core.
///
/// These are the only two failure modes the core has: everything else
/// (doubling the identity, adding equal/opposite/identity points, scalar
/// multiplication by any scalar including 0 and the group order) is total
/// and cannot fail.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// [`crate::point::ProjectivePoint::get_affine`] was called on the point
    /// at infinity, which has no affine representation.
    PointAtInfinity,

    /// A byte string passed to [`crate::FieldElement::from_bytes_mont`] did
    /// not encode an integer in `[0, p)`.
    InvalidEncoding,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PointAtInfinity => f.write_str("point is the point at infinity"),
            Error::InvalidEncoding => f.write_str("value is not a valid field element encoding"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
