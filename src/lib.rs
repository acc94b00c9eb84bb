//! Constant-time scalar-multiplication core for the NIST P-384 elliptic
//! curve (a.k.a. secp384r1), as defined in FIPS 186-4 / SP 800-186.
//!
//! This crate implements exactly the cryptographic hot path shared by
//! ECDSA signing/verification and ECDH over P-384:
//!
//! - [`mul::point_mul`] — variable-point multiplication `[k]P`, constant-time.
//! - [`mul::point_mul_base`] — fixed-base multiplication `[k]G` using a
//!   precomputed comb table, constant-time.
//! - [`mul::point_mul_public`] — joint multiplication `[k1]G + [k2]P`,
//!   variable-time, for use when both scalars and both points are public
//!   (e.g. signature verification).
//!
//! Field arithmetic modulo `p = 2^384 - 2^128 - 2^96 + 2^32 - 1` is supplied
//! by the [`fiat-crypto`](https://docs.rs/fiat-crypto) crate's formally
//! verified, constant-time P-384 backend; this crate builds the point
//! arithmetic, scalar recoding, and windowed ladders on top of it.
//!
//! Deliberately out of scope: curves other than P-384, scalar blinding,
//! variable-time optimizations on secret inputs, point serialization, and
//! the ECDSA/ECDH protocols themselves. Callers needing those should layer
//! them on top of the primitives exported here.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

mod error;
mod field;
mod point;
mod recoding;
mod scalar;
mod table;

pub mod mul;

pub use crate::error::Error;
pub use crate::field::FieldElement;
pub use crate::point::{AffinePoint, ProjectivePoint};
pub use crate::scalar::Scalar;

/// Result type with [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Number of bytes in a P-384 field element or scalar (384 bits).
pub const FIELD_BYTES: usize = 48;

/// A 48-byte little-endian scalar or field element encoding.
pub type FieldBytes = [u8; FIELD_BYTES];
