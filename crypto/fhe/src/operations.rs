//! Homomorphic operations on serialized ciphertexts
//!
//! Each operation deserializes its operands, applies the TFHE-rs native
//! operator and reserializes the result. The global server key must be
//! installed (`set_server_key`) before any of these run.

use tfhe::prelude::*;

use crate::ciphertext::{CipherKind, Ciphertext};
use crate::FHEResult;

/// Homomorphic operations over `Uint64`-kinded ciphertexts
pub struct FHEOps;

impl FHEOps {
    /// Homomorphic addition of two encrypted u64 values
    pub fn add(a: &Ciphertext, b: &Ciphertext) -> FHEResult<Ciphertext> {
        a.expect_kind(CipherKind::Uint64)?;
        b.expect_kind(CipherKind::Uint64)?;

        let lhs = a.to_fhe_uint64()?;
        let rhs = b.to_fhe_uint64()?;
        // TFHE-rs uses operator overloading for homomorphic ops
        let result = &lhs + &rhs;

        Ciphertext::from_fhe_uint64(&result)
    }

    /// Homomorphic subtraction of two encrypted u64 values
    pub fn sub(a: &Ciphertext, b: &Ciphertext) -> FHEResult<Ciphertext> {
        a.expect_kind(CipherKind::Uint64)?;
        b.expect_kind(CipherKind::Uint64)?;

        let lhs = a.to_fhe_uint64()?;
        let rhs = b.to_fhe_uint64()?;
        let result = &lhs - &rhs;

        Ciphertext::from_fhe_uint64(&result)
    }

    /// Homomorphic less-than-or-equal comparison, yielding a `Bool` ciphertext
    pub fn le(a: &Ciphertext, b: &Ciphertext) -> FHEResult<Ciphertext> {
        a.expect_kind(CipherKind::Uint64)?;
        b.expect_kind(CipherKind::Uint64)?;

        let lhs = a.to_fhe_uint64()?;
        let rhs = b.to_fhe_uint64()?;
        let result = lhs.le(&rhs);

        Ciphertext::from_fhe_bool(&result)
    }

    /// Homomorphic less-than comparison, yielding a `Bool` ciphertext
    pub fn lt(a: &Ciphertext, b: &Ciphertext) -> FHEResult<Ciphertext> {
        a.expect_kind(CipherKind::Uint64)?;
        b.expect_kind(CipherKind::Uint64)?;

        let lhs = a.to_fhe_uint64()?;
        let rhs = b.to_fhe_uint64()?;
        let result = lhs.lt(&rhs);

        Ciphertext::from_fhe_bool(&result)
    }

    /// Homomorphic equality comparison, yielding a `Bool` ciphertext
    pub fn eq(a: &Ciphertext, b: &Ciphertext) -> FHEResult<Ciphertext> {
        a.expect_kind(CipherKind::Uint64)?;
        b.expect_kind(CipherKind::Uint64)?;

        let lhs = a.to_fhe_uint64()?;
        let rhs = b.to_fhe_uint64()?;
        let result = lhs.eq(&rhs);

        Ciphertext::from_fhe_bool(&result)
    }
}
