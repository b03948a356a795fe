//! # zkbal-verifier
//!
//! `no_std` verification of every proof produced by `zkbal-prover`. Nothing
//! here needs a secret or an RNG; each check recomputes the Fiat-Shamir
//! challenge from the caller's prefix and tests the Sigma equations.
//!
//! Primitive checks ([`sigma`], [`range`]) answer with `bool`. Account
//! operations ([`compose`]) answer with `Result<(), VerifierError>` naming the
//! first sub-proof that failed.
//!
//! Enable `parallel` to check the bits of a range proof on the rayon pool.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compose;
pub mod range;
pub mod sigma;
#[cfg(test)]
mod tests;

use curve25519_dalek::ristretto::RistrettoPoint;
use subtle::ConstantTimeEq;
use thiserror::Error;

use zkbal_primitives::SubProof;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifierError {
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),
    #[error("{0} proof failed")]
    VerificationFailed(SubProof),
}

pub(crate) fn points_eq(a: &RistrettoPoint, b: &RistrettoPoint) -> bool {
    a.ct_eq(b).into()
}
