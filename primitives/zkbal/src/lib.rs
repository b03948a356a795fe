//! # zkbal-primitives
//!
//! Types shared between the client-side prover and the `no_std` verifier:
//!
//! - [`Generators`]: the public `(g, h)` pair every proof is built against.
//! - [`Ciphertext`]: exponential ElGamal `(L, R) = (g·b + y·r, g·r)` with
//!   homomorphic `+` and `-`.
//! - [`transcript`]: the Fiat-Shamir challenge engine.
//! - [`proofs`]: Sigma-protocol proof structs (POE family, ElGamal, bit,
//!   range, same-encryption).
//! - [`ops`]: public inputs and proofs of the account operations.
//!
//! Nothing here touches secrets; key generation, sampling and proving live
//! in `zkbal-prover`.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod elgamal;
pub mod ops;
pub mod proofs;
pub mod transcript;


use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use sha2::Sha512;

pub use elgamal::{
    encrypt, fund_ciphertext, homomorphic_add, homomorphic_sub, Ciphertext, FundConfig,
    FundRandomness,
};
pub use ops::*;
pub use proofs::*;
pub use transcript::{
    append_point, bit_prefix, challenge, challenge_over, challenge_scalar, domain_prefix, labels,
    new_transcript, statement_prefix, Operation, ProofContext, SDK_VERSION,
};

/// Bit length of balances and amounts handled by the account operations.
pub const BALANCE_BITS: usize = 32;

/// Largest bit length a range proof accepts.
pub const MAX_RANGE_BITS: usize = 64;

/// Seed for the Pedersen blinding generator `h`.
const PEDERSEN_H_SEED: &[u8] = b"zkbal/PedersenH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),
}

/// Public generators.
///
/// `g` encodes values and keys, `h` blinds Pedersen commitments. Callers pass
/// this explicitly into every operation so tests can substitute their own
/// pair; production code uses [`Generators::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generators {
    pub g: RistrettoPoint,
    pub h: RistrettoPoint,
}

impl Generators {
    pub const fn new(g: RistrettoPoint, h: RistrettoPoint) -> Self {
        Self { g, h }
    }
}

impl Default for Generators {
    fn default() -> Self {
        Self {
            g: RISTRETTO_BASEPOINT_POINT,
            h: pedersen_h_generator(),
        }
    }
}

/// `h = hash_to_point("zkbal/PedersenH")`; nobody knows `log_g(h)`.
pub fn pedersen_h_generator() -> RistrettoPoint {
    RistrettoPoint::hash_from_bytes::<Sha512>(PEDERSEN_H_SEED)
}

/// Pedersen commitment `g·value + h·blind`.
pub fn pedersen_commit(gens: &Generators, value: &Scalar, blind: &Scalar) -> RistrettoPoint {
    gens.g * value + gens.h * blind
}

pub fn point_to_bytes(p: &RistrettoPoint) -> [u8; 32] {
    p.compress().to_bytes()
}

pub fn point_from_bytes(bytes: &[u8; 32]) -> Result<RistrettoPoint, Error> {
    CompressedRistretto(*bytes)
        .decompress()
        .ok_or(Error::MalformedInput("invalid point encoding"))
}

/// Decode a scalar, rejecting encodings that are not reduced mod ℓ.
pub fn scalar_from_bytes(bytes: &[u8; 32]) -> Result<Scalar, Error> {
    Option::from(Scalar::from_canonical_bytes(*bytes))
        .ok_or(Error::MalformedInput("non-canonical scalar"))
}

/// Slice variant of [`point_from_bytes`] for length-unchecked buffers.
pub fn point_from_slice(bytes: &[u8]) -> Result<RistrettoPoint, Error> {
    let arr: [u8; 32] = bytes
        .try_into()
        .map_err(|_| Error::MalformedInput("point must be 32 bytes"))?;
    point_from_bytes(&arr)
}
