//! Bit OR-proofs and bit-decomposition range proofs.

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use log::debug;

use zkbal_primitives::{
    bit_prefix, challenge, BitCommitment, BitProof, Generators, RangeProof, MAX_RANGE_BITS,
};

use crate::{points_eq, VerifierError};

/// `v` commits to 0 or 1.
///
/// `c1 = c − c0`; accepts iff `h·s0 == A0 + v·c0` and
/// `h·s1 == A1 + (v − g)·c1`.
pub fn verify_bit(
    gens: &Generators,
    v: &RistrettoPoint,
    proof: &BitProof,
    prefix: &Scalar,
) -> bool {
    let c = challenge(prefix, &[proof.a0, proof.a1]);
    let c1 = c - proof.c0;
    let zero = points_eq(&(gens.h * proof.s0), &(proof.a0 + v * proof.c0));
    let one = points_eq(&(gens.h * proof.s1), &(proof.a1 + (v - gens.g) * c1));
    zero & one
}

fn verify_bit_at(gens: &Generators, index: usize, bit: &BitCommitment, prefix: &Scalar) -> bool {
    verify_bit(gens, &bit.v, &bit.proof, &bit_prefix(prefix, index))
}

/// `v` commits to a value in `[0, 2^bits)`.
///
/// The proof must carry exactly `bits` bit commitments recomposing to `v`.
/// A wrong length is [`VerifierError::MalformedInput`]; a bad bit or
/// recomposition is `Ok(false)`.
pub fn verify_range(
    gens: &Generators,
    v: &RistrettoPoint,
    proof: &RangeProof,
    bits: usize,
    prefix: &Scalar,
) -> Result<bool, VerifierError> {
    if bits == 0 || bits > MAX_RANGE_BITS {
        return Err(VerifierError::MalformedInput(
            "range bit length must be in 1..=64",
        ));
    }
    if proof.len() != bits {
        return Err(VerifierError::MalformedInput(
            "range proof has the wrong number of bits",
        ));
    }
    if !points_eq(&proof.commitment(), v) {
        debug!(target: "zkbal", "range commitment does not recompose");
        return Ok(false);
    }

    #[cfg(feature = "parallel")]
    let ok = {
        use rayon::prelude::*;
        proof
            .bits
            .par_iter()
            .enumerate()
            .all(|(i, bit)| verify_bit_at(gens, i, bit, prefix))
    };
    #[cfg(not(feature = "parallel"))]
    let ok = proof
        .bits
        .iter()
        .enumerate()
        .all(|(i, bit)| verify_bit_at(gens, i, bit, prefix));

    if !ok {
        debug!(target: "zkbal", "range proof bit rejected");
    }
    Ok(ok)
}
