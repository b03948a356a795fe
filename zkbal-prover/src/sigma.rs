//! Sigma protocols: POE, POE2/POEN, PED, ElGamal well-formedness and
//! same-encryption.
//!
//! Every prover samples fresh nonces from `rng`, derives the challenge with
//! [`challenge`] over its commitments in a fixed order and answers with
//! `s = k + c·w` per witness.

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::MultiscalarMul};
use rand::{CryptoRng, RngCore};

use zkbal_primitives::{
    challenge, ElGamalProof, Generators, PedProof, Poe2Proof, PoeProof, PoenProof,
    SameEncryptionProof,
};

use crate::{random_scalar, ProverError};

/// Prove knowledge of `x` with `y = base·x`.
pub fn prove_poe<R: RngCore + CryptoRng>(
    base: &RistrettoPoint,
    x: &Scalar,
    prefix: &Scalar,
    rng: &mut R,
) -> PoeProof {
    let k = random_scalar(rng);
    let a = base * k;
    let c = challenge(prefix, &[a]);
    PoeProof { a, s: k + c * x }
}

/// Forge an accepting POE transcript for `y = base·x` without `x`.
///
/// Returns the proof together with the sub-challenge it is valid for; the
/// caller must arrange for the verifier to use exactly that challenge. Used
/// for the simulated branch of OR-proofs.
pub fn simulate_poe<R: RngCore + CryptoRng>(
    y: &RistrettoPoint,
    base: &RistrettoPoint,
    rng: &mut R,
) -> (PoeProof, Scalar) {
    let s = random_scalar(rng);
    let c = random_scalar(rng);
    let a = base * s - y * c;
    (PoeProof { a, s }, c)
}

/// Prove knowledge of `(x1, x2)` with `y = g1·x1 + g2·x2`.
pub fn prove_poe2<R: RngCore + CryptoRng>(
    g1: &RistrettoPoint,
    g2: &RistrettoPoint,
    x1: &Scalar,
    x2: &Scalar,
    prefix: &Scalar,
    rng: &mut R,
) -> Poe2Proof {
    let k1 = random_scalar(rng);
    let k2 = random_scalar(rng);
    let a = g1 * k1 + g2 * k2;
    let c = challenge(prefix, &[a]);
    Poe2Proof {
        a,
        s1: k1 + c * x1,
        s2: k2 + c * x2,
    }
}

/// Prove knowledge of `(x_1 … x_n)` with `y = Σ g_i·x_i`.
pub fn prove_poen<R: RngCore + CryptoRng>(
    bases: &[RistrettoPoint],
    witnesses: &[Scalar],
    prefix: &Scalar,
    rng: &mut R,
) -> Result<PoenProof, ProverError> {
    if bases.is_empty() {
        return Err(ProverError::MalformedInput("POEN needs at least one base"));
    }
    if bases.len() != witnesses.len() {
        return Err(ProverError::MalformedInput("POEN bases/witnesses length mismatch"));
    }

    let nonces: Vec<Scalar> = bases.iter().map(|_| random_scalar(rng)).collect();
    let a = RistrettoPoint::multiscalar_mul(&nonces, bases);
    let c = challenge(prefix, &[a]);
    let s = nonces
        .iter()
        .zip(witnesses)
        .map(|(k, x)| k + c * x)
        .collect();
    Ok(PoenProof { a, s })
}

/// Prove an opening `(b, r)` of `V = g·b + h·r`.
pub fn prove_ped<R: RngCore + CryptoRng>(
    gens: &Generators,
    b: &Scalar,
    r: &Scalar,
    prefix: &Scalar,
    rng: &mut R,
) -> PedProof {
    prove_poe2(&gens.g, &gens.h, b, r, prefix, rng)
}

/// Prove `(L, R) = Enc[y](b, r)`.
pub fn prove_elgamal<R: RngCore + CryptoRng>(
    gens: &Generators,
    y: &RistrettoPoint,
    b: u64,
    r: &Scalar,
    prefix: &Scalar,
    rng: &mut R,
) -> ElGamalProof {
    let b = Scalar::from(b);
    let kb = random_scalar(rng);
    let kr = random_scalar(rng);

    let al = gens.g * kb + y * kr;
    let ar = gens.g * kr;
    let c = challenge(prefix, &[al, ar]);

    ElGamalProof {
        al,
        ar,
        sb: kb + c * b,
        sr: kr + c * r,
    }
}

/// Prove `Enc[y1](b, r1)` and `Enc[y2](b, r2)` hide the same `b`.
///
/// One `kb` feeds both `AL` commitments so a single `sb` answers both
/// equations.
pub fn prove_same_encryption<R: RngCore + CryptoRng>(
    gens: &Generators,
    y1: &RistrettoPoint,
    y2: &RistrettoPoint,
    b: u64,
    r1: &Scalar,
    r2: &Scalar,
    prefix: &Scalar,
    rng: &mut R,
) -> SameEncryptionProof {
    let b = Scalar::from(b);
    let kb = random_scalar(rng);
    let kr1 = random_scalar(rng);
    let kr2 = random_scalar(rng);

    let al1 = gens.g * kb + y1 * kr1;
    let ar1 = gens.g * kr1;
    let al2 = gens.g * kb + y2 * kr2;
    let ar2 = gens.g * kr2;
    let c = challenge(prefix, &[al1, ar1, al2, ar2]);

    SameEncryptionProof {
        al1,
        ar1,
        al2,
        ar2,
        sb: kb + c * b,
        sr1: kr1 + c * r1,
        sr2: kr2 + c * r2,
    }
}
