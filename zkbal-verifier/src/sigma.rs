//! Checks for the POE family, ElGamal well-formedness and same-encryption.

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::MultiscalarMul};

use zkbal_primitives::{
    challenge, Ciphertext, ElGamalProof, Generators, PedProof, Poe2Proof, PoeProof, PoenProof,
    SameEncryptionProof,
};

use crate::{points_eq, VerifierError};

/// `base·s == A + y·c`.
pub fn verify_poe(
    y: &RistrettoPoint,
    base: &RistrettoPoint,
    proof: &PoeProof,
    prefix: &Scalar,
) -> bool {
    let c = challenge(prefix, &[proof.a]);
    points_eq(&(base * proof.s), &(proof.a + y * c))
}

/// `g1·s1 + g2·s2 == A + y·c`.
pub fn verify_poe2(
    y: &RistrettoPoint,
    g1: &RistrettoPoint,
    g2: &RistrettoPoint,
    proof: &Poe2Proof,
    prefix: &Scalar,
) -> bool {
    let c = challenge(prefix, &[proof.a]);
    let lhs = RistrettoPoint::multiscalar_mul([proof.s1, proof.s2], [*g1, *g2]);
    points_eq(&lhs, &(proof.a + y * c))
}

/// `Σ g_i·s_i == A + y·c`. A response count that does not match `bases` is
/// malformed rather than merely invalid.
pub fn verify_poen(
    y: &RistrettoPoint,
    bases: &[RistrettoPoint],
    proof: &PoenProof,
    prefix: &Scalar,
) -> Result<bool, VerifierError> {
    if bases.is_empty() {
        return Err(VerifierError::MalformedInput("POEN needs at least one base"));
    }
    if bases.len() != proof.s.len() {
        return Err(VerifierError::MalformedInput(
            "POEN bases/responses length mismatch",
        ));
    }
    let c = challenge(prefix, &[proof.a]);
    let lhs = RistrettoPoint::multiscalar_mul(&proof.s, bases);
    Ok(points_eq(&lhs, &(proof.a + y * c)))
}

/// Pedersen opening of `v` over `(g, h)`.
pub fn verify_ped(
    gens: &Generators,
    v: &RistrettoPoint,
    proof: &PedProof,
    prefix: &Scalar,
) -> bool {
    verify_poe2(v, &gens.g, &gens.h, proof, prefix)
}

/// `ct` is `Enc[y](b, r)` for some known `(b, r)`.
pub fn verify_elgamal(
    gens: &Generators,
    y: &RistrettoPoint,
    ct: &Ciphertext,
    proof: &ElGamalProof,
    prefix: &Scalar,
) -> bool {
    let c = challenge(prefix, &[proof.al, proof.ar]);
    let r_ok = points_eq(&(gens.g * proof.sr), &(proof.ar + ct.R * c));
    let l_ok = points_eq(
        &(gens.g * proof.sb + y * proof.sr),
        &(proof.al + ct.L * c),
    );
    r_ok & l_ok
}

/// `ct1` under `y1` and `ct2` under `y2` hide the same value.
pub fn verify_same_encryption(
    gens: &Generators,
    y1: &RistrettoPoint,
    y2: &RistrettoPoint,
    ct1: &Ciphertext,
    ct2: &Ciphertext,
    proof: &SameEncryptionProof,
    prefix: &Scalar,
) -> bool {
    let c = challenge(prefix, &[proof.al1, proof.ar1, proof.al2, proof.ar2]);
    let checks = [
        points_eq(&(gens.g * proof.sr1), &(proof.ar1 + ct1.R * c)),
        points_eq(&(gens.g * proof.sr2), &(proof.ar2 + ct2.R * c)),
        points_eq(
            &(gens.g * proof.sb + y1 * proof.sr1),
            &(proof.al1 + ct1.L * c),
        ),
        points_eq(
            &(gens.g * proof.sb + y2 * proof.sr2),
            &(proof.al2 + ct2.L * c),
        ),
    ];
    checks.iter().all(|ok| *ok)
}
