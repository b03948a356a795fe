//! Sigma-protocol proof structs.
//!
//! Each struct carries the prover's commitments and responses. The prefix is
//! never stored: prover and verifier both receive it from the caller, and a
//! proof is only meaningful next to the exact public inputs and prefix it
//! was produced for.

use alloc::vec::Vec;

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::Identity};

/// Proof of exponent: knowledge of `x` with `y = base·x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoeProof {
    pub a: RistrettoPoint,
    pub s: Scalar,
}

/// Knowledge of `(x1, x2)` with `y = g1·x1 + g2·x2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Poe2Proof {
    pub a: RistrettoPoint,
    pub s1: Scalar,
    pub s2: Scalar,
}

/// Pedersen opening `(b, r)` of `V = g·b + h·r`; a [`Poe2Proof`] over `(g, h)`.
pub type PedProof = Poe2Proof;

/// Knowledge of `(x_1 … x_n)` with `y = Σ g_i·x_i`; one response per base.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoenProof {
    pub a: RistrettoPoint,
    pub s: Vec<Scalar>,
}

/// `(L, R)` is `Enc[y](b, r)` for a known `(b, r)`.
///
/// POE on `R` and POE2 on `L` coupled by one challenge over `[AL, AR]` and
/// the shared `sr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElGamalProof {
    pub al: RistrettoPoint,
    pub ar: RistrettoPoint,
    pub sb: Scalar,
    pub sr: Scalar,
}

/// OR-proof that `V = g·b + h·r` opens to `b ∈ {0, 1}`.
///
/// Branch 0 proves `V = h·r`, branch 1 proves `V − g = h·r`. Only `c0` is
/// transmitted; the verifier derives `c1 = c − c0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitProof {
    pub a0: RistrettoPoint,
    pub a1: RistrettoPoint,
    pub c0: Scalar,
    pub s0: Scalar,
    pub s1: Scalar,
}

/// Commitment to a single bit together with its OR-proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitCommitment {
    pub v: RistrettoPoint,
    pub proof: BitProof,
}

/// Bit-decomposition range proof, least significant bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeProof {
    pub bits: Vec<BitCommitment>,
}

impl RangeProof {
    /// `Σ V_i·2^i`, the commitment the bits recompose to.
    pub fn commitment(&self) -> RistrettoPoint {
        let mut acc = RistrettoPoint::identity();
        let mut weight = Scalar::ONE;
        let two = Scalar::from(2u64);
        for bit in &self.bits {
            acc += bit.v * weight;
            weight *= two;
        }
        acc
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// `(L1, R1)` under `y1` and `(L2, R2)` under `y2` encrypt the same `b`.
///
/// Two ElGamal proofs sharing `kb` and therefore `sb`, with independent
/// `kr1/kr2`, bound by one challenge over `[AL1, AR1, AL2, AR2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SameEncryptionProof {
    pub al1: RistrettoPoint,
    pub ar1: RistrettoPoint,
    pub al2: RistrettoPoint,
    pub ar2: RistrettoPoint,
    pub sb: Scalar,
    pub sr1: Scalar,
    pub sr2: Scalar,
}
