//! Bit OR-proofs and bit-decomposition range proofs.

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use rand::{CryptoRng, RngCore};

use zkbal_primitives::{
    bit_prefix, challenge, pedersen_commit, BitCommitment, BitProof, Generators, RangeProof,
    MAX_RANGE_BITS,
};

use crate::{random_scalar, sigma::simulate_poe, ProverError};

/// Which side of the OR the prover can actually open.
#[derive(Debug, Clone, Copy)]
pub enum Branch {
    Real(Scalar),
    Simulated,
}

/// First move of one OR branch.
enum Opening {
    Real { nonce: Scalar, witness: Scalar },
    Simulated { response: Scalar, challenge: Scalar },
}

impl Opening {
    /// Commit to the statement `y = h·w` of one branch.
    fn commit<R: RngCore + CryptoRng>(
        branch: Branch,
        y: &RistrettoPoint,
        h: &RistrettoPoint,
        rng: &mut R,
    ) -> (RistrettoPoint, Self) {
        match branch {
            Branch::Real(witness) => {
                let nonce = random_scalar(rng);
                (h * nonce, Opening::Real { nonce, witness })
            }
            Branch::Simulated => {
                let (forged, challenge) = simulate_poe(y, h, rng);
                (
                    forged.a,
                    Opening::Simulated {
                        response: forged.s,
                        challenge,
                    },
                )
            }
        }
    }

    /// Sub-challenge fixed before the main challenge is known.
    fn fixed_challenge(&self) -> Scalar {
        match self {
            Opening::Real { .. } => Scalar::ZERO,
            Opening::Simulated { challenge, .. } => *challenge,
        }
    }

    /// `(sub-challenge, response)`; the real branch takes whatever is left.
    fn respond(&self, remaining: &Scalar) -> (Scalar, Scalar) {
        match self {
            Opening::Real { nonce, witness } => (*remaining, nonce + remaining * witness),
            Opening::Simulated {
                response,
                challenge,
            } => (*challenge, *response),
        }
    }
}

/// Prove `V = g·bit + h·r` opens to a bit.
///
/// Branch 0 is `V = h·r`, branch 1 is `V − g = h·r`. The challenge is split
/// by modular subtraction: `c0 + c1 = c`.
pub fn prove_bit<R: RngCore + CryptoRng>(
    gens: &Generators,
    bit: bool,
    r: &Scalar,
    prefix: &Scalar,
    rng: &mut R,
) -> BitCommitment {
    let v = pedersen_commit(gens, &Scalar::from(bit as u64), r);
    let (zero, one) = if bit {
        (Branch::Simulated, Branch::Real(*r))
    } else {
        (Branch::Real(*r), Branch::Simulated)
    };

    let (a0, open0) = Opening::commit(zero, &v, &gens.h, rng);
    let (a1, open1) = Opening::commit(one, &(v - gens.g), &gens.h, rng);

    let c = challenge(prefix, &[a0, a1]);
    let remaining = c - open0.fixed_challenge() - open1.fixed_challenge();
    let (c0, s0) = open0.respond(&remaining);
    let (_, s1) = open1.respond(&remaining);

    BitCommitment {
        v,
        proof: BitProof { a0, a1, c0, s0, s1 },
    }
}

/// Prove `value ∈ [0, 2^bits)`.
///
/// Returns the proof and the aggregate blinding `r = Σ r_i·2^i`, so that
/// `proof.commitment() == g·value + h·r`. Callers reuse `r` as the ElGamal
/// randomness or Pedersen blind of the outer statement.
pub fn prove_range<R: RngCore + CryptoRng>(
    gens: &Generators,
    value: u64,
    bits: usize,
    prefix: &Scalar,
    rng: &mut R,
) -> Result<(RangeProof, Scalar), ProverError> {
    if bits == 0 || bits > MAX_RANGE_BITS {
        return Err(ProverError::InvalidInput("range bit length must be in 1..=64"));
    }
    if bits < 64 && value >> bits != 0 {
        return Err(ProverError::InvalidInput("value exceeds range"));
    }

    let two = Scalar::from(2u64);
    let mut weight = Scalar::ONE;
    let mut r_total = Scalar::ZERO;
    let mut out = Vec::with_capacity(bits);

    for i in 0..bits {
        let bit = (value >> i) & 1 == 1;
        let r_i = random_scalar(rng);
        out.push(prove_bit(gens, bit, &r_i, &bit_prefix(prefix, i), rng));
        r_total += r_i * weight;
        weight *= two;
    }

    Ok((RangeProof { bits: out }, r_total))
}
