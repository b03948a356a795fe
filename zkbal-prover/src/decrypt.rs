//! Bounded decryption.
//!
//! `L − R·x = g·b`, so recovering `b` is a discrete log in `[0, bound]`. The
//! linear scan is fine for small bounds; balances (`2^32`) need baby-step
//! giant-step, which costs `O(√bound)` time and memory. Baby-step tables
//! are capped at [`MAX_BSGS_BOUND`].

use std::collections::HashMap;

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::Identity};
use log::trace;

use zkbal_primitives::{point_to_bytes, Ciphertext, Generators};

use crate::ProverError;

/// Largest bound a [`BabyStepTable`] accepts: `2^20` baby steps.
pub const MAX_BSGS_BOUND: u64 = (1 << 40) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecryptStrategy {
    Linear,
    #[default]
    BabyStepGiantStep,
}

/// Decrypt `ct` with `secret`, searching plaintexts in `[0, bound]`.
pub fn decrypt(
    gens: &Generators,
    ct: &Ciphertext,
    secret: &Scalar,
    bound: u64,
    strategy: DecryptStrategy,
) -> Result<u64, ProverError> {
    let target = ct.L - ct.R * secret;
    trace!(target: "zkbal", "decrypting with {strategy:?}, bound {bound}");
    match strategy {
        DecryptStrategy::Linear => linear_scan(gens, &target, bound),
        DecryptStrategy::BabyStepGiantStep => BabyStepTable::new(gens, bound)?.solve(&target),
    }
}

fn linear_scan(gens: &Generators, target: &RistrettoPoint, bound: u64) -> Result<u64, ProverError> {
    let mut acc = RistrettoPoint::identity();
    for i in 0..=bound {
        if acc == *target {
            return Ok(i);
        }
        acc += gens.g;
    }
    Err(ProverError::OutOfRange { bound })
}

/// Precomputed baby steps `g·j ↦ j` for `j < m`, `m = ⌈√(bound + 1)⌉`.
///
/// Building the table dominates the cost; keep one around when decrypting
/// many ciphertexts against the same bound.
pub struct BabyStepTable {
    baby: HashMap<[u8; 32], u64>,
    giant: RistrettoPoint,
    m: u64,
    bound: u64,
}

impl BabyStepTable {
    /// Fails with `InvalidInput` when `bound` exceeds [`MAX_BSGS_BOUND`].
    pub fn new(gens: &Generators, bound: u64) -> Result<Self, ProverError> {
        if bound > MAX_BSGS_BOUND {
            return Err(ProverError::InvalidInput(
                "baby-step giant-step bound exceeds MAX_BSGS_BOUND",
            ));
        }
        let m = ceil_sqrt(u128::from(bound) + 1);
        let mut baby = HashMap::with_capacity(m as usize);
        let mut acc = RistrettoPoint::identity();
        for j in 0..m {
            baby.insert(point_to_bytes(&acc), j);
            acc += gens.g;
        }
        Ok(Self {
            baby,
            giant: gens.g * Scalar::from(m),
            m,
            bound,
        })
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Find `b ≤ bound` with `g·b == target`.
    pub fn solve(&self, target: &RistrettoPoint) -> Result<u64, ProverError> {
        let mut gamma = *target;
        for i in 0..self.m {
            if let Some(j) = self.baby.get(&point_to_bytes(&gamma)) {
                let value = u128::from(i) * u128::from(self.m) + u128::from(*j);
                if value <= u128::from(self.bound) {
                    return Ok(value as u64);
                }
                break;
            }
            gamma -= self.giant;
        }
        Err(ProverError::OutOfRange { bound: self.bound })
    }

    pub fn decrypt(&self, ct: &Ciphertext, secret: &Scalar) -> Result<u64, ProverError> {
        self.solve(&(ct.L - ct.R * secret))
    }
}

/// Smallest `m` with `m² ≥ n`.
fn ceil_sqrt(n: u128) -> u64 {
    let mut m = (n as f64).sqrt() as u128;
    while m * m < n {
        m += 1;
    }
    while m > 0 && (m - 1) * (m - 1) >= n {
        m -= 1;
    }
    m as u64
}
