//! Exponential ElGamal over Ristretto.
//!
//! `Enc[y](b, r) = (L, R) = (g·b + y·r, g·r)`. Ciphertexts under the same key
//! combine point-wise, so `Enc(a) + Enc(b)` decrypts to `a + b`. Decryption
//! needs the secret key and a bounded discrete-log search; it lives in the
//! prover crate.

use core::ops::{Add, AddAssign, Sub, SubAssign};

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::Identity};

use crate::{point_from_slice, point_to_bytes, Error, Generators};

/// Balance ciphertext `(L, R)`.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ciphertext {
    pub L: RistrettoPoint,
    pub R: RistrettoPoint,
}

impl Ciphertext {
    /// Identity pair; the encryption of `0` with randomness `0`.
    pub fn zero() -> Self {
        Self {
            L: RistrettoPoint::identity(),
            R: RistrettoPoint::identity(),
        }
    }

    /// `L || R`, both compressed.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(&point_to_bytes(&self.L));
        out[32..64].copy_from_slice(&point_to_bytes(&self.R));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 64 {
            return Err(Error::MalformedInput("ciphertext must be 64 bytes"));
        }
        Ok(Self {
            L: point_from_slice(&bytes[0..32])?,
            R: point_from_slice(&bytes[32..64])?,
        })
    }
}

impl Add for Ciphertext {
    type Output = Ciphertext;

    fn add(self, rhs: Ciphertext) -> Ciphertext {
        Ciphertext {
            L: self.L + rhs.L,
            R: self.R + rhs.R,
        }
    }
}

impl Sub for Ciphertext {
    type Output = Ciphertext;

    fn sub(self, rhs: Ciphertext) -> Ciphertext {
        Ciphertext {
            L: self.L - rhs.L,
            R: self.R - rhs.R,
        }
    }
}

impl AddAssign for Ciphertext {
    fn add_assign(&mut self, rhs: Ciphertext) {
        *self = *self + rhs;
    }
}

impl SubAssign for Ciphertext {
    fn sub_assign(&mut self, rhs: Ciphertext) {
        *self = *self - rhs;
    }
}

/// Encrypt `message` under `pubkey` with caller-supplied `randomness`.
///
/// The randomness is never sampled here: composite proofs reuse one `r`
/// across the sender, receiver and auditor ciphertexts.
pub fn encrypt(
    gens: &Generators,
    message: u64,
    pubkey: &RistrettoPoint,
    randomness: &Scalar,
) -> Ciphertext {
    Ciphertext {
        L: gens.g * Scalar::from(message) + pubkey * randomness,
        R: gens.g * randomness,
    }
}

pub fn homomorphic_add(a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
    *a + *b
}

pub fn homomorphic_sub(a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
    *a - *b
}

/// Randomness used when a public amount is credited by a fund operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FundRandomness {
    /// `r = 1`; the amount is public anyway.
    #[default]
    One,
    Custom(Scalar),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FundConfig {
    pub randomness: FundRandomness,
}

impl FundConfig {
    pub fn randomness(&self) -> Scalar {
        match self.randomness {
            FundRandomness::One => Scalar::ONE,
            FundRandomness::Custom(r) => r,
        }
    }
}

/// Ciphertext credited to `pubkey` when `amount` is funded.
pub fn fund_ciphertext(
    gens: &Generators,
    amount: u64,
    pubkey: &RistrettoPoint,
    cfg: &FundConfig,
) -> Ciphertext {
    encrypt(gens, amount, pubkey, &cfg.randomness())
}
