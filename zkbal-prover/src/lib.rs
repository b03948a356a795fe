//! # zkbal-prover
//!
//! Client-side proof generation.
//!
//! Everything that needs a secret lives here:
//!
//! - [`KeyPair`] generation and fresh nonzero randomness ([`random_scalar`]).
//! - [`decrypt`] with a linear scan or baby-step giant-step search.
//! - `prove_*` for every Sigma protocol ([`sigma`], [`range`]) and for every
//!   account operation ([`compose`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zkbal_prover::{KeyPair, compose::prove_fund};
//! use zkbal_primitives::{Generators, Operation, ProofContext};
//!
//! let gens = Generators::default();
//! let mut rng = rand::rng();
//! let keypair = KeyPair::generate(&gens, &mut rng);
//!
//! let prefix = ProofContext {
//!     chain_id: [0u8; 32],
//!     contract: [0u8; 32],
//!     account: keypair.public(),
//!     nonce: 0,
//!     operation: Operation::Fund,
//! }
//! .prefix();
//!
//! let (inputs, proof) = prove_fund(&gens, &keypair, 100, &prefix, &mut rng);
//! // Submit `inputs` and `proof` to the verifier.
//! ```
//!
//! ## Security Notes
//!
//! - All scalars are sampled with full 512-bit wide reduction and are never
//!   zero.
//! - Nonces are sampled fresh on every call; nothing is cached between proofs.
//! - The caller supplies the prefix; it must include a nonce to block replay.

pub mod compose;
pub mod decrypt;
pub mod range;
pub mod sigma;

use core::fmt;

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use log::trace;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use zkbal_primitives::Generators;

pub use decrypt::{decrypt, BabyStepTable, DecryptStrategy, MAX_BSGS_BOUND};

#[derive(Debug, Error)]
pub enum ProverError {
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("no plaintext in [0, {bound}] matches the ciphertext")]
    OutOfRange { bound: u64 },
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}

/// Sample a uniform nonzero scalar.
///
/// Uses 512 bits of entropy reduced wide so the result is uniform mod ℓ. A
/// zero sample is a degenerate witness and is drawn again.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let mut bytes = [0u8; 64];
        rng.fill_bytes(&mut bytes);
        let s = Scalar::from_bytes_mod_order_wide(&bytes);
        if s != Scalar::ZERO {
            return s;
        }
        trace!(target: "zkbal", "resampling degenerate zero scalar");
    }
}

/// Account key pair `y = g·x`. The secret is never serialized.
#[derive(Clone)]
pub struct KeyPair {
    secret: Scalar,
    public: RistrettoPoint,
}

impl KeyPair {
    pub fn generate<R: RngCore + CryptoRng>(gens: &Generators, rng: &mut R) -> Self {
        let secret = random_scalar(rng);
        Self {
            secret,
            public: gens.g * secret,
        }
    }

    /// Rebuild a key pair from a stored secret. Zero is rejected.
    pub fn from_secret(gens: &Generators, secret: Scalar) -> Result<Self, ProverError> {
        if secret == Scalar::ZERO {
            return Err(ProverError::InvalidInput("secret key must be nonzero"));
        }
        Ok(Self {
            secret,
            public: gens.g * secret,
        })
    }

    pub fn secret(&self) -> &Scalar {
        &self.secret
    }

    pub fn public(&self) -> RistrettoPoint {
        self.public
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("secret", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}
