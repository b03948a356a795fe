//! Fiat-Shamir challenge engine.
//!
//! Every challenge is squeezed from a merlin transcript that absorbs the
//! caller's `prefix` followed by the commitment points in order. The prefix
//! carries replay protection (nonce, contract and account identifiers,
//! operation); it is computed by the caller, optionally via [`ProofContext`].

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use merlin::Transcript;

/// Bumped whenever the transcript layout changes.
pub const SDK_VERSION: u32 = 1;

pub mod labels {
    pub const PROTOCOL: &[u8] = b"zkbal";
    pub const PROTOCOL_V: &[u8] = b"zkbal/sigma/v1";
    pub const PREFIX: &[u8] = b"prefix";
    pub const COMMITMENT: &[u8] = b"A";
    pub const STATEMENT: &[u8] = b"X";
    pub const CHALLENGE: &[u8] = b"c";
    pub const DOMAIN: &[u8] = b"domain";
    pub const SUB_PREFIX: &[u8] = b"sub_prefix";
    pub const CONTEXT: &[u8] = b"ctx";
}

/// Transcript seeded with the protocol version and `prefix`.
pub fn new_transcript(prefix: &Scalar) -> Transcript {
    let mut t = Transcript::new(labels::PROTOCOL);
    t.append_message(b"proto", labels::PROTOCOL_V);
    t.append_message(b"sdk_version", &SDK_VERSION.to_le_bytes());
    t.append_message(labels::PREFIX, prefix.as_bytes());
    t
}

pub fn append_point(t: &mut Transcript, label: &'static [u8], p: &RistrettoPoint) {
    t.append_message(label, p.compress().as_bytes());
}

/// 64 challenge bytes reduced wide mod ℓ.
pub fn challenge_scalar(t: &mut Transcript, label: &'static [u8]) -> Scalar {
    let mut buf = [0u8; 64];
    t.challenge_bytes(label, &mut buf);
    Scalar::from_bytes_mod_order_wide(&buf)
}

/// `Hash(prefix, A_1, …, A_n) mod ℓ`.
///
/// Pure function of its arguments; reordering `commitments` yields a
/// different challenge.
pub fn challenge(prefix: &Scalar, commitments: &[RistrettoPoint]) -> Scalar {
    let mut t = new_transcript(prefix);
    for a in commitments {
        append_point(&mut t, labels::COMMITMENT, a);
    }
    challenge_scalar(&mut t, labels::CHALLENGE)
}

/// Challenge of a composite proof: the operation's public statement
/// followed by its commitments, absorbed as one sequence.
///
/// Equal to `challenge(prefix, statement ++ commitments)`.
pub fn challenge_over(
    prefix: &Scalar,
    statement: &[RistrettoPoint],
    commitments: &[RistrettoPoint],
) -> Scalar {
    let mut t = new_transcript(prefix);
    for a in statement.iter().chain(commitments) {
        append_point(&mut t, labels::COMMITMENT, a);
    }
    challenge_scalar(&mut t, labels::CHALLENGE)
}

/// Independent prefix for a sub-proof of a composite (e.g. one of the two
/// range proofs of a transfer).
pub fn domain_prefix(prefix: &Scalar, label: &'static [u8]) -> Scalar {
    let mut t = new_transcript(prefix);
    t.append_message(labels::DOMAIN, label);
    challenge_scalar(&mut t, labels::SUB_PREFIX)
}

/// Prefix bound to the public statement of an operation, for proofs whose
/// challenge would otherwise only cover their own commitments.
pub fn statement_prefix(prefix: &Scalar, statement: &[RistrettoPoint]) -> Scalar {
    let mut t = new_transcript(prefix);
    t.append_message(labels::DOMAIN, b"statement");
    for p in statement {
        append_point(&mut t, labels::STATEMENT, p);
    }
    challenge_scalar(&mut t, labels::SUB_PREFIX)
}

/// Prefix of the `index`-th bit proof of a range proof: `prefix + index`.
pub fn bit_prefix(prefix: &Scalar, index: usize) -> Scalar {
    prefix + Scalar::from(index as u64)
}

/// Account operation a proof authorises; part of the replay context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Fund,
    Transfer,
    Withdraw,
    Rollover,
    Ragequit,
    Audit,
    ExPost,
}

impl Operation {
    pub const fn label(&self) -> &'static [u8] {
        match self {
            Operation::Fund => b"fund",
            Operation::Transfer => b"transfer",
            Operation::Withdraw => b"withdraw",
            Operation::Rollover => b"rollover",
            Operation::Ragequit => b"ragequit",
            Operation::Audit => b"audit",
            Operation::ExPost => b"ex_post",
        }
    }
}

/// Typical replay context. Collaborators that already compute their own
/// prefix can skip this and pass the scalar directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofContext {
    pub chain_id: [u8; 32],
    pub contract: [u8; 32],
    pub account: RistrettoPoint,
    pub nonce: u64,
    pub operation: Operation,
}

impl ProofContext {
    pub fn prefix(&self) -> Scalar {
        let mut t = Transcript::new(labels::PROTOCOL);
        t.append_message(b"proto", labels::PROTOCOL_V);
        t.append_message(b"chain_id", &self.chain_id);
        t.append_message(b"contract", &self.contract);
        append_point(&mut t, b"account", &self.account);
        t.append_u64(b"nonce", self.nonce);
        t.append_message(b"operation", self.operation.label());
        challenge_scalar(&mut t, labels::CONTEXT)
    }
}
