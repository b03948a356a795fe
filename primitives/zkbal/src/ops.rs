//! Public inputs and proofs of the account operations.
//!
//! Each operation is a single coupled Sigma protocol: one challenge over the
//! public statement followed by every commitment, with named sub-proofs that
//! share responses wherever they share a witness. Range proofs are attached
//! with their own prefixes and tied in through their recomposed commitments.
//!
//! Notation: `y = g·x` is the account key, `(CL, CR)` the current balance
//! ciphertext under `y`.

use alloc::{vec, vec::Vec};
use core::fmt;

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};

use crate::{
    elgamal::Ciphertext,
    proofs::{PoeProof, RangeProof},
    Generators,
};

/// Sub-proof of an account operation; reported by the verifier as the first
/// equation that did not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubProof {
    Ownership,
    Blinding,
    Sender,
    Receiver,
    Auditor,
    AmountCommitment,
    RemainingBalance,
    RemainingCommitment,
    AmountRange,
    RemainingRange,
    ZeroBalance,
    Balance,
    Reencryption,
    Disclosure,
    Consistency,
}

impl fmt::Display for SubProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubProof::Ownership => "ownership",
            SubProof::Blinding => "blinding",
            SubProof::Sender => "sender encryption",
            SubProof::Receiver => "receiver encryption",
            SubProof::Auditor => "auditor encryption",
            SubProof::AmountCommitment => "amount commitment",
            SubProof::RemainingBalance => "remaining balance",
            SubProof::RemainingCommitment => "remaining commitment",
            SubProof::AmountRange => "amount range",
            SubProof::RemainingRange => "remaining range",
            SubProof::ZeroBalance => "zero balance",
            SubProof::Balance => "balance",
            SubProof::Reencryption => "re-encryption",
            SubProof::Disclosure => "disclosure",
            SubProof::Consistency => "consistency",
        };
        f.write_str(name)
    }
}

/// Sub-prefix of the transfer amount range proof.
pub const TRANSFER_AMOUNT_DOMAIN: &[u8] = b"transfer/amount";
/// Sub-prefix of the sender's remaining-balance range proof.
pub const TRANSFER_REMAINING_DOMAIN: &[u8] = b"transfer/remaining";
pub const WITHDRAW_REMAINING_DOMAIN: &[u8] = b"withdraw/remaining";

// ========================= Fund / Rollover =========================

/// Fund: a public `amount` is credited to `pk`; the owner proves `y = g·x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FundInputs {
    pub pk: RistrettoPoint,
    pub amount: u64,
}

impl FundInputs {
    pub fn statement(&self, gens: &Generators) -> Vec<RistrettoPoint> {
        vec![self.pk, gens.g * Scalar::from(self.amount)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FundProof {
    pub ownership: PoeProof,
}

/// Rollover: pending transfers move into the balance; ownership only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RolloverInputs {
    pub pk: RistrettoPoint,
}

impl RolloverInputs {
    pub fn statement(&self) -> Vec<RistrettoPoint> {
        vec![self.pk]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RolloverProof {
    pub ownership: PoeProof,
}

// ========================= Transfer =========================

/// Transfer of a hidden amount `b` from `sender_pk` to `receiver_pk`,
/// readable by `auditor_pk`. All three ciphertexts share `R = g·r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferInputs {
    pub sender_pk: RistrettoPoint,
    pub receiver_pk: RistrettoPoint,
    pub auditor_pk: RistrettoPoint,
    /// Sender's balance before the transfer.
    pub balance: Ciphertext,
    /// `Enc[sender_pk](b, r)`, subtracted from the sender's balance.
    pub sender: Ciphertext,
    /// `Enc[receiver_pk](b, r)`, added to the receiver's pending balance.
    pub receiver: Ciphertext,
    /// `Enc[auditor_pk](b, r)`.
    pub auditor: Ciphertext,
}

impl TransferInputs {
    pub fn sender_balance_after(&self) -> Ciphertext {
        self.balance - self.sender
    }

    /// Public points hashed ahead of the commitments; `v` and `v2` are the
    /// amount and remaining-balance range commitments.
    pub fn statement(&self, v: &RistrettoPoint, v2: &RistrettoPoint) -> Vec<RistrettoPoint> {
        vec![
            self.sender_pk,
            self.receiver_pk,
            self.auditor_pk,
            self.balance.L,
            self.balance.R,
            self.sender.L,
            self.sender.R,
            self.receiver.L,
            self.receiver.R,
            self.auditor.L,
            self.auditor.R,
            *v,
            *v2,
        ]
    }
}

/// Equations, all under one challenge `c`:
///
/// - ownership: `g·s_x = A_x + y·c`
/// - blinding: `g·s_r = A_r + R·c`
/// - sender / receiver / auditor: `g·s_b + y_i·s_r = A_i + L_i·c`
/// - amount commitment: `g·s_b + h·s_r = A_v + V·c`
/// - remaining balance: `g·s_b2 + (CR − R)·s_x = A_b + (CL − L)·c`
/// - remaining commitment: `g·s_b2 + h·s_r2 = A_v2 + V2·c`
///
/// `V` and `V2` are the commitments of `range_amount` and `range_remaining`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferProof {
    pub a_x: RistrettoPoint,
    pub a_r: RistrettoPoint,
    pub a_sender: RistrettoPoint,
    pub a_receiver: RistrettoPoint,
    pub a_auditor: RistrettoPoint,
    pub a_v: RistrettoPoint,
    pub a_b: RistrettoPoint,
    pub a_v2: RistrettoPoint,
    pub s_x: Scalar,
    pub s_r: Scalar,
    pub s_b: Scalar,
    pub s_b2: Scalar,
    pub s_r2: Scalar,
    pub range_amount: RangeProof,
    pub range_remaining: RangeProof,
}

// ========================= Withdraw / Ragequit =========================

/// Withdraw a public `amount`; the remaining balance stays hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawInputs {
    pub pk: RistrettoPoint,
    pub balance: Ciphertext,
    pub amount: u64,
}

impl WithdrawInputs {
    pub fn balance_after(&self, gens: &Generators) -> Ciphertext {
        self.balance - public_amount(gens, self.amount)
    }

    pub fn statement(&self, gens: &Generators, v: &RistrettoPoint) -> Vec<RistrettoPoint> {
        vec![
            self.pk,
            self.balance.L,
            self.balance.R,
            gens.g * Scalar::from(self.amount),
            *v,
        ]
    }
}

/// - ownership: `g·s_x = A_x + y·c`
/// - remaining balance: `g·s_b + CR·s_x = A_b + (CL − g·amount)·c`
/// - remaining commitment: `g·s_b + h·s_r = A_v + V·c`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithdrawProof {
    pub a_x: RistrettoPoint,
    pub a_b: RistrettoPoint,
    pub a_v: RistrettoPoint,
    pub s_x: Scalar,
    pub s_b: Scalar,
    pub s_r: Scalar,
    pub range: RangeProof,
}

/// Withdraw the whole balance `amount`, leaving exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RagequitInputs {
    pub pk: RistrettoPoint,
    pub balance: Ciphertext,
    pub amount: u64,
}

impl RagequitInputs {
    pub fn statement(&self, gens: &Generators) -> Vec<RistrettoPoint> {
        vec![
            self.pk,
            self.balance.L,
            self.balance.R,
            gens.g * Scalar::from(self.amount),
        ]
    }
}

/// - ownership: `g·s_x = A_x + y·c`
/// - zero balance: `CR·s_x = A_cr + (CL − g·amount)·c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RagequitProof {
    pub a_x: RistrettoPoint,
    pub a_cr: RistrettoPoint,
    pub s_x: Scalar,
}

// ========================= Audit =========================

/// Re-encryption of the current balance under `auditor_pk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditInputs {
    pub pk: RistrettoPoint,
    pub auditor_pk: RistrettoPoint,
    pub balance: Ciphertext,
    pub audit: Ciphertext,
}

impl AuditInputs {
    pub fn statement(&self) -> Vec<RistrettoPoint> {
        vec![
            self.pk,
            self.auditor_pk,
            self.balance.L,
            self.balance.R,
            self.audit.L,
            self.audit.R,
        ]
    }
}

/// - ownership: `g·s_x = A_x + y·c`
/// - balance: `g·s_b + CR·s_x = A_b + CL·c`
/// - blinding: `g·s_r = A_r + Ra·c`
/// - auditor: `g·s_b + y_a·s_r = A_l + La·c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditProof {
    pub a_x: RistrettoPoint,
    pub a_b: RistrettoPoint,
    pub a_r: RistrettoPoint,
    pub a_l: RistrettoPoint,
    pub s_x: Scalar,
    pub s_b: Scalar,
    pub s_r: Scalar,
}

// ========================= Ex-post disclosure =========================

/// Disclosure of the amount of a past transfer `original = (L, R)` under
/// `pk`: a fresh `reencrypted = (TL, TR)` under `pk` and
/// `disclosed = (TL', TR)` under `disclosed_pk`, both of the same amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExPostInputs {
    pub pk: RistrettoPoint,
    pub disclosed_pk: RistrettoPoint,
    pub original: Ciphertext,
    pub reencrypted: Ciphertext,
    pub disclosed: Ciphertext,
}

impl ExPostInputs {
    pub fn statement(&self) -> Vec<RistrettoPoint> {
        vec![
            self.pk,
            self.disclosed_pk,
            self.original.L,
            self.original.R,
            self.reencrypted.L,
            self.reencrypted.R,
            self.disclosed.L,
            self.disclosed.R,
        ]
    }
}

/// - ownership: `g·s_x = A_x + y·c`
/// - blinding: `g·s_r = A_r + TR·c`
/// - re-encryption: `g·s_b + y·s_r = A_l + TL·c`
/// - disclosure: `g·s_b + y'·s_r = A_d + TL'·c`
/// - consistency: `(TR − R)·s_x = A_eq + (TL − L)·c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExPostProof {
    pub a_x: RistrettoPoint,
    pub a_r: RistrettoPoint,
    pub a_l: RistrettoPoint,
    pub a_d: RistrettoPoint,
    pub a_eq: RistrettoPoint,
    pub s_x: Scalar,
    pub s_r: Scalar,
    pub s_b: Scalar,
}

/// `(g·amount, 0)`: a public amount as a ciphertext with zero randomness.
pub fn public_amount(gens: &Generators, amount: u64) -> Ciphertext {
    Ciphertext {
        L: gens.g * Scalar::from(amount),
        R: Ciphertext::zero().R,
    }
}
