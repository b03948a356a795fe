//! Provers for the account operations.
//!
//! Each `prove_*` builds the public inputs the verifier will see together
//! with one coupled proof. Nonces for every sub-proof are sampled first, the
//! challenge is taken once over the statement and all commitments (in the
//! order the verifier recomputes them), then every response is derived from
//! that single challenge.

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use log::debug;
use rand::{CryptoRng, RngCore};

use zkbal_primitives::{
    challenge_over, domain_prefix, encrypt, statement_prefix, AuditInputs, AuditProof, Ciphertext,
    ExPostInputs, ExPostProof, FundInputs, FundProof, Generators, RagequitInputs, RagequitProof,
    RolloverInputs, RolloverProof, TransferInputs, TransferProof, WithdrawInputs, WithdrawProof,
    BALANCE_BITS, TRANSFER_AMOUNT_DOMAIN, TRANSFER_REMAINING_DOMAIN, WITHDRAW_REMAINING_DOMAIN,
};

use crate::{random_scalar, range::prove_range, sigma::prove_poe, KeyPair, ProverError};

/// `ct` must decrypt to `value` under `keypair`.
fn check_balance(
    gens: &Generators,
    keypair: &KeyPair,
    ct: &Ciphertext,
    value: u64,
) -> Result<(), ProverError> {
    if ct.L - ct.R * keypair.secret() != gens.g * Scalar::from(value) {
        debug!(target: "zkbal", "balance ciphertext does not decrypt to the claimed value");
        return Err(ProverError::InvalidInput(
            "balance does not decrypt to the claimed value",
        ));
    }
    Ok(())
}

// ========================= Fund / Rollover =========================

/// Ownership proof for crediting a public `amount` to the key pair's account.
pub fn prove_fund<R: RngCore + CryptoRng>(
    gens: &Generators,
    keypair: &KeyPair,
    amount: u64,
    prefix: &Scalar,
    rng: &mut R,
) -> (FundInputs, FundProof) {
    let inputs = FundInputs {
        pk: keypair.public(),
        amount,
    };
    let bound = statement_prefix(prefix, &inputs.statement(gens));
    let ownership = prove_poe(&gens.g, keypair.secret(), &bound, rng);
    (inputs, FundProof { ownership })
}

pub fn prove_rollover<R: RngCore + CryptoRng>(
    gens: &Generators,
    keypair: &KeyPair,
    prefix: &Scalar,
    rng: &mut R,
) -> (RolloverInputs, RolloverProof) {
    let inputs = RolloverInputs {
        pk: keypair.public(),
    };
    let bound = statement_prefix(prefix, &inputs.statement());
    let ownership = prove_poe(&gens.g, keypair.secret(), &bound, rng);
    (inputs, RolloverProof { ownership })
}

// ========================= Transfer =========================

/// Everything the sender knows about a transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    pub sender: &'a KeyPair,
    pub receiver_pk: RistrettoPoint,
    pub auditor_pk: RistrettoPoint,
    /// Sender's current balance ciphertext and its plaintext.
    pub balance: Ciphertext,
    pub balance_value: u64,
    pub amount: u64,
}

/// Encrypt `amount` to sender, receiver and auditor under one randomness and
/// prove the transfer.
///
/// Fails with [`ProverError::Overflow`] if `amount > balance_value` and with
/// [`ProverError::InvalidInput`] if either value does not fit
/// [`BALANCE_BITS`] or the balance does not decrypt to `balance_value`.
pub fn prove_transfer<R: RngCore + CryptoRng>(
    gens: &Generators,
    req: &TransferRequest<'_>,
    prefix: &Scalar,
    rng: &mut R,
) -> Result<(TransferInputs, TransferProof), ProverError> {
    check_balance(gens, req.sender, &req.balance, req.balance_value)?;
    let remaining = req
        .balance_value
        .checked_sub(req.amount)
        .ok_or(ProverError::Overflow("transfer amount exceeds balance"))?;

    let (range_amount, r) = prove_range(
        gens,
        req.amount,
        BALANCE_BITS,
        &domain_prefix(prefix, TRANSFER_AMOUNT_DOMAIN),
        rng,
    )?;
    let (range_remaining, r2) = prove_range(
        gens,
        remaining,
        BALANCE_BITS,
        &domain_prefix(prefix, TRANSFER_REMAINING_DOMAIN),
        rng,
    )?;

    let sender_pk = req.sender.public();
    let inputs = TransferInputs {
        sender_pk,
        receiver_pk: req.receiver_pk,
        auditor_pk: req.auditor_pk,
        balance: req.balance,
        sender: encrypt(gens, req.amount, &sender_pk, &r),
        receiver: encrypt(gens, req.amount, &req.receiver_pk, &r),
        auditor: encrypt(gens, req.amount, &req.auditor_pk, &r),
    };
    let after = inputs.sender_balance_after();

    let x = req.sender.secret();
    let b = Scalar::from(req.amount);
    let b2 = Scalar::from(remaining);

    let k_x = random_scalar(rng);
    let k_r = random_scalar(rng);
    let k_b = random_scalar(rng);
    let k_b2 = random_scalar(rng);
    let k_r2 = random_scalar(rng);

    let a_x = gens.g * k_x;
    let a_r = gens.g * k_r;
    let a_sender = gens.g * k_b + sender_pk * k_r;
    let a_receiver = gens.g * k_b + req.receiver_pk * k_r;
    let a_auditor = gens.g * k_b + req.auditor_pk * k_r;
    let a_v = gens.g * k_b + gens.h * k_r;
    let a_b = gens.g * k_b2 + after.R * k_x;
    let a_v2 = gens.g * k_b2 + gens.h * k_r2;

    let c = challenge_over(
        prefix,
        &inputs.statement(&range_amount.commitment(), &range_remaining.commitment()),
        &[a_x, a_r, a_sender, a_receiver, a_auditor, a_v, a_b, a_v2],
    );

    let proof = TransferProof {
        a_x,
        a_r,
        a_sender,
        a_receiver,
        a_auditor,
        a_v,
        a_b,
        a_v2,
        s_x: k_x + c * x,
        s_r: k_r + c * r,
        s_b: k_b + c * b,
        s_b2: k_b2 + c * b2,
        s_r2: k_r2 + c * r2,
        range_amount,
        range_remaining,
    };
    Ok((inputs, proof))
}

// ========================= Withdraw / Ragequit =========================

/// Withdraw a public `amount` from a balance worth `balance_value`.
pub fn prove_withdraw<R: RngCore + CryptoRng>(
    gens: &Generators,
    keypair: &KeyPair,
    balance: &Ciphertext,
    balance_value: u64,
    amount: u64,
    prefix: &Scalar,
    rng: &mut R,
) -> Result<(WithdrawInputs, WithdrawProof), ProverError> {
    check_balance(gens, keypair, balance, balance_value)?;
    let remaining = balance_value
        .checked_sub(amount)
        .ok_or(ProverError::Overflow("withdraw amount exceeds balance"))?;

    let (range, r) = prove_range(
        gens,
        remaining,
        BALANCE_BITS,
        &domain_prefix(prefix, WITHDRAW_REMAINING_DOMAIN),
        rng,
    )?;

    let inputs = WithdrawInputs {
        pk: keypair.public(),
        balance: *balance,
        amount,
    };
    let b = Scalar::from(remaining);

    let k_x = random_scalar(rng);
    let k_b = random_scalar(rng);
    let k_r = random_scalar(rng);

    let a_x = gens.g * k_x;
    let a_b = gens.g * k_b + balance.R * k_x;
    let a_v = gens.g * k_b + gens.h * k_r;

    let c = challenge_over(
        prefix,
        &inputs.statement(gens, &range.commitment()),
        &[a_x, a_b, a_v],
    );

    let proof = WithdrawProof {
        a_x,
        a_b,
        a_v,
        s_x: k_x + c * keypair.secret(),
        s_b: k_b + c * b,
        s_r: k_r + c * r,
        range,
    };
    Ok((inputs, proof))
}

/// Withdraw the entire balance. `balance_value` is revealed as the amount.
pub fn prove_ragequit<R: RngCore + CryptoRng>(
    gens: &Generators,
    keypair: &KeyPair,
    balance: &Ciphertext,
    balance_value: u64,
    prefix: &Scalar,
    rng: &mut R,
) -> Result<(RagequitInputs, RagequitProof), ProverError> {
    check_balance(gens, keypair, balance, balance_value)?;

    let inputs = RagequitInputs {
        pk: keypair.public(),
        balance: *balance,
        amount: balance_value,
    };

    let k_x = random_scalar(rng);
    let a_x = gens.g * k_x;
    let a_cr = balance.R * k_x;

    let c = challenge_over(prefix, &inputs.statement(gens), &[a_x, a_cr]);
    let proof = RagequitProof {
        a_x,
        a_cr,
        s_x: k_x + c * keypair.secret(),
    };
    Ok((inputs, proof))
}

// ========================= Audit =========================

/// Re-encrypt the balance for `auditor_pk` and prove both hide the same value.
pub fn prove_audit<R: RngCore + CryptoRng>(
    gens: &Generators,
    keypair: &KeyPair,
    auditor_pk: &RistrettoPoint,
    balance: &Ciphertext,
    balance_value: u64,
    prefix: &Scalar,
    rng: &mut R,
) -> Result<(AuditInputs, AuditProof), ProverError> {
    check_balance(gens, keypair, balance, balance_value)?;

    let r = random_scalar(rng);
    let inputs = AuditInputs {
        pk: keypair.public(),
        auditor_pk: *auditor_pk,
        balance: *balance,
        audit: encrypt(gens, balance_value, auditor_pk, &r),
    };

    let k_x = random_scalar(rng);
    let k_b = random_scalar(rng);
    let k_r = random_scalar(rng);

    let a_x = gens.g * k_x;
    let a_b = gens.g * k_b + balance.R * k_x;
    let a_r = gens.g * k_r;
    let a_l = gens.g * k_b + auditor_pk * k_r;

    let c = challenge_over(prefix, &inputs.statement(), &[a_x, a_b, a_r, a_l]);
    let proof = AuditProof {
        a_x,
        a_b,
        a_r,
        a_l,
        s_x: k_x + c * keypair.secret(),
        s_b: k_b + c * Scalar::from(balance_value),
        s_r: k_r + c * r,
    };
    Ok((inputs, proof))
}

// ========================= Ex-post disclosure =========================

/// Disclose the amount of a past transfer `original` to `disclosed_pk`.
///
/// The owner re-encrypts the amount under fresh randomness, once for itself
/// and once for the disclosed key, and proves the re-encryption matches
/// `original` without revealing the amount.
pub fn prove_ex_post<R: RngCore + CryptoRng>(
    gens: &Generators,
    keypair: &KeyPair,
    disclosed_pk: &RistrettoPoint,
    original: &Ciphertext,
    amount: u64,
    prefix: &Scalar,
    rng: &mut R,
) -> Result<(ExPostInputs, ExPostProof), ProverError> {
    check_balance(gens, keypair, original, amount)?;

    let pk = keypair.public();
    let r = random_scalar(rng);
    let reencrypted = encrypt(gens, amount, &pk, &r);
    let inputs = ExPostInputs {
        pk,
        disclosed_pk: *disclosed_pk,
        original: *original,
        reencrypted,
        disclosed: encrypt(gens, amount, disclosed_pk, &r),
    };

    let k_x = random_scalar(rng);
    let k_r = random_scalar(rng);
    let k_b = random_scalar(rng);

    let a_x = gens.g * k_x;
    let a_r = gens.g * k_r;
    let a_l = gens.g * k_b + pk * k_r;
    let a_d = gens.g * k_b + disclosed_pk * k_r;
    let a_eq = (reencrypted.R - original.R) * k_x;

    let c = challenge_over(prefix, &inputs.statement(), &[a_x, a_r, a_l, a_d, a_eq]);
    let proof = ExPostProof {
        a_x,
        a_r,
        a_l,
        a_d,
        a_eq,
        s_x: k_x + c * keypair.secret(),
        s_r: k_r + c * r,
        s_b: k_b + c * Scalar::from(amount),
    };
    Ok((inputs, proof))
}
