//! Verifiers for the account operations.
//!
//! Each `verify_*` recomputes the single challenge over the statement and
//! the commitments, then checks the sub-proofs in a fixed order and reports
//! the first one that fails. Range proofs come last.

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use log::debug;

use zkbal_primitives::{
    challenge_over, domain_prefix, statement_prefix, AuditInputs, AuditProof, ExPostInputs,
    ExPostProof, FundInputs, FundProof, Generators, RagequitInputs, RagequitProof,
    RolloverInputs, RolloverProof, SubProof, TransferInputs, TransferProof, WithdrawInputs,
    WithdrawProof, BALANCE_BITS, TRANSFER_AMOUNT_DOMAIN, TRANSFER_REMAINING_DOMAIN,
    WITHDRAW_REMAINING_DOMAIN,
};

use crate::{points_eq, range::verify_range, sigma::verify_poe, VerifierError};

fn check(ok: bool, which: SubProof) -> Result<(), VerifierError> {
    if ok {
        Ok(())
    } else {
        debug!(target: "zkbal", "{which} proof rejected");
        Err(VerifierError::VerificationFailed(which))
    }
}

/// `g·s_x == A_x + y·c`.
fn ownership(
    gens: &Generators,
    y: &RistrettoPoint,
    a_x: &RistrettoPoint,
    s_x: &Scalar,
    c: &Scalar,
) -> bool {
    points_eq(&(gens.g * s_x), &(a_x + y * c))
}

pub fn verify_fund(
    gens: &Generators,
    inputs: &FundInputs,
    proof: &FundProof,
    prefix: &Scalar,
) -> Result<(), VerifierError> {
    let bound = statement_prefix(prefix, &inputs.statement(gens));
    check(
        verify_poe(&inputs.pk, &gens.g, &proof.ownership, &bound),
        SubProof::Ownership,
    )
}

pub fn verify_rollover(
    gens: &Generators,
    inputs: &RolloverInputs,
    proof: &RolloverProof,
    prefix: &Scalar,
) -> Result<(), VerifierError> {
    let bound = statement_prefix(prefix, &inputs.statement());
    check(
        verify_poe(&inputs.pk, &gens.g, &proof.ownership, &bound),
        SubProof::Ownership,
    )
}

/// Check a transfer. On success the caller applies
/// [`TransferInputs::sender_balance_after`] to the sender and adds
/// `inputs.receiver` to the receiver's pending balance.
pub fn verify_transfer(
    gens: &Generators,
    inputs: &TransferInputs,
    proof: &TransferProof,
    prefix: &Scalar,
) -> Result<(), VerifierError> {
    let r = inputs.sender.R;
    if !points_eq(&inputs.receiver.R, &r) || !points_eq(&inputs.auditor.R, &r) {
        return Err(VerifierError::MalformedInput(
            "transfer ciphertexts must share R",
        ));
    }

    let v = proof.range_amount.commitment();
    let v2 = proof.range_remaining.commitment();
    let after = inputs.sender_balance_after();
    let p = proof;

    let c = challenge_over(
        prefix,
        &inputs.statement(&v, &v2),
        &[
            p.a_x, p.a_r, p.a_sender, p.a_receiver, p.a_auditor, p.a_v, p.a_b, p.a_v2,
        ],
    );

    check(
        ownership(gens, &inputs.sender_pk, &p.a_x, &p.s_x, &c),
        SubProof::Ownership,
    )?;
    check(
        points_eq(&(gens.g * p.s_r), &(p.a_r + r * c)),
        SubProof::Blinding,
    )?;
    let encryptions = [
        (SubProof::Sender, inputs.sender_pk, p.a_sender, inputs.sender.L),
        (SubProof::Receiver, inputs.receiver_pk, p.a_receiver, inputs.receiver.L),
        (SubProof::Auditor, inputs.auditor_pk, p.a_auditor, inputs.auditor.L),
    ];
    for (which, y, a, l) in encryptions {
        check(
            points_eq(&(gens.g * p.s_b + y * p.s_r), &(a + l * c)),
            which,
        )?;
    }
    check(
        points_eq(&(gens.g * p.s_b + gens.h * p.s_r), &(p.a_v + v * c)),
        SubProof::AmountCommitment,
    )?;
    check(
        points_eq(&(gens.g * p.s_b2 + after.R * p.s_x), &(p.a_b + after.L * c)),
        SubProof::RemainingBalance,
    )?;
    check(
        points_eq(&(gens.g * p.s_b2 + gens.h * p.s_r2), &(p.a_v2 + v2 * c)),
        SubProof::RemainingCommitment,
    )?;
    check(
        verify_range(
            gens,
            &v,
            &p.range_amount,
            BALANCE_BITS,
            &domain_prefix(prefix, TRANSFER_AMOUNT_DOMAIN),
        )?,
        SubProof::AmountRange,
    )?;
    check(
        verify_range(
            gens,
            &v2,
            &p.range_remaining,
            BALANCE_BITS,
            &domain_prefix(prefix, TRANSFER_REMAINING_DOMAIN),
        )?,
        SubProof::RemainingRange,
    )
}

/// Check a withdrawal of the public `inputs.amount`. On success the caller
/// replaces the balance with [`WithdrawInputs::balance_after`].
pub fn verify_withdraw(
    gens: &Generators,
    inputs: &WithdrawInputs,
    proof: &WithdrawProof,
    prefix: &Scalar,
) -> Result<(), VerifierError> {
    let v = proof.range.commitment();
    let after = inputs.balance_after(gens);
    let p = proof;

    let c = challenge_over(prefix, &inputs.statement(gens, &v), &[p.a_x, p.a_b, p.a_v]);

    check(
        ownership(gens, &inputs.pk, &p.a_x, &p.s_x, &c),
        SubProof::Ownership,
    )?;
    check(
        points_eq(&(gens.g * p.s_b + after.R * p.s_x), &(p.a_b + after.L * c)),
        SubProof::RemainingBalance,
    )?;
    check(
        points_eq(&(gens.g * p.s_b + gens.h * p.s_r), &(p.a_v + v * c)),
        SubProof::RemainingCommitment,
    )?;
    check(
        verify_range(
            gens,
            &v,
            &p.range,
            BALANCE_BITS,
            &domain_prefix(prefix, WITHDRAW_REMAINING_DOMAIN),
        )?,
        SubProof::RemainingRange,
    )
}

/// Check that `inputs.amount` is the whole balance.
pub fn verify_ragequit(
    gens: &Generators,
    inputs: &RagequitInputs,
    proof: &RagequitProof,
    prefix: &Scalar,
) -> Result<(), VerifierError> {
    let c = challenge_over(prefix, &inputs.statement(gens), &[proof.a_x, proof.a_cr]);
    let rest = inputs.balance.L - gens.g * Scalar::from(inputs.amount);

    check(
        ownership(gens, &inputs.pk, &proof.a_x, &proof.s_x, &c),
        SubProof::Ownership,
    )?;
    check(
        points_eq(&(inputs.balance.R * proof.s_x), &(proof.a_cr + rest * c)),
        SubProof::ZeroBalance,
    )
}

pub fn verify_audit(
    gens: &Generators,
    inputs: &AuditInputs,
    proof: &AuditProof,
    prefix: &Scalar,
) -> Result<(), VerifierError> {
    let p = proof;
    let c = challenge_over(prefix, &inputs.statement(), &[p.a_x, p.a_b, p.a_r, p.a_l]);
    let (bal, audit) = (&inputs.balance, &inputs.audit);

    check(
        ownership(gens, &inputs.pk, &p.a_x, &p.s_x, &c),
        SubProof::Ownership,
    )?;
    check(
        points_eq(&(gens.g * p.s_b + bal.R * p.s_x), &(p.a_b + bal.L * c)),
        SubProof::Balance,
    )?;
    let blinding = points_eq(&(gens.g * p.s_r), &(p.a_r + audit.R * c));
    let encryption = points_eq(
        &(gens.g * p.s_b + inputs.auditor_pk * p.s_r),
        &(p.a_l + audit.L * c),
    );
    check(blinding & encryption, SubProof::Auditor)
}

pub fn verify_ex_post(
    gens: &Generators,
    inputs: &ExPostInputs,
    proof: &ExPostProof,
    prefix: &Scalar,
) -> Result<(), VerifierError> {
    let (orig, re, dis) = (&inputs.original, &inputs.reencrypted, &inputs.disclosed);
    if !points_eq(&dis.R, &re.R) {
        return Err(VerifierError::MalformedInput(
            "disclosed and re-encrypted ciphertexts must share R",
        ));
    }

    let p = proof;
    let c = challenge_over(
        prefix,
        &inputs.statement(),
        &[p.a_x, p.a_r, p.a_l, p.a_d, p.a_eq],
    );

    check(
        ownership(gens, &inputs.pk, &p.a_x, &p.s_x, &c),
        SubProof::Ownership,
    )?;
    check(
        points_eq(&(gens.g * p.s_r), &(p.a_r + re.R * c)),
        SubProof::Blinding,
    )?;
    check(
        points_eq(&(gens.g * p.s_b + inputs.pk * p.s_r), &(p.a_l + re.L * c)),
        SubProof::Reencryption,
    )?;
    check(
        points_eq(
            &(gens.g * p.s_b + inputs.disclosed_pk * p.s_r),
            &(p.a_d + dis.L * c),
        ),
        SubProof::Disclosure,
    )?;
    check(
        points_eq(&((re.R - orig.R) * p.s_x), &(p.a_eq + (re.L - orig.L) * c)),
        SubProof::Consistency,
    )
}
