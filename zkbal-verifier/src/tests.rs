//! End-to-end tests: proofs from `zkbal-prover` checked by this crate.
//! Covered:
//!   1) Sigma primitives: completeness, wrong-witness soundness, shape errors
//!   2) Bit and range proofs: boundaries, forged bits, recomposition
//!   3) Account operations: honest proofs verify, each tampered sub-proof is
//!      reported by name
//!   4) A full account lifecycle across fund, transfer, rollover, withdraw
//!      and ragequit

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use zkbal_primitives::*;
use zkbal_prover::{
    compose::*, decrypt, random_scalar, range::prove_bit, range::prove_range, sigma::*,
    DecryptStrategy, KeyPair,
};

use crate::{compose::*, range::*, sigma::*, VerifierError};

fn rng(seed: u8) -> ChaCha20Rng {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut s = [0u8; 32];
    s[0] = seed;
    ChaCha20Rng::from_seed(s)
}

fn prefix(nonce: u64, account: RistrettoPoint, operation: Operation) -> Scalar {
    ProofContext {
        chain_id: [1u8; 32],
        contract: [2u8; 32],
        account,
        nonce,
        operation,
    }
    .prefix()
}

fn failed(which: SubProof) -> Result<(), VerifierError> {
    Err(VerifierError::VerificationFailed(which))
}

// ---------- Sigma primitives ----------

#[test]
fn poe_complete_and_sound() {
    let gens = Generators::default();
    let mut rng = rng(1);
    let x = random_scalar(&mut rng);
    let y = gens.g * x;
    let p = Scalar::from(9u64);

    let proof = prove_poe(&gens.g, &x, &p, &mut rng);
    assert!(verify_poe(&y, &gens.g, &proof, &p));
    assert!(!verify_poe(&y, &gens.g, &proof, &Scalar::from(10u64)));
    assert!(!verify_poe(&(y + gens.g), &gens.g, &proof, &p));

    let wrong = prove_poe(&gens.g, &(x + Scalar::ONE), &p, &mut rng);
    assert!(!verify_poe(&y, &gens.g, &wrong, &p));

    for _ in 0..64 {
        let w = random_scalar(&mut rng);
        if w == x {
            continue;
        }
        let wrong = prove_poe(&gens.g, &w, &p, &mut rng);
        assert!(!verify_poe(&y, &gens.g, &wrong, &p));
    }
}

#[test]
fn poe2_ped_and_poen() {
    let gens = Generators::default();
    let mut rng = rng(2);
    let (x1, x2, x3) = (
        random_scalar(&mut rng),
        random_scalar(&mut rng),
        random_scalar(&mut rng),
    );
    let p = Scalar::ONE;

    let y = gens.g * x1 + gens.h * x2;
    let proof = prove_poe2(&gens.g, &gens.h, &x1, &x2, &p, &mut rng);
    assert!(verify_poe2(&y, &gens.g, &gens.h, &proof, &p));
    assert!(!verify_poe2(&y, &gens.h, &gens.g, &proof, &p));

    let ped = prove_ped(&gens, &Scalar::from(42u64), &x3, &p, &mut rng);
    let v = pedersen_commit(&gens, &Scalar::from(42u64), &x3);
    assert!(verify_ped(&gens, &v, &ped, &p));
    assert!(!verify_ped(&gens, &(v + gens.g), &ped, &p));

    let g3 = gens.g * Scalar::from(12_345u64) + gens.h;
    let bases = [gens.g, gens.h, g3];
    let y = gens.g * x1 + gens.h * x2 + g3 * x3;
    let proof = prove_poen(&bases, &[x1, x2, x3], &p, &mut rng).expect("poen");
    assert_eq!(verify_poen(&y, &bases, &proof, &p), Ok(true));
    assert_eq!(verify_poen(&(y + g3), &bases, &proof, &p), Ok(false));
    assert!(matches!(
        verify_poen(&y, &bases[..2], &proof, &p),
        Err(VerifierError::MalformedInput(_))
    ));
}

#[test]
fn elgamal_well_formedness() {
    let gens = Generators::default();
    let mut rng = rng(3);
    let kp = KeyPair::generate(&gens, &mut rng);
    let r = random_scalar(&mut rng);
    let ct = encrypt(&gens, 500, &kp.public(), &r);
    let p = Scalar::from(5u64);

    let proof = prove_elgamal(&gens, &kp.public(), 500, &r, &p, &mut rng);
    assert!(verify_elgamal(&gens, &kp.public(), &ct, &proof, &p));

    let shifted = Ciphertext {
        L: ct.L + gens.g,
        R: ct.R,
    };
    assert!(!verify_elgamal(&gens, &kp.public(), &shifted, &proof, &p));
    let other = KeyPair::generate(&gens, &mut rng);
    assert!(!verify_elgamal(&gens, &other.public(), &ct, &proof, &p));
}

#[test]
fn same_encryption_links_plaintexts() {
    let gens = Generators::default();
    let mut rng = rng(4);
    let a = KeyPair::generate(&gens, &mut rng);
    let b = KeyPair::generate(&gens, &mut rng);
    let (r1, r2) = (random_scalar(&mut rng), random_scalar(&mut rng));
    let p = Scalar::from(77u64);

    let ct1 = encrypt(&gens, 5, &a.public(), &r1);
    let ct2 = encrypt(&gens, 5, &b.public(), &r2);
    let proof = prove_same_encryption(&gens, &a.public(), &b.public(), 5, &r1, &r2, &p, &mut rng);
    assert!(verify_same_encryption(
        &gens,
        &a.public(),
        &b.public(),
        &ct1,
        &ct2,
        &proof,
        &p
    ));

    // Second ciphertext holds 6; the prover still claims 5 for both.
    let ct2 = encrypt(&gens, 6, &b.public(), &r2);
    assert!(!verify_same_encryption(
        &gens,
        &a.public(),
        &b.public(),
        &ct1,
        &ct2,
        &proof,
        &p
    ));
}

#[test]
fn same_encryption_rejects_split_plaintext_responses() {
    // Two honest halves for plaintexts 5 and 6 under one challenge: each half
    // checks on its own, but no single `sb` satisfies both.
    let gens = Generators::default();
    let mut rng = rng(19);
    let a = KeyPair::generate(&gens, &mut rng);
    let b = KeyPair::generate(&gens, &mut rng);
    let (y1, y2) = (a.public(), b.public());
    let (r1, r2) = (random_scalar(&mut rng), random_scalar(&mut rng));
    let p = Scalar::from(78u64);
    let ct1 = encrypt(&gens, 5, &y1, &r1);
    let ct2 = encrypt(&gens, 6, &y2, &r2);

    let (kb1, kb2) = (random_scalar(&mut rng), random_scalar(&mut rng));
    let (kr1, kr2) = (random_scalar(&mut rng), random_scalar(&mut rng));
    let (al1, ar1) = (gens.g * kb1 + y1 * kr1, gens.g * kr1);
    let (al2, ar2) = (gens.g * kb2 + y2 * kr2, gens.g * kr2);
    let c = challenge(&p, &[al1, ar1, al2, ar2]);
    let sb1 = kb1 + c * Scalar::from(5u64);
    let sb2 = kb2 + c * Scalar::from(6u64);
    let sr1 = kr1 + c * r1;
    let sr2 = kr2 + c * r2;

    assert_eq!(gens.g * sr1, ar1 + ct1.R * c);
    assert_eq!(gens.g * sr2, ar2 + ct2.R * c);
    assert_eq!(gens.g * sb1 + y1 * sr1, al1 + ct1.L * c);
    assert_eq!(gens.g * sb2 + y2 * sr2, al2 + ct2.L * c);

    for sb in [sb1, sb2] {
        let forged = SameEncryptionProof {
            al1,
            ar1,
            al2,
            ar2,
            sb,
            sr1,
            sr2,
        };
        assert!(!verify_same_encryption(
            &gens, &y1, &y2, &ct1, &ct2, &forged, &p
        ));
    }
}

// ---------- Bit and range proofs ----------

#[test]
fn bit_proofs_verify_for_zero_and_one() {
    let gens = Generators::default();
    let mut rng = rng(5);
    for bit in [false, true] {
        let r = random_scalar(&mut rng);
        let bc = prove_bit(&gens, bit, &r, &Scalar::ONE, &mut rng);
        assert!(verify_bit(&gens, &bc.v, &bc.proof, &Scalar::ONE));
        assert!(!verify_bit(&gens, &bc.v, &bc.proof, &Scalar::from(2u64)));
    }
}

#[test]
fn bit_one_with_flipped_c0_rejected() {
    let gens = Generators::default();
    let mut rng = rng(6);
    let bc = prove_bit(&gens, true, &Scalar::from(5u64), &Scalar::ZERO, &mut rng);
    assert_eq!(bc.v, gens.g + gens.h * Scalar::from(5u64));
    assert!(verify_bit(&gens, &bc.v, &bc.proof, &Scalar::ZERO));

    let mut flipped = bc.proof;
    flipped.c0 = -flipped.c0;
    assert!(!verify_bit(&gens, &bc.v, &flipped, &Scalar::ZERO));
}

#[test]
fn hand_crafted_bit_two_rejected() {
    // V = g·2 + h·r: the prover knows r but neither branch holds.
    let gens = Generators::default();
    let mut rng = rng(7);
    let r = random_scalar(&mut rng);
    let v = gens.g * Scalar::from(2u64) + gens.h * r;
    let p = Scalar::from(3u64);

    // Simulate branch 0, answer branch 1 as if V − g = h·r.
    let (forged0, c0) = simulate_poe(&v, &gens.h, &mut rng);
    let k = random_scalar(&mut rng);
    let a1 = gens.h * k;
    let c = challenge(&p, &[forged0.a, a1]);
    let c1 = c - c0;
    let proof = BitProof {
        a0: forged0.a,
        a1,
        c0,
        s0: forged0.s,
        s1: k + c1 * r,
    };
    assert!(!verify_bit(&gens, &v, &proof, &p));

    // Simulating both branches fails the challenge split.
    let (f0, c0) = simulate_poe(&v, &gens.h, &mut rng);
    let (f1, _) = simulate_poe(&(v - gens.g), &gens.h, &mut rng);
    let proof = BitProof {
        a0: f0.a,
        a1: f1.a,
        c0,
        s0: f0.s,
        s1: f1.s,
    };
    assert!(!verify_bit(&gens, &v, &proof, &p));
}

#[test]
fn range_boundaries() {
    let gens = Generators::default();
    let mut rng = rng(8);
    let p = Scalar::from(100u64);

    for value in [0u64, 1, (1 << 32) - 1] {
        let (proof, r) = prove_range(&gens, value, BALANCE_BITS, &p, &mut rng).expect("range");
        let v = pedersen_commit(&gens, &Scalar::from(value), &r);
        assert_eq!(verify_range(&gens, &v, &proof, BALANCE_BITS, &p), Ok(true));
        assert_eq!(
            verify_range(&gens, &(v + gens.g), &proof, BALANCE_BITS, &p),
            Ok(false)
        );
        assert_eq!(
            verify_range(&gens, &v, &proof, BALANCE_BITS, &(p + Scalar::ONE)),
            Ok(false)
        );
    }

    // 2^32 needs 33 bits; the prover refuses it and a 33-bit proof is the
    // wrong shape for a 32-bit check.
    assert!(prove_range(&gens, 1 << 32, BALANCE_BITS, &p, &mut rng).is_err());
    let (wide, r) = prove_range(&gens, 1 << 32, 33, &p, &mut rng).expect("33-bit range");
    let v = pedersen_commit(&gens, &Scalar::from(1u64 << 32), &r);
    assert_eq!(verify_range(&gens, &v, &wide, 33, &p), Ok(true));
    assert!(matches!(
        verify_range(&gens, &v, &wide, BALANCE_BITS, &p),
        Err(VerifierError::MalformedInput(_))
    ));
    assert!(matches!(
        verify_range(&gens, &v, &wide, 0, &p),
        Err(VerifierError::MalformedInput(_))
    ));
}

#[test]
fn range_rejects_reordered_bits() {
    let gens = Generators::default();
    let mut rng = rng(9);
    let p = Scalar::ONE;
    let (mut proof, r) = prove_range(&gens, 0b10, 8, &p, &mut rng).expect("range");
    let v = pedersen_commit(&gens, &Scalar::from(2u64), &r);

    // Swapped bits recompose to a different commitment.
    proof.bits.swap(1, 2);
    assert_eq!(verify_range(&gens, &v, &proof, 8, &p), Ok(false));
}

// ---------- Account operations ----------

#[test]
fn fund_binds_amount_and_prefix() {
    let gens = Generators::default();
    let mut rng = rng(10);
    let kp = KeyPair::generate(&gens, &mut rng);
    let p = prefix(0, kp.public(), Operation::Fund);

    let (inputs, proof) = prove_fund(&gens, &kp, 100, &p, &mut rng);
    assert_eq!(verify_fund(&gens, &inputs, &proof, &p), Ok(()));

    let more = FundInputs {
        amount: 1_000,
        ..inputs
    };
    assert_eq!(
        verify_fund(&gens, &more, &proof, &p),
        failed(SubProof::Ownership)
    );

    let replay = prefix(1, kp.public(), Operation::Fund);
    assert_eq!(
        verify_fund(&gens, &inputs, &proof, &replay),
        failed(SubProof::Ownership)
    );
}

#[test]
fn rollover_requires_owner() {
    let gens = Generators::default();
    let mut rng = rng(11);
    let kp = KeyPair::generate(&gens, &mut rng);
    let other = KeyPair::generate(&gens, &mut rng);
    let p = prefix(3, kp.public(), Operation::Rollover);

    let (inputs, proof) = prove_rollover(&gens, &kp, &p, &mut rng);
    assert_eq!(verify_rollover(&gens, &inputs, &proof, &p), Ok(()));

    let stolen = RolloverInputs { pk: other.public() };
    assert_eq!(
        verify_rollover(&gens, &stolen, &proof, &p),
        failed(SubProof::Ownership)
    );
}

struct Parties {
    sender: KeyPair,
    receiver: KeyPair,
    auditor: KeyPair,
}

fn parties(rng: &mut ChaCha20Rng) -> Parties {
    let gens = Generators::default();
    Parties {
        sender: KeyPair::generate(&gens, rng),
        receiver: KeyPair::generate(&gens, rng),
        auditor: KeyPair::generate(&gens, rng),
    }
}

fn honest_transfer(
    gens: &Generators,
    who: &Parties,
    rng: &mut ChaCha20Rng,
) -> (TransferInputs, TransferProof, Scalar) {
    let balance = encrypt(gens, 1_000, &who.sender.public(), &random_scalar(rng));
    let req = TransferRequest {
        sender: &who.sender,
        receiver_pk: who.receiver.public(),
        auditor_pk: who.auditor.public(),
        balance,
        balance_value: 1_000,
        amount: 250,
    };
    let p = prefix(7, who.sender.public(), Operation::Transfer);
    let (inputs, proof) = prove_transfer(gens, &req, &p, rng).expect("transfer");
    (inputs, proof, p)
}

#[test]
fn transfer_honest_and_tampered_responses() {
    let gens = Generators::default();
    let mut rng = rng(12);
    let who = parties(&mut rng);
    let (inputs, proof, p) = honest_transfer(&gens, &who, &mut rng);

    assert_eq!(verify_transfer(&gens, &inputs, &proof, &p), Ok(()));

    let cases: [(fn(&mut TransferProof), SubProof); 7] = [
        (|p| p.s_x += Scalar::ONE, SubProof::Ownership),
        (|p| p.s_r += Scalar::ONE, SubProof::Blinding),
        (|p| p.s_b += Scalar::ONE, SubProof::Sender),
        (|p| p.s_b2 += Scalar::ONE, SubProof::RemainingBalance),
        (|p| p.s_r2 += Scalar::ONE, SubProof::RemainingCommitment),
        (
            |p| p.range_amount.bits[3].proof.s0 += Scalar::ONE,
            SubProof::AmountRange,
        ),
        (
            |p| p.range_remaining.bits[0].proof.s1 += Scalar::ONE,
            SubProof::RemainingRange,
        ),
    ];
    for (tamper, which) in cases {
        let mut bad = proof.clone();
        tamper(&mut bad);
        assert_eq!(verify_transfer(&gens, &inputs, &bad, &p), failed(which));
    }

    // Any change to the statement moves the challenge.
    let mut moved = inputs;
    moved.receiver.L += gens.g;
    assert_eq!(
        verify_transfer(&gens, &moved, &proof, &p),
        failed(SubProof::Ownership)
    );

    let mut split = inputs;
    split.auditor.R += gens.g;
    assert!(matches!(
        verify_transfer(&gens, &split, &proof, &p),
        Err(VerifierError::MalformedInput(_))
    ));
}

/// Transfer built like `prove_transfer` but with the receiver and auditor
/// ciphertexts encrypting amounts of the caller's choosing.
fn lying_transfer(
    gens: &Generators,
    who: &Parties,
    receiver_amount: u64,
    auditor_amount: u64,
    rng: &mut ChaCha20Rng,
) -> (TransferInputs, TransferProof, Scalar) {
    let (amount, remaining) = (250u64, 750u64);
    let p = prefix(8, who.sender.public(), Operation::Transfer);
    let balance = encrypt(gens, 1_000, &who.sender.public(), &random_scalar(rng));

    let (range_amount, r) = prove_range(
        gens,
        amount,
        BALANCE_BITS,
        &domain_prefix(&p, TRANSFER_AMOUNT_DOMAIN),
        rng,
    )
    .expect("range");
    let (range_remaining, r2) = prove_range(
        gens,
        remaining,
        BALANCE_BITS,
        &domain_prefix(&p, TRANSFER_REMAINING_DOMAIN),
        rng,
    )
    .expect("range");

    let (ys, yr, ya) = (
        who.sender.public(),
        who.receiver.public(),
        who.auditor.public(),
    );
    let inputs = TransferInputs {
        sender_pk: ys,
        receiver_pk: yr,
        auditor_pk: ya,
        balance,
        sender: encrypt(gens, amount, &ys, &r),
        receiver: encrypt(gens, receiver_amount, &yr, &r),
        auditor: encrypt(gens, auditor_amount, &ya, &r),
    };
    let after = inputs.sender_balance_after();

    let k: [Scalar; 5] = core::array::from_fn(|_| random_scalar(rng));
    let a_x = gens.g * k[0];
    let a_r = gens.g * k[1];
    let a_sender = gens.g * k[2] + ys * k[1];
    let a_receiver = gens.g * k[2] + yr * k[1];
    let a_auditor = gens.g * k[2] + ya * k[1];
    let a_v = gens.g * k[2] + gens.h * k[1];
    let a_b = gens.g * k[3] + after.R * k[0];
    let a_v2 = gens.g * k[3] + gens.h * k[4];

    let v = range_amount.commitment();
    let v2 = range_remaining.commitment();
    let mut points = inputs.statement(&v, &v2);
    points.extend([a_x, a_r, a_sender, a_receiver, a_auditor, a_v, a_b, a_v2]);
    let c = challenge(&p, &points);

    let proof = TransferProof {
        a_x,
        a_r,
        a_sender,
        a_receiver,
        a_auditor,
        a_v,
        a_b,
        a_v2,
        s_x: k[0] + c * who.sender.secret(),
        s_r: k[1] + c * r,
        s_b: k[2] + c * Scalar::from(amount),
        s_b2: k[3] + c * Scalar::from(remaining),
        s_r2: k[4] + c * r2,
        range_amount,
        range_remaining,
    };
    (inputs, proof, p)
}

#[test]
fn transfer_rejects_mismatched_recipient_amounts() {
    let gens = Generators::default();
    let mut rng = rng(13);
    let who = parties(&mut rng);

    let (inputs, proof, p) = lying_transfer(&gens, &who, 250, 250, &mut rng);
    assert_eq!(verify_transfer(&gens, &inputs, &proof, &p), Ok(()));

    let (inputs, proof, p) = lying_transfer(&gens, &who, 2_500, 250, &mut rng);
    assert_eq!(
        verify_transfer(&gens, &inputs, &proof, &p),
        failed(SubProof::Receiver)
    );

    let (inputs, proof, p) = lying_transfer(&gens, &who, 250, 0, &mut rng);
    assert_eq!(
        verify_transfer(&gens, &inputs, &proof, &p),
        failed(SubProof::Auditor)
    );
}

#[test]
fn withdraw_honest_and_tampered() {
    let gens = Generators::default();
    let mut rng = rng(14);
    let kp = KeyPair::generate(&gens, &mut rng);
    let balance = encrypt(&gens, 600, &kp.public(), &random_scalar(&mut rng));
    let p = prefix(2, kp.public(), Operation::Withdraw);

    let (inputs, proof) =
        prove_withdraw(&gens, &kp, &balance, 600, 100, &p, &mut rng).expect("withdraw");
    assert_eq!(verify_withdraw(&gens, &inputs, &proof, &p), Ok(()));

    let cases: [(fn(&mut WithdrawProof), SubProof); 4] = [
        (|p| p.s_x += Scalar::ONE, SubProof::Ownership),
        (|p| p.s_b += Scalar::ONE, SubProof::RemainingBalance),
        (|p| p.s_r += Scalar::ONE, SubProof::RemainingCommitment),
        (
            |p| p.range.bits[31].proof.c0 += Scalar::ONE,
            SubProof::RemainingRange,
        ),
    ];
    for (tamper, which) in cases {
        let mut bad = proof.clone();
        tamper(&mut bad);
        assert_eq!(verify_withdraw(&gens, &inputs, &bad, &p), failed(which));
    }

    let greedy = WithdrawInputs {
        amount: 600,
        ..inputs
    };
    assert_eq!(
        verify_withdraw(&gens, &greedy, &proof, &p),
        failed(SubProof::Ownership)
    );
}

#[test]
fn ragequit_requires_whole_balance() {
    let gens = Generators::default();
    let mut rng = rng(15);
    let kp = KeyPair::generate(&gens, &mut rng);
    let balance = encrypt(&gens, 50, &kp.public(), &random_scalar(&mut rng));
    let p = prefix(4, kp.public(), Operation::Ragequit);

    let (inputs, proof) = prove_ragequit(&gens, &kp, &balance, 50, &p, &mut rng).expect("ragequit");
    assert_eq!(verify_ragequit(&gens, &inputs, &proof, &p), Ok(()));

    // Claim 40 and prove ownership honestly; the leftover 10 is caught.
    let short = RagequitInputs {
        amount: 40,
        ..inputs
    };
    let k = random_scalar(&mut rng);
    let (a_x, a_cr) = (gens.g * k, balance.R * k);
    let mut points = short.statement(&gens);
    points.extend([a_x, a_cr]);
    let c = challenge(&p, &points);
    let forged = RagequitProof {
        a_x,
        a_cr,
        s_x: k + c * kp.secret(),
    };
    assert_eq!(
        verify_ragequit(&gens, &short, &forged, &p),
        failed(SubProof::ZeroBalance)
    );

    let mut bad = proof;
    bad.s_x += Scalar::ONE;
    assert_eq!(
        verify_ragequit(&gens, &inputs, &bad, &p),
        failed(SubProof::Ownership)
    );
}

#[test]
fn audit_honest_and_lying() {
    let gens = Generators::default();
    let mut rng = rng(16);
    let kp = KeyPair::generate(&gens, &mut rng);
    let auditor = KeyPair::generate(&gens, &mut rng);
    let balance = encrypt(&gens, 77, &kp.public(), &random_scalar(&mut rng));
    let p = prefix(5, kp.public(), Operation::Audit);

    let (inputs, proof) =
        prove_audit(&gens, &kp, &auditor.public(), &balance, 77, &p, &mut rng).expect("audit");
    assert_eq!(verify_audit(&gens, &inputs, &proof, &p), Ok(()));

    let mut bad = proof;
    bad.s_b += Scalar::ONE;
    assert_eq!(
        verify_audit(&gens, &inputs, &bad, &p),
        failed(SubProof::Balance)
    );
    let mut bad = proof;
    bad.s_r += Scalar::ONE;
    assert_eq!(
        verify_audit(&gens, &inputs, &bad, &p),
        failed(SubProof::Auditor)
    );

    // The auditor is shown 78 while the balance holds 77.
    let r = random_scalar(&mut rng);
    let lying = AuditInputs {
        audit: encrypt(&gens, 78, &auditor.public(), &r),
        ..inputs
    };
    let k: [Scalar; 3] = core::array::from_fn(|_| random_scalar(&mut rng));
    let a_x = gens.g * k[0];
    let a_b = gens.g * k[1] + balance.R * k[0];
    let a_r = gens.g * k[2];
    let a_l = gens.g * k[1] + auditor.public() * k[2];
    let mut points = lying.statement();
    points.extend([a_x, a_b, a_r, a_l]);
    let c = challenge(&p, &points);
    let forged = AuditProof {
        a_x,
        a_b,
        a_r,
        a_l,
        s_x: k[0] + c * kp.secret(),
        s_b: k[1] + c * Scalar::from(77u64),
        s_r: k[2] + c * r,
    };
    assert_eq!(
        verify_audit(&gens, &lying, &forged, &p),
        failed(SubProof::Auditor)
    );
}

/// Ex-post disclosure with independently chosen amounts for the owner's
/// re-encryption and the disclosed ciphertext.
fn ex_post_with(
    gens: &Generators,
    kp: &KeyPair,
    disclosed_pk: &RistrettoPoint,
    original: &Ciphertext,
    reencrypted_amount: u64,
    disclosed_amount: u64,
    p: &Scalar,
    rng: &mut ChaCha20Rng,
) -> (ExPostInputs, ExPostProof) {
    let pk = kp.public();
    let r = random_scalar(rng);
    let reencrypted = encrypt(gens, reencrypted_amount, &pk, &r);
    let inputs = ExPostInputs {
        pk,
        disclosed_pk: *disclosed_pk,
        original: *original,
        reencrypted,
        disclosed: encrypt(gens, disclosed_amount, disclosed_pk, &r),
    };

    let k: [Scalar; 3] = core::array::from_fn(|_| random_scalar(rng));
    let a_x = gens.g * k[0];
    let a_r = gens.g * k[1];
    let a_l = gens.g * k[2] + pk * k[1];
    let a_d = gens.g * k[2] + disclosed_pk * k[1];
    let a_eq = (reencrypted.R - original.R) * k[0];
    let mut points = inputs.statement();
    points.extend([a_x, a_r, a_l, a_d, a_eq]);
    let c = challenge(p, &points);

    let proof = ExPostProof {
        a_x,
        a_r,
        a_l,
        a_d,
        a_eq,
        s_x: k[0] + c * kp.secret(),
        s_r: k[1] + c * r,
        s_b: k[2] + c * Scalar::from(reencrypted_amount),
    };
    (inputs, proof)
}

#[test]
fn ex_post_honest_and_tampered() {
    let gens = Generators::default();
    let mut rng = rng(17);
    let kp = KeyPair::generate(&gens, &mut rng);
    let regulator = KeyPair::generate(&gens, &mut rng);
    let original = encrypt(&gens, 321, &kp.public(), &random_scalar(&mut rng));
    let p = prefix(6, kp.public(), Operation::ExPost);

    let (inputs, proof) =
        prove_ex_post(&gens, &kp, &regulator.public(), &original, 321, &p, &mut rng)
            .expect("ex post");
    assert_eq!(verify_ex_post(&gens, &inputs, &proof, &p), Ok(()));
    assert_eq!(
        decrypt(
            &gens,
            &inputs.disclosed,
            regulator.secret(),
            1_000,
            DecryptStrategy::Linear
        )
        .expect("disclosed"),
        321
    );

    let mut bad = proof;
    bad.s_x += Scalar::ONE;
    assert_eq!(
        verify_ex_post(&gens, &inputs, &bad, &p),
        failed(SubProof::Ownership)
    );
    let mut bad = proof;
    bad.s_r += Scalar::ONE;
    assert_eq!(
        verify_ex_post(&gens, &inputs, &bad, &p),
        failed(SubProof::Blinding)
    );
    let mut bad = proof;
    bad.s_b += Scalar::ONE;
    assert_eq!(
        verify_ex_post(&gens, &inputs, &bad, &p),
        failed(SubProof::Reencryption)
    );

    let mut split = inputs;
    split.disclosed.R += gens.g;
    assert!(matches!(
        verify_ex_post(&gens, &split, &proof, &p),
        Err(VerifierError::MalformedInput(_))
    ));

    let (inputs, proof) = ex_post_with(
        &gens,
        &kp,
        &regulator.public(),
        &original,
        321,
        321,
        &p,
        &mut rng,
    );
    assert_eq!(verify_ex_post(&gens, &inputs, &proof, &p), Ok(()));

    let (inputs, proof) = ex_post_with(
        &gens,
        &kp,
        &regulator.public(),
        &original,
        321,
        1,
        &p,
        &mut rng,
    );
    assert_eq!(
        verify_ex_post(&gens, &inputs, &proof, &p),
        failed(SubProof::Disclosure)
    );

    // Disclose a consistent pair for an amount that differs from the original.
    let (inputs, proof) = ex_post_with(
        &gens,
        &kp,
        &regulator.public(),
        &original,
        9,
        9,
        &p,
        &mut rng,
    );
    assert_eq!(
        verify_ex_post(&gens, &inputs, &proof, &p),
        failed(SubProof::Consistency)
    );
}

#[test]
fn account_lifecycle() {
    let gens = Generators::default();
    let mut rng = rng(18);
    let who = parties(&mut rng);
    let (alice, bob) = (&who.sender, &who.receiver);
    let table = zkbal_prover::BabyStepTable::new(&gens, 1 << 16).expect("table");
    let mut nonce = 0u64;
    let mut next = |account: RistrettoPoint, op: Operation| {
        nonce += 1;
        prefix(nonce, account, op)
    };

    // Fund alice with 1000.
    let p = next(alice.public(), Operation::Fund);
    let (fund, proof) = prove_fund(&gens, alice, 1_000, &p, &mut rng);
    verify_fund(&gens, &fund, &proof, &p).expect("fund");
    let mut alice_balance = fund_ciphertext(&gens, fund.amount, &fund.pk, &FundConfig::default());
    let mut bob_pending = Ciphertext::zero();
    let mut bob_balance = Ciphertext::zero();

    // Alice sends 400 to bob.
    let p = next(alice.public(), Operation::Transfer);
    let req = TransferRequest {
        sender: alice,
        receiver_pk: bob.public(),
        auditor_pk: who.auditor.public(),
        balance: alice_balance,
        balance_value: 1_000,
        amount: 400,
    };
    let (transfer, proof) = prove_transfer(&gens, &req, &p, &mut rng).expect("transfer");
    verify_transfer(&gens, &transfer, &proof, &p).expect("transfer verifies");
    alice_balance = transfer.sender_balance_after();
    bob_pending += transfer.receiver;

    // Bob rolls pending into balance.
    let p = next(bob.public(), Operation::Rollover);
    let (rollover, proof) = prove_rollover(&gens, bob, &p, &mut rng);
    verify_rollover(&gens, &rollover, &proof, &p).expect("rollover");
    bob_balance += bob_pending;
    assert_eq!(table.decrypt(&bob_balance, bob.secret()).expect("bob"), 400);

    // Bob withdraws 150 publicly.
    let p = next(bob.public(), Operation::Withdraw);
    let (withdraw, proof) =
        prove_withdraw(&gens, bob, &bob_balance, 400, 150, &p, &mut rng).expect("withdraw");
    verify_withdraw(&gens, &withdraw, &proof, &p).expect("withdraw verifies");
    bob_balance = withdraw.balance_after(&gens);
    assert_eq!(table.decrypt(&bob_balance, bob.secret()).expect("bob"), 250);

    // Alice leaves with everything she has left.
    let left = table.decrypt(&alice_balance, alice.secret()).expect("alice");
    assert_eq!(left, 600);
    let p = next(alice.public(), Operation::Ragequit);
    let (quit, proof) =
        prove_ragequit(&gens, alice, &alice_balance, left, &p, &mut rng).expect("ragequit");
    verify_ragequit(&gens, &quit, &proof, &p).expect("ragequit verifies");
    assert_eq!(quit.amount, 600);
}
