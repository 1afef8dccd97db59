//! Opcode Table Unit Tests.
//!
//! Verifies class decoding, the per-class encoding table, ALU function decoding and
//! condition evaluation against every flag combination.

use rstest::rstest;
use y86sim_core::core::arch::flags::ConditionCodes;
use y86sim_core::isa::{AluFn, Condition, OpClass, Opcode};

// ══════════════════════════════════════════════════════════
// 1. Classes and lengths
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x00, 1)]
#[case(0x10, 1)]
#[case(0x20, 2)]
#[case(0x30, 10)]
#[case(0x40, 10)]
#[case(0x50, 10)]
#[case(0x60, 2)]
#[case(0x70, 9)]
#[case(0x80, 9)]
#[case(0x90, 1)]
#[case(0xA0, 2)]
#[case(0xB0, 2)]
fn class_lengths(#[case] byte: u8, #[case] len: i64) {
    let op = Opcode::decode(byte).expect("valid opcode");
    assert_eq!(op.format().length(), len);
    assert_eq!(op.class().length(), len);
}

#[rstest]
#[case(0xC0)]
#[case(0xD5)]
#[case(0xFF)]
fn classes_above_b_are_illegal(#[case] byte: u8) {
    assert_eq!(OpClass::from_nibble(byte >> 4), None);
    assert_eq!(Opcode::decode(byte), None);
}

#[test]
fn max_class_is_popq() {
    assert_eq!(OpClass::MAX, 0xB);
}

#[rstest]
#[case(0x60, AluFn::Add, "addq")]
#[case(0x61, AluFn::Sub, "subq")]
#[case(0x62, AluFn::And, "andq")]
#[case(0x63, AluFn::Xor, "xorq")]
fn alu_functions(#[case] byte: u8, #[case] func: AluFn, #[case] name: &str) {
    assert_eq!(Opcode::decode(byte), Some(Opcode::Alu(func)));
    assert_eq!(Opcode::Alu(func).to_string(), name);
}

#[test]
fn encode_inverts_decode() {
    for op in Opcode::ALL {
        assert_eq!(Opcode::decode(op.encode()), Some(op));
    }
    assert_eq!(Opcode::Jump(Condition::Ge).encode(), 0x75);
    assert_eq!(Opcode::Alu(AluFn::And).encode(), 0x62);
}

#[rstest]
#[case("rrmovq", Some(Opcode::Cmov(Condition::Always)))]
#[case("CMOVNE", Some(Opcode::Cmov(Condition::Ne)))]
#[case("jl", Some(Opcode::Jump(Condition::L)))]
#[case("xorq", Some(Opcode::Alu(AluFn::Xor)))]
#[case("movq", None)]
#[case("j?", None)]
fn mnemonic_lookup(#[case] name: &str, #[case] op: Option<Opcode>) {
    assert_eq!(Opcode::from_mnemonic(name), op);
}

#[test]
fn unknown_alu_function_is_illegal() {
    assert_eq!(Opcode::decode(0x64), None);
    assert_eq!(Opcode::decode(0x6F), None);
}

#[test]
fn move_and_jump_functions_always_decode() {
    assert_eq!(Opcode::decode(0x20), Some(Opcode::Cmov(Condition::Always)));
    assert_eq!(Opcode::decode(0x26), Some(Opcode::Cmov(Condition::G)));
    assert_eq!(
        Opcode::decode(0x79),
        Some(Opcode::Jump(Condition::Unrecognized(9)))
    );
}

#[rstest]
#[case(0x20, "rrmovq")]
#[case(0x21, "cmovle")]
#[case(0x24, "cmovne")]
#[case(0x70, "jmp")]
#[case(0x73, "je")]
#[case(0x76, "jg")]
#[case(0x80, "call")]
#[case(0x90, "ret")]
#[case(0xA0, "pushq")]
#[case(0xB0, "popq")]
fn mnemonics(#[case] byte: u8, #[case] name: &str) {
    assert_eq!(Opcode::decode(byte).expect("valid").to_string(), name);
}

// ══════════════════════════════════════════════════════════
// 2. Conditions
// ══════════════════════════════════════════════════════════

/// Reference predicate written directly from the flag equations.
fn expected(code: u8, zf: bool, sf: bool, of: bool) -> bool {
    let less = sf ^ of;
    match code {
        0 => true,
        1 => less || zf,
        2 => less,
        3 => zf,
        4 => !zf,
        5 => !less,
        6 => !less && !zf,
        _ => false,
    }
}

#[rstest]
fn conditions_match_flag_equations(
    #[values(0, 1, 2, 3, 4, 5, 6, 7, 15)] code: u8,
    #[values(false, true)] zf: bool,
    #[values(false, true)] sf: bool,
    #[values(false, true)] of: bool,
) {
    let cc = ConditionCodes::new(zf, sf, of);
    assert_eq!(
        cc.satisfies(Condition::from_nibble(code)),
        expected(code, zf, sf, of)
    );
}

#[test]
fn reset_flags_make_equal_true() {
    let cc = ConditionCodes::default();
    assert!(cc.satisfies(Condition::E));
    assert!(cc.satisfies(Condition::Le));
    assert!(!cc.satisfies(Condition::L));
    assert!(!cc.satisfies(Condition::G));
}
