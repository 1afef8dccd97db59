//! Fault Unit Tests.

use y86sim_core::Status;
use y86sim_core::common::Fault;

#[test]
fn faults_map_to_terminal_statuses() {
    assert_eq!(Fault::Address(0x10).status(), Status::AddressFault);
    assert_eq!(Fault::IllegalInstruction(0xC0).status(), Status::IllegalInstruction);
    assert!(Fault::Address(0).status().is_terminal());
}

#[test]
fn faults_display_their_operand_in_hex() {
    assert_eq!(Fault::Address(0xfff9).to_string(), "AddressFault(0xfff9)");
    assert_eq!(
        Fault::IllegalInstruction(0xc0).to_string(),
        "IllegalInstruction(0xc0)"
    );
}
