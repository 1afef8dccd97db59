//! Opcode classes and function codes.
//!
//! This module replaces raw nibble comparisons with closed enumerations. It provides:
//! 1. **Classes:** [`OpClass`], one variant per opcode-class nibble `0x0..=0xB`.
//! 2. **Encoding Table:** [`InstrFormat`], describing which fields each class consumes.
//! 3. **Functions:** [`AluFn`] and [`Condition`], decoded from the function nibble.
//! 4. **Decoded Opcode:** [`Opcode`], a class with its function already resolved.

use std::fmt;

use crate::common::constants::{IMMEDIATE_BYTES, NIBBLE_SHIFT, OPCODE_BYTES, REGISTER_BYTES};

/// Which optional fields follow the opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstrFormat {
    /// A register-specifier byte follows the opcode byte.
    pub needs_regs: bool,
    /// An 8-byte immediate follows (after the register byte, if any).
    pub needs_imm: bool,
}

impl InstrFormat {
    const fn new(needs_regs: bool, needs_imm: bool) -> Self {
        Self {
            needs_regs,
            needs_imm,
        }
    }

    /// Total encoded length in bytes.
    pub const fn length(self) -> i64 {
        let mut len = OPCODE_BYTES;
        if self.needs_regs {
            len += REGISTER_BYTES;
        }
        if self.needs_imm {
            len += IMMEDIATE_BYTES;
        }
        len
    }
}

/// Opcode class (high nibble of the opcode byte).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpClass {
    /// `halt`
    Halt = 0x0,
    /// `nop`
    Nop = 0x1,
    /// `rrmovq` / `cmovXX`
    Rrmovq = 0x2,
    /// `irmovq`
    Irmovq = 0x3,
    /// `rmmovq`
    Rmmovq = 0x4,
    /// `mrmovq`
    Mrmovq = 0x5,
    /// `OPq` (`addq`, `subq`, `andq`, `xorq`)
    Opq = 0x6,
    /// `jXX`
    Jxx = 0x7,
    /// `call`
    Call = 0x8,
    /// `ret`
    Ret = 0x9,
    /// `pushq`
    Pushq = 0xA,
    /// `popq`
    Popq = 0xB,
}

impl OpClass {
    /// Largest accepted class nibble.
    pub const MAX: u8 = Self::Popq as u8;

    /// Decodes a class nibble.
    ///
    /// # Returns
    ///
    /// `None` for nibbles above [`OpClass::MAX`]; those fetch as illegal instructions.
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        Some(match nibble {
            0x0 => Self::Halt,
            0x1 => Self::Nop,
            0x2 => Self::Rrmovq,
            0x3 => Self::Irmovq,
            0x4 => Self::Rmmovq,
            0x5 => Self::Mrmovq,
            0x6 => Self::Opq,
            0x7 => Self::Jxx,
            0x8 => Self::Call,
            0x9 => Self::Ret,
            0xA => Self::Pushq,
            0xB => Self::Popq,
            _ => return None,
        })
    }

    /// Returns the encoding table entry for this class.
    pub const fn format(self) -> InstrFormat {
        match self {
            Self::Halt | Self::Nop | Self::Ret => InstrFormat::new(false, false),
            Self::Rrmovq | Self::Opq | Self::Pushq | Self::Popq => InstrFormat::new(true, false),
            Self::Jxx | Self::Call => InstrFormat::new(false, true),
            Self::Irmovq | Self::Rmmovq | Self::Mrmovq => InstrFormat::new(true, true),
        }
    }

    /// Total encoded length of an instruction of this class.
    pub const fn length(self) -> i64 {
        self.format().length()
    }
}

/// ALU function of an `OPq` instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AluFn {
    /// `addq`: `B + A`
    Add = 0x0,
    /// `subq`: `B - A`
    Sub = 0x1,
    /// `andq`: `B & A`
    And = 0x2,
    /// `xorq`: `B ^ A`
    Xor = 0x3,
}

impl AluFn {
    /// Decodes an ALU function nibble; unknown functions return `None`.
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        Some(match nibble {
            0x0 => Self::Add,
            0x1 => Self::Sub,
            0x2 => Self::And,
            0x3 => Self::Xor,
            _ => return None,
        })
    }

    /// Assembler mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "addq",
            Self::Sub => "subq",
            Self::And => "andq",
            Self::Xor => "xorq",
        }
    }
}

/// Branch / conditional-move condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Unconditional (0).
    Always,
    /// Less or equal (1).
    Le,
    /// Less (2).
    L,
    /// Equal (3).
    E,
    /// Not equal (4).
    Ne,
    /// Greater or equal (5).
    Ge,
    /// Greater (6).
    G,
    /// Function code outside `0..=6`; evaluates to false.
    Unrecognized(u8),
}

impl Condition {
    /// Decodes a condition nibble. Every nibble decodes; out-of-range codes become
    /// [`Condition::Unrecognized`].
    pub const fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0 => Self::Always,
            1 => Self::Le,
            2 => Self::L,
            3 => Self::E,
            4 => Self::Ne,
            5 => Self::Ge,
            6 => Self::G,
            n => Self::Unrecognized(n),
        }
    }

    /// Function nibble this condition encodes to.
    pub const fn code(self) -> u8 {
        match self {
            Self::Always => 0,
            Self::Le => 1,
            Self::L => 2,
            Self::E => 3,
            Self::Ne => 4,
            Self::Ge => 5,
            Self::G => 6,
            Self::Unrecognized(n) => n,
        }
    }

    /// Mnemonic suffix (`""`, `"le"`, `"l"`, ...).
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Always => "",
            Self::Le => "le",
            Self::L => "l",
            Self::E => "e",
            Self::Ne => "ne",
            Self::Ge => "ge",
            Self::G => "g",
            Self::Unrecognized(_) => "?",
        }
    }
}

/// An opcode with its function field resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Stop the machine.
    Halt,
    /// No operation.
    Nop,
    /// Register move; `Condition::Always` is plain `rrmovq`.
    Cmov(Condition),
    /// Load immediate into register.
    Irmovq,
    /// Store register to memory.
    Rmmovq,
    /// Load register from memory.
    Mrmovq,
    /// Arithmetic/logical operation.
    Alu(AluFn),
    /// Jump; `Condition::Always` is plain `jmp`.
    Jump(Condition),
    /// Push return address and jump.
    Call,
    /// Pop return address and jump to it.
    Ret,
    /// Push register.
    Pushq,
    /// Pop register.
    Popq,
}

impl Opcode {
    /// Every encodable opcode, in encoding order.
    pub const ALL: [Self; 27] = [
        Self::Halt,
        Self::Nop,
        Self::Cmov(Condition::Always),
        Self::Cmov(Condition::Le),
        Self::Cmov(Condition::L),
        Self::Cmov(Condition::E),
        Self::Cmov(Condition::Ne),
        Self::Cmov(Condition::Ge),
        Self::Cmov(Condition::G),
        Self::Irmovq,
        Self::Rmmovq,
        Self::Mrmovq,
        Self::Alu(AluFn::Add),
        Self::Alu(AluFn::Sub),
        Self::Alu(AluFn::And),
        Self::Alu(AluFn::Xor),
        Self::Jump(Condition::Always),
        Self::Jump(Condition::Le),
        Self::Jump(Condition::L),
        Self::Jump(Condition::E),
        Self::Jump(Condition::Ne),
        Self::Jump(Condition::Ge),
        Self::Jump(Condition::G),
        Self::Call,
        Self::Ret,
        Self::Pushq,
        Self::Popq,
    ];

    /// Looks up an opcode by assembler mnemonic, ignoring letter case.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.to_string().eq_ignore_ascii_case(name))
    }

    /// Encodes the opcode byte: class in the high nibble, function in the low one.
    pub const fn encode(self) -> u8 {
        let func = match self {
            Self::Cmov(cond) | Self::Jump(cond) => cond.code(),
            Self::Alu(op) => op as u8,
            _ => 0,
        };
        ((self.class() as u8) << NIBBLE_SHIFT) | func
    }

    /// Decodes an opcode byte.
    ///
    /// # Returns
    ///
    /// `None` when the class nibble is out of range or an `OPq` function is unknown.
    pub const fn decode(byte: u8) -> Option<Self> {
        let func = byte & 0x0F;
        let Some(class) = OpClass::from_nibble(byte >> 4) else {
            return None;
        };
        Some(match class {
            OpClass::Halt => Self::Halt,
            OpClass::Nop => Self::Nop,
            OpClass::Rrmovq => Self::Cmov(Condition::from_nibble(func)),
            OpClass::Irmovq => Self::Irmovq,
            OpClass::Rmmovq => Self::Rmmovq,
            OpClass::Mrmovq => Self::Mrmovq,
            OpClass::Opq => match AluFn::from_nibble(func) {
                Some(f) => Self::Alu(f),
                None => return None,
            },
            OpClass::Jxx => Self::Jump(Condition::from_nibble(func)),
            OpClass::Call => Self::Call,
            OpClass::Ret => Self::Ret,
            OpClass::Pushq => Self::Pushq,
            OpClass::Popq => Self::Popq,
        })
    }

    /// Returns the opcode's class.
    pub const fn class(self) -> OpClass {
        match self {
            Self::Halt => OpClass::Halt,
            Self::Nop => OpClass::Nop,
            Self::Cmov(_) => OpClass::Rrmovq,
            Self::Irmovq => OpClass::Irmovq,
            Self::Rmmovq => OpClass::Rmmovq,
            Self::Mrmovq => OpClass::Mrmovq,
            Self::Alu(_) => OpClass::Opq,
            Self::Jump(_) => OpClass::Jxx,
            Self::Call => OpClass::Call,
            Self::Ret => OpClass::Ret,
            Self::Pushq => OpClass::Pushq,
            Self::Popq => OpClass::Popq,
        }
    }

    /// Returns the encoding table entry for this opcode's class.
    pub const fn format(self) -> InstrFormat {
        self.class().format()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halt => f.write_str("halt"),
            Self::Nop => f.write_str("nop"),
            Self::Cmov(Condition::Always) => f.write_str("rrmovq"),
            Self::Cmov(c) => write!(f, "cmov{}", c.suffix()),
            Self::Irmovq => f.write_str("irmovq"),
            Self::Rmmovq => f.write_str("rmmovq"),
            Self::Mrmovq => f.write_str("mrmovq"),
            Self::Alu(op) => f.write_str(op.mnemonic()),
            Self::Jump(Condition::Always) => f.write_str("jmp"),
            Self::Jump(c) => write!(f, "j{}", c.suffix()),
            Self::Call => f.write_str("call"),
            Self::Ret => f.write_str("ret"),
            Self::Pushq => f.write_str("pushq"),
            Self::Popq => f.write_str("popq"),
        }
    }
}
