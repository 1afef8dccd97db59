//! Y86-64 Assembler.
//!
//! This module turns `.ys` assembly source into a flat byte image starting at address 0.
//! It performs:
//! 1. **Line parsing:** Comments (`#`, `//`) are stripped, leading `name:` labels are bound
//!    to the current address, and the remainder is a directive or an instruction.
//! 2. **Encoding:** Every mnemonic known to [`Opcode`] is encoded with its register byte
//!    and 8-byte little-endian immediate as its class requires.
//! 3. **Directives:** `.pos ADDR` moves the location counter, `.align N` pads with zeros,
//!    `.quad V` emits a word.
//! 4. **Fixups:** Label references (`jXX`, `call`, `irmovq`, `.quad`) are patched once the
//!    whole source has been read, so forward references work.
//!
//! ```text
//!     .pos 0
//!     irmovq stack, %rsp
//!     call main
//!     halt
//! main:
//!     irmovq $0x10, %rax      # comment
//!     mrmovq 8(%rsp), %rbx
//!     ret
//!     .pos 0x200
//! stack:
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::common::RegId;
use crate::common::constants::{NIBBLE_SHIFT, REG_NONE, WORD_SIZE};
use crate::isa::{OpClass, Opcode};

/// Largest image the assembler will build; guards against runaway `.pos` values.
const MAX_IMAGE_SIZE: u64 = 1 << 24;

/// Errors raised while assembling.
///
/// Every syntax error carries the 1-based source line it was found on.
#[derive(Debug, thiserror::Error)]
pub enum AsmError {
    /// The source file could not be read.
    #[error("failed to read assembly source: {0}")]
    Io(#[from] io::Error),

    /// The mnemonic or directive is not part of the instruction set.
    #[error("line {line}: unknown instruction '{mnemonic}'")]
    UnknownInstruction {
        /// 1-based line number.
        line: usize,
        /// Offending mnemonic.
        mnemonic: String,
    },

    /// An operand that should name a register does not.
    #[error("line {line}: invalid register '{text}'")]
    InvalidRegister {
        /// 1-based line number.
        line: usize,
        /// Offending operand.
        text: String,
    },

    /// A numeric operand could not be parsed.
    #[error("line {line}: invalid value '{text}'")]
    InvalidValue {
        /// 1-based line number.
        line: usize,
        /// Offending operand.
        text: String,
    },

    /// A memory operand is not of the form `D(%reg)` or `(%reg)`.
    #[error("line {line}: invalid memory operand '{text}'")]
    InvalidMemoryOperand {
        /// 1-based line number.
        line: usize,
        /// Offending operand.
        text: String,
    },

    /// The instruction received the wrong number of operands.
    #[error("line {line}: {mnemonic} expects {expected} operand(s), found {found}")]
    OperandCount {
        /// 1-based line number.
        line: usize,
        /// Instruction mnemonic.
        mnemonic: String,
        /// Operands the instruction takes.
        expected: usize,
        /// Operands supplied.
        found: usize,
    },

    /// A label name is empty or contains characters other than `[A-Za-z0-9_.]`.
    #[error("line {line}: invalid label '{label}'")]
    InvalidLabel {
        /// 1-based line number.
        line: usize,
        /// Offending label text.
        label: String,
    },

    /// A label is defined twice.
    #[error("line {line}: label '{label}' already defined")]
    DuplicateLabel {
        /// 1-based line number of the second definition.
        line: usize,
        /// Label name.
        label: String,
    },

    /// A referenced label is never defined.
    #[error("line {line}: undefined label '{label}'")]
    UndefinedLabel {
        /// 1-based line number of the reference.
        line: usize,
        /// Label name.
        label: String,
    },

    /// `.align` was given zero or a value that is not a power of two.
    #[error("line {line}: invalid alignment {value}")]
    InvalidAlignment {
        /// 1-based line number.
        line: usize,
        /// Requested alignment.
        value: i64,
    },

    /// The location counter left `[0, MAX_IMAGE_SIZE]`.
    #[error("line {line}: address {addr:#x} is outside the assembler's range")]
    AddressOutOfRange {
        /// 1-based line number.
        line: usize,
        /// Offending address.
        addr: i64,
    },
}

/// Output of a successful assembly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    /// Image bytes; `bytes[i]` belongs at address `i`.
    pub bytes: Vec<u8>,
    /// Symbol table: every label and the address it was bound to.
    pub labels: BTreeMap<String, u64>,
}

impl Assembly {
    /// Renders the image as object text, ten bytes per record.
    ///
    /// The result loads back through [`crate::sim::loader::load_object_str`].
    pub fn to_object_text(&self) -> String {
        self.bytes
            .chunks(10)
            .enumerate()
            .map(|(i, chunk)| {
                let hex: String = chunk.iter().map(|b| format!("{b:02x}")).collect();
                format!("0x{:03x}: {hex:<20} |\n", i * 10)
            })
            .collect()
    }
}

/// A word operand: either a literal or a label resolved after the last line.
enum Value {
    Literal(i64),
    Label(String),
}

/// Label reference waiting for the symbol table to be complete.
struct Fixup {
    offset: usize,
    label: String,
    line: usize,
}

/// Single-pass encoder with deferred label fixups.
#[derive(Default)]
struct Assembler {
    output: Vec<u8>,
    address: u64,
    labels: BTreeMap<String, u64>,
    fixups: Vec<Fixup>,
}

/// Assembles Y86-64 source text.
///
/// # Arguments
///
/// * `source` - The complete `.ys` source.
///
/// # Returns
///
/// The image and its symbol table.
///
/// # Errors
///
/// Returns the first [`AsmError`] found, tagged with its source line.
///
/// # Examples
///
/// ```
/// use y86sim_core::sim::assembler::assemble;
///
/// let asm = assemble("irmovq $5, %rax\nhalt\n")?;
/// assert_eq!(asm.bytes, [0x30, 0xF0, 5, 0, 0, 0, 0, 0, 0, 0, 0x00]);
/// # Ok::<(), y86sim_core::sim::assembler::AsmError>(())
/// ```
pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
    let mut asm = Assembler::default();
    for (idx, line) in source.lines().enumerate() {
        asm.line(line, idx + 1)?;
    }
    asm.finish()
}

/// Reads and assembles a `.ys` file.
///
/// # Errors
///
/// [`AsmError::Io`] when the file cannot be read, otherwise as [`assemble`].
pub fn assemble_file(path: impl AsRef<Path>) -> Result<Assembly, AsmError> {
    let source = fs::read_to_string(path)?;
    assemble(&source)
}

impl Assembler {
    fn line(&mut self, raw: &str, line: usize) -> Result<(), AsmError> {
        let code = strip_comment(raw);
        let mut rest = code.trim();

        while let Some((head, tail)) = rest.split_once(':') {
            let label = head.trim();
            if !is_label(label) {
                return Err(AsmError::InvalidLabel {
                    line,
                    label: label.to_string(),
                });
            }
            if self.labels.insert(label.to_string(), self.address).is_some() {
                return Err(AsmError::DuplicateLabel {
                    line,
                    label: label.to_string(),
                });
            }
            rest = tail.trim();
        }
        if rest.is_empty() {
            return Ok(());
        }

        let (mnemonic, operands) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(m, ops)| (m, ops.trim()));
        let operands: Vec<&str> = if operands.is_empty() {
            Vec::new()
        } else {
            operands.split(',').map(str::trim).collect()
        };

        if mnemonic.starts_with('.') {
            return self.directive(mnemonic, &operands, line);
        }
        let opcode =
            Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownInstruction {
                line,
                mnemonic: mnemonic.to_string(),
            })?;
        self.instruction(opcode, &operands, line)
    }

    fn directive(&mut self, name: &str, operands: &[&str], line: usize) -> Result<(), AsmError> {
        match name.to_ascii_lowercase().as_str() {
            ".pos" => {
                let [addr] = expect_operands::<1>(name, operands, line)?;
                let addr = parse_number(addr, line)?;
                self.address = checked_address(addr, line)?;
            }
            ".align" => {
                let [align] = expect_operands::<1>(name, operands, line)?;
                let value = parse_number(align, line)?;
                let align = u64::try_from(value)
                    .ok()
                    .filter(|a| a.is_power_of_two())
                    .ok_or(AsmError::InvalidAlignment { line, value })?;
                let aligned = self.address.next_multiple_of(align);
                let _ = checked_address(aligned as i64, line)?;
                let pad = vec![0; (aligned - self.address) as usize];
                self.emit(&pad, line)?;
            }
            ".quad" => {
                let [value] = expect_operands::<1>(name, operands, line)?;
                let value = parse_value(value, line)?;
                self.emit_word(value, line)?;
            }
            _ => {
                return Err(AsmError::UnknownInstruction {
                    line,
                    mnemonic: name.to_string(),
                });
            }
        }
        Ok(())
    }

    fn instruction(
        &mut self,
        opcode: Opcode,
        operands: &[&str],
        line: usize,
    ) -> Result<(), AsmError> {
        let name = opcode.to_string();
        let (ra, rb, imm) = match opcode.class() {
            OpClass::Halt | OpClass::Nop | OpClass::Ret => {
                let [] = expect_operands::<0>(&name, operands, line)?;
                (None, None, None)
            }
            OpClass::Rrmovq | OpClass::Opq => {
                let [a, b] = expect_operands::<2>(&name, operands, line)?;
                (Some(parse_register(a, line)?), Some(parse_register(b, line)?), None)
            }
            OpClass::Irmovq => {
                let [v, b] = expect_operands::<2>(&name, operands, line)?;
                (None, Some(parse_register(b, line)?), Some(parse_value(v, line)?))
            }
            OpClass::Rmmovq => {
                let [a, m] = expect_operands::<2>(&name, operands, line)?;
                let (disp, base) = parse_memory(m, line)?;
                (Some(parse_register(a, line)?), Some(base), Some(Value::Literal(disp)))
            }
            OpClass::Mrmovq => {
                let [m, a] = expect_operands::<2>(&name, operands, line)?;
                let (disp, base) = parse_memory(m, line)?;
                (Some(parse_register(a, line)?), Some(base), Some(Value::Literal(disp)))
            }
            OpClass::Jxx | OpClass::Call => {
                let [dest] = expect_operands::<1>(&name, operands, line)?;
                (None, None, Some(parse_value(dest, line)?))
            }
            OpClass::Pushq | OpClass::Popq => {
                let [a] = expect_operands::<1>(&name, operands, line)?;
                (Some(parse_register(a, line)?), None, None)
            }
        };

        self.emit(&[opcode.encode()], line)?;
        if opcode.format().needs_regs {
            let nibble = |r: Option<RegId>| r.map_or(REG_NONE, |r| r as u8);
            self.emit(&[(nibble(ra) << NIBBLE_SHIFT) | nibble(rb)], line)?;
        }
        if let Some(imm) = imm {
            self.emit_word(imm, line)?;
        }
        Ok(())
    }

    /// Writes `bytes` at the location counter, growing the image as needed.
    fn emit(&mut self, bytes: &[u8], line: usize) -> Result<(), AsmError> {
        let end = self.address + bytes.len() as u64;
        let _ = checked_address(end as i64, line)?;
        let (start, end) = (self.address as usize, end as usize);
        if self.output.len() < end {
            self.output.resize(end, 0);
        }
        self.output[start..end].copy_from_slice(bytes);
        self.address = end as u64;
        Ok(())
    }

    fn emit_word(&mut self, value: Value, line: usize) -> Result<(), AsmError> {
        let word = match value {
            Value::Literal(v) => v,
            Value::Label(label) => {
                self.fixups.push(Fixup {
                    offset: self.address as usize,
                    label,
                    line,
                });
                0
            }
        };
        self.emit(&word.to_le_bytes(), line)
    }

    fn finish(mut self) -> Result<Assembly, AsmError> {
        for fixup in &self.fixups {
            let addr = self
                .labels
                .get(&fixup.label)
                .ok_or_else(|| AsmError::UndefinedLabel {
                    line: fixup.line,
                    label: fixup.label.clone(),
                })?;
            let slot = fixup.offset..fixup.offset + WORD_SIZE;
            self.output[slot].copy_from_slice(&(*addr as i64).to_le_bytes());
        }
        tracing::debug!(
            bytes = self.output.len(),
            labels = self.labels.len(),
            "program assembled"
        );
        Ok(Assembly {
            bytes: self.output,
            labels: self.labels,
        })
    }
}

/// Drops everything from the first `#` or `//`.
fn strip_comment(line: &str) -> &str {
    let end = [line.find('#'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

fn is_label(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Destructures `operands` into exactly `N` items.
fn expect_operands<'a, const N: usize>(
    mnemonic: &str,
    operands: &[&'a str],
    line: usize,
) -> Result<[&'a str; N], AsmError> {
    <[&'a str; N]>::try_from(operands).map_err(|_| AsmError::OperandCount {
        line,
        mnemonic: mnemonic.to_string(),
        expected: N,
        found: operands.len(),
    })
}

fn checked_address(addr: i64, line: usize) -> Result<u64, AsmError> {
    u64::try_from(addr)
        .ok()
        .filter(|a| *a <= MAX_IMAGE_SIZE)
        .ok_or(AsmError::AddressOutOfRange { line, addr })
}

/// Parses `%name`; the sigil is required.
fn parse_register(text: &str, line: usize) -> Result<RegId, AsmError> {
    text.strip_prefix('%')
        .and_then(RegId::from_name)
        .ok_or_else(|| AsmError::InvalidRegister {
            line,
            text: text.to_string(),
        })
}

/// Parses a decimal or `0x` hex integer with an optional `$` and sign.
///
/// Hex literals may use all 64 bits (`0xffffffffffffffff` is `-1`).
fn parse_number(text: &str, line: usize) -> Result<i64, AsmError> {
    let invalid = || AsmError::InvalidValue {
        line,
        text: text.to_string(),
    };
    let body = text.strip_prefix('$').unwrap_or(text);
    let (negative, digits) = body
        .strip_prefix('-')
        .map_or((false, body), |rest| (true, rest));
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u64::from_str_radix(hex, 16).map_err(|_| invalid())?
        }
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse::<u64>().map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };
    let value = magnitude as i64;
    Ok(if negative { value.wrapping_neg() } else { value })
}

/// Parses a word operand: a number, or a label (with or without `$`).
fn parse_value(text: &str, line: usize) -> Result<Value, AsmError> {
    let body = text.strip_prefix('$').unwrap_or(text);
    if is_label(body) {
        Ok(Value::Label(body.to_string()))
    } else {
        parse_number(text, line).map(Value::Literal)
    }
}

/// Parses `D(%reg)` or `(%reg)`, where `D` is a number.
fn parse_memory(text: &str, line: usize) -> Result<(i64, RegId), AsmError> {
    let invalid = || AsmError::InvalidMemoryOperand {
        line,
        text: text.to_string(),
    };
    let (disp, reg) = text
        .strip_suffix(')')
        .and_then(|t| t.split_once('('))
        .ok_or_else(invalid)?;
    let disp = match disp.trim() {
        "" => 0,
        d => parse_number(d, line).map_err(|_| invalid())?,
    };
    Ok((disp, parse_register(reg.trim(), line)?))
}
