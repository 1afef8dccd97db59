//! Object File Loader.
//!
//! This module reads Y86 object text into a memory image. It performs:
//! 1. **Record recognition:** A line is a record when it contains a `0x` address marker and a
//!    `:` separator, both before any `|` comment marker. Other lines are ignored.
//! 2. **Parsing:** The hex address precedes the `:`; the data is the hex text between `:` and the
//!    first `|` (or end of line), whitespace removed, read as byte pairs. A trailing odd nibble
//!    is ignored.
//! 3. **Placement:** Bytes land at consecutive addresses; bytes past the end of the image are
//!    dropped with a warning.
//!
//! ```text
//! 0x000: 30f40001000000000000 |   irmovq stack, %rsp
//! 0x00a:                      | .align 8
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::memory::MemoryImage;

/// Errors raised while reading object text.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source could not be read.
    #[error("failed to read object file: {0}")]
    Io(#[from] io::Error),

    /// The address between `0x` and `:` is not valid hex.
    #[error("line {line}: invalid address '{text}'")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// Offending address text.
        text: String,
    },

    /// A data byte is not a valid hex pair.
    #[error("line {line}: invalid hex byte '{text}'")]
    InvalidByte {
        /// 1-based line number.
        line: usize,
        /// Offending two-character pair.
        text: String,
    },
}

/// Counts describing what a load placed in memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Record lines recognized, including ones with no data bytes.
    pub records: usize,
    /// Bytes written into the image.
    pub bytes_loaded: usize,
    /// Bytes discarded because their address was beyond the image.
    pub bytes_dropped: usize,
}

/// A parsed record line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Address of the first data byte.
    pub addr: u64,
    /// Data bytes, in address order.
    pub bytes: Vec<u8>,
}

/// Parses one line of object text.
///
/// # Arguments
///
/// * `line`    - The line, without its terminator.
/// * `line_no` - 1-based line number used in errors.
///
/// # Returns
///
/// `Ok(None)` for lines that are not records (comments, blank lines, directives without
/// an address), otherwise the record.
pub fn parse_record(line: &str, line_no: usize) -> Result<Option<Record>, LoadError> {
    let code = line.split_once('|').map_or(line, |(code, _)| code);
    let (Some(addr_pos), Some(colon_pos)) = (code.find("0x"), code.find(':')) else {
        return Ok(None);
    };
    if addr_pos > colon_pos {
        return Ok(None);
    }

    let addr_text = code[addr_pos + 2..colon_pos].trim();
    let addr = addr_text
        .bytes()
        .all(|b| b.is_ascii_hexdigit())
        .then(|| u64::from_str_radix(addr_text, 16).ok())
        .flatten()
        .ok_or_else(|| LoadError::InvalidAddress {
            line: line_no,
            text: addr_text.to_string(),
        })?;

    let digits: Vec<u8> = code[colon_pos + 1..]
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = digits
        .chunks_exact(2)
        .map(|pair| match (hex_value(pair[0]), hex_value(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => Err(LoadError::InvalidByte {
                line: line_no,
                text: String::from_utf8_lossy(pair).into_owned(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Record { addr, bytes }))
}

/// Value of one ASCII hex digit.
fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit).to_digit(16).and_then(|v| u8::try_from(v).ok())
}

/// Loads object text from a buffered reader into `memory`.
///
/// Loading stops at the first malformed record; records before it stay loaded.
pub fn load_object<R: BufRead>(
    reader: R,
    memory: &mut MemoryImage,
) -> Result<LoadSummary, LoadError> {
    let mut summary = LoadSummary::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(record) = parse_record(&line, idx + 1)? else {
            continue;
        };
        summary.records += 1;
        let written = memory.load(record.addr, &record.bytes);
        let dropped = record.bytes.len() - written;
        summary.bytes_loaded += written;
        summary.bytes_dropped += dropped;
        if dropped > 0 {
            tracing::warn!(
                line = idx + 1,
                addr = format_args!("{:#x}", record.addr),
                dropped,
                "bytes beyond end of memory dropped"
            );
        }
    }
    tracing::debug!(
        records = summary.records,
        bytes = summary.bytes_loaded,
        "object loaded"
    );
    Ok(summary)
}

/// Loads object text held in a string.
pub fn load_object_str(text: &str, memory: &mut MemoryImage) -> Result<LoadSummary, LoadError> {
    load_object(text.as_bytes(), memory)
}

/// Loads an object file from disk.
pub fn load_object_file(
    path: impl AsRef<Path>,
    memory: &mut MemoryImage,
) -> Result<LoadSummary, LoadError> {
    let file = File::open(path)?;
    load_object(BufReader::new(file), memory)
}
