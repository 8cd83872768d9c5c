//! Line-oriented I/O for the CLI
//!
//! - Input: one statement per line
//! - Output: one result envelope per statement on stdout
//! - Bytes that are not UTF-8 are replaced with U+FFFD, so a bad line
//!   fails as a statement instead of ending the batch

use std::io::{self, BufRead, Write};

use super::errors::CliResult;
use crate::api::ResultEnvelope;

/// Statements from stdin, one per line
pub fn read_statements() -> impl Iterator<Item = io::Result<String>> {
    decode_lines(io::stdin().lock())
}

/// Splits raw input on `\n`, decoding each line lossily and dropping a
/// trailing `\r`
pub fn decode_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader.split(b'\n').map(|line| {
        line.map(|bytes| {
            let text = String::from_utf8_lossy(&bytes);
            text.strip_suffix('\r').unwrap_or(&*text).to_string()
        })
    })
}

/// Returns true for lines that carry no statement: blank lines and
/// comments starting with `--` or `#`
pub fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with("--") || line.starts_with('#')
}

/// Writes one envelope followed by a newline
pub fn write_envelope<W: Write>(out: &mut W, envelope: &ResultEnvelope, pretty: bool) -> CliResult<()> {
    writeln!(out, "{}", envelope.to_json(pretty))?;
    out.flush()?;
    Ok(())
}
