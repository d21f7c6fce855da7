//! Byte-level input and output devices for the `,` and `.` commands.

use std::io::{self, BufRead, Write};

/// Read one line from `input` and return its first byte.
///
/// End of input reads as 0. An empty line yields the newline byte itself.
pub fn read_byte<R: BufRead + ?Sized>(input: &mut R) -> io::Result<u8> {
    let mut line = Vec::new();
    input.read_until(b'\n', &mut line)?;
    Ok(line.first().copied().unwrap_or(0))
}

/// Write one byte and flush so output appears as it is produced.
pub fn write_byte<W: Write + ?Sized>(output: &mut W, byte: u8) -> io::Result<()> {
    output.write_all(&[byte])?;
    output.flush()
}
