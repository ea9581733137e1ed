//! Streaming renderer for the embedded archive array literal.
//!
//! Produces exactly:
//!
//! ```text
//! static const unsigned char ARCHIVE_DATA[] = {
//!         0x50, 0x4B, 0x03, 0x04, ...
//! };
//! ```
//!
//! Each content line is a 7-space indent followed by up to sixteen ` 0xHH,`
//! tokens (uppercase hex). An empty payload renders the braces with nothing
//! between them. Only one line of bytes is ever held in memory.

use std::io::{self, Read, Write};

/// Bytes per rendered line.
pub const BYTES_PER_LINE: usize = 16;

const INDENT: &str = "       ";
const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Opening line of the rendered literal.
pub const ARRAY_HEADER: &str = "static const unsigned char ARCHIVE_DATA[] = {\n";
/// Closing line of the rendered literal.
pub const ARRAY_FOOTER: &str = "};\n";

/// Render `payload` as an array literal into `out`.
///
/// Returns the number of payload bytes rendered.
pub fn render<R: Read, W: Write>(payload: &mut R, out: &mut W) -> io::Result<u64> {
    out.write_all(ARRAY_HEADER.as_bytes())?;

    let mut buf = [0u8; BYTES_PER_LINE];
    let mut total = 0u64;
    loop {
        let n = fill_line(payload, &mut buf)?;
        if n == 0 {
            break;
        }
        write_line(out, &buf[..n])?;
        total += n as u64;
        if n < BYTES_PER_LINE {
            break;
        }
    }

    out.write_all(ARRAY_FOOTER.as_bytes())?;
    Ok(total)
}

/// Render an in-memory payload to a string.
pub fn render_to_string(payload: &[u8]) -> io::Result<String> {
    let mut out = Vec::with_capacity(ARRAY_HEADER.len() + payload.len() * 6 + 64);
    let mut reader = payload;
    render(&mut reader, &mut out)?;
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Read until `buf` is full or the reader is exhausted.
fn fill_line<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn write_line<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    let mut line = Vec::with_capacity(INDENT.len() + bytes.len() * 6 + 1);
    line.extend_from_slice(INDENT.as_bytes());
    for &b in bytes {
        line.extend_from_slice(b" 0x");
        line.push(HEX_CHARS[(b >> 4) as usize]);
        line.push(HEX_CHARS[(b & 0xF) as usize]);
        line.push(b',');
    }
    line.push(b'\n');
    out.write_all(&line)
}
