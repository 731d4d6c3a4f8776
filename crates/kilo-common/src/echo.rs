use std::io::{ErrorKind, Read, Write};

/// Reading this byte ends the echo loop.
pub const SENTINEL: u8 = b'q';

/// Why [`EchoExt::echo_until_sentinel`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Sentinel,
    EndOfInput,
}

/// Same classification as `iscntrl` in the C locale: 0..=31 and DEL.
pub fn is_control(byte: u8) -> bool {
    byte.is_ascii_control()
}

/// Writes one report line for `byte`: `65 ('A')`, or just `3` for control bytes.
///
/// Ordinals are unsigned, so bytes above 127 print as 128..=255 (`0xc3` is `195`), not as the
/// negative values a signed C `char` would give.
pub fn describe_byte(out: &mut (impl Write + ?Sized), byte: u8) -> std::io::Result<()> {
    if is_control(byte) {
        writeln!(out, "{byte}")
    } else {
        // the character form is the byte itself, so non-ascii input passes through untouched
        write!(out, "{byte} ('")?;
        out.write_all(&[byte])?;
        out.write_all(b"')\n")
    }
}

pub trait EchoExt: Read {
    /// Reads one byte at a time, reporting each on `out`, until [`SENTINEL`] or end of input.
    ///
    /// The sentinel itself is not reported and nothing after it is read.
    fn echo_until_sentinel(&mut self, out: &mut (impl Write + ?Sized)) -> std::io::Result<Stop> {
        let mut buf = [0; 1];
        let stop = loop {
            match self.read(&mut buf) {
                Ok(0) => break Stop::EndOfInput,
                Ok(_) if buf[0] == SENTINEL => break Stop::Sentinel,
                Ok(_) => describe_byte(out, buf[0])?,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        };
        out.flush()?;
        Ok(stop)
    }
}

impl<R: Read + ?Sized> EchoExt for R {}
