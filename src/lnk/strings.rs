/// String decoding for the two text encodings found inside shortcuts
///
/// Every decoder returns the text together with the number of bytes it
/// consumed, so callers can keep their own offsets straight.

use crate::error::{LaunchError, Result};
use encoding_rs::Encoding;
use std::io;

/// Code page used for the "ANSI" strings inside LinkInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyEncoding(&'static Encoding);

impl LegacyEncoding {
    /// Look up an encoding by its WHATWG label ("shift_jis", "windows-1252", ...)
    ///
    /// Only ASCII-compatible encodings qualify; in the others a zero byte
    /// can sit inside a character and would end the string early.
    pub fn from_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| LaunchError::Config(format!("unknown legacy encoding '{}'", label)))?;
        if !encoding.is_ascii_compatible() {
            return Err(LaunchError::Config(format!(
                "legacy encoding '{}' is not ASCII-compatible",
                encoding.name()
            )));
        }
        Ok(Self(encoding))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.0
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| {
                LaunchError::encoding(format!("invalid {} byte sequence", self.0.name()))
            })
    }
}

impl Default for LegacyEncoding {
    fn default() -> Self {
        Self(encoding_rs::SHIFT_JIS)
    }
}

/// Decode a null-terminated legacy string from the start of `bytes`.
///
/// Trail bytes of the Windows double-byte code pages are never zero, so the
/// first zero byte ends the string. A dangling lead byte right before it
/// fails the strict decode.
pub fn decode_legacy_cstr(bytes: &[u8], encoding: LegacyEncoding) -> Result<(String, usize)> {
    let end = bytes
        .iter()
        .position(|b| *b == 0)
        .ok_or_else(|| LaunchError::encoding("string has no terminator"))?;

    let text = encoding.decode(&bytes[..end])?;
    Ok((text, end + 1))
}

/// Decode a counted UTF-16LE string: u16 character count, then `count * 2` bytes.
pub fn decode_utf16_counted(bytes: &[u8]) -> Result<(String, usize)> {
    let count = read_count(bytes)?;
    let consumed = 2 + count * 2;
    let payload = bytes.get(2..consumed).ok_or_else(truncated)?;

    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let text = String::from_utf16(&units)
        .map_err(|_| LaunchError::encoding("malformed UTF-16 (unpaired surrogate)"))?;

    Ok((text, consumed))
}

/// Counted string in a link without the IsUnicode flag: `count` bytes of legacy text.
pub fn decode_legacy_counted(bytes: &[u8], encoding: LegacyEncoding) -> Result<(String, usize)> {
    let count = read_count(bytes)?;
    let consumed = 2 + count;
    let payload = bytes.get(2..consumed).ok_or_else(truncated)?;

    Ok((encoding.decode(payload)?, consumed))
}

fn read_count(bytes: &[u8]) -> Result<usize> {
    match bytes {
        [lo, hi, ..] => Ok(u16::from_le_bytes([*lo, *hi]) as usize),
        _ => Err(truncated()),
    }
}

fn truncated() -> LaunchError {
    LaunchError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "counted string runs past end of data",
    ))
}
