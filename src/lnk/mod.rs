/// Shell Link (.lnk) format support
///
/// Header flags, string decoding and the decoder that turns a shortcut
/// file into the path it points at.

pub mod decoder;
pub mod flags;
pub mod strings;

#[cfg(test)]
pub(crate) mod fixture;

pub use decoder::{DecodedLink, LinkDecoder};
pub use flags::{FileAttributes, LinkFlags, ShellLinkHeader};
pub use strings::LegacyEncoding;
