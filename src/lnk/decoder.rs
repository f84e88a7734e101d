/// Shell Link (.lnk) decoder
///
/// Reads just enough of a shortcut to recover where it points: the header
/// flag words, the LinkInfo paths and the arguments string. Icon data, the
/// extra data blocks and the ID list payload are skipped.

use crate::error::{LaunchError, Result};
use crate::lnk::flags::ShellLinkHeader;
use crate::lnk::strings::{
    decode_legacy_counted, decode_legacy_cstr, decode_utf16_counted, LegacyEncoding,
};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// LinkFlags lives at byte 20, FileAttributesFlags right after it
const LINK_FLAGS_OFFSET: u64 = 20;

/// Size of the fixed ShellLinkHeader
const HEADER_SIZE: u64 = 0x4C;

/// LinkInfoHeaderSize is never smaller than this (fields up to +24 are mandatory)
const MIN_LINK_INFO_SIZE: usize = 0x1C;

const LINK_INFO_LOCAL_PATH: u32 = 1 << 0;
const LINK_INFO_NETWORK_LINK: u32 = 1 << 1;

/// Position of the arguments field in the StringData order
const ARGUMENTS_FIELD: usize = 3;

/// What a shortcut points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLink {
    pub local_path: Option<String>,
    pub network_path: Option<String>,
    pub is_directory: bool,
    pub arguments: String,
}

impl DecodedLink {
    /// Canonical target: the local path when there is one, otherwise the UNC path
    pub fn target(&self) -> &str {
        self.local_path
            .as_deref()
            .or(self.network_path.as_deref())
            .unwrap_or_default()
    }
}

/// Decoder for shortcut files
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkDecoder {
    encoding: LegacyEncoding,
}

impl LinkDecoder {
    /// Create a decoder that reads LinkInfo strings with the given code page
    pub fn new(encoding: LegacyEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> LegacyEncoding {
        self.encoding
    }

    /// Open and decode a shortcut file
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<DecodedLink> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        self.decode(&mut reader)
    }

    /// Read the two header flag words
    pub fn read_header<R: Read + Seek>(&self, reader: &mut R) -> Result<ShellLinkHeader> {
        reader.seek(SeekFrom::Start(LINK_FLAGS_OFFSET))?;
        let link_flags = read_u32(reader)?;
        let attributes = read_u32(reader)?;
        Ok(ShellLinkHeader::new(link_flags, attributes))
    }

    /// Decode a shortcut from a reader positioned anywhere; all reads are absolute
    ///
    /// # Returns
    /// * `Ok(DecodedLink)` - local and/or network target, directory bit, arguments
    /// * `Err(LaunchError::Format)` - no LinkInfo, or LinkInfo yields no path
    /// * `Err(LaunchError::Encoding)` - a path or string field is not valid text
    /// * `Err(LaunchError::Io)` - the file ends before a structure does
    pub fn decode<R: Read + Seek>(&self, reader: &mut R) -> Result<DecodedLink> {
        let header = self.read_header(reader)?;
        let flags = header.link_flags;

        if !flags.has_link_info {
            return Err(LaunchError::format("missing link info"));
        }

        // The ID list's size field only exists when the list does
        let mut link_info_start = HEADER_SIZE;
        if flags.has_link_target_id_list {
            reader.seek(SeekFrom::Start(HEADER_SIZE))?;
            let id_list_size = read_u16(reader)?;
            link_info_start += 2 + u64::from(id_list_size);
        }

        let block = read_link_info(reader, link_info_start)?;
        let paths = self.parse_link_info(&block)?;

        let string_data_start = link_info_start + block.len() as u64;
        let arguments = self.read_arguments(
            reader,
            string_data_start,
            flags.string_data_fields(),
            flags.is_unicode,
        )?;

        Ok(DecodedLink {
            local_path: paths.local,
            network_path: paths.network,
            is_directory: header.attributes.directory,
            arguments,
        })
    }

    fn parse_link_info(&self, block: &[u8]) -> Result<TargetPaths> {
        let link_info_flags = u32_at(block, 8)?;

        let mut local = None;
        if link_info_flags & LINK_INFO_LOCAL_PATH != 0 {
            let offset = u32_at(block, 16)? as usize;
            local = Some(self.cstr_at(block, offset)?);
        }

        let mut net_name = None;
        if link_info_flags & LINK_INFO_NETWORK_LINK != 0 {
            let link = u32_at(block, 20)? as usize;
            // CommonNetworkRelativeLinkFlags; must be present, not otherwise used
            u32_at(block, link.saturating_add(4))?;
            let net_name_offset = u32_at(block, link.saturating_add(8))? as usize;
            net_name = Some(self.cstr_at(block, link.saturating_add(net_name_offset))?);
        }

        let suffix_offset = u32_at(block, 24)? as usize;
        let suffix = if suffix_offset != 0 {
            self.cstr_at(block, suffix_offset)?
        } else {
            String::new()
        };

        let local = local.filter(|path| !path.is_empty());
        let network = net_name
            .filter(|name| !name.is_empty())
            .map(|name| compose_network_path(&name, &suffix));

        if local.is_none() && network.is_none() {
            return Err(LaunchError::format("no target path"));
        }

        Ok(TargetPaths { local, network })
    }

    fn cstr_at(&self, block: &[u8], offset: usize) -> Result<String> {
        let bytes = block.get(offset..).filter(|rest| !rest.is_empty()).ok_or_else(|| {
            LaunchError::format(format!("string offset {:#x} outside LinkInfo", offset))
        })?;
        let (text, _) = decode_legacy_cstr(bytes, self.encoding)?;
        Ok(text)
    }

    /// Walk StringData in its fixed order, keeping only the arguments
    fn read_arguments<R: Read + Seek>(
        &self,
        reader: &mut R,
        start: u64,
        present: [bool; 5],
        unicode: bool,
    ) -> Result<String> {
        let mut offset = start;
        let mut arguments = String::new();

        for (field, _) in present.iter().enumerate().filter(|(_, set)| **set) {
            reader.seek(SeekFrom::Start(offset))?;
            let count = read_u16(reader)? as usize;
            let payload_len = if unicode { count * 2 } else { count };

            let mut buf = vec![0u8; 2 + payload_len];
            buf[..2].copy_from_slice(&(count as u16).to_le_bytes());
            reader.read_exact(&mut buf[2..])?;

            let (text, consumed) = if unicode {
                decode_utf16_counted(&buf)?
            } else {
                decode_legacy_counted(&buf, self.encoding)?
            };

            if field == ARGUMENTS_FIELD {
                arguments = text;
            }
            offset += consumed as u64;
        }

        Ok(arguments)
    }
}

struct TargetPaths {
    local: Option<String>,
    network: Option<String>,
}

/// `\\` + lower-cased share name, joined to the suffix with a single backslash
fn compose_network_path(net_name: &str, suffix: &str) -> String {
    let share = net_name.to_lowercase();
    let share = share.trim_start_matches('\\').trim_end_matches('\\');

    let mut path = format!("\\\\{}", share);
    let suffix = suffix.trim_start_matches('\\');
    if !suffix.is_empty() {
        path.push('\\');
        path.push_str(suffix);
    }
    path
}

fn read_link_info<R: Read + Seek>(reader: &mut R, start: u64) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(start))?;
    let size = read_u32(reader)? as usize;
    if size < MIN_LINK_INFO_SIZE {
        return Err(LaunchError::format(format!(
            "LinkInfo size {} is smaller than its header",
            size
        )));
    }

    reader.seek(SeekFrom::Start(start))?;
    let mut block = Vec::new();
    reader.by_ref().take(size as u64).read_to_end(&mut block)?;
    if block.len() < size {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "file ends inside LinkInfo",
        )
        .into());
    }
    Ok(block)
}

fn u32_at(block: &[u8], offset: usize) -> Result<u32> {
    block
        .get(offset..offset.saturating_add(4))
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| LaunchError::format(format!("field at {:#x} outside LinkInfo", offset)))
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
