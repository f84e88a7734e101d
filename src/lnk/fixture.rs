// Test-only builder for shortcut files
//
// Lays out header, optional ID list, LinkInfo and StringData byte by byte
// so decoder and resolver tests don't need binary fixtures checked in.

use std::path::Path;

const LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

pub struct LinkBuilder {
    link_info: bool,
    directory: bool,
    unicode: bool,
    id_list: Option<Vec<u8>>,
    local_base_path: Option<Vec<u8>>,
    net_name: Option<Vec<u8>>,
    suffix: Option<Vec<u8>>,
    strings: [Option<String>; 5],
}

impl LinkBuilder {
    pub fn new() -> Self {
        Self {
            link_info: true,
            directory: false,
            unicode: true,
            id_list: None,
            local_base_path: None,
            net_name: None,
            suffix: Some(Vec::new()),
            strings: Default::default(),
        }
    }

    pub fn local(mut self, path: &str) -> Self {
        self.local_base_path = Some(path.as_bytes().to_vec());
        self
    }

    pub fn local_raw(mut self, bytes: &[u8]) -> Self {
        self.local_base_path = Some(bytes.to_vec());
        self
    }

    pub fn network(mut self, net_name: &str, suffix: &str) -> Self {
        self.net_name = Some(net_name.as_bytes().to_vec());
        self.suffix = Some(suffix.as_bytes().to_vec());
        self
    }

    pub fn without_suffix(mut self) -> Self {
        self.suffix = None;
        self
    }

    pub fn without_link_info(mut self) -> Self {
        self.link_info = false;
        self
    }

    pub fn directory(mut self) -> Self {
        self.directory = true;
        self
    }

    pub fn ansi_strings(mut self) -> Self {
        self.unicode = false;
        self
    }

    pub fn id_list(mut self, payload: Vec<u8>) -> Self {
        self.id_list = Some(payload);
        self
    }

    pub fn name(mut self, value: &str) -> Self {
        self.strings[0] = Some(value.to_string());
        self
    }

    pub fn relative_path(mut self, value: &str) -> Self {
        self.strings[1] = Some(value.to_string());
        self
    }

    pub fn working_dir(mut self, value: &str) -> Self {
        self.strings[2] = Some(value.to_string());
        self
    }

    pub fn arguments(mut self, value: &str) -> Self {
        self.strings[3] = Some(value.to_string());
        self
    }

    pub fn icon_location(mut self, value: &str) -> Self {
        self.strings[4] = Some(value.to_string());
        self
    }

    fn link_flags(&self) -> u32 {
        let mut flags = 0u32;
        if self.id_list.is_some() {
            flags |= 1 << 0;
        }
        if self.link_info {
            flags |= 1 << 1;
        }
        for (i, field) in self.strings.iter().enumerate() {
            if field.is_some() {
                flags |= 1 << (2 + i);
            }
        }
        if self.unicode {
            flags |= 1 << 7;
        }
        flags
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; 0x4C];
        out[0..4].copy_from_slice(&0x4Cu32.to_le_bytes());
        out[4..20].copy_from_slice(&LINK_CLSID);
        out[20..24].copy_from_slice(&self.link_flags().to_le_bytes());
        let attributes: u32 = if self.directory { 0x10 } else { 0x20 };
        out[24..28].copy_from_slice(&attributes.to_le_bytes());

        if let Some(payload) = &self.id_list {
            out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            out.extend_from_slice(payload);
        }

        if self.link_info {
            out.extend_from_slice(&self.build_link_info());
        }

        for field in self.strings.iter().flatten() {
            if self.unicode {
                let units: Vec<u16> = field.encode_utf16().collect();
                out.extend_from_slice(&(units.len() as u16).to_le_bytes());
                for unit in units {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            } else {
                out.extend_from_slice(&(field.len() as u16).to_le_bytes());
                out.extend_from_slice(field.as_bytes());
            }
        }

        // TerminalBlock
        out.extend_from_slice(&[0, 0, 0, 0]);
        out
    }

    fn build_link_info(&self) -> Vec<u8> {
        const HEADER_SIZE: u32 = 0x1C;
        let mut body = Vec::new();
        let mut flags = 0u32;
        let mut volume_offset = 0u32;
        let mut local_offset = 0u32;
        let mut network_offset = 0u32;
        let mut suffix_offset = 0u32;

        if let Some(local) = &self.local_base_path {
            flags |= 1;
            volume_offset = HEADER_SIZE + body.len() as u32;
            // VolumeID: size, drive type (fixed), serial, label offset, empty label
            body.extend_from_slice(&0x11u32.to_le_bytes());
            body.extend_from_slice(&3u32.to_le_bytes());
            body.extend_from_slice(&0x1234_5678u32.to_le_bytes());
            body.extend_from_slice(&0x10u32.to_le_bytes());
            body.push(0);

            local_offset = HEADER_SIZE + body.len() as u32;
            body.extend_from_slice(local);
            body.push(0);
        }

        if let Some(net_name) = &self.net_name {
            flags |= 1 << 1;
            network_offset = HEADER_SIZE + body.len() as u32;
            let size = 0x14 + net_name.len() as u32 + 1;
            body.extend_from_slice(&size.to_le_bytes());
            body.extend_from_slice(&0u32.to_le_bytes());
            body.extend_from_slice(&0x14u32.to_le_bytes());
            body.extend_from_slice(&0u32.to_le_bytes());
            body.extend_from_slice(&0x0002_0000u32.to_le_bytes());
            body.extend_from_slice(net_name);
            body.push(0);
        }

        if let Some(suffix) = &self.suffix {
            suffix_offset = HEADER_SIZE + body.len() as u32;
            body.extend_from_slice(suffix);
            body.push(0);
        }

        let total = HEADER_SIZE + body.len() as u32;
        let mut out = Vec::with_capacity(total as usize);
        for word in [
            total,
            HEADER_SIZE,
            flags,
            volume_offset,
            local_offset,
            network_offset,
            suffix_offset,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend_from_slice(&body);
        out
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }
}
