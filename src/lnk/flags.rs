/// Shell Link header bitfields
///
/// Both flag words are unpacked into named booleans as soon as they are read,
/// so nothing past the decoder ever deals with raw bit positions.

fn bit(word: u32, n: u32) -> bool {
    (word >> n) & 1 == 1
}

/// LinkFlags word (header offset 20), 27 defined bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkFlags {
    pub has_link_target_id_list: bool,
    pub has_link_info: bool,
    pub has_name: bool,
    pub has_relative_path: bool,
    pub has_working_dir: bool,
    pub has_arguments: bool,
    pub has_icon_location: bool,
    pub is_unicode: bool,
    pub force_no_link_info: bool,
    pub has_exp_string: bool,
    pub run_in_separate_process: bool,
    pub unused1: bool,
    pub has_darwin_id: bool,
    pub run_as_user: bool,
    pub has_exp_icon: bool,
    pub no_pidl_alias: bool,
    pub unused2: bool,
    pub run_with_shim_layer: bool,
    pub force_no_link_track: bool,
    pub enable_target_metadata: bool,
    pub disable_link_path_tracking: bool,
    pub disable_known_folder_tracking: bool,
    pub disable_known_folder_alias: bool,
    pub allow_link_to_link: bool,
    pub unalias_on_save: bool,
    pub prefer_environment_path: bool,
    pub keep_local_id_list_for_unc_target: bool,
}

impl LinkFlags {
    pub fn from_bits(word: u32) -> Self {
        Self {
            has_link_target_id_list: bit(word, 0),
            has_link_info: bit(word, 1),
            has_name: bit(word, 2),
            has_relative_path: bit(word, 3),
            has_working_dir: bit(word, 4),
            has_arguments: bit(word, 5),
            has_icon_location: bit(word, 6),
            is_unicode: bit(word, 7),
            force_no_link_info: bit(word, 8),
            has_exp_string: bit(word, 9),
            run_in_separate_process: bit(word, 10),
            unused1: bit(word, 11),
            has_darwin_id: bit(word, 12),
            run_as_user: bit(word, 13),
            has_exp_icon: bit(word, 14),
            no_pidl_alias: bit(word, 15),
            unused2: bit(word, 16),
            run_with_shim_layer: bit(word, 17),
            force_no_link_track: bit(word, 18),
            enable_target_metadata: bit(word, 19),
            disable_link_path_tracking: bit(word, 20),
            disable_known_folder_tracking: bit(word, 21),
            disable_known_folder_alias: bit(word, 22),
            allow_link_to_link: bit(word, 23),
            unalias_on_save: bit(word, 24),
            prefer_environment_path: bit(word, 25),
            keep_local_id_list_for_unc_target: bit(word, 26),
        }
    }

    /// StringData presence bits in on-disk order:
    /// name, relative path, working dir, arguments, icon location.
    pub fn string_data_fields(&self) -> [bool; 5] {
        [
            self.has_name,
            self.has_relative_path,
            self.has_working_dir,
            self.has_arguments,
            self.has_icon_location,
        ]
    }
}

/// FileAttributesFlags word (header offset 24), 15 defined bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileAttributes {
    pub readonly: bool,
    pub hidden: bool,
    pub system: bool,
    pub reserved1: bool,
    pub directory: bool,
    pub archive: bool,
    pub reserved2: bool,
    pub normal: bool,
    pub temporary: bool,
    pub sparse_file: bool,
    pub reparse_point: bool,
    pub compressed: bool,
    pub offline: bool,
    pub not_content_indexed: bool,
    pub encrypted: bool,
}

impl FileAttributes {
    pub fn from_bits(word: u32) -> Self {
        Self {
            readonly: bit(word, 0),
            hidden: bit(word, 1),
            system: bit(word, 2),
            reserved1: bit(word, 3),
            directory: bit(word, 4),
            archive: bit(word, 5),
            reserved2: bit(word, 6),
            normal: bit(word, 7),
            temporary: bit(word, 8),
            sparse_file: bit(word, 9),
            reparse_point: bit(word, 10),
            compressed: bit(word, 11),
            offline: bit(word, 12),
            not_content_indexed: bit(word, 13),
            encrypted: bit(word, 14),
        }
    }
}

/// The two header words we care about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellLinkHeader {
    pub link_flags: LinkFlags,
    pub attributes: FileAttributes,
}

impl ShellLinkHeader {
    pub fn new(link_flags: u32, attributes: u32) -> Self {
        Self {
            link_flags: LinkFlags::from_bits(link_flags),
            attributes: FileAttributes::from_bits(attributes),
        }
    }
}
