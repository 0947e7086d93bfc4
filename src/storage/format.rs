use bytemuck::{Pod, Zeroable};

pub const MAGIC: [u8; 8] = *b"PLATPRF1";
pub const FORMAT_VERSION: u32 = 1;

/// Fixed width of a recorded symbol name. Must stay in sync with
/// `core::symbols::MAX_SYMBOL_LEN`.
pub const NAME_FIELD_LEN: usize = 40;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct BakedHeader {
    pub magic: [u8; 8],
    pub version: u32,
    pub flags: u32,
    pub os_family: u8,
    pub word_width: u8,
    pub compiler: u8,
    pub padding_1: u8,
    pub symbol_count: u32,
    pub padding_2: [u32; 2], // Align symbols_offset to 8
    pub symbols_offset: u64,
    pub checksum: u64,
    pub padding_3: [u64; 10], // 48 + 80 = 128
}

/// One recorded input symbol: NUL-padded name plus its integer value.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SymbolRecord {
    pub name: [u8; NAME_FIELD_LEN],
    pub value: i64,
}

impl SymbolRecord {
    /// None if the name does not fit the fixed field.
    pub fn new(name: &str, value: i64) -> Option<Self> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > NAME_FIELD_LEN {
            return None;
        }
        let mut field = [0u8; NAME_FIELD_LEN];
        field[..bytes.len()].copy_from_slice(bytes);
        Some(Self { name: field, value })
    }

    pub fn name(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_LEN);
        std::str::from_utf8(&self.name[..end]).unwrap_or("")
    }
}

// Ensure BakedHeader is 128 bytes
const _: () = assert!(std::mem::size_of::<BakedHeader>() == 128);
// Ensure SymbolRecord is 48 bytes
const _: () = assert!(std::mem::size_of::<SymbolRecord>() == 48);
