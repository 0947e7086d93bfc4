use crate::core::profile::{Compiler, OsFamily, Profile, ProfileFlags, WordWidth};
use crate::core::symbols::SymbolSet;
use crate::storage::format::{BakedHeader, SymbolRecord, FORMAT_VERSION, MAGIC};
use memmap2::Mmap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid magic bytes")]
    InvalidMagic,
    #[error("File too small")]
    FileTooSmall,
    #[error("Checksum mismatch")]
    ChecksumMismatch,
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),
    #[error("Misaligned symbol table")]
    MisalignedSymbols,
    #[error("Symbol name does not fit record field: {0}")]
    SymbolTooLong(String),
}

/// Write a resolved profile and its input symbols to a baked file.
pub fn bake(path: &Path, profile: &Profile, symbols: &SymbolSet) -> Result<(), StorageError> {
    let records = symbols
        .iter()
        .map(|(name, value)| {
            SymbolRecord::new(name, value).ok_or_else(|| StorageError::SymbolTooLong(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let record_bytes: &[u8] = bytemuck::cast_slice(&records);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(record_bytes);

    let header = BakedHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        flags: profile.flags.bits(),
        os_family: profile.os.to_tag(),
        word_width: profile.width.to_tag(),
        compiler: profile.compiler.to_tag(),
        padding_1: 0,
        symbol_count: records.len() as u32,
        padding_2: [0; 2],
        symbols_offset: std::mem::size_of::<BakedHeader>() as u64,
        checksum: hasher.finalize() as u64,
        padding_3: [0; 10],
    };

    let mut file = File::create(path)?;
    file.write_all(bytemuck::bytes_of(&header))?;
    file.write_all(record_bytes)?;
    Ok(())
}

/// Zero-copy view over a baked profile file.
pub struct BakedProfile {
    mmap: Mmap,
}

impl BakedProfile {
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < std::mem::size_of::<BakedHeader>() {
            return Err(StorageError::FileTooSmall);
        }

        let header =
            bytemuck::from_bytes::<BakedHeader>(&mmap[0..std::mem::size_of::<BakedHeader>()]);

        if header.magic != MAGIC {
            return Err(StorageError::InvalidMagic);
        }
        if header.version != FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion(header.version));
        }

        let start = header.symbols_offset as usize;
        let len = header.symbol_count as usize * std::mem::size_of::<SymbolRecord>();
        if start < std::mem::size_of::<BakedHeader>()
            || start.checked_add(len).map_or(true, |end| end > mmap.len())
        {
            return Err(StorageError::FileTooSmall);
        }
        if start % std::mem::align_of::<SymbolRecord>() != 0 {
            return Err(StorageError::MisalignedSymbols);
        }

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&mmap[start..start + len]);
        if u64::from(hasher.finalize()) != header.checksum {
            return Err(StorageError::ChecksumMismatch);
        }

        Ok(Self { mmap })
    }

    pub fn header(&self) -> &BakedHeader {
        bytemuck::from_bytes::<BakedHeader>(&self.mmap[0..std::mem::size_of::<BakedHeader>()])
    }

    pub fn symbols(&self) -> &[SymbolRecord] {
        let header = self.header();
        let start = header.symbols_offset as usize;
        let len = header.symbol_count as usize * std::mem::size_of::<SymbolRecord>();
        bytemuck::cast_slice(&self.mmap[start..start + len])
    }

    /// Reconstruct the profile. Unrecognized enum tags decode to Unknown and
    /// unknown flag bits are dropped; `Diagnostics::check_baked` reports them.
    pub fn profile(&self) -> Profile {
        let header = self.header();
        Profile {
            os: OsFamily::from_tag(header.os_family),
            width: WordWidth::from_tag(header.word_width),
            compiler: Compiler::from_tag(header.compiler),
            flags: ProfileFlags::from_bits_truncate(header.flags),
        }
    }

    /// Rebuild the recorded input symbol set, e.g. to re-resolve it.
    pub fn symbol_set(&self) -> SymbolSet {
        let mut set = SymbolSet::new();
        for record in self.symbols() {
            set.define_valued(record.name(), record.value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolve::resolve;
    use tempfile::NamedTempFile;

    fn sample_symbols() -> SymbolSet {
        let mut set = SymbolSet::new();
        set.define("__linux__");
        set.define("__x86_64__");
        set.define("__GNUC__");
        set.define_valued("_M_IX86_FP", 2);
        set
    }

    #[test]
    fn test_bake_load_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let symbols = sample_symbols();
        let profile = resolve(&symbols);

        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path();
        bake(path, &profile, &symbols)?;

        let baked = BakedProfile::load(path)?;

        let header = baked.header();
        assert_eq!(header.magic, MAGIC);
        assert_eq!(header.symbol_count, 4);

        assert_eq!(baked.profile(), profile);
        assert_eq!(baked.symbol_set(), symbols);

        // Re-resolving the recorded symbols reproduces the baked profile.
        assert_eq!(resolve(&baked.symbol_set()), profile);
        Ok(())
    }

    #[test]
    fn test_load_rejects_truncated_file() -> Result<(), Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        std::fs::write(temp_file.path(), b"short")?;
        assert!(matches!(
            BakedProfile::load(temp_file.path()),
            Err(StorageError::FileTooSmall)
        ));
        Ok(())
    }

    #[test]
    fn test_load_rejects_bad_magic() -> Result<(), Box<dyn std::error::Error>> {
        let symbols = sample_symbols();
        let profile = resolve(&symbols);
        let temp_file = NamedTempFile::new()?;
        bake(temp_file.path(), &profile, &symbols)?;

        let mut bytes = std::fs::read(temp_file.path())?;
        bytes[0] ^= 0xFF;
        std::fs::write(temp_file.path(), &bytes)?;

        assert!(matches!(
            BakedProfile::load(temp_file.path()),
            Err(StorageError::InvalidMagic)
        ));
        Ok(())
    }

    #[test]
    fn test_load_rejects_corrupt_symbols() -> Result<(), Box<dyn std::error::Error>> {
        let symbols = sample_symbols();
        let profile = resolve(&symbols);
        let temp_file = NamedTempFile::new()?;
        bake(temp_file.path(), &profile, &symbols)?;

        let mut bytes = std::fs::read(temp_file.path())?;
        let flip = std::mem::size_of::<BakedHeader>() + 3;
        bytes[flip] ^= 0xFF;
        std::fs::write(temp_file.path(), &bytes)?;

        assert!(matches!(
            BakedProfile::load(temp_file.path()),
            Err(StorageError::ChecksumMismatch)
        ));
        Ok(())
    }

    #[test]
    fn test_load_rejects_future_version() -> Result<(), Box<dyn std::error::Error>> {
        let symbols = sample_symbols();
        let profile = resolve(&symbols);
        let temp_file = NamedTempFile::new()?;
        bake(temp_file.path(), &profile, &symbols)?;

        let mut bytes = std::fs::read(temp_file.path())?;
        // version field sits right after the 8-byte magic
        bytes[8..12].copy_from_slice(&99u32.to_le_bytes());
        std::fs::write(temp_file.path(), &bytes)?;

        assert!(matches!(
            BakedProfile::load(temp_file.path()),
            Err(StorageError::UnsupportedVersion(99))
        ));
        Ok(())
    }

    #[test]
    fn test_bake_rejects_oversized_symbol() -> Result<(), Box<dyn std::error::Error>> {
        let mut symbols = SymbolSet::new();
        symbols.define(&"X".repeat(64));
        let profile = resolve(&symbols);

        let temp_file = NamedTempFile::new()?;
        assert!(matches!(
            bake(temp_file.path(), &profile, &symbols),
            Err(StorageError::SymbolTooLong(_))
        ));
        Ok(())
    }
}
