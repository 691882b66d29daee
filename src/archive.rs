//! Reading of BIG4 archive containers.

use crate::decode::decode;
use crate::errors::BigError;
use crate::format::is_encoded;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str;

const MAGIC: &[u8; 4] = b"BIG4";
const TABLE_OFFSET: usize = 16;

/// One named byte range from the archive's entry table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    offset: usize,
    length: usize,
}

/// A parsed BIG4 archive.
///
/// A BIG4 archive is a flat container: a sixteen byte header, a linear
/// entry table mapping names to byte ranges, and the entry data itself.
///
/// | Byte Num | Description |
/// | :------: | ----------- |
/// | 0..4     | magic bytes ("BIG4") |
/// | 4..8     | total archive size, little endian |
/// | 8..12    | number of entries, big endian |
/// | 12..16   | offset of the data section, big endian |
/// | 16..     | entry table |
///
/// Each table entry is a big endian data offset, a big endian data
/// length, and a null-terminated ASCII name. The total size is the one
/// little endian field in the format; everything else is big endian.
///
/// `Archive` owns the raw container bytes. Entries are served as
/// borrowed slices into them, or as freshly decoded buffers when an
/// entry is stored RefPack-compressed. The table is built once at
/// [`open`] and read-only afterwards, so an `Archive` can be shared by
/// reference across threads.
///
/// ```
/// # fn example(bytes: Vec<u8>) -> Result<(), big4::BigError> {
/// let archive = big4::Archive::open(bytes)?;
/// for (name, length) in archive.list() {
///     println!("{length:>10}  {name}");
/// }
/// let data = archive.get("textures/menu.dat")?;
/// # drop(data); Ok(())
/// # }
/// ```
///
/// [`open`]: Archive::open
pub struct Archive {
    data: Vec<u8>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    size: u32,
    data_offset: u32,
}

impl Archive {
    /// Parse the container held in `data`.
    ///
    /// Fails with [`BigError::BadMagic`] when the leading bytes are not
    /// `"BIG4"`, [`BigError::DuplicateEntry`] when a name repeats, and
    /// [`BigError::TruncatedTable`] when the table runs past the end of
    /// the buffer before the promised entry count is reached.
    pub fn open(data: Vec<u8>) -> Result<Self, BigError> {
        if data.len() < TABLE_OFFSET || &data[..4] != MAGIC {
            return Err(BigError::BadMagic);
        }
        let size = LittleEndian::read_u32(&data[4..8]);
        let n_entries = BigEndian::read_u32(&data[8..12]);
        let data_offset = BigEndian::read_u32(&data[12..16]);

        let mut entries = Vec::new();
        let mut index = HashMap::new();
        let mut cursor = TABLE_OFFSET;
        for found in 0..n_entries {
            let fields = data.get(cursor..cursor + 8).ok_or(BigError::TruncatedTable {
                expected: n_entries,
                found,
            })?;
            let offset = BigEndian::read_u32(&fields[..4]) as usize;
            let length = BigEndian::read_u32(&fields[4..]) as usize;

            let rest = &data[cursor + 8..];
            let name_len = rest
                .iter()
                .position(|&b| b == 0)
                .ok_or(BigError::TruncatedTable {
                    expected: n_entries,
                    found,
                })?;
            let name = str::from_utf8(&rest[..name_len])?.to_owned();

            if offset + length > data.len() {
                return Err(BigError::CorruptStream(offset));
            }
            if index.contains_key(&name) {
                return Err(BigError::DuplicateEntry(name));
            }
            index.insert(name.clone(), entries.len());
            entries.push(Entry {
                name,
                offset,
                length,
            });
            cursor += 8 + name_len + 1;
        }

        Ok(Self {
            data,
            entries,
            index,
            size,
            data_offset,
        })
    }

    /// Read and parse the archive file at `p`.
    pub fn from_file<P: AsRef<Path>>(p: P) -> Result<Self, BigError> {
        fs::read(p).map_err(Into::into).and_then(Self::open)
    }

    /// Look up `name` and return its bytes, decompressing them when the
    /// stored slice carries a RefPack header. Raw entries come back
    /// borrowed; decoded ones are owned.
    pub fn get(&self, name: &str) -> Result<Cow<'_, [u8]>, BigError> {
        let raw = self.get_raw(name)?;
        if is_encoded(raw) {
            decode(raw).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(raw))
        }
    }

    /// Look up `name` and return the stored bytes untouched, compressed
    /// or not.
    pub fn get_raw(&self, name: &str) -> Result<&[u8], BigError> {
        let entry = self
            .index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| BigError::NotFound(name.to_owned()))?;
        Ok(&self.data[entry.offset..entry.offset + entry.length])
    }

    /// The entry names and their stored lengths, in table order.
    pub fn list(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.length))
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total archive size recorded in the header.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Offset of the data section recorded in the header.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }
}
