//! Binary layout of RefPack-compressed data.
//!
//! ## Header
//! A RefPack stream opens with a two byte header, followed by one or two
//! big endian size fields. The key data can be extracted into a
//! [`RefPackHeader`] by using [`refpack_info()`].
//!
//! | Byte Num | Description |
//! | :------: | ----------- |
//! | 0        | control flags (see below) |
//! | 1        | magic byte (`0xFB`) |
//! | 2..      | compressed size, only when flag bit 6 is set |
//! | ..       | decompressed size |
//!
//! Control flag bits:
//! * bit 7 — size fields are 4 bytes wide instead of 3
//! * bit 6 — a compressed-size field precedes the decompressed-size field
//! * bit 0 — reserved
//! * bits 1..=5 — must equal `0b01000` (`byte0 & 0x3E == 0x10`)
//!
//! ## Commands
//! After the header comes a stream of variable width commands, dispatched
//! on the top three bits of their first byte. Each command copies up to
//! three literal bytes (or a longer run for the one byte literal shape)
//! from the stream into the output, then optionally copies `length` bytes
//! starting `distance` bytes behind the current end of the output.
//!
//! | Selector | Width | Literal | Back-ref length | Back-ref distance |
//! | :------: | :---: | ------- | --------------- | ----------------- |
//! | 0..=3    | 2     | `b0 & 3` | `((b0 & 0x1C) >> 2) + 3` | `((b0 & 0x60) << 3) + b1 + 1` |
//! | 4..=5    | 3     | `(b1 & 0xC0) >> 6` | `(b0 & 0x3F) + 4` | `((b1 & 0x3F) << 8) + b2 + 1` |
//! | 6        | 4     | `b0 & 3` | `((b0 & 0x0C) << 6) + b3 + 5` | `((b0 & 0x10) << 12) + (b1 << 8) + b2 + 1` |
//! | 7, `b0 < 0xFC` | 1 | `((b0 & 0x1F) + 1) << 2` | — | — |
//! | 7, `b0 >= 0xFC` | 1 | `b0 & 3` | — | — |
//!
//! The `b0 >= 0xFC` shape is the stop command: decoding ends once its
//! literal copy has been applied. A back-reference distance smaller than
//! its length is valid and repeats the referenced window, which is how
//! long runs are encoded with small distances.

use crate::errors::BigError;
use byteorder::{BigEndian, ByteOrder};

/// Fixed value of the second header byte.
const MAGIC: u8 = 0xFB;
/// `byte0 & FLAG_MASK` must equal [`FLAG_FIXED`] for a valid stream.
const FLAG_MASK: u8 = 0x3E;
const FLAG_FIXED: u8 = 0x10;
/// Size fields are 4 bytes wide instead of 3.
const FLAG_LONG_SIZES: u8 = 0x80;
/// A compressed-size field precedes the decompressed-size field.
const FLAG_COMPRESSED_SIZE: u8 = 0x40;

/// Cheap sniff test: does `data` begin with a plausible RefPack header?
///
/// Entries in a BIG4 archive may be stored either raw or compressed;
/// this predicate is how [`Archive::get`](crate::Archive::get) decides
/// whether to run the decoder.
pub fn is_encoded(data: &[u8]) -> bool {
    data.len() >= 2 && data[1] == MAGIC && data[0] & FLAG_MASK == FLAG_FIXED
}

/// The information stored at the start of a RefPack stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefPackHeader {
    /// Size of the decompressed data.
    pub decompressed_size: u32,
    /// Size of the compressed stream, when the stream carries it.
    /// Informational only; the decoder does not bound itself by it.
    pub compressed_size: Option<u32>,
    /// Whether the size fields are 4 bytes wide instead of 3.
    pub long_sizes: bool,
}

impl RefPackHeader {
    /// Parse a RefPack header from the start of `data`, returning the
    /// header and the offset of the first command byte.
    pub(crate) fn parse(data: &[u8]) -> Result<(Self, usize), BigError> {
        if data.len() < 2 || data[1] != MAGIC || data[0] & FLAG_MASK != FLAG_FIXED {
            return Err(BigError::InvalidHeader);
        }
        let long_sizes = data[0] & FLAG_LONG_SIZES != 0;
        let width = if long_sizes { 4 } else { 3 };

        let mut pos = 2;
        let compressed_size = if data[0] & FLAG_COMPRESSED_SIZE != 0 {
            Some(read_size(data, &mut pos, width)?)
        } else {
            None
        };
        let decompressed_size = read_size(data, &mut pos, width)?;

        Ok((
            Self {
                decompressed_size,
                compressed_size,
                long_sizes,
            },
            pos,
        ))
    }

    /// Append `self` to `out` in the RefPack header layout.
    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        let mut flags = FLAG_FIXED;
        if self.long_sizes {
            flags |= FLAG_LONG_SIZES;
        }
        if self.compressed_size.is_some() {
            flags |= FLAG_COMPRESSED_SIZE;
        }
        out.push(flags);
        out.push(MAGIC);

        let width = if self.long_sizes { 4 } else { 3 };
        if let Some(compressed) = self.compressed_size {
            write_size(out, compressed, width);
        }
        write_size(out, self.decompressed_size, width);
    }
}

fn read_size(data: &[u8], pos: &mut usize, width: usize) -> Result<u32, BigError> {
    let field = data
        .get(*pos..*pos + width)
        .ok_or(BigError::CorruptStream(*pos))?;
    *pos += width;
    Ok(if width == 4 {
        BigEndian::read_u32(field)
    } else {
        BigEndian::read_u24(field)
    })
}

fn write_size(out: &mut Vec<u8>, value: u32, width: usize) {
    for shift in (0..width).rev() {
        out.push((value >> (8 * shift)) as u8);
    }
}

/// Extract the [`RefPackHeader`] from RefPack data.
///
/// This is a convenience function to inspect a stream without decoding it.
pub fn refpack_info(data: &[u8]) -> Result<RefPackHeader, BigError> {
    RefPackHeader::parse(data).map(|(header, _)| header)
}

/// A single decode step, read from the variable width command stream.
///
/// The five wire shapes collapse to three semantic variants: the three
/// back-referencing widths all become [`Backref`], and the two one byte
/// shapes are a plain literal run and the stop command.
///
/// [`Backref`]: Command::Backref
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Copy `literal` input bytes through, then copy `length` bytes
    /// starting `distance` behind the end of the output.
    Backref {
        literal: usize,
        length: usize,
        distance: usize,
    },
    /// Copy a run of literal bytes (a multiple of four, at most 112).
    Literal(usize),
    /// Copy up to three final literal bytes, then stop decoding.
    Stop(usize),
}

impl Command {
    /// Read the command starting at `data[*pos]`, advancing `pos` past
    /// its header bytes (but not past its literal payload).
    pub(crate) fn read(data: &[u8], pos: &mut usize) -> Result<Self, BigError> {
        let b0 = *data.get(*pos).ok_or(BigError::CorruptStream(*pos))? as usize;
        let width = match b0 >> 5 {
            0..=3 => 2,
            4 | 5 => 3,
            6 => 4,
            _ => 1,
        };
        let cmd = data
            .get(*pos..*pos + width)
            .ok_or(BigError::CorruptStream(*pos))?;
        *pos += width;

        Ok(match b0 >> 5 {
            0..=3 => Command::Backref {
                literal: b0 & 0x03,
                length: ((b0 & 0x1C) >> 2) + 3,
                distance: ((b0 & 0x60) << 3) + cmd[1] as usize + 1,
            },
            4 | 5 => Command::Backref {
                literal: (cmd[1] as usize & 0xC0) >> 6,
                length: (b0 & 0x3F) + 4,
                distance: ((cmd[1] as usize & 0x3F) << 8) + cmd[2] as usize + 1,
            },
            6 => Command::Backref {
                literal: b0 & 0x03,
                length: ((b0 & 0x0C) << 6) + cmd[3] as usize + 5,
                distance: ((b0 & 0x10) << 12) + ((cmd[1] as usize) << 8) + cmd[2] as usize + 1,
            },
            _ if b0 >= 0xFC => Command::Stop(b0 & 0x03),
            _ => Command::Literal(((b0 & 0x1F) + 1) << 2),
        })
    }
}
