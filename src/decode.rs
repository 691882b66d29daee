use crate::errors::BigError;
use crate::format::{Command, RefPackHeader};

/// Decompress RefPack `data` into a `Vec<u8>`.
///
/// The input must start with a RefPack header; use [`is_encoded`] first
/// when the data may be stored uncompressed. Decoding ends at the
/// stream's stop command, and any input bytes after it are ignored.
///
/// ```
/// let compressed = big4::encode(b"ABBACABBACD");
/// let decompressed = big4::decode(&compressed).unwrap();
/// assert_eq!(&decompressed[..], b"ABBACABBACD");
/// ```
///
/// Every out-of-bounds read, and any back-reference reaching behind the
/// start of the output, fails with [`BigError::CorruptStream`] rather
/// than yielding a truncated buffer.
///
/// [`is_encoded`]: crate::is_encoded
pub fn decode(data: &[u8]) -> Result<Vec<u8>, BigError> {
    let (header, mut pos) = RefPackHeader::parse(data)?;
    let mut output: Vec<u8> = Vec::with_capacity(header.decompressed_size as usize);

    loop {
        let command = Command::read(data, &mut pos)?;
        let (literal, backref) = match command {
            Command::Backref {
                literal,
                length,
                distance,
            } => (literal, Some((length, distance))),
            Command::Literal(literal) | Command::Stop(literal) => (literal, None),
        };

        let run = data
            .get(pos..pos + literal)
            .ok_or(BigError::CorruptStream(pos))?;
        output.extend_from_slice(run);
        pos += literal;

        if let Some((length, distance)) = backref {
            if distance > output.len() {
                return Err(BigError::CorruptStream(pos));
            }
            let start = output.len() - distance;
            // copied one byte at a time so that a window shorter than
            // `length` repeats itself (distance 1 over a single byte
            // writes a run of that byte)
            for i in start..start + length {
                let byte = output[i];
                output.push(byte);
            }
        }

        if matches!(command, Command::Stop(_)) {
            break;
        }
    }

    Ok(output)
}
