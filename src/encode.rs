use crate::format::RefPackHeader;

/// Longest literal run a single one byte command can carry.
const MAX_LITERAL_RUN: usize = 112;

/// Compress `data` into a RefPack stream.
///
/// This is the reference passthrough encoder: it never searches for
/// back-references, so the output is a shade larger than the input, but
/// every stream it produces decodes back to `data` exactly. The header
/// is always emitted with 4-byte size fields and no compressed-size
/// field.
// TODO: emit back-references from an actual LZ77 match search
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() + data.len() / MAX_LITERAL_RUN + 8);
    RefPackHeader {
        decompressed_size: data.len() as u32,
        compressed_size: None,
        long_sizes: true,
    }
    .write_to(&mut output);

    let mut pos = 0;
    while data.len() - pos >= 4 {
        // literal runs carry a multiple of four bytes, encoded as n/4 - 1
        let run = (data.len() - pos).min(MAX_LITERAL_RUN) & !3;
        output.push(0xE0 + (run / 4 - 1) as u8);
        output.extend_from_slice(&data[pos..pos + run]);
        pos += run;
    }

    // the stop command carries the final zero to three bytes
    output.push(0xFC + (data.len() - pos) as u8);
    output.extend_from_slice(&data[pos..]);

    output
}
