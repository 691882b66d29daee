//! Reading of BIG4 archive containers and the RefPack compression
//! scheme used for their entries.
//!
//! The two halves are independent. [`Archive`] parses the container and
//! serves entries by name, running the decoder whenever an entry sniffs
//! as RefPack data. [`decode`], [`encode`], and [`is_encoded`] work on
//! plain byte slices and know nothing about archives.
//!
//! ```
//! let compressed = big4::encode(b"ABBACABBACD");
//! assert!(big4::is_encoded(&compressed));
//!
//! let decompressed = big4::decode(&compressed).unwrap();
//! assert_eq!(&decompressed[..], b"ABBACABBACD");
//! ```
//!
//! See [`format`] for the binary layout of RefPack data; the container
//! layout is documented on [`Archive`].

mod archive;
mod decode;
mod encode;
mod errors;
pub mod format;

pub use archive::Archive;
pub use decode::decode;
pub use encode::encode;
pub use errors::BigError;
pub use format::{is_encoded, refpack_info, RefPackHeader};
