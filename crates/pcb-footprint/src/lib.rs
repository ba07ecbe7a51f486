//! Decoder for KiCad legacy footprint files (`.kicad_mod`).
//!
//! A footprint is a single `(module <name> ...)` S-expression. Decoding
//! produces a [`Module`] holding its outline geometry, text and pads:
//!
//! ```
//! use pcb_footprint::Module;
//!
//! let module: Module = r#"(module R_0603 (layer F.Cu)
//!     (fp_line (start -1.5 -0.75) (end 1.5 -0.75) (layer F.SilkS) (width 0.12))
//!     (pad 1 smd rect (at -0.8 0) (size 0.8 0.95) (layers F.Cu F.Paste F.Mask)))"#
//!     .parse()
//!     .unwrap();
//! assert_eq!(module.name, "R_0603");
//! assert_eq!(module.pads[0].pin, Some(1));
//! ```
//!
//! Unknown clauses directly inside `module` are errors. Unknown sub-clauses
//! inside individual records are ignored.

mod clause;
mod error;
mod graphics;
mod module;
mod pad;
mod text;
pub mod types;

pub use error::{DecodeError, Malformed, Result};
pub use module::decode;
pub use types::*;

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Parse and decode footprint text.
pub fn decode_str(input: &str) -> Result<Module> {
    let root = pcb_sexpr::parse_document(input)?;
    decode(&root)
}

/// Read a whole footprint from `reader` and decode it.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Module> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    decode_str(&content)
}

impl FromStr for Module {
    type Err = DecodeError;

    fn from_str(content: &str) -> Result<Self> {
        decode_str(content)
    }
}

impl Module {
    /// Decode a `.kicad_mod` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading footprint from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        decode_str(&content)
    }
}
