//! Decoder for FTL model containers and exporters for the decoded [`Model`].
//!
//! ```no_run
//! let raw = std::fs::read("goblin_base.ftl")?;
//! let model = ftl::decode(&raw)?;
//! println!("{} has {} faces", model.name(), model.geometry.faces.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binaries;
pub mod consts;
pub mod cursor;
pub mod error;
pub mod dcl;
pub mod export;
pub mod meshes;
pub mod model;
pub mod parser;
pub mod prelude;
pub mod writer;

pub use error::{DecodeError, Result};
pub use model::Model;

use consts::MAX_DECOMPRESSED_LEN;
use dcl::{explode, ExplodeError};

#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Ceiling on the decompressed size. Larger streams fail with
    /// [`ExplodeError::OutputLimit`].
    pub max_decompressed_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_decompressed_len: MAX_DECOMPRESSED_LEN,
        }
    }
}

/// Decompress and parse a raw `.ftl` file with default options.
pub fn decode(raw: &[u8]) -> Result<Model> {
    decode_with(raw, &DecodeOptions::default())
}

pub fn decode_with(raw: &[u8], options: &DecodeOptions) -> Result<Model> {
    let data = explode(raw, options.max_decompressed_len)?;
    if data.is_empty() {
        return Err(ExplodeError::Empty.into());
    }
    log::info!("decompressed {} bytes into {}", raw.len(), data.len());

    parser::parse(&data)
}
