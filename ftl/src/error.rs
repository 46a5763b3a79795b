use thiserror::Error;

use crate::{consts::SectionKind, dcl::ExplodeError};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, buffer is {len} bytes)")]
    TruncatedInput {
        offset: usize,
        need: usize,
        len: usize,
    },

    #[error("FTL signature not detected: found {found:?}")]
    BadSignature { found: [u8; 4] },

    #[error("{section:?} offset {offset} does not leave room for its {need}-byte sub-header (buffer is {len} bytes)")]
    BadOffset {
        section: SectionKind,
        offset: i32,
        need: usize,
        len: usize,
    },

    #[error("decompression failed: {0}")]
    DecompressionFailed(#[from] ExplodeError),
}

impl DecodeError {
    /// Byte offset in the decompressed buffer the error points at, when there is one.
    ///
    /// For truncation this is the end of the read that failed, so it is always past the
    /// end of the buffer.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::TruncatedInput { offset, need, .. } => Some(offset.saturating_add(*need)),
            DecodeError::BadSignature { .. } => Some(0),
            DecodeError::BadOffset { offset, .. } => usize::try_from(*offset).ok(),
            DecodeError::DecompressionFailed(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
