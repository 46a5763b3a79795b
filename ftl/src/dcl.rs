//! PKWARE Data Compression Library ("implode") streams, decoded with the `explode` crate.

use ::explode::{Error as StreamError, Explode};
use thiserror::Error;

/// Output is collected from the decoder in chunks of this size.
const CHUNK_LEN: usize = 4096;

#[derive(Debug, Error)]
pub enum ExplodeError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("decompressed output exceeds the {0}-byte limit")]
    OutputLimit(usize),
    #[error("stream decompressed to nothing")]
    Empty,
}

/// Decompress a whole DCL stream. Output past `limit` bytes aborts with
/// [`ExplodeError::OutputLimit`] before it is buffered.
pub fn explode(input: &[u8], limit: usize) -> Result<Vec<u8>, ExplodeError> {
    let mut state = Explode::new();
    let mut chunk = [0u8; CHUNK_LEN];
    let mut decoder = state.with_buffer(&mut chunk);
    let mut out = Vec::new();

    let mut bytes = input.iter();
    let mut next = bytes.next();
    while let Some(&byte) = next {
        // The same byte is fed again until the decoder asks for more.
        match decoder.feed(byte) {
            Ok(()) => {
                if out.len() + decoder.len() > limit {
                    return Err(ExplodeError::OutputLimit(limit));
                }
                out.extend_from_slice(decoder.get());
                if decoder.done() {
                    log::debug!("exploded {} bytes into {}", input.len(), out.len());
                    return Ok(out);
                }
                decoder.reset();
            }
            Err(StreamError::IncompleteInput) => next = bytes.next(),
            Err(err) => return Err(err.into()),
        }
    }

    Err(StreamError::IncompleteInput.into())
}
