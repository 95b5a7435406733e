use thiserror::Error;

use crate::feed::{FetchError, ParseError};
use crate::render::RenderError;
use crate::util::UrlValidationError;

/// Any failure along the fetch → parse → render pipeline.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("No feed source URL given")]
    MissingSource,

    #[error(transparent)]
    InvalidUrl(#[from] UrlValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The single failure surfaced to the caller of the reader.
///
/// Callers are not expected to tell the underlying kinds apart; the
/// wrapped [`ReaderError`] stays reachable as the error source.
#[derive(Debug, Error)]
#[error("Unhandled error: {0}")]
pub struct UnhandledError(#[source] pub ReaderError);

impl From<ReaderError> for UnhandledError {
    fn from(err: ReaderError) -> Self {
        Self(err)
    }
}
