use tantivy::TantivyError;
use tantivy::directory::error::OpenDirectoryError;
use thiserror::Error;

/// Any failure while reading from or writing to an element store.
///
/// Wraps the underlying cause; the store never retries internally. A silent
/// empty result would be indistinguishable from "not found", so callers must
/// surface these.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("search index error: {0}")]
    Index(#[from] TantivyError),

    #[error("index directory error: {0}")]
    Directory(#[from] OpenDirectoryError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt payload for element {name}: {source}")]
    Payload {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored element {name} has unknown kind discriminator {kind:?}")]
    UnknownKind { name: String, kind: String },

    #[error("stored document is missing field {0}")]
    MissingField(&'static str),
}

pub type FetchResult<T> = Result<T, FetchError>;
