/// Errors surfaced by scheme resolution, fitting and transforming.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// `transform_*` was called before any successful `fit`.
    #[error("model has not been fitted yet; call `fit` before transforming documents")]
    NotFitted,
    /// SMART mnemonic with a bad length or an unknown code.
    #[error("invalid SMART scheme `{mnemonic}`: {reason}")]
    InvalidScheme { mnemonic: String, reason: String },
    /// Automatic pivot requested over zero documents.
    #[error("cannot determine the pivot automatically: corpus contains no documents")]
    EmptyCorpus,
    /// Precomputed document frequencies violate `df <= num_docs`.
    #[error("document frequency {df} of term {term} exceeds document count {num_docs}")]
    InconsistentFrequencies { term: u32, df: u64, num_docs: u64 },
    /// `fit_from_frequencies` was called without a document-frequency table.
    #[error("no document frequencies configured; set them with `with_document_frequencies`")]
    MissingFrequencies,
    /// A model using a custom normalizer was asked to persist itself.
    #[error("models with a custom normalizer cannot be persisted")]
    UnpersistableNormalizer,
    /// CBOR encoding or decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_cbor::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_scheme(mnemonic: &str, reason: impl Into<String>) -> Self {
        Error::InvalidScheme {
            mnemonic: mnemonic.to_string(),
            reason: reason.into(),
        }
    }
}
