//! SMART-scheme TF-IDF weighting for sparse bag-of-words documents.
//!
//! Fit a [`TfidfEngine`] on a corpus of `(term id, count)` documents, then
//! transform any document into a weighted sparse vector:
//!
//! ```
//! use smart_tfidf::{TfidfConfig, TfidfEngine};
//!
//! let corpus = vec![vec![(0u32, 1u32), (1, 1)], vec![(1, 1), (2, 2)]];
//! let mut engine = TfidfEngine::new(TfidfConfig::new().with_smartirs("nfc"));
//! engine.fit(&corpus).unwrap();
//!
//! let weighted = engine.transform_one(&[(0u32, 1u32), (1, 1)]).unwrap();
//! // term 1 occurs in every document, so only term 0 survives
//! assert_eq!(weighted.inds(), &[0]);
//! assert!((weighted.get(0) - 1.0).abs() < 1e-12);
//! ```
pub mod error;
pub mod utils;
pub mod vectorizer;

/// Crate error and result alias.
pub use error::{Error, Result};

/// TF-IDF Engine
/// The top-level struct of this crate.
/// Holds the options and, once fitted, a [`TfidfModel`].
///
/// - `fit` scans a corpus (or takes precomputed document frequencies)
/// - `transform_one` / `transform_many` weigh documents
/// - re-fitting replaces the previous model entirely
pub use vectorizer::TfidfEngine;

/// Fitted TF-IDF model
/// A resolved scheme plus corpus statistics. Immutable, `Send + Sync`,
/// and serializable unless it uses a custom normalizer.
pub use vectorizer::TfidfModel;

/// Engine options
/// SMART mnemonic, pivot, slope, normalization switch, weight overrides and
/// an optional precomputed document-frequency table.
pub use vectorizer::config::{Pivot, TfidfConfig};

/// SMART scheme
/// `Scheme::resolve("nfc")` parses a mnemonic into local weight, global weight
/// and normalization.
pub use vectorizer::scheme::{CustomNormalizer, GlobalWeight, LocalWeight, Normalization, Scheme};

/// Corpus statistics
/// Document count and per-term document frequency, the idf weights derived
/// from them and the fitted pivot.
pub use vectorizer::corpus::{CorpusStatistics, DocumentFrequencies};

/// Weighting helpers
/// Per-document term counts and the pivot parameters of pivoted normalization.
pub use vectorizer::weight::{DocStats, PivotParams, TermCounts};

/// Sparse vector
/// Ascending term ids with non-zero `f64` weights.
pub use utils::math::vector::{SparseVec, TermId};
