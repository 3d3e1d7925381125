use indexmap::IndexMap;
use log::{debug, trace, warn};
use num::Num;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    utils::math::vector::{SparseVec, TermId},
    vectorizer::{
        config::Pivot,
        scheme::{GlobalWeight, LocalWeight, Normalization, Scheme},
        weight::{PivotParams, TermCounts},
    },
};

/// Document-frequency table of a corpus.
///
/// This is what a vocabulary keeps about a corpus: no document content,
/// only how many documents there were and how many of them contain each term.
/// It can be built by scanning a corpus or handed over precomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFrequencies {
    /// number of documents
    pub num_docs: u64,
    /// sum of all term counts
    pub num_pos: f64,
    /// number of (document, term) pairs
    pub num_nnz: u64,
    /// term id -> number of documents containing it
    pub dfs: IndexMap<TermId, u64>,
}

impl DocumentFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every document of `corpus`, then order the table by term id.
    pub fn from_corpus<N, D>(corpus: &[D]) -> Self
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        let mut freqs = DocumentFrequencies::new();
        for doc in corpus {
            freqs.add_document(doc.as_ref());
        }
        freqs.dfs.sort_keys();
        freqs
    }

    /// Add one document.
    /// A term repeated inside the document still counts once.
    pub fn add_document<N>(&mut self, doc: &[(TermId, N)])
    where
        N: Num + Copy + Into<f64>,
    {
        self.num_docs += 1;
        let counts = TermCounts::from_document(doc);
        for (term, tf) in counts.iter() {
            if tf <= 0.0 {
                continue;
            }
            self.num_nnz += 1;
            self.num_pos += tf;
            *self.dfs.entry(term).or_insert(0) += 1;
        }
    }

    /// Get the document frequency of a term
    #[inline]
    pub fn doc_freq(&self, term: TermId) -> u64 {
        self.dfs.get(&term).copied().unwrap_or(0)
    }

    /// Get the number of documents
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.num_docs
    }

    /// number of distinct terms
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.dfs.len()
    }

    /// Check `df <= num_docs` for every term.
    pub fn validate(&self) -> Result<()> {
        match self.dfs.iter().find(|(_, &df)| df > self.num_docs) {
            Some((&term, &df)) => Err(Error::InconsistentFrequencies {
                term,
                df,
                num_docs: self.num_docs,
            }),
            None => Ok(()),
        }
    }
}

/// Corpus-wide statistics a fitted model weighs documents with.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    total_docs: u64,
    doc_freq: IndexMap<TermId, u64>,
    /// `None` when the global weight is constant
    idf_weights: Option<IndexMap<TermId, f64>>,
    pivot: Option<f64>,
    slope: f64,
}

impl CorpusStatistics {
    /// Scan `corpus` and derive the statistics `scheme` needs.
    ///
    /// The pivot is resolved only for pivoted normalization; `Pivot::Auto`
    /// over an empty corpus fails with [`Error::EmptyCorpus`].
    pub fn fit<N, D>(corpus: &[D], scheme: &Scheme, pivot: Pivot, slope: f64) -> Result<Self>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        let freqs = DocumentFrequencies::from_corpus(corpus);
        trace!("scanned {} documents, {} distinct terms", freqs.num_docs, freqs.vocab_size());
        Self::build(freqs, corpus, scheme, pivot, slope)
    }

    /// Use a precomputed frequency table instead of scanning.
    ///
    /// `corpus` is read only to fit an automatic pivot; when it is empty the
    /// pivot comes from the table's own totals.
    pub fn from_frequencies<N, D>(
        freqs: DocumentFrequencies,
        corpus: &[D],
        scheme: &Scheme,
        pivot: Pivot,
        slope: f64,
    ) -> Result<Self>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        freqs.validate()?;
        Self::build(freqs, corpus, scheme, pivot, slope)
    }

    fn build<N, D>(
        freqs: DocumentFrequencies,
        corpus: &[D],
        scheme: &Scheme,
        pivot: Pivot,
        slope: f64,
    ) -> Result<Self>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        let total_docs = freqs.num_docs;
        let idf_weights = match scheme.global() {
            GlobalWeight::None => None,
            global => Some(
                freqs
                    .dfs
                    .iter()
                    .map(|(&term, &df)| (term, global.apply(df, total_docs)))
                    .collect(),
            ),
        };

        let mut stats = CorpusStatistics {
            total_docs,
            doc_freq: freqs.dfs,
            idf_weights,
            pivot: None,
            slope,
        };
        stats.pivot = stats.resolve_pivot(pivot, scheme, corpus, freqs.num_nnz, freqs.num_pos)?;

        debug!(
            "fitted corpus statistics: scheme={}, docs={}, terms={}, pivot={:?}, slope={}",
            scheme,
            stats.total_docs,
            stats.doc_freq.len(),
            stats.pivot,
            stats.slope
        );
        Ok(stats)
    }

    fn resolve_pivot<N, D>(
        &self,
        pivot: Pivot,
        scheme: &Scheme,
        corpus: &[D],
        num_nnz: u64,
        num_pos: f64,
    ) -> Result<Option<f64>>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        if !scheme.normalization().is_pivoted() {
            if let Pivot::Fixed(p) = pivot {
                warn!("pivot {p} ignored: scheme {scheme} does not use pivoted normalization");
            }
            return Ok(None);
        }

        match pivot {
            Pivot::None => Ok(None),
            Pivot::Fixed(p) => Ok(Some(p)),
            Pivot::Auto if !corpus.is_empty() => {
                // second pass: mean length under the weighting documents will get
                let total: f64 = corpus
                    .iter()
                    .map(|doc| self.document_length(&TermCounts::from_document(doc.as_ref()), scheme))
                    .sum();
                let pivot = total / corpus.len() as f64;
                trace!("auto pivot {pivot} over {} documents", corpus.len());
                Ok(Some(pivot))
            }
            Pivot::Auto => {
                // no documents to weigh: fall back to the table's raw totals
                if self.total_docs == 0 {
                    return Err(Error::EmptyCorpus);
                }
                let total = match scheme.normalization() {
                    Normalization::PivotedUnique => num_nnz as f64,
                    _ => num_pos,
                };
                Ok(Some(total / self.total_docs as f64))
            }
        }
    }

    /// Global weight of `term`; 0 for terms unseen during fit.
    #[inline]
    pub fn global_weight(&self, term: TermId) -> f64 {
        match &self.idf_weights {
            Some(weights) => weights.get(&term).copied().unwrap_or(0.0),
            None => {
                if self.doc_freq.contains_key(&term) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Local times global weight of every term; zero weights are dropped.
    pub fn weigh(&self, counts: &TermCounts, local: LocalWeight) -> SparseVec {
        let stats = counts.stats();
        let mut out = SparseVec::with_capacity(counts.unique_terms());
        for (term, tf) in counts.iter() {
            let global = self.global_weight(term);
            if global == 0.0 {
                continue;
            }
            out.push(term, local.apply(tf, &stats) * global);
        }
        out
    }

    /// Length of a document as pivoted normalization measures it.
    ///
    /// - `u`: distinct fit-vocabulary terms with a non-zero length weight
    /// - `b`: sum of local times global weights, the unnormalized length of
    ///   the weighted document
    ///
    /// Other normalizations don't read a length and get 0.
    pub fn document_length(&self, counts: &TermCounts, scheme: &Scheme) -> f64 {
        let local = scheme.length_local();
        let stats = counts.stats();
        let seen = counts.iter().filter(|(term, _)| self.doc_freq.contains_key(term));

        match scheme.normalization() {
            Normalization::PivotedUnique => seen
                .filter(|&(_, tf)| local.apply(tf, &stats) != 0.0)
                .count() as f64,
            Normalization::PivotedByte => seen
                .map(|(term, tf)| (local.apply(tf, &stats) * self.global_weight(term)).abs())
                .sum(),
            _ => 0.0,
        }
    }

    #[inline]
    pub fn pivot_params(&self) -> PivotParams {
        PivotParams {
            pivot: self.pivot,
            slope: self.slope,
        }
    }

    #[inline]
    pub fn total_docs(&self) -> u64 {
        self.total_docs
    }

    #[inline]
    pub fn doc_freq(&self, term: TermId) -> u64 {
        self.doc_freq.get(&term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn doc_freqs(&self) -> &IndexMap<TermId, u64> {
        &self.doc_freq
    }

    #[inline]
    pub fn idf_weights(&self) -> Option<&IndexMap<TermId, f64>> {
        self.idf_weights.as_ref()
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.doc_freq.len()
    }

    /// Fitted pivot; `None` when normalization is not pivoted or no pivot was set.
    #[inline]
    pub fn pivot(&self) -> Option<f64> {
        self.pivot
    }

    #[inline]
    pub fn slope(&self) -> f64 {
        self.slope
    }
}
