//! Numeric formulas behind each scheme letter.
//!
//! All functions are total: zero frequencies, unseen terms and zero vectors
//! fall back to a weight of 0 or an unchanged vector instead of NaN/inf.

use num::Num;

use crate::{
    utils::math::vector::{SparseVec, TermId},
    vectorizer::scheme::{GlobalWeight, LocalWeight, Normalization},
};

/// Statistics of one document that some local weights depend on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocStats {
    /// largest term frequency in the document
    pub max_tf: f64,
    /// mean term frequency over the terms present in the document
    pub avg_tf: f64,
}

/// Term counts of one input document.
/// Duplicate ids are summed, zero counts dropped, ids ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct TermCounts {
    counts: SparseVec,
    stats: DocStats,
}

impl TermCounts {
    pub fn from_document<N>(doc: &[(TermId, N)]) -> Self
    where
        N: Num + Copy + Into<f64>,
    {
        let counts = SparseVec::from_pairs(doc.iter().map(|&(id, tf)| (id, tf.into())));

        let mut max_tf = 0.0f64;
        let mut sum = 0.0;
        let mut present = 0usize;
        for &tf in counts.vals() {
            if tf > 0.0 {
                max_tf = max_tf.max(tf);
                sum += tf;
                present += 1;
            }
        }
        let avg_tf = if present == 0 { 0.0 } else { sum / present as f64 };

        TermCounts {
            counts,
            stats: DocStats { max_tf, avg_tf },
        }
    }

    #[inline]
    pub fn stats(&self) -> DocStats {
        self.stats
    }

    /// distinct terms with a non-zero count
    #[inline]
    pub fn unique_terms(&self) -> usize {
        self.counts.nnz()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (TermId, f64)> + '_ {
        self.counts.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl LocalWeight {
    /// Weight of a term occurring `tf` times in a document with `stats`.
    pub fn apply(&self, tf: f64, stats: &DocStats) -> f64 {
        match self {
            LocalWeight::Raw => tf,
            _ if tf <= 0.0 => 0.0,
            LocalWeight::Binary => 1.0,
            LocalWeight::Augmented => {
                if stats.max_tf <= 0.0 {
                    0.0
                } else {
                    0.5 + 0.5 * tf / stats.max_tf
                }
            }
            LocalWeight::Log => 1.0 + tf.ln(),
            LocalWeight::DoubleLog => {
                // 1 + ln(tf) turns non-positive for tf <= 1/e
                let inner = 1.0 + tf.ln();
                if inner <= 0.0 {
                    0.0
                } else {
                    1.0 + inner.ln()
                }
            }
            LocalWeight::LogAverage => {
                if stats.avg_tf <= 0.0 {
                    return 0.0;
                }
                let denom = 1.0 + stats.avg_tf.ln();
                if denom <= 0.0 {
                    0.0
                } else {
                    (1.0 + tf.ln()) / denom
                }
            }
        }
    }
}

impl GlobalWeight {
    /// Weight of a term seen in `df` of `total_docs` documents.
    /// A term never seen (`df == 0`) weighs 0.
    pub fn apply(&self, df: u64, total_docs: u64) -> f64 {
        if df == 0 || total_docs == 0 {
            return 0.0;
        }
        let n = total_docs as f64;
        let df_f = df as f64;
        match self {
            GlobalWeight::None => 1.0,
            GlobalWeight::Idf => (n / df_f).ln(),
            GlobalWeight::ZeroCorrectedIdf => ((n + 1.0) / df_f).ln(),
            GlobalWeight::ProbabilisticIdf => {
                if df >= total_docs {
                    0.0
                } else {
                    ((n - df_f) / df_f).ln().max(0.0)
                }
            }
        }
    }
}

/// Pivot and slope for pivoted normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotParams {
    /// `None` divides by the plain document length.
    pub pivot: Option<f64>,
    pub slope: f64,
}

impl PivotParams {
    /// `(1 - slope) * pivot + slope * length`
    #[inline]
    pub fn divisor(&self, length: f64) -> f64 {
        match self.pivot {
            Some(pivot) => (1.0 - self.slope) * pivot + self.slope * length,
            None => length,
        }
    }
}

impl Normalization {
    /// Normalize a weighted document.
    ///
    /// `length` is the document's length metric, read only by the pivoted
    /// variants. Zero vectors and non-positive divisors leave `vec` unchanged.
    pub fn apply(&self, vec: SparseVec, length: f64, pivot: &PivotParams) -> SparseVec {
        match self {
            Normalization::None => vec,
            Normalization::Cosine => {
                let norm = vec.norm();
                if norm == 0.0 || !norm.is_finite() {
                    vec
                } else {
                    vec.scale(1.0 / norm)
                }
            }
            Normalization::PivotedUnique | Normalization::PivotedByte => {
                let divisor = pivot.divisor(length);
                if divisor <= 0.0 || !divisor.is_finite() {
                    vec
                } else {
                    vec.scale(1.0 / divisor)
                }
            }
            Normalization::Custom(custom) => custom.call(vec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::scheme::CustomNormalizer;

    const EPS: f64 = 1e-12;

    fn stats(max_tf: f64, avg_tf: f64) -> DocStats {
        DocStats { max_tf, avg_tf }
    }

    #[test]
    fn term_counts_merge_duplicates_and_collect_stats() {
        let counts = TermCounts::from_document(&[(1u32, 1u32), (2, 1), (2, 1), (7, 0)]);
        assert_eq!(counts.iter().collect::<Vec<_>>(), vec![(1, 1.0), (2, 2.0)]);
        assert_eq!(counts.unique_terms(), 2);
        assert_eq!(counts.stats(), stats(2.0, 1.5));
    }

    #[test]
    fn empty_document_has_zero_stats() {
        let counts = TermCounts::from_document::<f64>(&[]);
        assert!(counts.is_empty());
        assert_eq!(counts.stats(), DocStats::default());
    }

    #[test]
    fn local_weights() {
        let s = stats(4.0, 2.0);
        assert_eq!(LocalWeight::Binary.apply(3.0, &s), 1.0);
        assert_eq!(LocalWeight::Binary.apply(0.0, &s), 0.0);
        assert_eq!(LocalWeight::Raw.apply(3.0, &s), 3.0);
        assert!((LocalWeight::Augmented.apply(2.0, &s) - 0.75).abs() < EPS);
        assert!((LocalWeight::Log.apply(std::f64::consts::E, &s) - 2.0).abs() < EPS);
        assert!((LocalWeight::DoubleLog.apply(1.0, &s) - 1.0).abs() < EPS);
        let expect = (1.0 + 3.0f64.ln()) / (1.0 + 2.0f64.ln());
        assert!((LocalWeight::LogAverage.apply(3.0, &s) - expect).abs() < EPS);
    }

    #[test]
    fn log_weights_never_take_log_of_zero() {
        let s = stats(1.0, 1.0);
        for local in [LocalWeight::Log, LocalWeight::DoubleLog, LocalWeight::LogAverage, LocalWeight::Augmented] {
            let w = local.apply(0.0, &s);
            assert_eq!(w, 0.0, "{local:?}");
        }
        // 1 + ln(0.1) < 0
        assert_eq!(LocalWeight::DoubleLog.apply(0.1, &s), 0.0);
        assert!(LocalWeight::LogAverage.apply(0.1, &stats(0.1, 0.1)).is_finite());
    }

    #[test]
    fn global_weights() {
        assert_eq!(GlobalWeight::None.apply(3, 10), 1.0);
        assert!((GlobalWeight::Idf.apply(1, 2) - 2.0f64.ln()).abs() < EPS);
        assert_eq!(GlobalWeight::Idf.apply(2, 2), 0.0);
        assert!((GlobalWeight::ZeroCorrectedIdf.apply(2, 2) - 1.5f64.ln()).abs() < EPS);
        assert!((GlobalWeight::ProbabilisticIdf.apply(1, 4) - 3.0f64.ln()).abs() < EPS);
    }

    #[test]
    fn global_weights_of_unseen_terms_are_zero() {
        for global in [GlobalWeight::None, GlobalWeight::Idf, GlobalWeight::ZeroCorrectedIdf, GlobalWeight::ProbabilisticIdf] {
            assert_eq!(global.apply(0, 5), 0.0, "{global:?}");
            assert_eq!(global.apply(0, 0), 0.0, "{global:?}");
        }
    }

    #[test]
    fn probabilistic_idf_is_clipped_at_zero() {
        // df > N/2 gives a negative log
        assert_eq!(GlobalWeight::ProbabilisticIdf.apply(3, 4), 0.0);
        assert_eq!(GlobalWeight::ProbabilisticIdf.apply(4, 4), 0.0);
    }

    #[test]
    fn cosine_normalizes_to_unit_length() {
        let v = SparseVec::from_pairs(vec![(0, 3.0), (4, 4.0)]);
        let pivot = PivotParams { pivot: None, slope: 0.65 };
        let out = Normalization::Cosine.apply(v, 0.0, &pivot);
        assert_eq!(out.inds(), &[0, 4]);
        assert!((out.get(0) - 0.6).abs() < EPS);
        assert!((out.get(4) - 0.8).abs() < EPS);
        assert!((out.norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn zero_vector_is_left_unchanged() {
        let pivot = PivotParams { pivot: Some(2.0), slope: 0.5 };
        for norm in [Normalization::Cosine, Normalization::PivotedUnique, Normalization::PivotedByte] {
            assert!(norm.apply(SparseVec::new(), 0.0, &pivot).is_empty(), "{norm:?}");
        }
    }

    #[test]
    fn pivoted_divisor_tilts_towards_pivot() {
        let pivot = PivotParams { pivot: Some(10.0), slope: 0.25 };
        assert!((pivot.divisor(2.0) - 8.0).abs() < EPS);
        // a document as long as the pivot is divided by its own length
        assert!((pivot.divisor(10.0) - 10.0).abs() < EPS);

        let v = SparseVec::from_pairs(vec![(1, 4.0), (2, 8.0)]);
        let out = Normalization::PivotedUnique.apply(v, 2.0, &pivot);
        assert_eq!(out.to_pairs(), vec![(1, 0.5), (2, 1.0)]);
    }

    #[test]
    fn pivoted_without_pivot_divides_by_length() {
        let pivot = PivotParams { pivot: None, slope: 0.65 };
        let v = SparseVec::from_pairs(vec![(1, 1.0), (2, 3.0)]);
        let out = Normalization::PivotedByte.apply(v, 4.0, &pivot);
        assert_eq!(out.to_pairs(), vec![(1, 0.25), (2, 0.75)]);
    }

    #[test]
    fn custom_normalizer_is_called() {
        let custom = Normalization::Custom(CustomNormalizer::new(|v| v.scale(2.0)));
        let pivot = PivotParams { pivot: Some(1.0), slope: 0.5 };
        let out = custom.apply(SparseVec::from_pairs(vec![(3, 1.5)]), 10.0, &pivot);
        assert_eq!(out.to_pairs(), vec![(3, 3.0)]);
    }
}
