pub mod math;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vocabulary id of a term.
pub type TermId = u32;

/// Sparse vector of term weights.
///
/// Holds `inds` (term ids) and `vals` (weights) side by side.
/// Ids are unique and strictly ascending, and zero weights are never stored:
/// a term missing from the vector has weight 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVec {
    inds: Vec<TermId>,
    vals: Vec<f64>,
}

impl SparseVec {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        SparseVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build from arbitrary pairs.
    /// Pairs are sorted by id, duplicate ids are summed and zeros dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (TermId, f64)>,
    {
        let mut pairs: Vec<(TermId, f64)> = pairs.into_iter().collect();
        // stable, so duplicates are summed in input order
        pairs.sort_by_key(|&(id, _)| id);

        let mut out = SparseVec::with_capacity(pairs.len());
        let mut iter = pairs.into_iter().peekable();
        while let Some((id, mut sum)) = iter.next() {
            while let Some((_, val)) = iter.next_if(|&(next, _)| next == id) {
                sum += val;
            }
            out.push(id, sum);
        }
        out
    }

    /// Append an entry after every id already stored.
    /// Zero values are skipped.
    #[inline]
    pub fn push(&mut self, ind: TermId, val: f64) {
        debug_assert!(
            self.inds.last().map_or(true, |&last| last < ind),
            "term ids must be pushed in ascending order"
        );
        if val != 0.0 {
            self.inds.push(ind);
            self.vals.push(val);
        }
    }

    /// number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    /// Weight of `ind`, 0.0 when absent.
    #[inline]
    pub fn get(&self, ind: TermId) -> f64 {
        match self.inds.binary_search(&ind) {
            Ok(pos) => self.vals[pos],
            Err(_) => 0.0,
        }
    }

    #[inline]
    pub fn contains(&self, ind: TermId) -> bool {
        self.inds.binary_search(&ind).is_ok()
    }

    #[inline]
    pub fn inds(&self) -> &[TermId] {
        &self.inds
    }

    #[inline]
    pub fn vals(&self) -> &[f64] {
        &self.vals
    }

    /// Iterate `(term id, weight)` in ascending id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (TermId, f64)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    #[inline]
    pub fn to_pairs(&self) -> Vec<(TermId, f64)> {
        self.iter().collect()
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }
}

impl FromIterator<(TermId, f64)> for SparseVec {
    fn from_iter<T: IntoIterator<Item = (TermId, f64)>>(iter: T) -> Self {
        SparseVec::from_pairs(iter)
    }
}

impl From<SparseVec> for Vec<(TermId, f64)> {
    fn from(vec: SparseVec) -> Self {
        vec.inds.into_iter().zip(vec.vals).collect()
    }
}

impl fmt::Display for SparseVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (n, (ind, val)) in self.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({ind}, {val:.6})")?;
        }
        write!(f, "]")
    }
}
