use super::SparseVec;

impl SparseVec {
    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.vals().iter().map(|v| v * v).sum()
    }

    /// L2 norm
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Sum of absolute values
    #[inline]
    pub fn l1_norm(&self) -> f64 {
        self.vals().iter().map(|v| v.abs()).sum()
    }

    /// Multiply every entry by `factor`, dropping entries that become zero.
    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        let mut out = SparseVec::with_capacity(self.nnz());
        for (ind, val) in self.iter() {
            out.push(ind, val * factor);
        }
        out
    }
}
