use crate::{
    error::{Error, Result},
    vectorizer::{scheme::Normalization, TfidfModel},
};

/// Binary persistence of a fitted model.
///
/// The encoded data holds the resolved scheme (mnemonic and overrides) and
/// the corpus statistics: document count, document frequencies, idf weights,
/// pivot and slope. A custom normalizer is code, so a model using one cannot
/// be stored.
impl TfidfModel {
    /// Encode as CBOR.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        if let Normalization::Custom(_) = self.scheme().normalization() {
            return Err(Error::UnpersistableNormalizer);
        }
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Decode a model written by [`TfidfModel::to_cbor`].
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}
