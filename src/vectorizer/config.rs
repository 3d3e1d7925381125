use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    utils::math::vector::SparseVec,
    vectorizer::{
        corpus::DocumentFrequencies,
        scheme::{CustomNormalizer, GlobalWeight, LocalWeight, Normalization, Scheme},
        TfidfModel,
    },
};

/// How the pivot of pivoted normalization is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pivot {
    /// no pivot: divide by the plain document length
    #[default]
    None,
    /// mean document length of the fit corpus
    Auto,
    /// caller-chosen value
    Fixed(f64),
}

/// Options of a [`TfidfEngine`](crate::TfidfEngine).
///
/// Defaults: scheme `nfc`, normalization on, no pivot, slope 0.65.
/// Explicit `local_weight` / `global_weight` beat the mnemonic letters,
/// `normalize = false` disables normalization, and a custom normalizer beats both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TfidfConfig {
    /// SMART mnemonic
    pub smartirs: String,
    pub pivot: Pivot,
    pub slope: f64,
    pub normalize: bool,
    pub local_weight: Option<LocalWeight>,
    pub global_weight: Option<GlobalWeight>,
    /// precomputed table; skips the corpus scan during fit
    pub document_frequencies: Option<DocumentFrequencies>,
    #[serde(skip)]
    pub normalizer: Option<CustomNormalizer>,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            smartirs: "nfc".to_string(),
            pivot: Pivot::None,
            slope: 0.65,
            normalize: true,
            local_weight: None,
            global_weight: None,
            document_frequencies: None,
            normalizer: None,
        }
    }
}

impl TfidfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_smartirs(mut self, mnemonic: &str) -> Self {
        self.smartirs = mnemonic.to_string();
        self
    }

    #[must_use]
    pub fn with_pivot(mut self, pivot: Pivot) -> Self {
        self.pivot = pivot;
        self
    }

    #[must_use]
    pub fn with_slope(mut self, slope: f64) -> Self {
        self.slope = slope;
        self
    }

    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    #[must_use]
    pub fn with_local_weight(mut self, local: LocalWeight) -> Self {
        self.local_weight = Some(local);
        self
    }

    #[must_use]
    pub fn with_global_weight(mut self, global: GlobalWeight) -> Self {
        self.global_weight = Some(global);
        self
    }

    #[must_use]
    pub fn with_document_frequencies(mut self, freqs: DocumentFrequencies) -> Self {
        self.document_frequencies = Some(freqs);
        self
    }

    /// Replace normalization with a caller-supplied function.
    #[must_use]
    pub fn with_normalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(SparseVec) -> SparseVec + Send + Sync + 'static,
    {
        self.normalizer = Some(CustomNormalizer::new(f));
        self
    }

    /// Options that resolve to the scheme of a fitted model.
    ///
    /// The model's pivot, if any, becomes a fixed pivot. No frequency table
    /// is carried over.
    pub fn from_model(model: &TfidfModel) -> Self {
        let scheme = model.scheme();
        let stats = model.statistics();
        let normalizer = match scheme.normalization() {
            Normalization::Custom(custom) => Some(custom.clone()),
            _ => None,
        };
        TfidfConfig {
            smartirs: scheme.mnemonic().to_string(),
            pivot: stats.pivot().map_or(Pivot::None, Pivot::Fixed),
            slope: stats.slope(),
            normalize: *scheme.normalization() != Normalization::None,
            local_weight: Some(scheme.local()),
            global_weight: Some(scheme.global()),
            document_frequencies: None,
            normalizer,
        }
    }

    /// Resolve the mnemonic and apply the overrides.
    pub fn scheme(&self) -> Result<Scheme> {
        let mut scheme = Scheme::resolve(&self.smartirs)?;
        if let Some(local) = self.local_weight {
            scheme = scheme.with_local(local);
        }
        if let Some(global) = self.global_weight {
            scheme = scheme.with_global(global);
        }
        if let Some(custom) = &self.normalizer {
            scheme = scheme.with_normalization(Normalization::Custom(custom.clone()));
        } else if !self.normalize {
            scheme = scheme.with_normalization(Normalization::None);
        }
        Ok(scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults_follow_smart_nfc() {
        let config = TfidfConfig::default();
        assert_eq!(config.smartirs, "nfc");
        assert_eq!(config.slope, 0.65);
        assert_eq!(config.pivot, Pivot::None);
        assert_eq!(config.scheme().unwrap(), Scheme::default());
    }

    #[test]
    fn overrides_apply_over_the_mnemonic() {
        let scheme = TfidfConfig::new()
            .with_smartirs("nfc")
            .with_local_weight(LocalWeight::Log)
            .with_global_weight(GlobalWeight::None)
            .with_normalize(false)
            .scheme()
            .unwrap();
        assert_eq!(scheme.local(), LocalWeight::Log);
        assert_eq!(scheme.global(), GlobalWeight::None);
        assert_eq!(scheme.normalization(), &Normalization::None);
        assert_eq!(scheme.mnemonic(), "nfc");
    }

    #[test]
    fn custom_normalizer_beats_normalize_flag() {
        let scheme = TfidfConfig::new()
            .with_normalize(false)
            .with_normalizer(|v| v)
            .scheme()
            .unwrap();
        assert!(matches!(scheme.normalization(), Normalization::Custom(_)));
    }

    #[test]
    fn bad_mnemonic_surfaces_from_scheme() {
        let res = TfidfConfig::new().with_smartirs("nfz").scheme();
        assert!(matches!(res, Err(Error::InvalidScheme { .. })));
    }

    #[test]
    fn config_rebuilt_from_model_resolves_to_its_scheme() {
        let corpus = vec![vec![(0u32, 1u32), (1, 2)], vec![(1, 1), (2, 1)]];
        let config = TfidfConfig::new()
            .with_smartirs("ltu")
            .with_pivot(Pivot::Auto)
            .with_slope(0.3)
            .with_global_weight(GlobalWeight::Idf);
        let model = TfidfModel::fit(&corpus, &config).unwrap();

        let rebuilt = TfidfConfig::from_model(&model);
        assert_eq!(&rebuilt.scheme().unwrap(), model.scheme());
        assert_eq!(rebuilt.pivot, Pivot::Fixed(model.statistics().pivot().unwrap()));
        assert_eq!(rebuilt.slope, 0.3);
        assert!(rebuilt.document_frequencies.is_none());
    }

    #[test]
    fn deserializes_from_partial_json() {
        let config: TfidfConfig =
            serde_json::from_str(r#"{"smartirs":"ltu","pivot":"auto","slope":0.2}"#).unwrap();
        assert_eq!(config.smartirs, "ltu");
        assert_eq!(config.pivot, Pivot::Auto);
        assert_eq!(config.slope, 0.2);
        assert!(config.normalize);

        let config: TfidfConfig = serde_json::from_str(r#"{"pivot":{"fixed":12.5}}"#).unwrap();
        assert_eq!(config.pivot, Pivot::Fixed(12.5));
        assert_eq!(config.smartirs, "nfc");
    }
}
