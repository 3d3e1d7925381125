pub mod config;
pub mod corpus;
pub mod scheme;
pub mod serde;
pub mod weight;

use log::debug;
use num::Num;
use ::serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    utils::math::vector::{SparseVec, TermId},
    vectorizer::{
        config::TfidfConfig,
        corpus::CorpusStatistics,
        scheme::Scheme,
        weight::TermCounts,
    },
};

/// A fitted TF-IDF model: a resolved scheme plus the corpus statistics.
///
/// Read-only after construction, so it can be shared between threads and
/// transform documents concurrently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfModel {
    scheme: Scheme,
    statistics: CorpusStatistics,
}

impl TfidfModel {
    /// Fit on `corpus` with the options of `config`.
    pub fn fit<N, D>(corpus: &[D], config: &TfidfConfig) -> Result<Self>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        let scheme = config.scheme()?;
        let statistics = match &config.document_frequencies {
            Some(freqs) => CorpusStatistics::from_frequencies(
                freqs.clone(),
                corpus,
                &scheme,
                config.pivot,
                config.slope,
            )?,
            None => CorpusStatistics::fit(corpus, &scheme, config.pivot, config.slope)?,
        };
        Ok(Self::from_parts(scheme, statistics))
    }

    /// Assemble a model from an already resolved scheme and statistics.
    pub fn from_parts(scheme: Scheme, statistics: CorpusStatistics) -> Self {
        TfidfModel { scheme, statistics }
    }

    /// Weigh one document.
    ///
    /// local weight → global weight → normalization; zero weights are dropped
    /// and the result is ordered by term id.
    pub fn transform_one<N>(&self, doc: &[(TermId, N)]) -> SparseVec
    where
        N: Num + Copy + Into<f64>,
    {
        let counts = TermCounts::from_document(doc);
        let weighted = self.statistics.weigh(&counts, self.scheme.local());
        let length = if self.scheme.normalization().is_pivoted() {
            self.statistics.document_length(&counts, &self.scheme)
        } else {
            0.0
        };
        let mut out = self
            .scheme
            .normalization()
            .apply(weighted, length, &self.statistics.pivot_params());
        out.shrink_to_fit();
        out
    }

    /// Weigh every document of `corpus`, in order.
    pub fn transform_many<N, D>(&self, corpus: &[D]) -> Vec<SparseVec>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        corpus.iter().map(|doc| self.transform_one(doc.as_ref())).collect()
    }

    #[inline]
    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    #[inline]
    pub fn statistics(&self) -> &CorpusStatistics {
        &self.statistics
    }
}

#[derive(Debug, Clone)]
enum EngineState {
    Unfitted,
    Fitted(TfidfModel),
}

/// Fit/transform front end around [`TfidfModel`].
///
/// Starts unfitted; every `fit` replaces the whole model, so statistics of an
/// earlier fit never leak into the next one. `fit` needs `&mut self` while the
/// transforms only need `&self`.
#[derive(Debug, Clone)]
pub struct TfidfEngine {
    config: TfidfConfig,
    state: EngineState,
}

impl Default for TfidfEngine {
    fn default() -> Self {
        Self::new(TfidfConfig::default())
    }
}

impl TfidfEngine {
    pub fn new(config: TfidfConfig) -> Self {
        TfidfEngine {
            config,
            state: EngineState::Unfitted,
        }
    }

    /// Wrap a model fitted elsewhere (e.g. restored from storage).
    ///
    /// Transforms use the model's own scheme and statistics; `config` only
    /// takes effect on the next `fit`. Use [`TfidfEngine::from_fitted`] to
    /// keep the scheme of the model for later fits too.
    pub fn from_model(config: TfidfConfig, model: TfidfModel) -> Self {
        TfidfEngine {
            config,
            state: EngineState::Fitted(model),
        }
    }

    /// Wrap a model with a config rebuilt from it: same mnemonic and weight
    /// overrides, the model's pivot as a fixed pivot and its slope.
    pub fn from_fitted(model: TfidfModel) -> Self {
        let config = TfidfConfig::from_model(&model);
        Self::from_model(config, model)
    }

    /// Fit on `corpus`, discarding any previous fit.
    ///
    /// On error the engine keeps its previous state.
    pub fn fit<N, D>(&mut self, corpus: &[D]) -> Result<&mut Self>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        let model = TfidfModel::fit(corpus, &self.config)?;
        if matches!(self.state, EngineState::Fitted(_)) {
            debug!("re-fit replaces previous model");
        }
        self.state = EngineState::Fitted(model);
        Ok(self)
    }

    /// Fit from the configured document frequencies alone.
    ///
    /// Fails with [`Error::MissingFrequencies`] when the config holds no table.
    pub fn fit_from_frequencies(&mut self) -> Result<&mut Self> {
        if self.config.document_frequencies.is_none() {
            return Err(Error::MissingFrequencies);
        }
        let none: &[Vec<(TermId, f64)>] = &[];
        self.fit(none)
    }

    /// Fit on `corpus`, then weigh the same corpus.
    pub fn fit_transform<N, D>(&mut self, corpus: &[D]) -> Result<Vec<SparseVec>>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        self.fit(corpus)?.transform_many(corpus)
    }

    /// Weigh one document; fails with [`Error::NotFitted`] before `fit`.
    pub fn transform_one<N>(&self, doc: &[(TermId, N)]) -> Result<SparseVec>
    where
        N: Num + Copy + Into<f64>,
    {
        Ok(self.model()?.transform_one(doc))
    }

    /// Weigh a corpus; fails with [`Error::NotFitted`] before `fit`.
    pub fn transform_many<N, D>(&self, corpus: &[D]) -> Result<Vec<SparseVec>>
    where
        N: Num + Copy + Into<f64>,
        D: AsRef<[(TermId, N)]>,
    {
        Ok(self.model()?.transform_many(corpus))
    }

    pub fn model(&self) -> Result<&TfidfModel> {
        match &self.state {
            EngineState::Fitted(model) => Ok(model),
            EngineState::Unfitted => Err(Error::NotFitted),
        }
    }

    /// Give up the fitted model.
    pub fn into_model(self) -> Result<TfidfModel> {
        match self.state {
            EngineState::Fitted(model) => Ok(model),
            EngineState::Unfitted => Err(Error::NotFitted),
        }
    }

    #[inline]
    pub fn is_fitted(&self) -> bool {
        matches!(self.state, EngineState::Fitted(_))
    }

    #[inline]
    pub fn config(&self) -> &TfidfConfig {
        &self.config
    }
}
