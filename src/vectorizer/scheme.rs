//! SMART weighting-scheme mnemonics.
//!
//! A mnemonic such as `nfc` or `Ltu` names one local weight, one global
//! weight and one normalization. `u` (pivoted unique) normalization may carry a
//! fourth letter choosing the local weight used to measure document length.

use std::{fmt, str::FromStr, sync::Arc};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{error::{Error, Result}, utils::math::vector::SparseVec};

/// Term-frequency (local) weighting, position 1 of the mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalWeight {
    /// `b`: 1 when the term is present
    Binary,
    /// `n` / `t`: raw term frequency
    Raw,
    /// `a`: 0.5 + 0.5 * tf / max tf of the document
    Augmented,
    /// `l`: 1 + ln(tf)
    Log,
    /// `d`: 1 + ln(1 + ln(tf))
    DoubleLog,
    /// `L`: (1 + ln(tf)) / (1 + ln(average tf of the document))
    LogAverage,
}

impl LocalWeight {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'b' => Some(LocalWeight::Binary),
            'n' | 't' => Some(LocalWeight::Raw),
            'a' => Some(LocalWeight::Augmented),
            'l' => Some(LocalWeight::Log),
            'd' => Some(LocalWeight::DoubleLog),
            'L' => Some(LocalWeight::LogAverage),
            _ => None,
        }
    }

    /// Canonical SMART letter.
    pub fn code(&self) -> char {
        match self {
            LocalWeight::Binary => 'b',
            LocalWeight::Raw => 'n',
            LocalWeight::Augmented => 'a',
            LocalWeight::Log => 'l',
            LocalWeight::DoubleLog => 'd',
            LocalWeight::LogAverage => 'L',
        }
    }
}

/// Document-frequency (global) weighting, position 2 of the mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalWeight {
    /// `x` / `n`: constant 1
    None,
    /// `f`: ln(N / df)
    Idf,
    /// `t`: ln((N + 1) / df)
    ZeroCorrectedIdf,
    /// `p`: max(0, ln((N - df) / df))
    ProbabilisticIdf,
}

impl GlobalWeight {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'x' | 'n' => Some(GlobalWeight::None),
            'f' => Some(GlobalWeight::Idf),
            't' => Some(GlobalWeight::ZeroCorrectedIdf),
            'p' => Some(GlobalWeight::ProbabilisticIdf),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            GlobalWeight::None => 'n',
            GlobalWeight::Idf => 'f',
            GlobalWeight::ZeroCorrectedIdf => 't',
            GlobalWeight::ProbabilisticIdf => 'p',
        }
    }
}

/// Caller-supplied normalization function.
#[derive(Clone)]
pub struct CustomNormalizer(pub Arc<dyn Fn(SparseVec) -> SparseVec + Send + Sync>);

impl CustomNormalizer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(SparseVec) -> SparseVec + Send + Sync + 'static,
    {
        CustomNormalizer(Arc::new(f))
    }

    #[inline]
    pub fn call(&self, vec: SparseVec) -> SparseVec {
        (self.0)(vec)
    }
}

impl fmt::Debug for CustomNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomNormalizer(..)")
    }
}

impl PartialEq for CustomNormalizer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Document normalization, position 3 of the mnemonic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Normalization {
    /// `x` / `n`
    None,
    /// `c`: unit L2 length
    Cosine,
    /// `u`: pivoted by the number of distinct terms
    PivotedUnique,
    /// `b`: pivoted by the document length
    PivotedByte,
    /// Caller-supplied function; never persisted.
    #[serde(skip)]
    Custom(CustomNormalizer),
}

impl Normalization {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'x' | 'n' => Some(Normalization::None),
            'c' => Some(Normalization::Cosine),
            'u' => Some(Normalization::PivotedUnique),
            'b' => Some(Normalization::PivotedByte),
            _ => None,
        }
    }

    /// SMART letter, `None` for a custom normalizer.
    pub fn code(&self) -> Option<char> {
        match self {
            Normalization::None => Some('n'),
            Normalization::Cosine => Some('c'),
            Normalization::PivotedUnique => Some('u'),
            Normalization::PivotedByte => Some('b'),
            Normalization::Custom(_) => None,
        }
    }

    #[inline]
    pub fn is_pivoted(&self) -> bool {
        matches!(self, Normalization::PivotedUnique | Normalization::PivotedByte)
    }
}

/// Resolved weighting scheme.
/// Fixed once a model is fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    mnemonic: String,
    local: LocalWeight,
    global: GlobalWeight,
    normalization: Normalization,
    /// local weight used when measuring document length for pivoting
    length_local: LocalWeight,
}

impl Scheme {
    /// Parse a 3 or 4 letter SMART mnemonic.
    ///
    /// ```
    /// use smart_tfidf::{GlobalWeight, LocalWeight, Normalization, Scheme};
    ///
    /// let scheme = Scheme::resolve("Lpu").unwrap();
    /// assert_eq!(scheme.local(), LocalWeight::LogAverage);
    /// assert_eq!(scheme.global(), GlobalWeight::ProbabilisticIdf);
    /// assert_eq!(scheme.normalization(), &Normalization::PivotedUnique);
    /// assert!(Scheme::resolve("xyz9").is_err());
    /// ```
    pub fn resolve(mnemonic: &str) -> Result<Self> {
        let codes: Vec<char> = mnemonic.chars().collect();
        if codes.len() != 3 && codes.len() != 4 {
            return Err(Error::invalid_scheme(
                mnemonic,
                format!("expected 3 or 4 letters, got {}", codes.len()),
            ));
        }

        let local = LocalWeight::from_code(codes[0]).ok_or_else(|| {
            Error::invalid_scheme(
                mnemonic,
                format!("local weight `{}` at position 1 is not one of b, n, t, a, l, d, L", codes[0]),
            )
        })?;
        let global = GlobalWeight::from_code(codes[1]).ok_or_else(|| {
            Error::invalid_scheme(
                mnemonic,
                format!("global weight `{}` at position 2 is not one of x, n, f, t, p", codes[1]),
            )
        })?;
        let normalization = Normalization::from_code(codes[2]).ok_or_else(|| {
            Error::invalid_scheme(
                mnemonic,
                format!("normalization `{}` at position 3 is not one of x, n, c, u, b", codes[2]),
            )
        })?;

        let length_local = match codes.get(3) {
            None => LocalWeight::Raw,
            Some(&code) => {
                if normalization != Normalization::PivotedUnique {
                    return Err(Error::invalid_scheme(
                        mnemonic,
                        "a fourth letter is only allowed with pivoted unique (`u`) normalization",
                    ));
                }
                LocalWeight::from_code(code).ok_or_else(|| {
                    Error::invalid_scheme(
                        mnemonic,
                        format!("length weight `{code}` at position 4 is not one of b, n, t, a, l, d, L"),
                    )
                })?
            }
        };

        trace!("resolved SMART scheme {mnemonic}: {local:?}/{global:?}/{normalization:?}");
        Ok(Scheme {
            mnemonic: mnemonic.to_string(),
            local,
            global,
            normalization,
            length_local,
        })
    }

    /// Replace the local weight, keeping the raw mnemonic.
    #[must_use]
    pub fn with_local(mut self, local: LocalWeight) -> Self {
        self.local = local;
        self
    }

    #[must_use]
    pub fn with_global(mut self, global: GlobalWeight) -> Self {
        self.global = global;
        self
    }

    #[must_use]
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// The mnemonic as given by the caller.
    #[inline]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    #[inline]
    pub fn local(&self) -> LocalWeight {
        self.local
    }

    #[inline]
    pub fn global(&self) -> GlobalWeight {
        self.global
    }

    #[inline]
    pub fn normalization(&self) -> &Normalization {
        &self.normalization
    }

    /// Local weight used to measure document length.
    /// Only `u` normalization reads the fourth letter; `b` measures with the
    /// scheme's own local weight.
    #[inline]
    pub fn length_local(&self) -> LocalWeight {
        match self.normalization {
            Normalization::PivotedUnique => self.length_local,
            _ => self.local,
        }
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Scheme {
            mnemonic: "nfc".to_string(),
            local: LocalWeight::Raw,
            global: GlobalWeight::Idf,
            normalization: Normalization::Cosine,
            length_local: LocalWeight::Raw,
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scheme::resolve(s)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_legal_letter() {
        for (code, expect) in [
            ('b', LocalWeight::Binary),
            ('n', LocalWeight::Raw),
            ('t', LocalWeight::Raw),
            ('a', LocalWeight::Augmented),
            ('l', LocalWeight::Log),
            ('d', LocalWeight::DoubleLog),
            ('L', LocalWeight::LogAverage),
        ] {
            let scheme = Scheme::resolve(&format!("{code}nn")).unwrap();
            assert_eq!(scheme.local(), expect, "local `{code}`");
        }
        for (code, expect) in [
            ('x', GlobalWeight::None),
            ('n', GlobalWeight::None),
            ('f', GlobalWeight::Idf),
            ('t', GlobalWeight::ZeroCorrectedIdf),
            ('p', GlobalWeight::ProbabilisticIdf),
        ] {
            let scheme = Scheme::resolve(&format!("n{code}n")).unwrap();
            assert_eq!(scheme.global(), expect, "global `{code}`");
        }
        for (code, expect) in [
            ('x', Normalization::None),
            ('n', Normalization::None),
            ('c', Normalization::Cosine),
            ('u', Normalization::PivotedUnique),
            ('b', Normalization::PivotedByte),
        ] {
            let scheme = Scheme::resolve(&format!("nn{code}")).unwrap();
            assert_eq!(scheme.normalization(), &expect, "normalization `{code}`");
        }
    }

    #[test]
    fn default_is_nfc() {
        assert_eq!(Scheme::default(), Scheme::resolve("nfc").unwrap());
        assert_eq!(Scheme::default().to_string(), "nfc");
    }

    #[test]
    fn rejects_unknown_global_letter() {
        match Scheme::resolve("xyz9") {
            Err(Error::InvalidScheme { mnemonic, reason }) => {
                assert_eq!(mnemonic, "xyz9");
                assert!(reason.contains("position 1") || reason.contains("position 2"), "{reason}");
            }
            other => panic!("expected InvalidScheme, got {other:?}"),
        }
        match Scheme::resolve("nyc") {
            Err(Error::InvalidScheme { reason, .. }) => assert!(reason.contains("`y` at position 2")),
            other => panic!("expected InvalidScheme, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        for bad in ["", "nf", "nfcnn"] {
            assert!(matches!(Scheme::resolve(bad), Err(Error::InvalidScheme { .. })), "{bad:?}");
        }
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert!(Scheme::resolve("NFC").is_err());
        assert!(Scheme::resolve("nfC").is_err());
        assert_eq!(Scheme::resolve("Lfc").unwrap().local(), LocalWeight::LogAverage);
    }

    #[test]
    fn fourth_letter_only_with_pivoted_unique() {
        let scheme = Scheme::resolve("nfub").unwrap();
        assert_eq!(scheme.length_local(), LocalWeight::Binary);
        assert_eq!(Scheme::resolve("nfu").unwrap().length_local(), LocalWeight::Raw);

        assert!(Scheme::resolve("nfcb").is_err());
        assert!(Scheme::resolve("nfbn").is_err());
        assert!(Scheme::resolve("nfuz").is_err());
    }

    #[test]
    fn pivoted_byte_measures_with_its_local_weight() {
        assert_eq!(Scheme::resolve("lfb").unwrap().length_local(), LocalWeight::Log);
    }

    #[test]
    fn overrides_keep_mnemonic() {
        let scheme = Scheme::resolve("nfc")
            .unwrap()
            .with_local(LocalWeight::Log)
            .with_global(GlobalWeight::ProbabilisticIdf)
            .with_normalization(Normalization::None);
        assert_eq!(scheme.mnemonic(), "nfc");
        assert_eq!(scheme.local().code(), 'l');
        assert_eq!(scheme.global().code(), 'p');
        assert_eq!(scheme.normalization().code(), Some('n'));
    }

    #[test]
    fn parse_via_from_str() {
        let scheme: Scheme = "btn".parse().unwrap();
        assert_eq!(scheme.global(), GlobalWeight::ZeroCorrectedIdf);
    }
}
