use serde::Deserialize;
use thiserror::Error;

/// Weights of the two progress signals. They need not sum to 1; the blended
/// result is clamped to 0..=100 either way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressWeights {
    pub scroll: f64,
    pub expansion: f64,
}

impl Default for ProgressWeights {
    fn default() -> Self {
        Self {
            scroll: 0.3,
            expansion: 0.7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchSettings {
    /// Queries shorter than this (after trimming) return nothing.
    pub min_query_chars: usize,
    pub max_results: usize,
    /// Characters of context on each side of the first match in an excerpt.
    pub excerpt_context_chars: usize,
    /// Body text kept per index entry.
    pub content_limit_chars: usize,
    /// Characters shown when the body has no match.
    pub lead_in_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            max_results: 10,
            excerpt_context_chars: 50,
            content_limit_chars: 500,
            lead_in_chars: 100,
        }
    }
}

/// Tunables for the guide's client-side behaviour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideSettings {
    pub progress: ProgressWeights,
    pub search: SearchSettings,
    pub bookmark_preview_chars: usize,
    pub copy_feedback_ms: u64,
    pub fragment_scroll_delay_ms: u64,
}

impl Default for GuideSettings {
    fn default() -> Self {
        Self {
            progress: ProgressWeights::default(),
            search: SearchSettings::default(),
            bookmark_preview_chars: 80,
            copy_feedback_ms: 2000,
            fragment_scroll_delay_ms: 100,
        }
    }
}

/// Unvalidated settings as read from a config file. Absent fields keep their
/// defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GuideSettingsDraft {
    pub scroll_weight: Option<f64>,
    pub expansion_weight: Option<f64>,
    pub min_query_chars: Option<usize>,
    pub max_results: Option<usize>,
    pub excerpt_context_chars: Option<usize>,
    pub content_limit_chars: Option<usize>,
    pub bookmark_preview_chars: Option<usize>,
    pub copy_feedback_ms: Option<u64>,
    pub fragment_scroll_delay_ms: Option<u64>,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("progress weight {0} must be a finite, non-negative number")]
    InvalidWeight(f64),

    #[error("progress weights cannot both be zero")]
    ZeroWeights,

    #[error("max results must be > 0")]
    InvalidMaxResults,

    #[error("min query length must be > 0")]
    InvalidMinQuery,
}

impl GuideSettingsDraft {
    /// Merge onto the defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` for negative/non-finite weights, two zero
    /// weights, or zero limits.
    pub fn validate(self) -> Result<GuideSettings, SettingsError> {
        let defaults = GuideSettings::default();

        let scroll = self.scroll_weight.unwrap_or(defaults.progress.scroll);
        let expansion = self.expansion_weight.unwrap_or(defaults.progress.expansion);
        for weight in [scroll, expansion] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SettingsError::InvalidWeight(weight));
            }
        }
        if scroll == 0.0 && expansion == 0.0 {
            return Err(SettingsError::ZeroWeights);
        }

        let max_results = self.max_results.unwrap_or(defaults.search.max_results);
        if max_results == 0 {
            return Err(SettingsError::InvalidMaxResults);
        }
        let min_query_chars = self
            .min_query_chars
            .unwrap_or(defaults.search.min_query_chars);
        if min_query_chars == 0 {
            return Err(SettingsError::InvalidMinQuery);
        }

        Ok(GuideSettings {
            progress: ProgressWeights { scroll, expansion },
            search: SearchSettings {
                min_query_chars,
                max_results,
                excerpt_context_chars: self
                    .excerpt_context_chars
                    .unwrap_or(defaults.search.excerpt_context_chars),
                content_limit_chars: self
                    .content_limit_chars
                    .unwrap_or(defaults.search.content_limit_chars),
                lead_in_chars: defaults.search.lead_in_chars,
            },
            bookmark_preview_chars: self
                .bookmark_preview_chars
                .unwrap_or(defaults.bookmark_preview_chars),
            copy_feedback_ms: self.copy_feedback_ms.unwrap_or(defaults.copy_feedback_ms),
            fragment_scroll_delay_ms: self
                .fragment_scroll_delay_ms
                .unwrap_or(defaults.fragment_scroll_delay_ms),
        })
    }
}
