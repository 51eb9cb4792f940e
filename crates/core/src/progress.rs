use std::collections::BTreeMap;

use crate::model::{PageId, PageTable};
use crate::settings::ProgressWeights;

/// Page id → completion percentage.
pub type ProgressMap = BTreeMap<PageId, u8>;

/// JavaScript-style rounding (halves round up).
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Mean progress over every tracked (non-landing) page in the table, where
/// pages with no entry count as 0. Returns 0 when the table tracks nothing.
#[must_use]
pub fn total_progress(progress: &ProgressMap, pages: &PageTable) -> u8 {
    let (sum, count) = pages.tracked().fold((0u64, 0u64), |(sum, count), page| {
        let value = progress.get(page.id()).copied().unwrap_or(0);
        (sum + u64::from(value), count + 1)
    });
    if count == 0 {
        return 0;
    }
    let mean = (2 * sum + count) / (2 * count);
    u8::try_from(mean).unwrap_or(u8::MAX)
}

//
// ─── NAV STATUS ────────────────────────────────────────────────────────────────
//

/// Badge shown next to a navigation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavStatus {
    NotStarted,
    InProgress(u8),
    Complete,
}

impl NavStatus {
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            100 => Self::Complete,
            0 => Self::NotStarted,
            other => Self::InProgress(other),
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::NotStarted => String::new(),
            Self::InProgress(percent) => format!("{percent}%"),
            Self::Complete => "✓".to_string(),
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::NotStarted => "nav-status",
            Self::InProgress(_) => "nav-status in-progress",
            Self::Complete => "nav-status complete",
        }
    }
}

//
// ─── PAGE PROGRESS ─────────────────────────────────────────────────────────────
//

/// Scroll position of the page's content body.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Rounded scroll depth in percent; 100 when the content does not overflow.
    #[must_use]
    pub fn depth_percent(&self) -> f64 {
        let scrollable = self.scroll_height - self.viewport_height;
        if scrollable > 0.0 {
            round_half_up(self.scroll_top / scrollable * 100.0)
        } else {
            100.0
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpansionCount {
    pub expanded: usize,
    pub total: usize,
}

impl ExpansionCount {
    /// Unrounded share of expanded questions; 100 for a page without questions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.expanded as f64 / self.total as f64 * 100.0
        }
    }
}

/// Progress from expansion alone, used when a page first loads. `None` for
/// pages without questions.
#[must_use]
pub fn expansion_progress(count: ExpansionCount) -> Option<u8> {
    (count.total > 0).then(|| clamp_percent(round_half_up(count.percent())))
}

/// Weighted blend of scroll depth and expansion, rounded and clamped to 0..=100.
#[must_use]
pub fn blended_progress(
    weights: ProgressWeights,
    scroll: &ScrollMetrics,
    expansion: ExpansionCount,
) -> u8 {
    let blended =
        scroll.depth_percent() * weights.scroll + expansion.percent() * weights.expansion;
    clamp_percent(round_half_up(blended))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0) as u8
}

//
// ─── CHECKLIST ─────────────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChecklistTally {
    pub checked: usize,
    pub total: usize,
}

impl ChecklistTally {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        clamp_percent(round_half_up(
            self.checked as f64 / self.total as f64 * 100.0,
        ))
    }

    /// `checked/total (pct%)`, or `None` when the page has no items.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        (self.total > 0).then(|| format!("{}/{} ({}%)", self.checked, self.total, self.percent()))
    }
}
