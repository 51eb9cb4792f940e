use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use guide_core::model::{PageId, QuestionId};
use guide_core::progress::{ExpansionCount, ScrollMetrics, blended_progress, expansion_progress};
use guide_core::settings::ProgressWeights;

use crate::error::StateError;
use crate::study_state::StudyState;

/// Derives a page's completion percentage from scroll depth and expanded
/// questions, and stores it through `StudyState`.
///
/// Scroll events are coalesced: `request_frame` hands out at most one pending
/// evaluation at a time, and `on_frame` (or `abandon_frame`) releases it.
#[derive(Clone)]
pub struct ProgressTracker {
    state: StudyState,
    page: PageId,
    questions: Arc<[QuestionId]>,
    weights: ProgressWeights,
    frame_pending: Arc<AtomicBool>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(
        state: StudyState,
        page: PageId,
        questions: Vec<QuestionId>,
        weights: ProgressWeights,
    ) -> Self {
        Self {
            state,
            page,
            questions: questions.into(),
            weights,
            frame_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn page(&self) -> &PageId {
        &self.page
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionId] {
        &self.questions
    }

    #[must_use]
    pub fn expansion(&self) -> ExpansionCount {
        self.state.expansion_count(&self.questions)
    }

    /// Record expansion-only progress when a page opens. Pages without
    /// questions are left untouched and yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the new value cannot be persisted.
    pub async fn initialize(&self) -> Result<Option<u8>, StateError> {
        let Some(percent) = expansion_progress(self.expansion()) else {
            return Ok(None);
        };
        self.state.set_page_progress(&self.page, percent).await?;
        Ok(Some(percent))
    }

    /// Claim the next frame. Returns `false` while an evaluation is already
    /// pending, in which case the scroll event is dropped.
    #[must_use]
    pub fn request_frame(&self) -> bool {
        self.frame_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release a claimed frame without evaluating, e.g. when metrics could
    /// not be read.
    pub fn abandon_frame(&self) {
        self.frame_pending.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn compute(&self, metrics: &ScrollMetrics) -> u8 {
        blended_progress(self.weights, metrics, self.expansion())
    }

    /// Evaluate the claimed frame and store the blended percentage.
    ///
    /// The write is skipped when the stored value is already current.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the new value cannot be persisted.
    pub async fn on_frame(&self, metrics: ScrollMetrics) -> Result<u8, StateError> {
        self.abandon_frame();
        let percent = self.compute(&metrics);
        if self.state.page_progress(&self.page) != percent {
            self.state.set_page_progress(&self.page, percent).await?;
        }
        Ok(percent)
    }
}
