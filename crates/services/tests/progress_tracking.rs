use guide_core::model::{PageId, PageTable, QuestionId};
use guide_core::progress::ScrollMetrics;
use guide_core::settings::GuideSettings;
use guide_core::time::fixed_now;
use services::{Clock, GuideServices};
use storage::repository::Storage;

async fn services() -> GuideServices {
    GuideServices::new(
        Storage::in_memory(),
        PageTable::builtin(),
        GuideSettings::default(),
        Clock::fixed(fixed_now()),
    )
    .await
}

fn questions(page: &PageId, n: usize) -> Vec<QuestionId> {
    (0..n).map(|i| QuestionId::positional(page, i)).collect()
}

fn bottom() -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: 1000.0,
        scroll_height: 1800.0,
        viewport_height: 800.0,
    }
}

#[tokio::test]
async fn blend_of_full_scroll_and_half_expanded_is_65() {
    let services = services().await;
    let page = PageId::new("incident-response");
    let ids = questions(&page, 4);
    let state = services.state();
    state.set_questions_expanded(&ids[..2], true).await.unwrap();

    let tracker = services.tracker(page.clone(), ids);
    assert!(tracker.request_frame());
    assert_eq!(tracker.on_frame(bottom()).await.unwrap(), 65);
    assert_eq!(state.page_progress(&page), 65);
}

#[tokio::test]
async fn initialize_uses_expansion_only() {
    let services = services().await;
    let page = PageId::new("telephony");
    let ids = questions(&page, 3);
    services
        .state()
        .set_question_expanded(&ids[0], true)
        .await
        .unwrap();

    let tracker = services.tracker(page.clone(), ids);
    assert_eq!(tracker.initialize().await.unwrap(), Some(33));
    assert_eq!(services.state().page_progress(&page), 33);
}

#[tokio::test]
async fn initialize_skips_pages_without_questions() {
    let services = services().await;
    let page = PageId::new("thirty-sixty-ninety");
    services.state().set_page_progress(&page, 70).await.unwrap();

    let tracker = services.tracker(page.clone(), Vec::new());
    assert_eq!(tracker.initialize().await.unwrap(), None);
    assert_eq!(services.state().page_progress(&page), 70);
}

#[tokio::test]
async fn page_without_questions_counts_as_fully_expanded() {
    let services = services().await;
    let tracker = services.tracker(PageId::new("backup-dr"), Vec::new());
    let top = ScrollMetrics {
        scroll_top: 0.0,
        scroll_height: 2000.0,
        viewport_height: 1000.0,
    };
    assert_eq!(tracker.compute(&top), 70);
}

#[tokio::test]
async fn frames_are_coalesced_until_evaluated() {
    let services = services().await;
    let page = PageId::new("backup-dr");
    let tracker = services.tracker(page.clone(), questions(&page, 2));

    assert!(tracker.request_frame());
    assert!(!tracker.request_frame());
    assert!(tracker.clone().is_frame_pending());

    tracker.on_frame(bottom()).await.unwrap();
    assert!(!tracker.is_frame_pending());
    assert!(tracker.request_frame());

    tracker.abandon_frame();
    assert!(tracker.request_frame());
}

#[tokio::test]
async fn unchanged_progress_is_not_rewritten() {
    let services = services().await;
    let state = services.state();
    let page = PageId::new("backup-dr");
    let tracker = services.tracker(page.clone(), questions(&page, 2));

    tracker.on_frame(bottom()).await.unwrap();
    let revision = state.revision();
    tracker.on_frame(bottom()).await.unwrap();
    assert_eq!(state.revision(), revision);
}

#[tokio::test]
async fn tracked_pages_feed_total_progress() {
    let services = services().await;
    let state = services.state();
    for page in ["telephony", "backup-dr"] {
        let page = PageId::new(page);
        let ids = questions(&page, 1);
        state.set_questions_expanded(&ids, true).await.unwrap();
        let tracker = services.tracker(page, ids);
        tracker.on_frame(bottom()).await.unwrap();
    }
    // two of fourteen pages at 100
    assert_eq!(state.total_progress(), 14);
}

#[tokio::test]
async fn expanding_one_page_leaves_other_pages_untouched() {
    let services = services().await;
    let state = services.state();
    let cyber = PageId::new("cybersecurity-fundamentals");
    let telephony = PageId::new("telephony");
    state
        .set_questions_expanded(&questions(&cyber, 3), true)
        .await
        .unwrap();

    let tracker = services.tracker(telephony.clone(), questions(&telephony, 3));
    assert_eq!(
        state.expansion_count(&questions(&telephony, 3)).expanded,
        0
    );
    assert_eq!(tracker.initialize().await.unwrap(), Some(0));
    assert_eq!(state.page_progress(&telephony), 0);
}
