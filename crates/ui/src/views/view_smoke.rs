use guide_core::model::{ChecklistItemId, PageId, QuestionId};

use crate::vm::{EMPTY_HINT, EMPTY_MESSAGE};

use super::test_harness::{setup_view_harness, test_services};

const INCIDENT_RESPONSE: &str = "pages/incident-response.html";

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_renders_sections_and_badges() {
    let services = test_services().await;
    let state = services.state();
    state
        .set_page_progress(&PageId::new("incident-response"), 100)
        .await
        .expect("save progress");
    state
        .set_page_progress(&PageId::new("telephony"), 40)
        .await
        .expect("save progress");

    let mut harness = setup_view_harness(services, None);
    harness.settle().await;
    let html = harness.render();

    for expected in ["Security", "Infrastructure", "Interview", "Incident Response", "Overall Progress"] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(html.contains("10% Complete"), "missing overall progress in {html}");
    assert!(html.contains("✓"), "missing completed badge in {html}");
    assert!(html.contains("40%"), "missing partial badge in {html}");
    assert!(
        html.contains("Work through each topic"),
        "missing landing content in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn empty_bookmarks_panel_shows_hint() {
    let services = test_services().await;
    let mut harness = setup_view_harness(services, None);
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains(EMPTY_MESSAGE), "missing empty message in {html}");
    assert!(html.contains(EMPTY_HINT), "missing empty hint in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn page_smoke_renders_questions_checklist_and_code() {
    let services = test_services().await;
    services
        .state()
        .toggle_checklist_item(&ChecklistItemId::new("ir-1"))
        .await
        .expect("toggle item");

    let mut harness = setup_view_harness(services, Some(INCIDENT_RESPONSE));
    harness.settle().await;
    let html = harness.render();

    assert!(
        html.contains("What are the phases of incident response?"),
        "missing question in {html}"
    );
    assert!(html.contains("1/2 (50%)"), "missing checklist counter in {html}");
    assert!(html.contains("checklist-item checked"), "missing checked item in {html}");
    assert!(html.contains("Get-WinEvent -LogName Security"), "missing code in {html}");
    assert!(html.contains("Copy"), "missing copy control in {html}");
    assert!(html.contains("tab-btn active"), "missing active tab in {html}");
    assert!(html.contains("tab-content active"), "missing active panel in {html}");
    assert!(
        html.contains(r#"id="incident-response-q0""#),
        "missing page scoped question id in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn saved_expansion_and_bookmarks_restore_on_render() {
    let services = test_services().await;
    let state = services.state();
    let page = PageId::new("incident-response");
    state
        .set_question_expanded(&QuestionId::new("incident-response-q0"), true)
        .await
        .expect("expand");
    state
        .add_bookmark(
            &page,
            &QuestionId::new("chain-of-custody"),
            "Why does chain of custody matter?",
        )
        .await
        .expect("bookmark");

    let mut harness = setup_view_harness(services, Some(INCIDENT_RESPONSE));
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("question-content show"), "missing expanded card in {html}");
    assert!(html.contains("★"), "missing bookmarked star in {html}");
    assert!(html.contains("bookmark-item"), "missing bookmark row in {html}");
    assert!(!html.contains(EMPTY_MESSAGE), "unexpected empty message in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn fragment_launch_expands_target_and_records_progress() {
    let services = test_services().await;
    let address = format!("{INCIDENT_RESPONSE}#chain-of-custody");
    let mut harness = setup_view_harness(services, Some(&address));
    harness.settle().await;

    let state = harness.state();
    assert!(state.is_question_expanded(&QuestionId::new("chain-of-custody")));
    assert!(!state.is_question_expanded(&QuestionId::new("incident-response-q0")));
    assert_eq!(state.page_progress(&PageId::new("incident-response")), 50);
    let html = harness.render();
    assert!(html.contains("question-content show"), "missing expanded card in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_launch_address_falls_back_to_dashboard() {
    let services = test_services().await;
    let mut harness = setup_view_harness(services, Some("pages/not-a-page.html"));
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Interview Prep Dashboard"), "missing dashboard in {html}");
    assert!(html.contains("Overall Progress"), "missing overview in {html}");
}
