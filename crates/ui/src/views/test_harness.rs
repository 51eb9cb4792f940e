use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::Router;
use guide_core::model::{PageDocument, PageId, PageTable, QuestionId};
use guide_core::settings::GuideSettings;
use guide_core::time::fixed_now;
use services::{Clock, GuideServices, PageLibraryService, ProgressTracker, StudyState};
use storage::content::InMemoryContent;
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::routes::Route;

use super::actions::{GuideDispatcher, use_guide_dispatcher_provider};
use super::intent::GuideIntent;
use super::state::{GuideUi, use_guide_ui_provider};

pub const LANDING_DOC: &str = r#"{
  "title": "Interview Prep Dashboard",
  "subtitle": "IT security and infrastructure",
  "blocks": [
    { "type": "paragraph", "text": "Work through each topic and track your progress." }
  ]
}"#;

pub const IR_DOC: &str = r#"{
  "title": "Incident Response",
  "subtitle": "NIST lifecycle",
  "blocks": [
    { "type": "heading", "text": "Fundamentals" },
    { "type": "question", "title": "What are the phases of incident response?",
      "body": [
        { "type": "paragraph", "text": "Preparation, detection, containment, eradication, recovery." },
        { "type": "code", "language": "powershell", "code": "Get-WinEvent -LogName Security" }
      ] },
    { "type": "question", "id": "chain-of-custody", "title": "Why does chain of custody matter?",
      "body": [ { "type": "list", "items": ["Evidence integrity", "Legal admissibility"] } ] },
    { "type": "checklist", "title": "Before the interview",
      "items": [
        { "id": "ir-1", "label": "Read the playbook" },
        { "id": "ir-2", "label": "Review a recent breach" }
      ] },
    { "type": "tabs",
      "tabs": [ { "target": "ir-win", "label": "Windows" }, { "target": "ir-linux", "label": "Linux" } ],
      "panels": [
        { "id": "ir-win", "body": [ { "type": "paragraph", "text": "Event Viewer first." } ] },
        { "id": "ir-linux", "body": [ { "type": "paragraph", "text": "Start with journalctl." } ] }
      ] }
  ]
}"#;

#[derive(Clone)]
struct TestApp {
    services: GuideServices,
    launch_address: Option<String>,
}

impl UiApp for TestApp {
    fn study_state(&self) -> StudyState {
        self.services.state()
    }

    fn library(&self) -> Arc<PageLibraryService> {
        self.services.library()
    }

    fn settings(&self) -> GuideSettings {
        *self.services.settings()
    }

    fn tracker(&self, page: PageId, questions: Vec<QuestionId>) -> ProgressTracker {
        self.services.tracker(page, questions)
    }

    fn launch_address(&self) -> Option<String> {
        self.launch_address.clone()
    }
}

#[derive(Clone, Default)]
pub struct HarnessHandles {
    dispatcher: Rc<RefCell<Option<GuideDispatcher>>>,
    ui: Rc<RefCell<Option<GuideUi>>>,
}

impl HarnessHandles {
    fn dispatcher(&self) -> GuideDispatcher {
        (*self.dispatcher.borrow()).expect("dispatcher registered")
    }

    fn ui(&self) -> GuideUi {
        (*self.ui.borrow()).expect("ui registered")
    }
}

#[derive(Props, Clone)]
struct GuideHarnessProps {
    app: Arc<TestApp>,
    handles: HarnessHandles,
}

impl PartialEq for GuideHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for GuideHarnessProps {}

#[component]
fn GuideHarness(props: GuideHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(app));
    let ui = use_guide_ui_provider();
    let dispatcher = use_guide_dispatcher_provider();
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.dispatcher.borrow_mut() = Some(dispatcher);
        *props.handles.ui.borrow_mut() = Some(ui);
    }
    rsx! { Router::<Route> {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: GuideServices,
    handles: HarnessHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then drive until navigation, page loads and their effects
    /// have run.
    pub async fn settle(&mut self) {
        self.rebuild();
        self.drive().await;
    }

    /// Drive spawned work and re-renders without rebuilding.
    pub async fn drive(&mut self) {
        for _ in 0..8 {
            self.drive_async().await;
        }
    }

    /// Dispatch `intent` as a click or key press would, then drive until it
    /// has been applied.
    pub async fn dispatch(&mut self, intent: GuideIntent) {
        let dispatcher = self.handles.dispatcher();
        self.dom.in_runtime(|| dispatcher.call(intent));
        self.drive().await;
    }

    /// Read the shared UI signals.
    pub fn ui<T>(&self, read: impl FnOnce(GuideUi) -> T) -> T {
        let ui = self.handles.ui();
        self.dom.in_runtime(|| read(ui))
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn state(&self) -> StudyState {
        self.services.state()
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Services over in-memory storage holding the landing page and the
/// incident response page.
pub async fn test_services() -> GuideServices {
    let content = InMemoryContent::new();
    let landing: PageDocument = serde_json::from_str(LANDING_DOC).expect("landing doc");
    let incident: PageDocument = serde_json::from_str(IR_DOC).expect("incident doc");
    content.insert(PageId::new("index"), landing).expect("insert landing");
    content
        .insert(PageId::new("incident-response"), incident)
        .expect("insert incident response");
    GuideServices::new(
        Storage::in_memory().with_content(Arc::new(content)),
        PageTable::builtin(),
        GuideSettings::default(),
        Clock::fixed(fixed_now()),
    )
    .await
}

pub fn setup_view_harness(services: GuideServices, launch_address: Option<&str>) -> ViewHarness {
    let app = Arc::new(TestApp {
        services: services.clone(),
        launch_address: launch_address.map(str::to_string),
    });
    let handles = HarnessHandles::default();
    let dom = VirtualDom::new_with_props(
        GuideHarness,
        GuideHarnessProps {
            app,
            handles: handles.clone(),
        },
    );
    ViewHarness {
        dom,
        services,
        handles,
    }
}
