use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;
use crate::views::{use_guide_dispatcher_provider, use_guide_ui_provider};

#[component]
pub fn App() -> Element {
    use_guide_ui_provider();
    use_guide_dispatcher_provider();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Interview Prep Guide" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
