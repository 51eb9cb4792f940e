mod actions;
mod blocks;
mod bookmarks;
mod intent;
mod layout;
mod page;
mod scripts;
mod search;
mod state;

pub use actions::{GuideDispatcher, use_guide_dispatcher, use_guide_dispatcher_provider};
pub use intent::{GuideIntent, shortcut_intent};
pub use layout::Layout;
pub use page::{DashboardView, PageView};
pub use state::{
    GuideUi, ViewError, ViewState, use_guide_ui, use_guide_ui_provider, view_state_from_resource,
};

#[cfg(test)]
mod intent_smoke;
#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
