use guide_core::model::TabGroup;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabButtonVm {
    pub target: String,
    pub label: String,
    pub active: bool,
}

/// One tab group with exactly one active tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabStripVm {
    pub tabs: Vec<TabButtonVm>,
    pub active: Option<String>,
}

impl TabStripVm {
    /// Mark `selected` active, falling back to the group's first tab when it
    /// names no tab of this group.
    #[must_use]
    pub fn new(group: &TabGroup, selected: Option<&str>) -> Self {
        let active = selected
            .filter(|target| group.has_target(target))
            .or_else(|| group.initial_target())
            .map(str::to_string);
        let tabs = group
            .tabs
            .iter()
            .map(|tab| TabButtonVm {
                target: tab.target.clone(),
                label: tab.label.clone(),
                active: active.as_deref() == Some(tab.target.as_str()),
            })
            .collect();
        Self { tabs, active }
    }

    #[must_use]
    pub fn is_panel_active(&self, panel_id: &str) -> bool {
        self.active.as_deref() == Some(panel_id)
    }
}
