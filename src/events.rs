//! Event groups and application-level notifications.
//!
//! Every dialog owns one event group for its lifetime. Widgets inside the
//! dialog subscribe to it to take part in history load/save; the group is
//! released when the dialog is destroyed, dropping all subscriptions.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::window::{WidgetHandle, WindowManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventGroupId(u64);

impl EventGroupId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Notifications a dialog raises towards the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    Help { help_ctx: Option<String> },
    Suspend,
}

pub type CoreHook = Rc<dyn Fn(&mut WindowManager, &CoreEvent)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySubscription {
    pub widget: WidgetHandle,
    pub name: String,
}

#[derive(Default)]
pub struct EventRegistry {
    next_group: u64,
    groups: BTreeMap<EventGroupId, Vec<HistorySubscription>>,
    core_hooks: Vec<CoreHook>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_group(&mut self) -> EventGroupId {
        let id = EventGroupId(self.next_group);
        self.next_group = self.next_group.saturating_add(1);
        self.groups.insert(id, Vec::new());
        id
    }

    /// Drop the group and every subscription in it.
    pub fn release_group(&mut self, id: EventGroupId) -> bool {
        self.groups.remove(&id).is_some()
    }

    pub fn is_live(&self, id: EventGroupId) -> bool {
        self.groups.contains_key(&id)
    }

    pub fn subscribe_history(
        &mut self,
        group: EventGroupId,
        widget: WidgetHandle,
        name: impl Into<String>,
    ) -> bool {
        let Some(subs) = self.groups.get_mut(&group) else {
            return false;
        };
        let name = name.into();
        if !subs.iter().any(|s| s.widget == widget && s.name == name) {
            subs.push(HistorySubscription { widget, name });
        }
        true
    }

    pub fn unsubscribe_widget(&mut self, widget: WidgetHandle) {
        for subs in self.groups.values_mut() {
            subs.retain(|s| s.widget != widget);
        }
    }

    pub fn history_subscribers(&self, group: EventGroupId) -> Vec<HistorySubscription> {
        self.groups.get(&group).cloned().unwrap_or_default()
    }

    pub fn add_core_hook(&mut self, hook: CoreHook) {
        self.core_hooks.push(hook);
    }

    pub fn core_hooks(&self) -> Vec<CoreHook> {
        self.core_hooks.clone()
    }
}
