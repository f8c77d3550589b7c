use std::collections::HashMap;

use crate::NodeId;
use crate::components::Handler;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Listener {
    pub(crate) handler: Handler,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    /// Drops every listener whose handler matches `pred`, returning how many
    /// were removed.
    pub(crate) fn remove_where(&mut self, mut pred: impl FnMut(&Handler) -> bool) -> usize {
        let mut removed = 0;
        for events in self.map.values_mut() {
            for listeners in events.values_mut() {
                let before = listeners.len();
                listeners.retain(|listener| !pred(&listener.handler));
                removed += before - listeners.len();
            }
            events.retain(|_, listeners| !listeners.is_empty());
        }
        self.map.retain(|_, events| !events.is_empty());
        removed
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

/// Payload carried by input events.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum EventDetail {
    #[default]
    None,
    Key {
        key: String,
        shift: bool,
    },
    Touch {
        client_x: f64,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) bubbles: bool,
    pub(crate) related_target: Option<NodeId>,
    pub(crate) detail: EventDetail,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            bubbles: bubbles(event_type),
            related_target: None,
            detail: EventDetail::None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub(crate) fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }

    pub(crate) fn with_related_target(mut self, related: Option<NodeId>) -> Self {
        self.related_target = related;
        self
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub(crate) fn key(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Key { key, .. } => Some(key),
            _ => None,
        }
    }

    pub(crate) fn shift_key(&self) -> bool {
        matches!(self.detail, EventDetail::Key { shift: true, .. })
    }

    pub(crate) fn client_x(&self) -> Option<f64> {
        match self.detail {
            EventDetail::Touch { client_x } => Some(client_x),
            _ => None,
        }
    }
}

fn bubbles(event_type: &str) -> bool {
    !matches!(
        event_type,
        "focus" | "blur" | "mouseenter" | "mouseleave" | "intersect" | "resize" | "scroll"
    )
}
