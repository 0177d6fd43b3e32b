use std::{collections::HashMap, fmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Event kinds a listener can subscribe to.
pub enum GridEventKind {
    /// Any mutation of configuration or cell contents.
    Change,
    /// Rows or columns changed and every cell was reset to empty.
    Reshape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a [`GridEvent::Change`] was caused by.
pub enum GridChange {
    /// A configuration patch was applied.
    Config {
        /// Whether the cell array was reallocated.
        reshaped: bool,
    },
    /// A cell received new content.
    CellSet {
        /// Row-major cell index.
        index: usize,
    },
    /// A single cell was emptied.
    CellCleared {
        /// Row-major cell index.
        index: usize,
    },
    /// Every cell was emptied.
    AllCleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Notification delivered to grid listeners.
pub enum GridEvent {
    /// The grid changed and geometry may have moved.
    Change(GridChange),
    /// The grid was reshaped to `rows x cols` with all cells empty.
    Reshape {
        /// New row count.
        rows: u32,
        /// New column count.
        cols: u32,
    },
}

impl GridEvent {
    /// Subscription kind this event is delivered to.
    pub fn kind(&self) -> GridEventKind {
        match self {
            Self::Change(_) => GridEventKind::Change,
            Self::Reshape { .. } => GridEventKind::Reshape,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GridEvent)>;

/// Synchronous typed event bus.
///
/// Handlers are grouped by [`GridEventKind`] and invoked in registration order, on the
/// emitting call's stack, once per emitted event. There is no batching or deduplication.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: HashMap<GridEventKind, Vec<(SubscriptionId, Handler)>>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe(
        &mut self,
        kind: GridEventKind,
        handler: impl FnMut(&GridEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.handlers.values_mut() {
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of handlers registered for `kind`.
    pub fn listener_count(&self, kind: GridEventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver `event` to every handler of its kind.
    pub fn emit(&mut self, event: &GridEvent) {
        if let Some(list) = self.handlers.get_mut(&event.kind()) {
            for (_, handler) in list.iter_mut() {
                handler(event);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("change_listeners", &self.listener_count(GridEventKind::Change))
            .field("reshape_listeners", &self.listener_count(GridEventKind::Reshape))
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/events.rs"]
mod tests;
