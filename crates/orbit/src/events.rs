use crate::geometry::Point;
use crate::item::{DropPayload, LoadError, MenuItem};
use async_channel::Receiver;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use strum::AsRefStr;

#[derive(Debug, Clone, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum MenuEvent {
    Opened { position: Point },
    Closed,
    Selected { item: MenuItem },
    Dropped { item: MenuItem, data: DropPayload },
    SubmenuEntered { item: MenuItem, depth: usize },
    SubmenuExited { item: MenuItem, depth: usize },
    SpringLoadFired { item: MenuItem },
    LoadStarted { item: MenuItem },
    LoadCompleted { item: MenuItem },
    LoadFailed { item: MenuItem, error: LoadError },
}

impl MenuEvent {
    pub fn name(&self) -> &str {
        self.as_ref()
    }

    pub fn item(&self) -> Option<&MenuItem> {
        match self {
            Self::Opened { .. } | Self::Closed => None,
            Self::Selected { item }
            | Self::Dropped { item, .. }
            | Self::SubmenuEntered { item, .. }
            | Self::SubmenuExited { item, .. }
            | Self::SpringLoadFired { item }
            | Self::LoadStarted { item }
            | Self::LoadCompleted { item }
            | Self::LoadFailed { item, .. } => Some(item),
        }
    }
}

impl fmt::Display for MenuEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened { position } => {
                write!(f, "{} x={:.1} y={:.1}", self.name(), position.x, position.y)
            }
            Self::Closed => f.write_str(self.name()),
            Self::Dropped { item, data } => write!(f, "{} {} data={}", self.name(), item.id, data),
            Self::SubmenuEntered { item, depth } | Self::SubmenuExited { item, depth } => {
                write!(f, "{} {} depth={}", self.name(), item.id, depth)
            }
            Self::LoadFailed { item, error } => {
                write!(f, "{} {} error={}", self.name(), item.id, error)
            }
            Self::Selected { item }
            | Self::SpringLoadFired { item }
            | Self::LoadStarted { item }
            | Self::LoadCompleted { item } => write!(f, "{} {}", self.name(), item.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&MenuEvent) + Send + Sync>;

/// Synchronous observer registry for outbound notifications.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn subscribe(&self, listener: impl Fn(&MenuEvent) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Forwards events into a bounded channel. Events are dropped, with a
    /// warning, while the channel is full.
    pub fn channel(&self, capacity: usize) -> (SubscriptionId, Receiver<MenuEvent>) {
        let (tx, rx) = async_channel::bounded(capacity.max(1));
        let id = self.subscribe(move |event| {
            if let Err(e) = tx.try_send(event.clone())
                && e.is_full()
            {
                log::warn!("Event channel full, dropping {}", event.name());
            }
        });
        (id, rx)
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    pub fn emit(&self, event: MenuEvent) {
        log::debug!("emit {}", event);
        // listeners run outside the lock so they may subscribe or unsubscribe
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}
