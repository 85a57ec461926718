use crate::item::{ItemId, ItemList, LoadError, LoadFuture, MenuItem};
use std::collections::HashMap;
use std::fmt;

/// Identifies one load attempt. A newer attempt always gets a new ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// How a submenu was entered; decides whether the new level starts confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Click, key or selection: the level waits for the pointer to reach it.
    Direct,
    /// Spring-load or drag-through: the pointer is already committed.
    Gesture,
}

impl EntryKind {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Gesture)
    }
}

/// A child load the binding has to drive to completion.
pub struct PendingLoad {
    ticket: LoadTicket,
    item: ItemId,
    future: LoadFuture,
}

impl PendingLoad {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item
    }

    pub async fn run(self) -> LoadOutcome {
        let result = self.future.await;
        LoadOutcome {
            ticket: self.ticket,
            item: self.item,
            result,
        }
    }
}

impl fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("ticket", &self.ticket)
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub item: ItemId,
    pub result: Result<Vec<MenuItem>, LoadError>,
}

#[derive(Debug, Clone)]
pub struct InFlight {
    pub ticket: LoadTicket,
    pub item: MenuItem,
    pub entry_angle: f64,
    pub entry: EntryKind,
}

#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub item: MenuItem,
    pub error: LoadError,
    pub(crate) timer_generation: u64,
}

/// Children fetched by lazy loaders, keyed by item id. Caller-owned items are
/// never mutated; a cached entry simply shadows the item's loader.
#[derive(Debug, Default, Clone)]
pub struct ChildCache {
    entries: HashMap<ItemId, ItemList>,
}

impl ChildCache {
    pub fn get(&self, id: &ItemId) -> Option<&ItemList> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: ItemId, children: ItemList) {
        self.entries.insert(id, children);
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<ItemList> {
        self.entries.remove(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct AsyncChildLoader {
    next_ticket: u64,
    in_flight: Option<InFlight>,
    failure: Option<LoadFailure>,
    cache: ChildCache,
}

impl AsyncChildLoader {
    pub fn cache(&self) -> &ChildCache {
        &self.cache
    }

    pub fn cached(&self, id: &ItemId) -> Option<&ItemList> {
        self.cache.get(id)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    pub fn is_loading_item(&self, id: &ItemId) -> bool {
        self.in_flight.as_ref().is_some_and(|f| &f.item.id == id)
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.failure.as_ref()
    }

    /// Starts a load for `item`, replacing whatever was in flight.
    pub fn begin(
        &mut self,
        item: MenuItem,
        entry_angle: f64,
        entry: EntryKind,
    ) -> Option<PendingLoad> {
        let future = item.loader()?.load();
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        let pending = PendingLoad {
            ticket,
            item: item.id.clone(),
            future,
        };
        self.failure = None;
        self.in_flight = Some(InFlight {
            ticket,
            item,
            entry_angle,
            entry,
        });
        Some(pending)
    }

    /// Claims the in-flight slot for `outcome` if it is still the current
    /// load. Anything else is a stale result and yields `None`.
    pub fn settle(&mut self, outcome: &LoadOutcome) -> Option<InFlight> {
        let current = self.in_flight.as_ref()?;
        if current.ticket != outcome.ticket || current.item.id != outcome.item {
            return None;
        }
        self.in_flight.take()
    }

    pub fn store(&mut self, id: ItemId, children: ItemList) {
        self.cache.insert(id, children);
    }

    pub fn fail(&mut self, item: MenuItem, error: LoadError, timer_generation: u64) {
        self.failure = Some(LoadFailure {
            item,
            error,
            timer_generation,
        });
    }

    /// Clears the failure only if it is the one the timer was armed for.
    pub fn expire_failure(&mut self, timer_generation: u64) -> bool {
        if self
            .failure
            .as_ref()
            .is_some_and(|f| f.timer_generation == timer_generation)
        {
            self.failure = None;
            return true;
        }
        false
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    /// Forgets the in-flight load; its outcome will be ignored when it lands.
    pub fn cancel(&mut self) -> Option<InFlight> {
        self.in_flight.take()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
