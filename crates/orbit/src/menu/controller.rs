use super::CONFIRM_RING_SLACK;
use super::timers::{Timer, TimerKind, Timers};
use crate::config::{ConfigError, EdgeBehavior, MenuConfig};
use crate::edge::{EdgeState, FlipState, Viewport, calculate_smart_flip, detect_edge_constraints};
use crate::events::{EventBus, MenuEvent};
use crate::geometry::{Point, Velocity, distance, distribute_angles};
use crate::item::{DropPayload, ItemId, ItemList, MenuItem};
use crate::layout::SectorGeometry;
use crate::loader::{AsyncChildLoader, ChildCache, EntryKind, LoadFailure, LoadOutcome, PendingLoad};
use crate::motion::{MotionTracker, TracePoint};
use crate::navigation::{NavStackEntry, NavigationStack};
use crate::selection::{Ring, resolve_selection};
use std::sync::Arc;
use std::time::Instant;

/// What the binding has to do after feeding an input.
#[derive(Debug, Default)]
pub struct Response {
    /// Observable state changed; the menu should be repainted.
    pub redraw: bool,
    /// A child load was started and must be driven to completion, then fed
    /// back through [`RadialMenu::finish_load`].
    pub load: Option<PendingLoad>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Snapshot {
    open: bool,
    center: Point,
    items: *const MenuItem,
    depth: usize,
    hovered: Option<usize>,
    focused: Option<usize>,
    loading: bool,
    failed: bool,
    drop_target: bool,
}

#[derive(Debug, Clone)]
struct SpringTarget {
    index: usize,
    item: ItemId,
}

/// Headless radial menu: hit-testing, submenu navigation and gestures.
///
/// All input arrives through the handler methods, each of which runs to
/// completion before returning. Time never advances on its own: the binding
/// passes `now` with every input and calls [`RadialMenu::tick`] once
/// [`RadialMenu::next_deadline`] has passed.
#[derive(Debug)]
pub struct RadialMenu {
    config: MenuConfig,
    viewport: Option<Viewport>,
    nav: NavigationStack,
    loader: AsyncChildLoader,
    motion: MotionTracker,
    timers: Timers,
    events: EventBus,
    open: bool,
    center: Point,
    edge: EdgeState,
    flip: FlipState,
    confirmed: bool,
    tracking: bool,
    drop_target: bool,
    spring_target: Option<SpringTarget>,
    /// Item whose load just failed; gestures leave it alone until hover moves.
    retry_blocked: Option<ItemId>,
    pointer: Option<Point>,
    pending: Option<PendingLoad>,
}

impl RadialMenu {
    pub fn new(config: MenuConfig, items: Vec<MenuItem>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            viewport: None,
            nav: NavigationStack::new(items.into()),
            loader: AsyncChildLoader::default(),
            motion: MotionTracker::default(),
            timers: Timers::default(),
            events: EventBus::default(),
            open: false,
            center: Point::default(),
            edge: EdgeState::default(),
            flip: FlipState::default(),
            confirmed: true,
            tracking: false,
            drop_target: false,
            spring_target: None,
            retry_blocked: None,
            pointer: None,
            pending: None,
        })
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Replaces the configuration. An open menu is closed first.
    pub fn set_config(&mut self, config: MenuConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.close_menu();
        self.config = config;
        Ok(())
    }

    /// Replaces the root items and forgets every loaded submenu.
    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.close_menu();
        self.nav.set_root(items.into());
        self.loader.clear_cache();
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Center of the menu after edge handling.
    pub fn position(&self) -> Point {
        self.center
    }

    pub fn edge_state(&self) -> &EdgeState {
        &self.edge
    }

    pub fn flip_state(&self) -> &FlipState {
        &self.flip
    }

    pub fn depth(&self) -> usize {
        self.nav.depth()
    }

    pub fn items(&self) -> &ItemList {
        self.nav.active()
    }

    pub fn root_items(&self) -> &ItemList {
        self.nav.root()
    }

    pub fn stack(&self) -> &[NavStackEntry] {
        self.nav.entries()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.nav.hovered()
    }

    pub fn hovered_item(&self) -> Option<&MenuItem> {
        self.nav.hovered_item()
    }

    pub fn focused(&self) -> Option<usize> {
        self.nav.focused()
    }

    pub(super) fn set_focus(&mut self, index: Option<usize>) {
        self.nav.set_focused(index);
    }

    pub fn ring(&self) -> Ring {
        self.nav.ring(&self.config)
    }

    /// False right after a click entry until the pointer reaches the new ring.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn is_drop_target(&self) -> bool {
        self.drop_target
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn loading_item(&self) -> Option<&MenuItem> {
        self.loader.in_flight().map(|flight| &flight.item)
    }

    pub fn load_failure(&self) -> Option<&LoadFailure> {
        self.loader.failure()
    }

    pub fn cache(&self) -> &ChildCache {
        self.loader.cache()
    }

    pub fn timer(&self, kind: TimerKind) -> Option<Timer> {
        self.timers.get(kind)
    }

    pub fn is_timer_pending(&self, kind: TimerKind) -> bool {
        self.timers.is_pending(kind)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn velocity(&self) -> Velocity {
        self.motion.velocity()
    }

    pub fn trail(&self, now: Instant) -> impl Iterator<Item = TracePoint> + '_ {
        let gestures = &self.config.gestures;
        self.motion
            .trail(now, gestures.trail_duration, gestures.trail_max_points)
    }

    pub fn sectors(&self) -> Vec<SectorGeometry> {
        SectorGeometry::layout(
            self.nav.active().len(),
            self.center,
            self.ring(),
            &self.config,
            &self.flip,
        )
    }

    pub fn open(&mut self, point: Point) -> Response {
        let before = self.snapshot();
        self.open_at(point);
        self.respond(before)
    }

    pub fn close(&mut self) -> Response {
        let before = self.snapshot();
        self.close_menu();
        self.respond(before)
    }

    pub fn toggle(&mut self, point: Point) -> Response {
        if self.open {
            self.close()
        } else {
            self.open(point)
        }
    }

    pub fn pointer_move(&mut self, point: Point, now: Instant) -> Response {
        let before = self.snapshot();
        if self.open {
            self.track_pointer(point, now);
        }
        self.respond(before)
    }

    /// Starts tracking a press-and-drag; drag-through is only armed while tracking.
    pub fn pointer_down(&mut self, point: Point, now: Instant) -> Response {
        let before = self.snapshot();
        if self.open {
            self.tracking = true;
            self.motion.clear();
            self.track_pointer(point, now);
        }
        self.respond(before)
    }

    pub fn pointer_up(&mut self, point: Point, now: Instant) -> Response {
        let before = self.snapshot();
        if self.open {
            self.track_pointer(point, now);
            self.tracking = self.drop_target;
        }
        self.respond(before)
    }

    /// Hover update for drags wired up outside the engine.
    pub fn update_hover_from_point(&mut self, point: Point, now: Instant) -> Response {
        let before = self.snapshot();
        if self.open {
            self.tracking = true;
            self.track_pointer(point, now);
        }
        self.respond(before)
    }

    pub fn click(&mut self, point: Point, now: Instant) -> Response {
        let before = self.snapshot();
        if self.open {
            self.track_pointer(point, now);
            match self.nav.hovered() {
                Some(index) => self.activate(index),
                None if self.nav.depth() > 0 => {
                    self.exit_level();
                }
                None => self.close_menu(),
            }
        }
        self.respond(before)
    }

    pub fn go_back(&mut self) -> Response {
        let before = self.snapshot();
        self.exit_level();
        self.respond(before)
    }

    pub fn go_to_root(&mut self) -> Response {
        let before = self.snapshot();
        while self.exit_level() {}
        self.respond(before)
    }

    pub fn open_as_drop_target(&mut self, point: Point, now: Instant) -> Response {
        let before = self.snapshot();
        self.open_at(point);
        self.drop_target = true;
        self.tracking = true;
        self.motion.record(point, now);
        self.respond(before)
    }

    pub fn drop_on_hovered(&mut self, data: DropPayload) -> Response {
        let before = self.snapshot();
        if self.open && self.drop_target {
            match self.nav.hovered_item().filter(|item| !item.disabled).cloned() {
                Some(item) => {
                    log::debug!("dropped onto {}", item.id);
                    self.events.emit(MenuEvent::Dropped { item, data });
                }
                None => log::debug!("drop landed outside every item"),
            }
            self.close_menu();
        }
        self.respond(before)
    }

    pub fn cancel_drop(&mut self) -> Response {
        let before = self.snapshot();
        if self.drop_target {
            self.close_menu();
        }
        self.respond(before)
    }

    /// Fires every timer due at `now`.
    pub fn tick(&mut self, now: Instant) -> Response {
        let before = self.snapshot();
        for (kind, timer) in self.timers.take_due(now) {
            match kind {
                TimerKind::SpringLoad => self.fire_spring_load(),
                TimerKind::BackDwell => self.fire_back_dwell(),
                TimerKind::ErrorClear => {
                    if self.loader.expire_failure(timer.generation) {
                        log::debug!("load error cleared");
                        self.retry_blocked = None;
                    }
                }
            }
        }
        self.respond(before)
    }

    /// Applies the result of a [`PendingLoad`]. Results for a closed menu or
    /// for a load that is no longer the one in flight are dropped silently.
    pub fn finish_load(&mut self, outcome: LoadOutcome, now: Instant) -> Response {
        let before = self.snapshot();
        if !self.open {
            log::debug!("ignoring children of {}: menu closed", outcome.item);
            return self.respond(before);
        }
        let Some(flight) = self.loader.settle(&outcome) else {
            log::debug!("ignoring stale children of {}", outcome.item);
            return self.respond(before);
        };

        match outcome.result {
            Ok(children) => {
                let children: ItemList = children.into();
                self.loader.store(flight.item.id.clone(), children.clone());
                self.events.emit(MenuEvent::LoadCompleted {
                    item: flight.item.clone(),
                });
                self.push_level(flight.item, flight.entry_angle, children, flight.entry);
            }
            Err(error) => {
                log::warn!("Failed to load children of '{}': {}", flight.item.id, error);
                let generation = self.timers.schedule(
                    TimerKind::ErrorClear,
                    now + self.config.gestures.error_clear_delay,
                );
                self.loader
                    .fail(flight.item.clone(), error.clone(), generation);
                self.retry_blocked = Some(flight.item.id.clone());
                self.events.emit(MenuEvent::LoadFailed {
                    item: flight.item,
                    error,
                });
            }
        }
        self.respond(before)
    }

    pub(super) fn snapshot(&self) -> Snapshot {
        Snapshot {
            open: self.open,
            center: self.center,
            items: Arc::as_ptr(self.nav.active()).cast::<MenuItem>(),
            depth: self.nav.depth(),
            hovered: self.nav.hovered(),
            focused: self.nav.focused(),
            loading: self.loader.is_loading(),
            failed: self.loader.failure().is_some(),
            drop_target: self.drop_target,
        }
    }

    pub(super) fn respond(&mut self, before: Snapshot) -> Response {
        Response {
            redraw: self.snapshot() != before,
            load: self.pending.take(),
        }
    }

    fn open_at(&mut self, point: Point) {
        self.reset_transient();
        self.nav.reset();

        let (center, edge, flip) = self.place(point);
        self.center = center;
        self.edge = edge;
        self.flip = flip;
        self.confirmed = true;
        self.open = true;

        log::debug!(
            "opened at ({:.1}, {:.1}), flip {}",
            center.x,
            center.y,
            flip.mode()
        );
        self.events.emit(MenuEvent::Opened { position: center });
    }

    fn place(&self, origin: Point) -> (Point, EdgeState, FlipState) {
        let Some(viewport) = self.viewport else {
            return (origin, EdgeState::default(), FlipState::default());
        };
        let edge = detect_edge_constraints(
            origin,
            self.config.radius,
            viewport,
            self.config.edge_padding,
        );
        match self.config.edge_behavior {
            EdgeBehavior::Shift => (origin.translate(edge.offset), edge, FlipState::default()),
            EdgeBehavior::Flip => (origin, edge, calculate_smart_flip(&edge)),
            EdgeBehavior::None => (origin, edge, FlipState::default()),
        }
    }

    pub(super) fn close_menu(&mut self) {
        if !self.open {
            return;
        }
        self.reset_transient();
        self.nav.reset();
        self.confirmed = true;
        self.open = false;

        log::debug!("closed");
        self.events.emit(MenuEvent::Closed);
    }

    fn reset_transient(&mut self) {
        self.timers.cancel_all();
        self.motion.clear();
        self.loader.cancel();
        self.loader.clear_failure();
        self.spring_target = None;
        self.retry_blocked = None;
        self.tracking = false;
        self.drop_target = false;
        self.pointer = None;
        self.pending = None;
    }

    fn track_pointer(&mut self, point: Point, now: Instant) {
        self.motion.record(point, now);
        self.pointer = Some(point);

        let ring = self.ring();
        let dist = distance(self.center, point);
        let index = resolve_selection(
            point,
            self.center,
            ring,
            &self.config,
            &self.flip,
            self.nav.active().len(),
        );

        if index != self.nav.hovered() {
            log::trace!("hover {:?} -> {:?}", self.nav.hovered(), index);
            self.nav.set_hovered(index);
            self.nav.set_focused(index);
            self.retry_blocked = None;
            self.arm_spring_load(index, now);
        }

        if !self.confirmed
            && self.nav.depth() > 0
            && dist >= ring.inner
            && dist <= ring.outer * CONFIRM_RING_SLACK
        {
            log::debug!("depth {} confirmed", self.nav.depth());
            self.confirmed = true;
        }

        if self.tracking && self.try_drag_through(index, dist, ring) {
            return;
        }
        self.update_back_dwell(dist, now);
    }

    fn arm_spring_load(&mut self, index: Option<usize>, now: Instant) {
        self.timers.cancel(TimerKind::SpringLoad);
        self.spring_target = None;

        if !self.config.gestures.spring_load {
            return;
        }
        let Some(item) = index.and_then(|i| self.nav.item(i)) else {
            return;
        };
        if !self.gesture_can_enter(item) {
            return;
        }
        let item = item.id.clone();

        self.spring_target = index.map(|index| SpringTarget { index, item });
        self.timers.schedule(
            TimerKind::SpringLoad,
            now + self.config.gestures.spring_load_delay,
        );
    }

    fn fire_spring_load(&mut self) {
        let Some(target) = self.spring_target.take() else {
            return;
        };
        if !self.open || self.nav.hovered() != Some(target.index) {
            return;
        }
        let Some(item) = self.nav.item(target.index).cloned() else {
            return;
        };
        if item.id != target.item || !self.gesture_can_enter(&item) {
            return;
        }

        log::debug!("spring-load fired for {}", item.id);
        self.events.emit(MenuEvent::SpringLoadFired { item: item.clone() });
        self.enter_submenu(target.index, item, EntryKind::Gesture);
    }

    fn try_drag_through(&mut self, index: Option<usize>, dist: f64, ring: Ring) -> bool {
        let gestures = &self.config.gestures;
        if !gestures.drag_through {
            return false;
        }
        let Some(index) = index else {
            return false;
        };
        let Some(item) = self.nav.item(index) else {
            return false;
        };
        if !self.gesture_can_enter(item) {
            return false;
        }

        // the item is drawn at its mirrored angle, so measure speed along that
        let direction = self.flip.mirror_angle(self.item_angle(index));
        let radial = self.motion.velocity().radial_component(direction);
        if radial <= gestures.drag_through_velocity
            || dist <= ring.outer * gestures.drag_through_distance_ratio
        {
            return false;
        }

        let item = item.clone();
        log::debug!("drag-through into {} at {:.0}px/s", item.id, radial);
        self.enter_submenu(index, item, EntryKind::Gesture);
        true
    }

    /// Expandable and not known to be empty. A lazy item whose load came back
    /// empty is treated like a leaf from then on.
    fn can_expand(&self, item: &MenuItem) -> bool {
        !item.disabled
            && item.is_expandable()
            && !self.loader.cached(&item.id).is_some_and(|c| c.is_empty())
    }

    /// Spring-load and drag-through only enter when something will happen:
    /// no load for the item already running and no failure still showing for it.
    fn gesture_can_enter(&self, item: &MenuItem) -> bool {
        self.can_expand(item)
            && !self.loader.is_loading_item(&item.id)
            && self.retry_blocked.as_ref() != Some(&item.id)
    }

    /// The back zone is the top level's dead center, whatever the depth.
    fn in_back_zone(&self, point: Point) -> bool {
        distance(self.center, point) < self.config.inner_radius
    }

    // The dwell timer starts once on entering the zone and is not restarted by
    // movement inside it; leaving the zone cancels it.
    fn update_back_dwell(&mut self, dist: f64, now: Instant) {
        let eligible = self.config.gestures.back_dwell
            && self.nav.depth() > 0
            && self.confirmed
            && dist < self.config.inner_radius;

        if !eligible {
            self.timers.cancel(TimerKind::BackDwell);
        } else if !self.timers.is_pending(TimerKind::BackDwell) {
            self.timers.schedule(
                TimerKind::BackDwell,
                now + self.config.gestures.back_dwell_delay,
            );
        }
    }

    fn fire_back_dwell(&mut self) {
        let in_zone = self.pointer.is_some_and(|p| self.in_back_zone(p));
        if self.open && self.confirmed && self.nav.depth() > 0 && in_zone {
            log::debug!("dwell in back zone, leaving depth {}", self.nav.depth());
            self.exit_level();
        }
    }

    fn item_angle(&self, index: usize) -> f64 {
        distribute_angles(
            self.nav.active().len(),
            self.config.start_angle,
            self.config.sweep_angle,
        )
        .get(index)
        .copied()
        .unwrap_or(self.config.start_angle)
    }

    /// Click, key or digit activation of the item at `index`.
    pub(super) fn activate(&mut self, index: usize) {
        let Some(item) = self.nav.item(index).cloned() else {
            return;
        };
        if item.disabled {
            log::debug!("ignoring disabled item {}", item.id);
        } else if self.can_expand(&item) {
            self.enter_submenu(index, item, EntryKind::Direct);
        } else if item.is_selectable() {
            self.select(item);
        } else {
            log::trace!("{} is neither expandable nor selectable", item.id);
        }
    }

    fn select(&mut self, item: MenuItem) {
        log::debug!("selected {}", item.id);
        self.events.emit(MenuEvent::Selected { item: item.clone() });
        item.notify_selected();
        self.close_menu();
    }

    fn enter_submenu(&mut self, index: usize, item: MenuItem, entry: EntryKind) {
        if item.disabled {
            return;
        }
        let angle = self.item_angle(index);
        let children = item
            .loaded_children()
            .or_else(|| self.loader.cached(&item.id))
            .cloned();
        if let Some(children) = children {
            self.push_level(item, angle, children, entry);
            return;
        }

        if self.loader.is_loading_item(&item.id) {
            log::trace!("children of {} already loading", item.id);
            return;
        }
        if let Some(pending) = self.loader.begin(item.clone(), angle, entry) {
            self.retry_blocked = None;
            self.timers.cancel(TimerKind::ErrorClear);
            self.timers.cancel(TimerKind::SpringLoad);
            self.spring_target = None;
            log::debug!("loading children of {}", item.id);
            self.events.emit(MenuEvent::LoadStarted { item });
            self.pending = Some(pending);
        }
    }

    fn push_level(&mut self, item: MenuItem, entry_angle: f64, children: ItemList, entry: EntryKind) {
        if children.is_empty() {
            log::debug!("{} has no children, staying at depth {}", item.id, self.nav.depth());
            return;
        }
        self.loader.cancel();
        self.loader.clear_failure();
        self.timers.cancel(TimerKind::ErrorClear);
        self.timers.cancel(TimerKind::SpringLoad);
        self.timers.cancel(TimerKind::BackDwell);
        self.spring_target = None;

        self.nav.push(item.clone(), entry_angle, children);
        self.confirmed = entry.is_confirmed();

        let depth = self.nav.depth();
        log::debug!("entered {} (depth {})", item.id, depth);
        self.events.emit(MenuEvent::SubmenuEntered { item, depth });
    }

    /// Leaves the active submenu. Returns false at the root.
    pub(super) fn exit_level(&mut self) -> bool {
        if self.nav.depth() == 0 {
            return false;
        }
        self.loader.cancel();
        self.loader.clear_failure();
        self.timers.cancel(TimerKind::ErrorClear);
        self.timers.cancel(TimerKind::SpringLoad);
        self.timers.cancel(TimerKind::BackDwell);
        self.spring_target = None;

        let Some(entry) = self.nav.pop() else {
            return false;
        };
        self.confirmed = true;

        let depth = self.nav.depth();
        log::debug!("left {} (now depth {})", entry.item.id, depth);
        self.events.emit(MenuEvent::SubmenuExited {
            item: entry.item,
            depth,
        });
        true
    }
}
