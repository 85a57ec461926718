use super::*;
use crate::config::{EdgeBehavior, MenuConfig};
use crate::edge::Viewport;
use crate::geometry::{Point, Polar, distribute_angles, to_cartesian};
use crate::item::{DropPayload, ItemId, LoadError, MenuItem};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const CENTER: Point = Point { x: 500.0, y: 500.0 };

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Point at `radius` from `CENTER` on the center line of sector `index`.
fn at(index: usize, count: usize, radius: f64) -> Point {
    let config = MenuConfig::default();
    let angle = distribute_angles(count, config.start_angle, config.sweep_angle)[index];
    to_cartesian(CENTER, Polar { radius, angle })
}

fn leaves(prefix: &str, count: usize) -> Vec<MenuItem> {
    (0..count)
        .map(|i| MenuItem::new(format!("{prefix}-{i}"), format!("{prefix} {i}")))
        .collect()
}

fn folder(id: &str) -> MenuItem {
    MenuItem::new(id, id).with_children(leaves(id, 3))
}

fn lazy(id: &str, count: usize, calls: Arc<AtomicUsize>) -> MenuItem {
    let prefix = id.to_string();
    MenuItem::new(id, id).with_loader(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        let children = leaves(&prefix, count);
        async move { Ok(children) }
    })
}

fn failing(id: &str) -> MenuItem {
    MenuItem::new(id, id).with_loader(|| async { Err(LoadError::new("offline")) })
}

fn menu(items: Vec<MenuItem>) -> (RadialMenu, Arc<Mutex<Vec<String>>>) {
    menu_with(MenuConfig::default(), items)
}

fn menu_with(config: MenuConfig, items: Vec<MenuItem>) -> (RadialMenu, Arc<Mutex<Vec<String>>>) {
    let menu = RadialMenu::new(config, items).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    menu.events().subscribe(move |e| sink.lock().push(e.to_string()));
    (menu, log)
}

fn take(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    std::mem::take(&mut *log.lock())
}

#[test]
fn test_open_always_starts_at_confirmed_root() {
    let (mut menu, log) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();

    assert!(menu.open(CENTER).redraw);
    menu.click(at(0, 2, 80.0), t0);
    assert_eq!(menu.depth(), 1);
    assert!(!menu.is_confirmed());

    menu.open(Point::new(300.0, 200.0));
    assert!(menu.is_open());
    assert_eq!(menu.depth(), 0);
    assert!(menu.stack().is_empty());
    assert!(menu.is_confirmed());
    assert_eq!(menu.hovered(), None);
    assert_eq!(menu.position(), Point::new(300.0, 200.0));
    assert_eq!(
        take(&log),
        vec![
            "opened x=500.0 y=500.0",
            "submenuEntered edit depth=1",
            "opened x=300.0 y=200.0",
        ]
    );
}

#[test]
fn test_hover_change_requests_redraw() {
    let (mut menu, _) = menu(leaves("item", 4));
    let t0 = Instant::now();
    menu.open(CENTER);

    assert!(menu.pointer_move(at(1, 4, 80.0), t0).redraw);
    assert_eq!(menu.hovered(), Some(1));
    assert_eq!(menu.focused(), Some(1));
    assert!(!menu.pointer_move(at(1, 4, 300.0), t0 + ms(16)).redraw);
    assert!(menu.pointer_move(CENTER, t0 + ms(32)).redraw);
    assert_eq!(menu.hovered(), None);
}

#[tokio::test]
async fn test_lazy_children_load_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut items = leaves("root", 3);
    items.insert(0, lazy("recent", 3, calls.clone()));
    let (mut menu, log) = menu(items);
    let t0 = Instant::now();
    menu.open(CENTER);

    let response = menu.click(at(0, 4, 80.0), t0);
    assert!(menu.is_loading());
    assert_eq!(menu.loading_item().map(|i| i.id.as_str()), Some("recent"));
    let outcome = response.load.unwrap().run().await;
    assert!(menu.finish_load(outcome, t0 + ms(10)).redraw);

    assert_eq!(menu.depth(), 1);
    assert_eq!(menu.items().len(), 3);
    assert_eq!(menu.cache().get(&ItemId::from("recent")).map(|c| c.len()), Some(3));
    assert_eq!(
        take(&log),
        vec![
            "opened x=500.0 y=500.0",
            "loadStarted recent",
            "loadCompleted recent",
            "submenuEntered recent depth=1",
        ]
    );

    menu.go_back();
    let response = menu.click(at(0, 4, 80.0), t0 + ms(20));
    assert!(response.load.is_none());
    assert_eq!(menu.depth(), 1);
    assert_eq!(
        take(&log),
        vec!["submenuExited recent depth=0", "submenuEntered recent depth=1"]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_close_while_loading_ignores_the_result() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut menu, log) = menu(vec![lazy("recent", 3, calls), failing("remote")]);
    let t0 = Instant::now();

    menu.open(CENTER);
    let pending = menu.click(at(0, 2, 80.0), t0).load.unwrap();
    menu.close();
    take(&log);

    let response = menu.finish_load(pending.run().await, t0 + ms(5));
    assert!(!response.redraw);
    assert!(!menu.is_open());
    assert!(menu.cache().is_empty());
    assert!(take(&log).is_empty());

    menu.open(CENTER);
    let pending = menu.click(at(1, 2, 80.0), t0 + ms(10)).load.unwrap();
    menu.close();
    take(&log);
    menu.finish_load(pending.run().await, t0 + ms(15));
    assert!(menu.load_failure().is_none());
    assert_eq!(menu.next_deadline(), None);
    assert!(take(&log).is_empty());
}

#[tokio::test]
async fn test_superseded_load_is_stale() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut menu, log) = menu(vec![
        lazy("a", 2, calls.clone()),
        lazy("b", 4, calls.clone()),
    ]);
    let t0 = Instant::now();
    menu.open(CENTER);

    let first = menu.click(at(0, 2, 80.0), t0).load.unwrap();
    assert!(menu.click(at(0, 2, 80.0), t0 + ms(5)).load.is_none());
    let second = menu.click(at(1, 2, 80.0), t0 + ms(10)).load.unwrap();
    take(&log);

    assert!(!menu.finish_load(first.run().await, t0 + ms(20)).redraw);
    assert_eq!(menu.depth(), 0);
    assert!(take(&log).is_empty());

    menu.finish_load(second.run().await, t0 + ms(30));
    assert_eq!(menu.stack()[0].item.id.as_str(), "b");
    assert_eq!(menu.items().len(), 4);
    assert_eq!(
        take(&log),
        vec!["loadCompleted b", "submenuEntered b depth=1"]
    );
}

#[tokio::test]
async fn test_empty_load_stays_at_current_level() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut menu, log) = menu(vec![lazy("nothing", 0, calls)]);
    let t0 = Instant::now();
    menu.open(CENTER);

    let pending = menu.click(at(0, 1, 80.0), t0).load.unwrap();
    menu.finish_load(pending.run().await, t0 + ms(5));
    assert_eq!(menu.depth(), 0);
    assert!(menu.is_open());
    assert_eq!(take(&log).last().map(String::as_str), Some("loadCompleted nothing"));
}

#[tokio::test]
async fn test_load_failure_clears_itself() {
    let (mut menu, log) = menu(vec![failing("remote"), MenuItem::new("local", "Local")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    let pending = menu.click(at(0, 2, 80.0), t0).load.unwrap();
    let response = menu.finish_load(pending.run().await, t0 + ms(100));
    assert!(response.redraw);
    assert!(menu.is_open());
    assert_eq!(menu.depth(), 0);
    assert_eq!(
        menu.load_failure().map(|f| f.error.message()),
        Some("offline")
    );
    assert_eq!(
        take(&log).last().map(String::as_str),
        Some("loadFailed remote error=offline")
    );

    assert!(!menu.tick(t0 + ms(2099)).redraw);
    assert!(menu.load_failure().is_some());
    assert!(menu.tick(t0 + ms(2100)).redraw);
    assert!(menu.load_failure().is_none());
}

#[tokio::test]
async fn test_failed_item_is_not_retried_by_the_same_flick() {
    let (mut menu, log) = menu(vec![failing("remote"), MenuItem::new("local", "Local")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    menu.pointer_down(CENTER, t0);
    let pending = menu.pointer_move(at(0, 2, 100.0), t0 + ms(50)).load.unwrap();
    menu.finish_load(pending.run().await, t0 + ms(55));
    assert_eq!(
        take(&log),
        vec![
            "opened x=500.0 y=500.0",
            "loadStarted remote",
            "loadFailed remote error=offline",
        ]
    );

    for step in 1..=5u64 {
        let radius = 100.0 + 10.0 * step as f64;
        let response = menu.pointer_move(at(0, 2, radius), t0 + ms(55 + 5 * step));
        assert!(response.load.is_none());
    }
    assert!(menu.velocity().speed() > 600.0);
    assert!(take(&log).is_empty());
    assert!(menu.load_failure().is_some());
    assert_eq!(
        menu.timer(TimerKind::ErrorClear).map(|t| t.deadline),
        Some(t0 + ms(2055))
    );

    // an explicit click still retries
    let response = menu.click(at(0, 2, 80.0), t0 + ms(100));
    assert!(response.load.is_some());
    assert_eq!(take(&log), vec!["loadStarted remote"]);
}

#[tokio::test]
async fn test_spring_load_returns_after_hover_leaves_a_failed_item() {
    let (mut menu, _) = menu(vec![failing("remote"), MenuItem::new("local", "Local")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    let pending = menu.click(at(0, 2, 80.0), t0).load.unwrap();
    menu.finish_load(pending.run().await, t0 + ms(10));
    menu.pointer_move(at(0, 2, 90.0), t0 + ms(20));
    assert!(!menu.is_timer_pending(TimerKind::SpringLoad));

    menu.pointer_move(at(1, 2, 80.0), t0 + ms(30));
    menu.pointer_move(at(0, 2, 80.0), t0 + ms(40));
    assert!(menu.is_timer_pending(TimerKind::SpringLoad));
}

#[tokio::test]
async fn test_empty_lazy_item_becomes_a_leaf() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (mut menu, log) = menu(vec![
        lazy("nothing", 0, calls.clone()),
        MenuItem::new("copy", "Copy"),
    ]);
    let t0 = Instant::now();
    menu.open(CENTER);

    let pending = menu.click(at(0, 2, 80.0), t0).load.unwrap();
    menu.finish_load(pending.run().await, t0 + ms(5));
    assert_eq!(menu.cache().get(&ItemId::from("nothing")).map(|c| c.len()), Some(0));
    take(&log);

    for round in 0..3u64 {
        let t = t0 + ms(100 + round * 1000);
        menu.pointer_move(at(1, 2, 80.0), t);
        menu.pointer_move(at(0, 2, 80.0), t + ms(10));
        assert!(!menu.is_timer_pending(TimerKind::SpringLoad));
        menu.tick(t + ms(600));
    }
    assert!(take(&log).is_empty());

    let t1 = t0 + ms(5000);
    menu.pointer_down(CENTER, t1);
    let response = menu.pointer_move(at(0, 2, 100.0), t1 + ms(50));
    assert!(response.load.is_none());
    assert_eq!(menu.depth(), 0);

    menu.click(at(0, 2, 80.0), t1 + ms(100));
    assert!(!menu.is_open());
    assert_eq!(take(&log), vec!["selected nothing", "closed"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_spring_load_enters_after_dwell() {
    let (mut menu, log) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    menu.pointer_move(at(0, 2, 80.0), t0);
    assert_eq!(menu.next_deadline(), Some(t0 + ms(500)));
    assert!(!menu.tick(t0 + ms(499)).redraw);
    assert_eq!(menu.depth(), 0);

    assert!(menu.tick(t0 + ms(500)).redraw);
    assert_eq!(menu.depth(), 1);
    assert!(menu.is_confirmed());
    assert_eq!(
        take(&log),
        vec![
            "opened x=500.0 y=500.0",
            "springLoadFired edit",
            "submenuEntered edit depth=1",
        ]
    );
}

#[test]
fn test_spring_load_follows_the_hover() {
    let (mut menu, log) = menu(vec![folder("a"), folder("b"), MenuItem::new("c", "C")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    menu.pointer_move(at(0, 3, 80.0), t0);
    menu.pointer_move(at(2, 3, 80.0), t0 + ms(200));
    assert!(!menu.is_timer_pending(TimerKind::SpringLoad));
    menu.tick(t0 + ms(600));
    assert_eq!(menu.depth(), 0);

    menu.pointer_move(at(0, 3, 80.0), t0 + ms(700));
    menu.pointer_move(at(1, 3, 80.0), t0 + ms(1000));
    menu.tick(t0 + ms(1200));
    assert_eq!(menu.depth(), 0);
    menu.tick(t0 + ms(1500));
    assert_eq!(menu.stack()[0].item.id.as_str(), "b");
    assert!(take(&log).contains(&"springLoadFired b".to_string()));
}

#[test]
fn test_spring_load_can_be_disabled() {
    let mut config = MenuConfig::default();
    config.gestures.spring_load = false;
    let (mut menu, _) = menu_with(config, vec![folder("edit")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    menu.pointer_move(at(0, 1, 80.0), t0);
    assert_eq!(menu.next_deadline(), None);
}

#[test]
fn test_fast_outward_drag_enters_without_waiting() {
    let (mut menu, log) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    menu.pointer_down(CENTER, t0);
    assert!(menu.is_tracking());
    menu.pointer_move(at(0, 2, 100.0), t0 + ms(50));
    assert!(menu.velocity().speed() > 600.0);
    assert_eq!(menu.depth(), 1);
    assert!(menu.is_confirmed());
    assert!(!menu.is_timer_pending(TimerKind::SpringLoad));
    assert_eq!(
        take(&log),
        vec!["opened x=500.0 y=500.0", "submenuEntered edit depth=1"]
    );
}

#[test]
fn test_slow_or_untracked_drag_does_not_enter() {
    let (mut menu, _) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    menu.pointer_down(CENTER, t0);
    menu.pointer_move(at(0, 2, 100.0), t0 + ms(1000));
    assert_eq!(menu.depth(), 0);

    menu.pointer_up(at(0, 2, 100.0), t0 + ms(1010));
    assert!(!menu.is_tracking());
    menu.pointer_move(CENTER, t0 + ms(1020));
    menu.pointer_move(at(0, 2, 100.0), t0 + ms(1030));
    assert_eq!(menu.depth(), 0);

    let mut config = MenuConfig::default();
    config.gestures.drag_through = false;
    let (mut menu, _) = menu_with(config, vec![folder("edit")]);
    menu.open(CENTER);
    menu.pointer_down(CENTER, t0);
    menu.pointer_move(at(0, 1, 100.0), t0 + ms(20));
    assert_eq!(menu.depth(), 0);
}

fn spring_into_folder(menu: &mut RadialMenu, t0: Instant) {
    menu.open(CENTER);
    menu.pointer_move(at(0, 2, 80.0), t0);
    menu.tick(t0 + ms(500));
    assert_eq!(menu.depth(), 1);
}

#[test]
fn test_dwell_in_back_zone_exits_one_level() {
    let (mut menu, log) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();
    spring_into_folder(&mut menu, t0);
    take(&log);

    let t1 = t0 + ms(600);
    menu.pointer_move(Point::new(510.0, 500.0), t1);
    assert_eq!(
        menu.timer(TimerKind::BackDwell).map(|t| t.deadline),
        Some(t1 + ms(400))
    );

    // small movement inside the zone keeps the original deadline
    menu.pointer_move(Point::new(505.0, 505.0), t1 + ms(200));
    assert_eq!(menu.next_deadline(), Some(t1 + ms(400)));

    menu.tick(t1 + ms(399));
    assert_eq!(menu.depth(), 1);
    menu.tick(t1 + ms(400));
    assert_eq!(menu.depth(), 0);
    assert_eq!(take(&log), vec!["submenuExited edit depth=0"]);
}

#[test]
fn test_leaving_back_zone_cancels_exit() {
    let (mut menu, _) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();
    spring_into_folder(&mut menu, t0);

    let t1 = t0 + ms(600);
    menu.pointer_move(Point::new(510.0, 500.0), t1);
    menu.pointer_move(Point::new(560.0, 500.0), t1 + ms(200));
    assert!(!menu.is_timer_pending(TimerKind::BackDwell));
    menu.tick(t1 + ms(1000));
    assert_eq!(menu.depth(), 1);
}

#[test]
fn test_click_entry_waits_for_confirmation() {
    let (mut menu, _) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    menu.click(at(0, 2, 80.0), t0);
    assert_eq!(menu.depth(), 1);
    assert!(!menu.is_confirmed());

    menu.pointer_move(Point::new(505.0, 500.0), t0 + ms(10));
    assert!(!menu.is_timer_pending(TimerKind::BackDwell));

    // past outer * 1.2
    menu.pointer_move(at(0, 2, 250.0), t0 + ms(20));
    assert!(!menu.is_confirmed());

    menu.pointer_move(at(0, 2, 150.0), t0 + ms(30));
    assert!(menu.is_confirmed());
    menu.pointer_move(Point::new(505.0, 500.0), t0 + ms(40));
    assert!(menu.is_timer_pending(TimerKind::BackDwell));
}

#[test]
fn test_select_fires_handler_and_closes() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let copy = MenuItem::new("copy", "Copy").on_select(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let (mut menu, log) = menu(vec![copy, MenuItem::new("paste", "Paste")]);
    let t0 = Instant::now();
    menu.open(CENTER);

    assert!(menu.click(at(0, 2, 80.0), t0).redraw);
    assert!(!menu.is_open());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        take(&log),
        vec!["opened x=500.0 y=500.0", "selected copy", "closed"]
    );
}

#[test]
fn test_inert_items_ignore_clicks() {
    let (mut menu, log) = menu(vec![
        MenuItem::new("label", "Label").with_selectable(false),
        MenuItem::new("gone", "Gone").with_disabled(true),
        folder("locked").with_disabled(true),
    ]);
    let t0 = Instant::now();
    menu.open(CENTER);
    take(&log);

    for index in 0..3 {
        menu.click(at(index, 3, 80.0), t0 + ms(index as u64));
        assert!(menu.is_open());
        assert_eq!(menu.depth(), 0);
    }
    assert_eq!(menu.hovered(), Some(2));
    assert!(!menu.is_timer_pending(TimerKind::SpringLoad));
    assert!(take(&log).is_empty());
}

#[test]
fn test_click_outside_items_backs_out_then_closes() {
    let (mut menu, log) = menu(vec![folder("edit")]);
    let t0 = Instant::now();
    menu.open(CENTER);
    menu.click(at(0, 1, 80.0), t0);
    assert_eq!(menu.depth(), 1);

    menu.click(CENTER, t0 + ms(10));
    assert_eq!(menu.depth(), 0);
    menu.click(CENTER, t0 + ms(20));
    assert!(!menu.is_open());
    assert_eq!(
        take(&log),
        vec![
            "opened x=500.0 y=500.0",
            "submenuEntered edit depth=1",
            "submenuExited edit depth=0",
            "closed",
        ]
    );
}

#[test]
fn test_keyboard_focus_wraps_and_skips_disabled() {
    let (mut menu, log) = menu(vec![
        MenuItem::new("a", "A"),
        MenuItem::new("b", "B").with_disabled(true),
        MenuItem::new("c", "C"),
        folder("d"),
    ]);
    menu.open(CENTER);

    let focus = |menu: &mut RadialMenu, key| {
        menu.key(key);
        menu.focused()
    };
    assert_eq!(focus(&mut menu, Key::Right), Some(0));
    assert_eq!(focus(&mut menu, Key::Right), Some(2));
    assert_eq!(focus(&mut menu, Key::Right), Some(3));
    assert_eq!(focus(&mut menu, Key::Right), Some(0));
    assert_eq!(focus(&mut menu, Key::Left), Some(3));
    assert_eq!(focus(&mut menu, Key::Home), Some(0));
    assert_eq!(focus(&mut menu, Key::End), Some(3));
    menu.scroll(1.0);
    assert_eq!(menu.focused(), Some(0));
    menu.scroll(-1.0);
    assert_eq!(menu.focused(), Some(3));
    assert_eq!(menu.hovered(), None);

    menu.key(Key::Enter);
    assert_eq!(menu.depth(), 1);
    assert_eq!(menu.focused(), None);
    menu.key(Key::Backspace);
    assert_eq!(menu.depth(), 0);
    menu.key(Key::Up);
    assert!(!menu.is_open());
    assert_eq!(take(&log).last().map(String::as_str), Some("closed"));
}

#[test]
fn test_digits_activate_directly() {
    let (mut menu, log) = menu(vec![
        MenuItem::new("a", "A"),
        MenuItem::new("b", "B").with_disabled(true),
        MenuItem::new("c", "C"),
    ]);
    menu.open(CENTER);

    menu.key(Key::Digit(2));
    assert!(menu.is_open());
    assert_eq!(menu.focused(), Some(1));
    menu.key(Key::Digit(9));
    assert_eq!(menu.focused(), Some(1));

    menu.key(Key::Digit(3));
    assert!(!menu.is_open());
    assert_eq!(
        take(&log),
        vec!["opened x=500.0 y=500.0", "selected c", "closed"]
    );

    menu.open(CENTER);
    menu.key(Key::Escape);
    assert!(!menu.is_open());
    assert!(!menu.key(Key::Right).redraw);
}

#[test]
fn test_drop_on_hovered_item() {
    let (mut menu, log) = menu(leaves("slot", 4));
    let t0 = Instant::now();

    menu.open_as_drop_target(CENTER, t0);
    assert!(menu.is_drop_target());
    menu.update_hover_from_point(at(2, 4, 90.0), t0 + ms(16));
    menu.pointer_up(at(2, 4, 90.0), t0 + ms(32));
    assert!(menu.is_tracking());

    menu.drop_on_hovered(DropPayload::from("notes.txt"));
    assert!(!menu.is_open());
    assert!(!menu.is_drop_target());
    assert_eq!(
        take(&log),
        vec![
            "opened x=500.0 y=500.0",
            "dropped slot-2 data=notes.txt",
            "closed",
        ]
    );
}

#[test]
fn test_drop_outside_or_cancelled_emits_nothing() {
    let (mut menu, log) = menu(leaves("slot", 4));
    let t0 = Instant::now();

    menu.open_as_drop_target(CENTER, t0);
    menu.update_hover_from_point(Point::new(505.0, 505.0), t0 + ms(16));
    menu.drop_on_hovered(DropPayload::from("x"));
    assert!(!menu.is_open());

    menu.open_as_drop_target(CENTER, t0);
    menu.update_hover_from_point(at(1, 4, 90.0), t0 + ms(16));
    menu.cancel_drop();
    assert!(!menu.is_open());

    assert!(!take(&log).iter().any(|e| e.starts_with("dropped")));
}

#[test]
fn test_flip_near_the_right_edge() {
    let (mut menu, _) = menu(leaves("item", 4));
    menu.set_viewport(Some(Viewport::new(1024.0, 768.0)));
    let origin = Point::new(980.0, 384.0);
    let t0 = Instant::now();

    menu.open(origin);
    assert_eq!(menu.position(), origin);
    assert!(menu.edge_state().constrained.right);
    assert!(menu.flip_state().flip_x);
    assert!(!menu.flip_state().flip_y);

    for sector in menu.sectors() {
        menu.pointer_move(sector.anchor, t0);
        assert_eq!(menu.hovered(), Some(sector.index));
    }
}

#[test]
fn test_shift_pushes_the_center_inward() {
    let config = MenuConfig {
        edge_behavior: EdgeBehavior::Shift,
        ..MenuConfig::default()
    };
    let (mut menu, _) = menu_with(config, leaves("item", 4));
    menu.set_viewport(Some(Viewport::new(1024.0, 768.0)));

    menu.open(Point::new(980.0, 384.0));
    assert_eq!(menu.position(), Point::new(896.0, 384.0));
    assert!(!menu.flip_state().flip_x);

    menu.open(Point::new(512.0, 384.0));
    assert_eq!(menu.position(), Point::new(512.0, 384.0));
}

#[test]
fn test_close_cancels_every_timer() {
    let (mut menu, _) = menu(vec![folder("edit"), MenuItem::new("copy", "Copy")]);
    let t0 = Instant::now();
    menu.open(CENTER);
    menu.pointer_move(at(0, 2, 80.0), t0);
    assert!(menu.next_deadline().is_some());

    menu.close();
    assert_eq!(menu.next_deadline(), None);
    assert_eq!(menu.trail(t0).count(), 0);
    assert!(!menu.tick(t0 + ms(5000)).redraw);
    assert_eq!(menu.depth(), 0);
}

#[test]
fn test_set_items_replaces_root_and_cache() {
    let (mut menu, log) = menu(vec![folder("edit")]);
    menu.open(CENTER);
    menu.set_items(leaves("new", 2));
    assert!(!menu.is_open());
    assert_eq!(menu.root_items().len(), 2);
    assert_eq!(take(&log).last().map(String::as_str), Some("closed"));

    let bad = MenuConfig {
        inner_radius: 200.0,
        ..MenuConfig::default()
    };
    assert!(menu.set_config(bad.clone()).is_err());
    assert!(RadialMenu::new(bad, Vec::new()).is_err());
}
