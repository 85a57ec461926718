//! Headless radial menu engine.
//!
//! [`RadialMenu`] consumes pointer, keyboard and timer input and reports what
//! happened through its [`EventBus`]. Drawing is left to the caller, which can
//! ask for [`SectorGeometry`] of the active ring.

mod macros;

pub mod config;
pub mod edge;
pub mod events;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod loader;
pub mod menu;
pub mod motion;
pub mod navigation;
pub mod selection;

pub use config::{ConfigError, EdgeBehavior, GestureConfig, MenuConfig};
pub use edge::{EdgeState, FlipMode, FlipState, Viewport};
pub use events::{EventBus, MenuEvent, SubscriptionId};
pub use geometry::{Point, Velocity};
pub use item::{Children, DropPayload, ItemId, ItemList, LoadError, MenuItem};
pub use layout::SectorGeometry;
pub use loader::{LoadOutcome, PendingLoad};
pub use menu::{Key, RadialMenu, Response, TimerKind, UnknownKey};
pub use motion::TracePoint;
