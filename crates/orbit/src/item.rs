use derive_more::{AsRef, Deref, Display, From, Into};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

/// Opaque data handed over by an external drag source.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct DropPayload(String);

crate::impl_string_newtype!(DropPayload);

/// An item list shared between the active ring, navigation snapshots and the
/// child cache. Cloning only bumps a reference count.
pub type ItemList = Arc<[MenuItem]>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadError {
    message: String,
}

impl LoadError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type LoadFuture = BoxFuture<'static, Result<Vec<MenuItem>, LoadError>>;

#[derive(Clone)]
pub struct ChildLoader(Arc<dyn Fn() -> LoadFuture + Send + Sync>);

impl ChildLoader {
    pub fn new<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<MenuItem>, LoadError>> + Send + 'static,
    {
        Self(Arc::new(move || load().boxed()))
    }

    pub fn load(&self) -> LoadFuture {
        (self.0)()
    }
}

impl fmt::Debug for ChildLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChildLoader(..)")
    }
}

#[derive(Clone)]
pub struct SelectHandler(Arc<dyn Fn(&MenuItem) + Send + Sync>);

impl fmt::Debug for SelectHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SelectHandler(..)")
    }
}

/// Whether an item's submenu is already known or still has to be fetched.
#[derive(Debug, Clone, Default)]
pub enum Children {
    #[default]
    None,
    Loaded(ItemList),
    Lazy(ChildLoader),
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub id: ItemId,
    pub label: String,
    pub disabled: bool,
    pub selectable: bool,
    pub children: Children,
    on_select: Option<SelectHandler>,
}

impl MenuItem {
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
            selectable: true,
            children: Children::None,
            on_select: None,
        }
    }

    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = Children::Loaded(children.into());
        self
    }

    pub fn with_loader<F, Fut>(mut self, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<MenuItem>, LoadError>> + Send + 'static,
    {
        self.children = Children::Lazy(ChildLoader::new(load));
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn on_select(mut self, handler: impl Fn(&MenuItem) + Send + Sync + 'static) -> Self {
        self.on_select = Some(SelectHandler(Arc::new(handler)));
        self
    }

    pub fn is_expandable(&self) -> bool {
        match &self.children {
            Children::None => false,
            Children::Loaded(items) => !items.is_empty(),
            Children::Lazy(_) => true,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable && !self.disabled
    }

    pub fn loaded_children(&self) -> Option<&ItemList> {
        match &self.children {
            Children::Loaded(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }

    pub fn loader(&self) -> Option<&ChildLoader> {
        match &self.children {
            Children::Lazy(loader) => Some(loader),
            _ => None,
        }
    }

    pub(crate) fn notify_selected(&self) {
        if let Some(SelectHandler(handler)) = &self.on_select {
            handler(self);
        }
    }
}
