use core::marker::PhantomData;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::error;

use crate::{
    container::Container,
    errors::InjectErrorKind,
    injectable::Injectable,
    instance::{downcast, Instance},
    name::BindingName,
};

/// Lifecycle tag of a constructed object.
///
/// States only ever advance; `Initialized` is terminal. A singleton binding
/// rests in its current state, so a dependent receiving an instance through
/// cycle-breaking can observe `Constructed` and know injection of that
/// instance has not finished yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BindingState {
    Unconstructed,
    Constructed,
    Injected,
    Initialized,
}

pub(crate) struct BindingCell {
    pub(crate) state: BindingState,
    pub(crate) instance: Option<Instance>,
}

/// A registered name's recipe for producing an instance.
pub(crate) struct Binding {
    pub(crate) name: String,
    pub(crate) aliases: RwLock<Vec<String>>,
    pub(crate) is_singleton: bool,
    pub(crate) cell: Mutex<BindingCell>,
    pub(crate) wire: Option<Box<dyn Wire>>,
}

impl Binding {
    #[must_use]
    pub(crate) fn singleton(name: String, wire: Box<dyn Wire>) -> Self {
        Self::empty(name, true, Some(wire))
    }

    #[must_use]
    pub(crate) fn transient(name: String, wire: Box<dyn Wire>) -> Self {
        Self::empty(name, false, Some(wire))
    }

    /// A fixed-value binding: always singleton, never wired or initialized.
    #[must_use]
    pub(crate) fn value(name: String, instance: Instance) -> Self {
        Self {
            aliases: RwLock::new(vec![name.clone()]),
            name,
            is_singleton: true,
            cell: Mutex::new(BindingCell {
                state: BindingState::Injected,
                instance: Some(instance),
            }),
            wire: None,
        }
    }

    #[must_use]
    fn empty(name: String, is_singleton: bool, wire: Option<Box<dyn Wire>>) -> Self {
        Self {
            aliases: RwLock::new(vec![name.clone()]),
            name,
            is_singleton,
            cell: Mutex::new(BindingCell {
                state: BindingState::Unconstructed,
                instance: None,
            }),
            wire,
        }
    }

    pub(crate) fn push_alias(&self, alias: &str) {
        self.aliases.write().push(alias.to_owned());
    }

    pub(crate) fn set_state(&self, state: BindingState) {
        self.cell.lock().state = state;
    }
}

/// Type-erased bridge from a binding to its payload's [`Injectable`]
/// capabilities, captured at registration when the payload type is known.
pub(crate) trait Wire: Send + Sync {
    fn before_inject(&self, instance: &Instance);

    fn inject(&self, container: &Container, instance: &Instance) -> Result<(), InjectErrorKind>;

    fn after_inject(&self, instance: &Instance);

    fn init(&self, instance: &Instance);
}

pub(crate) struct TypedWire<P: ?Sized>(PhantomData<fn(&P)>);

#[must_use]
pub(crate) fn wire_of<P: Injectable + ?Sized>() -> Box<dyn Wire> {
    Box::new(TypedWire::<P>(PhantomData))
}

impl<P: Injectable + ?Sized> TypedWire<P> {
    fn handle(&self, instance: &Instance) -> Option<Arc<P>> {
        let handle = downcast::<P>(instance);
        if handle.is_none() {
            error!(
                "Binding payload is not the registered {}",
                BindingName::of::<P>()
            );
        }
        handle
    }
}

impl<P: Injectable + ?Sized> Wire for TypedWire<P> {
    fn before_inject(&self, instance: &Instance) {
        if let Some(handle) = self.handle(instance) {
            handle.before_inject();
        }
    }

    fn inject(&self, container: &Container, instance: &Instance) -> Result<(), InjectErrorKind> {
        match self.handle(instance) {
            Some(handle) => container.inject(handle.as_ref()),
            None => Ok(()),
        }
    }

    fn after_inject(&self, instance: &Instance) {
        if let Some(handle) = self.handle(instance) {
            handle.after_inject();
        }
    }

    fn init(&self, instance: &Instance) {
        if let Some(handle) = self.handle(instance) {
            handle.init();
        }
    }
}
