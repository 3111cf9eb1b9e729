use core::any::Any;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    container::Container,
    env::FromEnvStr,
    instance::downcast,
    name::BindingName,
};

/// A type that can receive dependencies from a [`Container`].
///
/// All methods have default no-op bodies; a type overrides exactly the
/// capabilities it has. `inject` visits the type's injection points, one
/// [`Injector::service`]/[`Injector::value`] call per point.
///
/// Trait-object payloads are supported by making this a supertrait of the
/// service trait:
///
/// ```rust
/// use wirebox::{Injectable, Injector, Slot};
///
/// trait Clock: Injectable {
///     fn now(&self) -> u64;
/// }
///
/// #[derive(Default)]
/// struct Stopwatch {
///     clock: Slot<dyn Clock>,
/// }
///
/// impl Injectable for Stopwatch {
///     fn inject(&self, injector: &Injector<'_>) {
///         injector.service("", &self.clock);
///     }
/// }
/// ```
pub trait Injectable: Any + Send + Sync {
    /// Visits each injection point. The default body declares none.
    #[allow(unused_variables)]
    fn inject(&self, injector: &Injector<'_>) {}

    /// Runs immediately before the injection pass of a resolution.
    fn before_inject(&self) {}

    /// Runs immediately after the injection pass of a resolution.
    fn after_inject(&self) {}

    /// Runs once per constructed instance, after injection completes.
    fn init(&self) {}
}

/// Interior-mutable holder for an injected dependency.
///
/// Starts empty and is filled by the injection pass (or manually via
/// [`Slot::set`]). A slot that is already set is left untouched by the
/// injector.
pub struct Slot<T: ?Sized> {
    cell: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Slot<T> {
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cell: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.read().clone()
    }

    pub fn set(&self, handle: Arc<T>) {
        *self.cell.write() = Some(handle);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.cell.read().is_some()
    }
}

impl<T: Copy> Slot<T> {
    /// The held value, copied out.
    #[must_use]
    pub fn copied(&self) -> Option<T> {
        self.cell.read().as_deref().copied()
    }
}

impl<T: ?Sized> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

pub(crate) struct PointFailure {
    pub(crate) key: String,
}

/// Resolves injection points on behalf of an [`Injectable::inject`] pass.
///
/// An empty key means "derive the key from the slot's payload type path".
/// Point failures never abort the pass; they are recorded, reported as
/// error-level events, and settled by the container once the pass is over.
pub struct Injector<'a> {
    container: &'a Container,
    target: &'static str,
    failures: Mutex<Vec<PointFailure>>,
}

impl<'a> Injector<'a> {
    #[must_use]
    pub(crate) fn new(container: &'a Container, target: &'static str) -> Self {
        Self {
            container,
            target,
            failures: Mutex::new(Vec::new()),
        }
    }

    /// The container this injector resolves through.
    #[must_use]
    pub fn container(&self) -> &Container {
        self.container
    }

    /// Fills `slot` from the registry binding for `key`.
    pub fn service<T>(&self, key: &str, slot: &Slot<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = derive_key::<T>(key);
        if slot.is_set() {
            debug!("Skipped pre-filled injection point: key={key}");
            return;
        }

        match self.container.try_resolve(key) {
            Ok(instance) => match downcast::<T>(&instance) {
                Some(handle) => slot.set(handle),
                None => self.fail(key, "binding payload type mismatch"),
            },
            Err(err) => self.fail(key, err),
        }
    }

    /// Fills `slot` from the registry binding for `key`, falling back to the
    /// environment source (upper-cased key, textual parse) on a miss.
    pub fn value<T>(&self, key: &str, slot: &Slot<T>)
    where
        T: FromEnvStr + Send + Sync + 'static,
    {
        let key = derive_key::<T>(key);
        if slot.is_set() {
            debug!("Skipped pre-filled injection point: key={key}");
            return;
        }

        match self.container.try_resolve(key) {
            Ok(instance) => match downcast::<T>(&instance) {
                Some(handle) => slot.set(handle),
                None => self.fail(key, "binding payload type mismatch"),
            },
            Err(_) => match self.container.env().get(&key.to_uppercase()) {
                Some(raw) => match T::from_env_str(&raw) {
                    Ok(value) => slot.set(Arc::new(value)),
                    Err(err) => self.fail(key, err),
                },
                None => self.fail(key, "no binding and no environment value"),
            },
        }
    }

    fn fail(&self, key: &str, reason: impl core::fmt::Display) {
        error!(
            "Cannot resolve injection point: target={}, key={key}: {reason}",
            self.target
        );
        self.failures.lock().push(PointFailure { key: key.to_owned() });
    }

    #[must_use]
    pub(crate) fn into_failures(self) -> Vec<PointFailure> {
        self.failures.into_inner()
    }
}

fn derive_key<T: ?Sized + 'static>(key: &str) -> &str {
    let key = key.trim();
    if key.is_empty() {
        BindingName::of::<T>().as_str()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;
    use std::sync::Arc;

    #[test]
    fn test_slot_starts_empty() {
        let slot: Slot<u32> = Slot::default();
        assert!(!slot.is_set());
        assert!(slot.get().is_none());
        assert!(slot.copied().is_none());
    }

    #[test]
    fn test_slot_set_and_read() {
        let slot = Slot::empty();
        slot.set(Arc::new(5u32));
        assert!(slot.is_set());
        assert_eq!(slot.copied(), Some(5));
        assert_eq!(*slot.get().unwrap(), 5);
    }

    #[test]
    fn test_slot_holds_trait_objects() {
        trait Named: Send + Sync {
            fn name(&self) -> &'static str;
        }

        struct Only;

        impl Named for Only {
            fn name(&self) -> &'static str {
                "only"
            }
        }

        let slot: Slot<dyn Named> = Slot::empty();
        slot.set(Arc::new(Only));
        assert_eq!(slot.get().unwrap().name(), "only");
    }
}
