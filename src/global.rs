//! The process-wide default container and free functions mirroring its
//! methods.
//!
//! A thin convenience facade: everything here forwards to one lazily-created
//! [`Container`] with the default (strict) configuration and the process
//! environment. Components that want explicit ownership should construct and
//! pass their own [`Container`] instead.

use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::{
    binding::BindingState,
    container::Container,
    errors::{InjectErrorKind, ResolveErrorKind},
    factory::Creator,
    injectable::Injectable,
    instance::Instance,
    name::BindingName,
};

static DEFAULT: Lazy<Container> = Lazy::new(Container::new);

/// The default container itself, for call sites that want to pass it on.
#[must_use]
pub fn default_container() -> &'static Container {
    &DEFAULT
}

/// See [`Container::register_value`].
pub fn register_value<T: Send + Sync + 'static>(name: impl Into<String>, value: T) {
    DEFAULT.register_value(name, value);
}

/// See [`Container::register_shared`].
pub fn register_shared<P: ?Sized + Send + Sync + 'static>(name: impl Into<String>, handle: Arc<P>) {
    DEFAULT.register_shared(name, handle);
}

/// See [`Container::register_singleton`].
pub fn register_singleton<P: Default + Injectable>() -> BindingName {
    DEFAULT.register_singleton::<P>()
}

/// See [`Container::register_transient`].
pub fn register_transient<P: Default + Injectable>() -> BindingName {
    DEFAULT.register_transient::<P>()
}

/// See [`Container::register_singleton_creator`].
pub fn register_singleton_creator<Args, C>(name: impl Into<String>, creator: C)
where
    C: Creator<Args>,
    C::Produces: Injectable,
{
    DEFAULT.register_singleton_creator(name, creator);
}

/// See [`Container::register_transient_creator`].
pub fn register_transient_creator<Args, C>(name: impl Into<String>, creator: C)
where
    C: Creator<Args>,
    C::Produces: Injectable,
{
    DEFAULT.register_transient_creator(name, creator);
}

/// See [`Container::register_aliases`].
pub fn register_aliases(origin: &str, aliases: &[&str]) {
    DEFAULT.register_aliases(origin, aliases);
}

/// See [`Container::aliases`].
#[must_use]
pub fn aliases(name: &str) -> Vec<String> {
    DEFAULT.aliases(name)
}

/// See [`Container::contains`].
#[must_use]
pub fn contains(name: &str) -> bool {
    DEFAULT.contains(name)
}

/// See [`Container::binding_state`].
#[must_use]
pub fn binding_state(name: &str) -> Option<BindingState> {
    DEFAULT.binding_state(name)
}

/// See [`Container::resolve`].
///
/// # Errors
/// See [`Container::resolve`].
pub fn resolve(name: &str) -> Result<Instance, ResolveErrorKind> {
    DEFAULT.resolve(name)
}

/// See [`Container::resolve_as`].
///
/// # Errors
/// See [`Container::resolve_as`].
pub fn resolve_as<P>(name: &str) -> Result<Arc<P>, ResolveErrorKind>
where
    P: ?Sized + Send + Sync + 'static,
{
    DEFAULT.resolve_as(name)
}

/// See [`Container::resolve_of`].
///
/// # Errors
/// See [`Container::resolve_of`].
pub fn resolve_of<P>() -> Result<Arc<P>, ResolveErrorKind>
where
    P: ?Sized + Send + Sync + 'static,
{
    DEFAULT.resolve_of()
}

/// See [`Container::inject`].
///
/// # Errors
/// See [`Container::inject`].
pub fn inject<P: Injectable + ?Sized>(target: &P) -> Result<(), InjectErrorKind> {
    DEFAULT.inject(target)
}

/// See [`Container::preload`].
pub fn preload() {
    DEFAULT.preload();
}

#[cfg(test)]
mod tests {
    use crate::injectable::{Injectable, Injector, Slot};
    use std::sync::Arc;

    #[derive(Default)]
    struct Motd {
        text: Slot<String>,
    }

    impl Injectable for Motd {
        fn inject(&self, injector: &Injector<'_>) {
            injector.value("global/motd_text", &self.text);
        }
    }

    #[test]
    fn test_default_container_is_shared() {
        super::register_value("global/motd_text", "hello".to_owned());
        super::register_singleton::<Motd>();

        let motd = super::resolve_of::<Motd>().unwrap();
        assert_eq!(*motd.text.get().unwrap(), "hello");
        assert!(super::contains("global/motd_text"));

        let again = super::resolve_of::<Motd>().unwrap();
        assert!(Arc::ptr_eq(&motd, &again));
    }
}
