use core::any::Any;
use std::sync::Arc;

/// A resolved instance, type-erased for storage in a binding.
///
/// The erased value always wraps an `Arc<P>` where `P` is the payload type
/// chosen at registration (`P` may be unsized, e.g. a trait object).
pub type Instance = Arc<dyn Any + Send + Sync>;

#[inline]
#[must_use]
pub(crate) fn erase<P>(handle: Arc<P>) -> Instance
where
    P: ?Sized + Send + Sync + 'static,
{
    Arc::new(handle)
}

#[inline]
#[must_use]
pub(crate) fn downcast<P>(instance: &Instance) -> Option<Arc<P>>
where
    P: ?Sized + Send + Sync + 'static,
{
    instance.downcast_ref::<Arc<P>>().cloned()
}

#[cfg(test)]
mod tests {
    use super::{downcast, erase};
    use std::sync::Arc;

    trait Greeter: Send + Sync {}

    struct English;

    impl Greeter for English {}

    #[test]
    fn test_roundtrip_sized() {
        let instance = erase(Arc::new(7i64));
        assert_eq!(*downcast::<i64>(&instance).unwrap(), 7);
        assert!(downcast::<u64>(&instance).is_none());
    }

    #[test]
    fn test_roundtrip_trait_object() {
        let instance = erase(Arc::new(English) as Arc<dyn Greeter>);
        assert!(downcast::<dyn Greeter>(&instance).is_some());
        assert!(downcast::<English>(&instance).is_none());
    }
}
