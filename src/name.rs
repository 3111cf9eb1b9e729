use core::{
    any::{type_name, TypeId},
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    ops::Deref,
};

/// Canonical binding name derived from a type path.
///
/// Derivation is deterministic: the fully-qualified path reported by
/// [`core::any::type_name`], with the `dyn ` prefix stripped for trait
/// objects so a trait and an alias spelled after it agree on one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingName(&'static str);

impl BindingName {
    #[inline]
    #[must_use]
    pub fn of<P: ?Sized + 'static>() -> Self {
        let name = type_name::<P>();
        Self(name.strip_prefix("dyn ").unwrap_or(name))
    }

    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Deref for BindingName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl AsRef<str> for BindingName {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl Display for BindingName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<BindingName> for String {
    fn from(name: BindingName) -> Self {
        name.0.to_owned()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub(crate) fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn of_val<T>(_val: &T) -> Self
    where
        T: ?Sized + 'static,
    {
        Self::of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::{BindingName, TypeInfo};

    trait Shape {}

    struct Rectangle;

    impl Shape for Rectangle {}

    #[test]
    fn test_name_is_deterministic() {
        assert_eq!(BindingName::of::<Rectangle>(), BindingName::of::<Rectangle>());
        assert_ne!(BindingName::of::<Rectangle>(), BindingName::of::<dyn Shape>());
    }

    #[test]
    fn test_trait_object_prefix_is_stripped() {
        let name = BindingName::of::<dyn Shape>();
        assert!(!name.as_str().starts_with("dyn "));
        assert!(name.as_str().ends_with("Shape"));
    }

    #[test]
    fn test_type_info_eq_by_id() {
        assert_eq!(TypeInfo::of::<Rectangle>(), TypeInfo::of_val(&Rectangle));
        assert_ne!(TypeInfo::of::<Rectangle>(), TypeInfo::of::<u8>());
    }
}
