use core::any::Any;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info};

use crate::{
    errors::CreateErrorKind,
    injectable::Injectable,
    instance::{erase, Instance},
    name::{BindingName, TypeInfo},
};

/// A type-erased creator argument.
pub type ArgValue = Arc<dyn Any + Send + Sync>;

pub(crate) type CallArgs = Arc<[ArgValue]>;

/// Erases a value for use as a creator argument.
#[inline]
#[must_use]
pub fn arg<T: Send + Sync + 'static>(value: T) -> ArgValue {
    Arc::new(value)
}

/// Extraction of a typed creator parameter from an [`ArgValue`].
pub trait FromArg: Sized + 'static {
    #[must_use]
    fn from_arg(arg: &ArgValue) -> Option<Self>;

    #[must_use]
    fn type_info() -> TypeInfo;
}

impl<T: Clone + Send + Sync + 'static> FromArg for T {
    fn from_arg(arg: &ArgValue) -> Option<Self> {
        arg.downcast_ref::<T>().cloned()
    }

    fn type_info() -> TypeInfo {
        TypeInfo::of::<T>()
    }
}

/// A construction function for one binding name.
///
/// Implemented for closures of up to eight [`FromArg`] parameters returning
/// `Result<Arc<P>, E>`; the payload `P` may be unsized, so the closure is
/// where a trait-object payload gets its unsizing coercion, statically.
pub trait Creator<Args>: Clone + Send + Sync + 'static {
    /// Payload type this creator produces.
    type Produces: ?Sized + Send + Sync + 'static;

    #[must_use]
    fn params() -> Vec<TypeInfo>;

    /// # Errors
    /// Returns [`CreateErrorKind`] on an argument count/type mismatch or a
    /// failure of the construction function itself.
    fn create(&mut self, args: &[ArgValue]) -> Result<Arc<Self::Produces>, CreateErrorKind>;
}

macro_rules! impl_creator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_variables, unused_mut)]
        impl<F, P, Err, $($ty,)*> Creator<($($ty,)*)> for F
        where
            F: FnMut($($ty),*) -> Result<Arc<P>, Err> + Clone + Send + Sync + 'static,
            P: ?Sized + Send + Sync + 'static,
            Err: Into<CreateErrorKind>,
            $( $ty: FromArg, )*
        {
            type Produces = P;

            fn params() -> Vec<TypeInfo> {
                vec![$( $ty::type_info(), )*]
            }

            fn create(&mut self, args: &[ArgValue]) -> Result<Arc<P>, CreateErrorKind> {
                let expected = <Self as Creator<($($ty,)*)>>::params().len();
                if args.len() != expected {
                    return Err(CreateErrorKind::ArgCount {
                        expected,
                        actual: args.len(),
                    });
                }

                let mut iter = args.iter().enumerate();
                $(
                    let $ty = {
                        let (index, arg) = iter.next().expect("argument count was checked above");
                        match $ty::from_arg(arg) {
                            Some(val) => val,
                            None => {
                                return Err(CreateErrorKind::ArgType {
                                    index,
                                    expected: $ty::type_info().name,
                                })
                            }
                        }
                    };
                )*

                (self)($($ty),*).map_err(Into::into)
            }
        }
    };
}

all_the_tuples!(impl_creator);

pub(crate) trait CloneCreator: Send + Sync {
    fn call(&mut self, args: &[ArgValue]) -> Result<Instance, CreateErrorKind>;

    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneCreator>;
}

impl<T> CloneCreator for T
where
    T: FnMut(&[ArgValue]) -> Result<Instance, CreateErrorKind> + Clone + Send + Sync + 'static,
{
    fn call(&mut self, args: &[ArgValue]) -> Result<Instance, CreateErrorKind> {
        (self)(args)
    }

    fn clone_box(&self) -> Box<dyn CloneCreator> {
        Box::new(self.clone())
    }
}

pub(crate) struct BoxCloneCreator(Box<dyn CloneCreator>);

impl Clone for BoxCloneCreator {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl BoxCloneCreator {
    #[inline]
    pub(crate) fn call(&mut self, args: &[ArgValue]) -> Result<Instance, CreateErrorKind> {
        self.0.call(args)
    }
}

#[must_use]
fn boxed_creator<Args, C>(mut creator: C) -> BoxCloneCreator
where
    C: Creator<Args>,
{
    BoxCloneCreator(Box::new(move |args: &[ArgValue]| {
        creator.create(args).map(erase)
    }))
}

struct CreatorEntry {
    construct: BoxCloneCreator,
    default_args: CallArgs,
}

/// Maps binding names to creators. Pure construction; dependency wiring is
/// the container's business.
pub struct Factory {
    creators: RwLock<HashMap<String, CreatorEntry>>,
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl Factory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            creators: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a creator producing `Arc::new(P::default())` under `P`'s
    /// derived name, and returns that name.
    ///
    /// # Panics
    /// Panics if the name is already used.
    pub fn register_type<P: Default + Injectable>(&self) -> BindingName {
        let name = BindingName::of::<P>();
        self.register_creator(name.as_str(), || Ok::<_, CreateErrorKind>(Arc::new(P::default())));
        name
    }

    /// Registers a creator with no default arguments.
    ///
    /// # Panics
    /// Panics if `name` is empty or already used.
    pub fn register_creator<Args, C>(&self, name: impl Into<String>, creator: C)
    where
        C: Creator<Args>,
    {
        self.register_creator_with_defaults(name, creator, Vec::new());
    }

    /// Registers a creator along with default arguments used when `create` is
    /// called without explicit ones.
    ///
    /// # Panics
    /// Panics if `name` is empty or already used, or if `default_args` does
    /// not match the creator's declared parameters in count or type.
    pub fn register_creator_with_defaults<Args, C>(&self, name: impl Into<String>, creator: C, default_args: Vec<ArgValue>)
    where
        C: Creator<Args>,
    {
        let name = name.into();
        assert!(!name.is_empty(), "creator name is empty");

        if !default_args.is_empty() {
            let params = C::params();
            assert!(
                default_args.len() == params.len(),
                "creator name={name} takes {} argument(s), {} default(s) supplied",
                params.len(),
                default_args.len(),
            );
            for (index, (arg, param)) in default_args.iter().zip(&params).enumerate() {
                assert!(
                    (**arg).type_id() == param.id,
                    "default argument {index} of creator name={name} is not assignable to {}",
                    param.name,
                );
            }
        }

        let entry = CreatorEntry {
            construct: boxed_creator(creator),
            default_args: default_args.into(),
        };

        let mut creators = self.creators.write();
        assert!(!creators.contains_key(&name), "duplicate creator for name={name}");
        info!("Registered creator: name={name}");
        creators.insert(name, entry);
    }

    /// Constructs an instance for `name` using the creator's default
    /// arguments.
    ///
    /// # Errors
    /// Returns [`CreateErrorKind::NoCreator`] if no creator is registered for
    /// `name`, or the creator's own failure.
    pub fn create(&self, name: &str) -> Result<Instance, CreateErrorKind> {
        self.create_with(name, &[])
    }

    /// Constructs an instance for `name`; non-empty `args` override the
    /// stored defaults.
    ///
    /// # Errors
    /// See [`Factory::create`]; additionally returns argument count/type
    /// mismatches.
    pub fn create_with(&self, name: &str, args: &[ArgValue]) -> Result<Instance, CreateErrorKind> {
        // Clone the creator out of the lock: construction must not run under
        // it, creators may be invoked re-entrantly during graph wiring.
        let (mut construct, default_args) = {
            let creators = self.creators.read();
            let Some(entry) = creators.get(name) else {
                return Err(CreateErrorKind::NoCreator { name: name.to_owned() });
            };
            (entry.construct.clone(), entry.default_args.clone())
        };

        let instance = if args.is_empty() {
            construct.call(&default_args)?
        } else {
            construct.call(args)?
        };
        debug!("Created: name={name}");
        Ok(instance)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.creators.read().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{arg, Factory};
    use crate::{errors::CreateErrorKind, injectable::Injectable, instance::downcast, name::BindingName};
    use std::sync::Arc;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Rectangle {
        w: f64,
        h: f64,
    }

    impl Injectable for Rectangle {}

    #[test]
    #[traced_test]
    fn test_register_type_derives_name() {
        let factory = Factory::new();
        let name = factory.register_type::<Rectangle>();

        assert_eq!(name, BindingName::of::<Rectangle>());
        assert!(factory.contains(name.as_str()));

        let instance = factory.create(name.as_str()).unwrap();
        let rectangle = downcast::<Rectangle>(&instance).unwrap();
        assert_eq!(rectangle.w, 0.0);
        assert_eq!(rectangle.h, 0.0);
    }

    #[test]
    #[traced_test]
    fn test_create_uses_default_args() {
        let factory = Factory::new();
        factory.register_creator_with_defaults(
            "shape/rectangle",
            |w: f64, h: f64| Ok::<_, CreateErrorKind>(Arc::new(Rectangle { w, h })),
            vec![arg(3.0f64), arg(4.0f64)],
        );

        let instance = factory.create("shape/rectangle").unwrap();
        let rectangle = downcast::<Rectangle>(&instance).unwrap();
        assert_eq!(rectangle.w * rectangle.h, 12.0);
    }

    #[test]
    #[traced_test]
    fn test_explicit_args_override_defaults() {
        let factory = Factory::new();
        factory.register_creator_with_defaults(
            "shape/rectangle",
            |w: f64, h: f64| Ok::<_, CreateErrorKind>(Arc::new(Rectangle { w, h })),
            vec![arg(3.0f64), arg(4.0f64)],
        );

        let instance = factory.create_with("shape/rectangle", &[arg(5.0f64), arg(6.0f64)]).unwrap();
        let rectangle = downcast::<Rectangle>(&instance).unwrap();
        assert_eq!(rectangle.w * rectangle.h, 30.0);
    }

    #[test]
    fn test_create_unknown_name() {
        let factory = Factory::new();
        assert!(matches!(
            factory.create("unknown"),
            Err(CreateErrorKind::NoCreator { .. })
        ));
        assert!(!factory.contains("unknown"));
    }

    #[test]
    fn test_create_with_wrong_arg_type() {
        let factory = Factory::new();
        factory.register_creator("shape/square", |side: f64| {
            Ok::<_, CreateErrorKind>(Arc::new(Rectangle { w: side, h: side }))
        });

        assert!(matches!(
            factory.create_with("shape/square", &[arg("wide")]),
            Err(CreateErrorKind::ArgType { index: 0, .. })
        ));
        assert!(matches!(
            factory.create_with("shape/square", &[arg(1.0f64), arg(2.0f64)]),
            Err(CreateErrorKind::ArgCount { expected: 1, actual: 2 })
        ));
    }

    #[test]
    #[should_panic(expected = "creator name is empty")]
    fn test_empty_name_panics() {
        Factory::new().register_creator("", || Ok::<_, CreateErrorKind>(Arc::new(Rectangle::default())));
    }

    #[test]
    #[should_panic(expected = "duplicate creator for name")]
    fn test_duplicate_name_panics() {
        let factory = Factory::new();
        factory.register_type::<Rectangle>();
        factory.register_type::<Rectangle>();
    }

    #[test]
    #[should_panic(expected = "1 default(s) supplied")]
    fn test_default_arg_count_mismatch_panics() {
        Factory::new().register_creator_with_defaults(
            "shape/rectangle",
            |w: f64, h: f64| Ok::<_, CreateErrorKind>(Arc::new(Rectangle { w, h })),
            vec![arg(3.0f64)],
        );
    }

    #[test]
    #[should_panic(expected = "not assignable to f64")]
    fn test_default_arg_type_mismatch_panics() {
        Factory::new().register_creator_with_defaults(
            "shape/square",
            |side: f64| Ok::<_, CreateErrorKind>(Arc::new(Rectangle { w: side, h: side })),
            vec![arg(3i32)],
        );
    }
}
