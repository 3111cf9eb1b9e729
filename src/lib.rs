#[macro_use]
pub(crate) mod macros;

pub(crate) mod binding;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod env;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod injectable;
pub(crate) mod instance;
pub(crate) mod name;

pub mod global;

pub use binding::BindingState;
pub use config::Config;
pub use container::Container;
pub use env::{EnvParseError, EnvSource, FromEnvStr, ProcessEnv};
pub use errors::{CreateErrorKind, InjectErrorKind, ResolveErrorKind};
pub use factory::{arg, ArgValue, Creator, Factory, FromArg};
pub use injectable::{Injectable, Injector, Slot};
pub use instance::Instance;
pub use name::{BindingName, TypeInfo};
