use core::any::type_name;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, error, info, info_span, warn};

use crate::{
    binding::{wire_of, Binding, BindingState},
    config::Config,
    env::{EnvSource, ProcessEnv},
    errors::{InjectErrorKind, ResolveErrorKind},
    factory::{Creator, Factory},
    injectable::{Injectable, Injector},
    instance::{downcast, erase, Instance},
    name::BindingName,
};

#[derive(Default)]
struct BindingTable {
    entries: Vec<Arc<Binding>>,
    index: HashMap<String, usize>,
}

/// The registry of named bindings: registration, resolution and injection.
///
/// A container is an explicit value with clear ownership; share it behind an
/// `Arc` (or use [`crate::global`]) when several components register or
/// resolve through the same instance.
pub struct Container {
    bindings: RwLock<BindingTable>,
    factory: Factory,
    config: Config,
    env: Arc<dyn EnvSource>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates a strict container backed by the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_env(config, Arc::new(ProcessEnv))
    }

    #[must_use]
    pub fn with_config_and_env(config: Config, env: Arc<dyn EnvSource>) -> Self {
        Self {
            bindings: RwLock::new(BindingTable::default()),
            factory: Factory::new(),
            config,
            env,
        }
    }

    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    /// The factory constructing instances for this container's bindings.
    #[must_use]
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub(crate) fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Binds a fixed instance under `name`; always a singleton, never
    /// injected or initialized. Re-registering an existing name is the one
    /// permitted overwrite and is recorded with a warning.
    ///
    /// # Panics
    /// Panics if `name` is empty.
    pub fn register_value<T: Send + Sync + 'static>(&self, name: impl Into<String>, value: T) {
        self.register_shared(name, Arc::new(value));
    }

    /// [`Container::register_value`] for an already-shared handle, e.g. an
    /// externally-constructed `Arc<dyn Service>`.
    ///
    /// # Panics
    /// Panics if `name` is empty.
    pub fn register_shared<P: ?Sized + Send + Sync + 'static>(&self, name: impl Into<String>, handle: Arc<P>) {
        let name = name.into();
        assert!(!name.is_empty(), "binding name is empty");
        info!("Registered value: name={name}");
        self.add_binding(Binding::value(name, erase(handle)));
    }

    /// Registers `P` under its derived name as a cached-and-reused binding
    /// constructed from `P::default()`.
    ///
    /// # Panics
    /// Panics if the derived name is already used by a creator.
    pub fn register_singleton<P: Default + Injectable>(&self) -> BindingName {
        let name = self.factory.register_type::<P>();
        self.add_binding(Binding::singleton(name.into(), wire_of::<P>()));
        name
    }

    /// Registers `P` under its derived name as a fresh-per-resolution
    /// binding constructed from `P::default()`.
    ///
    /// # Panics
    /// Panics if the derived name is already used by a creator.
    pub fn register_transient<P: Default + Injectable>(&self) -> BindingName {
        let name = self.factory.register_type::<P>();
        self.add_binding(Binding::transient(name.into(), wire_of::<P>()));
        name
    }

    /// Registers a cached-and-reused binding whose construction is delegated
    /// to `creator`.
    ///
    /// # Panics
    /// Panics if `name` is empty or already used by a creator.
    pub fn register_singleton_creator<Args, C>(&self, name: impl Into<String>, creator: C)
    where
        C: Creator<Args>,
        C::Produces: Injectable,
    {
        let name = name.into();
        self.factory.register_creator(name.clone(), creator);
        self.add_binding(Binding::singleton(name, wire_of::<C::Produces>()));
    }

    /// Registers a fresh-per-resolution binding whose construction is
    /// delegated to `creator`.
    ///
    /// # Panics
    /// Panics if `name` is empty or already used by a creator.
    pub fn register_transient_creator<Args, C>(&self, name: impl Into<String>, creator: C)
    where
        C: Creator<Args>,
        C::Produces: Injectable,
    {
        let name = name.into();
        self.factory.register_creator(name.clone(), creator);
        self.add_binding(Binding::transient(name, wire_of::<C::Produces>()));
    }

    /// Adds alternate lookup names for an existing binding.
    ///
    /// # Panics
    /// Panics if no binding exists for `origin`, or if an alias collides with
    /// any existing name.
    pub fn register_aliases(&self, origin: &str, aliases: &[&str]) {
        let Some(binding) = self.binding(origin) else {
            panic!("no binding registered for name={origin}");
        };

        for alias in aliases {
            assert!(!self.contains(alias), "duplicate binding for alias={alias}");
            binding.push_alias(alias);
            let mut table = self.bindings.write();
            let index = table.index[origin];
            table.index.insert((*alias).to_owned(), index);
            info!("Registered alias: origin={origin}, alias={alias}");
        }
    }

    /// All names resolving to the same binding as `name`, canonical name
    /// first; empty if `name` is unknown.
    #[must_use]
    pub fn aliases(&self, name: &str) -> Vec<String> {
        match self.binding(name) {
            Some(binding) => binding.aliases.read().clone(),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.read().index.contains_key(name)
    }

    /// The lifecycle tag of the binding for `name`.
    ///
    /// Only singleton bindings rest in a state; a transient binding always
    /// reports [`BindingState::Unconstructed`] because its instances' states
    /// live and die with each resolution.
    #[must_use]
    pub fn binding_state(&self, name: &str) -> Option<BindingState> {
        self.binding(name).map(|binding| binding.cell.lock().state)
    }

    /// Resolves `name` to a fully-wired instance.
    ///
    /// Singletons are constructed at most once and cached; transients are
    /// constructed, injected and initialized on every call.
    ///
    /// # Errors
    /// With `allow_absent`, returns [`ResolveErrorKind`] for an unknown name
    /// or a failed construction.
    ///
    /// # Panics
    /// Without `allow_absent`, the same conditions panic.
    pub fn resolve(&self, name: &str) -> Result<Instance, ResolveErrorKind> {
        self.try_resolve(name).map_err(|err| self.settle(err))
    }

    /// [`Container::resolve`], downcast to the payload registered for
    /// `name`.
    ///
    /// # Errors
    /// As [`Container::resolve`], plus [`ResolveErrorKind::IncorrectType`]
    /// if the binding's payload is not `P`.
    ///
    /// # Panics
    /// Without `allow_absent`, the same conditions panic.
    pub fn resolve_as<P>(&self, name: &str) -> Result<Arc<P>, ResolveErrorKind>
    where
        P: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve(name)?;
        match downcast::<P>(&instance) {
            Some(handle) => Ok(handle),
            None => {
                let err = ResolveErrorKind::IncorrectType {
                    name: name.to_owned(),
                    expected: type_name::<P>(),
                };
                error!("{err}");
                Err(self.settle(err))
            }
        }
    }

    /// [`Container::resolve_as`] with the name derived from `P`.
    ///
    /// # Errors
    /// See [`Container::resolve_as`].
    pub fn resolve_of<P>(&self) -> Result<Arc<P>, ResolveErrorKind>
    where
        P: ?Sized + Send + Sync + 'static,
    {
        self.resolve_as(BindingName::of::<P>().as_str())
    }

    /// Runs the injection pass on an instance, resolving each of its
    /// injection points through this container (with environment fallback
    /// for value points). Used internally after construction and as a public
    /// utility for externally-constructed objects; lifecycle hooks are not
    /// invoked here.
    ///
    /// Point failures never abort the pass: every point is attempted.
    ///
    /// # Errors
    /// With `allow_absent`, returns [`InjectErrorKind::UnresolvedPoints`]
    /// listing the points left unset.
    ///
    /// # Panics
    /// Without `allow_absent`, panics after the pass if any point was left
    /// unset.
    pub fn inject<P: Injectable + ?Sized>(&self, target: &P) -> Result<(), InjectErrorKind> {
        let target_name = BindingName::of::<P>();
        let span = info_span!("inject", name = target_name.as_str());
        let _guard = span.enter();

        let injector = Injector::new(self, target_name.as_str());
        target.inject(&injector);

        let failures = injector.into_failures();
        if failures.is_empty() {
            debug!("Injected: target={target_name}");
            return Ok(());
        }

        let err = InjectErrorKind::UnresolvedPoints {
            keys: failures.into_iter().map(|failure| failure.key).collect(),
        };
        if self.config.allow_absent {
            Err(err)
        } else {
            panic!("Failed to inject target={target_name}: {err}");
        }
    }

    /// Eagerly resolves every singleton binding registered so far, in
    /// registration order, so misconfiguration surfaces at startup instead
    /// of first use.
    pub fn preload(&self) {
        let names: Vec<String> = {
            let table = self.bindings.read();
            table
                .entries
                .iter()
                .filter(|binding| binding.is_singleton)
                .map(|binding| binding.name.clone())
                .collect()
        };

        for name in names {
            match self.resolve(&name) {
                Ok(_) => info!("Preloaded: name={name}"),
                Err(err) => error!("Failed to preload name={name}: {err}"),
            }
        }
    }
}

impl Container {
    fn binding(&self, name: &str) -> Option<Arc<Binding>> {
        let table = self.bindings.read();
        table.index.get(name).map(|&index| table.entries[index].clone())
    }

    fn add_binding(&self, binding: Binding) {
        let mut table = self.bindings.write();
        match table.index.get(&binding.name).copied() {
            Some(index) => {
                warn!("Overwriting binding: name={}", binding.name);
                table.entries[index] = Arc::new(binding);
            }
            None => {
                let index = table.entries.len();
                table.index.insert(binding.name.clone(), index);
                table.entries.push(Arc::new(binding));
            }
        }
    }

    fn settle(&self, err: ResolveErrorKind) -> ResolveErrorKind {
        if self.config.allow_absent {
            err
        } else {
            panic!("Failed to resolve: {err}");
        }
    }

    fn create_instance(&self, name: &str) -> Result<Instance, ResolveErrorKind> {
        self.factory.create(name).map_err(|err| {
            error!("Failed to instantiate name={name}: {err}");
            ResolveErrorKind::Instantiate(err)
        })
    }

    /// Absent-tolerant resolution; escalation to panics is the caller's
    /// business.
    pub(crate) fn try_resolve(&self, name: &str) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("resolve", name = name);
        let _guard = span.enter();

        let Some(binding) = self.binding(name) else {
            let err = ResolveErrorKind::NoBinding { name: name.to_owned() };
            error!("{err}");
            return Err(err);
        };

        if !binding.is_singleton {
            let instance = self.create_instance(&binding.name)?;
            self.run_wiring(&binding, &instance);
            return Ok(instance);
        }

        let instance = {
            // Holding the cell across construction serializes concurrent
            // first-resolutions; creators have no container access, so this
            // cannot re-enter the binding.
            let mut cell = binding.cell.lock();
            if let Some(instance) = &cell.instance {
                debug!("Resolved from cache: name={}", binding.name);
                return Ok(instance.clone());
            }

            let instance = self.create_instance(&binding.name)?;

            // Cache before injection so recursive resolutions triggered
            // while wiring this instance's fields receive it instead of
            // re-entering construction.
            cell.instance = Some(instance.clone());
            cell.state = BindingState::Constructed;
            instance
        };

        self.run_wiring(&binding, &instance);
        Ok(instance)
    }

    fn run_wiring(&self, binding: &Binding, instance: &Instance) {
        let Some(wire) = binding.wire.as_ref() else { return };

        wire.before_inject(instance);
        // Point failures were already settled per-point by the injector.
        let _ = wire.inject(self, instance);
        if binding.is_singleton {
            binding.set_state(BindingState::Injected);
        }
        wire.after_inject(instance);

        wire.init(instance);
        if binding.is_singleton {
            binding.set_state(BindingState::Initialized);
        }
        info!("Instantiated: name={}", binding.name);
    }
}
