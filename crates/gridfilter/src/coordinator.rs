//! # Filter Set Coordinator
//!
//! [`FilterSet`] owns everything that changes at runtime: the bound inputs, the
//! per-property filters they currently contribute (the *active set*), and the
//! query backend those filters are published to.
//!
//! ## Update Protocol
//!
//! The host calls [`FilterSet::value_changed`] whenever an input's value
//! changes. The coordinator then:
//!
//! 1. reads the input's value and maps it through the policy
//! 2. compares the result with the property's recorded filter
//! 3. on a difference, replaces (or removes) the entry and publishes the AND
//!    of every entry; otherwise does nothing
//!
//! Feeding the same value twice therefore publishes once. All methods take
//! `&mut self`; there is no shared state between bindings and no locking.
//!
//! ## Generic Over QueryBackend
//!
//! `FilterSet<B: QueryBackend, P: FilterPolicy>` is generic over both
//! collaborators:
//! - Production: the host's query adapter with [`DefaultPolicy`]
//! - Testing: [`RecordingBackend`](crate::backend::RecordingBackend), which
//!   keeps the publish history

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::backend::QueryBackend;
use crate::error::{FilterError, Result};
use crate::filter::Filter;
use crate::input::{FilterInput, InputValue};
use crate::policy::{DefaultPolicy, FilterPolicy, InputKind, InputSpec};
use crate::property::{Filterable, PropertySet};

/// Handle to a bound input, returned by [`FilterSet::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(usize);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Binding {
    spec: InputSpec,
    input: Box<dyn FilterInput>,
}

/// The live set of column filters for one record type.
pub struct FilterSet<B: QueryBackend, P: FilterPolicy = DefaultPolicy> {
    schema: PropertySet,
    policy: P,
    backend: B,
    bindings: BTreeMap<BindingId, Binding>,
    next_id: usize,
    active: BTreeMap<String, Filter>,
}

impl<B: QueryBackend> FilterSet<B, DefaultPolicy> {
    /// A filter set with the default policy and configuration.
    pub fn new(schema: PropertySet, backend: B) -> Self {
        Self::with_policy(schema, DefaultPolicy::default(), backend)
    }

    /// A filter set over the properties `T` declares.
    pub fn for_type<T: Filterable>(backend: B) -> Self {
        Self::new(T::properties(), backend)
    }
}

impl<B: QueryBackend, P: FilterPolicy> FilterSet<B, P> {
    pub fn with_policy(schema: PropertySet, policy: P, backend: B) -> Self {
        Self {
            schema,
            policy,
            backend,
            bindings: BTreeMap::new(),
            next_id: 0,
            active: BTreeMap::new(),
        }
    }

    /// Bind an input to a property, using the policy's default input kind.
    ///
    /// The input's current value is applied right away, so a pre-populated
    /// input filters from the start.
    pub fn bind<I>(&mut self, property: &str, input: I) -> Result<BindingId>
    where
        I: FilterInput + 'static,
    {
        let spec = self.policy.create_input(self.schema.property(property)?);
        self.attach(spec, Box::new(input))
    }

    /// Bind an input with an explicitly chosen input kind.
    ///
    /// Fails with [`FilterError::UnsupportedInput`] when the kind does not
    /// suit the property's type.
    pub fn bind_as<I>(&mut self, property: &str, kind: InputKind, input: I) -> Result<BindingId>
    where
        I: FilterInput + 'static,
    {
        let spec = InputSpec::with_kind(self.schema.property(property)?, kind)?;
        self.attach(spec, Box::new(input))
    }

    fn attach(&mut self, spec: InputSpec, input: Box<dyn FilterInput>) -> Result<BindingId> {
        if self.binding_for(spec.field()).is_some() {
            return Err(FilterError::DuplicateBinding(spec.field().to_string()));
        }

        let id = BindingId(self.next_id);
        self.next_id += 1;
        debug!(%id, property = spec.field(), input = spec.kind.name(), "bound filter input");
        self.bindings.insert(id, Binding { spec, input });
        self.value_changed(id)?;
        Ok(id)
    }

    /// Re-evaluate a binding after its input's value changed.
    ///
    /// Returns whether the combined filter was republished.
    pub fn value_changed(&mut self, id: BindingId) -> Result<bool> {
        let binding = self
            .bindings
            .get(&id)
            .ok_or(FilterError::UnknownBinding(id))?;
        let value = binding.input.value();
        let filter = self.policy.value_to_filter(value.as_ref(), &binding.spec);
        let field = binding.spec.field().to_string();

        if self.active.get(&field) == filter.as_ref() {
            trace!(%id, property = %field, "filter unchanged; not republishing");
            return Ok(false);
        }

        match filter {
            Some(filter) => {
                self.active.insert(field, filter);
            }
            None => {
                self.active.remove(&field);
            }
        }
        self.publish();
        Ok(true)
    }

    /// Write a value into a bound input and re-evaluate it.
    pub fn set_value(&mut self, id: BindingId, value: Option<InputValue>) -> Result<bool> {
        self.bindings
            .get_mut(&id)
            .ok_or(FilterError::UnknownBinding(id))?
            .input
            .set_value(value);
        self.value_changed(id)
    }

    /// Drop a binding and its filter, handing the input back.
    pub fn unbind(&mut self, id: BindingId) -> Result<Box<dyn FilterInput>> {
        let binding = self
            .bindings
            .remove(&id)
            .ok_or(FilterError::UnknownBinding(id))?;
        if self.active.remove(binding.spec.field()).is_some() {
            self.publish();
        }
        debug!(%id, property = binding.spec.field(), "unbound filter input");
        Ok(binding.input)
    }

    /// Reset every input to unset and publish the empty filter once.
    pub fn clear(&mut self) {
        for binding in self.bindings.values_mut() {
            binding.input.set_value(None);
        }
        self.active.clear();
        self.publish();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        for binding in self.bindings.values_mut() {
            binding.input.set_enabled(enabled);
        }
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        for binding in self.bindings.values_mut() {
            binding.input.set_read_only(read_only);
        }
    }

    /// The AND of every active filter, or `None` when nothing filters.
    pub fn combined(&self) -> Option<Filter> {
        Filter::and(self.active.values().cloned())
    }

    /// The filter each property currently contributes.
    pub fn active(&self) -> &BTreeMap<String, Filter> {
        &self.active
    }

    pub fn input(&self, id: BindingId) -> Option<&dyn FilterInput> {
        self.bindings.get(&id).map(|b| b.input.as_ref())
    }

    pub fn spec(&self, id: BindingId) -> Option<&InputSpec> {
        self.bindings.get(&id).map(|b| &b.spec)
    }

    /// The binding for a property, if it is bound.
    pub fn binding_for(&self, property: &str) -> Option<BindingId> {
        self.bindings
            .iter()
            .find(|(_, b)| b.spec.field() == property)
            .map(|(id, _)| *id)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn schema(&self) -> &PropertySet {
        &self.schema
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    fn publish(&mut self) {
        let combined = self.combined();
        debug!(
            entries = self.active.len(),
            filter = %combined.as_ref().map(Filter::to_string).unwrap_or_default(),
            "publishing combined filter"
        );
        self.backend.set_filter(combined.as_ref());
    }
}

impl<B: QueryBackend + fmt::Debug, P: FilterPolicy> fmt::Debug for FilterSet<B, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("properties", &self.schema.len())
            .field("bindings", &self.bindings.len())
            .field("active", &self.active)
            .field("backend", &self.backend)
            .finish()
    }
}
