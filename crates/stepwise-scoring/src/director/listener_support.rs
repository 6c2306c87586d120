//! Supplies and shadow variable listeners attached to a score director.

use std::collections::BTreeSet;
use std::fmt;

use stepwise_core::domain::{
    ChainSupply, ChainedVariableDescriptor, ListenerGraph, PlanningSolution,
    ShadowVariableListener,
};
use stepwise_core::error::Result;

/// Receives the before/after notifications of shadow variable writes.
///
/// Incremental score calculators observe shadow changes exactly like
/// genuine ones.
pub trait ShadowObserver<S> {
    fn before_shadow_changed(
        &mut self,
        solution: &S,
        descriptor_index: usize,
        entity_index: usize,
        shadow_name: &'static str,
    );

    fn after_shadow_changed(
        &mut self,
        solution: &S,
        descriptor_index: usize,
        entity_index: usize,
        shadow_name: &'static str,
    );
}

impl<S> ShadowObserver<S> for () {
    fn before_shadow_changed(&mut self, _: &S, _: usize, _: usize, _: &'static str) {}
    fn after_shadow_changed(&mut self, _: &S, _: usize, _: usize, _: &'static str) {}
}

/// Bookkeeping shared by all score directors.
///
/// - asserts that every "after" notification closes an open "before"
/// - keeps the chain supplies of chained variables up to date
/// - queues and runs shadow variable listeners in dependency order
pub struct VariableListenerSupport<S> {
    chain_descriptors: Vec<ChainedVariableDescriptor<S>>,
    chains: Vec<ChainSupply<S>>,
    graph: ListenerGraph<S>,
    pending: Vec<BTreeSet<usize>>,
    open: Vec<(usize, usize, &'static str)>,
}

impl<S: PlanningSolution> VariableListenerSupport<S> {
    /// Support without chained variables or shadow listeners.
    pub fn empty() -> Self {
        Self {
            chain_descriptors: Vec::new(),
            chains: Vec::new(),
            graph: ListenerGraph::empty(),
            pending: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Registers chained variables and shadow listeners.
    ///
    /// Fails if the listeners form a dependency cycle. Supplies are built
    /// by [`reset`](Self::reset).
    pub fn new(
        chain_descriptors: Vec<ChainedVariableDescriptor<S>>,
        shadow_listeners: Vec<ShadowVariableListener<S>>,
    ) -> Result<Self> {
        let graph = ListenerGraph::new(shadow_listeners)?;
        let pending = vec![BTreeSet::new(); graph.len()];
        Ok(Self {
            chain_descriptors,
            chains: Vec::new(),
            graph,
            pending,
            open: Vec::new(),
        })
    }

    /// Rebuilds every supply from `solution` and recomputes all shadows.
    pub fn reset(&mut self, solution: &mut S) -> Result<()> {
        self.chains = self
            .chain_descriptors
            .iter()
            .map(|descriptor| ChainSupply::build(*descriptor, solution))
            .collect::<Result<_>>()?;
        self.open.clear();
        for pending in &mut self.pending {
            pending.clear();
        }
        for listener in self.graph.listeners() {
            let count = listener.entity_count(solution).or_else(|| {
                self.chain_descriptors
                    .iter()
                    .find(|d| d.descriptor_index() == listener.descriptor_index())
                    .map(|d| d.entity_count(solution))
            });
            for entity in 0..count.unwrap_or(0) {
                listener.apply(solution, entity);
            }
        }
        Ok(())
    }

    pub fn before_variable_changed(
        &mut self,
        solution: &S,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    ) {
        self.open.push((descriptor_index, entity_index, variable_name));
        for chain in &mut self.chains {
            if chain.descriptor().descriptor_index() == descriptor_index
                && chain.variable_name() == variable_name
            {
                chain.retract(solution, entity_index);
            }
        }
    }

    pub fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &'static str,
    ) {
        let key = (descriptor_index, entity_index, variable_name);
        match self.open.iter().rposition(|open| *open == key) {
            Some(position) => {
                self.open.remove(position);
            }
            None => panic!(
                "after_variable_changed(descriptor {}, entity {}, '{}') without a matching before_variable_changed",
                descriptor_index, entity_index, variable_name
            ),
        }
        for chain in &mut self.chains {
            if chain.descriptor().descriptor_index() == descriptor_index
                && chain.variable_name() == variable_name
            {
                chain.mark_dirty(entity_index);
            }
        }
        for (index, listener) in self.graph.listeners().iter().enumerate() {
            if listener.descriptor_index() == descriptor_index && listener.listens_to(variable_name)
            {
                self.pending[index].insert(entity_index);
            }
        }
    }

    /// True if any change is waiting for [`trigger`](Self::trigger).
    pub fn has_pending_changes(&self) -> bool {
        self.chains.iter().any(ChainSupply::is_dirty) || self.pending.iter().any(|p| !p.is_empty())
    }

    /// Refreshes the chain supplies and runs queued shadow listeners.
    pub fn trigger<O: ShadowObserver<S>>(&mut self, solution: &mut S, observer: &mut O) {
        for chain in &mut self.chains {
            chain.refresh(solution);
        }
        let listeners = self.graph.listeners();
        for index in 0..listeners.len() {
            let entities = std::mem::take(&mut self.pending[index]);
            if entities.is_empty() {
                continue;
            }
            let listener = &listeners[index];
            let shadow = listener.shadow_name();
            let descriptor_index = listener.descriptor_index();
            for &entity in &entities {
                observer.before_shadow_changed(solution, descriptor_index, entity, shadow);
                listener.apply(solution, entity);
                observer.after_shadow_changed(solution, descriptor_index, entity, shadow);
            }
            // Dependents always sort after their sources.
            for (later, dependent) in listeners.iter().enumerate().skip(index + 1) {
                if dependent.descriptor_index() == descriptor_index && dependent.listens_to(shadow)
                {
                    self.pending[later].extend(entities.iter().copied());
                }
            }
        }
    }

    pub fn chain_supply(&self, variable_name: &str) -> Option<&ChainSupply<S>> {
        self.chains
            .iter()
            .find(|chain| chain.variable_name() == variable_name)
    }

    /// Number of before notifications still waiting for their after.
    pub fn open_change_count(&self) -> usize {
        self.open.len()
    }
}

impl<S> Clone for VariableListenerSupport<S> {
    fn clone(&self) -> Self {
        Self {
            chain_descriptors: self.chain_descriptors.clone(),
            chains: self.chains.clone(),
            graph: self.graph.clone(),
            pending: self.pending.clone(),
            open: self.open.clone(),
        }
    }
}

impl<S> fmt::Debug for VariableListenerSupport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableListenerSupport")
            .field("chains", &self.chains)
            .field("shadow_listeners", &self.graph)
            .field("open_changes", &self.open.len())
            .finish()
    }
}
