use std::collections::VecDeque;
use std::fmt;

use crate::error::{Result, StepwiseError};

/// Recomputes one shadow variable of one entity.
///
/// `update` is called with the entity index whose source variable changed.
/// It may only write the shadow variable named by `shadow_name`.
pub struct ShadowVariableListener<S> {
    shadow_name: &'static str,
    descriptor_index: usize,
    sources: Vec<&'static str>,
    update: fn(&mut S, usize),
    entity_count: Option<fn(&S) -> usize>,
}

impl<S> ShadowVariableListener<S> {
    pub fn new(
        shadow_name: &'static str,
        descriptor_index: usize,
        sources: impl IntoIterator<Item = &'static str>,
        update: fn(&mut S, usize),
    ) -> Self {
        Self {
            shadow_name,
            descriptor_index,
            sources: sources.into_iter().collect(),
            update,
            entity_count: None,
        }
    }

    /// Lets score directors recompute this shadow for every entity when a
    /// new working solution is installed.
    pub fn with_entity_count(mut self, entity_count: fn(&S) -> usize) -> Self {
        self.entity_count = Some(entity_count);
        self
    }

    /// Number of entities carrying this shadow, if known.
    pub fn entity_count(&self, solution: &S) -> Option<usize> {
        self.entity_count.map(|count| count(solution))
    }

    #[inline]
    pub fn shadow_name(&self) -> &'static str {
        self.shadow_name
    }

    #[inline]
    pub fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    /// True if a change of `variable_name` must trigger this listener.
    #[inline]
    pub fn listens_to(&self, variable_name: &str) -> bool {
        self.sources.iter().any(|s| *s == variable_name)
    }

    #[inline]
    pub fn apply(&self, solution: &mut S, entity_index: usize) {
        (self.update)(solution, entity_index)
    }
}

impl<S> Clone for ShadowVariableListener<S> {
    fn clone(&self) -> Self {
        Self {
            shadow_name: self.shadow_name,
            descriptor_index: self.descriptor_index,
            sources: self.sources.clone(),
            update: self.update,
            entity_count: self.entity_count,
        }
    }
}

impl<S> fmt::Debug for ShadowVariableListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowVariableListener")
            .field("shadow_name", &self.shadow_name)
            .field("sources", &self.sources)
            .finish()
    }
}

/// Shadow variable listeners in dependency order.
///
/// A listener whose sources include another listener's shadow variable is
/// always ordered after it.
pub struct ListenerGraph<S> {
    listeners: Vec<ShadowVariableListener<S>>,
}

impl<S> ListenerGraph<S> {
    /// An empty graph.
    pub fn empty() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Orders the listeners topologically.
    ///
    /// Fails with a configuration error if two listeners write the same
    /// shadow variable or the dependencies form a cycle.
    pub fn new(listeners: Vec<ShadowVariableListener<S>>) -> Result<Self> {
        let count = listeners.len();
        for (i, listener) in listeners.iter().enumerate() {
            if listeners[i + 1..]
                .iter()
                .any(|other| other.shadow_name == listener.shadow_name)
            {
                return Err(StepwiseError::Config(format!(
                    "shadow variable '{}' has more than one listener",
                    listener.shadow_name
                )));
            }
        }

        // Kahn's algorithm; ties keep declaration order.
        let mut in_degree = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (from, source) in listeners.iter().enumerate() {
            for (to, target) in listeners.iter().enumerate() {
                if target.listens_to(source.shadow_name) {
                    dependents[from].push(to);
                    in_degree[to] += 1;
                }
            }
        }

        let mut ready: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(count);
        while let Some(next) = ready.pop_front() {
            order.push(next);
            for &dependent in &dependents[next] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        if order.len() != count {
            let cyclic: Vec<&str> = (0..count)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| listeners[i].shadow_name)
                .collect();
            return Err(StepwiseError::Config(format!(
                "shadow variables {:?} depend on each other in a cycle",
                cyclic
            )));
        }

        let mut slots: Vec<Option<ShadowVariableListener<S>>> =
            listeners.into_iter().map(Some).collect();
        let listeners = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        Ok(Self { listeners })
    }

    #[inline]
    pub fn listeners(&self) -> &[ShadowVariableListener<S>] {
        &self.listeners
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<S> Clone for ListenerGraph<S> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<S> Default for ListenerGraph<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S> fmt::Debug for ListenerGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.listeners.iter().map(|l| l.shadow_name))
            .finish()
    }
}
