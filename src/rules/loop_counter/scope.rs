//! Stack of active `for` loop scopes.
//!
//! Every `for` pushes exactly one scope on entry to its body and pops it on
//! exit, so depth equals the number of `for` loops enclosing the current
//! position. Pops happen in a guard's `Drop`, which keeps the stack balanced
//! on every exit path out of a body visit.

use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use super::counters::CounterSet;
use crate::ast::SourceLocation;

/// Counters of one active loop.
#[derive(Debug, Clone)]
pub struct LoopScope {
    pub counters: CounterSet,
    pub loop_location: SourceLocation,
}

impl LoopScope {
    pub fn new(counters: CounterSet, loop_location: SourceLocation) -> Self {
        Self {
            counters,
            loop_location,
        }
    }
}

/// Innermost scope last. Nesting rarely goes beyond a handful of loops.
#[derive(Debug, Default)]
pub struct LoopScopeStack {
    scopes: SmallVec<[LoopScope; 4]>,
}

impl LoopScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: LoopScope) {
        self.scopes.push(scope);
    }

    pub fn pop(&mut self) -> Option<LoopScope> {
        self.scopes.pop()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Whether `name` is a counter of any active loop.
    pub fn is_counter(&self, name: &str) -> bool {
        self.find_owner(name).is_some()
    }

    /// Innermost active scope declaring `name`.
    pub fn find_owner(&self, name: &str) -> Option<&LoopScope> {
        self.scopes.iter().rev().find(|s| s.counters.contains(name))
    }
}

impl AsMut<LoopScopeStack> for LoopScopeStack {
    fn as_mut(&mut self) -> &mut LoopScopeStack {
        self
    }
}

/// Keeps a scope pushed for its own lifetime.
///
/// Derefs to the owner of the stack so a visitor can keep walking through
/// the guard.
pub struct LoopScopeGuard<'s, T: AsMut<LoopScopeStack>> {
    owner: &'s mut T,
}

impl<'s, T: AsMut<LoopScopeStack>> LoopScopeGuard<'s, T> {
    pub fn enter(owner: &'s mut T, scope: LoopScope) -> Self {
        owner.as_mut().push(scope);
        Self { owner }
    }
}

impl<T: AsMut<LoopScopeStack>> Deref for LoopScopeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.owner
    }
}

impl<T: AsMut<LoopScopeStack>> DerefMut for LoopScopeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.owner
    }
}

impl<T: AsMut<LoopScopeStack>> Drop for LoopScopeGuard<'_, T> {
    fn drop(&mut self) {
        self.owner.as_mut().pop();
    }
}
