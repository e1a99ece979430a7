//! Observed, write-through collections.
//!
//! Responsibilities:
//! - Hold the members of one remote relationship (children, attributes, ...)
//!   as loaded at resolution time, in remote sort order.
//! - Make the mutating methods the only entry points for structural edits,
//!   and report every accepted edit synchronously to an observer before the
//!   call returns.
//! - Roll the local edit back when the observer fails, so membership never
//!   diverges silently from the remote relationship.
//!
//! The observer is the per-relationship synchronization hook: `Added` maps
//! to a remote create, `Removed` to a remote delete, and the remaining kinds
//! (`Replaced`, `Reset`, `Moved`) have no remote counterpart, so the hooks
//! reject them with [`AfError::Unsupported`]. Mutations are serialized per
//! collection instance; the internal lock is held across the observer call,
//! so observers must not call back into the same collection.

use std::sync::Mutex;

use tracing::debug;

use crate::error::{AfError, AfResult};

/// One structural change, reported to the observer after it has been applied
/// locally. The five kinds are modeled exhaustively so every observer has an
/// explicit branch for the unsupported ones.
#[derive(Debug)]
pub enum CollectionChange<'a, T> {
    Added(&'a T),
    Removed(&'a T),
    Replaced,
    Reset,
    Moved,
}

type Observer<T> = Box<dyn Fn(CollectionChange<'_, T>) -> AfResult<()> + Send + Sync>;

/// An ordered, observed collection of relationship members.
///
/// Created by a lazy-field resolver with its observer attached; lives as
/// long as the owning field's cached value. Initial order reflects the
/// remote sort order.
pub struct TrackedCollection<T> {
    items: Mutex<Vec<T>>,
    observer: Observer<T>,
}

impl<T: Clone + PartialEq> TrackedCollection<T> {
    /// Wraps the initially loaded members. Loading itself is not an edit, so
    /// no change is reported.
    pub fn new<F>(items: Vec<T>, observer: F) -> Self
    where
        F: Fn(CollectionChange<'_, T>) -> AfResult<()> + Send + Sync + 'static,
    {
        TrackedCollection {
            items: Mutex::new(items),
            observer: Box::new(observer),
        }
    }

    /// Appends `item` and reports `Added`. If the observer fails (the remote
    /// create was rejected or unreachable), the item is taken back out and
    /// the error is returned.
    pub fn add(&self, item: T) -> AfResult<()> {
        let mut items = self.items.lock().unwrap();
        items.push(item);
        let added = &items[items.len() - 1];
        if let Err(err) = (self.observer)(CollectionChange::Added(added)) {
            debug!("add rolled back: {}", err);
            items.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Removes the first member equal to `item` and reports `Removed`.
    /// Returns `false` when no member matched. If the observer fails (the
    /// remote delete was rejected or unreachable), the member is reinserted
    /// at its old position and the error is returned.
    pub fn remove(&self, item: &T) -> AfResult<bool> {
        let mut items = self.items.lock().unwrap();
        let index = match items.iter().position(|candidate| candidate == item) {
            Some(index) => index,
            None => return Ok(false),
        };
        let removed = items.remove(index);
        if let Err(err) = (self.observer)(CollectionChange::Removed(&removed)) {
            debug!("remove rolled back: {}", err);
            items.insert(index, removed);
            return Err(err);
        }
        Ok(true)
    }

    /// Replaces the member at `index` and reports `Replaced`. The remote
    /// hierarchy has no in-place replacement, so every relationship observer
    /// rejects this and the old member is restored.
    pub fn replace(&self, index: usize, item: T) -> AfResult<()> {
        let mut items = self.items.lock().unwrap();
        if index >= items.len() {
            return Err(AfError::Rejected {
                operation: "replace",
                target: format!("index {} out of bounds", index),
            });
        }
        let old = std::mem::replace(&mut items[index], item);
        if let Err(err) = (self.observer)(CollectionChange::Replaced) {
            items[index] = old;
            return Err(err);
        }
        Ok(())
    }

    /// Clears all members and reports `Reset`. No relationship supports a
    /// bulk clear; the members are restored on rejection.
    pub fn clear(&self) -> AfResult<()> {
        let mut items = self.items.lock().unwrap();
        let drained = std::mem::take(&mut *items);
        if let Err(err) = (self.observer)(CollectionChange::Reset) {
            *items = drained;
            return Err(err);
        }
        Ok(())
    }

    /// Moves the member at `from` to `to` and reports `Moved`. Relationship
    /// order is remote-determined, so every observer rejects this and the
    /// original order is restored.
    pub fn move_item(&self, from: usize, to: usize) -> AfResult<()> {
        let mut items = self.items.lock().unwrap();
        if from >= items.len() || to >= items.len() {
            return Err(AfError::Rejected {
                operation: "move",
                target: format!("index {}->{} out of bounds", from, to),
            });
        }
        let moved = items.remove(from);
        items.insert(to, moved);
        if let Err(err) = (self.observer)(CollectionChange::Moved) {
            let moved = items.remove(to);
            items.insert(from, moved);
            return Err(err);
        }
        Ok(())
    }

    /// Snapshot of the current members, in order.
    pub fn items(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.items.lock().unwrap().get(index).cloned()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.lock().unwrap().iter().any(|c| c == item)
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}

impl<T> std::fmt::Debug for TrackedCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedCollection")
            .field("len", &self.items.lock().unwrap().len())
            .finish()
    }
}
