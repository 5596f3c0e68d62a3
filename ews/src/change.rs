// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Change tracking for complex properties.
//!
//! Properties do not hold pointers to their owners. Each property is a node in
//! a [`ChangeTracker`] arena, addressed by its [`PropertyId`], and the owner
//! relation is an id stored on the node. A change marks the node dirty and
//! walks the owner chain, so every ancestor observes exactly one notification
//! per real mutation.

use std::fmt;

use crate::error::EwsError;

/// Handle of a property registered in a [`ChangeTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(usize);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    owner: Option<PropertyId>,
    dirty: bool,
    changes: u64,
}

/// Arena of property nodes with their owner links and dirty state.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    nodes: Vec<Node>,
}

impl ChangeTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Registers a new property without an owner.
    pub fn register(&mut self) -> PropertyId {
        self.nodes.push(Node::default());
        PropertyId(self.nodes.len() - 1)
    }

    /// Makes `owner` the owner of `child`, replacing any previous owner.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is unknown or the link would make `child`
    /// its own ancestor.
    pub fn attach(&mut self, child: PropertyId, owner: PropertyId) -> Result<(), EwsError> {
        self.node(owner)?;
        self.node(child)?;

        let mut cursor = Some(owner);
        while let Some(id) = cursor {
            if id == child {
                return Err(EwsError::Validation(format!(
                    "attaching {child} under {owner} would create an ownership cycle"
                )));
            }
            cursor = self.node(id)?.owner;
        }

        self.node_mut(child)?.owner = Some(owner);
        Ok(())
    }

    /// Removes the owner link of `child`.
    pub fn detach(&mut self, child: PropertyId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.owner = None;
        }
    }

    /// Owner of `id`, if any.
    #[must_use]
    pub fn owner(&self, id: PropertyId) -> Option<PropertyId> {
        self.nodes.get(id.0).and_then(|n| n.owner)
    }

    /// Marks `id` and all of its ancestors as changed.
    pub fn changed(&mut self, id: PropertyId) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get_mut(current.0) else {
                tracing::warn!(%current, "change notification for an unknown property");
                return;
            };
            node.dirty = true;
            node.changes += 1;
            cursor = node.owner;
        }
    }

    /// Whether `id` changed since it was registered or last cleared.
    #[must_use]
    pub fn is_dirty(&self, id: PropertyId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.dirty)
    }

    /// Number of change notifications `id` has received.
    #[must_use]
    pub fn change_count(&self, id: PropertyId) -> u64 {
        self.nodes.get(id.0).map_or(0, |n| n.changes)
    }

    /// Resets the dirty flag of `id`, keeping its change count.
    pub fn clear_dirty(&mut self, id: PropertyId) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.dirty = false;
        }
    }

    fn node(&self, id: PropertyId) -> Result<&Node, EwsError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| EwsError::Validation(format!("unknown property {id}")))
    }

    fn node_mut(&mut self, id: PropertyId) -> Result<&mut Node, EwsError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| EwsError::Validation(format!("unknown property {id}")))
    }
}

/// Assigns `value` to `field` and notifies `id` if the value differs.
///
/// Returns whether a change was recorded. Reassigning the current value is a
/// no-op and notifies nobody.
pub fn set_field_value<T: PartialEq>(
    tracker: &mut ChangeTracker,
    id: PropertyId,
    field: &mut T,
    value: T,
) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    tracker.changed(id);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_propagate_to_every_ancestor() {
        let mut tracker = ChangeTracker::new();
        let root = tracker.register();
        let middle = tracker.register();
        let leaf = tracker.register();
        tracker.attach(middle, root).unwrap();
        tracker.attach(leaf, middle).unwrap();

        tracker.changed(leaf);

        for id in [root, middle, leaf] {
            assert!(tracker.is_dirty(id));
            assert_eq!(tracker.change_count(id), 1);
        }
    }

    #[test]
    fn changes_do_not_flow_downwards() {
        let mut tracker = ChangeTracker::new();
        let owner = tracker.register();
        let child = tracker.register();
        tracker.attach(child, owner).unwrap();

        tracker.changed(owner);

        assert!(tracker.is_dirty(owner));
        assert!(!tracker.is_dirty(child));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tracker = ChangeTracker::new();
        let a = tracker.register();
        let b = tracker.register();
        tracker.attach(b, a).unwrap();

        assert!(tracker.attach(a, b).is_err());
        assert!(tracker.attach(a, a).is_err());
        assert_eq!(tracker.owner(a), None);
    }

    #[test]
    fn set_field_value_skips_no_op_assignments() {
        let mut tracker = ChangeTracker::new();
        let id = tracker.register();
        let mut field = 1;

        assert!(!set_field_value(&mut tracker, id, &mut field, 1));
        assert!(!tracker.is_dirty(id));

        assert!(set_field_value(&mut tracker, id, &mut field, 2));
        assert_eq!(field, 2);
        assert_eq!(tracker.change_count(id), 1);

        tracker.clear_dirty(id);
        assert!(!tracker.is_dirty(id));
        assert_eq!(tracker.change_count(id), 1);
    }

    #[test]
    fn detached_children_stop_notifying() {
        let mut tracker = ChangeTracker::new();
        let owner = tracker.register();
        let child = tracker.register();
        tracker.attach(child, owner).unwrap();
        tracker.detach(child);

        tracker.changed(child);

        assert_eq!(tracker.change_count(owner), 0);
    }
}
