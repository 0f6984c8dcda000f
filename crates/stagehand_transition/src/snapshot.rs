//! Per-cycle geometry snapshots and exit bookkeeping
//!
//! State is kept in a side table keyed by element identity instead of on the
//! elements themselves. Bounds and container snapshots live from pre-update
//! to post-update. The removing/started flags and the container's saved
//! `position` outlive the cycle until the exit animation finishes.

use crate::runtime::StyleValue;
use rustc_hash::FxHashMap;
use stagehand_animation::Rect;
use std::hash::Hash;

/// What the table knows about one child element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSnapshot {
    /// Bounds captured at pre-update
    pub previous_bounds: Option<Rect>,
    /// Logically deleted but still in the document
    pub removing: bool,
    /// An exit animation is in flight
    pub removal_animation_started: bool,
}

impl ElementSnapshot {
    fn is_empty(&self) -> bool {
        self.previous_bounds.is_none() && !self.removing && !self.removal_animation_started
    }
}

/// What the table knows about a container between its two hooks
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerSnapshot<E> {
    /// Direct children just before the mutation, in document order
    pub previous_children: Vec<E>,
    /// Viewport scroll along the configured axis
    pub previous_scroll_offset: f32,
}

/// Exit animations currently running in one container
#[derive(Clone, Debug, PartialEq)]
pub struct ExitGroup {
    /// Container `position` before the first exit of the group
    pub saved_position: Option<StyleValue>,
    pub outstanding: usize,
}

/// Side table of snapshots, keyed by element identity
#[derive(Debug)]
pub struct SnapshotTable<E> {
    elements: FxHashMap<E, ElementSnapshot>,
    containers: FxHashMap<E, ContainerSnapshot<E>>,
    exit_groups: FxHashMap<E, ExitGroup>,
}

impl<E> Default for SnapshotTable<E> {
    fn default() -> Self {
        Self {
            elements: FxHashMap::default(),
            containers: FxHashMap::default(),
            exit_groups: FxHashMap::default(),
        }
    }
}

impl<E: Clone + Eq + Hash> SnapshotTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, element: &E) -> Option<&ElementSnapshot> {
        self.elements.get(element)
    }

    pub fn record_bounds(&mut self, element: &E, bounds: Rect) {
        self.elements.entry(element.clone()).or_default().previous_bounds = Some(bounds);
    }

    pub fn previous_bounds(&self, element: &E) -> Option<Rect> {
        self.elements.get(element).and_then(|s| s.previous_bounds)
    }

    pub fn mark_removing(&mut self, element: &E) {
        self.elements.entry(element.clone()).or_default().removing = true;
    }

    pub fn is_removing(&self, element: &E) -> bool {
        self.elements.get(element).is_some_and(|s| s.removing)
    }

    pub fn removal_started(&self, element: &E) -> bool {
        self.elements
            .get(element)
            .is_some_and(|s| s.removal_animation_started)
    }

    /// Store the container snapshot, returning any unconsumed previous one.
    pub fn begin_cycle(
        &mut self,
        container: &E,
        snapshot: ContainerSnapshot<E>,
    ) -> Option<ContainerSnapshot<E>> {
        self.containers.insert(container.clone(), snapshot)
    }

    pub fn take_cycle(&mut self, container: &E) -> Option<ContainerSnapshot<E>> {
        self.containers.remove(container)
    }

    /// Drop the bounds recorded for `elements`, keeping their flags.
    pub fn clear_bounds<'a>(&mut self, elements: impl IntoIterator<Item = &'a E>)
    where
        E: 'a,
    {
        for element in elements {
            if let Some(snapshot) = self.elements.get_mut(element) {
                snapshot.previous_bounds = None;
                if snapshot.is_empty() {
                    self.elements.remove(element);
                }
            }
        }
    }

    /// Register an exit animation for `element` inside `container`.
    ///
    /// `current_position` is only kept when this is the first outstanding
    /// exit of the container. Returns true in that case.
    pub fn begin_exit(
        &mut self,
        container: &E,
        element: &E,
        current_position: Option<StyleValue>,
    ) -> bool {
        self.elements
            .entry(element.clone())
            .or_default()
            .removal_animation_started = true;

        let mut first = false;
        let group = self
            .exit_groups
            .entry(container.clone())
            .or_insert_with(|| {
                first = true;
                ExitGroup {
                    saved_position: current_position,
                    outstanding: 0,
                }
            });
        group.outstanding += 1;
        first
    }

    /// Record that `element`'s exit finished.
    ///
    /// Returns the group once its last exit finished, so the caller can
    /// restore the saved position.
    pub fn finish_exit(&mut self, container: &E, element: &E) -> Option<ExitGroup> {
        self.forget(element);

        let group = self.exit_groups.get_mut(container)?;
        group.outstanding = group.outstanding.saturating_sub(1);
        if group.outstanding == 0 {
            self.exit_groups.remove(container)
        } else {
            None
        }
    }

    /// Drop everything known about `element`.
    pub fn forget(&mut self, element: &E) {
        self.elements.remove(element);
    }

    pub fn exit_group(&self, container: &E) -> Option<&ExitGroup> {
        self.exit_groups.get(container)
    }

    pub fn outstanding_exits(&self, container: &E) -> usize {
        self.exit_groups.get(container).map_or(0, |g| g.outstanding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Position;

    #[test]
    fn test_clear_bounds_keeps_flags() {
        let mut table = SnapshotTable::new();
        table.record_bounds(&1u32, Rect::new(0.0, 0.0, 10.0, 10.0));
        table.record_bounds(&2u32, Rect::new(0.0, 10.0, 10.0, 10.0));
        table.mark_removing(&2);

        table.clear_bounds(&[1, 2]);

        assert!(table.element(&1).is_none());
        assert_eq!(table.previous_bounds(&2), None);
        assert!(table.is_removing(&2));
    }

    #[test]
    fn test_exit_group_saves_once_and_restores_on_last() {
        let mut table = SnapshotTable::new();
        let container = 0u32;
        let saved = Some(StyleValue::Position(Position::Static));
        let relative = Some(StyleValue::Position(Position::Relative));

        assert!(table.begin_exit(&container, &1, saved));
        assert!(!table.begin_exit(&container, &2, relative));
        assert!(!table.begin_exit(&container, &3, relative));
        assert_eq!(table.outstanding_exits(&container), 3);

        assert_eq!(table.finish_exit(&container, &1), None);
        assert_eq!(table.finish_exit(&container, &2), None);
        let group = table.finish_exit(&container, &3).unwrap();
        assert_eq!(group.saved_position, saved);
        assert!(table.exit_group(&container).is_none());
    }

    #[test]
    fn test_finish_clears_element_flags() {
        let mut table = SnapshotTable::new();
        table.mark_removing(&7u32);
        table.begin_exit(&0, &7, None);
        assert!(table.removal_started(&7));

        table.finish_exit(&0, &7);
        assert!(!table.is_removing(&7));
        assert!(!table.removal_started(&7));
    }

    #[test]
    fn test_finish_without_group_is_harmless() {
        let mut table: SnapshotTable<u32> = SnapshotTable::new();
        assert_eq!(table.finish_exit(&0, &1), None);
    }
}
