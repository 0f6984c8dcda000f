//! Children transition controller
//!
//! The host calls [`TransitionChildren::pre_update`] right before it mutates
//! a container's children and [`TransitionChildren::post_update`] right
//! after. In between the controller remembers where every child was; after
//! the mutation it animates:
//!
//! - **stable** children from their old to their new box (FLIP),
//! - **entering** children in with the configured fade/slide/scale family,
//! - **exiting** children out, keeping them in the document, pinned over
//!   their old box, until the animation finishes and they are detached.
//!
//! # Example
//!
//! ```ignore
//! use stagehand_transition::{TransitionChildren, TransitionProps, Direction};
//!
//! let mut transition = TransitionChildren::from_props(TransitionProps {
//!     direction: Some(Direction::Forwards),
//!     ..Default::default()
//! })?;
//!
//! transition.pre_update(&mut dom, &list);
//! transition.mark_removing(&old_page);
//! dom.append_child(&list, &new_page)?;
//! transition.post_update(&mut dom, &list);
//! ```

use crate::config::{TransitionConfig, TransitionKind, TransitionProps};
use crate::error::ConfigError;
use crate::partition::Partition;
use crate::runtime::{DomRuntime, FinishCallback, Position, StyleProperty, StyleValue};
use crate::snapshot::{ContainerSnapshot, SnapshotTable};
use stagehand_animation::{
    bounds_change_keyframes, fade_keyframes, scale_keyframes, slide_keyframes, total_size,
    BoundsChange, ChangeRange, KeyframeSequence, Point,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

type SharedTable<E> = Rc<RefCell<SnapshotTable<E>>>;

/// Inline styles an exit pins on the element; cleared again once it is detached
const PINNED_STYLES: [StyleProperty; 6] = [
    StyleProperty::Position,
    StyleProperty::Left,
    StyleProperty::Top,
    StyleProperty::Width,
    StyleProperty::Height,
    StyleProperty::Opacity,
];

/// What one post-update did
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionReport {
    /// Stable children given a bounds-change animation
    pub moved: usize,
    /// Entering children animated in
    pub entered: usize,
    /// Exit animations started this cycle
    pub exited: usize,
    /// Exiting children whose animation was already running
    pub already_exiting: usize,
    /// Slide compensation used for entering/exiting translations
    pub scroll_by: f32,
}

/// FLIP transitions for the children of one or more containers
pub struct TransitionChildren<R: DomRuntime> {
    config: TransitionConfig,
    table: SharedTable<R::Element>,
}

impl<R: DomRuntime> TransitionChildren<R> {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            table: Rc::new(RefCell::new(SnapshotTable::new())),
        }
    }

    /// Resolve host props and build a controller
    pub fn from_props(props: TransitionProps) -> Result<Self, ConfigError> {
        TransitionConfig::try_from(props).map(Self::new)
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Mark `element` as logically deleted. It stays in the document until
    /// its exit animation finishes.
    pub fn mark_removing(&self, element: &R::Element) {
        self.table.borrow_mut().mark_removing(element);
    }

    pub fn is_removing(&self, element: &R::Element) -> bool {
        self.table.borrow().is_removing(element)
    }

    /// True while an exit animation for `element` is running
    pub fn is_exiting(&self, element: &R::Element) -> bool {
        self.table.borrow().removal_started(element)
    }

    pub fn outstanding_exits(&self, container: &R::Element) -> usize {
        self.table.borrow().outstanding_exits(container)
    }

    /// Snapshot the container's children before the host mutates them.
    pub fn pre_update(&mut self, dom: &mut R, container: &R::Element) {
        dom.flush_styles();

        let previous_children = dom.children(container);
        let bounds: Vec<_> = previous_children
            .iter()
            .map(|child| dom.bounding_rect(child))
            .collect();
        let previous_scroll_offset = dom.scroll_offset(self.config.orientation);

        let mut table = self.table.borrow_mut();
        for (child, rect) in previous_children.iter().zip(bounds) {
            match rect {
                Some(rect) => table.record_bounds(child, rect),
                None => trace!(?child, "child not rendered, no bounds recorded"),
            }
        }

        trace!(
            ?container,
            children = previous_children.len(),
            scroll = previous_scroll_offset,
            "pre-update snapshot"
        );

        if let Some(stale) = table.take_cycle(container) {
            debug!(?container, "pre-update without post-update, replacing snapshot");
            let dropped: Vec<_> = stale
                .previous_children
                .into_iter()
                .filter(|c| !previous_children.contains(c))
                .collect();
            table.clear_bounds(&dropped);
        }

        table.begin_cycle(
            container,
            ContainerSnapshot {
                previous_children,
                previous_scroll_offset,
            },
        );
    }

    /// Diff the children against the pre-update snapshot and animate.
    pub fn post_update(&mut self, dom: &mut R, container: &R::Element) -> TransitionReport {
        dom.flush_styles();

        let Some(snapshot) = self.table.borrow_mut().take_cycle(container) else {
            warn!(?container, "post-update without matching pre-update");
            return TransitionReport::default();
        };

        let report = self.animate_changes(dom, container, &snapshot);
        self.table
            .borrow_mut()
            .clear_bounds(&snapshot.previous_children);
        report
    }

    fn animate_changes(
        &self,
        dom: &mut R,
        container: &R::Element,
        snapshot: &ContainerSnapshot<R::Element>,
    ) -> TransitionReport {
        let current = dom.children(container);
        let table = self.table.borrow();
        let partition = Partition::classify(&snapshot.previous_children, &current, |e| {
            table.is_removing(e)
        });
        let exiting_bounds: Vec<_> = partition
            .exiting
            .iter()
            .filter_map(|e| table.previous_bounds(e))
            .collect();
        drop(table);

        debug!(
            ?container,
            stable = partition.stable.len(),
            entering = partition.entering.len(),
            exiting = partition.exiting.len(),
            "post-update partition"
        );

        let mut report = TransitionReport::default();
        for element in &partition.stable {
            if self.animate_bounds_change(dom, element) {
                report.moved += 1;
            }
        }

        if partition.is_settled() {
            return report;
        }

        let orientation = self.config.orientation;
        let out_size = total_size(&exiting_bounds, orientation);
        let entering_bounds: Vec<_> = partition
            .entering
            .iter()
            .filter_map(|e| dom.bounding_rect(e))
            .collect();
        let in_size = total_size(&entering_bounds, orientation);
        report.scroll_by = self.config.scroll_compensation(
            snapshot.previous_scroll_offset,
            out_size,
            in_size,
        );
        debug!(out_size, in_size, scroll_by = report.scroll_by, "scroll compensation");

        for element in &partition.entering {
            let keyframes = self.enter_keyframes(report.scroll_by);
            match dom.animate(element, keyframes, self.config.timing(), None) {
                Ok(()) => report.entered += 1,
                Err(err) => warn!(?element, %err, "enter animation failed"),
            }
        }

        for element in &partition.exiting {
            match self.start_exit(dom, container, element, report.scroll_by) {
                ExitStart::Started => report.exited += 1,
                ExitStart::AlreadyRunning => report.already_exiting += 1,
                ExitStart::Abandoned => {}
            }
        }

        if self.config.scroll_to_start {
            dom.scroll_to_origin();
        }

        report
    }

    /// Invert-then-play for a child that stayed. Returns true if animated.
    fn animate_bounds_change(&self, dom: &mut R, element: &R::Element) -> bool {
        let Some(before) = self.table.borrow().previous_bounds(element) else {
            trace!(?element, "no previous bounds, skipping");
            return false;
        };
        let Some(after) = dom.bounding_rect(element) else {
            trace!(?element, "not rendered after update, skipping");
            return false;
        };

        let change = BoundsChange::between(&before, &after, self.config.is_size_animated);
        if !change.exceeds(self.config.animation_threshold) {
            return false;
        }

        trace!(?element, dx = change.distance.x, dy = change.distance.y, "bounds changed");
        match dom.animate(
            element,
            bounds_change_keyframes(&change),
            self.config.timing(),
            None,
        ) {
            Ok(()) => true,
            Err(err) => {
                warn!(?element, %err, "bounds-change animation failed");
                false
            }
        }
    }

    fn enter_keyframes(&self, scroll_by: f32) -> KeyframeSequence {
        let orientation = self.config.orientation;
        match self.config.kind {
            TransitionKind::Fade => fade_keyframes(ChangeRange::APPEAR),
            TransitionKind::Slide => slide_keyframes(
                orientation,
                ChangeRange::new(-scroll_by, 0.0),
                ChangeRange::APPEAR,
            ),
            TransitionKind::Scale => scale_keyframes(
                orientation,
                self.config.transform_origin(),
                ChangeRange::APPEAR,
                ChangeRange::APPEAR,
            ),
        }
    }

    fn exit_keyframes(&self, scroll_by: f32) -> KeyframeSequence {
        let orientation = self.config.orientation;
        match self.config.kind {
            TransitionKind::Fade => fade_keyframes(ChangeRange::DISAPPEAR),
            TransitionKind::Slide => slide_keyframes(
                orientation,
                ChangeRange::new(0.0, scroll_by),
                ChangeRange::DISAPPEAR,
            ),
            TransitionKind::Scale => scale_keyframes(
                orientation,
                self.config.transform_origin(),
                ChangeRange::DISAPPEAR,
                ChangeRange::DISAPPEAR,
            ),
        }
    }

    /// Take an exiting child out of flow, pin it over its old box and play
    /// the exit animation. Detached when the animation finishes.
    fn start_exit(
        &self,
        dom: &mut R,
        container: &R::Element,
        element: &R::Element,
        scroll_by: f32,
    ) -> ExitStart {
        let previous = {
            let table = self.table.borrow();
            if table.removal_started(element) {
                trace!(?element, "exit already running");
                return ExitStart::AlreadyRunning;
            }
            table.previous_bounds(element)
        };
        let Some(previous) = previous else {
            debug!(?element, "exiting child was not rendered, detaching");
            detach(dom, element);
            self.table.borrow_mut().forget(element);
            return ExitStart::Abandoned;
        };

        let current_position = dom.style(container, StyleProperty::Position);
        if self
            .table
            .borrow_mut()
            .begin_exit(container, element, current_position)
        {
            trace!(?container, saved = ?current_position, "saved container position");
        }
        dom.set_style(
            container,
            StyleProperty::Position,
            Some(StyleValue::Position(Position::Relative)),
        );

        let position = if self.config.pins_exits_to_viewport() {
            Position::Fixed
        } else {
            Position::Absolute
        };
        dom.set_style(element, StyleProperty::Position, Some(StyleValue::Position(position)));
        dom.set_style(element, StyleProperty::Left, Some(StyleValue::Px(0.0)));
        dom.set_style(element, StyleProperty::Top, Some(StyleValue::Px(0.0)));
        dom.set_style(element, StyleProperty::Width, Some(StyleValue::Px(previous.width)));
        dom.set_style(element, StyleProperty::Height, Some(StyleValue::Px(previous.height)));
        dom.set_style(element, StyleProperty::Opacity, Some(StyleValue::Number(0.0)));

        if let Err(err) = dom.append_child(container, element) {
            warn!(?element, %err, "could not move exiting child");
            complete_exit::<R>(&self.table, dom, container, element);
            return ExitStart::Abandoned;
        }

        // Offsets go through left/top; a transform here stutters on some engines.
        let offset = dom
            .bounding_rect(element)
            .map(|now| Point::between(previous.origin(), now.origin()))
            .unwrap_or(Point::ZERO);
        dom.set_style(element, StyleProperty::Left, Some(StyleValue::Px(-offset.x)));
        dom.set_style(element, StyleProperty::Top, Some(StyleValue::Px(-offset.y)));

        let on_finish =
            exit_continuation::<R>(self.table.clone(), container.clone(), element.clone());
        match dom.animate(
            element,
            self.exit_keyframes(scroll_by),
            self.config.timing(),
            Some(on_finish),
        ) {
            Ok(()) => ExitStart::Started,
            Err(err) => {
                warn!(?element, %err, "exit animation failed, detaching now");
                complete_exit::<R>(&self.table, dom, container, element);
                ExitStart::Abandoned
            }
        }
    }
}

enum ExitStart {
    Started,
    AlreadyRunning,
    Abandoned,
}

fn exit_continuation<R: DomRuntime>(
    table: SharedTable<R::Element>,
    container: R::Element,
    element: R::Element,
) -> FinishCallback<R> {
    Box::new(move |dom: &mut R| complete_exit::<R>(&table, dom, &container, &element))
}

/// Detach a finished exit and restore the container once the last one is done.
fn complete_exit<R: DomRuntime>(
    table: &RefCell<SnapshotTable<R::Element>>,
    dom: &mut R,
    container: &R::Element,
    element: &R::Element,
) {
    detach(dom, element);
    for property in PINNED_STYLES {
        dom.set_style(element, property, None);
    }

    let finished = table.borrow_mut().finish_exit(container, element);
    if let Some(group) = finished {
        debug!(?container, restored = ?group.saved_position, "last exit finished");
        dom.set_style(container, StyleProperty::Position, group.saved_position);
    }
}

/// Remove `element` from whatever parent it still has.
fn detach<R: DomRuntime>(dom: &mut R, element: &R::Element) {
    let Some(parent) = dom.parent(element) else {
        return;
    };
    if let Err(err) = dom.remove_child(&parent, element) {
        warn!(?element, %err, "could not detach element");
    }
}
