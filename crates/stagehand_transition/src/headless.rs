//! In-memory document for tests and non-browser hosts
//!
//! Layout is explicit: every node carries the rectangle the host assigns it.
//! The one piece of layout it does compute is out-of-flow placement, so a box
//! with `position: absolute` and pixel `left`/`top` lands relative to its
//! parent (or the viewport for `fixed`), and pixel `width`/`height` override
//! its size.
//!
//! Animations run on an [`AnimationScheduler`] advanced with
//! [`HeadlessDom::advance`]. Completion continuations fire from there, never
//! from inside [`DomRuntime::animate`].

use crate::error::{Result, RuntimeError};
use crate::runtime::{DomRuntime, FinishCallback, Position, StyleProperty, StyleValue};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use stagehand_animation::{
    AnimationScheduler, KeyframePlayback, KeyframeProperties, KeyframeSequence, Orientation,
    PlaybackId, Point, Rect, Timing,
};

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Default)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    root: bool,
    styles: FxHashMap<StyleProperty, StyleValue>,
}

impl Node {
    fn px(&self, property: StyleProperty) -> Option<f32> {
        self.styles.get(&property).and_then(StyleValue::as_px)
    }
}

/// One call to [`DomRuntime::animate`], as recorded by the headless runtime
#[derive(Clone, Debug, PartialEq)]
pub struct PlayedAnimation {
    pub element: NodeId,
    pub keyframes: KeyframeSequence,
    pub timing: Timing,
    pub has_finish_callback: bool,
}

struct RunningAnimation {
    element: NodeId,
    on_finish: Option<FinishCallback<HeadlessDom>>,
}

/// A headless [`DomRuntime`]
pub struct HeadlessDom {
    nodes: SlotMap<NodeId, Node>,
    scroll: Point,
    scheduler: AnimationScheduler,
    running: SecondaryMap<PlaybackId, RunningAnimation>,
    played: Vec<PlayedAnimation>,
    style_flushes: usize,
    animations_enabled: bool,
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDom {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            scroll: Point::ZERO,
            scheduler: AnimationScheduler::new(),
            running: SecondaryMap::new(),
            played: Vec::new(),
            style_flushes: 0,
            animations_enabled: true,
        }
    }

    /// Create a rendered top-level node
    pub fn create_root(&mut self, rect: Rect) -> NodeId {
        self.nodes.insert(Node {
            rect,
            root: true,
            ..Default::default()
        })
    }

    /// Create a detached node; it renders once appended somewhere
    pub fn create_element(&mut self, rect: Rect) -> NodeId {
        self.nodes.insert(Node {
            rect,
            ..Default::default()
        })
    }

    /// Insert `child` into `parent` before position `index`
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(RuntimeError::Detached(format!("{parent:?} or {child:?}")));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(RuntimeError::Hierarchy(format!(
                "{child:?} contains {parent:?}"
            )));
        }
        self.unlink(child);
        let siblings = &mut self.nodes[parent].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    /// Assign the in-flow rectangle of a node
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.rect = rect;
        }
    }

    /// Whether `node` is part of the rendered tree
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            match self.nodes.get(current) {
                None => return false,
                Some(n) if n.root => return true,
                Some(n) => match n.parent {
                    Some(parent) => current = parent,
                    None => return false,
                },
            }
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    /// Make [`DomRuntime::animate`] fail, as a runtime without animation
    /// support would
    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.animations_enabled = enabled;
    }

    /// Number of style flushes requested so far
    pub fn style_flushes(&self) -> usize {
        self.style_flushes
    }

    /// Every animation started, oldest first
    pub fn played(&self) -> &[PlayedAnimation] {
        &self.played
    }

    pub fn played_on(&self, element: NodeId) -> Vec<&PlayedAnimation> {
        self.played.iter().filter(|p| p.element == element).collect()
    }

    pub fn clear_played(&mut self) {
        self.played.clear();
    }

    pub fn running_animations(&self) -> usize {
        self.running.len()
    }

    /// Current animated properties of the most recently started animation
    /// running on `element`
    pub fn animated_properties(&self, element: NodeId) -> Option<KeyframeProperties> {
        self.running
            .iter()
            .filter(|(_, running)| running.element == element)
            .filter_map(|(id, _)| self.scheduler.get(id))
            .last()
            .map(KeyframePlayback::current_properties)
    }

    /// Advance every running animation by `dt_ms` and run the continuations
    /// of those that finished. Returns how many finished.
    pub fn advance(&mut self, dt_ms: f32) -> usize {
        let finished = self.scheduler.tick(dt_ms);
        let mut count = 0;
        for id in finished {
            let Some(running) = self.running.remove(id) else {
                continue;
            };
            count += 1;
            if let Some(on_finish) = running.on_finish {
                on_finish(self);
            }
        }
        count
    }

    /// Run every animation to completion
    pub fn finish_all(&mut self) -> usize {
        let mut count = 0;
        while self.scheduler.has_active_animations() {
            count += self.advance(f32::MAX);
        }
        count
    }

    fn unlink(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes.get(child).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != child);
            }
        }
        if let Some(n) = self.nodes.get_mut(child) {
            n.parent = None;
        }
    }

    fn layout_rect(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        let mut rect = node.rect;

        let position = node
            .styles
            .get(&StyleProperty::Position)
            .and_then(StyleValue::as_position);
        if let Some(position) = position.filter(Position::is_out_of_flow) {
            let base = match position {
                Position::Fixed => Point::ZERO,
                _ => node
                    .parent
                    .and_then(|p| self.layout_rect(p))
                    .map(|r| r.origin())
                    .unwrap_or(Point::ZERO),
            };
            let left = node.px(StyleProperty::Left).unwrap_or(rect.left - base.x);
            let top = node.px(StyleProperty::Top).unwrap_or(rect.top - base.y);
            rect = rect.with_origin(Point::new(base.x + left, base.y + top));
        }

        if let Some(width) = node.px(StyleProperty::Width) {
            rect.width = width;
        }
        if let Some(height) = node.px(StyleProperty::Height) {
            rect.height = height;
        }
        Some(rect)
    }
}

impl DomRuntime for HeadlessDom {
    type Element = NodeId;

    fn flush_styles(&mut self) {
        self.style_flushes += 1;
    }

    fn children(&self, parent: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(*parent)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.nodes.get(*element).and_then(|n| n.parent)
    }

    fn bounding_rect(&self, element: &NodeId) -> Option<Rect> {
        if !self.is_attached(*element) {
            return None;
        }
        self.layout_rect(*element)
    }

    fn scroll_offset(&self, orientation: Orientation) -> f32 {
        orientation.along(self.scroll)
    }

    fn scroll_to_origin(&mut self) {
        self.scroll = Point::ZERO;
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.insert_child(*parent, usize::MAX, *child)
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        if self.parent(child) != Some(*parent) {
            return Err(RuntimeError::Detached(format!(
                "{child:?} is not a child of {parent:?}"
            )));
        }
        self.unlink(*child);
        Ok(())
    }

    fn style(&self, element: &NodeId, property: StyleProperty) -> Option<StyleValue> {
        self.nodes.get(*element)?.styles.get(&property).copied()
    }

    fn set_style(&mut self, element: &NodeId, property: StyleProperty, value: Option<StyleValue>) {
        let Some(node) = self.nodes.get_mut(*element) else {
            return;
        };
        match value {
            Some(value) => {
                node.styles.insert(property, value);
            }
            None => {
                node.styles.remove(&property);
            }
        }
    }

    fn animate(
        &mut self,
        element: &NodeId,
        keyframes: KeyframeSequence,
        timing: Timing,
        on_finish: Option<FinishCallback<Self>>,
    ) -> Result<()> {
        if !self.is_attached(*element) {
            return Err(RuntimeError::Detached(format!("{element:?}")));
        }
        if !self.animations_enabled {
            return Err(RuntimeError::AnimationRejected(
                "animations are disabled".to_string(),
            ));
        }

        self.played.push(PlayedAnimation {
            element: *element,
            keyframes: keyframes.clone(),
            timing,
            has_finish_callback: on_finish.is_some(),
        });
        let id = self.scheduler.add(KeyframePlayback::new(keyframes, timing));
        self.running.insert(
            id,
            RunningAnimation {
                element: *element,
                on_finish,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_animation::{fade_keyframes, ChangeRange, Easing};

    fn timing() -> Timing {
        Timing::new(100.0, Easing::Linear)
    }

    #[test]
    fn test_detached_nodes_have_no_bounds() {
        let mut dom = HeadlessDom::new();
        let root = dom.create_root(Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = dom.create_element(Rect::new(0.0, 10.0, 100.0, 20.0));
        assert_eq!(dom.bounding_rect(&child), None);

        dom.append_child(&root, &child).unwrap();
        assert_eq!(dom.bounding_rect(&child), Some(Rect::new(0.0, 10.0, 100.0, 20.0)));

        dom.remove_child(&root, &child).unwrap();
        assert_eq!(dom.bounding_rect(&child), None);
        assert!(dom.remove_child(&root, &child).is_err());
    }

    #[test]
    fn test_absolute_children_follow_left_top() {
        let mut dom = HeadlessDom::new();
        let root = dom.create_root(Rect::new(10.0, 50.0, 100.0, 100.0));
        let child = dom.create_element(Rect::new(10.0, 90.0, 100.0, 20.0));
        dom.append_child(&root, &child).unwrap();

        let absolute = Some(StyleValue::Position(Position::Absolute));
        dom.set_style(&child, StyleProperty::Position, absolute);
        dom.set_style(&child, StyleProperty::Left, Some(StyleValue::Px(0.0)));
        dom.set_style(&child, StyleProperty::Top, Some(StyleValue::Px(5.0)));
        dom.set_style(&child, StyleProperty::Width, Some(StyleValue::Px(40.0)));

        assert_eq!(dom.bounding_rect(&child), Some(Rect::new(10.0, 55.0, 40.0, 20.0)));

        let fixed = Some(StyleValue::Position(Position::Fixed));
        dom.set_style(&child, StyleProperty::Position, fixed);
        assert_eq!(dom.bounding_rect(&child), Some(Rect::new(0.0, 5.0, 40.0, 20.0)));
    }

    #[test]
    fn test_rejects_parent_cycles() {
        let mut dom = HeadlessDom::new();
        let root = dom.create_root(Rect::new(0.0, 0.0, 100.0, 100.0));
        let outer = dom.create_element(Rect::new(0.0, 0.0, 100.0, 50.0));
        let inner = dom.create_element(Rect::new(0.0, 0.0, 100.0, 20.0));
        dom.append_child(&root, &outer).unwrap();
        dom.append_child(&outer, &inner).unwrap();

        assert!(matches!(
            dom.insert_child(outer, 0, outer),
            Err(RuntimeError::Hierarchy(_))
        ));
        assert!(matches!(
            dom.append_child(&inner, &outer),
            Err(RuntimeError::Hierarchy(_))
        ));
        assert!(matches!(
            dom.append_child(&inner, &root),
            Err(RuntimeError::Hierarchy(_))
        ));

        assert_eq!(dom.parent(&outer), Some(root));
        assert_eq!(dom.children(&inner), Vec::<NodeId>::new());
        assert_eq!(dom.bounding_rect(&outer), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
    }

    #[test]
    fn test_append_moves_to_end() {
        let mut dom = HeadlessDom::new();
        let root = dom.create_root(Rect::default());
        let a = dom.create_element(Rect::default());
        let b = dom.create_element(Rect::default());
        dom.append_child(&root, &a).unwrap();
        dom.append_child(&root, &b).unwrap();

        dom.append_child(&root, &a).unwrap();
        assert_eq!(dom.children(&root), vec![b, a]);
    }

    #[test]
    fn test_finish_callbacks_run_on_advance() {
        let mut dom = HeadlessDom::new();
        let root = dom.create_root(Rect::default());
        let child = dom.create_element(Rect::default());
        dom.append_child(&root, &child).unwrap();

        let callback: FinishCallback<HeadlessDom> = Box::new(move |dom: &mut HeadlessDom| {
            dom.set_scroll(Point::new(1.0, 2.0));
        });
        dom.animate(&child, fade_keyframes(ChangeRange::APPEAR), timing(), Some(callback))
            .unwrap();

        assert_eq!(dom.running_animations(), 1);
        assert_eq!(dom.advance(50.0), 0);
        assert_eq!(dom.animated_properties(child).and_then(|p| p.opacity), Some(0.0));
        assert_eq!(dom.advance(50.0), 1);
        assert_eq!(dom.scroll(), Point::new(1.0, 2.0));
        assert_eq!(dom.running_animations(), 0);
    }

    #[test]
    fn test_rejects_when_disabled_or_detached() {
        let mut dom = HeadlessDom::new();
        let root = dom.create_root(Rect::default());
        let loose = dom.create_element(Rect::default());
        assert!(matches!(
            dom.animate(&loose, fade_keyframes(ChangeRange::APPEAR), timing(), None),
            Err(RuntimeError::Detached(_))
        ));

        dom.set_animations_enabled(false);
        assert!(matches!(
            dom.animate(&root, fade_keyframes(ChangeRange::APPEAR), timing(), None),
            Err(RuntimeError::AnimationRejected(_))
        ));
        assert!(dom.played().is_empty());
    }
}
