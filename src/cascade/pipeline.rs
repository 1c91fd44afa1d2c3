//! The per-frame cascade.
//!
//! Nodes resolve top-down so that a node always sees its parent's resolved
//! style and effective state from the same frame. For each node:
//!
//! 1. Five layers are stacked, weakest first: the session baseline, the
//!    kind's built-in style, the parent's inherited subset, the session style
//!    sheet (rules only) and the node's explicit style.
//! 2. The rules of every layer are scanned until a full pass matches nothing
//!    new. A matched rule attaches its classes and queues its nested rules in
//!    its own layer, so rules can unlock other rules.
//! 3. Properties merge layer by layer, each layer's matched rules right after
//!    the layer itself.
//! 4. Edge shorthands flatten, transitions run against the previous frame,
//!    and the displayed style is pushed to the layout solver.

use std::time::Instant;

use slotmap::SecondaryMap;
use tracing::{trace, warn};

use crate::layout::resolve::{resolve_style, Viewport};
use crate::style::descriptor::PROPERTIES;
use crate::style::selector::{Selector, SelectorSubject, StyleClass};
use crate::style::style::Style;
use crate::tree::{NodeId, NodeState, Tree};

use super::state::effective_state;

const LAYERS: usize = 5;

/// Inputs shared by every node of one cascade run.
#[derive(Debug, Clone, Copy)]
pub struct Cascade<'a> {
    pub baseline: &'a Style,
    /// Style sheet rules, carried as a rules-only style.
    pub sheet: &'a Style,
    pub viewport: Viewport,
    pub now: Instant,
}

/// One node's cascade result before transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub style: Style,
    /// Declared, kind and rule-attached classes (no pseudo-classes).
    pub classes: Vec<StyleClass>,
    pub state: NodeState,
}

/// Selector view of the tree during a cascade: effective states for nodes
/// resolved so far and the in-progress class set of the current node.
struct CascadeView<'a> {
    tree: &'a Tree,
    states: &'a SecondaryMap<NodeId, NodeState>,
    current: NodeId,
    classes: &'a [StyleClass],
}

impl SelectorSubject for CascadeView<'_> {
    fn has_class(&self, node: NodeId, class: StyleClass) -> bool {
        if class.is_pseudo() {
            let state = self
                .states
                .get(node)
                .copied()
                .or_else(|| self.tree.get(node).map(|n| n.state))
                .unwrap_or_default();
            return state.has_pseudo(class);
        }
        if node == self.current {
            return self.classes.contains(&class);
        }
        self.tree.get(node).is_some_and(|n| n.has_class(class))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }
}

impl Cascade<'_> {
    /// Resolve, animate and lay out every node under the tree's root.
    /// Returns `true` while any transition is still running.
    pub fn run(&self, tree: &mut Tree) -> bool {
        let Some(root) = tree.root() else {
            return false;
        };

        let mut states: SecondaryMap<NodeId, NodeState> = SecondaryMap::new();
        let mut animating = false;
        for id in tree.walk_depth_first(root) {
            let parent = tree
                .parent(id)
                .and_then(|p| Some((states.get(p).copied()?, tree.get(p)?.kind)));
            let Some(own) = tree.get(id).map(|n| n.state) else {
                continue;
            };
            states.insert(id, effective_state(own, parent));

            let Some(resolved) = self.resolve_node(tree, id, &states) else {
                continue;
            };
            let Some(node) = tree.get_mut(id) else {
                continue;
            };

            let mut displayed = resolved.style.clone();
            match node.computed.as_ref() {
                Some(prev) => {
                    for row in PROPERTIES.iter().filter(|row| row.animatable()) {
                        animating |= row.animate(
                            prev,
                            &resolved.style,
                            &mut displayed,
                            &mut node.transitions,
                            self.now,
                        );
                    }
                }
                None => node.transitions.clear(),
            }
            node.computed = Some(resolved.style);
            node.displayed = displayed;
            node.resolved_classes = resolved.classes;

            let layout = resolve_style(&node.displayed, self.viewport);
            if let Err(err) = tree.layout_engine_mut().set_style(id, layout) {
                warn!(node = ?id, %err, "failed to update layout style");
            }
        }
        animating
    }

    /// Resolve one node's target style. Ancestors must already have been
    /// resolved this frame and their effective states recorded in `states`.
    pub fn resolve_node(
        &self,
        tree: &Tree,
        id: NodeId,
        states: &SecondaryMap<NodeId, NodeState>,
    ) -> Option<Resolved> {
        let node = tree.get(id)?;
        let state = states.get(id).copied().unwrap_or(node.state);

        let builtin = (node.kind.builtin)();
        let inherited = tree
            .parent(id)
            .and_then(|p| tree.get(p))
            .and_then(|p| p.computed.as_ref())
            .map(Style::inherited)
            .unwrap_or_default();
        let mut explicit = node.style.clone();
        for class in &node.classes {
            explicit.add_class(*class);
        }
        let layers: [&Style; LAYERS] = [self.baseline, &builtin, &inherited, self.sheet, &explicit];

        let mut classes = vec![node.kind.class];
        for layer in &layers {
            for class in &layer.classes {
                if !classes.contains(class) {
                    classes.push(*class);
                }
            }
        }

        let mut pending: Vec<(usize, &Selector, &Style)> = layers
            .iter()
            .copied()
            .enumerate()
            .flat_map(|(i, layer)| layer.rules.iter().map(move |(sel, style)| (i, sel, style)))
            .collect();
        let mut matched: [Vec<&Style>; LAYERS] = Default::default();

        loop {
            let mut progressed = false;
            let mut i = 0;
            while i < pending.len() {
                let hit = {
                    let view = CascadeView {
                        tree,
                        states,
                        current: id,
                        classes: &classes,
                    };
                    pending[i].1.matches(&view, id)
                };
                if !hit {
                    i += 1;
                    continue;
                }
                let (layer, selector, style) = pending.remove(i);
                trace!(node = ?id, %selector, layer, "rule matched");
                for class in &style.classes {
                    if !classes.contains(class) {
                        classes.push(*class);
                    }
                }
                pending.extend(style.rules.iter().map(|(sel, nested)| (layer, sel, nested)));
                matched[layer].push(style);
                progressed = true;
            }
            if !progressed {
                break;
            }
        }

        let mut style = Style::new();
        for (layer, rules) in layers.iter().zip(&matched) {
            style.merge_properties(layer);
            for rule in rules {
                style.merge_properties(rule);
            }
        }
        style.flatten_edges();
        classes.retain(|class| !class.is_pseudo());
        style.classes = classes.clone();

        Some(Resolved {
            style,
            classes,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;
    use crate::style::property::Transition;
    use crate::style::value::{Color, Length};
    use crate::tree::{Capabilities, ChildLimit, NodeKind};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn blue_with_hover_red() -> Style {
        Style::new()
            .with(|s| {
                s.color.set(Color::BLUE);
            })
            .rule(
                Selector::class(StyleClass::HOVER),
                Style::new().with(|s| {
                    s.color.set(Color::RED);
                }),
            )
    }

    static TINTED: NodeKind = NodeKind::new("Tinted", ChildLimit::Many).with_builtin(blue_with_hover_red);
    static PLAIN: NodeKind = NodeKind::new("Plain", ChildLimit::Many);
    static COUPLED: NodeKind = NodeKind::new("Coupled", ChildLimit::Many)
        .with_capabilities(Capabilities::PROPAGATE_HOVER);

    const VIEWPORT: Viewport = taffy::geometry::Size {
        width: 200.0,
        height: 100.0,
    };

    fn baseline() -> Style {
        Style::new().with(|s| {
            s.color.set(Color::BLACK);
        })
    }

    fn tree_with(kind: &'static NodeKind) -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.insert(&PLAIN, None, None, 0).unwrap();
        let node = tree.insert(kind, Some(Id::from_str("n")), Some(root), 0).unwrap();
        tree.set_children(root, vec![node]).unwrap();
        (tree, root, node)
    }

    fn run(tree: &mut Tree, baseline: &Style, sheet: &Style, now: Instant) -> bool {
        Cascade {
            baseline,
            sheet,
            viewport: VIEWPORT,
            now,
        }
        .run(tree)
    }

    fn color_of(tree: &Tree, id: NodeId) -> Option<Color> {
        tree.get(id)?.displayed.color.get().copied()
    }

    #[test]
    fn cascade_precedence() {
        let (mut tree, _, node) = tree_with(&TINTED);
        let base = baseline();
        let sheet = Style::new();
        let now = Instant::now();

        let set = |tree: &mut Tree, hover: bool, explicit: bool| {
            let n = tree.get_mut(node).unwrap();
            n.state.set(NodeState::HOVER, hover);
            n.style = if explicit {
                Style::new().with(|s| {
                    s.color.set(Color::GREEN);
                })
            } else {
                Style::new()
            };
        };

        set(&mut tree, true, true);
        run(&mut tree, &base, &sheet, now);
        assert_eq!(color_of(&tree, node), Some(Color::GREEN));

        set(&mut tree, true, false);
        run(&mut tree, &base, &sheet, now);
        assert_eq!(color_of(&tree, node), Some(Color::RED));

        set(&mut tree, false, false);
        run(&mut tree, &base, &sheet, now);
        assert_eq!(color_of(&tree, node), Some(Color::BLUE));
    }

    #[test]
    fn baseline_applies_when_nothing_else_does() {
        let (mut tree, root, _) = tree_with(&PLAIN);
        run(&mut tree, &baseline(), &Style::new(), Instant::now());
        assert_eq!(color_of(&tree, root), Some(Color::BLACK));
    }

    #[test]
    fn rules_unlock_rules_until_fixed_point() {
        const A: StyleClass = StyleClass::new("a");
        const B: StyleClass = StyleClass::new("b");
        let (mut tree, _, node) = tree_with(&PLAIN);
        let sheet = Style::new()
            .rule(
                Selector::class(B),
                Style::new().with(|s| {
                    s.opacity.set(0.5);
                }),
            )
            .rule(Selector::class(A), Style::new().with_class(B));
        tree.get_mut(node).unwrap().add_class(A);

        run(&mut tree, &baseline(), &sheet, Instant::now());
        let n = tree.get(node).unwrap();
        assert_eq!(n.displayed.opacity.get(), Some(&0.5));
        assert!(n.resolved_classes.contains(&B));
    }

    #[test]
    fn mutually_dependent_rules_terminate_unmatched() {
        const A: StyleClass = StyleClass::new("a");
        const B: StyleClass = StyleClass::new("b");
        let (mut tree, _, node) = tree_with(&PLAIN);
        let sheet = Style::new()
            .rule(Selector::class(A), Style::new().with_class(B))
            .rule(Selector::class(B), Style::new().with_class(A));
        run(&mut tree, &baseline(), &sheet, Instant::now());
        let n = tree.get(node).unwrap();
        assert!(!n.resolved_classes.contains(&A));
        assert!(!n.resolved_classes.contains(&B));
    }

    #[test]
    fn nested_rules_join_their_layer() {
        const CARD: StyleClass = StyleClass::new("card");
        let (mut tree, _, node) = tree_with(&PLAIN);
        let sheet = Style::new().rule(
            Selector::class(CARD),
            Style::new().rule(
                Selector::class(StyleClass::HOVER),
                Style::new().with(|s| {
                    s.opacity.set(0.25);
                }),
            ),
        );
        {
            let n = tree.get_mut(node).unwrap();
            n.add_class(CARD);
            n.state.insert(NodeState::HOVER);
        }
        run(&mut tree, &baseline(), &sheet, Instant::now());
        assert_eq!(tree.get(node).unwrap().displayed.opacity.get(), Some(&0.25));
    }

    #[test]
    fn only_descendant_scoped_properties_inherit() {
        let (mut tree, root, node) = tree_with(&PLAIN);
        tree.get_mut(root).unwrap().style = Style::new().with(|s| {
            s.font_size.set(20.0).inherit();
            s.background.set(Color::RED);
        });
        run(&mut tree, &baseline(), &Style::new(), Instant::now());
        let n = tree.get(node).unwrap();
        assert_eq!(n.displayed.font_size.get(), Some(&20.0));
        assert!(!n.displayed.background.is_set());
    }

    #[test]
    fn ancestor_selector_sees_resolved_parent() {
        const PANEL: StyleClass = StyleClass::new("panel");
        let (mut tree, root, node) = tree_with(&PLAIN);
        tree.get_mut(root).unwrap().add_class(PANEL);
        let sheet = Style::new().rule(
            Selector::class(PLAIN.class).within(PANEL),
            Style::new().with(|s| {
                s.corner_radius.set(4.0);
            }),
        );
        run(&mut tree, &baseline(), &sheet, Instant::now());
        assert_eq!(tree.get(node).unwrap().displayed.corner_radius.get(), Some(&4.0));
        // The root is a Plain too, but has no panel ancestor.
        assert!(!tree.get(root).unwrap().displayed.corner_radius.is_set());
    }

    #[test]
    fn hover_propagates_from_coupled_parent() {
        let mut tree = Tree::new();
        let root = tree.insert(&COUPLED, None, None, 0).unwrap();
        let child = tree.insert(&TINTED, Some(Id::from_str("c")), Some(root), 0).unwrap();
        tree.set_children(root, vec![child]).unwrap();
        tree.get_mut(root).unwrap().state.insert(NodeState::HOVER);
        run(&mut tree, &baseline(), &Style::new(), Instant::now());
        assert_eq!(color_of(&tree, child), Some(Color::RED));
    }

    #[test]
    fn disabled_parent_suppresses_hover_rules() {
        let mut tree = Tree::new();
        let root = tree.insert(&COUPLED, None, None, 0).unwrap();
        let child = tree.insert(&TINTED, Some(Id::from_str("c")), Some(root), 0).unwrap();
        tree.set_children(root, vec![child]).unwrap();
        tree.get_mut(root).unwrap().state.insert(NodeState::HOVER | NodeState::DISABLED);
        run(&mut tree, &baseline(), &Style::new(), Instant::now());
        assert_eq!(color_of(&tree, child), Some(Color::BLUE));
    }

    #[test]
    fn first_frame_does_not_animate() {
        let (mut tree, _, node) = tree_with(&PLAIN);
        tree.get_mut(node).unwrap().style = Style::new().with(|s| {
            s.opacity.set(0.0).transition(Transition::millis(100));
        });
        let t0 = Instant::now();
        assert!(!run(&mut tree, &baseline(), &Style::new(), t0));
        assert_eq!(tree.get(node).unwrap().displayed.opacity.get(), Some(&0.0));

        tree.get_mut(node).unwrap().style = Style::new().with(|s| {
            s.opacity.set(1.0).transition(Transition::millis(100));
        });
        assert!(run(&mut tree, &baseline(), &Style::new(), t0 + Duration::from_millis(1)));
        let shown = *tree.get(node).unwrap().displayed.opacity.get().unwrap();
        assert!(shown < 0.1);
        assert_eq!(tree.get(node).unwrap().computed.as_ref().unwrap().opacity.get(), Some(&1.0));
    }

    #[test]
    fn displayed_style_reaches_layout() {
        let (mut tree, root, node) = tree_with(&PLAIN);
        tree.get_mut(root).unwrap().style = Style::new().with(|s| {
            s.width.set(Length::Px(200.0));
            s.height.set(Length::Px(100.0));
        });
        tree.get_mut(node).unwrap().style = Style::new().with(|s| {
            s.width.set(Length::Percent(50.0));
            s.height.set(Length::Px(10.0));
        });
        run(&mut tree, &baseline(), &Style::new(), Instant::now());
        tree.compute_layout(crate::geometry::Size::new(200.0, 100.0)).unwrap();
        assert_eq!(tree.layout(node).map(|r| r.width()), Some(100.0));
    }
}
