//! Selectors: class tokens combined by "same node" and "strict ancestor".
//!
//! A selector reads left to right starting at the styled node:
//! `Selector::class(HOVER).within(Selector token "panel")` matches a hovered
//! node that has an ancestor carrying `panel`.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::tree::NodeId;

// ---------------------------------------------------------------------------
// StyleClass
// ---------------------------------------------------------------------------

/// An interned style class identifier.
///
/// Classes compare by a 64-bit FNV-1a hash of their name, computed at compile
/// time for `const` classes. Pseudo-classes for interaction state are ordinary
/// classes that the cascade attaches from the node's state flags.
#[derive(Clone, Copy)]
pub struct StyleClass {
    hash: u64,
    name: &'static str,
}

impl StyleClass {
    pub const HOVER: StyleClass = StyleClass::new("hover");
    pub const ACTIVE: StyleClass = StyleClass::new("active");
    pub const DISABLED: StyleClass = StyleClass::new("disabled");
    pub const FOCUS: StyleClass = StyleClass::new("focus");

    /// Intern a class by name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            hash: fnv1a(name.as_bytes()),
            name,
        }
    }

    /// Intern a class whose name is only known at runtime.
    ///
    /// Each distinct name is leaked once per process and shared by every
    /// later call with the same name.
    pub fn from_runtime(name: &str) -> Self {
        match name {
            "hover" => Self::HOVER,
            "active" => Self::ACTIVE,
            "disabled" => Self::DISABLED,
            "focus" => Self::FOCUS,
            _ => Self::new(intern(name)),
        }
    }

    /// The class name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this class is one of the interaction pseudo-classes.
    pub fn is_pseudo(&self) -> bool {
        [Self::HOVER, Self::ACTIVE, Self::DISABLED, Self::FOCUS].contains(self)
    }
}

fn intern(name: &str) -> &'static str {
    static NAMES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
    let mut names = NAMES
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(&interned) = names.get(name) {
        return interned;
    }
    let interned: &'static str = Box::leak(name.into());
    names.insert(interned);
    interned
}

const fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        i += 1;
    }
    hash
}

impl PartialEq for StyleClass {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for StyleClass {}

impl Hash for StyleClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StyleClass({})", self.name)
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pseudo() {
            write!(f, ":{}", self.name)
        } else {
            write!(f, ".{}", self.name)
        }
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// How a token relates to the node matched by the previous token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Same node as the previous token.
    And,
    /// A strict ancestor of the previous token's node.
    Ancestor,
}

/// What a selector token tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorToken {
    /// The node carries the class.
    Class(StyleClass),
    /// The node is this exact node.
    Node(NodeId),
}

/// An ordered sequence of `(Combinator, SelectorToken)` parts.
///
/// The first part's combinator is always [`Combinator::And`] and its token
/// tests the styled node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<(Combinator, SelectorToken)>,
}

impl Selector {
    /// Selector matching nodes that carry `class`.
    pub fn class(class: StyleClass) -> Self {
        Self {
            parts: vec![(Combinator::And, SelectorToken::Class(class))],
        }
    }

    /// Selector matching exactly `node`.
    pub fn node(node: NodeId) -> Self {
        Self {
            parts: vec![(Combinator::And, SelectorToken::Node(node))],
        }
    }

    /// Require `class` on the same node as the previous token.
    pub fn and(mut self, class: StyleClass) -> Self {
        self.parts.push((Combinator::And, SelectorToken::Class(class)));
        self
    }

    /// Require a strict ancestor of the previous token's node to carry `class`.
    pub fn within(mut self, class: StyleClass) -> Self {
        self.parts.push((Combinator::Ancestor, SelectorToken::Class(class)));
        self
    }

    /// Require `node` to be a strict ancestor of the previous token's node.
    pub fn within_node(mut self, node: NodeId) -> Self {
        self.parts.push((Combinator::Ancestor, SelectorToken::Node(node)));
        self
    }

    /// Append a raw part.
    pub fn push(&mut self, combinator: Combinator, token: SelectorToken) {
        let combinator = if self.parts.is_empty() {
            Combinator::And
        } else {
            combinator
        };
        self.parts.push((combinator, token));
    }

    /// The parts in declaration order.
    pub fn parts(&self) -> &[(Combinator, SelectorToken)] {
        &self.parts
    }

    /// Test the selector against `node` as seen through `subject`.
    pub fn matches<S: SelectorSubject + ?Sized>(&self, subject: &S, node: NodeId) -> bool {
        match self.parts.split_first() {
            Some(((_, first), rest)) => {
                token_matches(subject, node, first) && match_rest(subject, node, rest)
            }
            None => false,
        }
    }
}

/// The view of the tree a selector needs: class membership and parent links.
///
/// Implementations decide what "carries a class" means, e.g. by folding in
/// interaction state as pseudo-classes.
pub trait SelectorSubject {
    /// Whether `node` carries `class`.
    fn has_class(&self, node: NodeId, class: StyleClass) -> bool;
    /// The parent of `node`, if any.
    fn parent(&self, node: NodeId) -> Option<NodeId>;
}

fn token_matches<S: SelectorSubject + ?Sized>(
    subject: &S,
    node: NodeId,
    token: &SelectorToken,
) -> bool {
    match token {
        SelectorToken::Class(class) => subject.has_class(node, *class),
        SelectorToken::Node(target) => *target == node,
    }
}

/// Match the remaining parts, backtracking over ancestor choices.
fn match_rest<S: SelectorSubject + ?Sized>(
    subject: &S,
    current: NodeId,
    rest: &[(Combinator, SelectorToken)],
) -> bool {
    let Some(((combinator, token), tail)) = rest.split_first() else {
        return true;
    };
    match combinator {
        Combinator::And => {
            token_matches(subject, current, token) && match_rest(subject, current, tail)
        }
        Combinator::Ancestor => {
            let mut ancestor = subject.parent(current);
            while let Some(candidate) = ancestor {
                if token_matches(subject, candidate, token) && match_rest(subject, candidate, tail)
                {
                    return true;
                }
                ancestor = subject.parent(candidate);
            }
            false
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (combinator, token)) in self.parts.iter().enumerate() {
            if i > 0 && *combinator == Combinator::Ancestor {
                write!(f, " < ")?;
            }
            match token {
                SelectorToken::Class(class) => write!(f, "{class}")?,
                SelectorToken::Node(node) => write!(f, "#{node:?}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::collections::HashMap;

    /// Minimal subject: explicit class lists and parent links.
    #[derive(Default)]
    struct Fixture {
        classes: HashMap<NodeId, Vec<StyleClass>>,
        parents: HashMap<NodeId, NodeId>,
    }

    impl SelectorSubject for Fixture {
        fn has_class(&self, node: NodeId, class: StyleClass) -> bool {
            self.classes.get(&node).is_some_and(|c| c.contains(&class))
        }
        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.parents.get(&node).copied()
        }
    }

    const PANEL: StyleClass = StyleClass::new("panel");
    const PRIMARY: StyleClass = StyleClass::new("primary");
    const LIST: StyleClass = StyleClass::new("list");

    /// root(.list) > panel(.panel) > leaf(.primary :hover)
    fn fixture() -> (Fixture, NodeId, NodeId, NodeId) {
        let mut ids: SlotMap<NodeId, ()> = SlotMap::with_key();
        let (root, panel, leaf) = (ids.insert(()), ids.insert(()), ids.insert(()));
        let mut f = Fixture::default();
        f.classes.insert(root, vec![LIST]);
        f.classes.insert(panel, vec![PANEL]);
        f.classes.insert(leaf, vec![PRIMARY, StyleClass::HOVER]);
        f.parents.insert(panel, root);
        f.parents.insert(leaf, panel);
        (f, root, panel, leaf)
    }

    #[test]
    fn class_identity_is_by_name() {
        assert_eq!(StyleClass::new("x"), StyleClass::from_runtime("x"));
        assert_ne!(StyleClass::new("x"), StyleClass::new("y"));
        assert_eq!(StyleClass::from_runtime("hover"), StyleClass::HOVER);
    }

    #[test]
    fn class_display() {
        assert_eq!(PANEL.to_string(), ".panel");
        assert_eq!(StyleClass::HOVER.to_string(), ":hover");
    }

    #[test]
    fn single_class() {
        let (f, _, panel, leaf) = fixture();
        let sel = Selector::class(PRIMARY);
        assert!(sel.matches(&f, leaf));
        assert!(!sel.matches(&f, panel));
    }

    #[test]
    fn and_requires_both_on_same_node() {
        let (f, _, _, leaf) = fixture();
        assert!(Selector::class(PRIMARY).and(StyleClass::HOVER).matches(&f, leaf));
        assert!(!Selector::class(PRIMARY).and(StyleClass::ACTIVE).matches(&f, leaf));
    }

    #[test]
    fn ancestor_is_strict() {
        let (f, _, panel, leaf) = fixture();
        assert!(Selector::class(PRIMARY).within(PANEL).matches(&f, leaf));
        // panel itself is not its own ancestor
        assert!(!Selector::class(PANEL).within(PANEL).matches(&f, panel));
    }

    #[test]
    fn ancestor_skips_intermediate_nodes() {
        let (f, _, _, leaf) = fixture();
        assert!(Selector::class(PRIMARY).within(LIST).matches(&f, leaf));
    }

    #[test]
    fn chained_ancestors_keep_order() {
        let (f, _, _, leaf) = fixture();
        assert!(Selector::class(PRIMARY).within(PANEL).within(LIST).matches(&f, leaf));
        // list is above panel, not below it
        assert!(!Selector::class(PRIMARY).within(LIST).within(PANEL).matches(&f, leaf));
    }

    #[test]
    fn node_tokens() {
        let (f, root, panel, leaf) = fixture();
        assert!(Selector::node(leaf).matches(&f, leaf));
        assert!(!Selector::node(leaf).matches(&f, panel));
        assert!(Selector::class(PRIMARY).within_node(root).matches(&f, leaf));
        assert!(!Selector::class(PRIMARY).within_node(leaf).matches(&f, leaf));
    }

    #[test]
    fn push_forces_first_combinator() {
        let mut sel = Selector::class(PRIMARY);
        sel.parts.clear();
        sel.push(Combinator::Ancestor, SelectorToken::Class(PANEL));
        assert_eq!(sel.parts()[0].0, Combinator::And);
    }

    #[test]
    fn display_lists_parts() {
        let sel = Selector::class(PRIMARY).and(StyleClass::HOVER).within(PANEL);
        assert_eq!(sel.to_string(), ".primary:hover < .panel");
    }
}
