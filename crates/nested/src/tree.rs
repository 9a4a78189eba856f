//! Arena-backed nested list.
//!
//! Lists are stored in a flat `Vec` and reference their parent by index, so
//! the parent link is a navigation aid only and a `clone()` is a full,
//! independent deep copy.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::types::Token;

/// Span marker `(min leaf, max leaf)` of one list.
pub type Bracket = (i64, i64);

/// Span assigned to a list with no leaf descendants.
///
/// Gold instances never contain empty lists, so this span never matches and
/// only lowers the candidate's precision.
pub const DEGENERATE_BRACKET: Bracket = (-1, -1);

/// Index of a list inside its [`NestedList`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root list; every arena has one.
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One child of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    /// Integer leaf.
    Leaf(u32),
    /// Nested list, by arena index.
    List(NodeId),
}

#[derive(Debug, Clone)]
struct ListNode {
    parent: Option<NodeId>,
    children: Vec<Item>,
}

/// An ordered tree of integer leaves.
///
/// Children order is significant and never re-sorted. Equality and hashing
/// are structural (by the flattened token stream), so two trees built in a
/// different arena order still compare equal.
#[derive(Debug, Clone)]
pub struct NestedList {
    nodes: Vec<ListNode>,
}

impl Default for NestedList {
    fn default() -> Self {
        Self::new()
    }
}

impl NestedList {
    /// An empty root list.
    pub fn new() -> Self {
        Self {
            nodes: vec![ListNode {
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root list id.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Parent of `id`, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of `id` in order.
    pub fn children(&self, id: NodeId) -> &[Item] {
        &self.nodes[id.0].children
    }

    /// Number of lists in the tree, root included.
    pub fn num_lists(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of every list, root first.
    pub fn list_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Append an integer leaf to `parent`.
    pub fn push_leaf(&mut self, parent: NodeId, value: u32) {
        self.nodes[parent.0].children.push(Item::Leaf(value));
    }

    /// Append a new empty list to `parent` and return its id.
    pub fn push_list(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ListNode {
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(Item::List(id));
        id
    }

    /// Copy `other` as a new child list of `at`.
    pub fn graft(&mut self, at: NodeId, other: &NestedList) {
        let mut cursor = at;
        for token in other.tokens() {
            match token {
                Token::Open => cursor = self.push_list(cursor),
                Token::Num(v) => self.push_leaf(cursor, v),
                Token::Close => cursor = self.parent(cursor).unwrap_or(at),
            }
        }
    }

    /// A new tree whose root holds a copy of `self` as its only child.
    pub fn wrapped(&self) -> NestedList {
        let mut outer = NestedList::new();
        outer.graft(NodeId::ROOT, self);
        outer
    }

    /// Flatten the whole tree: `[`, children in order, `]`.
    pub fn tokens(&self) -> Tokens<'_> {
        self.subtree_tokens(NodeId::ROOT)
    }

    /// Flatten the subtree rooted at `id`.
    pub fn subtree_tokens(&self, id: NodeId) -> Tokens<'_> {
        Tokens {
            tree: self,
            pending: Some(id),
            stack: Vec::new(),
        }
    }

    /// Leaf values at any depth, left to right.
    pub fn descendants(&self) -> impl Iterator<Item = u32> + '_ {
        self.subtree_descendants(NodeId::ROOT)
    }

    /// Leaf values under `id`, left to right.
    pub fn subtree_descendants(&self, id: NodeId) -> impl Iterator<Item = u32> + '_ {
        self.subtree_tokens(id).filter_map(Token::value)
    }

    /// Total number of integer leaves.
    pub fn leaf_count(&self) -> usize {
        self.descendants().count()
    }

    /// `(min, max)` leaf value under `id`, or [`DEGENERATE_BRACKET`] if the
    /// list has no leaves at any depth.
    pub fn span(&self, id: NodeId) -> Bracket {
        self.subtree_descendants(id)
            .fold(None, |acc: Option<(u32, u32)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .map_or(DEGENERATE_BRACKET, |(lo, hi)| (i64::from(lo), i64::from(hi)))
    }

    /// Span of every list in the tree, root included.
    pub fn brackets(&self) -> HashSet<Bracket> {
        self.list_ids().map(|id| self.span(id)).collect()
    }
}

/// Lazy pre/in/post-order token stream over a subtree.
///
/// Restart by calling [`NestedList::tokens`] again.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    tree: &'a NestedList,
    pending: Option<NodeId>,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(id) = self.pending.take() {
            self.stack.push((id, 0));
            return Some(Token::Open);
        }
        let (id, next_child) = self.stack.last_mut()?;
        match self.tree.nodes[id.0].children.get(*next_child).copied() {
            Some(Item::Leaf(v)) => {
                *next_child += 1;
                Some(Token::Num(v))
            }
            Some(Item::List(child)) => {
                *next_child += 1;
                self.stack.push((child, 0));
                Some(Token::Open)
            }
            None => {
                self.stack.pop();
                Some(Token::Close)
            }
        }
    }
}

impl PartialEq for NestedList {
    fn eq(&self, other: &Self) -> bool {
        self.tokens().eq(other.tokens())
    }
}

impl Eq for NestedList {}

impl Hash for NestedList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for token in self.tokens() {
            token.hash(state);
        }
    }
}

impl fmt::Display for NestedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut need_sep = false;
        for token in self.tokens() {
            match token {
                Token::Open => {
                    if need_sep {
                        write!(f, ", ")?;
                    }
                    write!(f, "[")?;
                    need_sep = false;
                }
                Token::Num(v) => {
                    if need_sep {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                    need_sep = true;
                }
                Token::Close => {
                    write!(f, "]")?;
                    need_sep = true;
                }
            }
        }
        Ok(())
    }
}

/// Error returned when parsing bracket notation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid nested list {input:?}: {reason}")]
pub struct ParseNestedListError {
    input: String,
    reason: String,
}

impl FromStr for NestedList {
    type Err = ParseNestedListError;

    /// Parse bracket notation such as `[1, [2, 3]]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| ParseNestedListError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let mut tokens = Vec::new();
        let mut chars = s.chars().peekable();
        while let Some(&c) = chars.peek() {
            match c {
                '[' => {
                    tokens.push(Token::Open);
                    chars.next();
                }
                ']' => {
                    tokens.push(Token::Close);
                    chars.next();
                }
                ',' | ' ' | '\t' | '\n' => {
                    chars.next();
                }
                '0'..='9' => {
                    let mut digits = String::new();
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        digits.push(d);
                        chars.next();
                    }
                    let value = digits.parse::<u32>().map_err(|_| fail("integer out of range"))?;
                    tokens.push(Token::Num(value));
                }
                other => return Err(fail(&format!("unexpected character {other:?}"))),
            }
        }

        if tokens.first() != Some(&Token::Open) {
            return Err(fail("must start with '['"));
        }

        let mut tree = NestedList::new();
        let mut cursor = Some(NodeId::ROOT);
        for token in &tokens[1..] {
            let current = cursor.ok_or_else(|| fail("trailing tokens after the outer list"))?;
            match *token {
                Token::Open => cursor = Some(tree.push_list(current)),
                Token::Num(v) => tree.push_leaf(current, v),
                Token::Close => cursor = tree.parent(current),
            }
        }
        if cursor.is_some() {
            return Err(fail("unbalanced brackets"));
        }
        Ok(tree)
    }
}
