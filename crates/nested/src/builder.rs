//! Action interpreter: turns a stream of [`Action`]s into a [`NestedList`].

use crate::tree::{NestedList, NodeId};
use crate::types::{Action, Token};

/// A tree under construction plus the cursor that actions apply to.
///
/// Cloning a builder snapshots both the tree and the cursor, which is what a
/// forked execution needs to resume from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeBuilder {
    tree: NestedList,
    cursor: NodeId,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Start from a fresh empty root with the cursor on it.
    pub fn new() -> Self {
        Self {
            tree: NestedList::new(),
            cursor: NodeId::ROOT,
        }
    }

    /// Replay `tokens` with their gold actions.
    ///
    /// The result's tree is the input wrapped in one extra root list.
    pub fn replay<I: IntoIterator<Item = Token>>(tokens: I) -> Self {
        let mut builder = Self::new();
        for token in tokens {
            builder.apply(Action::gold_for(token), token);
        }
        builder
    }

    /// The tree built so far.
    pub fn tree(&self) -> &NestedList {
        &self.tree
    }

    /// Consume the builder, keeping the tree.
    pub fn into_tree(self) -> NestedList {
        self.tree
    }

    /// The list that the next action applies to.
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Whether the cursor sits on the root list.
    pub fn at_root(&self) -> bool {
        self.cursor == NodeId::ROOT
    }

    /// Apply one action for the current `token`.
    ///
    /// Ill-formed actions never fail: closing at the root and appending a
    /// delimiter as a leaf are both no-ops.
    pub fn apply(&mut self, action: Action, token: Token) {
        match action {
            Action::AppendLeaf => self.append_leaf(token),
            Action::OpenChild => self.open_child(),
            Action::CloseToParent => self.close_to_parent(),
        }
    }

    fn append_leaf(&mut self, token: Token) {
        if let Some(value) = token.value() {
            self.tree.push_leaf(self.cursor, value);
        }
    }

    fn open_child(&mut self) {
        self.cursor = self.tree.push_list(self.cursor);
    }

    fn close_to_parent(&mut self) {
        if let Some(parent) = self.tree.parent(self.cursor) {
            self.cursor = parent;
        }
    }
}

impl NestedList {
    /// Rebuild a tree from its own token stream.
    ///
    /// The leading `[` is taken as the root itself, so
    /// `NestedList::from_tokens(t.tokens()) == t` for every tree `t`.
    pub fn from_tokens<I: IntoIterator<Item = Token>>(tokens: I) -> NestedList {
        let mut builder = TreeBuilder::new();
        let mut tokens = tokens.into_iter().peekable();
        if tokens.peek() == Some(&Token::Open) {
            tokens.next();
        }
        for token in tokens {
            builder.apply(Action::gold_for(token), token);
        }
        builder.into_tree()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens_roundtrip() {
        let tree: NestedList = "[4, [5, [6]], 7]".parse().unwrap();
        assert_eq!(NestedList::from_tokens(tree.tokens()), tree);
        assert_eq!(NestedList::from_tokens(Vec::new()), NestedList::new());
    }

    #[test]
    fn test_open_append_close() {
        let mut builder = TreeBuilder::new();
        builder.apply(Action::OpenChild, Token::Open);
        assert!(!builder.at_root());
        builder.apply(Action::AppendLeaf, Token::Num(0));
        builder.apply(Action::CloseToParent, Token::Close);
        assert!(builder.at_root());
        assert_eq!(builder.tree().to_string(), "[[0]]");
    }

    #[test]
    fn test_close_at_root_is_noop() {
        let mut builder = TreeBuilder::new();
        builder.apply(Action::CloseToParent, Token::Close);
        builder.apply(Action::CloseToParent, Token::Num(3));
        assert!(builder.at_root());
        assert_eq!(builder.tree(), &NestedList::new());
    }

    #[test]
    fn test_append_punctuation_is_noop() {
        let mut builder = TreeBuilder::new();
        builder.apply(Action::AppendLeaf, Token::Open);
        builder.apply(Action::AppendLeaf, Token::Close);
        assert_eq!(builder.tree().leaf_count(), 0);
    }

    #[test]
    fn test_append_does_not_move_cursor() {
        let mut builder = TreeBuilder::new();
        builder.apply(Action::OpenChild, Token::Num(1));
        let cursor = builder.cursor();
        builder.apply(Action::AppendLeaf, Token::Num(2));
        assert_eq!(builder.cursor(), cursor);
        assert_eq!(builder.tree().to_string(), "[[2]]");
    }

    #[test]
    fn test_replay_wraps_input() {
        let input: NestedList = "[1, [2, 3]]".parse().unwrap();
        let builder = TreeBuilder::replay(input.tokens());
        assert!(builder.at_root());
        assert_eq!(builder.into_tree(), input.wrapped());
    }

    #[test]
    fn test_snapshot_keeps_cursor() {
        let mut builder = TreeBuilder::new();
        builder.apply(Action::OpenChild, Token::Open);
        let snapshot = builder.clone();
        builder.apply(Action::CloseToParent, Token::Close);
        builder.apply(Action::AppendLeaf, Token::Num(5));

        let mut resumed = snapshot;
        resumed.apply(Action::AppendLeaf, Token::Num(5));
        assert_eq!(resumed.tree().to_string(), "[[5]]");
        assert_eq!(builder.tree().to_string(), "[[], 5]");
    }
}
