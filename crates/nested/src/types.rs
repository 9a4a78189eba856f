use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors from corpus generation.
#[derive(Debug, thiserror::Error)]
pub enum NestedError {
    /// The generator kept producing duplicates and the draw budget ran out.
    #[error("corpus exhausted: requested {requested} distinct instances, generated {generated}")]
    CorpusExhausted { requested: usize, generated: usize },

    /// Generator parameters cannot produce a valid instance.
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
}

/// One unit of the input stream: a structure delimiter or an integer item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `[`, opens a nested list.
    Open,
    /// `]`, closes the innermost open list.
    Close,
    /// An integer leaf.
    Num(u32),
}

impl Token {
    /// The integer payload, `None` for punctuation.
    pub fn value(self) -> Option<u32> {
        match self {
            Token::Num(v) => Some(v),
            Token::Open | Token::Close => None,
        }
    }

    /// Whether this token is one of the two delimiters.
    pub fn is_punctuation(self) -> bool {
        !matches!(self, Token::Num(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open => write!(f, "["),
            Token::Close => write!(f, "]"),
            Token::Num(v) => write!(f, "{v}"),
        }
    }
}

/// A tree-building decision.
///
/// The discriminant is the index of the action in a predictor's output
/// distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Append the current token as a leaf of the cursor node.
    AppendLeaf = 0,
    /// Create a child list under the cursor and move into it.
    OpenChild = 1,
    /// Move the cursor to its parent (no-op at the root).
    CloseToParent = 2,
}

impl Action {
    /// Number of actions, i.e. the length of every output distribution.
    pub const COUNT: usize = 3;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] =
        [Action::AppendLeaf, Action::OpenChild, Action::CloseToParent];

    /// Position of this action in an output distribution.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Action::index`].
    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// The action that reproduces the input structure for `token`.
    pub fn gold_for(token: Token) -> Action {
        match token {
            Token::Open => Action::OpenChild,
            Token::Close => Action::CloseToParent,
            Token::Num(_) => Action::AppendLeaf,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AppendLeaf => write!(f, "append_leaf"),
            Self::OpenChild => write!(f, "open_child"),
            Self::CloseToParent => write!(f, "close_to_parent"),
        }
    }
}
