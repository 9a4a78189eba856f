//! One-hot encodings between tokens/actions and network tensors.

use nested::{Action, Token};

/// Errors from the action network.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Integer token outside the input layer.
    #[error("cannot encode token '{token}': input layer holds integers below {max}")]
    UnencodableToken { token: Token, max: u32 },

    /// The output layer produced an index with no matching action.
    #[error("output index {0} does not name an action")]
    UnknownAction(usize),

    /// Tensor data could not be read back.
    #[error("tensor data error: {0}")]
    TensorData(String),
}

/// Maps tokens to one-hot input vectors.
///
/// Integers `0..max_numerical_items` take the first slots, followed by `[`
/// and `]`.
#[derive(Debug, Clone, Copy)]
pub struct TokenEncoder {
    max_numerical_items: u32,
}

impl TokenEncoder {
    pub fn new(max_numerical_items: u32) -> Self {
        Self {
            max_numerical_items,
        }
    }

    /// Width of the encoded vector.
    pub fn input_size(&self) -> usize {
        self.max_numerical_items as usize + 2
    }

    /// Slot index for `token`.
    pub fn index_of(&self, token: Token) -> Result<usize, NetworkError> {
        let max = self.max_numerical_items;
        match token {
            Token::Num(v) if v < max => Ok(v as usize),
            Token::Num(_) => Err(NetworkError::UnencodableToken { token, max }),
            Token::Open => Ok(max as usize),
            Token::Close => Ok(max as usize + 1),
        }
    }

    /// One-hot vector for `token`.
    pub fn encode(&self, token: Token) -> Result<Vec<f32>, NetworkError> {
        let index = self.index_of(token)?;
        Ok(one_hot(index, self.input_size()))
    }
}

/// One-hot distribution for `action`.
pub fn encode_action(action: Action) -> Vec<f64> {
    one_hot(action.index(), Action::COUNT)
        .into_iter()
        .map(f64::from)
        .collect()
}

/// Index of the first maximum, as an action.
pub fn decode_action(output: &[f64]) -> Result<Action, NetworkError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &p) in output.iter().enumerate() {
        match best {
            Some((_, best_p)) if p <= best_p => {}
            _ => best = Some((i, p)),
        }
    }
    let index = best.map_or(0, |(i, _)| i);
    Action::from_index(index).ok_or(NetworkError::UnknownAction(index))
}

fn one_hot(index: usize, len: usize) -> Vec<f32> {
    (0..len).map(|i| if i == index { 1.0 } else { 0.0 }).collect()
}
