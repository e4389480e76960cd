use crate::error::{AskError, Result};
use crate::history::turn::Turn;
use crate::llm::models::MessageRole;

/// Append-only, insertion-ordered log of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn to the end of the log. There is no size bound.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Look up a turn by position.
    pub fn turn_at(&self, index: usize) -> Result<&Turn> {
        self.turns.get(index).ok_or(AskError::OutOfRange {
            index,
            len: self.turns.len(),
        })
    }

    /// Resolve the user turn at `index` together with the reply at `index + 1`.
    ///
    /// Fails with `OutOfRange` when either position is past the end and with
    /// `PairingMismatch` when the two turns do not belong to the same exchange.
    pub fn pair_at(&self, index: usize) -> Result<(&Turn, &Turn)> {
        let prompt = self.turn_at(index)?;
        let reply = self.turn_at(index + 1)?;

        if !prompt.is_user()
            || reply.role() != MessageRole::Assistant
            || reply.exchange() != prompt.exchange()
        {
            return Err(AskError::PairingMismatch { index });
        }

        Ok((prompt, reply))
    }

    /// The reply paired with the user turn at `index`.
    pub fn reply_to(&self, index: usize) -> Result<&Turn> {
        self.pair_at(index).map(|(_, reply)| reply)
    }

    /// The final user turn and its reply, if the log ends on a complete pair.
    pub fn latest_exchange(&self) -> Option<(&Turn, &Turn)> {
        let len = self.turns.len();
        if len < 2 {
            return None;
        }
        self.pair_at(len - 2).ok()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl From<Vec<Turn>> for History {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}
