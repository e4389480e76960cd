//! Sidebar listing of past prompts and resolution of a selected prompt to its reply.

use crate::error::{AskError, Result};
use crate::history::{History, Turn};

/// Longest preview shown for a prompt in the sidebar, in characters.
pub const PREVIEW_CHARS: usize = 30;

/// One row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    /// 1-based position among the user turns.
    pub number: usize,
    /// Position of the user turn in the history.
    pub index: usize,
    pub preview: String,
}

/// First line of `text`, capped at [`PREVIEW_CHARS`] characters.
pub fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let mut chars = first_line.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();

    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// One entry per user turn, in history order.
pub fn sidebar(history: &History) -> Vec<SidebarEntry> {
    history
        .turns()
        .iter()
        .enumerate()
        .filter(|(_, turn)| turn.is_user())
        .enumerate()
        .map(|(position, (index, turn))| SidebarEntry {
            number: position + 1,
            index,
            preview: preview(turn.text()),
        })
        .collect()
}

/// A prompt and the reply paired with it.
#[derive(Debug, Clone, Copy)]
pub struct SelectedExchange<'a> {
    pub prompt: &'a Turn,
    pub reply: &'a Turn,
}

/// The index of the user turn the viewer wants to re-inspect.
///
/// This is view state only; it is never persisted and may go stale if the
/// history it points into is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: Option<usize>,
}

impl Selection {
    pub fn select(&mut self, index: usize) {
        self.index = Some(index);
    }

    /// Select the sidebar row with the given sequence number.
    ///
    /// Fails with `OutOfRange` (reporting the number and the row count) when
    /// no row carries that number; the previous selection is kept.
    pub fn select_number(&mut self, entries: &[SidebarEntry], number: usize) -> Result<()> {
        let entry = entries
            .iter()
            .find(|entry| entry.number == number)
            .ok_or(AskError::OutOfRange {
                index: number,
                len: entries.len(),
            })?;
        self.select(entry.index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.index = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Resolve the selection against `history`.
    ///
    /// `Ok(None)` when nothing is selected. `OutOfRange` or `PairingMismatch`
    /// when the selection no longer fits the history.
    pub fn resolve<'a>(&self, history: &'a History) -> Result<Option<SelectedExchange<'a>>> {
        let Some(index) = self.index else {
            return Ok(None);
        };

        let (prompt, reply) = history.pair_at(index)?;
        Ok(Some(SelectedExchange { prompt, reply }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(prompts: &[&str]) -> History {
        let mut history = History::new();
        for prompt in prompts {
            let user = Turn::user(*prompt);
            let key = user.exchange();
            history.append(user);
            history.append(Turn::assistant(key, format!("reply to {prompt}")));
        }
        history
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("A"), "A");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_preview_takes_first_line() {
        assert_eq!(preview("first line\nsecond line"), "first line");
    }

    #[test]
    fn test_preview_truncates_long_line() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(preview(text), "abcdefghijklmnopqrstuvwxyz0123...");
    }

    #[test]
    fn test_preview_exact_length_not_truncated() {
        let text = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&text), text);
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "é".repeat(PREVIEW_CHARS + 5);
        assert_eq!(preview(&text), format!("{}...", "é".repeat(PREVIEW_CHARS)));
    }

    #[test]
    fn test_sidebar_lists_user_turns() {
        let history = history_of(&["A", "B"]);
        let entries = sidebar(&history);

        assert_eq!(
            entries,
            vec![
                SidebarEntry {
                    number: 1,
                    index: 0,
                    preview: "A".to_string()
                },
                SidebarEntry {
                    number: 2,
                    index: 2,
                    preview: "B".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_sidebar_numbers_rows_in_order_when_turns_do_not_alternate() {
        let mut history = History::new();
        history.append(Turn::user("A"));
        let user = Turn::user("B");
        let key = user.exchange();
        history.append(user);
        history.append(Turn::assistant(key, "b"));

        let entries = sidebar(&history);
        let numbered: Vec<(usize, usize)> = entries.iter().map(|e| (e.number, e.index)).collect();
        assert_eq!(numbered, vec![(1, 0), (2, 1)]);

        let mut selection = Selection::default();
        selection.select_number(&entries, 2).unwrap();
        let selected = selection.resolve(&history).unwrap().unwrap();
        assert_eq!(selected.prompt.text(), "B");
        assert_eq!(selected.reply.text(), "b");
    }

    #[test]
    fn test_empty_selection_resolves_to_none() {
        let history = history_of(&["A"]);
        let selection = Selection::default();

        assert!(selection.resolve(&history).unwrap().is_none());
    }

    #[test]
    fn test_resolve_selected_pair() {
        let history = history_of(&["A", "B"]);
        let mut selection = Selection::default();
        selection.select(2);

        let selected = selection.resolve(&history).unwrap().unwrap();
        assert_eq!(selected.prompt.text(), "B");
        assert_eq!(selected.reply.text(), "reply to B");
    }

    #[test]
    fn test_select_number_uses_sidebar_row() {
        let history = history_of(&["A", "B", "C"]);
        let entries = sidebar(&history);
        let mut selection = Selection::default();

        selection.select_number(&entries, 3).unwrap();

        assert_eq!(selection.index(), Some(4));
        let selected = selection.resolve(&history).unwrap().unwrap();
        assert_eq!(selected.prompt.text(), "C");
    }

    #[test]
    fn test_stale_selection_is_out_of_range() {
        let long = history_of(&["A", "B", "C"]);
        let mut selection = Selection::default();
        selection.select_number(&sidebar(&long), 3).unwrap();

        let reloaded = history_of(&["A"]);
        match selection.resolve(&reloaded) {
            Err(AskError::OutOfRange { index, len }) => {
                assert_eq!(index, 4);
                assert_eq!(len, 2);
            }
            other => panic!("Expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_number_is_out_of_range() {
        let history = history_of(&["A"]);
        let entries = sidebar(&history);
        let mut selection = Selection::default();
        selection.select(0);

        for number in [0, 2, 7] {
            match selection.select_number(&entries, number) {
                Err(AskError::OutOfRange { index, len }) => {
                    assert_eq!(index, number);
                    assert_eq!(len, 1);
                }
                other => panic!("Expected OutOfRange, got {other:?}"),
            }
        }
        assert_eq!(selection.index(), Some(0));
    }

    #[test]
    fn test_missing_reply_is_out_of_range() {
        let mut history = history_of(&["A"]);
        history.append(Turn::user("pending"));
        let mut selection = Selection::default();
        selection.select(2);

        assert!(matches!(
            selection.resolve(&history),
            Err(AskError::OutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_clear_selection() {
        let mut selection = Selection::default();
        selection.select(0);
        selection.clear();

        assert_eq!(selection.index(), None);
    }
}
