//! Collision checks over ordered cell sequences
//!
//! Bodies are head-first sequences of cells. These helpers take any such
//! sequence so snake and boss bodies are compared directly.

use super::state::Coord;

/// How one body's head meets another body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Heads occupy the same cell
    HeadToHead,
    /// Head sits on a non-head segment of the other body
    Body,
}

/// True if any cell of `body` equals `cell`
pub fn occupies<'a>(body: impl IntoIterator<Item = &'a Coord>, cell: Coord) -> bool {
    body.into_iter().any(|&c| c == cell)
}

/// True iff the head equals some non-head segment of the same body
pub fn self_collision<'a>(body: impl IntoIterator<Item = &'a Coord>) -> bool {
    let mut cells = body.into_iter();
    match cells.next() {
        Some(&head) => cells.any(|&c| c == head),
        None => false,
    }
}

/// Classify how the head of `attacker` touches `target`
///
/// Head-to-head wins over body contact when both would match.
pub fn contact<'a, 'b>(
    attacker: impl IntoIterator<Item = &'a Coord>,
    target: impl IntoIterator<Item = &'b Coord>,
) -> Contact {
    let Some(&head) = attacker.into_iter().next() else {
        return Contact::None;
    };
    let mut cells = target.into_iter();
    match cells.next() {
        Some(&target_head) if target_head == head => Contact::HeadToHead,
        Some(_) if cells.any(|&c| c == head) => Contact::Body,
        _ => Contact::None,
    }
}
