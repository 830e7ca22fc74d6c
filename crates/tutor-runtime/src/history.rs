//! History trimming.
//!
//! The conversation log grows without bound; only the most recent exchange
//! pairs are sent to the model. A *pair* is a [`Role::User`] entry directly
//! followed by a [`Role::Model`] entry. Trimming always cuts just before the
//! user half of a pair, so a pair is never split.

use tutor_core::{Entry, Role};

/// Whether `history[i]` closes a user/model pair.
fn is_pair_end(history: &[Entry], i: usize) -> bool {
    i > 0 && history[i].role() == Role::Model && history[i - 1].role() == Role::User
}

/// Number of user/model pairs in `history`.
pub fn count_pairs(history: &[Entry]) -> usize {
    (1..history.len()).filter(|&i| is_pair_end(history, i)).count()
}

/// Most recent suffix of `history` holding at most `max_pairs` pairs.
///
/// With `max_pairs` or fewer pairs the whole history comes back, orphan
/// entries included. Otherwise the result starts at the user entry of the
/// `max_pairs`-th most recent pair and runs to the end, so anything trailing
/// the last pair (such as an unanswered user entry) is kept. `max_pairs == 0`
/// keeps nothing.
pub fn trim(history: &[Entry], max_pairs: usize) -> &[Entry] {
    if max_pairs == 0 {
        return &history[history.len()..];
    }

    let mut pair_ends = (1..history.len()).rev().filter(|&i| is_pair_end(history, i));
    let Some(cut) = pair_ends.nth(max_pairs - 1) else {
        return history;
    };
    if pair_ends.next().is_none() {
        return history;
    }
    &history[cut - 1..]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
