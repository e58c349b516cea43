//! A minimal, non-networked command facade over a [`Keyspace`].
//!
//! Mirrors spec.md §6's external-interface table one-to-one: every variant
//! here is a one- or two-line dispatch into an [`crate::iol::IndexedOrderedList`]
//! primitive, after the façade-level translations spec.md explicitly assigns
//! outside the core — 0-based/1-based rank conversion and negative-index
//! normalization (the same job `ZRANGE`'s negative indices do in the command
//! family this engine replaces; see `sorted_set_ops.rs` in the teacher
//! codebase for the analogous dispatch shape, minus the RESP wire format,
//! which is out of scope here).

use crate::keyspace::Keyspace;
use crate::member::Member;
use crate::score::Score;

/// One façade-level request against a single named set.
#[derive(Debug, Clone)]
pub enum Command {
    Add { member: Member, score: Score },
    Remove { member: Member, score: Score },
    RemoveByMember { member: Member },
    Score { member: Member },
    Rank { member: Member, score: Score },
    ByRank { index: i64 },
    Range { start: i64, stop: i64, reverse: bool },
    RangeByScore { min: Score, max: Score, reverse: bool },
    CountByScore { min: Score, max: Score },
    RemoveByRankRange { start: i64, stop: i64 },
    RemoveByScoreRange { min: Score, max: Score },
    InRankRange { member: Member, score: Score, start: i64, stop: i64 },
    IncrBy { member: Member, delta: Score },
    Prev { member: Member },
    Next { member: Member },
    Len,
    All,
    Clear,
}

/// The result of executing one [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Removed(bool),
    Score(Option<Score>),
    Rank(usize),
    Entry(Option<(Member, Score)>),
    Entries(Vec<(Member, Score)>),
    Count(usize),
    Len(usize),
    InRange(bool),
    Unit,
}

/// Translate a 0-based, possibly-negative façade index into the core's
/// 1-based rank (spec.md §6: "Negative indices ... translated to
/// non-negative by the façade before reaching the core"). A negative index
/// counts from the end, e.g. `-1` is the last entry.
fn normalize_index(index: i64, len: usize) -> i64 {
    let zero_based = if index < 0 { index + len as i64 } else { index };
    zero_based + 1
}

/// Execute `command` against the named set `key` in `keyspace`, creating the
/// set on first write if it does not yet exist.
pub fn execute(keyspace: &Keyspace, key: &str, command: Command) -> CommandResult {
    match command {
        Command::Add { member, score } => {
            keyspace.get_or_create(key).write().insert(member, score);
            CommandResult::Unit
        }
        Command::Remove { member, score } => {
            let removed = match keyspace.get(key) {
                Some(set) => set.write().delete(&member, &score),
                None => false,
            };
            CommandResult::Removed(removed)
        }
        Command::RemoveByMember { member } => {
            let removed = match keyspace.get(key) {
                Some(set) => set.write().delete_by_member(&member),
                None => false,
            };
            CommandResult::Removed(removed)
        }
        Command::Score { member } => {
            let score = keyspace
                .get(key)
                .and_then(|set| set.read().get_score(&member));
            CommandResult::Score(score)
        }
        Command::Rank { member, score } => {
            let rank = keyspace
                .get(key)
                .map(|set| set.read().get_rank(&member, &score))
                .unwrap_or(0);
            CommandResult::Rank(rank)
        }
        Command::ByRank { index } => {
            let entry = keyspace.get(key).and_then(|set| {
                let set = set.read();
                let rank = normalize_index(index, set.len());
                if rank < 1 {
                    None
                } else {
                    set.get_by_rank(rank as usize)
                }
            });
            CommandResult::Entry(entry)
        }
        Command::Range { start, stop, reverse } => {
            let entries = keyspace
                .get(key)
                .map(|set| {
                    let set = set.read();
                    let len = set.len();
                    set.range(normalize_index(start, len), normalize_index(stop, len), reverse)
                })
                .unwrap_or_default();
            CommandResult::Entries(entries)
        }
        Command::RangeByScore { min, max, reverse } => {
            let entries = keyspace
                .get(key)
                .map(|set| set.read().range_by_score(&min, &max, reverse))
                .unwrap_or_default();
            CommandResult::Entries(entries)
        }
        Command::CountByScore { min, max } => {
            let count = keyspace
                .get(key)
                .map(|set| set.read().count_by_score(&min, &max))
                .unwrap_or(0);
            CommandResult::Count(count)
        }
        Command::RemoveByRankRange { start, stop } => {
            let removed = keyspace
                .get(key)
                .map(|set| {
                    let mut set = set.write();
                    let len = set.len();
                    set.remove_by_rank_range(normalize_index(start, len), normalize_index(stop, len))
                })
                .unwrap_or(0);
            CommandResult::Count(removed)
        }
        Command::RemoveByScoreRange { min, max } => {
            let removed = keyspace
                .get(key)
                .map(|set| set.write().remove_by_score_range(&min, &max))
                .unwrap_or(0);
            CommandResult::Count(removed)
        }
        Command::InRankRange { member, score, start, stop } => {
            let in_range = keyspace
                .get(key)
                .map(|set| {
                    let set = set.read();
                    let len = set.len();
                    set.in_rank_range(&member, &score, normalize_index(start, len), normalize_index(stop, len))
                })
                .unwrap_or(false);
            CommandResult::InRange(in_range)
        }
        Command::IncrBy { member, delta } => {
            let result = keyspace.get_or_create(key).write().increment_by(member, delta);
            CommandResult::Score(Some(result))
        }
        Command::Prev { member } => {
            let entry = keyspace.get(key).and_then(|set| set.read().get_prev_member(&member));
            CommandResult::Entry(entry)
        }
        Command::Next { member } => {
            let entry = keyspace.get(key).and_then(|set| set.read().get_next_member(&member));
            CommandResult::Entry(entry)
        }
        Command::Len => {
            let len = keyspace.get(key).map(|set| set.read().len()).unwrap_or(0);
            CommandResult::Len(len)
        }
        Command::All => {
            let entries = keyspace.get(key).map(|set| set.read().all()).unwrap_or_default();
            CommandResult::Entries(entries)
        }
        Command::Clear => {
            if let Some(set) = keyspace.get(key) {
                set.write().clear();
            }
            CommandResult::Unit
        }
    }
}
