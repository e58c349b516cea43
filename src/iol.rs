//! The Indexed Ordered List: a skip-list spine augmented with per-level span
//! counters, a member index, and a level-0 back-chain.
//!
//! Grounded on the teacher's `SkipList` (`examples/nerdsane-redis-rust/src/redis/data/skiplist.rs`):
//! same slab-of-`Option<Node>` storage with a free list so deletions don't
//! shift indices, the same top-down update/rank traversal shape. Departs from
//! it in two ways the wider engine requires: scores are exact rationals
//! rather than `f64`, and the member index lives on this struct directly
//! rather than in an outer wrapper, since spec's "IOL state" names
//! `memberIndex` as one of this type's own fields.

use std::cmp::Ordering;

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::config::IolConfig;
use crate::member::Member;
use crate::rng::{LevelRng, ThreadLevelRng};
use crate::score::Score;

#[derive(Debug)]
struct Node {
    score: Score,
    member: Member,
    forward: Vec<Option<usize>>,
    span: Vec<usize>,
    backward: Option<usize>,
}

/// The sentinel head's per-level state. The head owns no score or member.
#[derive(Debug, Clone, Copy)]
struct HeadLevel {
    forward: Option<usize>,
    span: usize,
}

/// An in-memory sorted collection of (member, score) pairs with O(log N)
/// rank and score queries.
///
/// This type is not internally synchronized: callers needing concurrent
/// access wrap it in a lock (see [`crate::keyspace::Keyspace`]).
pub struct IndexedOrderedList {
    config: IolConfig,
    rng: Box<dyn LevelRng>,
    head: Vec<HeadLevel>,
    nodes: Vec<Option<Node>>,
    free_slots: Vec<usize>,
    tail: Option<usize>,
    length: usize,
    current_level: usize,
    member_index: AHashMap<Member, usize>,
}

impl IndexedOrderedList {
    /// A new, empty list using the default configuration and thread-local randomness.
    pub fn new() -> Self {
        Self::with_config(IolConfig::default())
    }

    /// A new, empty list using the given configuration and thread-local randomness.
    pub fn with_config(config: IolConfig) -> Self {
        Self::with_rng(config, Box::new(ThreadLevelRng::new()))
    }

    /// A new, empty list with an injectable level generator, for deterministic tests.
    pub fn with_rng(config: IolConfig, rng: Box<dyn LevelRng>) -> Self {
        let head = vec![
            HeadLevel {
                forward: None,
                span: 0,
            };
            config.max_level
        ];
        IndexedOrderedList {
            config,
            rng,
            head,
            nodes: Vec::new(),
            free_slots: Vec::new(),
            tail: None,
            length: 0,
            current_level: 1,
            member_index: AHashMap::new(),
        }
    }

    // --- uniform head-or-node accessors -----------------------------------

    fn forward_at(&self, x: Option<usize>, level: usize) -> Option<usize> {
        match x {
            None => self.head[level].forward,
            Some(idx) => self.nodes[idx].as_ref().expect("dangling node index").forward[level],
        }
    }

    fn span_at(&self, x: Option<usize>, level: usize) -> usize {
        match x {
            None => self.head[level].span,
            Some(idx) => self.nodes[idx].as_ref().expect("dangling node index").span[level],
        }
    }

    fn set_forward_at(&mut self, x: Option<usize>, level: usize, value: Option<usize>) {
        match x {
            None => self.head[level].forward = value,
            Some(idx) => {
                self.nodes[idx].as_mut().expect("dangling node index").forward[level] = value
            }
        }
    }

    fn set_span_at(&mut self, x: Option<usize>, level: usize, value: usize) {
        match x {
            None => self.head[level].span = value,
            Some(idx) => self.nodes[idx].as_mut().expect("dangling node index").span[level] = value,
        }
    }

    fn node(&self, idx: usize) -> &Node {
        self.nodes[idx].as_ref().expect("dangling node index")
    }

    fn compare_entry(score1: &Score, member1: &Member, score2: &Score, member2: &Member) -> Ordering {
        score1.cmp(score2).then_with(|| member1.cmp(member2))
    }

    fn alloc_node(&mut self, member: Member, score: Score, level: usize) -> usize {
        let node = Node {
            score,
            member,
            forward: vec![None; level],
            span: vec![0; level],
            backward: None,
        };
        if let Some(idx) = self.free_slots.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Some(node));
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.nodes[idx] = None;
        self.free_slots.push(idx);
    }

    /// §4.1.1: smallest L >= 1 such that L = max_level or a draw is >= p.
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.config.max_level && self.rng.gen_bool(self.config.p) {
            level += 1;
        }
        level
    }

    // --- §4.1.2 Insert ------------------------------------------------------

    /// Insert `member` with `score`, or re-score it if already present (§4.1.2).
    pub fn insert(&mut self, member: Member, score: Score) {
        if let Some(&existing_idx) = self.member_index.get(&member) {
            if self.node(existing_idx).score == score {
                trace!("insert: no-op, score unchanged");
                return;
            }
            self.remove_by_node(existing_idx);
        }

        let max_level = self.config.max_level;
        let mut update: Vec<Option<usize>> = vec![None; max_level];
        let mut rank: Vec<usize> = vec![0; max_level];

        let mut x: Option<usize> = None;
        for i in (0..self.current_level).rev() {
            rank[i] = if i == self.current_level - 1 { 0 } else { rank[i + 1] };
            loop {
                if let Some(next_idx) = self.forward_at(x, i) {
                    let next = self.node(next_idx);
                    if Self::compare_entry(&next.score, &next.member, &score, &member) == Ordering::Less {
                        rank[i] += self.span_at(x, i);
                        x = Some(next_idx);
                        continue;
                    }
                }
                break;
            }
            update[i] = x;
        }

        let level = self.random_level();
        if level > self.current_level {
            for i in self.current_level..level {
                update[i] = None;
                rank[i] = 0;
                self.head[i].span = self.length;
            }
            debug!(new_level = level, "insert: promoting current_level");
            self.current_level = level;
        }

        let new_idx = self.alloc_node(member.clone(), score, level);

        for i in 0..level {
            let update_forward = self.forward_at(update[i], i);
            let update_span = self.span_at(update[i], i);
            {
                let new_node = self.nodes[new_idx].as_mut().expect("just allocated");
                new_node.forward[i] = update_forward;
                new_node.span[i] = update_span - (rank[0] - rank[i]);
            }
            self.set_forward_at(update[i], i, Some(new_idx));
            self.set_span_at(update[i], i, (rank[0] - rank[i]) + 1);
        }

        for i in level..self.current_level {
            let s = self.span_at(update[i], i);
            self.set_span_at(update[i], i, s + 1);
        }

        self.nodes[new_idx].as_mut().expect("just allocated").backward = update[0];

        let new_forward0 = self.node(new_idx).forward[0];
        match new_forward0 {
            Some(fwd_idx) => self.nodes[fwd_idx].as_mut().expect("dangling node index").backward = Some(new_idx),
            None => self.tail = Some(new_idx),
        }

        self.length += 1;
        self.member_index.insert(member, new_idx);
        trace!(level, "insert: node linked");
    }

    // --- §4.1.3 Remove-by-Node ----------------------------------------------

    fn remove_by_node(&mut self, idx: usize) {
        let target_score = self.node(idx).score.clone();
        let target_member = self.node(idx).member.clone();

        let mut update: Vec<Option<usize>> = vec![None; self.config.max_level];
        let mut x: Option<usize> = None;
        for i in (0..self.current_level).rev() {
            loop {
                if let Some(next_idx) = self.forward_at(x, i) {
                    let next = self.node(next_idx);
                    if Self::compare_entry(&next.score, &next.member, &target_score, &target_member)
                        == Ordering::Less
                    {
                        x = Some(next_idx);
                        continue;
                    }
                }
                break;
            }
            update[i] = x;
        }

        for i in 0..self.current_level {
            if self.forward_at(update[i], i) == Some(idx) {
                let idx_span = self.node(idx).span[i];
                let idx_forward = self.node(idx).forward[i];
                let update_span = self.span_at(update[i], i);
                self.set_span_at(update[i], i, update_span + idx_span - 1);
                self.set_forward_at(update[i], i, idx_forward);
            } else {
                let s = self.span_at(update[i], i);
                self.set_span_at(update[i], i, s - 1);
            }
        }

        let idx_forward0 = self.node(idx).forward[0];
        let idx_backward = self.node(idx).backward;
        match idx_forward0 {
            Some(fwd0) => self.nodes[fwd0].as_mut().expect("dangling node index").backward = idx_backward,
            None => self.tail = idx_backward,
        }

        while self.current_level > 1 && self.head[self.current_level - 1].forward.is_none() {
            self.current_level -= 1;
        }

        self.member_index.remove(&target_member);
        self.free_node(idx);
        self.length -= 1;
        trace!("remove_by_node: node unlinked");
    }

    // --- §4.1.4 Delete --------------------------------------------------------

    /// Remove `member` only if its stored score equals `score` (§4.1.4).
    pub fn delete(&mut self, member: &Member, score: &Score) -> bool {
        match self.member_index.get(member) {
            Some(&idx) if &self.node(idx).score == score => {
                self.remove_by_node(idx);
                true
            }
            _ => false,
        }
    }

    /// Remove `member` regardless of its current score.
    pub fn delete_by_member(&mut self, member: &Member) -> bool {
        match self.member_index.get(member).copied() {
            Some(idx) => {
                self.remove_by_node(idx);
                true
            }
            None => false,
        }
    }

    // --- §4.1.5 GetScore --------------------------------------------------------

    pub fn get_score(&self, member: &Member) -> Option<Score> {
        self.member_index.get(member).map(|&idx| self.node(idx).score.clone())
    }

    // --- §4.1.6 GetRank -----------------------------------------------------

    /// 1-based rank of `(member, score)`, or 0 if not found (§4.1.6).
    pub fn get_rank(&self, member: &Member, score: &Score) -> usize {
        let mut rank = 0usize;
        let mut x: Option<usize> = None;
        for i in (0..self.current_level).rev() {
            loop {
                if let Some(next_idx) = self.forward_at(x, i) {
                    let next = self.node(next_idx);
                    if Self::compare_entry(&next.score, &next.member, score, member) != Ordering::Greater {
                        rank += self.span_at(x, i);
                        x = Some(next_idx);
                        continue;
                    }
                }
                break;
            }
        }
        match x {
            Some(idx) if &self.node(idx).member == member => rank,
            _ => 0,
        }
    }

    // --- §4.1.7 GetByRank ---------------------------------------------------

    fn locate_rank(&self, rank: usize) -> Option<usize> {
        let mut traversed = 0usize;
        let mut x: Option<usize> = None;
        for i in (0..self.current_level).rev() {
            loop {
                if self.forward_at(x, i).is_some() {
                    let span = self.span_at(x, i);
                    if traversed + span <= rank {
                        traversed += span;
                        x = self.forward_at(x, i);
                        continue;
                    }
                }
                break;
            }
        }
        x
    }

    pub fn get_by_rank(&self, rank: usize) -> Option<(Member, Score)> {
        if rank < 1 || rank > self.length {
            return None;
        }
        self.locate_rank(rank)
            .map(|idx| (self.node(idx).member.clone(), self.node(idx).score.clone()))
    }

    // --- §4.1.8 Range ---------------------------------------------------------

    fn clamp_rank_bounds(&self, start: i64, stop: i64) -> Option<(usize, usize)> {
        if self.length == 0 {
            return None;
        }
        let start = start.max(1) as usize;
        let stop = if stop < 0 { 0 } else { (stop as usize).min(self.length) };
        if start > stop {
            None
        } else {
            Some((start, stop))
        }
    }

    fn collect_rank_range(&self, start: i64, stop: i64, reverse: bool) -> Vec<usize> {
        let (start, stop) = match self.clamp_rank_bounds(start, stop) {
            Some(bounds) => bounds,
            None => return Vec::new(),
        };
        let count = stop - start + 1;
        let begin_rank = if reverse { stop } else { start };

        let mut result = Vec::with_capacity(count);
        let mut current = self.locate_rank(begin_rank);
        for _ in 0..count {
            let idx = match current {
                Some(idx) => idx,
                None => break,
            };
            result.push(idx);
            current = if reverse { self.node(idx).backward } else { self.node(idx).forward[0] };
        }
        result
    }

    /// Entries at ranks `[start, stop]` (1-based, inclusive), ascending unless `reverse` (§4.1.8).
    pub fn range(&self, start: i64, stop: i64, reverse: bool) -> Vec<(Member, Score)> {
        self.collect_rank_range(start, stop, reverse)
            .into_iter()
            .map(|idx| (self.node(idx).member.clone(), self.node(idx).score.clone()))
            .collect()
    }

    // --- §4.1.9 RangeByScore ----------------------------------------------------

    fn locate_first_at_least(&self, min: &Score) -> Option<usize> {
        let mut x: Option<usize> = None;
        for i in (0..self.current_level).rev() {
            loop {
                if let Some(next_idx) = self.forward_at(x, i) {
                    if &self.node(next_idx).score < min {
                        x = Some(next_idx);
                        continue;
                    }
                }
                break;
            }
        }
        self.forward_at(x, 0)
    }

    fn collect_score_range(&self, min: &Score, max: &Score, reverse: bool) -> Vec<usize> {
        if min > max {
            return Vec::new();
        }
        let mut result = Vec::new();
        if !reverse {
            let mut current = self.locate_first_at_least(min);
            while let Some(idx) = current {
                let node = self.node(idx);
                if &node.score > max {
                    break;
                }
                result.push(idx);
                current = node.forward[0];
            }
        } else {
            let mut current = self.tail;
            while let Some(idx) = current {
                if &self.node(idx).score > max {
                    current = self.node(idx).backward;
                } else {
                    break;
                }
            }
            while let Some(idx) = current {
                let node = self.node(idx);
                if &node.score < min {
                    break;
                }
                result.push(idx);
                current = node.backward;
            }
        }
        result
    }

    /// Entries with score in `[min, max]` inclusive, ascending unless `reverse` (§4.1.9).
    pub fn range_by_score(&self, min: &Score, max: &Score, reverse: bool) -> Vec<(Member, Score)> {
        self.collect_score_range(min, max, reverse)
            .into_iter()
            .map(|idx| (self.node(idx).member.clone(), self.node(idx).score.clone()))
            .collect()
    }

    // --- §4.1.10 CountByScore -----------------------------------------------

    pub fn count_by_score(&self, min: &Score, max: &Score) -> usize {
        if min > max {
            return 0;
        }
        let mut count = 0usize;
        let mut current = self.locate_first_at_least(min);
        while let Some(idx) = current {
            let node = self.node(idx);
            if &node.score > max {
                break;
            }
            count += 1;
            current = node.forward[0];
        }
        count
    }

    // --- §4.1.11 RemoveByRank / RemoveByScore ------------------------------

    /// Remove every entry at ranks `[start, stop]`, returning the count removed (§4.1.11).
    pub fn remove_by_rank_range(&mut self, start: i64, stop: i64) -> usize {
        let indices = self.collect_rank_range(start, stop, false);
        let count = indices.len();
        for idx in indices {
            self.remove_by_node(idx);
        }
        count
    }

    /// Remove every entry with score in `[min, max]`, returning the count removed (§4.1.11).
    pub fn remove_by_score_range(&mut self, min: &Score, max: &Score) -> usize {
        let indices = self.collect_score_range(min, max, false);
        let count = indices.len();
        for idx in indices {
            self.remove_by_node(idx);
        }
        count
    }

    // --- §6 InRankRange ------------------------------------------------------

    /// Whether `(member, score)`'s rank falls within `[start, stop]` (1-based, clamped).
    pub fn in_rank_range(&self, member: &Member, score: &Score, start: i64, stop: i64) -> bool {
        let rank = self.get_rank(member, score);
        if rank == 0 {
            return false;
        }
        match self.clamp_rank_bounds(start, stop) {
            Some((start, stop)) => rank >= start && rank <= stop,
            None => false,
        }
    }

    // --- §4.1.12 IncrementBy -------------------------------------------------

    /// Add `delta` to `member`'s score (treating an absent member as score 0), returning the result (§4.1.12).
    pub fn increment_by(&mut self, member: Member, delta: Score) -> Score {
        let new_score = match self.member_index.get(&member) {
            Some(&idx) => self.node(idx).score.clone() + delta,
            None => delta,
        };
        self.insert(member, new_score.clone());
        new_score
    }

    // --- §4.1.13 GetPrevMember / GetNextMember -------------------------------

    pub fn get_prev_member(&self, member: &Member) -> Option<(Member, Score)> {
        let idx = *self.member_index.get(member)?;
        let prev = self.node(idx).backward?;
        Some((self.node(prev).member.clone(), self.node(prev).score.clone()))
    }

    pub fn get_next_member(&self, member: &Member) -> Option<(Member, Score)> {
        let idx = *self.member_index.get(member)?;
        let next = self.node(idx).forward[0]?;
        Some((self.node(next).member.clone(), self.node(next).score.clone()))
    }

    // --- §4.1.14 Len / All / Clear -------------------------------------------

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn all(&self) -> Vec<(Member, Score)> {
        let mut result = Vec::with_capacity(self.length);
        let mut current = self.head[0].forward;
        while let Some(idx) = current {
            let node = self.node(idx);
            result.push((node.member.clone(), node.score.clone()));
            current = node.forward[0];
        }
        result
    }

    pub fn clear(&mut self) {
        let max_level = self.config.max_level;
        self.head = vec![
            HeadLevel {
                forward: None,
                span: 0,
            };
            max_level
        ];
        self.nodes.clear();
        self.free_slots.clear();
        self.tail = None;
        self.length = 0;
        self.current_level = 1;
        self.member_index.clear();
        trace!("clear: list reset");
    }

    /// Debug-only invariant check for the span index and member index (P4, P5).
    /// Intended for use from tests and the deterministic-simulation harness.
    pub fn audit(&self) -> Result<(), String> {
        // P5: member index coherence.
        let mut walked_members = ahash::AHashSet::new();
        let mut current = self.head[0].forward;
        let mut count = 0usize;
        let mut prev_entry: Option<(&Score, &Member)> = None;
        while let Some(idx) = current {
            let node = self.node(idx);
            // P1: strictly ascending order.
            if let Some((prev_score, prev_member)) = prev_entry {
                if Self::compare_entry(prev_score, prev_member, &node.score, &node.member) != Ordering::Less {
                    return Err(format!("ordering violated at node {idx}"));
                }
            }
            prev_entry = Some((&node.score, &node.member));

            match self.member_index.get(&node.member) {
                Some(&mapped_idx) if mapped_idx == idx => {}
                _ => return Err(format!("member index incoherent for node {idx}")),
            }
            walked_members.insert(node.member.clone());
            count += 1;
            current = node.forward[0];
        }
        if count != self.length {
            return Err(format!("length mismatch: length={} walked={}", self.length, count));
        }
        if walked_members.len() != self.member_index.len() {
            return Err("member index has stale entries".to_string());
        }

        // P4: span invariant, including the head sentinel.
        for i in 0..self.current_level {
            self.audit_span_chain(None, i)?;
        }
        Ok(())
    }

    fn audit_span_chain(&self, start: Option<usize>, level: usize) -> Result<(), String> {
        let mut x = start;
        let mut position = match x {
            None => 0usize,
            Some(idx) => self.rank_of(idx),
        };
        loop {
            let span = self.span_at(x, level);
            let forward = self.forward_at(x, level);
            let expected = match forward {
                Some(next_idx) => self.rank_of(next_idx) - position,
                None => self.length - position,
            };
            if span != expected {
                return Err(format!(
                    "span mismatch at level {level}: got {span}, expected {expected} (position {position})"
                ));
            }
            match forward {
                Some(next_idx) => {
                    position = self.rank_of(next_idx);
                    x = Some(next_idx);
                }
                None => break,
            }
        }
        Ok(())
    }

    fn rank_of(&self, idx: usize) -> usize {
        let target_score = self.node(idx).score.clone();
        let target_member = self.node(idx).member.clone();
        self.get_rank(&target_member, &target_score)
    }
}

impl Default for IndexedOrderedList {
    fn default() -> Self {
        Self::new()
    }
}
