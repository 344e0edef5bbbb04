//! Order-statistics index over (score, player id).
//!
//! Entries live in a treap: a binary search tree ordered by [`RankKey`] that
//! is kept balanced (in expectation) by random heap priorities. Every node
//! also stores the size of its subtree, so the number of entries ranked ahead
//! of a key is found with a single root-to-leaf descent:
//!
//! ```text
//!                 (900, #4) size=5
//!                /                \
//!     (950, #2) size=2        (500, #1) size=2
//!               \                 /
//!          (900, #3) size=1   (700, #9) size=1
//! ```
//!
//! Nodes are kept in an arena (`Vec`) and reused through a free list.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{cmp::Ordering, collections::HashMap};

use podium_types::common::{PlayerId, Rank, RankedPlayer, Score};

const NIL: usize = usize::MAX;

/// Leaderboard ordering: higher scores first, then lower player ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RankKey {
    score: Score,
    player_id: PlayerId,
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.player_id.cmp(&other.player_id))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
struct Node {
    key: RankKey,
    priority: u64,
    left: usize,
    right: usize,
    size: usize,
}

/// Ranks players by score with O(log n) expected updates and rank lookups.
#[derive(Debug, Clone)]
pub struct RankIndex {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: usize,
    // Current score of every indexed player, to rebuild its key.
    scores: HashMap<PlayerId, Score>,
    rng: StdRng,
}

impl Default for RankIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl RankIndex {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Builds an index with deterministic node priorities.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NIL,
            scores: HashMap::new(),
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn score_of(&self, player_id: PlayerId) -> Option<Score> {
        self.scores.get(&player_id).copied()
    }

    /// Moves a player to `score`, inserting it if it isn't indexed yet.
    pub fn upsert(&mut self, player_id: PlayerId, score: Score) {
        match self.scores.insert(player_id, score) {
            Some(previous) if previous == score => return,
            Some(previous) => {
                let stale = RankKey {
                    score: previous,
                    player_id,
                };
                self.root = self.remove_key(self.root, &stale);
            }
            None => {}
        }

        let key = RankKey { score, player_id };
        let node = self.alloc(key);
        let (left, right) = self.split(self.root, &key);
        let left = self.merge(left, node);
        self.root = self.merge(left, right);
    }

    /// Drops a player from the index, returning its last score.
    pub fn remove(&mut self, player_id: PlayerId) -> Option<Score> {
        let score = self.scores.remove(&player_id)?;
        self.root = self.remove_key(self.root, &RankKey { score, player_id });
        Some(score)
    }

    /// 1-based rank of a player, or `None` if it isn't indexed.
    pub fn rank_of(&self, player_id: PlayerId) -> Option<Rank> {
        let score = self.score_of(player_id)?;
        let key = RankKey { score, player_id };

        let mut ahead = 0;
        let mut t = self.root;
        while t != NIL {
            let node = &self.nodes[t];
            match key.cmp(&node.key) {
                Ordering::Less => t = node.left,
                Ordering::Greater => {
                    ahead += self.size(node.left) + 1;
                    t = node.right;
                }
                Ordering::Equal => {
                    ahead += self.size(node.left);
                    return Some(ahead as Rank + 1);
                }
            }
        }

        // The score map and the tree disagree.
        None
    }

    /// The `k` best ranked players, rank 1 first.
    pub fn top_k(&self, k: usize) -> Vec<RankedPlayer> {
        self.iter().take(k).collect()
    }

    /// All indexed players in rank order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            index: self,
            stack: Vec::new(),
            rank: 0,
        };
        iter.push_left(self.root);
        iter
    }

    fn size(&self, t: usize) -> usize {
        if t == NIL { 0 } else { self.nodes[t].size }
    }

    fn update(&mut self, t: usize) {
        let size = self.size(self.nodes[t].left) + self.size(self.nodes[t].right) + 1;
        self.nodes[t].size = size;
    }

    fn alloc(&mut self, key: RankKey) -> usize {
        let node = Node {
            key,
            priority: self.rng.r#gen(),
            left: NIL,
            right: NIL,
            size: 1,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Splits `t` into keys ordered before `key` and the rest.
    fn split(&mut self, t: usize, key: &RankKey) -> (usize, usize) {
        if t == NIL {
            return (NIL, NIL);
        }

        if self.nodes[t].key < *key {
            let right = self.nodes[t].right;
            let (left, rest) = self.split(right, key);
            self.nodes[t].right = left;
            self.update(t);
            (t, rest)
        } else {
            let left = self.nodes[t].left;
            let (rest, right) = self.split(left, key);
            self.nodes[t].left = right;
            self.update(t);
            (rest, t)
        }
    }

    /// Joins two treaps where every key of `l` is ordered before `r`.
    fn merge(&mut self, l: usize, r: usize) -> usize {
        if l == NIL {
            return r;
        }
        if r == NIL {
            return l;
        }

        if self.nodes[l].priority > self.nodes[r].priority {
            let right = self.nodes[l].right;
            let merged = self.merge(right, r);
            self.nodes[l].right = merged;
            self.update(l);
            l
        } else {
            let left = self.nodes[r].left;
            let merged = self.merge(l, left);
            self.nodes[r].left = merged;
            self.update(r);
            r
        }
    }

    fn remove_key(&mut self, t: usize, key: &RankKey) -> usize {
        if t == NIL {
            return NIL;
        }

        match key.cmp(&self.nodes[t].key) {
            Ordering::Equal => {
                let (left, right) = (self.nodes[t].left, self.nodes[t].right);
                self.free.push(t);
                self.merge(left, right)
            }
            Ordering::Less => {
                let left = self.nodes[t].left;
                let left = self.remove_key(left, key);
                self.nodes[t].left = left;
                self.update(t);
                t
            }
            Ordering::Greater => {
                let right = self.nodes[t].right;
                let right = self.remove_key(right, key);
                self.nodes[t].right = right;
                self.update(t);
                t
            }
        }
    }
}

/// In-order walk of a [`RankIndex`].
pub struct Iter<'a> {
    index: &'a RankIndex,
    stack: Vec<usize>,
    rank: Rank,
}

impl Iter<'_> {
    fn push_left(&mut self, mut t: usize) {
        while t != NIL {
            self.stack.push(t);
            t = self.index.nodes[t].left;
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = RankedPlayer;

    fn next(&mut self) -> Option<Self::Item> {
        let t = self.stack.pop()?;
        let index = self.index;
        let node = &index.nodes[t];
        self.push_left(node.right);
        self.rank += 1;

        Some(RankedPlayer {
            player_id: node.key.player_id,
            total_score: node.key.score,
            rank: self.rank,
        })
    }
}
