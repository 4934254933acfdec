//! Partial similarity scoring between two strings.
//!
//! [`partial_ratio`] aligns the shorter string against windows of the longer
//! one and reports the best window's similarity as an integer in `0..=100`.
//! Windows are chosen from the matching blocks of a [`SequenceMatcher`]: for
//! each block that matches `short[i..]` against `long[j..]`, the window is
//! `long[max(0, j - i)..][..len(short)]`.
//!
//! The matcher finds the longest common contiguous run, then recurses on the
//! pieces to its left and right, which yields the set of matching blocks a
//! common-subsequence alignment is built from.
//!
//! When several windows reach the best ratio, the first one in block order
//! is kept. Only the ratio is returned, so the choice is not observable.

use std::collections::{HashMap, HashSet};

/// Sequences at least this long get the popular-element heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Window ratios above this count as a perfect match.
const PERFECT_RATIO: f64 = 0.995;

/// A run of `size` equal elements at `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    /// Start in the first sequence
    pub a_start: usize,
    /// Start in the second sequence
    pub b_start: usize,
    /// Length of the run
    pub size: usize,
}

/// Longest-matching-block sequence comparison over characters.
///
/// Elements of `b` that occur more than `1 + len(b) / 100` times are
/// "popular" when `b` has at least 200 elements; popular elements never
/// seed a match but runs may still extend across them.
#[derive(Debug)]
pub struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    /// Prepare a comparison of `a` against `b`.
    #[must_use]
    pub fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > limit)
                .map(|(&c, _)| c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest matching run within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long runs the one starting earliest in `a`, then
    /// earliest in `b`, wins.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the run ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Extend across elements the index skipped (popular ones).
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All matching blocks in ascending order, adjacent blocks merged, with a
    /// zero-size sentinel block at `(len(a), len(b))` last.
    #[must_use]
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort_unstable();

        let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(MatchBlock {
            a_start: la,
            b_start: lb,
            size: 0,
        });
        merged
    }

    /// Similarity in `[0, 1]`: twice the matched element count over the
    /// combined length. Two empty sequences have ratio 1.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

/// Partial similarity of two strings as an integer in `0..=100`.
///
/// Identical strings (including two empty ones) score 100; an empty string
/// against a non-empty one scores 0. Otherwise the shorter string (the first
/// argument on equal length) is compared with the best-matching window of
/// the longer one.
///
/// # Example
///
/// ```
/// use datadupe::duplicates::partial_ratio;
///
/// assert_eq!(partial_ratio("apple", "apple pie"), 100);
/// assert_eq!(partial_ratio("abc", "xyz"), 0);
/// assert_eq!(partial_ratio("", ""), 100);
/// ```
#[must_use]
pub fn partial_ratio(s1: &str, s2: &str) -> u8 {
    if s1 == s2 {
        return 100;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }

    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    let blocks = SequenceMatcher::new(short, long).matching_blocks();
    let mut best = 0.0_f64;
    for block in blocks {
        let start = block.b_start.saturating_sub(block.a_start);
        let end = (start + short.len()).min(long.len());
        let window = &long[start..end];

        let r = SequenceMatcher::new(short, window).ratio();
        if r > PERFECT_RATIO {
            return 100;
        }
        if r > best {
            best = r;
        }
    }

    // Round half to even, clamped into range.
    (100.0 * best).round_ties_even().clamp(0.0, 100.0) as u8
}
