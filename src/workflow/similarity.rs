//! Sequence-matching similarity for bucket name suggestions.
//!
//! Scores follow Ratcliff/Obershelp matching: find the longest common run,
//! recurse on both sides of it, and report `2 * matched / total_len`.

use std::collections::HashMap;

/// Similarity of `a` and `b` in `0.0..=1.0`
///
/// Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_len(&a, &b) as f64 / total as f64
}

/// Up to `limit` entries of `candidates` scoring at least `cutoff` against `word`
///
/// Best match first; equal scores are ordered by name, descending.
pub fn close_matches(word: &str, candidates: &[String], limit: usize, cutoff: f64) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = candidates
        .iter()
        .map(|candidate| (ratio(candidate, word), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|(score_a, name_a), (score_b, name_b)| {
        score_b.total_cmp(score_a).then_with(|| name_b.cmp(name_a))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.clone())
        .collect()
}

fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`
///
/// Ties go to the run starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run length ending at b[j] for the previous row of a
    let mut run_at: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_at = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let previous = if j > 0 {
                    run_at.get(&(j - 1)).copied().unwrap_or(0)
                } else {
                    0
                };
                let size = previous + 1;
                next_run_at.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        run_at = next_run_at;
    }

    (best_i, best_j, best_size)
}
