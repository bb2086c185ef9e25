// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Postroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Postroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pairing primitives over dense cost matrices.
//!
//! Undirected balancing pairs odd vertices with a minimum-weight perfect matching; directed
//! balancing assigns surplus units to deficit units with the Hungarian method.

use tracing::warn;

/// Largest vertex count matched exactly (bitmask dynamic programming over `2^n` states).
pub const EXACT_MATCHING_LIMIT: usize = 20;

/// Minimum-weight perfect matching on a symmetric cost matrix of even size.
///
/// Pairs come back as `(i, j)` with `i < j`, ordered by `i`. Above
/// [`EXACT_MATCHING_LIMIT`] vertices the result is a greedy matching improved by 2-opt swaps
/// and is no longer guaranteed minimal.
pub fn min_weight_perfect_matching(cost: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let n = cost.len();
    if n <= EXACT_MATCHING_LIMIT {
        return exact_matching(cost);
    }

    warn!(
        vertices = n,
        limit = EXACT_MATCHING_LIMIT,
        "too many odd vertices for exact matching; falling back to greedy pairing"
    );
    let mut pairs = greedy_matching(cost);
    improve_pairs(cost, &mut pairs);
    pairs.sort_unstable();
    pairs
}

fn exact_matching(cost: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let n = cost.len();
    if n == 0 || n % 2 == 1 {
        return Vec::new();
    }

    let full: usize = (1usize << n) - 1;
    // remaining[mask]: cheapest way to pair every vertex not in `mask`.
    let mut remaining = vec![f64::INFINITY; full + 1];
    let mut partner = vec![u8::MAX; full + 1];
    remaining[full] = 0.0;

    for mask in (0..full).rev() {
        if (n - mask.count_ones() as usize) % 2 == 1 {
            continue;
        }
        let i = (!mask).trailing_zeros() as usize;
        let mut best: Option<(f64, usize)> = None;
        for j in (i + 1)..n {
            if mask & (1 << j) != 0 {
                continue;
            }
            let total = cost[i][j] + remaining[mask | (1 << i) | (1 << j)];
            if best.map_or(true, |(known, _)| total < known) {
                best = Some((total, j));
            }
        }
        if let Some((total, j)) = best {
            remaining[mask] = total;
            partner[mask] = j as u8;
        }
    }

    let mut pairs = Vec::with_capacity(n / 2);
    let mut mask = 0usize;
    while mask != full {
        let i = (!mask).trailing_zeros() as usize;
        let j = usize::from(partner[mask]);
        if j >= n {
            break;
        }
        pairs.push((i, j));
        mask |= (1 << i) | (1 << j);
    }
    pairs
}

/// Repeatedly pairs the cheapest two unmatched vertices. Ties go to the lower indices.
pub fn greedy_matching(cost: &[Vec<f64>]) -> Vec<(usize, usize)> {
    let n = cost.len();
    let mut candidates: Vec<(f64, usize, usize)> = Vec::with_capacity(n * n / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            candidates.push((cost[i][j], i, j));
        }
    }
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut matched = vec![false; n];
    let mut pairs = Vec::with_capacity(n / 2);
    for (_, i, j) in candidates {
        if matched[i] || matched[j] {
            continue;
        }
        matched[i] = true;
        matched[j] = true;
        pairs.push((i, j));
    }
    pairs.sort_unstable();
    pairs
}

/// 2-opt over pairs of pairs until no swap lowers the total.
fn improve_pairs(cost: &[Vec<f64>], pairs: &mut [(usize, usize)]) {
    let ordered = |a: usize, b: usize| if a < b { (a, b) } else { (b, a) };
    let mut improved = true;
    while improved {
        improved = false;
        for p in 0..pairs.len() {
            for q in (p + 1)..pairs.len() {
                let (a, b) = pairs[p];
                let (c, d) = pairs[q];
                let current = cost[a][b] + cost[c][d];
                let crossed = cost[a][c] + cost[b][d];
                let swapped = cost[a][d] + cost[b][c];
                if crossed < current && crossed <= swapped {
                    pairs[p] = ordered(a, c);
                    pairs[q] = ordered(b, d);
                    improved = true;
                } else if swapped < current {
                    pairs[p] = ordered(a, d);
                    pairs[q] = ordered(b, c);
                    improved = true;
                }
            }
        }
    }
}

/// Minimum-cost assignment of rows to columns (Hungarian method, `O(n^3)`).
///
/// `cost` must be square with finite entries. Returns the column assigned to each row.
pub fn assignment(cost: &[Vec<f64>]) -> Vec<usize> {
    let n = cost.len();
    if n == 0 {
        return Vec::new();
    }

    // 1-based potentials; column 0 is the virtual root of each augmenting search.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut j0 = 0usize;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let slack = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }
            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assigned = vec![0usize; n];
    for column in 1..=n {
        if owner[column] != 0 {
            assigned[owner[column] - 1] = column - 1;
        }
    }
    assigned
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    use super::{assignment, exact_matching, greedy_matching, improve_pairs, min_weight_perfect_matching};

    fn random_symmetric(rng: &mut StdRng, n: usize) -> Vec<Vec<f64>> {
        let mut cost = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let value = f64::from(rng.gen_range(1u32..50));
                cost[i][j] = value;
                cost[j][i] = value;
            }
        }
        cost
    }

    fn pairing_cost(cost: &[Vec<f64>], pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(i, j)| cost[i][j]).sum()
    }

    fn brute_force_matching(cost: &[Vec<f64>], free: &mut Vec<usize>) -> f64 {
        if free.is_empty() {
            return 0.0;
        }
        let i = free.remove(0);
        let mut best = f64::INFINITY;
        for k in 0..free.len() {
            let j = free.remove(k);
            best = best.min(cost[i][j] + brute_force_matching(cost, free));
            free.insert(k, j);
        }
        free.insert(0, i);
        best
    }

    fn brute_force_assignment(cost: &[Vec<f64>]) -> f64 {
        fn permute(cost: &[Vec<f64>], row: usize, taken: &mut Vec<bool>) -> f64 {
            if row == cost.len() {
                return 0.0;
            }
            let mut best = f64::INFINITY;
            for column in 0..cost.len() {
                if taken[column] {
                    continue;
                }
                taken[column] = true;
                best = best.min(cost[row][column] + permute(cost, row + 1, taken));
                taken[column] = false;
            }
            best
        }
        permute(cost, 0, &mut vec![false; cost.len()])
    }

    fn is_perfect(n: usize, pairs: &[(usize, usize)]) -> bool {
        let mut seen = vec![false; n];
        for &(i, j) in pairs {
            if i >= j || seen[i] || seen[j] {
                return false;
            }
            seen[i] = true;
            seen[j] = true;
        }
        seen.into_iter().all(|hit| hit)
    }

    #[test]
    fn empty_and_single_pair() {
        assert!(min_weight_perfect_matching(&[]).is_empty());
        let cost = vec![vec![0.0, 3.0], vec![3.0, 0.0]];
        assert_eq!(min_weight_perfect_matching(&cost), vec![(0, 1)]);
    }

    #[test]
    fn avoids_the_greedy_trap() {
        // Greedy takes 1-2 (cost 1) and is left with 0-3 (cost 10); optimal is 0-1 + 2-3.
        let cost = vec![
            vec![0.0, 2.0, 9.0, 10.0],
            vec![2.0, 0.0, 1.0, 9.0],
            vec![9.0, 1.0, 0.0, 2.0],
            vec![10.0, 9.0, 2.0, 0.0],
        ];
        let greedy = greedy_matching(&cost);
        assert_eq!(pairing_cost(&cost, &greedy), 11.0);
        let exact = min_weight_perfect_matching(&cost);
        assert_eq!(exact, vec![(0, 1), (2, 3)]);
        assert_eq!(pairing_cost(&cost, &exact), 4.0);

        let mut improved = greedy;
        improve_pairs(&cost, &mut improved);
        assert_eq!(pairing_cost(&cost, &improved), 4.0);
    }

    #[rstest]
    #[case(4)]
    #[case(6)]
    #[case(8)]
    fn exact_matching_is_minimal(#[case] n: usize) {
        let mut rng = StdRng::seed_from_u64(n as u64);
        for _ in 0..10 {
            let cost = random_symmetric(&mut rng, n);
            let pairs = exact_matching(&cost);
            assert!(is_perfect(n, &pairs));
            let expected = brute_force_matching(&cost, &mut (0..n).collect());
            assert_eq!(pairing_cost(&cost, &pairs), expected);
        }
    }

    #[test]
    fn large_inputs_fall_back_to_a_perfect_matching() {
        let mut rng = StdRng::seed_from_u64(7);
        let cost = random_symmetric(&mut rng, 24);
        let pairs = min_weight_perfect_matching(&cost);
        assert!(is_perfect(24, &pairs));
        assert!(pairing_cost(&cost, &pairs) <= pairing_cost(&cost, &greedy_matching(&cost)));
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn assignment_is_minimal(#[case] n: usize) {
        let mut rng = StdRng::seed_from_u64(100 + n as u64);
        for _ in 0..10 {
            let cost: Vec<Vec<f64>> = (0..n)
                .map(|_| (0..n).map(|_| f64::from(rng.gen_range(0u32..30))).collect())
                .collect();
            let assigned = assignment(&cost);
            let mut columns = assigned.clone();
            columns.sort_unstable();
            assert_eq!(columns, (0..n).collect::<Vec<_>>());
            let total: f64 = assigned.iter().enumerate().map(|(row, &col)| cost[row][col]).sum();
            assert_eq!(total, brute_force_assignment(&cost));
        }
    }
}
