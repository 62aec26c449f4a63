//! Silhouette coefficient of a partition.
//!
//! For point `i` with mean intra-cluster distance `a(i)` and smallest mean
//! distance to another cluster `b(i)`:
//! `s(i) = (b(i) - a(i)) / max(a(i), b(i))`, and `s(i) = 0` for points in
//! singleton clusters. The score is the mean of `s(i)`, in `[-1, 1]`.
//!
//! # Reference
//! Rousseeuw (1987), "Silhouettes: a Graphical Aid to the Interpretation and
//! Validation of Cluster Analysis"

use super::kmeans::squared_distance;

/// Mean silhouette over all points, Euclidean distance.
///
/// Returns 0.0 when the partition has fewer than two clusters or every
/// point is its own cluster, where the coefficient is undefined.
pub fn silhouette_score(data: &[Vec<f64>], labels: &[usize]) -> f64 {
    let n = data.len();
    let k = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut sizes = vec![0usize; k];
    for &l in labels {
        sizes[l] += 1;
    }
    let used = sizes.iter().filter(|&&s| s > 0).count();
    if n == 0 || used < 2 || used >= n {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i];
        if sizes[own] <= 1 {
            continue;
        }
        let mut sum_by_cluster = vec![0.0; k];
        for j in 0..n {
            if i != j {
                sum_by_cluster[labels[j]] += squared_distance(&data[i], &data[j]).sqrt();
            }
        }

        let a = sum_by_cluster[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sum_by_cluster[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_separated_is_near_one() {
        let data = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
        let s = silhouette_score(&data, &[0, 0, 1, 1]);
        assert!(s > 0.95, "{s}");
    }

    #[test]
    fn test_bad_partition_is_negative() {
        let data = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
        let s = silhouette_score(&data, &[0, 1, 0, 1]);
        assert!(s < 0.0, "{s}");
    }

    #[test]
    fn test_degenerate_partitions() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert_eq!(silhouette_score(&data, &[0, 0, 0]), 0.0);
        assert_eq!(silhouette_score(&data, &[0, 1, 2]), 0.0);
        assert_eq!(silhouette_score(&[], &[]), 0.0);
    }

    #[test]
    fn test_singleton_scores_zero() {
        // The lone point contributes 0; the pair contributes ~1 each.
        let data = vec![vec![0.0], vec![0.0], vec![10.0]];
        let s = silhouette_score(&data, &[0, 0, 1]);
        assert!((s - 2.0 / 3.0).abs() < 1e-9, "{s}");
    }
}
