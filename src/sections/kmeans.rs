//! k-means clustering with k-means++ seeding.
//!
//! # Algorithm
//! 1. Seed centroids with k-means++ (each next centroid drawn with
//!    probability proportional to squared distance from the nearest one).
//! 2. Lloyd iterations: assign points to the nearest centroid, move each
//!    centroid to its members' mean, until labels stop changing or
//!    `max_iter` is reached. An emptied cluster is re-seeded with the point
//!    farthest from its centroid, taken from a cluster of two or more.
//! 3. Repeat `n_init` times; keep the run with the lowest inertia.
//!
//! # Reference
//! Arthur & Vassilvitskii (2007), "k-means++: The Advantages of Careful
//! Seeding"

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Result of one clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster index per point, in `0..k`.
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from points to their centroids.
    pub inertia: f64,
}

impl Clustering {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }
}

/// Seeded, reproducible k-means.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    n_init: usize,
    max_iter: usize,
    seed: u64,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            n_init: 10,
            max_iter: 300,
            seed: 42,
        }
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Clusters `data` (one row per point). `k` is capped at the point count.
    pub fn fit(&self, data: &[Vec<f64>]) -> Clustering {
        let k = self.k.min(data.len());
        if k == 0 {
            return Clustering {
                labels: vec![0; data.len()],
                centroids: Vec::new(),
                inertia: 0.0,
            };
        }

        let mut best: Option<Clustering> = None;
        for run in 0..self.n_init {
            let seed = self
                .seed
                .wrapping_add(k as u64)
                .wrapping_add(run as u64);
            let mut rng = SmallRng::seed_from_u64(seed);
            let candidate = self.lloyd(data, seed_centroids(data, k, &mut rng));
            if best.as_ref().map_or(true, |b| candidate.inertia < b.inertia) {
                best = Some(candidate);
            }
        }
        // n_init >= 1, so at least one run happened.
        best.unwrap_or_else(|| self.lloyd(data, data[..k].to_vec()))
    }

    fn lloyd(&self, data: &[Vec<f64>], mut centroids: Vec<Vec<f64>>) -> Clustering {
        let k = centroids.len();
        let dims = data[0].len();
        let mut labels = vec![usize::MAX; data.len()];

        for _ in 0..self.max_iter {
            let mut changed = false;
            for (i, point) in data.iter().enumerate() {
                let nearest = nearest(point, &centroids).0;
                if labels[i] != nearest {
                    labels[i] = nearest;
                    changed = true;
                }
            }

            let mut counts = vec![0usize; k];
            for &label in &labels {
                counts[label] += 1;
            }

            for c in 0..k {
                if counts[c] > 0 {
                    continue;
                }
                // Re-seed with the worst-fitted point of a cluster that can
                // spare one.
                let far = data
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| counts[labels[*i]] > 1)
                    .map(|(i, p)| (i, squared_distance(p, &centroids[labels[i]])))
                    .fold(None, |best: Option<(usize, f64)>, x| match best {
                        Some(b) if b.1 >= x.1 => Some(b),
                        _ => Some(x),
                    });
                let Some((far, _)) = far else {
                    continue;
                };
                counts[labels[far]] -= 1;
                counts[c] += 1;
                labels[far] = c;
                changed = true;
            }

            let mut sums = vec![vec![0.0; dims]; k];
            for (point, &label) in data.iter().zip(&labels) {
                for (s, x) in sums[label].iter_mut().zip(point) {
                    *s += x;
                }
            }
            for c in (0..k).filter(|&c| counts[c] > 0) {
                let n = counts[c] as f64;
                centroids[c] = sums[c].iter().map(|s| s / n).collect();
            }

            if !changed {
                break;
            }
        }

        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(p, &l)| squared_distance(p, &centroids[l]))
            .sum();
        Clustering {
            labels,
            centroids,
            inertia,
        }
    }
}

fn seed_centroids(data: &[Vec<f64>], k: usize, rng: &mut SmallRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.random_range(0..data.len())].clone());

    while centroids.len() < k {
        let weights: Vec<f64> = data.iter().map(|p| nearest(p, &centroids).1).collect();
        let total: f64 = weights.iter().sum();
        let pick = if total <= 0.0 {
            // Every point coincides with a centroid.
            rng.random_range(0..data.len())
        } else {
            let mut target = rng.random::<f64>() * total;
            let mut pick = data.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if target < *w {
                    pick = i;
                    break;
                }
                target -= w;
            }
            pick
        };
        centroids.push(data[pick].clone());
    }
    centroids
}

/// Index of and squared distance to the nearest centroid; ties go to the
/// lower index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
