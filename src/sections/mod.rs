//! Parallel section allocation.
//!
//! A two-stage pipeline for courses too large for one group:
//!
//! 1. **Cluster**: students are described by their full course lists
//!    ([`CoEnrollmentMatrix`]) and grouped with seeded k-means
//!    ([`KMeans`]). K is chosen by silhouette over a bounded sweep,
//!    evaluated on the rayon pool.
//! 2. **Balance**: clustered students are poured into exactly N sections
//!    whose sizes differ by at most one ([`balance_into_sections`]).
//!
//! The balancing guarantee holds for any labelling, so stage 2 is tested
//! on its own.
//!
//! [`expand_sections`] and [`sectioned_enrollment`] then turn allocated
//! sections into individually schedulable courses.

mod allocator;
mod balance;
mod expand;
mod kmeans;
mod matrix;
mod silhouette;

pub use allocator::{CohortClusters, SectionAllocator};
pub use balance::{balance_into_sections, target_sizes};
pub use expand::{expand_sections, sectioned_enrollment};
pub use kmeans::{Clustering, KMeans};
pub use matrix::CoEnrollmentMatrix;
pub use silhouette::silhouette_score;
