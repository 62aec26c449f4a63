//! Cluster-preserving redistribution into fixed-size sections.
//!
//! Independent of how labels were produced: any labelling yields sizes
//! within one of each other and a complete assignment.

use std::collections::BTreeMap;

/// Target head count per section: `total / sections`, with the first
/// `total % sections` sections taking one extra student.
pub fn target_sizes(total: usize, sections: u32) -> Vec<usize> {
    let n = sections as usize;
    if n == 0 {
        return Vec::new();
    }
    let (base, rem) = (total / n, total % n);
    (0..n).map(|i| base + usize::from(i < rem)).collect()
}

/// Assigns labelled students to sections `1..=sections`.
///
/// With no more students than sections, students go one per section in
/// input order. Otherwise students are ordered by (cluster, id) and poured
/// into sections up to their target sizes, keeping clusters contiguous.
pub fn balance_into_sections(labelled: &[(String, usize)], sections: u32) -> BTreeMap<String, u32> {
    if sections == 0 {
        return BTreeMap::new();
    }

    if labelled.len() <= sections as usize {
        return labelled
            .iter()
            .enumerate()
            .map(|(i, (student, _))| (student.clone(), (i as u32 % sections) + 1))
            .collect();
    }

    let mut ordered: Vec<&(String, usize)> = labelled.iter().collect();
    ordered.sort_by(|a, b| (a.1, &a.0).cmp(&(b.1, &b.0)));

    let mut assignment = BTreeMap::new();
    let mut students = ordered.into_iter();
    for (i, size) in target_sizes(labelled.len(), sections).into_iter().enumerate() {
        for (student, _) in students.by_ref().take(size) {
            assignment.insert(student.clone(), i as u32 + 1);
        }
    }
    assignment
}
