//! Section assignment model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Students of one multi-section course mapped to section numbers
/// `1..=sections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionAssignment {
    pub course_id: String,
    pub sections: u32,
    /// Student → section number.
    pub students: BTreeMap<String, u32>,
}

impl SectionAssignment {
    pub fn new(course_id: impl Into<String>, sections: u32) -> Self {
        Self {
            course_id: course_id.into(),
            sections,
            students: BTreeMap::new(),
        }
    }

    pub fn section_of(&self, student: &str) -> Option<u32> {
        self.students.get(student).copied()
    }

    /// Head count per section, index 0 = section 1.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.sections as usize];
        for &section in self.students.values() {
            if let Some(slot) = sizes.get_mut(section.saturating_sub(1) as usize) {
                *slot += 1;
            }
        }
        sizes
    }

    /// Students of one section, in id order.
    pub fn members(&self, section: u32) -> Vec<&str> {
        self.students
            .iter()
            .filter(|(_, s)| **s == section)
            .map(|(student, _)| student.as_str())
            .collect()
    }

    /// Identifier of a section as a schedulable course: `ID-A` .. `ID-Z`,
    /// then `ID-AA`, `ID-AB`, ... (bijective base 26). Section 0 is
    /// treated as section 1.
    pub fn section_course_id(course_id: &str, section: u32) -> String {
        let mut n = section.max(1);
        let mut letters = Vec::new();
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        let suffix: String = letters.iter().rev().map(|&b| b as char).collect();
        format!("{course_id}-{suffix}")
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_and_members() {
        let mut a = SectionAssignment::new("C", 3);
        a.students.insert("S1".into(), 1);
        a.students.insert("S2".into(), 1);
        a.students.insert("S3".into(), 3);
        assert_eq!(a.sizes(), vec![2, 0, 1]);
        assert_eq!(a.members(1), vec!["S1", "S2"]);
        assert_eq!(a.section_of("S3"), Some(3));
    }

    #[test]
    fn test_section_course_id() {
        assert_eq!(SectionAssignment::section_course_id("DATA201", 1), "DATA201-A");
        assert_eq!(SectionAssignment::section_course_id("DATA201", 3), "DATA201-C");
    }

    #[test]
    fn test_section_course_id_past_z() {
        let cases = [
            (26, "Z"),
            (27, "AA"),
            (28, "AB"),
            (52, "AZ"),
            (53, "BA"),
            (702, "ZZ"),
            (703, "AAA"),
        ];
        for (section, suffix) in cases {
            assert_eq!(
                SectionAssignment::section_course_id("C", section),
                format!("C-{suffix}"),
                "section {section}"
            );
        }
    }
}
