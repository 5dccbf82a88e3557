// Session state held by the label desk: loaded reference data and the
// current form selection.

use crate::domain::{Exam, PaperToggles, School, Subject};

/// Reference data loaded for the session
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(super) schools: Vec<School>,
    pub(super) exams: Vec<Exam>,
    /// Subjects of the selected exam only
    pub(super) subjects: Vec<Subject>,
}

impl Catalog {
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Case-insensitive substring match on school name
    pub fn search_schools(&self, query: &str) -> Vec<&School> {
        let needle = query.to_lowercase();
        self.schools
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub(super) fn insert_school_sorted(&mut self, school: School) {
        self.schools.push(school);
        self.schools.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub(super) fn insert_exam_sorted(&mut self, exam: Exam) {
        self.exams.push(exam);
        self.exams.sort_by_key(|e| e.id);
    }

    pub(super) fn insert_subject_sorted(&mut self, subject: Subject) {
        self.subjects.push(subject);
        self.subjects.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

/// Current manual-entry form
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub school: Option<School>,
    pub exam: Option<Exam>,
    pub subject: Option<Subject>,
    /// Raw text of the student count field
    pub student_count: String,
    pub papers: PaperToggles,
}

impl Selection {
    /// Fields still missing for a manual add, in form order
    pub fn missing_for_add(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.school.is_none() {
            missing.push("school");
        }
        if self.exam.is_none() {
            missing.push("exam");
        }
        if self.subject.is_none() {
            missing.push("subject");
        }
        if self.student_count.trim().is_empty() {
            missing.push("count");
        }
        missing
    }

    /// Reset after a successful manual add (school and exam stay)
    pub(super) fn reset_entry(&mut self) {
        self.subject = None;
        self.student_count.clear();
        self.papers = PaperToggles::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(id: i64, name: &str) -> School {
        School {
            id,
            name: name.to_string(),
            region: "CENTRE".to_string(),
            division: "MFOUNDI".to_string(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog {
            schools: vec![
                school(1, "GTHS EKOUNOU"),
                school(2, "LYCEE TECHNIQUE NKOLBISSON"),
            ],
            ..Default::default()
        };

        let hits = catalog.search_schools("ekou");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(catalog.search_schools("").len(), 2);
    }

    #[test]
    fn test_insert_school_keeps_name_order() {
        let mut catalog = Catalog::default();
        catalog.insert_school_sorted(school(1, "ZED"));
        catalog.insert_school_sorted(school(2, "ALPHA"));
        let names: Vec<&str> = catalog.schools().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ALPHA", "ZED"]);
    }

    #[test]
    fn test_missing_for_add_reports_all_fields() {
        let selection = Selection {
            student_count: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            selection.missing_for_add(),
            vec!["school", "exam", "subject", "count"]
        );
    }
}
