// Reference Data Provider Port (Interface)

use crate::domain::{Exam, ExamId, School, SchoolId, Subject};
use crate::error::Result;
use async_trait::async_trait;

/// Store of schools, exams and subjects
///
/// Failures surface as `AppError::Provider`; the core never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    /// All schools ordered by name
    async fn list_schools(&self) -> Result<Vec<School>>;

    /// All exams ordered by ID
    async fn list_exams(&self) -> Result<Vec<Exam>>;

    /// Subjects of one exam ordered by name
    async fn list_subjects(&self, exam_id: ExamId) -> Result<Vec<Subject>>;

    async fn find_school(&self, id: SchoolId) -> Result<Option<School>>;

    async fn find_exam(&self, id: ExamId) -> Result<Option<Exam>>;

    /// Insert a school (values stored as given)
    async fn insert_school(&self, name: &str, region: &str, division: &str) -> Result<School>;

    /// Insert a subject; an empty `code` is stored as absent
    async fn insert_subject(&self, name: &str, code: &str, exam_id: ExamId) -> Result<Subject>;
}

// ============================================================================
// In-memory implementation for tests
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Tables {
        schools: Vec<School>,
        exams: Vec<Exam>,
        subjects: Vec<Subject>,
        next_id: i64,
    }

    /// In-memory reference store honouring the port's ordering contract
    #[derive(Default)]
    pub struct InMemoryReferenceData {
        tables: Mutex<Tables>,
    }

    impl InMemoryReferenceData {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_exam(self, id: ExamId, name: &str, full_name: &str, max_papers: u8) -> Self {
            self.lock_tables().exams.push(Exam {
                id,
                name: name.to_string(),
                full_name: full_name.to_string(),
                max_papers,
            });
            self
        }

        pub fn with_school(self, name: &str, region: &str, division: &str) -> Self {
            {
                let mut tables = self.lock_tables();
                let id = tables.bump_id();
                tables.schools.push(School {
                    id,
                    name: name.to_string(),
                    region: region.to_string(),
                    division: division.to_string(),
                });
            }
            self
        }

        pub fn with_subject(self, exam_id: ExamId, name: &str, code: Option<&str>) -> Self {
            {
                let mut tables = self.lock_tables();
                let id = tables.bump_id();
                tables.subjects.push(Subject {
                    id,
                    name: name.to_string(),
                    code: code.map(str::to_string),
                    exam_id,
                });
            }
            self
        }

        /// Rename a school in place (simulates later reference edits)
        pub fn rename_school(&self, id: SchoolId, name: &str) {
            if let Some(school) = self.lock_tables().schools.iter_mut().find(|s| s.id == id) {
                school.name = name.to_string();
            }
        }

        fn lock_tables(&self) -> std::sync::MutexGuard<'_, Tables> {
            // A poisoned lock only happens after a panicking test; keep going.
            self.tables.lock().unwrap_or_else(|e| e.into_inner())
        }

        fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
            self.tables
                .lock()
                .map_err(|e| AppError::Provider(e.to_string()))
        }
    }

    impl Tables {
        fn bump_id(&mut self) -> i64 {
            self.next_id += 1;
            self.next_id
        }
    }

    #[async_trait]
    impl ReferenceDataProvider for InMemoryReferenceData {
        async fn list_schools(&self) -> Result<Vec<School>> {
            let mut schools = self.tables()?.schools.clone();
            schools.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(schools)
        }

        async fn list_exams(&self) -> Result<Vec<Exam>> {
            let mut exams = self.tables()?.exams.clone();
            exams.sort_by_key(|e| e.id);
            Ok(exams)
        }

        async fn list_subjects(&self, exam_id: ExamId) -> Result<Vec<Subject>> {
            let mut subjects: Vec<Subject> = self
                .tables()?
                .subjects
                .iter()
                .filter(|s| s.exam_id == exam_id)
                .cloned()
                .collect();
            subjects.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(subjects)
        }

        async fn find_school(&self, id: SchoolId) -> Result<Option<School>> {
            Ok(self.tables()?.schools.iter().find(|s| s.id == id).cloned())
        }

        async fn find_exam(&self, id: ExamId) -> Result<Option<Exam>> {
            Ok(self.tables()?.exams.iter().find(|e| e.id == id).cloned())
        }

        async fn insert_school(&self, name: &str, region: &str, division: &str) -> Result<School> {
            let mut tables = self.tables()?;
            let school = School {
                id: tables.bump_id(),
                name: name.to_string(),
                region: region.to_string(),
                division: division.to_string(),
            };
            tables.schools.push(school.clone());
            Ok(school)
        }

        async fn insert_subject(&self, name: &str, code: &str, exam_id: ExamId) -> Result<Subject> {
            let mut tables = self.tables()?;
            if !tables.exams.iter().any(|e| e.id == exam_id) {
                return Err(AppError::Provider(format!("exam {} does not exist", exam_id)));
            }
            let subject = Subject {
                id: tables.bump_id(),
                name: name.to_string(),
                code: Some(code.to_string()).filter(|c| !c.is_empty()),
                exam_id,
            };
            tables.subjects.push(subject.clone());
            Ok(subject)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::InMemoryReferenceData;
    use super::*;
    use crate::error::AppError;

    fn provider() -> InMemoryReferenceData {
        InMemoryReferenceData::new()
            .with_exam(3, "ATVEE", "Advanced Technical and Vocational", 3)
            .with_exam(1, "CAP", "Certificate of Professional Aptitude", 2)
            .with_school("LYCEE TECHNIQUE BAFOUSSAM", "WEST", "MIFI")
            .with_school("GTHS BAMENDA", "NORTH WEST", "MEZAM")
            .with_subject(1, "WELDING", None)
            .with_subject(1, "CARPENTRY", Some("6110"))
            .with_subject(3, "CIVIL ENGINEERING", Some("7110"))
    }

    #[test]
    fn test_in_memory_ordering_contract() {
        let provider = provider();

        let schools = tokio_test::block_on(provider.list_schools()).unwrap();
        assert_eq!(schools[0].name, "GTHS BAMENDA");

        let exams = tokio_test::block_on(provider.list_exams()).unwrap();
        let ids: Vec<ExamId> = exams.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let subjects = tokio_test::block_on(provider.list_subjects(1)).unwrap();
        let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CARPENTRY", "WELDING"]);
    }

    #[test]
    fn test_in_memory_subject_needs_known_exam() {
        let provider = provider();

        let err = tokio_test::block_on(provider.insert_subject("PLUMBING", "", 9)).unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));

        let subject = tokio_test::block_on(provider.insert_subject("PLUMBING", "", 1)).unwrap();
        assert_eq!(subject.code, None);
    }
}
