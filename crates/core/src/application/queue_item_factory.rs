// Queue Item Factory

use crate::domain::{
    DomainError, Exam, PaperLabel, QueueItem, School, Subject, MAX_COUNT,
    SUBJECT_CODE_PLACEHOLDER,
};
use crate::port::IdProvider;
use std::sync::Arc;

/// Builds queue items from the current selection
///
/// IDs come from the injected provider so tests can pin them.
pub struct QueueItemFactory {
    id_provider: Arc<dyn IdProvider>,
}

impl QueueItemFactory {
    pub fn new(id_provider: Arc<dyn IdProvider>) -> Self {
        Self { id_provider }
    }

    /// Snapshot school/exam/subject into a new queue item
    ///
    /// Raw input goes through `CountInput` first; `count` is capped at
    /// `MAX_COUNT` here as well.
    pub fn create_item(
        &self,
        school: Option<&School>,
        exam: Option<&Exam>,
        subject: Option<&Subject>,
        paper: PaperLabel,
        count: u32,
    ) -> Result<QueueItem, DomainError> {
        let school = school.ok_or(DomainError::InvalidSelection("school"))?;
        let exam = exam.ok_or(DomainError::InvalidSelection("exam"))?;
        let subject = subject.ok_or(DomainError::InvalidSelection("subject"))?;

        Ok(QueueItem {
            id: self.id_provider.generate_id(),
            school_name: school.name.clone(),
            region: school.region.clone(),
            division: school.division.clone(),
            exam_name: exam.name.clone(),
            subject_name: subject.name.clone(),
            subject_code: subject
                .code()
                .unwrap_or(SUBJECT_CODE_PLACEHOLDER)
                .to_string(),
            paper,
            count: count.min(MAX_COUNT),
        })
    }
}
