// Label Desk Service - one session of queue building and label generation

mod selection;

pub use selection::{Catalog, Selection};

use crate::application::queue_item_factory::QueueItemFactory;
use crate::domain::{
    expand_all, CountInput, Exam, ExamId, LabelBatch, LabelRecord, NewSchool, NewSubject,
    PaperLabel, PaperToggles, QueueItem, QueueItemId, QueueManager, School, SchoolId, Subject,
    SubjectId,
};
use crate::error::{AppError, Result};
use crate::port::{Confirmation, IdProvider, LabelRenderer, ReferenceDataProvider, TimeProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Prompt shown before the queue is wiped
pub const CLEAR_PROMPT: &str = "Are you sure you want to delete everything in the list?";

/// Owns the catalog, the form selection and the print queue of one session
///
/// Every mutation takes `&mut self`, so there is exactly one writer.
pub struct LabelDeskService {
    reference: Arc<dyn ReferenceDataProvider>,
    factory: QueueItemFactory,
    time_provider: Arc<dyn TimeProvider>,
    catalog: Catalog,
    selection: Selection,
    queue: QueueManager,
}

impl LabelDeskService {
    pub fn new(
        reference: Arc<dyn ReferenceDataProvider>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            reference,
            factory: QueueItemFactory::new(id_provider),
            time_provider,
            catalog: Catalog::default(),
            selection: Selection::default(),
            queue: QueueManager::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn queue(&self) -> &QueueManager {
        &self.queue
    }

    // ------------------------------------------------------------------
    // Reference data
    // ------------------------------------------------------------------

    /// Load schools and exams; the catalog is replaced only if both loads succeed
    pub async fn load_catalog(&mut self) -> Result<()> {
        let schools = self.reference.list_schools().await?;
        let exams = self.reference.list_exams().await?;

        info!(
            schools = schools.len(),
            exams = exams.len(),
            "Reference data loaded"
        );

        self.catalog.schools = schools;
        self.catalog.exams = exams;
        Ok(())
    }

    pub fn search_schools(&self, query: &str) -> Vec<&School> {
        self.catalog.search_schools(query)
    }

    /// Select a school by id
    ///
    /// Ids missing from the loaded catalog are looked up through the provider
    /// (schools registered after loading) and added to the catalog.
    pub async fn select_school(&mut self, id: SchoolId) -> Result<School> {
        let cached = self.catalog.schools.iter().find(|s| s.id == id).cloned();
        let school = match cached {
            Some(school) => school,
            None => {
                let school = self
                    .reference
                    .find_school(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("school {}", id)))?;
                debug!(school_id = id, "School resolved through provider");
                self.catalog.insert_school_sorted(school.clone());
                school
            }
        };

        debug!(school_id = id, name = %school.name, "School selected");
        self.selection.school = Some(school.clone());
        Ok(school)
    }

    pub fn clear_school(&mut self) {
        self.selection.school = None;
    }

    /// Select an exam and load its subjects
    ///
    /// The subject selection is dropped; paper toggles are kept. Ids missing
    /// from the catalog are looked up through the provider. If any fetch
    /// fails nothing changes.
    pub async fn select_exam(&mut self, id: ExamId) -> Result<Exam> {
        let cached = self.catalog.exams.iter().find(|e| e.id == id).cloned();
        let (exam, fetched) = match cached {
            Some(exam) => (exam, false),
            None => {
                let exam = self
                    .reference
                    .find_exam(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("exam {}", id)))?;
                (exam, true)
            }
        };

        let subjects = self.reference.list_subjects(id).await?;

        info!(
            exam_id = id,
            exam = %exam.name,
            subjects = subjects.len(),
            "Exam selected"
        );

        if fetched {
            self.catalog.insert_exam_sorted(exam.clone());
        }
        self.catalog.subjects = subjects;
        self.selection.exam = Some(exam.clone());
        self.selection.subject = None;
        Ok(exam)
    }

    pub fn deselect_exam(&mut self) {
        self.selection.exam = None;
        self.selection.subject = None;
        self.catalog.subjects.clear();
    }

    pub fn select_subject(&mut self, id: SubjectId) -> Result<Subject> {
        let subject = self
            .catalog
            .subjects
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("subject {}", id)))?;

        self.selection.subject = Some(subject.clone());
        Ok(subject)
    }

    pub fn set_student_count(&mut self, raw: impl Into<String>) {
        self.selection.student_count = raw.into();
    }

    pub fn set_paper(&mut self, paper: PaperLabel, on: bool) {
        self.selection.papers.set(paper, on);
    }

    pub fn set_papers(&mut self, papers: PaperToggles) {
        self.selection.papers = papers;
    }

    /// Register a new school and make it the selection
    pub async fn create_school(&mut self, draft: NewSchool) -> Result<School> {
        let draft = draft.normalized()?;
        let school = self
            .reference
            .insert_school(&draft.name, &draft.region, &draft.division)
            .await?;

        info!(school_id = school.id, name = %school.name, "School created");

        self.catalog.insert_school_sorted(school.clone());
        self.selection.school = Some(school.clone());
        Ok(school)
    }

    /// Register a new subject under the selected exam and make it the selection
    pub async fn create_subject(&mut self, draft: NewSubject) -> Result<Subject> {
        let exam_id = self
            .selection
            .exam
            .as_ref()
            .map(|e| e.id)
            .ok_or_else(|| AppError::MissingSelection(vec!["exam"]))?;
        let draft = draft.normalized()?;

        let subject = self
            .reference
            .insert_subject(&draft.name, &draft.code, exam_id)
            .await?;

        info!(subject_id = subject.id, exam_id, name = %subject.name, "Subject created");

        self.catalog.insert_subject_sorted(subject.clone());
        self.selection.subject = Some(subject.clone());
        Ok(subject)
    }

    // ------------------------------------------------------------------
    // Queue
    // ------------------------------------------------------------------

    /// Queue one item per toggled paper for the selected subject
    ///
    /// Paper 3 is only considered for exams with three papers. On success the
    /// subject, count and paper toggles are reset.
    pub fn add_to_queue(&mut self) -> Result<Vec<QueueItemId>> {
        let mut missing = self.selection.missing_for_add();
        let max_papers = self.selection.exam.as_ref().map_or(0, |e| e.max_papers);
        let papers = self.selection.papers.selected(max_papers);
        if missing.is_empty() && papers.is_empty() {
            missing.push("paper");
        }
        if !missing.is_empty() {
            warn!(missing = ?missing, "Add to queue rejected");
            return Err(AppError::MissingSelection(missing));
        }

        let count = CountInput::parse(&self.selection.student_count);
        if count.was_coerced() {
            debug!(
                raw = %self.selection.student_count,
                outcome = ?count,
                stored = count.value(),
                "Student count coerced"
            );
        }

        let items = papers
            .into_iter()
            .map(|paper| {
                self.factory.create_item(
                    self.selection.school.as_ref(),
                    self.selection.exam.as_ref(),
                    self.selection.subject.as_ref(),
                    paper,
                    count.value(),
                )
            })
            .collect::<std::result::Result<Vec<QueueItem>, _>>()?;

        let ids = self.push_items(items);
        self.selection.reset_entry();
        Ok(ids)
    }

    /// Queue every subject of the selected exam for one paper, count 0
    pub fn batch_add(&mut self, paper: PaperLabel) -> Result<Vec<QueueItemId>> {
        let mut missing = Vec::new();
        if self.selection.school.is_none() {
            missing.push("school");
        }
        if self.selection.exam.is_none() {
            missing.push("exam");
        }
        if !missing.is_empty() {
            return Err(AppError::MissingSelection(missing));
        }

        if let Some(exam) = &self.selection.exam {
            if !exam.offers(paper) {
                return Err(AppError::Validation(format!(
                    "{} has no {}",
                    exam.name, paper
                )));
            }
        }

        if self.catalog.subjects.is_empty() {
            warn!("Batch add with no subjects loaded; nothing queued");
        }

        let items = self
            .catalog
            .subjects
            .iter()
            .map(|subject| {
                self.factory.create_item(
                    self.selection.school.as_ref(),
                    self.selection.exam.as_ref(),
                    Some(subject),
                    paper,
                    0,
                )
            })
            .collect::<std::result::Result<Vec<QueueItem>, _>>()?;

        Ok(self.push_items(items))
    }

    fn push_items(&mut self, items: Vec<QueueItem>) -> Vec<QueueItemId> {
        let ids: Vec<QueueItemId> = items.iter().map(|i| i.id.clone()).collect();
        let total = self.queue.add_many(items).len();
        info!(added = ids.len(), queue_len = total, "Items queued");
        ids
    }

    /// Edit an item's count; `None` when the item is not queued
    pub fn update_count(&mut self, id: &str, raw: &str) -> Option<CountInput> {
        let outcome = self.queue.update_count(id, raw);
        match outcome {
            Some(input) => debug!(
                item_id = %id,
                count = input.value(),
                coerced = input.was_coerced(),
                "Count updated"
            ),
            None => debug!(item_id = %id, "Count update for unknown item ignored"),
        }
        outcome
    }

    pub fn remove(&mut self, id: &str) -> Option<QueueItem> {
        let removed = self.queue.remove(id);
        if removed.is_some() {
            debug!(item_id = %id, "Item removed");
        }
        removed
    }

    /// Empty the queue once the user confirms
    pub fn clear_queue(&mut self, confirmation: &dyn Confirmation) -> Result<usize> {
        if !confirmation.confirm(CLEAR_PROMPT) {
            return Err(AppError::ConfirmationDeclined);
        }
        let removed = self.queue.clear();
        info!(removed, "Queue cleared");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------

    /// Labels for the whole queue in print order
    pub fn labels(&self) -> Vec<LabelRecord> {
        expand_all(self.queue.items())
    }

    /// Expand the queue and hand the labels to `renderer`
    ///
    /// Returns the number of labels rendered. The queue is left intact.
    pub fn generate(&self, renderer: &dyn LabelRenderer) -> Result<usize> {
        let batch = LabelBatch {
            generated_at: self.time_provider.now_millis(),
            labels: self.labels(),
        };
        renderer.render(&batch)?;

        info!(
            items = self.queue.len(),
            labels = batch.labels.len(),
            "Labels generated"
        );
        Ok(batch.labels.len())
    }
}
