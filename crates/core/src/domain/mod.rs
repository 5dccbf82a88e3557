// Domain Layer - Pure business logic and entities

pub mod count;
pub mod error;
pub mod label;
pub mod queue;
pub mod queue_item;
pub mod reference;

// Re-exports
pub use count::{CountInput, MAX_COUNT};
pub use error::DomainError;
pub use label::{
    derive_level, envelope_count, expand, expand_all, supplied_count, LabelBatch, LabelRecord,
    ENVELOPE_CAPACITY, SUPPLY_MARGIN,
};
pub use queue::{QueueManager, QueueSummary};
pub use queue_item::{PaperLabel, PaperToggles, QueueItem, QueueItemId, SUBJECT_CODE_PLACEHOLDER};
pub use reference::{
    Exam, ExamId, NewSchool, NewSubject, School, SchoolId, Subject, SubjectId, DEFAULT_REGION,
    KNOWN_REGIONS,
};
