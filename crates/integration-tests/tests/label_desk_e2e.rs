//! End-to-end label desk tests
//!
//! Wires the label desk service to the SQLite reference repository and walks
//! through a full queue-and-print session.

use std::sync::Arc;

use exam_labels_core::application::LabelDeskService;
use exam_labels_core::domain::{NewSchool, NewSubject, PaperLabel, PaperToggles};
use exam_labels_core::port::confirmation::FixedAnswer;
use exam_labels_core::port::id_provider::SequentialIdProvider;
use exam_labels_core::port::label_renderer::mocks::RecordingRenderer;
use exam_labels_core::port::time_provider::FixedTimeProvider;
use exam_labels_core::AppError;
use exam_labels_infra_sqlite::{create_pool, run_migrations, SqliteReferenceRepository};

const CAP: i64 = 1;
const ATVEE: i64 = 3;

async fn setup_desk() -> LabelDeskService {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let mut desk = LabelDeskService::new(
        Arc::new(SqliteReferenceRepository::new(pool)),
        Arc::new(SequentialIdProvider::new("item")),
        Arc::new(FixedTimeProvider(1_700_000_000_000)),
    );
    desk.load_catalog().await.unwrap();
    desk
}

/// Registers one school and selects it with the given exam
async fn desk_with_school(exam: i64) -> LabelDeskService {
    let mut desk = setup_desk().await;
    desk.create_school(NewSchool::new("gths kumba", "south west", "meme"))
        .await
        .unwrap();
    desk.select_exam(exam).await.unwrap();
    desk
}

#[tokio::test]
async fn test_seeded_exams_loaded() {
    let desk = setup_desk().await;

    let exams: Vec<(&str, u8)> = desk
        .catalog()
        .exams()
        .iter()
        .map(|e| (e.name.as_str(), e.max_papers))
        .collect();
    assert_eq!(exams, vec![("CAP", 2), ("ITVEE", 2), ("ATVEE", 3)]);
    assert!(desk.catalog().schools().is_empty());
}

#[tokio::test]
async fn test_manual_entry_to_labels() {
    let mut desk = desk_with_school(CAP).await;
    let subject = desk
        .create_subject(NewSubject::new("electricity", "5050"))
        .await
        .unwrap();
    assert_eq!(desk.selection().subject.as_ref(), Some(&subject));

    desk.set_student_count("101");
    let ids = desk.add_to_queue().unwrap();
    assert_eq!(ids, vec!["item-1", "item-2"]);

    // Selection is reset for the next entry; school and exam stay
    assert!(desk.selection().subject.is_none());
    assert!(desk.selection().student_count.is_empty());
    assert!(desk.selection().school.is_some());

    let renderer = RecordingRenderer::new();
    let printed = desk.generate(&renderer).unwrap();
    assert_eq!(printed, 6);

    let batch = &renderer.batches()[0];
    assert_eq!(batch.generated_at, 1_700_000_000_000);
    let first = &batch.labels[0];
    assert_eq!(first.school_name, "GTHS KUMBA");
    assert_eq!(first.region, "SOUTH WEST");
    assert_eq!(first.division, "MEME");
    assert_eq!(first.subject_name, "ELECTRICITY");
    assert_eq!(first.subject_code, "5050");
    assert_eq!(first.level_name, "ORDINARY LEVEL (CAP)");
    assert_eq!(first.paper, PaperLabel::Paper1);
    assert_eq!(first.registered_count, 101);
    assert_eq!(first.supplied_count, 103);

    let envelopes: Vec<(u32, u32)> = batch
        .labels
        .iter()
        .filter(|l| l.paper == PaperLabel::Paper1)
        .map(|l| (l.envelope_index, l.total_envelopes))
        .collect();
    assert_eq!(envelopes, vec![(1, 3), (2, 3), (3, 3)]);

    // Generation leaves the queue intact
    assert_eq!(desk.queue().len(), 2);
}

#[tokio::test]
async fn test_batch_add_uses_every_subject() {
    let mut desk = desk_with_school(ATVEE).await;
    for (name, code) in [("CIVIL ENGINEERING", "7110"), ("ARCHITECTURE", "")] {
        desk.create_subject(NewSubject::new(name, code)).await.unwrap();
    }

    let ids = desk.batch_add(PaperLabel::Paper3).unwrap();
    assert_eq!(ids.len(), 2);

    let items = desk.queue().items();
    assert!(items.iter().all(|i| i.count == 0 && i.paper == PaperLabel::Paper3));
    // Subjects come back sorted by name, so ARCHITECTURE is first
    assert_eq!(items[0].subject_name, "ARCHITECTURE");
    assert_eq!(items[0].subject_code, "-");

    let labels = desk.labels();
    assert_eq!(labels.len(), 2);
    assert!(labels.iter().all(|l| l.supplied_count == 2 && l.total_envelopes == 1));
    assert_eq!(labels[0].level_name, "ADVANCED LEVEL (ATVEE)");
}

#[tokio::test]
async fn test_paper_three_only_for_three_paper_exams() {
    let mut desk = desk_with_school(CAP).await;
    desk.create_subject(NewSubject::new("WELDING", "")).await.unwrap();

    let err = desk.batch_add(PaperLabel::Paper3).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    desk.set_student_count("20");
    desk.set_papers(PaperToggles {
        p1: false,
        p2: false,
        p3: true,
    });
    let err = desk.add_to_queue().unwrap_err();
    assert!(matches!(err, AppError::MissingSelection(ref f) if f == &vec!["paper"]));
    assert!(desk.queue().is_empty());
}

#[tokio::test]
async fn test_edit_remove_and_clear() {
    let mut desk = desk_with_school(CAP).await;
    desk.create_subject(NewSubject::new("WELDING", "6200")).await.unwrap();
    desk.batch_add(PaperLabel::Paper1).unwrap();
    desk.batch_add(PaperLabel::Paper2).unwrap();

    // Newest first
    let order: Vec<&str> = desk.queue().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(order, vec!["item-2", "item-1"]);

    let outcome = desk.update_count("item-1", "-5").unwrap();
    assert!(outcome.was_coerced());
    assert_eq!(desk.queue().get("item-1").map(|i| i.count), Some(0));
    desk.update_count("item-2", "75").unwrap();
    assert_eq!(desk.labels().len(), 3);

    assert!(desk.remove("missing").is_none());
    assert_eq!(desk.queue().len(), 2);

    let err = desk.clear_queue(&FixedAnswer(false)).unwrap_err();
    assert!(matches!(err, AppError::ConfirmationDeclined));
    assert_eq!(desk.queue().len(), 2);

    assert_eq!(desk.clear_queue(&FixedAnswer(true)).unwrap(), 2);
    assert!(desk.labels().is_empty());
}

#[tokio::test]
async fn test_duplicate_school_leaves_catalog_unchanged() {
    let mut desk = desk_with_school(CAP).await;
    let before = desk.catalog().schools().to_vec();

    let err = desk
        .create_school(NewSchool::new("GTHS KUMBA", "SOUTH WEST", "MEME"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Provider(_)));
    assert_eq!(desk.catalog().schools(), before.as_slice());
}

#[tokio::test]
async fn test_subjects_scoped_to_selected_exam() {
    let mut desk = desk_with_school(CAP).await;
    desk.create_subject(NewSubject::new("WELDING", "")).await.unwrap();

    desk.select_exam(ATVEE).await.unwrap();
    assert!(desk.catalog().subjects().is_empty());
    assert!(desk.selection().subject.is_none());

    desk.select_exam(CAP).await.unwrap();
    assert_eq!(desk.catalog().subjects().len(), 1);

    desk.deselect_exam();
    assert!(desk.catalog().subjects().is_empty());
    let err = desk
        .create_subject(NewSubject::new("PLUMBING", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingSelection(ref f) if f == &vec!["exam"]));
}
