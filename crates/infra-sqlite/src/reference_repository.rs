// SQLite ReferenceDataProvider Implementation

use async_trait::async_trait;
use exam_labels_core::domain::{Exam, ExamId, School, SchoolId, Subject};
use exam_labels_core::error::{AppError, Result};
use exam_labels_core::port::ReferenceDataProvider;
use sqlx::SqlitePool;
use tracing::debug;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Provider(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "787" | "3850" => AppError::Provider(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "275" => AppError::Provider(format!(
                        "Check constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Provider(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    _ => AppError::Provider(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Provider(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Provider("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Provider(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Provider(err.to_string()),
    }
}

pub struct SqliteReferenceRepository {
    pool: SqlitePool,
}

impl SqliteReferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceDataProvider for SqliteReferenceRepository {
    async fn list_schools(&self) -> Result<Vec<School>> {
        let rows = sqlx::query_as::<_, SchoolRow>(
            "SELECT id, name, region, division FROM schools ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SchoolRow::into_school).collect())
    }

    async fn list_exams(&self) -> Result<Vec<Exam>> {
        let rows = sqlx::query_as::<_, ExamRow>(
            "SELECT id, name, full_name, max_papers FROM exams ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ExamRow::into_exam).collect()
    }

    async fn list_subjects(&self, exam_id: ExamId) -> Result<Vec<Subject>> {
        let rows = sqlx::query_as::<_, SubjectRow>(
            "SELECT id, name, code, exam_id FROM subjects WHERE exam_id = ? ORDER BY name, id",
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(exam_id, subjects = rows.len(), "Subjects fetched");
        Ok(rows.into_iter().map(SubjectRow::into_subject).collect())
    }

    async fn find_school(&self, id: SchoolId) -> Result<Option<School>> {
        let row = sqlx::query_as::<_, SchoolRow>(
            "SELECT id, name, region, division FROM schools WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SchoolRow::into_school))
    }

    async fn find_exam(&self, id: ExamId) -> Result<Option<Exam>> {
        let row = sqlx::query_as::<_, ExamRow>(
            "SELECT id, name, full_name, max_papers FROM exams WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(ExamRow::into_exam).transpose()
    }

    async fn insert_school(&self, name: &str, region: &str, division: &str) -> Result<School> {
        let row = sqlx::query_as::<_, SchoolRow>(
            r#"
            INSERT INTO schools (name, region, division)
            VALUES (?, ?, ?)
            RETURNING id, name, region, division
            "#,
        )
        .bind(name)
        .bind(region)
        .bind(division)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(school_id = row.id, "School inserted");
        Ok(row.into_school())
    }

    async fn insert_subject(&self, name: &str, code: &str, exam_id: ExamId) -> Result<Subject> {
        let code = Some(code).filter(|c| !c.is_empty());

        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            INSERT INTO subjects (name, code, exam_id)
            VALUES (?, ?, ?)
            RETURNING id, name, code, exam_id
            "#,
        )
        .bind(name)
        .bind(code)
        .bind(exam_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(subject_id = row.id, exam_id, "Subject inserted");
        Ok(row.into_subject())
    }
}

/// SQLite row representations
#[derive(Debug, sqlx::FromRow)]
struct SchoolRow {
    id: i64,
    name: String,
    region: String,
    division: String,
}

impl SchoolRow {
    fn into_school(self) -> School {
        School {
            id: self.id,
            name: self.name,
            region: self.region,
            division: self.division,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExamRow {
    id: i64,
    name: String,
    full_name: String,
    max_papers: i64,
}

impl ExamRow {
    fn into_exam(self) -> Result<Exam> {
        let max_papers = u8::try_from(self.max_papers).map_err(|_| {
            AppError::Provider(format!(
                "exam {} has invalid max_papers {}",
                self.id, self.max_papers
            ))
        })?;

        Ok(Exam {
            id: self.id,
            name: self.name,
            full_name: self.full_name,
            max_papers,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubjectRow {
    id: i64,
    name: String,
    code: Option<String>,
    exam_id: i64,
}

impl SubjectRow {
    fn into_subject(self) -> Subject {
        Subject {
            id: self.id,
            name: self.name,
            code: self.code,
            exam_id: self.exam_id,
        }
    }
}
