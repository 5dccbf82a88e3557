// Label renderers and table views for the terminal

use exam_labels_core::domain::{
    envelope_count, Exam, LabelBatch, LabelRecord, QueueItem, School, Subject,
    SUBJECT_CODE_PLACEHOLDER,
};
use exam_labels_core::port::LabelRenderer;
use exam_labels_core::{AppError, Result};
use std::cell::RefCell;
use std::io::Write;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Build the renderer for `format` writing to `out`
pub fn renderer_for<W: Write + 'static>(format: OutputFormat, out: W) -> Box<dyn LabelRenderer> {
    match format {
        OutputFormat::Table => Box::new(TableRenderer::new(out)),
        OutputFormat::Json => Box::new(JsonRenderer::new(out)),
    }
}

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Division")]
    division: String,
    #[tabled(rename = "School")]
    school: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Paper")]
    paper: String,
    #[tabled(rename = "Registered")]
    registered: u32,
    #[tabled(rename = "Supplied")]
    supplied: u64,
    #[tabled(rename = "Envelope")]
    envelope: String,
}

impl From<&LabelRecord> for LabelRow {
    fn from(label: &LabelRecord) -> Self {
        Self {
            region: label.region.clone(),
            division: label.division.clone(),
            school: label.school_name.clone(),
            subject: label.subject_name.clone(),
            code: label.subject_code.clone(),
            level: label.level_name.clone(),
            paper: label.paper.to_string(),
            registered: label.registered_count,
            supplied: label.supplied_count,
            envelope: format!("{} of {}", label.envelope_index, label.total_envelopes),
        }
    }
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "School")]
    school: String,
    #[tabled(rename = "Exam")]
    exam: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Paper")]
    paper: String,
    #[tabled(rename = "Count")]
    count: u32,
    #[tabled(rename = "Envelopes")]
    envelopes: u32,
}

impl From<&QueueItem> for QueueRow {
    fn from(item: &QueueItem) -> Self {
        Self {
            id: item.id.clone(),
            school: item.school_name.clone(),
            exam: item.exam_name.clone(),
            subject: item.subject_name.clone(),
            code: item.subject_code.clone(),
            paper: item.paper.to_string(),
            count: item.count,
            envelopes: envelope_count(item.count),
        }
    }
}

#[derive(Tabled)]
struct SchoolRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Division")]
    division: String,
}

#[derive(Tabled)]
struct ExamRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Full name")]
    full_name: String,
    #[tabled(rename = "Papers")]
    papers: u8,
}

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
}

pub fn school_table<'a>(schools: impl IntoIterator<Item = &'a School>) -> String {
    Table::new(schools.into_iter().map(|s| SchoolRow {
        id: s.id,
        name: s.name.clone(),
        region: s.region.clone(),
        division: s.division.clone(),
    }))
    .to_string()
}

pub fn exam_table<'a>(exams: impl IntoIterator<Item = &'a Exam>) -> String {
    Table::new(exams.into_iter().map(|e| ExamRow {
        id: e.id,
        name: e.name.clone(),
        full_name: e.full_name.clone(),
        papers: e.max_papers,
    }))
    .to_string()
}

pub fn subject_table<'a>(subjects: impl IntoIterator<Item = &'a Subject>) -> String {
    Table::new(subjects.into_iter().map(|s| SubjectRow {
        id: s.id,
        name: s.name.clone(),
        code: s.code().unwrap_or(SUBJECT_CODE_PLACEHOLDER).to_string(),
    }))
    .to_string()
}

pub fn queue_table<'a>(items: impl IntoIterator<Item = &'a QueueItem>) -> String {
    Table::new(items.into_iter().map(QueueRow::from)).to_string()
}

pub fn label_table(labels: &[LabelRecord]) -> String {
    Table::new(labels.iter().map(LabelRow::from)).to_string()
}

fn write_err(e: std::io::Error) -> AppError {
    AppError::Render(e.to_string())
}

/// One table per batch
pub struct TableRenderer<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> LabelRenderer for TableRenderer<W> {
    fn render(&self, batch: &LabelBatch) -> Result<()> {
        let mut out = self.out.borrow_mut();
        if batch.labels.is_empty() {
            writeln!(out, "No labels to print").map_err(write_err)?;
        } else {
            writeln!(out, "{}", label_table(&batch.labels)).map_err(write_err)?;
        }
        out.flush().map_err(write_err)
    }
}

/// One JSON document per batch
pub struct JsonRenderer<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> LabelRenderer for JsonRenderer<W> {
    fn render(&self, batch: &LabelBatch) -> Result<()> {
        let json = serde_json::to_string_pretty(batch)?;
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", json).map_err(write_err)?;
        out.flush().map_err(write_err)
    }
}
