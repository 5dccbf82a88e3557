// Reference Data Domain Model (schools, exams, subjects)

use super::error::{DomainError, Result};
use super::queue_item::PaperLabel;
use serde::{Deserialize, Serialize};

pub type SchoolId = i64;
pub type ExamId = i64;
pub type SubjectId = i64;

/// Regions offered when registering a new school
pub const KNOWN_REGIONS: [&str; 5] = ["SOUTH WEST", "LITTORAL", "CENTRE", "WEST", "NORTH WEST"];

/// Region preselected for a new school
pub const DEFAULT_REGION: &str = "SOUTH WEST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub region: String,
    pub division: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    /// Short name, e.g. "CAP"
    pub name: String,
    pub full_name: String,
    /// 2 or 3
    pub max_papers: u8,
}

impl Exam {
    /// Whether this exam sits the given paper
    pub fn offers(&self, paper: PaperLabel) -> bool {
        paper.number() <= self.max_papers
    }

    /// Papers this exam offers, in paper order
    pub fn offered_papers(&self) -> Vec<PaperLabel> {
        PaperLabel::ALL
            .into_iter()
            .filter(|p| self.offers(*p))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// `None` or empty when the subject has no code
    pub code: Option<String>,
    pub exam_id: ExamId,
}

impl Subject {
    /// Code if present and non-empty
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Draft of a school to be inserted through the reference data provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchool {
    pub name: String,
    pub region: String,
    pub division: String,
}

impl Default for NewSchool {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: DEFAULT_REGION.to_string(),
            division: String::new(),
        }
    }
}

impl NewSchool {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        division: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            division: division.into(),
        }
    }

    /// Validate and upper-case the draft
    ///
    /// Name and division are required; region must be one of [`KNOWN_REGIONS`].
    pub fn normalized(&self) -> Result<Self> {
        let name = self.name.trim().to_uppercase();
        let division = self.division.trim().to_uppercase();
        let region = self.region.trim().to_uppercase();

        if name.is_empty() || division.is_empty() {
            return Err(DomainError::ValidationError(
                "school name and division are required".to_string(),
            ));
        }
        if !KNOWN_REGIONS.contains(&region.as_str()) {
            return Err(DomainError::ValidationError(format!(
                "unknown region '{}' (expected one of: {})",
                self.region,
                KNOWN_REGIONS.join(", ")
            )));
        }

        Ok(Self {
            name,
            region,
            division,
        })
    }
}

/// Draft of a subject to be inserted under an exam
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
    pub code: String,
}

impl NewSubject {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    pub fn normalized(&self) -> Result<Self> {
        let name = self.name.trim().to_uppercase();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "subject name is required".to_string(),
            ));
        }
        Ok(Self {
            name,
            code: self.code.trim().to_uppercase(),
        })
    }
}
