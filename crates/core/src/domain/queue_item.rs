// Queue Item Domain Model

use serde::{Deserialize, Serialize};

/// Queue item ID (session-unique, see `port::IdProvider`)
pub type QueueItemId = String;

/// Printed in place of a missing subject code
pub const SUBJECT_CODE_PLACEHOLDER: &str = "-";

/// Paper an envelope is prepared for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperLabel {
    #[serde(rename = "Paper 1")]
    Paper1,
    #[serde(rename = "Paper 2")]
    Paper2,
    #[serde(rename = "Paper 3")]
    Paper3,
}

impl PaperLabel {
    pub const ALL: [PaperLabel; 3] = [PaperLabel::Paper1, PaperLabel::Paper2, PaperLabel::Paper3];

    pub fn number(self) -> u8 {
        match self {
            PaperLabel::Paper1 => 1,
            PaperLabel::Paper2 => 2,
            PaperLabel::Paper3 => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PaperLabel::Paper1),
            2 => Some(PaperLabel::Paper2),
            3 => Some(PaperLabel::Paper3),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaperLabel::Paper1 => "Paper 1",
            PaperLabel::Paper2 => "Paper 2",
            PaperLabel::Paper3 => "Paper 3",
        }
    }
}

impl std::fmt::Display for PaperLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaperLabel {
    type Err = super::DomainError;

    /// Accepts "1", "p1", "Paper 1" (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let digits = lowered
            .trim_start_matches("paper")
            .trim_start_matches('p')
            .trim();
        digits
            .parse::<u8>()
            .ok()
            .and_then(PaperLabel::from_number)
            .ok_or_else(|| super::DomainError::ValidationError(format!("unknown paper '{}'", s)))
    }
}

/// Paper checkboxes of the manual entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperToggles {
    pub p1: bool,
    pub p2: bool,
    pub p3: bool,
}

impl Default for PaperToggles {
    fn default() -> Self {
        Self {
            p1: true,
            p2: true,
            p3: false,
        }
    }
}

impl PaperToggles {
    pub fn none() -> Self {
        Self {
            p1: false,
            p2: false,
            p3: false,
        }
    }

    pub fn is_on(&self, paper: PaperLabel) -> bool {
        match paper {
            PaperLabel::Paper1 => self.p1,
            PaperLabel::Paper2 => self.p2,
            PaperLabel::Paper3 => self.p3,
        }
    }

    pub fn set(&mut self, paper: PaperLabel, on: bool) {
        match paper {
            PaperLabel::Paper1 => self.p1 = on,
            PaperLabel::Paper2 => self.p2 = on,
            PaperLabel::Paper3 => self.p3 = on,
        }
    }

    /// Toggled papers limited to the first `max_papers`
    pub fn selected(&self, max_papers: u8) -> Vec<PaperLabel> {
        PaperLabel::ALL
            .into_iter()
            .filter(|p| p.number() <= max_papers && self.is_on(*p))
            .collect()
    }
}

/// One pending (school, exam, subject, paper) entry
///
/// All descriptive fields are copies taken at creation time; editing the
/// reference data afterwards does not touch queued items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: QueueItemId,
    pub school_name: String,
    pub region: String,
    pub division: String,
    pub exam_name: String,
    pub subject_name: String,
    pub subject_code: String,
    pub paper: PaperLabel,
    pub count: u32,
}
