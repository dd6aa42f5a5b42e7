use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Sat,
    Act,
    Psat,
}

/// A named section with its inclusive score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionRange {
    pub name: &'static str,
    pub min: u16,
    pub max: u16,
}

const SAT_SECTIONS: [SectionRange; 2] = [
    SectionRange { name: "reading_writing", min: 200, max: 800 },
    SectionRange { name: "math", min: 200, max: 800 },
];

const ACT_SECTIONS: [SectionRange; 4] = [
    SectionRange { name: "english", min: 1, max: 36 },
    SectionRange { name: "math", min: 1, max: 36 },
    SectionRange { name: "reading", min: 1, max: 36 },
    SectionRange { name: "science", min: 1, max: 36 },
];

const PSAT_SECTIONS: [SectionRange; 2] = [
    SectionRange { name: "reading_writing", min: 160, max: 760 },
    SectionRange { name: "math", min: 160, max: 760 },
];

impl TestKind {
    pub const ALL: [TestKind; 3] = [TestKind::Sat, TestKind::Act, TestKind::Psat];

    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Sat => "sat",
            TestKind::Act => "act",
            TestKind::Psat => "psat",
        }
    }

    /// Score tables are compiled in, like the permission matrix.
    pub fn sections(self) -> &'static [SectionRange] {
        match self {
            TestKind::Sat => &SAT_SECTIONS,
            TestKind::Act => &ACT_SECTIONS,
            TestKind::Psat => &PSAT_SECTIONS,
        }
    }

    pub fn composite_range(self) -> (u16, u16) {
        match self {
            TestKind::Sat => (400, 1600),
            TestKind::Act => (1, 36),
            TestKind::Psat => (320, 1520),
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sat" => Ok(TestKind::Sat),
            "act" => Ok(TestKind::Act),
            "psat" => Ok(TestKind::Psat),
            other => Err(AppError::Validation(format!("Unknown test kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    pub name: String,
    pub score: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
    pub id: String,
    pub student_id: String,
    pub kind: TestKind,
    pub test_date: NaiveDate,
    pub sections: Vec<SectionScore>,
    pub composite: u16,
    pub recorded_by: String,
    pub created_date: DateTime<Utc>,
}

impl TestScore {
    pub fn new(
        student_id: String,
        kind: TestKind,
        test_date: NaiveDate,
        sections: Vec<SectionScore>,
        composite: u16,
        recorded_by: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            kind,
            test_date,
            sections,
            composite,
            recorded_by: recorded_by.to_string(),
            created_date: Utc::now(),
        }
    }
}

/// Check a submission against the table for its kind: every configured
/// section exactly once, no strangers, all values in range.
pub fn validate_submission(
    kind: TestKind,
    sections: &[SectionScore],
    composite: u16,
) -> Result<(), AppError> {
    let expected = kind.sections();

    for range in expected {
        let matches = sections.iter().filter(|s| s.name == range.name).count();
        if matches == 0 {
            return Err(AppError::Validation(format!(
                "Missing {} section '{}'",
                kind, range.name
            )));
        }
        if matches > 1 {
            return Err(AppError::Validation(format!(
                "Duplicate {} section '{}'",
                kind, range.name
            )));
        }
    }

    for section in sections {
        let Some(range) = expected.iter().find(|r| r.name == section.name) else {
            return Err(AppError::Validation(format!(
                "Unknown {} section '{}'",
                kind, section.name
            )));
        };
        if section.score < range.min || section.score > range.max {
            return Err(AppError::Validation(format!(
                "{} score {} for '{}' is outside {}..={}",
                kind, section.score, section.name, range.min, range.max
            )));
        }
    }

    let (min, max) = kind.composite_range();
    if composite < min || composite > max {
        return Err(AppError::Validation(format!(
            "{} composite {} is outside {}..={}",
            kind, composite, min, max
        )));
    }

    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTestScore {
    pub kind: TestKind,
    pub test_date: NaiveDate,
    pub sections: Vec<SectionScore>,
    pub composite: u16,
}
