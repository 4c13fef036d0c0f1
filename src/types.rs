//! Shared record types
//!
//! `RunnerRecord` is one normalized finisher row. Records are produced once by
//! the normalizer and only read afterwards.

use serde::{Serialize, Serializer};

/// Runner gender as recorded by the timing provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse a raw gender cell (case-insensitive, surrounding whitespace ignored)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Fields whose raw value was missing or malformed and got substituted
///
/// Numeric fields are substituted with 0, text fields with "".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ImputedFields(u8);

impl ImputedFields {
    pub const BIB: u8 = 1 << 0;
    pub const NAME: u8 = 1 << 1;
    pub const RESULT: u8 = 1 << 2;
    pub const RESULT_TIME: u8 = 1 << 3;
    pub const RESULT_DISTANCE: u8 = 1 << 4;
    pub const RANK_ABS: u8 = 1 << 5;
    pub const RANK_GENDER: u8 = 1 << 6;

    const NAMES: [(u8, &'static str); 7] = [
        (Self::BIB, "bib"),
        (Self::NAME, "name"),
        (Self::RESULT, "result"),
        (Self::RESULT_TIME, "result_time"),
        (Self::RESULT_DISTANCE, "result_distance"),
        (Self::RANK_ABS, "rank_abs"),
        (Self::RANK_GENDER, "rank_gender"),
    ];

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7f)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn contains(&self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Column names of the substituted fields
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl Serialize for ImputedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// One finisher after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerRecord {
    /// Position in the normalized table (stable across re-normalization)
    pub row_id: usize,
    pub bib: String,
    pub name: String,
    pub gender: Gender,
    pub status: String,
    /// Elapsed seconds; authoritative for ordering and statistics
    pub result_time: f64,
    /// Display string, e.g. "1:02:30"
    pub result: String,
    /// Nominal distance in meters
    pub result_distance: f64,
    pub rank_abs: i64,
    pub rank_gender: i64,
    /// Seconds per km; `None` when the distance is zero or missing
    pub pace_seconds: Option<f64>,
    pub pace_str: Option<String>,
    pub imputed: ImputedFields,
}
