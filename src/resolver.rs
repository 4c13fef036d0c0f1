//! Runner Resolver
//!
//! Maps a free-text query onto the runners of one cohort:
//! - Empty query: nothing is looked up
//! - All digits: exact match on the normalized bib
//! - Anything else: case-insensitive substring match on the name
//!
//! More than one match is never narrowed implicitly. The caller gets
//! `Resolution::Ambiguous` and must re-enter with a selection
//! (`Ambiguity::select_bib` / `Ambiguity::select_row`).

use crate::cohort::Cohort;
use crate::normalizer::normalize_bib;
use crate::types::RunnerRecord;
use serde::Serialize;
use smallvec::SmallVec;

/// Classified query text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'q> {
    Empty,
    Bib(&'q str),
    Name(&'q str),
}

impl<'q> Query<'q> {
    pub fn parse(raw: &'q str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Query::Empty
        } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Query::Bib(trimmed)
        } else {
            Query::Name(trimmed)
        }
    }
}

/// A caller's pick among ambiguous candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Bib(String),
    Row(usize),
}

/// What the caller shows for one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub row_id: usize,
    pub name: String,
    pub bib: String,
    pub result: String,
    /// `"{name} (№{bib}, {result})"`
    pub label: String,
}

impl Candidate {
    fn from_record(record: &RunnerRecord) -> Self {
        Self {
            row_id: record.row_id,
            name: record.name.clone(),
            bib: record.bib.clone(),
            result: record.result.clone(),
            label: format!("{} (№{}, {})", record.name, record.bib, record.result),
        }
    }
}

/// Query that matched several runners, waiting for a selection
#[derive(Debug, Clone, Serialize)]
pub struct Ambiguity<'a> {
    pub query: String,
    pub candidates: Vec<Candidate>,
    #[serde(skip)]
    matches: SmallVec<[&'a RunnerRecord; 4]>,
}

/// Outcome of one resolution pass
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Resolution<'a> {
    /// No query entered; nothing was looked up
    Empty,
    Resolved(&'a RunnerRecord),
    Ambiguous(Ambiguity<'a>),
    NotFound { reason: String },
}

impl<'a> Ambiguity<'a> {
    fn new(query: &str, matches: SmallVec<[&'a RunnerRecord; 4]>) -> Self {
        Self {
            query: query.to_string(),
            candidates: matches.iter().map(|r| Candidate::from_record(r)).collect(),
            matches,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Narrow to the candidate(s) carrying `bib`
    ///
    /// Candidates sharing a bib stay ambiguous; use `select_row` for them.
    pub fn select_bib(&self, bib: &str) -> Resolution<'a> {
        let wanted = normalize_bib(bib);
        let picked: SmallVec<[&'a RunnerRecord; 4]> = self
            .matches
            .iter()
            .copied()
            .filter(|r| r.bib == wanted)
            .collect();

        match picked.len() {
            0 => Resolution::NotFound {
                reason: format!("bib {} is not among the candidates for '{}'", wanted, self.query),
            },
            1 => Resolution::Resolved(picked[0]),
            _ => Resolution::Ambiguous(Ambiguity::new(&self.query, picked)),
        }
    }

    /// Pick the candidate with this `row_id`
    pub fn select_row(&self, row_id: usize) -> Resolution<'a> {
        match self.matches.iter().copied().find(|r| r.row_id == row_id) {
            Some(record) => Resolution::Resolved(record),
            None => Resolution::NotFound {
                reason: format!("row {} is not among the candidates for '{}'", row_id, self.query),
            },
        }
    }

    pub fn select(&self, selection: &Selection) -> Resolution<'a> {
        match selection {
            Selection::Bib(bib) => self.select_bib(bib),
            Selection::Row(row_id) => self.select_row(*row_id),
        }
    }
}

impl<'a> Resolution<'a> {
    pub fn record(&self) -> Option<&'a RunnerRecord> {
        match self {
            Resolution::Resolved(record) => Some(*record),
            _ => None,
        }
    }

    /// Apply a selection if this resolution is waiting for one
    pub fn with_selection(self, selection: Option<&Selection>) -> Self {
        match (self, selection) {
            (Resolution::Ambiguous(ambiguity), Some(selection)) => ambiguity.select(selection),
            (other, _) => other,
        }
    }
}

/// Resolve `query` against the runners of `cohort`
pub fn resolve<'a>(cohort: &Cohort<'a>, query: &str) -> Resolution<'a> {
    let parsed = Query::parse(query);
    if parsed == Query::Empty {
        return Resolution::Empty;
    }

    if cohort.is_empty() {
        return Resolution::NotFound {
            reason: format!("no finishers at {} m", cohort.distance()),
        };
    }

    let (text, matches): (&str, SmallVec<[&'a RunnerRecord; 4]>) = match parsed {
        Query::Bib(bib) => (
            bib,
            cohort.rows().iter().copied().filter(|r| r.bib == bib).collect(),
        ),
        Query::Name(name) => {
            let needle = name.to_lowercase();
            (
                name,
                cohort
                    .rows()
                    .iter()
                    .copied()
                    .filter(|r| r.name.to_lowercase().contains(&needle))
                    .collect(),
            )
        }
        Query::Empty => unreachable!("empty query returned above"),
    };

    match matches.len() {
        0 => Resolution::NotFound {
            reason: match parsed {
                Query::Bib(_) => format!("bib {} not in cohort", text),
                _ => format!("no runner named like '{}' in cohort", text),
            },
        },
        1 => Resolution::Resolved(matches[0]),
        _ => Resolution::Ambiguous(Ambiguity::new(text, matches)),
    }
}
