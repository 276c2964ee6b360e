//! # Record Selection
//!
//! Records are identified by UUIDs in storage, which are unpleasant to type. Listings
//! therefore number records 1, 2, 3... in store order, and commands accept either that
//! position or an id (full, or any unambiguous prefix):
//!
//! ```text
//! papers view 2
//! papers view 6f1c1ad4
//! papers edit 6f1c1ad4-8b59-4b55-9d6a-7d8f5d7f1b2a --year 2017
//! ```
//!
//! Positions always refer to the full, unfiltered listing, so `papers list --search x`
//! shows the same numbers that `papers view` accepts.

use crate::error::{PapersError, Result};
use crate::model::Record;
use std::str::FromStr;
use uuid::Uuid;

/// A record together with its 1-based position in the full listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub index: usize,
    pub record: Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelector {
    Index(usize),
    Id(Uuid),
    IdPrefix(String),
}

impl FromStr for RecordSelector {
    type Err = PapersError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(RecordSelector::Id(id));
        }
        // Short all-digit input is a position; ids are at least four hex chars
        if !s.is_empty() && s.len() < 4 && s.chars().all(|c| c.is_ascii_digit()) {
            let n: usize = s
                .parse()
                .map_err(|_| PapersError::Api(format!("Invalid index: {}", s)))?;
            return Ok(RecordSelector::Index(n));
        }
        if s.len() >= 4 && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Ok(RecordSelector::IdPrefix(s.to_lowercase()));
        }
        Err(PapersError::Api(format!(
            "Invalid selector '{}': expected a list number or a record id",
            s
        )))
    }
}

/// Number `records` 1..=n in the order given.
pub fn index_records(records: Vec<Record>) -> Vec<DisplayRecord> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| DisplayRecord {
            index: i + 1,
            record,
        })
        .collect()
}

/// Find the single entry of `indexed` that `selector` names.
pub fn resolve<'a>(
    indexed: &'a [DisplayRecord],
    selector: &RecordSelector,
) -> Result<&'a DisplayRecord> {
    match selector {
        RecordSelector::Index(n) => indexed.iter().find(|dr| dr.index == *n).ok_or_else(|| {
            PapersError::Api(format!(
                "Index {} out of range (there are {} records)",
                n,
                indexed.len()
            ))
        }),
        RecordSelector::Id(id) => indexed
            .iter()
            .find(|dr| dr.record.id == *id)
            .ok_or(PapersError::RecordNotFound(*id)),
        RecordSelector::IdPrefix(prefix) => {
            let mut hits = indexed
                .iter()
                .filter(|dr| dr.record.id.to_string().starts_with(prefix.as_str()));
            match (hits.next(), hits.next()) {
                (Some(hit), None) => Ok(hit),
                (None, _) => Err(PapersError::Api(format!(
                    "No record id starts with '{}'",
                    prefix
                ))),
                (Some(_), Some(_)) => Err(PapersError::Api(format!(
                    "Id prefix '{}' is ambiguous",
                    prefix
                ))),
            }
        }
    }
}
