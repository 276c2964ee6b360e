use crate::error::PapersError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The eight free-text fields of a paper note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Authors,
    Year,
    Found,
    Notes,
    Points,
    OrgLink,
    HlLink,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Title,
        Field::Authors,
        Field::Year,
        Field::Found,
        Field::Notes,
        Field::Points,
        Field::OrgLink,
        Field::HlLink,
    ];

    /// Name of the field as persisted in the snapshot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Authors => "authors",
            Field::Year => "year",
            Field::Found => "found",
            Field::Notes => "notes",
            Field::Points => "points",
            Field::OrgLink => "org_link",
            Field::HlLink => "hl_link",
        }
    }

    /// Human label used by the terminal views.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Authors => "Authors",
            Field::Year => "Year",
            Field::Found => "How I found it",
            Field::Notes => "My notes",
            Field::Points => "Points to revisit",
            Field::OrgLink => "Original link",
            Field::HlLink => "Highlighted copy",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = PapersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| PapersError::Api(format!("Unknown field: {}", s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperFields {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub found: String,
    pub notes: String,
    pub points: String,
    pub org_link: String,
    pub hl_link: String,
}

impl PaperFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Authors => &self.authors,
            Field::Year => &self.year,
            Field::Found => &self.found,
            Field::Notes => &self.notes,
            Field::Points => &self.points,
            Field::OrgLink => &self.org_link,
            Field::HlLink => &self.hl_link,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Authors => &mut self.authors,
            Field::Year => &mut self.year,
            Field::Found => &mut self.found,
            Field::Notes => &mut self.notes,
            Field::Points => &mut self.points,
            Field::OrgLink => &mut self.org_link,
            Field::HlLink => &mut self.hl_link,
        };
        *slot = value;
    }
}

/// A partial set of fields. `Some` entries overwrite, `None` entries are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<String>,
    pub found: Option<String>,
    pub notes: Option<String>,
    pub points: Option<String>,
    pub org_link: Option<String>,
    pub hl_link: Option<String>,
}

impl RecordPatch {
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        *self.slot(field) = Some(value.into());
        self
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Title => &self.title,
            Field::Authors => &self.authors,
            Field::Year => &self.year,
            Field::Found => &self.found,
            Field::Notes => &self.notes,
            Field::Points => &self.points,
            Field::OrgLink => &self.org_link,
            Field::HlLink => &self.hl_link,
        };
        value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Merge this patch over `fields`, key by key.
    pub fn apply(&self, fields: &mut PaperFields) {
        for field in Field::ALL {
            if let Some(value) = self.get(field) {
                fields.set(field, value.to_string());
            }
        }
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Authors => &mut self.authors,
            Field::Year => &mut self.year,
            Field::Found => &mut self.found,
            Field::Notes => &mut self.notes,
            Field::Points => &mut self.points,
            Field::OrgLink => &mut self.org_link,
            Field::HlLink => &mut self.hl_link,
        }
    }
}

/// One saved paper note.
///
/// Snapshots written by the browser edition of the catalog key records by `_id`
/// and carry extra bookkeeping keys; both are accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: PaperFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(fields: PaperFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            fields,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    /// Title for display purposes; untitled records still need a name in messages.
    pub fn display_title(&self) -> &str {
        if self.fields.title.trim().is_empty() {
            "(untitled)"
        } else {
            &self.fields.title
        }
    }
}
