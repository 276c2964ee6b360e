use crate::error::{PapersError, Result};
use crate::model::{Field, Record};

/// Query over the record collection.
///
/// The default filter matches every record. Field constraints are exact matches and
/// all of them must hold; the search term is a case-insensitive substring match
/// against any of the eight fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    constraints: Vec<(Field, String)>,
    search: Option<String>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: Field, value: impl Into<String>) -> Self {
        self.constraints.push((field, value.into()));
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.trim().is_empty() {
            self.search = Some(term.to_lowercase());
        }
        self
    }

    pub fn is_match_all(&self) -> bool {
        self.constraints.is_empty() && self.search.is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        let fields_match = self
            .constraints
            .iter()
            .all(|(field, value)| record.fields.get(*field) == value);
        if !fields_match {
            return false;
        }

        match &self.search {
            Some(term) => Field::ALL
                .iter()
                .any(|f| record.fields.get(*f).to_lowercase().contains(term)),
            None => true,
        }
    }
}

/// Parse a `field=value` constraint as typed on the command line.
pub fn parse_constraint(input: &str) -> Result<(Field, String)> {
    let (field, value) = input.split_once('=').ok_or_else(|| {
        PapersError::Api(format!(
            "Invalid filter '{}': expected FIELD=VALUE",
            input
        ))
    })?;
    Ok((field.parse()?, value.to_string()))
}
