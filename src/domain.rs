use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, VaxError};

/// One dataset row candidate: an ordered field -> value mapping.
///
/// Insertion order is kept and only matters for output column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, overwriting any previous value in place.
    pub fn enrich_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, key: &str) -> Result<&Value> {
        self.get(key).ok_or_else(|| VaxError::schema(key))
    }

    fn require_str(&self, key: &str) -> Result<String> {
        self.require(key)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| VaxError::schema(key))
    }

    /// Counts may arrive as JSON integers or as integer strings.
    fn require_count(&self, key: &str) -> Result<u64> {
        match self.require(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| VaxError::schema(key))
    }
}

/// The seven columns handed to the dataset append interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationRow {
    pub location: String,
    pub date: String,
    pub vaccine: String,
    pub source_url: String,
    pub total_vaccinations: u64,
    pub people_vaccinated: u64,
    pub people_fully_vaccinated: u64,
}

impl TryFrom<&Record> for VaccinationRow {
    type Error = VaxError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            location: record.require_str("location")?,
            total_vaccinations: record.require_count("total_vaccinations")?,
            people_vaccinated: record.require_count("people_vaccinated")?,
            people_fully_vaccinated: record.require_count("people_fully_vaccinated")?,
            date: record.require_str("date")?,
            source_url: record.require_str("source_url")?,
            vaccine: record.require_str("vaccine")?,
        })
    }
}
