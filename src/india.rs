use serde_json::Value;
use tracing::info;

use crate::dataset::Dataset;
use crate::domain::{Record, VaccinationRow};
use crate::error::{Result, VaxError};
use crate::source::JsonSource;

pub const LOCATION: &str = "India";
pub const SOURCE_URL: &str = "https://api.covid19india.org/data.json";
pub const SOURCE_URL_REF: &str = "https://covid19india.org";
pub const VACCINE: &str = "Covaxin, Oxford/AstraZeneca, Sputnik V";

/// Source field -> record field.
const FIELDS: [(&str, &str); 4] = [
    ("testedasof", "date"),
    ("firstdoseadministered", "people_vaccinated"),
    ("seconddoseadministered", "people_fully_vaccinated"),
    ("totaldosesadministered", "total_vaccinations"),
];

pub struct India<S> {
    source: S,
    source_url: String,
}

impl<S: JsonSource> India<S> {
    pub fn new(source: S) -> Self {
        Self::with_url(source, SOURCE_URL)
    }

    pub fn with_url(source: S, source_url: impl Into<String>) -> Self {
        Self {
            source,
            source_url: source_url.into(),
        }
    }

    /// Fetches the latest counts. Values are copied as published.
    pub fn read(&self) -> Result<Record> {
        let data = self.source.get_json(&self.source_url)?;
        project(&data)
    }

    /// Fetch, tag and hand one row to `dataset`. Nothing reaches the dataset
    /// unless every step succeeds.
    pub fn export(&self, dataset: &mut impl Dataset) -> Result<()> {
        let data = enrich(self.read()?);
        let row = VaccinationRow::try_from(&data)?;
        info!(location = %row.location, date = %row.date, total = row.total_vaccinations, "india.export");
        dataset.increment(row)
    }
}

fn project(data: &Value) -> Result<Record> {
    FIELDS.iter().try_fold(Record::new(), |record, (from, to)| {
        let value = data.get(from).ok_or_else(|| VaxError::schema(*from))?;
        Ok(record.enrich_data(to, value.clone()))
    })
}

pub fn enrich(record: Record) -> Record {
    pipe_source(pipe_vaccine(pipe_location(record)))
}

fn pipe_location(record: Record) -> Record {
    record.enrich_data("location", LOCATION)
}

fn pipe_vaccine(record: Record) -> Record {
    record.enrich_data("vaccine", VACCINE)
}

fn pipe_source(record: Record) -> Record {
    record.enrich_data("source_url", SOURCE_URL_REF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Value);

    impl JsonSource for Fixed {
        fn get_json(&self, _url: &str) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    fn payload() -> Value {
        json!({
            "testedasof": "2021-05-01",
            "firstdoseadministered": 120_000_000u64,
            "seconddoseadministered": "30000000",
            "totaldosesadministered": 150_000_000u64,
            "unrelated": true,
        })
    }

    #[test]
    fn read_copies_fields_verbatim() {
        let record = India::new(Fixed(payload())).read().unwrap();
        assert_eq!(record.get("date"), Some(&json!("2021-05-01")));
        assert_eq!(record.get("people_vaccinated"), Some(&json!(120_000_000u64)));
        assert_eq!(record.get("people_fully_vaccinated"), Some(&json!("30000000")));
        assert_eq!(record.get("total_vaccinations"), Some(&json!(150_000_000u64)));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn read_reports_each_missing_field() {
        for (from, _) in FIELDS {
            let mut body = payload();
            body.as_object_mut().unwrap().remove(from);
            let err = India::new(Fixed(body)).read().unwrap_err();
            assert!(matches!(err, VaxError::Schema { ref field } if field == from), "{err}");
        }
    }

    #[test]
    fn enrich_is_idempotent() {
        let once = enrich(India::new(Fixed(payload())).read().unwrap());
        let twice = enrich(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.get("location"), Some(&json!("India")));
        assert_eq!(once.get("vaccine"), Some(&json!(VACCINE)));
        assert_eq!(once.get("source_url"), Some(&json!(SOURCE_URL_REF)));
        assert_eq!(once.len(), 7);
    }
}
