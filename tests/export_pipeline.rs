use serde_json::{json, Value};
use vax_india::{CsvDataset, Dataset, India, JsonSource, Result, VaccinationRow, VaxError};

struct FakeSource {
    body: Option<Value>,
}

impl FakeSource {
    fn ok(body: Value) -> Self {
        Self { body: Some(body) }
    }

    fn down() -> Self {
        Self { body: None }
    }
}

impl JsonSource for FakeSource {
    fn get_json(&self, url: &str) -> Result<Value> {
        self.body.clone().ok_or_else(|| VaxError::HttpStatus {
            url: url.to_string(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        })
    }
}

#[derive(Default)]
struct CountingDataset {
    rows: Vec<VaccinationRow>,
}

impl Dataset for CountingDataset {
    fn increment(&mut self, row: VaccinationRow) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }
}

fn body() -> Value {
    json!({
        "testedasof": "2021-05-01",
        "firstdoseadministered": 120,
        "seconddoseadministered": 30,
        "totaldosesadministered": 150
    })
}

#[test]
fn export_appends_exactly_one_row() {
    let source = FakeSource::ok(body());
    let india = India::with_url(source, "http://localhost/data.json");
    let mut ds = CountingDataset::default();

    india.export(&mut ds).unwrap();

    assert_eq!(
        ds.rows,
        vec![VaccinationRow {
            location: "India".into(),
            date: "2021-05-01".into(),
            vaccine: "Covaxin, Oxford/AstraZeneca, Sputnik V".into(),
            source_url: "https://covid19india.org".into(),
            total_vaccinations: 150,
            people_vaccinated: 120,
            people_fully_vaccinated: 30,
        }]
    );
}

#[test]
fn network_failure_appends_nothing() {
    let india = India::new(FakeSource::down());
    let mut ds = CountingDataset::default();

    let err = india.export(&mut ds).unwrap_err();

    assert!(matches!(err, VaxError::HttpStatus { .. }));
    assert!(ds.rows.is_empty());
}

#[test]
fn missing_field_appends_nothing() {
    let mut partial = body();
    partial.as_object_mut().unwrap().remove("totaldosesadministered");
    let india = India::new(FakeSource::ok(partial));
    let mut ds = CountingDataset::default();

    let err = india.export(&mut ds).unwrap_err();

    assert!(matches!(err, VaxError::Schema { ref field } if field == "totaldosesadministered"));
    assert!(ds.rows.is_empty());
}

#[test]
fn malformed_count_appends_nothing() {
    let mut bad = body();
    bad["firstdoseadministered"] = json!("n/a");
    let india = India::new(FakeSource::ok(bad));
    let mut ds = CountingDataset::default();

    assert!(india.export(&mut ds).is_err());
    assert!(ds.rows.is_empty());
}

#[test]
fn export_to_csv_is_incremental() {
    let dir = tempfile::tempdir().unwrap();
    let mut ds = CsvDataset::new(dir.path());

    India::new(FakeSource::ok(body())).export(&mut ds).unwrap();
    India::new(FakeSource::ok(body())).export(&mut ds).unwrap();

    let mut next = body();
    next["testedasof"] = json!("2021-05-02");
    next["totaldosesadministered"] = json!(160);
    India::new(FakeSource::ok(next)).export(&mut ds).unwrap();

    let rows = ds.load("India").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2021-05-01");
    assert_eq!(rows[1].total_vaccinations, 160);
}

#[test]
fn failed_export_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut ds = CsvDataset::new(dir.path());

    assert!(India::new(FakeSource::down()).export(&mut ds).is_err());
    assert!(!ds.path_for("India").exists());
}
