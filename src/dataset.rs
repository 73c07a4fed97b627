use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::domain::VaccinationRow;
use crate::error::{Result, VaxError};

pub const COLUMNS: [&str; 7] = [
    "location",
    "date",
    "vaccine",
    "source_url",
    "total_vaccinations",
    "people_vaccinated",
    "people_fully_vaccinated",
];

/// Append interface of the incremental dataset, keyed by `(location, date)`.
pub trait Dataset {
    fn increment(&mut self, row: VaccinationRow) -> Result<()>;
}

/// One CSV file per location under `dir`.
pub struct CsvDataset {
    dir: PathBuf,
}

impl CsvDataset {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, location: &str) -> PathBuf {
        self.dir.join(format!("{location}.csv"))
    }

    pub fn load(&self, location: &str) -> Result<Vec<VaccinationRow>> {
        let path = self.path_for(location);
        if !path.exists() {
            return Ok(vec![]);
        }
        let csv_err = |e| VaxError::DatasetCsv(path.clone(), e);

        let mut reader = csv::Reader::from_path(&path).map_err(csv_err)?;
        let header = reader.headers().map_err(csv_err)?;
        if header.is_empty() {
            return Ok(vec![]);
        }
        if !header.iter().eq(COLUMNS) {
            return Err(VaxError::DatasetFormat {
                path: path.clone(),
                line: 1,
                message: format!("unexpected header {header:?}"),
            });
        }

        reader
            .deserialize::<VaccinationRow>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(csv_err)
    }

    fn save(&self, location: &str, rows: &[VaccinationRow]) -> Result<()> {
        let path = self.path_for(location);
        fs::create_dir_all(&self.dir).map_err(|e| VaxError::DatasetIo(self.dir.clone(), e))?;

        let mut writer = csv::Writer::from_path(&path).map_err(|e| VaxError::DatasetCsv(path.clone(), e))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| VaxError::DatasetCsv(path.clone(), e))?;
        }
        writer.flush().map_err(|e| VaxError::DatasetIo(path, e))
    }
}

impl Dataset for CsvDataset {
    fn increment(&mut self, row: VaccinationRow) -> Result<()> {
        let location = row.location.clone();
        let mut rows = self.load(&location)?;

        match rows.iter_mut().find(|r| r.date == row.date) {
            Some(existing) => {
                info!(location = %location, date = %row.date, "dataset.replace");
                *existing = row;
            }
            None => {
                info!(location = %location, date = %row.date, "dataset.append");
                rows.push(row);
            }
        }
        rows.sort_by(|a, b| a.date.cmp(&b.date));

        self.save(&location, &rows)
    }
}

/// Logs rows instead of persisting them.
#[derive(Debug, Default)]
pub struct DryRunDataset;

impl Dataset for DryRunDataset {
    fn increment(&mut self, row: VaccinationRow) -> Result<()> {
        warn!(?row, "dry_run: dataset left untouched");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryDataset {
    pub rows: Vec<VaccinationRow>,
}

impl Dataset for MemoryDataset {
    fn increment(&mut self, row: VaccinationRow) -> Result<()> {
        self.rows.retain(|r| !(r.location == row.location && r.date == row.date));
        self.rows.push(row);
        Ok(())
    }
}
