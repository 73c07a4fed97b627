pub mod config;
pub mod dataset;
pub mod dates;
pub mod domain;
pub mod error;
pub mod india;
pub mod locale;
pub mod logger;
pub mod source;
pub mod time;

pub use dataset::{CsvDataset, Dataset, DryRunDataset, MemoryDataset};
pub use dates::{extract_date, normalize_date_sequence, DATE_FORMAT};
pub use domain::{Record, VaccinationRow};
pub use error::{Result, VaxError};
pub use india::India;
pub use locale::{current_locale, LocaleContext};
pub use source::{HttpSource, JsonSource};
pub use time::{local_date_now, today_for_timezone};
