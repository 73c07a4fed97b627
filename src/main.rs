use anyhow::Result;
use tracing::info;

use vax_india::config::Config;
use vax_india::{local_date_now, logger, CsvDataset, DryRunDataset, HttpSource, India};

fn main() -> Result<()> {
    // Load local .env if present
    let _ = dotenvy::dotenv();

    logger::init_tracing();

    let cfg = Config::from_env()?;
    let today = local_date_now(Some(&cfg.tz))?;
    info!(?cfg, %today, "boot");

    let source = HttpSource::new(cfg.http_timeout())?;
    let india = India::with_url(source, cfg.source_url.clone());

    if cfg.dry_run {
        india.export(&mut DryRunDataset)?;
    } else {
        india.export(&mut CsvDataset::new(&cfg.output_dir))?;
    }

    info!("done");
    Ok(())
}
