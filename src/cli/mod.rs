//! CLI command handling
//!
//! Resolves configuration, picks the catalog, and hands it to the driver.

use std::io::Write;

use crate::catalog::{Catalog, Scenario};
use crate::commands::RunArgs;
use crate::common::config::{Config, Settings, TargetOverride};
use crate::common::Result;
use crate::driver::Driver;
use crate::wire::codec;

/// Run the driver according to the CLI arguments
pub async fn dispatch(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let (catalog, scenario_target) = match &args.scenario {
        Some(path) => {
            let scenario = Scenario::load(path)?;
            tracing::info!("Loaded scenario '{}' ({} cases)", scenario.name, scenario.cases.len());
            if let Some(desc) = &scenario.description {
                tracing::debug!("{}", desc);
            }
            (scenario.catalog()?, scenario.target_override())
        }
        None => (Catalog::reference(), TargetOverride::default()),
    };

    let settings = Settings::resolve(&config, &[&scenario_target, &args.target_override()]);

    if args.list {
        return list_cases(&catalog, &settings, &mut std::io::stdout());
    }

    tracing::info!("Running {} cases against {}", catalog.len(), settings.addr());
    let summary = Driver::new(settings).run_all(&catalog).await?;
    tracing::info!("Completed {} cases", summary.cases_run);

    Ok(())
}

/// Print each case as it would be sent
pub fn list_cases<W: Write>(catalog: &Catalog, settings: &Settings, out: &mut W) -> Result<()> {
    for (position, descriptor) in catalog.cases() {
        let body = codec::encode_body(descriptor, settings.separators)?;
        writeln!(out, "{:>3}. {}", position, codec::decode(&body))?;
    }
    Ok(())
}
