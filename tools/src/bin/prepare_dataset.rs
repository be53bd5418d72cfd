use clap::Parser;
use dataset_core::PrepareConfig;
use tools::config::PrepareArgs;
use tracing::info;

fn main() -> anyhow::Result<()> {
    tools::init();

    let config = PrepareConfig::from(PrepareArgs::parse());
    info!(
        "Preparing {} into {}",
        config.dataset_path.display(),
        config.output_path.display()
    );

    let report = dataset_core::prepare(&config)?;
    info!("{} clips ready", report.accepted);
    // Machine-readable summary on stdout, logs stay on stderr
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
