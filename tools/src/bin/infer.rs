use clap::Parser;
use infer_core::{F5CliFactory, InferConfig};
use tools::config::InferArgs;

fn main() -> anyhow::Result<()> {
    tools::init();

    let config = InferConfig::from(InferArgs::parse());
    let device = infer_core::select_device();
    infer_core::run(&config, &F5CliFactory::from_env(), &device)?;
    Ok(())
}
