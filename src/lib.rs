pub mod cli;
pub mod config;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use config::Params;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let params = Params::resolve(args)?;

    // 1. ── Parse + Process ────────────────────────────────────────────
    let converted = processor::run(&params)
        .with_context(|| format!("Converting {}", params.input.display()))?;

    // 2. ── Write outputs ──────────────────────────────────────────────
    if let Some(dir) = params.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Creating {}", dir.display()))?;
    }

    let name = writer::symbol_name(&params.output);
    writer::c::emit(&converted, &name, &params.output).with_context(|| "Writing C header")?;
    writer::asm::emit(&converted, &name, &params.output)
        .with_context(|| "Writing assembly source")?;
    if params.binary {
        writer::bin::emit(&converted, &params.output)
            .with_context(|| "Writing binary artifacts")?;
    }

    info!("Wrote `{name}` to {}", params.output.display());
    Ok(())
}
