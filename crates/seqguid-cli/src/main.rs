#![doc = include_str!("../README.md")]

mod config;

use std::{
    fmt::Write as _,
    io::{self, BufWriter, Write},
};

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, CliConfig, Format};
use seqguid::{GeneratorRegistry, GuidGenerator, IdFactory, Layout, Optimization};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_logging();

    let registry = GeneratorRegistry::system();
    let (generator, layout): (Box<dyn GuidGenerator>, Option<Layout>) = match config.plan {
        Some((generator_config, layout)) => {
            let generator = registry
                .get_or_create(generator_config)
                .with_context(|| format!("failed to create a generator for {generator_config}"))?
                .with_layout(layout);
            tracing::info!(
                optimization = %config.optimization,
                node = ?generator.node(),
                %layout,
                "generator ready"
            );
            (Box::new(generator), Some(layout))
        }
        None => {
            let factory = IdFactory::new(&registry, Optimization::None)
                .context("failed to create a random id factory")?;
            (Box::new(factory), None)
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..config.count {
        let id = generator.new_id();
        writeln!(out, "{}", render(id, layout, config.format))?;
    }
    out.flush()?;

    Ok(())
}

/// Logs go to stderr so stdout carries identifiers only.
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn render(id: Uuid, layout: Option<Layout>, format: Format) -> String {
    match format {
        Format::Text => id.hyphenated().to_string(),
        Format::StorageHex => {
            let bytes = match layout {
                Some(layout) => layout.storage_bytes(&id),
                None => *id.as_bytes(),
            };
            bytes.iter().fold(String::with_capacity(32), |mut hex, b| {
                let _ = write!(hex, "{b:02x}");
                hex
            })
        }
    }
}
