//! Cairn command line host.
//!
//! Loads the built-in demo extensions through the content engine and prints
//! the merged registries.

mod cli;
mod demo;
mod report;

use anyhow::Context;
use cairn_content::{Color, Engine, EngineConfig, EventTextQueue, EventTextRequest, EventTextSink};
use cairn_registry::populate_slots;
use clap::Parser;
use tracing::info;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let mut config = match &cli.config {
		Some(path) => EngineConfig::load(path).with_context(|| format!("failed to load config from {}", path.display()))?,
		None => EngineConfig::default(),
	};
	setup_tracing(cli.verbose, config.log_filter.as_deref());

	if cli.sequential {
		config.pipeline.concurrent_extensions = false;
	}
	let max_ticks = config.pipeline.max_ticks;

	let demo = demo::build();
	let mut engine = Engine::new(config);
	for (status, material) in demo.overlays {
		engine.overlays().register(&status, material);
	}
	for extension in demo.extensions {
		engine.add_extension(extension)?;
	}

	let summary = match max_ticks {
		Some(max) => engine.load_ticked(max)?,
		None => engine.load_all().await?,
	};
	info!(failed = summary.failed_units(), lost = summary.lost_extensions, "content loaded");

	let slots = populate_slots(&demo::STATUSES, &engine.pack().status_defs);

	let banners = EventTextQueue::new();
	let color = if summary.failed_units() == 0 { Color::CYAN } else { Color::rgb(1.0, 0.4, 0.2) };
	banners.enqueue(EventTextRequest::new("CAIRN_CONTENT_READY", color, 4.5));

	report::print_extensions(&summary);
	report::print_pack(engine.pack());
	report::print_equipment(&engine);
	report::print_overlays(&engine);
	println!("slots: {} assigned, {} missing", slots.assigned, slots.missing.len());
	while let Some(banner) = banners.pop() {
		report::print_banner(&banner);
	}

	Ok(())
}

fn setup_tracing(verbose: bool, configured: Option<&str>) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match configured {
		Some(directive) => EnvFilter::new(directive),
		None if verbose => EnvFilter::new("cairn=debug,cairn_content=debug,cairn_registry=debug,info"),
		None => EnvFilter::new("info"),
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(true).init();
}
