// Sun Oct 18 2026 - Alex

use super::args::Args;
use crate::fetch::{EnvKeyProvider, ShellFetcher, SourceCatalog};
use crate::orchestrator::{NoopObserver, RunCoordinator, RunObserver, RunReport};
use crate::ui::banner::Banner;
use crate::ui::display::DisplayRenderer;
use crate::ui::progress::{PlainProgress, SourceProgress};
use anyhow::Context;

pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        if args.no_color {
            colored::control::set_override(false);
        }

        self.setup_logging(&args)?;

        if !args.no_banner && !args.json {
            Banner::sfinder().with_color(!args.no_color).print();
        }

        let catalog = self.load_catalog(&args)?;
        let request = args.to_request();
        let fetcher = ShellFetcher::new(
            catalog.clone(),
            request.target.as_deref().unwrap_or_default().trim(),
            Box::new(EnvKeyProvider),
        );
        let coordinator = RunCoordinator::new(catalog, Box::new(fetcher));
        let renderer = DisplayRenderer::new().with_color(!args.no_color);

        let observer: Box<dyn RunObserver> = if args.json {
            Box::new(NoopObserver)
        } else if args.no_progress {
            Box::new(PlainProgress::new(renderer))
        } else {
            Box::new(SourceProgress::new(renderer))
        };

        let report = coordinator.run(&request, observer.as_ref())?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            self.print_report(&report, &renderer);
        }

        Ok(())
    }

    fn setup_logging(&self, args: &Args) -> anyhow::Result<()> {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Warn,
        };

        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()
            .context("Failed to initialise logging")?;

        Ok(())
    }

    fn load_catalog(&self, args: &Args) -> anyhow::Result<SourceCatalog> {
        let mut catalog = SourceCatalog::builtin();
        if let Some(path) = &args.sources {
            let count = catalog
                .merge_file(path)
                .with_context(|| format!("Cannot load sources from {}", path.display()))?;
            log::info!("Loaded {} sources from {}", count, path.display());
        }
        Ok(catalog)
    }

    fn print_report(&self, report: &RunReport, renderer: &DisplayRenderer) {
        for id in &report.unknown_sources {
            println!("{}", renderer.unknown_source(id));
        }
        renderer.print_report_tail(report);
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
