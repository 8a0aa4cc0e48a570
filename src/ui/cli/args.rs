// Sun Oct 18 2026 - Alex

use crate::orchestrator::RunRequest;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sfinder")]
#[command(version)]
#[command(about = "Runs subdomain sources in parallel and tracks what each one adds", long_about = None)]
pub struct Args {
    /// Output folder name
    #[arg(short = 'f', long = "folder")]
    pub folder: PathBuf,

    /// Target domain
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Compare unique subdomains found per tool
    #[arg(short, long)]
    pub compare: bool,

    /// Run specific tool(s), comma-separated (e.g., subfinder,assetfinder)
    #[arg(short, long)]
    pub tools: Option<String>,

    /// JSON file adding or overriding source commands
    #[arg(long)]
    pub sources: Option<PathBuf>,

    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    #[arg(long)]
    pub no_banner: bool,

    #[arg(long)]
    pub no_color: bool,

    #[arg(long)]
    pub no_progress: bool,

    /// Print the run report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn to_request(&self) -> RunRequest {
        let mut request = RunRequest::new(self.folder.clone()).with_compare(self.compare);
        if let Some(domain) = &self.domain {
            request = request.with_target(domain);
        }
        if let Some(tools) = &self.tools {
            request = request.with_selection(RunRequest::parse_selection(tools));
        }
        request
    }
}
