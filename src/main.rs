// Sun Oct 18 2026 - Alex

use colored::Colorize;

fn main() {
    if let Err(e) = sfinder::ui::cli::run() {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}
