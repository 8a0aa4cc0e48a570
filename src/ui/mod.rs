// Sun Oct 18 2026 - Alex

pub mod banner;
pub mod cli;
pub mod display;
pub mod progress;

pub use banner::Banner;
pub use cli::{Args, CommandHandler};
pub use display::DisplayRenderer;
pub use progress::{PlainProgress, SourceProgress};
