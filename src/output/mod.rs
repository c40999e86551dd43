mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::PhaseProgress;
pub use styling::findings;
pub use summary::print_summary;

use styling::{brand, label};

/// Prints the `TaskLens` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        brand("🔎 TaskLens"),
        label(env!("CARGO_PKG_VERSION")),
        label("Deprecated Azure DevOps Task Audit")
    );
}
