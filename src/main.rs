//! Telebench CLI entry point.

use telebench::cli::{self, Cli};
use telebench::core::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    cli::execute(cli).await
}
