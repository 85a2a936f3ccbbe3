//! Parse tags from an issue description

use anyhow::Result;
use tracing::debug;

use crate::cli::app::ParseArgs;
use crate::cli::commands::{self, Target};

/// Execute the issue command
pub async fn execute(args: ParseArgs) -> Result<()> {
    debug!(platform = ?args.platform, "starting issue parse");
    commands::run(Target::Issue, &args).await
}
