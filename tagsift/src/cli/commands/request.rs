//! Parse tags from a pull or merge request description

use anyhow::Result;
use tracing::debug;

use crate::cli::app::ParseArgs;
use crate::cli::commands::{self, Target};

/// Execute the request command
pub async fn execute(args: ParseArgs) -> Result<()> {
    debug!(platform = ?args.platform, "starting request parse");
    commands::run(Target::Request, &args).await
}
