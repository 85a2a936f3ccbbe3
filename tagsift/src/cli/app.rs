use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tagsift",
    version,
    about = "Tagsift - extract KEY=VALUE tags from pull requests and issues",
    long_about = "Tagsift fetches a pull/merge request or issue description from GitHub or GitLab and prints the KEY=VALUE tags embedded in it, typed per configuration, as raw lines or JSON."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse tags from a pull or merge request description
    #[command(about = "Fetch the pull/merge request description and print its tags")]
    Request(ParseArgs),

    /// Parse tags from an issue description
    #[command(about = "Fetch the issue description and print its tags")]
    Issue(ParseArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ParseArgs {
    /// Output format
    #[arg(long, default_value = "raw", help = "Output format, one of: json, raw")]
    pub format: String,

    /// Keys to always serialize as arrays
    #[arg(long, value_delimiter = ',', help = "Tag keys to treat as arrays, e.g. TAG_1,TAG_2")]
    pub array_tags: Vec<String>,

    /// Keys to serialize as plain strings
    #[arg(long, value_delimiter = ',', help = "Tag keys to treat as strings")]
    pub string_tags: Vec<String>,

    /// Keys whose value is coerced to a boolean
    #[arg(long, value_delimiter = ',', help = "Tag keys to coerce to booleans")]
    pub bool_tags: Vec<String>,

    /// Output every tag found, not only the configured ones
    #[arg(long, help = "Emit all extracted tags instead of only the configured ones")]
    pub output_all: bool,

    /// Indent the JSON output (no effect on raw format)
    #[arg(long, help = "Pretty-print the JSON object")]
    pub pretty: bool,

    /// Code review platform; inferred from the CI environment when unset
    #[arg(long, help = "Platform to fetch from, one of: github, gitlab")]
    pub platform: Option<String>,

    /// GitHub repository owner
    #[arg(long, help = "GitHub repository owner, defaults from GITHUB_REPOSITORY")]
    pub github_owner: Option<String>,

    /// GitHub repository name
    #[arg(long, help = "GitHub repository name, defaults from GITHUB_REPOSITORY")]
    pub github_repo: Option<String>,

    /// GitHub API base URL
    #[arg(long, help = "GitHub API base URL, for GitHub Enterprise")]
    pub github_api_url: Option<String>,

    /// Pull request, merge request, or issue number
    #[arg(long, help = "Number of the pull/merge request or issue to fetch")]
    pub number: Option<u64>,

    /// GitLab project id or URL-encoded path
    #[arg(long, help = "GitLab project id, defaults from CI_PROJECT_ID")]
    pub gitlab_project_id: Option<String>,

    /// GitLab API base URL
    #[arg(long, help = "GitLab API base URL, defaults from CI_API_V4_URL")]
    pub gitlab_api_url: Option<String>,

    /// Also append raw-format lines to the GitHub Actions step output file
    #[arg(long, help = "Append raw tags to the file named by GITHUB_OUTPUT")]
    pub export: bool,
}
