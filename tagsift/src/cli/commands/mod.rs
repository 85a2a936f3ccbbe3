//! Subcommand executors and their shared plumbing

pub mod issue;
pub mod request;

use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tagsift_core::platform::{self, Platform, PlatformConfig, PlatformType};
use tagsift_core::tags::{OutputFormat, TagConfig, TagParser};
use tracing::debug;

use crate::cli::app::ParseArgs;

/// Which document a subcommand fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Request,
    Issue,
}

/// Fetch the target document, parse its tags, and write the result to
/// stdout (and the step output file when exporting).
pub(crate) async fn run(target: Target, args: &ParseArgs) -> Result<()> {
    // Both configs are validated before any fetch happens.
    let config = tag_config(args)?;
    let platform_config = platform_config(args)?;
    let client = platform::new_platform(&platform_config)?;

    let body = fetch_body(target, client.as_ref()).await?;
    let parser = TagParser::new(config.clone());
    let output = parser.parse_logged(&body).context("failed to parse tags")?;

    print!("{output}");
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }

    if args.export {
        let raw = if config.format == OutputFormat::Raw {
            output
        } else {
            let raw_config = TagConfig { format: OutputFormat::Raw, ..config };
            TagParser::new(raw_config)
                .parse_logged(&body)
                .context("failed to render tags for export")?
        };
        let path = std::env::var("GITHUB_OUTPUT")
            .context("--export requires the GITHUB_OUTPUT environment variable")?;
        append_step_output(Path::new(&path), &raw)
            .with_context(|| format!("failed to export tags to {path}"))?;
    }

    Ok(())
}

pub(crate) async fn fetch_body(target: Target, client: &dyn Platform) -> Result<String> {
    let body = match target {
        Target::Request => {
            client.request_body().await.context("failed to get request body")?
        }
        Target::Issue => client.issue_body().await.context("failed to get issue body")?,
    };
    debug!(bytes = body.len(), "fetched document body");
    Ok(body)
}

/// Build the tag engine config from flags. Tag keys are normalized to
/// uppercase here so the sets match the matcher's normalized keys.
pub(crate) fn tag_config(args: &ParseArgs) -> Result<TagConfig> {
    let format: OutputFormat = args.format.parse()?;
    Ok(TagConfig {
        array_tags: normalize_keys(&args.array_tags),
        string_tags: normalize_keys(&args.string_tags),
        bool_tags: normalize_keys(&args.bool_tags),
        output_all: args.output_all,
        format,
        pretty_print: args.pretty,
    })
}

fn normalize_keys(keys: &[String]) -> BTreeSet<String> {
    keys.iter()
        .map(|key| key.trim().to_uppercase())
        .filter(|key| !key.is_empty())
        .collect()
}

/// Resolve platform config from the environment, then apply flag
/// overrides. An explicit --number forces a fetch even when the event
/// payload carried a body.
pub(crate) fn platform_config(args: &ParseArgs) -> Result<PlatformConfig> {
    let platform_type = PlatformType::resolve(args.platform.as_deref())?;
    let mut config = PlatformConfig::from_env(platform_type)?;

    if let Some(owner) = &args.github_owner {
        config.github.owner = owner.clone();
    }
    if let Some(repo) = &args.github_repo {
        config.github.repo = repo.clone();
    }
    if let Some(api_url) = &args.github_api_url {
        config.github.api_url = api_url.clone();
    }
    if let Some(project_id) = &args.gitlab_project_id {
        config.gitlab.project_id = project_id.clone();
    }
    if let Some(api_url) = &args.gitlab_api_url {
        config.gitlab.api_url = api_url.clone();
    }
    if let Some(number) = args.number {
        config.github.pull_request_number = Some(number);
        config.github.issue_number = Some(number);
        config.github.pull_request_body = None;
        config.gitlab.merge_request_iid = Some(number);
        config.gitlab.issue_iid = Some(number);
    }

    Ok(config)
}

fn append_step_output(path: &Path, raw: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(raw.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagsift_core::platform::MockPlatform;

    fn args() -> ParseArgs {
        ParseArgs { format: "raw".to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn test_fetch_body_dispatches_request() {
        let mock = MockPlatform::with_request_body("TAG_1=a\n");
        let body = fetch_body(Target::Request, &mock).await.unwrap();
        assert_eq!(body, "TAG_1=a\n");
        assert_eq!(mock.calls(), vec!["request_body"]);
    }

    #[tokio::test]
    async fn test_fetch_body_dispatches_issue() {
        let mock = MockPlatform::with_issue_body("TAG_2=b\n");
        let body = fetch_body(Target::Issue, &mock).await.unwrap();
        assert_eq!(body, "TAG_2=b\n");
        assert_eq!(mock.calls(), vec!["issue_body"]);
    }

    #[tokio::test]
    async fn test_fetch_body_propagates_platform_errors() {
        let mock = MockPlatform::with_request_error("boom");
        let err = fetch_body(Target::Request, &mock).await.unwrap_err();
        assert!(err.to_string().contains("failed to get request body"));
    }

    #[tokio::test]
    async fn test_request_flow_end_to_end() {
        let mock = MockPlatform::with_request_body(
            "A description of a PR.\n\nSome details about a PR. TAG_1=my-tag-value\n\nTAG_2=123143\n",
        );
        let config = tag_config(&ParseArgs { output_all: true, ..args() }).unwrap();
        let body = fetch_body(Target::Request, &mock).await.unwrap();
        let output = TagParser::new(config).parse_logged(&body).unwrap();
        assert_eq!(output, "TAG_2=123143\n");
    }

    #[test]
    fn test_tag_config_normalizes_keys() {
        let parse_args = ParseArgs {
            array_tags: vec!["tag_1".to_string(), " TAG_2 ".to_string(), String::new()],
            ..args()
        };
        let config = tag_config(&parse_args).unwrap();
        assert!(config.array_tags.contains("TAG_1"));
        assert!(config.array_tags.contains("TAG_2"));
        assert_eq!(config.array_tags.len(), 2);
    }

    #[test]
    fn test_tag_config_rejects_bad_format() {
        let parse_args = ParseArgs { format: "yaml".to_string(), ..args() };
        assert!(tag_config(&parse_args).is_err());
    }

    #[test]
    fn test_append_step_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        append_step_output(&path, "TAG_1=a\n").unwrap();
        append_step_output(&path, "TAG_2=b\n").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "TAG_1=a\nTAG_2=b\n");
    }
}
