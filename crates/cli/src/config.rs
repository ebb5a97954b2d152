//! Flag/environment parsing and validation.
//!
//! Raw CLI input becomes a [`RunConfig`] here, before any API access. The
//! token and organization list may come from flags or from the environment
//! (including a `.env` file loaded at startup); validation is identical
//! either way.

use std::path::PathBuf;

use clap::Parser;

use report::{OrgName, ReportError, RunConfig, Threshold};

#[derive(Parser, Debug)]
#[command(
    name = "dormant",
    author,
    version,
    about = "Per-organization GitHub activity report: classifies users as active, inactive, or never-active",
    long_about = None
)]
pub struct Cli {
    /// GitHub API token used for every query.
    #[arg(long, env = "GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Organization names to process, comma-separated or repeated.
    #[arg(long = "orgs", env = "ORG_NAMES", value_delimiter = ',')]
    pub orgs: Vec<String>,

    /// Days without activity before a user counts as inactive.
    #[arg(long, env = "DAYS_INACTIVE_THRESHOLD", default_value_t = Threshold::DEFAULT_DAYS)]
    pub threshold_days: u32,

    /// Directory the report files are written into.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// GraphQL endpoint (override for GitHub Enterprise or testing).
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = github::GITHUB_GRAPHQL_URL)]
    pub api_url: String,

    /// Suppress console progress output (logs are unaffected).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Validated configuration for the whole invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub run: RunConfig,
    pub output_dir: PathBuf,
    pub api_url: String,
    pub quiet: bool,
}

/// Validates raw CLI input into an [`AppConfig`].
pub fn load(cli: Cli) -> Result<AppConfig, ReportError> {
    let organizations: Vec<OrgName> = cli
        .orgs
        .iter()
        .filter_map(|name| OrgName::new(name.trim()))
        .collect();

    let threshold = Threshold::new(cli.threshold_days).ok_or(ReportError::Configuration {
        message: "threshold must be a positive number of days".to_string(),
    })?;

    let run = RunConfig::new(cli.token, organizations, threshold)?;

    Ok(AppConfig {
        run,
        output_dir: cli.output_dir,
        api_url: cli.api_url,
        quiet: cli.quiet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dormant").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn comma_separated_orgs_are_split_and_trimmed() {
        let cfg = load(cli(&["--token", "tok", "--orgs", "acme, globex ,,initech"])).unwrap();
        let names: Vec<_> = cfg
            .run
            .organizations()
            .iter()
            .map(|o| o.as_str().to_string())
            .collect();
        assert_eq!(names, ["acme", "globex", "initech"]);
    }

    // Constructed directly so ambient GITHUB_TOKEN / ORG_NAMES variables
    // cannot leak into the assertion.
    fn raw(token: &str, orgs: &[&str]) -> Cli {
        Cli {
            token: token.to_string(),
            orgs: orgs.iter().map(ToString::to_string).collect(),
            threshold_days: Threshold::DEFAULT_DAYS,
            output_dir: PathBuf::from("."),
            api_url: github::GITHUB_GRAPHQL_URL.to_string(),
            quiet: false,
        }
    }

    #[test]
    fn missing_orgs_is_a_configuration_error() {
        let err = load(raw("tok", &[])).unwrap_err();
        assert!(matches!(err, ReportError::Configuration { .. }));
    }

    #[test]
    fn missing_token_is_a_configuration_error() {
        let err = load(raw("", &["acme"])).unwrap_err();
        assert!(matches!(err, ReportError::Configuration { .. }));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let err = load(cli(&["--token", "tok", "--orgs", "acme", "--threshold-days", "0"]))
            .unwrap_err();
        assert!(matches!(err, ReportError::Configuration { .. }));
    }

    #[test]
    fn threshold_defaults_to_sixty_days() {
        let cfg = load(cli(&["--token", "tok", "--orgs", "acme"])).unwrap();
        assert_eq!(cfg.run.threshold().as_days(), 60);
    }
}
