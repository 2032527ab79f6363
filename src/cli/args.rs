use crate::constants::exit_codes;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// CLI arguments for slimbridge.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base directory for template lookup and `include`.
    #[arg(value_name = "INCLUDE_DIR")]
    pub include_dir: String,

    /// Template path relative to INCLUDE_DIR, or a caller's temp file.
    #[arg(value_name = "TEMPLATE_PATH")]
    pub template_path: String,

    /// JSON file whose top-level object holds the template variables.
    #[arg(value_name = "VARS_FILE")]
    pub vars_file: PathBuf,
}

/// Parse command line arguments with custom handling for missing required inputs.
///
/// Argument errors are fatal: they happen before anything is rendered and are
/// never reported through the stdout error marker.
pub fn get_args() -> Args {
    Args::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument {
            let mut command = Args::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_args() {
        let args = Args::parse_from(["slimbridge", "/templates", "home.slim", "/tmp/vars.json"]);
        assert_eq!(args.include_dir, "/templates");
        assert_eq!(args.template_path, "home.slim");
        assert_eq!(args.vars_file, PathBuf::from("/tmp/vars.json"));
    }

    #[test]
    fn missing_args_are_rejected() {
        let err = Args::try_parse_from(["slimbridge", "/templates"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_args_are_rejected() {
        assert!(Args::try_parse_from(["slimbridge", "a", "b", "c", "d"]).is_err());
    }
}
