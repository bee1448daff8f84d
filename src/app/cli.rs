//! Command-line argument parsing

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::constants::DEFAULT_DELAY_SECS;
use crate::system::resolve_user;

use super::{DisplayOptions, Params, RuntimeConfig};

const CONTROLS_HELP: &str = "\
DISK READ and DISK WRITE are the block I/O bandwidth used during the sampling
period. SWAPIN and IO are the percentages of time the thread spent respectively
while swapping in and waiting on I/O more generally. PRIO is the I/O priority
at which the thread is running (set using the ionice command).

CONTROLS:
    Left/Right   Change the sorting column
    r            Invert the sorting order
    o            Toggle the --only option
    p            Toggle the --processes option
    a            Toggle the --accumulated option
    i            Change I/O priority of the highlighted task
    Up/Down      Move the highlight
    ?            Show help overlay
    q            Quit
    any other    Force a refresh";

/// Parsed command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "iotop_cli",
    version,
    about = "Per-task disk I/O monitor",
    after_help = CONTROLS_HELP
)]
pub struct Args {
    /// Only show processes or threads actually doing I/O
    #[arg(short = 'o', long)]
    pub only: bool,

    /// Non-interactive mode
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// Number of iterations before ending [infinite]
    #[arg(short = 'n', long = "iter", value_name = "NUM", value_parser = clap::value_parser!(u64).range(1..))]
    pub iter: Option<u64>,

    /// Delay between iterations in seconds
    #[arg(short = 'd', long, value_name = "SEC", default_value_t = DEFAULT_DELAY_SECS, value_parser = parse_delay)]
    pub delay: f64,

    /// Process/thread to monitor [all]
    #[arg(short = 'p', long, value_name = "PID")]
    pub pid: Option<u32>,

    /// User to monitor, by name or numeric uid [all]
    #[arg(short = 'u', long, value_name = "USER")]
    pub user: Option<String>,

    /// Only show processes, not all threads
    #[arg(short = 'P', long)]
    pub processes: bool,

    /// Show accumulated I/O instead of bandwidth
    #[arg(short = 'a', long)]
    pub accumulated: bool,

    /// Use kilobytes instead of a human friendly unit
    #[arg(short = 'k', long)]
    pub kilobytes: bool,

    /// Add a timestamp on each line (implies --batch)
    #[arg(short = 't', long = "time")]
    pub time: bool,

    /// Suppress some lines of header (implies --batch); repeat for more
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Show full command line
    #[arg(short = 'c', long)]
    pub fullcmdline: bool,

    /// Suppress listing of shortcuts
    #[arg(long)]
    pub no_help: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH", env = "IOTOP_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Startup errors in otherwise well-formed arguments
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("user {0} not found")]
    UnknownUser(String),
}

/// Parse delay from string
fn parse_delay(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        Ok(secs) => Err(format!("delay {} must be a positive number of seconds", secs)),
        Err(_) => Err(format!("invalid delay '{}'. Must be a number", s)),
    }
}

impl Args {
    /// Splits arguments into fixed loop parameters and the initial
    /// runtime configuration.
    pub fn into_config(self) -> Result<(Params, RuntimeConfig), CliError> {
        let user_filter = match self.user {
            Some(ref user) => Some(resolve_user(user).ok_or_else(|| CliError::UnknownUser(user.clone()))?),
            None => None,
        };

        let config = RuntimeConfig {
            only_active: self.only,
            processes_only: self.processes,
            accumulated: self.accumulated,
            user_filter,
            task_filter: self.pid,
            ..RuntimeConfig::default()
        };

        let params = Params {
            iterations: self.iter,
            delay: Duration::from_secs_f64(self.delay),
            batch: self.batch || self.time || self.quiet > 0,
            display: DisplayOptions {
                kilobytes: self.kilobytes,
                timestamp: self.time,
                quiet: self.quiet,
                full_cmdline: self.fullcmdline,
                no_help: self.no_help,
            },
            log_file: self.log_file,
        };

        Ok((params, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("iotop_cli").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let (params, config) = parse(&[]).unwrap().into_config().unwrap();
        assert_eq!(params.iterations, None);
        assert_eq!(params.delay, Duration::from_secs(1));
        assert!(!params.batch);
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_combined_short_flags() {
        let (params, config) = parse(&["-oPa", "-n", "3", "-d", "0.5"]).unwrap().into_config().unwrap();
        assert!(config.only_active);
        assert!(config.processes_only);
        assert!(config.accumulated);
        assert_eq!(params.iterations, Some(3));
        assert_eq!(params.delay, Duration::from_millis(500));
    }

    #[test]
    fn test_time_and_quiet_imply_batch() {
        let (params, _) = parse(&["-t"]).unwrap().into_config().unwrap();
        assert!(params.batch);
        assert!(params.display.timestamp);

        let (params, _) = parse(&["-qq"]).unwrap().into_config().unwrap();
        assert!(params.batch);
        assert_eq!(params.display.quiet, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(&["-d", "0"]).is_err());
        assert!(parse(&["-d", "soon"]).is_err());
        assert!(parse(&["-n", "0"]).is_err());
        assert!(parse(&["-p", "-4"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn test_user_resolution() {
        let (_, config) = parse(&["-u", "0", "-p", "42"]).unwrap().into_config().unwrap();
        assert_eq!(config.user_filter, Some(0));
        assert_eq!(config.task_filter, Some(42));

        let err = parse(&["-u", "no-such-user-iotop-test"]).unwrap().into_config().unwrap_err();
        assert_eq!(err, CliError::UnknownUser("no-such-user-iotop-test".to_string()));
    }
}
