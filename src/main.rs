use clap::Parser;
use spdlog::{Level, LevelFilter, error, info};
use std::{path::PathBuf, process::ExitCode, time::Duration};

mod api;
mod credentials;
mod report;
mod window;

use crate::api::SoapClient;
use crate::credentials::Credentials;
use crate::report::{ReportError, ReportRunner};
use crate::window::{TimeWindow, UtcOffset};

const DEFAULT_ENDPOINT: &str = "https://api.five9.com/wsadmin/v13/AdminWebService";
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Run a Five9 report for yesterday and save it as CSV
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder holding the report
    #[arg(long)]
    folder: String,

    /// Name of the report to run
    #[arg(long)]
    report: String,

    /// Admin web service endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Offset appended to the report criteria timestamps (±HH:MM)
    #[arg(long, default_value = "-05:00", allow_hyphen_values = true)]
    tz_offset: UtcOffset,

    /// Where to write the CSV
    #[arg(long, default_value = "report.csv")]
    output: PathBuf,

    /// Skip the username prompt
    #[arg(long)]
    username: Option<String>,

    /// Log debug messages
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.debug {
        spdlog::default_logger().set_level_filter(LevelFilter::MoreSevereEqual(Level::Debug));
    }

    exit_code(run(args).await)
}

// the error is reported once, through the logger
fn exit_code(result: Result<(), ReportError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ReportError> {
    let window = TimeWindow::previous_day_from_now(args.tz_offset);
    println!("Start Time: {}", window.start_str());
    println!("End Time: {}", window.end_str());

    let credentials = Credentials::prompt(args.username).map_err(ReportError::Prompt)?;
    info!("Authenticating as {}", credentials.username());

    let client = SoapClient::new(&args.endpoint, &credentials.basic_auth_value())?;
    let runner = ReportRunner::new(client, POLL_INTERVAL);

    runner
        .run_to_file(&args.folder, &args.report, &window, &args.output)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
        assert_eq!(exit_code(Err(ReportError::MissingIdentifier)), ExitCode::FAILURE);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["five9-report", "--folder", "Shared", "--report", "Calls"])
            .unwrap();

        assert_eq!(args.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(args.tz_offset.to_string(), "-05:00");
        assert_eq!(args.output, PathBuf::from("report.csv"));
        assert!(args.username.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn test_args_negative_offset_value() {
        let args = Args::try_parse_from([
            "five9-report",
            "--folder",
            "Shared",
            "--report",
            "Calls",
            "--tz-offset",
            "-08:00",
        ])
        .unwrap();

        assert_eq!(args.tz_offset.to_string(), "-08:00");
    }

    #[test]
    fn test_args_reject_bad_offset() {
        let result = Args::try_parse_from([
            "five9-report",
            "--folder",
            "Shared",
            "--report",
            "Calls",
            "--tz-offset",
            "EST",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_args_require_report_names() {
        assert!(Args::try_parse_from(["five9-report"]).is_err());
    }
}
