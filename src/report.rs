use std::{path::Path, time::Duration};

use spdlog::{debug, info};
use thiserror::Error;
use tokio::time::sleep;

use crate::api::{ClientError, RUNNING_CHECK_TIMEOUT, SoapClient, SoapRequest};
use crate::window::TimeWindow;

/// Value of `isReportRunning` once the report has finished.
const NOT_RUNNING: &str = "false";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("soap call failed: {0}")]
    Client(#[from] ClientError),

    #[error("No report identifier returned from runReport call")]
    MissingIdentifier,

    #[error("could not read credentials: {0}")]
    Prompt(std::io::Error),

    #[error("could not write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Running,
    Complete,
}

impl ReportStatus {
    fn from_return(value: Option<&str>) -> ReportStatus {
        match value {
            Some(NOT_RUNNING) => ReportStatus::Complete,
            _ => ReportStatus::Running,
        }
    }
}

/// Drives one report through runReport, isReportRunning and getReportResultCsv.
#[derive(Debug)]
pub struct ReportRunner {
    client: SoapClient,
    poll_interval: Duration,
}

impl ReportRunner {
    pub fn new(client: SoapClient, poll_interval: Duration) -> Self {
        ReportRunner {
            client,
            poll_interval,
        }
    }

    // performs runReport and returns the report identifier
    pub async fn run_report(
        &self,
        folder_name: &str,
        report_name: &str,
        window: &TimeWindow,
    ) -> Result<String, ReportError> {
        let start = window.start_str();
        let end = window.end_str();
        let request = SoapRequest::RunReport {
            folder_name,
            report_name,
            start: &start,
            end: &end,
        };

        match self.client.call(&request).await? {
            Some(identifier) if !identifier.is_empty() => {
                info!("runReport accepted, identifier {}", identifier);
                Ok(identifier)
            }
            _ => Err(ReportError::MissingIdentifier),
        }
    }

    // performs isReportRunning until the service answers "false", returns the number of polls
    pub async fn wait_until_complete(&self, identifier: &str) -> Result<u32, ReportError> {
        let request = SoapRequest::IsReportRunning {
            identifier,
            timeout: RUNNING_CHECK_TIMEOUT,
        };
        let mut polls = 0;

        loop {
            let value = self.client.call(&request).await?;
            polls += 1;
            debug!("isReportRunning #{} returned {:?}", polls, value);

            match ReportStatus::from_return(value.as_deref()) {
                ReportStatus::Complete => {
                    println!("Report is complete.");
                    return Ok(polls);
                }
                ReportStatus::Running => {
                    println!(
                        "Report still running... waiting {} seconds",
                        self.poll_interval.as_secs()
                    );
                    sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// Run the whole report and write its CSV to `output`. Returns `false` when the
    /// service had no data, in which case `output` is left as it was.
    pub async fn run_to_file(
        &self,
        folder_name: &str,
        report_name: &str,
        window: &TimeWindow,
        output: &Path,
    ) -> Result<bool, ReportError> {
        println!("Submitting runReport request...");
        let identifier = self.run_report(folder_name, report_name, window).await?;
        println!("Report identifier: {}", identifier);

        let polls = self.wait_until_complete(&identifier).await?;
        info!("Report {} finished after {} status checks", identifier, polls);

        println!("Fetching report CSV...");
        match self.fetch_csv(&identifier).await? {
            Some(csv) => {
                save_csv(output, &csv).await?;
                println!("Report CSV saved as {}", output.display());
                Ok(true)
            }
            None => {
                println!("No CSV data returned from report.");
                Ok(false)
            }
        }
    }

    // performs getReportResultCsv, an empty payload counts as no data
    pub async fn fetch_csv(&self, identifier: &str) -> Result<Option<String>, ReportError> {
        let request = SoapRequest::GetReportResultCsv { identifier };
        let csv = self.client.call(&request).await?;

        Ok(csv.filter(|csv| !csv.is_empty()))
    }
}

/// Write the payload verbatim, replacing any previous file at `path`.
pub async fn save_csv(path: &Path, csv: &str) -> Result<(), ReportError> {
    tokio::fs::write(path, csv).await?;
    info!("Wrote {} bytes to {}", csv.len(), path.display());

    Ok(())
}
