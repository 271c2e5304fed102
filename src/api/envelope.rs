use quick_xml::escape::escape;

const SOAPENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SERVICE_NS: &str = "http://service.admin.ws.five9.com/";

/// Timeout hint sent with every `isReportRunning` call. The service waits up to this
/// many seconds before answering; it is not a local timeout.
pub const RUNNING_CHECK_TIMEOUT: u32 = 30;

/// The three admin web service operations used to produce a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapRequest<'a> {
    RunReport {
        folder_name: &'a str,
        report_name: &'a str,
        start: &'a str,
        end: &'a str,
    },
    IsReportRunning {
        identifier: &'a str,
        timeout: u32,
    },
    GetReportResultCsv {
        identifier: &'a str,
    },
}

impl SoapRequest<'_> {
    pub fn operation(&self) -> &'static str {
        match self {
            SoapRequest::RunReport { .. } => "runReport",
            SoapRequest::IsReportRunning { .. } => "isReportRunning",
            SoapRequest::GetReportResultCsv { .. } => "getReportResultCsv",
        }
    }

    /// Render the full SOAP envelope, escaping every text value.
    pub fn to_envelope(&self) -> String {
        let operation = self.operation();
        let payload = match self {
            SoapRequest::RunReport {
                folder_name,
                report_name,
                start,
                end,
            } => format!(
                "<folderName>{}</folderName>\
                 <reportName>{}</reportName>\
                 <criteria><time><end>{}</end><start>{}</start></time></criteria>",
                escape(*folder_name),
                escape(*report_name),
                escape(*end),
                escape(*start),
            ),
            SoapRequest::IsReportRunning {
                identifier,
                timeout,
            } => format!(
                "<identifier>{}</identifier><timeout>{}</timeout>",
                escape(*identifier),
                timeout
            ),
            SoapRequest::GetReportResultCsv { identifier } => {
                format!("<identifier>{}</identifier>", escape(*identifier))
            }
        };

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <soapenv:Envelope xmlns:soapenv=\"{SOAPENV_NS}\" xmlns:ser=\"{SERVICE_NS}\">\
             <soapenv:Header/>\
             <soapenv:Body>\
             <ser:{operation}>{payload}</ser:{operation}>\
             </soapenv:Body>\
             </soapenv:Envelope>"
        )
    }
}
