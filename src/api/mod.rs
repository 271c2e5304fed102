pub mod client;
pub mod envelope;
pub mod error;
pub mod response;

pub use client::{ClientError, SoapClient};
pub use envelope::{RUNNING_CHECK_TIMEOUT, SoapRequest};
pub use error::ApiError;
pub use response::{ResponseError, find_return};
