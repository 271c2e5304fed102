use crate::api::{ApiError, ResponseError, SoapRequest, find_return};
use reqwest::{
    Error, Response,
    header::{
        AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue,
    },
};
use spdlog::prelude::*;
use thiserror::Error;
use url::Url;

const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

#[derive(Debug)]
pub struct SoapClient {
    endpoint: Url,
    client: reqwest::Client,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("bad endpoint url")]
    BadUrl(#[from] url::ParseError),

    #[error("api error: {0}")]
    ApiError(#[from] ApiError),

    #[error("reqwest error")]
    ReqwestError(#[from] Error),

    #[error("malformed response: {0}")]
    XmlError(#[from] ResponseError),

    #[error("credentials cannot be sent as a header")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl SoapClient {
    /// Build a client posting to `endpoint` with the given `Authorization` value on
    /// every request.
    pub fn new(endpoint: &str, authorization: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(endpoint)?;

        let mut auth = HeaderValue::from_str(authorization)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("soapaction"),
            HeaderValue::from_static("\"\""),
        );
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(SOAP_CONTENT_TYPE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(SoapClient { endpoint, client })
    }

    /// Send one request and return the text of the first `return` element in the
    /// response, if any.
    pub async fn call(&self, request: &SoapRequest<'_>) -> Result<Option<String>, ClientError> {
        debug!("SoapClient.call(): {}", request.operation());

        let res = self
            .client
            .post(self.endpoint.clone())
            .body(request.to_envelope())
            .send()
            .await?;

        let body = self.handle_response(res).await?;
        Ok(find_return(&body)?)
    }

    async fn handle_response(&self, response: Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::ApiError(ApiError::new(status, body)));
        }

        Ok(body)
    }
}
