use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, COOKIE};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde_json::Value;

use formrelay_core::{ErrorPayload, FormKind, FormMethod, RunResult, SubmissionRequest};
use relay_logging::{relay_debug, relay_info, relay_trace};

use crate::disposition::filename_from_disposition;
use crate::validate::{content_type_of, is_json, ok_or_fail};
use crate::{AnalyzeResponse, Download, SubmitError};

pub const ANALYZE_ACCEPT: &str = "text/csv, application/octet-stream, application/json";
pub const RUN_STAGE_ACCEPT: &str = "application/json";
const REQUESTED_WITH: &str = "X-Requested-With";
const ANALYZE_FALLBACK_MESSAGE: &str = "Analyze failed";

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    /// URL of the page hosting the forms; actions resolve against it.
    pub page_url: Url,
    /// `Cookie` header value sent with same-origin submissions only.
    pub session_cookie: Option<String>,
}

impl SubmitSettings {
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            session_cookie: None,
        }
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Post an analyze form and return either the file or the JSON message.
    async fn analyze(&self, request: &SubmissionRequest) -> Result<AnalyzeResponse, SubmitError>;

    /// Trigger a run-stage form and parse its summary.
    async fn run_stage(&self, request: &SubmissionRequest) -> Result<RunResult, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| SubmitError::NetworkFailure(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn resolve_action(&self, action: &str) -> Result<Url, SubmitError> {
        self.settings
            .page_url
            .join(action)
            .map_err(|err| SubmitError::InvalidAction(format!("{action}: {err}")))
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.settings.page_url.origin()
    }

    fn build_request(
        &self,
        request: &SubmissionRequest,
        accept: &'static str,
    ) -> Result<RequestBuilder, SubmitError> {
        let mut url = self.resolve_action(&request.action)?;
        if request.method == FormMethod::Get && !request.fields.is_empty() {
            // GET forms carry their fields in the query, replacing the action's.
            url.set_query(None);
            url.query_pairs_mut().extend_pairs(
                request
                    .fields
                    .iter()
                    .map(|field| (field.name.as_str(), field.value.as_str())),
            );
        }
        let method = match request.method {
            FormMethod::Get => Method::GET,
            FormMethod::Post => Method::POST,
        };
        relay_info!(
            "Submission {} ({:?}): {} {}",
            request.submission_id,
            request.kind,
            method,
            url
        );

        let same_origin = self.is_same_origin(&url);
        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, accept)
            .header(REQUESTED_WITH, "XMLHttpRequest");
        match &self.settings.session_cookie {
            Some(cookie) if same_origin => builder = builder.header(COOKIE, cookie.as_str()),
            Some(_) => relay_debug!(
                "Submission {} is cross-origin; credentials withheld",
                request.submission_id
            ),
            None => {}
        }
        Ok(builder)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn analyze(&self, request: &SubmissionRequest) -> Result<AnalyzeResponse, SubmitError> {
        debug_assert_eq!(request.kind, FormKind::Analyze);
        let mut builder = self.build_request(request, ANALYZE_ACCEPT)?;
        if request.method == FormMethod::Post {
            let form = request
                .fields
                .iter()
                .fold(reqwest::multipart::Form::new(), |form, field| {
                    form.text(field.name.clone(), field.value.clone())
                });
            builder = builder.multipart(form);
        }

        let response = builder
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ok_or_fail(response).await?;

        let content_type = content_type_of(&response);
        if is_json(content_type.as_deref()) {
            let body = read_body(request, response).await?;
            let value: Value = serde_json::from_slice(&body)
                .map_err(|err| SubmitError::MalformedResponse(err.to_string()))?;
            let message = ErrorPayload::from_json(&value)
                .message()
                .unwrap_or_else(|| ANALYZE_FALLBACK_MESSAGE.to_string());
            return Ok(AnalyzeResponse::Message(message));
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let filename = filename_from_disposition(disposition.as_deref());
        let bytes = read_body(request, response).await?;

        Ok(AnalyzeResponse::File(Download {
            filename,
            content_type,
            bytes,
        }))
    }

    async fn run_stage(&self, request: &SubmissionRequest) -> Result<RunResult, SubmitError> {
        debug_assert_eq!(request.kind, FormKind::RunStage);
        let response = self
            .build_request(request, RUN_STAGE_ACCEPT)?
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ok_or_fail(response).await?;

        let body = read_body(request, response).await?;
        serde_json::from_slice(&body).map_err(|err| SubmitError::MalformedResponse(err.to_string()))
    }
}

/// Buffer the whole body; downloads are only written once complete.
async fn read_body(request: &SubmissionRequest, response: Response) -> Result<Bytes, SubmitError> {
    let mut buffer = BytesMut::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        buffer.extend_from_slice(&chunk);
        relay_trace!(
            "Submission {} received {} bytes",
            request.submission_id,
            buffer.len()
        );
    }
    Ok(buffer.freeze())
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    SubmitError::NetworkFailure(err.to_string())
}
