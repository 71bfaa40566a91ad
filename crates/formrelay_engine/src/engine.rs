use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use formrelay_core::{AnalyzeOutcome, FormKind, Msg, RunStageOutcome, SubmissionRequest};
use relay_logging::{relay_info, relay_warn};

use crate::filename::safe_filename;
use crate::persist::AtomicFileWriter;
use crate::submit::{ReqwestSubmitter, SubmitSettings, Submitter};
use crate::{AnalyzeResponse, EngineError, EngineEvent, SubmitError};

enum EngineCommand {
    Submit(SubmissionRequest),
}

/// Runs submissions on a background tokio runtime and reports each one back
/// as an [`EngineEvent`]. Dropping the handle stops the worker thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SubmitSettings, download_dir: PathBuf) -> Result<Self, EngineError> {
        let submitter = ReqwestSubmitter::new(settings).map_err(EngineError::Client)?;
        Self::with_submitter(Arc::new(submitter), download_dir)
    }

    pub fn with_submitter(
        submitter: Arc<dyn Submitter>,
        download_dir: PathBuf,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let downloads = AtomicFileWriter::new(download_dir);

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let submitter = submitter.clone();
                let downloads = downloads.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(submitter.as_ref(), &downloads, command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request: SubmissionRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit(request));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    submitter: &dyn Submitter,
    downloads: &AtomicFileWriter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit(request) => {
            let msg = perform(submitter, downloads, &request).await;
            let _ = event_tx.send(EngineEvent::Settled(msg));
        }
    }
}

/// Carry out one submission end to end. Every path yields the settle
/// message for `request`, so the page always gets its control back.
pub async fn perform(
    submitter: &dyn Submitter,
    downloads: &AtomicFileWriter,
    request: &SubmissionRequest,
) -> Msg {
    let submission_id = request.submission_id;
    match request.kind {
        FormKind::Analyze => {
            let outcome = analyze_and_save(submitter, downloads, request)
                .await
                .unwrap_or_else(|err| {
                    log_failure(request, &err);
                    AnalyzeOutcome::Failed {
                        message: err.to_string(),
                    }
                });
            Msg::AnalyzeSettled {
                submission_id,
                outcome,
            }
        }
        FormKind::RunStage => {
            let outcome = match submitter.run_stage(request).await {
                Ok(result) => {
                    relay_info!(
                        "Submission {} finished, success={}",
                        submission_id,
                        result.success
                    );
                    RunStageOutcome::Completed(result)
                }
                Err(err) => {
                    log_failure(request, &err);
                    RunStageOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            };
            Msg::RunStageSettled {
                submission_id,
                outcome,
            }
        }
    }
}

async fn analyze_and_save(
    submitter: &dyn Submitter,
    downloads: &AtomicFileWriter,
    request: &SubmissionRequest,
) -> Result<AnalyzeOutcome, SubmitError> {
    match submitter.analyze(request).await? {
        AnalyzeResponse::Message(message) => {
            relay_info!(
                "Submission {} answered with a message instead of a file",
                request.submission_id
            );
            Ok(AnalyzeOutcome::Refused { message })
        }
        AnalyzeResponse::File(download) => {
            let path = downloads.write(&safe_filename(&download.filename), &download.bytes)?;
            relay_info!(
                "Submission {} saved {} bytes to {:?}",
                request.submission_id,
                download.bytes.len(),
                path
            );
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or(download.filename);
            Ok(AnalyzeOutcome::Downloaded { filename })
        }
    }
}

fn log_failure(request: &SubmissionRequest, err: &SubmitError) {
    match err.status() {
        Some(status) => relay_warn!(
            "Submission {} to {} failed with status {}: {}",
            request.submission_id,
            request.action,
            status,
            err
        ),
        None => relay_warn!(
            "Submission {} to {} failed: {}",
            request.submission_id,
            request.action,
            err
        ),
    }
}
