//! Formrelay engine: HTTP submissions, response handling and downloads.
mod decode;
mod disposition;
mod engine;
mod filename;
mod persist;
mod submit;
mod types;
mod validate;

pub use decode::{decode_text, DecodeError};
pub use disposition::{filename_from_disposition, DEFAULT_DOWNLOAD_NAME};
pub use engine::{perform, EngineHandle};
pub use filename::safe_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use submit::{
    ReqwestSubmitter, SubmitSettings, Submitter, ANALYZE_ACCEPT, RUN_STAGE_ACCEPT,
};
pub use types::{AnalyzeResponse, Download, EngineError, EngineEvent, SubmitError};
pub use validate::{failure_message, is_json, ok_or_fail};
