//! Error types emitted by the Frontier CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use frontier_core::{SearchError, ShortlistError, SqliteShortlistError};
use frontier_data::LoadError;
use frontier_data::registry::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the Frontier CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option held a value that could not be interpreted.
    #[error("invalid --{field} value {value:?}: {message}")]
    InvalidValue {
        field: &'static str,
        value: String,
        message: String,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Loading a local dataset failed.
    #[error(transparent)]
    LoadDataset(#[from] Box<LoadError>),
    /// The origin group named on the command line is not in the local data.
    #[error("no people group named {group:?} in {country:?}")]
    UnknownGroup { country: String, group: String },
    /// The origin group has no usable coordinates.
    #[error("people group {group:?} in {country:?} has no coordinates")]
    OriginWithoutLocation { country: String, group: String },
    /// Constructing the remote registry client failed.
    #[error("failed to build registry client for {base_url:?}: {source}")]
    BuildRegistryClient {
        base_url: String,
        #[source]
        source: ClientBuildError,
    },
    /// The search could not produce any result.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// Creating the shortlist database directory failed.
    #[error("failed to prepare shortlist database directory for {path:?}: {source}")]
    PrepareShortlistDb {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the shortlist database failed.
    #[error("failed to open shortlist database: {0}")]
    OpenShortlist(#[source] Box<SqliteShortlistError>),
    /// Reading or writing the shortlist failed.
    #[error(transparent)]
    Shortlist(#[from] ShortlistError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        Self::LoadDataset(Box::new(err))
    }
}
