//! `add`, `remove` and `shortlist` commands over the SQLite-backed shortlist.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use frontier_core::{
    AddOutcome, DEFAULT_SHORTLIST_DOCUMENT, LocalCatalogue, PeopleGroupRecord, ShortlistStore,
    SortKey, SqliteShortlistBackend,
};
use log::warn;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_EXISTING_UPGS, ARG_ID, ARG_SHORTLIST_DB, ARG_SORT, ARG_UUPG_DATA, CliError,
    DEFAULT_SHORTLIST_DB, DataSources, ENV_REMOVE_ID, parse_option, write_json,
};

/// CLI arguments for the `add` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Add people-group ids to the shortlist (at most 100 members)")]
#[ortho_config(prefix = "FRONTIER")]
pub(crate) struct AddArgs {
    /// Ids to add, in order. Ids beyond the capacity are rejected.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) ids: Vec<String>,
    /// Path to the shortlist database.
    #[arg(long = ARG_SHORTLIST_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) shortlist_db: Option<Utf8PathBuf>,
}

/// CLI arguments for the `remove` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Remove a people-group id from the shortlist")]
#[ortho_config(prefix = "FRONTIER")]
pub(crate) struct RemoveArgs {
    /// Id to remove.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Path to the shortlist database.
    #[arg(long = ARG_SHORTLIST_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) shortlist_db: Option<Utf8PathBuf>,
}

/// CLI arguments for the `shortlist` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "List the shortlisted groups with their full records. Ids \
                 no longer present in the local datasets are skipped.",
    about = "List the shortlisted groups"
)]
#[ortho_config(prefix = "FRONTIER")]
pub(crate) struct ShortlistArgs {
    /// Ordering: distance (default), population, language, religion or type.
    #[arg(long = ARG_SORT, value_name = "key")]
    #[serde(default)]
    pub(crate) sort: Option<String>,
    /// Path to the shortlist database.
    #[arg(long = ARG_SHORTLIST_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) shortlist_db: Option<Utf8PathBuf>,
    /// Path to the existing people-groups file.
    #[arg(long = ARG_EXISTING_UPGS, value_name = "path")]
    #[serde(default)]
    pub(crate) existing_upgs: Option<Utf8PathBuf>,
    /// Path to the UUPG dataset.
    #[arg(long = ARG_UUPG_DATA, value_name = "path")]
    #[serde(default)]
    pub(crate) uupg_data: Option<Utf8PathBuf>,
}

fn shortlist_db(path: Option<Utf8PathBuf>) -> Utf8PathBuf {
    path.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SHORTLIST_DB))
}

pub(crate) fn open_store(
    path: &Utf8Path,
) -> Result<ShortlistStore<SqliteShortlistBackend>, CliError> {
    frontier_fs::ensure_parent_dir(path).map_err(|source| CliError::PrepareShortlistDb {
        path: path.to_path_buf(),
        source,
    })?;
    let backend = SqliteShortlistBackend::open(path, DEFAULT_SHORTLIST_DOCUMENT)
        .map_err(|err| CliError::OpenShortlist(Box::new(err)))?;
    Ok(ShortlistStore::new(backend))
}

/// Printed result of an `add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AddReport {
    pub(crate) accepted: Vec<String>,
    pub(crate) already_present: Vec<String>,
    pub(crate) rejected: Vec<String>,
    pub(crate) size: usize,
    pub(crate) capacity: usize,
}

/// Printed result of a `remove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RemoveReport {
    pub(crate) id: String,
    pub(crate) removed: bool,
    pub(crate) size: usize,
}

pub(crate) fn execute_add(path: &Utf8Path, ids: &[String]) -> Result<AddReport, CliError> {
    let store = open_store(path)?;
    let AddOutcome {
        accepted,
        already_present,
        rejected,
    } = store.add(ids)?;
    if !rejected.is_empty() {
        warn!(
            "{} ids were not added (blank, or the shortlist holds {} members)",
            rejected.len(),
            store.capacity()
        );
    }
    Ok(AddReport {
        accepted,
        already_present,
        rejected,
        size: store.members()?.len(),
        capacity: store.capacity(),
    })
}

pub(crate) fn execute_remove(path: &Utf8Path, id: &str) -> Result<RemoveReport, CliError> {
    let store = open_store(path)?;
    let removed = store.remove(id)?;
    Ok(RemoveReport {
        id: id.to_owned(),
        removed,
        size: store.members()?.len(),
    })
}

/// Resolve shortlisted ids against the catalogue, skipping unknown ids.
/// Each record is tagged with its classification.
pub(crate) fn hydrate(
    ids: &[String],
    catalogue: &LocalCatalogue,
    sort: SortKey,
) -> Vec<PeopleGroupRecord> {
    let mut records: Vec<PeopleGroupRecord> = ids
        .iter()
        .filter_map(|id| catalogue.find(id).cloned())
        .map(|mut record| {
            record.group_type = Some(record.classification());
            record
        })
        .collect();
    sort.sort(&mut records);
    records
}

pub(crate) fn run_add_with(args: AddArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let report = execute_add(&shortlist_db(merged.shortlist_db), &merged.ids)?;
    write_json(writer, &report)
}

pub(crate) fn run_remove_with(args: RemoveArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let id = merged.id.ok_or(CliError::MissingArgument {
        field: ARG_ID,
        env: ENV_REMOVE_ID,
    })?;
    let report = execute_remove(&shortlist_db(merged.shortlist_db), &id)?;
    write_json(writer, &report)
}

pub(crate) fn run_shortlist_with(
    args: ShortlistArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let sort = parse_option(merged.sort.as_deref(), ARG_SORT)?.unwrap_or_default();
    let sources = DataSources::from_options(merged.existing_upgs, merged.uupg_data);
    let catalogue = sources.load()?;
    let store = open_store(&shortlist_db(merged.shortlist_db))?;
    let records = hydrate(&store.members()?, &catalogue, sort);
    write_json(writer, &records)
}
