//! Command-line interface for Frontier Finder.
//!
//! Every subcommand layers its settings with `ortho_config` (CLI flags over
//! `FRONTIER_*` environment variables over configuration files), resolves
//! them into a validated config, then prints pretty JSON to stdout.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use frontier_core::{LocalCatalogue, PeopleGroupRecord};
use frontier_data::normalize::SourceKind;
use serde::Serialize;

mod browse;
mod error;
mod search;
mod shortlist;

pub use error::CliError;

use browse::{CountriesArgs, GroupsArgs};
use search::SearchArgs;
use shortlist::{AddArgs, RemoveArgs, ShortlistArgs};

pub(crate) const ARG_EXISTING_UPGS: &str = "existing-upgs";
pub(crate) const ARG_UUPG_DATA: &str = "uupg-data";
pub(crate) const ARG_COUNTRY: &str = "country";
pub(crate) const ARG_GROUP: &str = "group";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_RADIUS: &str = "radius";
pub(crate) const ARG_UNIT: &str = "unit";
pub(crate) const ARG_TYPE: &str = "type";
pub(crate) const ARG_LANGUAGE: &str = "language";
pub(crate) const ARG_RELIGION: &str = "religion";
pub(crate) const ARG_GROUP_TYPE: &str = "group-type";
pub(crate) const ARG_MAX_EVANGELICAL: &str = "max-evangelical";
pub(crate) const ARG_SORT: &str = "sort";
pub(crate) const ARG_REGISTRY_BASE_URL: &str = "registry-base-url";
pub(crate) const ARG_REGISTRY_API_KEY: &str = "registry-api-key";
pub(crate) const ARG_REGISTRY_TIMEOUT_SECS: &str = "registry-timeout-secs";
pub(crate) const ARG_SHORTLIST_DB: &str = "shortlist-db";
pub(crate) const ARG_ID: &str = "id";

pub(crate) const ENV_GROUPS_COUNTRY: &str = "FRONTIER_CMDS_GROUPS_COUNTRY";
pub(crate) const ENV_SEARCH_GROUP: &str = "FRONTIER_CMDS_SEARCH_GROUP";
pub(crate) const ENV_SEARCH_COUNTRY: &str = "FRONTIER_CMDS_SEARCH_COUNTRY";
pub(crate) const ENV_SEARCH_RADIUS: &str = "FRONTIER_CMDS_SEARCH_RADIUS";
pub(crate) const ENV_REMOVE_ID: &str = "FRONTIER_CMDS_REMOVE_ID";

pub(crate) const DEFAULT_EXISTING_UPGS: &str = "data/existing_upgs_updated.csv";
pub(crate) const DEFAULT_UUPG_DATA: &str = "data/updated_uupg.csv";
pub(crate) const DEFAULT_SHORTLIST_DB: &str = "shortlist.db";

/// Run the Frontier CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Countries(args) => browse::run_countries_with(args, &mut stdout),
        Command::Groups(args) => browse::run_groups_with(args, &mut stdout),
        Command::Search(args) => {
            search::run_search_with(args, &search::HttpRegistryBuilder, &mut stdout)
        }
        Command::Add(args) => shortlist::run_add_with(args, &mut stdout),
        Command::Remove(args) => shortlist::run_remove_with(args, &mut stdout),
        Command::Shortlist(args) => shortlist::run_shortlist_with(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "frontier",
    about = "Find frontier and unengaged people groups near a chosen group",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the countries of the reference dataset.
    Countries(CountriesArgs),
    /// List the reference groups of one country.
    Groups(GroupsArgs),
    /// Search for frontier and unengaged groups within a radius.
    Search(SearchArgs),
    /// Add people-group ids to the shortlist.
    Add(AddArgs),
    /// Remove a people-group id from the shortlist.
    Remove(RemoveArgs),
    /// List the shortlisted groups.
    Shortlist(ShortlistArgs),
}

/// Resolved paths of the two local datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DataSources {
    pub(crate) existing_upgs: Utf8PathBuf,
    pub(crate) uupg_data: Utf8PathBuf,
}

impl DataSources {
    pub(crate) fn from_options(
        existing_upgs: Option<Utf8PathBuf>,
        uupg_data: Option<Utf8PathBuf>,
    ) -> Self {
        Self {
            existing_upgs: existing_upgs.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_EXISTING_UPGS)),
            uupg_data: uupg_data.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_UUPG_DATA)),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), CliError> {
        require_existing(&self.existing_upgs, ARG_EXISTING_UPGS)?;
        require_existing(&self.uupg_data, ARG_UUPG_DATA)?;
        Ok(())
    }

    pub(crate) fn load(&self) -> Result<LocalCatalogue, CliError> {
        self.validate()?;
        Ok(frontier_data::load_catalogue(
            &self.existing_upgs,
            &self.uupg_data,
        )?)
    }

    /// Load only the reference dataset.
    pub(crate) fn load_reference(&self) -> Result<Vec<PeopleGroupRecord>, CliError> {
        require_existing(&self.existing_upgs, ARG_EXISTING_UPGS)?;
        Ok(frontier_data::load_dataset(
            &self.existing_upgs,
            SourceKind::ExistingUpgs,
        )?)
    }

    /// Load only the UUPG dataset.
    pub(crate) fn load_uupgs(&self) -> Result<Vec<PeopleGroupRecord>, CliError> {
        require_existing(&self.uupg_data, ARG_UUPG_DATA)?;
        Ok(frontier_data::load_dataset(
            &self.uupg_data,
            SourceKind::UupgDataset,
        )?)
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match frontier_fs::is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn parse_option<T>(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<T>, CliError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse().map_err(|err: T::Err| CliError::InvalidValue {
                field,
                value: raw.to_owned(),
                message: err.to_string(),
            })
        })
        .transpose()
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    payload: &T,
) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(payload).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(text.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
