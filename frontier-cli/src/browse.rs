//! `countries` and `groups` commands: browse the reference dataset to pick a
//! search origin.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use frontier_core::PeopleGroupRecord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_COUNTRY, ARG_EXISTING_UPGS, ARG_UUPG_DATA, CliError, DataSources, ENV_GROUPS_COUNTRY,
    write_json,
};

/// CLI arguments for the `countries` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List the countries of the reference dataset")]
#[ortho_config(prefix = "FRONTIER")]
pub(crate) struct CountriesArgs {
    /// Path to the existing people-groups file.
    #[arg(long = ARG_EXISTING_UPGS, value_name = "path")]
    #[serde(default)]
    pub(crate) existing_upgs: Option<Utf8PathBuf>,
    /// Path to the UUPG dataset.
    #[arg(long = ARG_UUPG_DATA, value_name = "path")]
    #[serde(default)]
    pub(crate) uupg_data: Option<Utf8PathBuf>,
}

/// CLI arguments for the `groups` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List the reference groups of one country, sorted by name")]
#[ortho_config(prefix = "FRONTIER")]
pub(crate) struct GroupsArgs {
    /// Country whose groups to list.
    #[arg(long = ARG_COUNTRY, value_name = "name")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Path to the existing people-groups file.
    #[arg(long = ARG_EXISTING_UPGS, value_name = "path")]
    #[serde(default)]
    pub(crate) existing_upgs: Option<Utf8PathBuf>,
    /// Path to the UUPG dataset.
    #[arg(long = ARG_UUPG_DATA, value_name = "path")]
    #[serde(default)]
    pub(crate) uupg_data: Option<Utf8PathBuf>,
}

/// Resolved `groups` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupsConfig {
    pub(crate) country: String,
    pub(crate) sources: DataSources,
}

impl TryFrom<GroupsArgs> for GroupsConfig {
    type Error = CliError;

    fn try_from(args: GroupsArgs) -> Result<Self, Self::Error> {
        let country = args
            .country
            .filter(|country| !country.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_COUNTRY,
                env: ENV_GROUPS_COUNTRY,
            })?;
        Ok(Self {
            country,
            sources: DataSources::from_options(args.existing_upgs, args.uupg_data),
        })
    }
}

#[derive(Debug, Serialize)]
struct GroupListing<'a> {
    id: &'a str,
    name: String,
    country: &'a str,
    latitude: Option<f64>,
    longitude: Option<f64>,
    population: u64,
}

impl<'a> From<&'a PeopleGroupRecord> for GroupListing<'a> {
    fn from(record: &'a PeopleGroupRecord) -> Self {
        Self {
            id: &record.id,
            name: record.display_name(),
            country: &record.country,
            latitude: record.location.map(|c| c.latitude()),
            longitude: record.location.map(|c| c.longitude()),
            population: record.population,
        }
    }
}

pub(crate) fn run_countries_with(
    args: CountriesArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let sources = DataSources::from_options(merged.existing_upgs, merged.uupg_data);
    let catalogue = sources.load()?;
    write_json(writer, &catalogue.countries())
}

pub(crate) fn run_groups_with(args: GroupsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = GroupsConfig::try_from(merged)?;
    let catalogue = config.sources.load()?;
    let listing: Vec<GroupListing<'_>> = catalogue
        .groups_in_country(config.country.trim())
        .into_iter()
        .map(GroupListing::from)
        .collect();
    write_json(writer, &listing)
}
