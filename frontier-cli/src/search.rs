//! `search` command: merge remote frontier groups with local unengaged groups
//! around an origin.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use frontier_core::{
    DistanceUnit, Facets, GroupType, LocalCatalogue, PeopleGroupRecord, RegistryService,
    RemoteRegistry, RemoteRegistryError, ResultFilter, SearchOutcome, SearchRequest, SortKey,
    TypeFilter,
};
use frontier_data::registry::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, HttpRegistryClient, HttpRegistryConfig,
};
use log::warn;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_COUNTRY, ARG_EXISTING_UPGS, ARG_GROUP, ARG_GROUP_TYPE, ARG_LANGUAGE, ARG_LAT, ARG_LON,
    ARG_MAX_EVANGELICAL, ARG_RADIUS, ARG_REGISTRY_API_KEY, ARG_REGISTRY_BASE_URL,
    ARG_REGISTRY_TIMEOUT_SECS, ARG_RELIGION, ARG_SORT, ARG_TYPE, ARG_UNIT, ARG_UUPG_DATA,
    CliError, DataSources, ENV_SEARCH_COUNTRY, ENV_SEARCH_GROUP, ENV_SEARCH_RADIUS, parse_option,
    write_json,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search around a reference group (--country and --group) or \
                 explicit coordinates (--lat and --lon). Frontier groups come \
                 from the remote registry and unengaged groups from the local \
                 UUPG dataset. A failing registry yields a partial result \
                 with a remote_failure field; an unreadable UUPG dataset in a \
                 search of both types yields one with a local_failure field.",
    about = "Search for people groups within a radius"
)]
#[ortho_config(prefix = "FRONTIER")]
pub(crate) struct SearchArgs {
    /// Country of the reference group used as origin.
    #[arg(long = ARG_COUNTRY, value_name = "name")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Name of the reference group used as origin.
    #[arg(long = ARG_GROUP, value_name = "name")]
    #[serde(default)]
    pub(crate) group: Option<String>,
    /// Origin latitude; overrides --country/--group together with --lon.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Origin longitude.
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius.
    #[arg(long = ARG_RADIUS, value_name = "distance")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Unit of the radius: `km` (default) or `miles`.
    #[arg(long = ARG_UNIT, value_name = "unit")]
    #[serde(default)]
    pub(crate) unit: Option<String>,
    /// Record types to return: `fpg`, `uupg` or `both` (default).
    #[arg(long = ARG_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) type_filter: Option<String>,
    /// Keep only groups with this primary language.
    #[arg(long = ARG_LANGUAGE, value_name = "language")]
    #[serde(default)]
    pub(crate) language: Option<String>,
    /// Keep only groups with this primary religion.
    #[arg(long = ARG_RELIGION, value_name = "religion")]
    #[serde(default)]
    pub(crate) religion: Option<String>,
    /// Keep only groups of this classification (`fpg` or `uupg`).
    #[arg(long = ARG_GROUP_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) group_type: Option<String>,
    /// Keep only groups at or below this evangelical fraction.
    #[arg(long = ARG_MAX_EVANGELICAL, value_name = "fraction")]
    #[serde(default)]
    pub(crate) max_evangelical: Option<f64>,
    /// Ordering: distance (default), population, language, religion or type.
    #[arg(long = ARG_SORT, value_name = "key")]
    #[serde(default)]
    pub(crate) sort: Option<String>,
    /// Path to the existing people-groups file.
    #[arg(long = ARG_EXISTING_UPGS, value_name = "path")]
    #[serde(default)]
    pub(crate) existing_upgs: Option<Utf8PathBuf>,
    /// Path to the UUPG dataset.
    #[arg(long = ARG_UUPG_DATA, value_name = "path")]
    #[serde(default)]
    pub(crate) uupg_data: Option<Utf8PathBuf>,
    /// Remote registry API root.
    #[arg(long = ARG_REGISTRY_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) registry_base_url: Option<String>,
    /// Remote registry API key.
    #[arg(long = ARG_REGISTRY_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) registry_api_key: Option<String>,
    /// Remote registry timeout in seconds.
    #[arg(long = ARG_REGISTRY_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) registry_timeout_secs: Option<u64>,
}

/// Where the search is centred.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Origin {
    /// A reference group looked up in the local catalogue.
    Group { country: String, group: String },
    /// Explicit coordinates.
    Coordinates { latitude: f64, longitude: f64 },
}

/// Remote registry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegistrySettings {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout_secs: u64,
}

/// Resolved `search` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchConfig {
    pub(crate) origin: Origin,
    pub(crate) radius: f64,
    pub(crate) unit: DistanceUnit,
    pub(crate) type_filter: TypeFilter,
    pub(crate) filter: ResultFilter,
    pub(crate) sort: SortKey,
    pub(crate) sources: DataSources,
    pub(crate) registry: RegistrySettings,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let origin = match (args.lat, args.lon) {
            (Some(latitude), Some(longitude)) => Origin::Coordinates {
                latitude,
                longitude,
            },
            _ => Origin::Group {
                country: args.country.ok_or(CliError::MissingArgument {
                    field: ARG_COUNTRY,
                    env: ENV_SEARCH_COUNTRY,
                })?,
                group: args.group.ok_or(CliError::MissingArgument {
                    field: ARG_GROUP,
                    env: ENV_SEARCH_GROUP,
                })?,
            },
        };
        let radius = args.radius.ok_or(CliError::MissingArgument {
            field: ARG_RADIUS,
            env: ENV_SEARCH_RADIUS,
        })?;
        let filter = ResultFilter {
            language: args.language,
            religion: args.religion,
            group_type: parse_option::<GroupType>(args.group_type.as_deref(), ARG_GROUP_TYPE)?,
            max_evangelical: args.max_evangelical,
        };

        Ok(Self {
            origin,
            radius,
            unit: parse_option(args.unit.as_deref(), ARG_UNIT)?.unwrap_or_default(),
            type_filter: parse_option(args.type_filter.as_deref(), ARG_TYPE)?.unwrap_or_default(),
            filter,
            sort: parse_option(args.sort.as_deref(), ARG_SORT)?.unwrap_or_default(),
            sources: DataSources::from_options(args.existing_upgs, args.uupg_data),
            registry: RegistrySettings {
                base_url: args
                    .registry_base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
                api_key: args.registry_api_key,
                timeout_secs: args.registry_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        })
    }
}

impl SearchConfig {
    fn request(&self, catalogue: &LocalCatalogue) -> Result<SearchRequest, CliError> {
        let (latitude, longitude) = match &self.origin {
            Origin::Coordinates {
                latitude,
                longitude,
            } => (*latitude, *longitude),
            Origin::Group { country, group } => {
                let reference = catalogue.find_reference(country, group).ok_or_else(|| {
                    CliError::UnknownGroup {
                        country: country.clone(),
                        group: group.clone(),
                    }
                })?;
                let location = reference.location.ok_or_else(|| CliError::OriginWithoutLocation {
                    country: country.clone(),
                    group: group.clone(),
                })?;
                (location.latitude(), location.longitude())
            }
        };
        Ok(SearchRequest {
            latitude,
            longitude,
            radius: self.radius,
            unit: self.unit,
            type_filter: self.type_filter,
        })
    }
}

/// Builds the remote registry for the current search invocation.
pub(crate) trait RegistryBuilder {
    fn build(&self, settings: &RegistrySettings) -> Result<Box<dyn RemoteRegistry>, CliError>;
}

pub(crate) struct HttpRegistryBuilder;

impl RegistryBuilder for HttpRegistryBuilder {
    fn build(&self, settings: &RegistrySettings) -> Result<Box<dyn RemoteRegistry>, CliError> {
        let mut config = HttpRegistryConfig::new(settings.base_url.clone())
            .with_timeout(Duration::from_secs(settings.timeout_secs));
        if let Some(key) = &settings.api_key {
            config = config.with_api_key(key.clone());
        }
        let client = HttpRegistryClient::with_config(config).map_err(|source| {
            CliError::BuildRegistryClient {
                base_url: settings.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(client))
    }
}

/// A remote failure as printed in the search report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RemoteFailure {
    pub(crate) kind: &'static str,
    pub(crate) message: String,
}

impl From<&RemoteRegistryError> for RemoteFailure {
    fn from(err: &RemoteRegistryError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct OriginReport {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
}

/// Printed result of a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SearchReport {
    pub(crate) origin: OriginReport,
    pub(crate) radius: f64,
    pub(crate) unit: DistanceUnit,
    pub(crate) fpgs: Vec<PeopleGroupRecord>,
    pub(crate) uupgs: Vec<PeopleGroupRecord>,
    /// Both lists interleaved by distance; only for searches of both types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) combined: Option<Vec<PeopleGroupRecord>>,
    pub(crate) facets: Facets,
    pub(crate) remote_failure: Option<RemoteFailure>,
    pub(crate) local_failure: Option<String>,
}

impl SearchReport {
    fn new(
        request: &SearchRequest,
        outcome: SearchOutcome,
        config: &SearchConfig,
        local_failure: Option<String>,
    ) -> Self {
        let refine = |records: Vec<PeopleGroupRecord>| {
            let mut kept = config.filter.apply(records);
            config.sort.sort(&mut kept);
            kept
        };
        let all = outcome.combined();
        let facets = Facets::collect(&all);
        let combined =
            (request.type_filter == TypeFilter::Both).then(|| config.filter.apply(all));
        let remote_failure = outcome.remote_failure.as_ref().map(RemoteFailure::from);
        Self {
            origin: OriginReport {
                latitude: request.latitude,
                longitude: request.longitude,
            },
            radius: request.radius,
            unit: request.unit,
            fpgs: refine(outcome.fpgs),
            uupgs: refine(outcome.uupgs),
            combined,
            facets,
            remote_failure,
            local_failure,
        }
    }
}

/// Local data a search needs, with the UUPG failure absorbed when the
/// remote registry can still answer.
struct LocalSources {
    catalogue: LocalCatalogue,
    failure: Option<String>,
}

fn load_local(config: &SearchConfig) -> Result<LocalSources, CliError> {
    let reference = match config.origin {
        Origin::Group { .. } => config.sources.load_reference()?,
        Origin::Coordinates { .. } => Vec::new(),
    };
    let mut failure = None;
    let uupgs = match config.type_filter {
        TypeFilter::Fpg => Vec::new(),
        TypeFilter::Uupg => config.sources.load_uupgs()?,
        TypeFilter::Both => config.sources.load_uupgs().unwrap_or_else(|err| {
            warn!("UUPG dataset unavailable, continuing with the remote registry: {err}");
            failure = Some(err.to_string());
            Vec::new()
        }),
    };
    Ok(LocalSources {
        catalogue: LocalCatalogue::new(reference, uupgs),
        failure,
    })
}

pub(crate) fn run_search_with(
    args: SearchArgs,
    builder: &dyn RegistryBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = SearchConfig::try_from(merged)?;
    let report = execute_search(&config, builder)?;
    write_json(writer, &report)
}

pub(crate) fn execute_search(
    config: &SearchConfig,
    builder: &dyn RegistryBuilder,
) -> Result<SearchReport, CliError> {
    let LocalSources { catalogue, failure } = load_local(config)?;
    let request = config.request(&catalogue)?;
    let remote = builder.build(&config.registry)?;
    let service = RegistryService::new(remote, catalogue);
    let outcome = service.search(&request)?;
    Ok(SearchReport::new(&request, outcome, config, failure))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
