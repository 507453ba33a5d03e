//! Test helpers: on-disk datasets and a stub registry builder.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use frontier_core::test_support::StubRemoteRegistry;
use frontier_core::{PeopleGroupRecord, RemoteRegistry, RemoteRegistryError};
use tempfile::TempDir;

use super::*;
use crate::search::{RegistryBuilder, RegistrySettings};

pub(super) const EXISTING_UPGS: &str = "\
PeopNameInCountry,Country,Latitude,Longitude,Pronunciation,Population,PrimaryLanguageName,PrimaryReligion,PercentEvangelical
\"Arab, Shuwa\",Chad,12.1348,15.0557,,1800000,\"Arabic, Shuwa\",Islam,0.02
Kanembu,Chad,13.5,14.7,ka-NEM-boo,1050000,Kanembu,Islam,0.01
Tubu,Niger,19.0,12.0,,300000,Tedaga,Islam,0.3
Ghost,Chad,,,,5,,,0
";

pub(super) const UUPG_DATA: &str = "\
name,country,latitude,longitude,population,language,religion,evangelical
Kanembu,Chad,12.5,15.1,1050000,Kanembu,Islam,0.12
Bilala,Chad,12.3,15.2,250000,Bilala,Islam,0.15
Masa,Chad,12.0,15.0,90000,Masana,Ethnic religions,0.02
Zaghawa,Chad,15.0,22.0,200000,Zaghawa,Islam,0.2
";

/// Temporary directory holding both datasets and a shortlist database path.
pub(super) struct Workspace {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(&root.join("existing_upgs.csv"), EXISTING_UPGS.as_bytes());
        write_utf8(&root.join("uupg.csv"), UUPG_DATA.as_bytes());
        Self { _dir: dir, root }
    }

    pub(super) fn sources(&self) -> DataSources {
        DataSources {
            existing_upgs: self.root.join("existing_upgs.csv"),
            uupg_data: self.root.join("uupg.csv"),
        }
    }

    pub(super) fn shortlist_db(&self) -> Utf8PathBuf {
        self.root.join("state").join("shortlist.db")
    }
}

pub(super) fn write_utf8(path: &camino::Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture");
}

/// Builds a fresh [`StubRemoteRegistry`] per search and records the settings
/// it was given.
pub(super) struct StubRegistryBuilder {
    answer: Result<Vec<PeopleGroupRecord>, RemoteRegistryError>,
    pub(super) seen: RefCell<Option<RegistrySettings>>,
}

impl StubRegistryBuilder {
    pub(super) fn with_records(records: Vec<PeopleGroupRecord>) -> Self {
        Self {
            answer: Ok(records),
            seen: RefCell::new(None),
        }
    }

    pub(super) fn failing(error: RemoteRegistryError) -> Self {
        Self {
            answer: Err(error),
            seen: RefCell::new(None),
        }
    }
}

impl RegistryBuilder for StubRegistryBuilder {
    fn build(&self, settings: &RegistrySettings) -> Result<Box<dyn RemoteRegistry>, CliError> {
        self.seen.replace(Some(settings.clone()));
        let stub = match &self.answer {
            Ok(records) => StubRemoteRegistry::with_records(records.clone()),
            Err(err) => StubRemoteRegistry::failing(err.clone()),
        };
        Ok(Box::new(stub))
    }
}
