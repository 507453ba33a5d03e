//! Header spellings recognised for each source kind.

use super::SourceKind;

/// Canonical record fields a raw column may map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Name,
    Pronunciation,
    Country,
    Latitude,
    Longitude,
    Population,
    Language,
    Religion,
    /// Evangelical share as a fraction.
    EvangelicalFraction,
    /// Evangelical share as a percentage.
    EvangelicalPercent,
}

/// Map a raw header to its canonical field. Matching ignores case and
/// surrounding whitespace.
pub(crate) fn canonical_field(kind: SourceKind, header: &str) -> Option<Field> {
    let header = header.trim().to_ascii_lowercase();
    match kind {
        SourceKind::ExistingUpgs => existing_upgs(&header),
        SourceKind::UupgDataset => uupg_dataset(&header).or_else(|| existing_upgs(&header)),
        SourceKind::RemoteRegistry => remote_registry(&header),
    }
}

fn existing_upgs(header: &str) -> Option<Field> {
    Some(match header {
        "peopnameincountry" | "name" => Field::Name,
        "country" | "ctry" => Field::Country,
        "latitude" => Field::Latitude,
        "longitude" => Field::Longitude,
        "pronunciation" => Field::Pronunciation,
        "population" => Field::Population,
        "primarylanguagename" | "language" => Field::Language,
        "primaryreligion" | "religion" => Field::Religion,
        "percentevangelical" => Field::EvangelicalPercent,
        "evangelical" => Field::EvangelicalFraction,
        _ => return None,
    })
}

fn uupg_dataset(header: &str) -> Option<Field> {
    Some(match header {
        "name" => Field::Name,
        "country" => Field::Country,
        "latitude" => Field::Latitude,
        "longitude" => Field::Longitude,
        "pronunciation" => Field::Pronunciation,
        "population" => Field::Population,
        "language" => Field::Language,
        "religion" => Field::Religion,
        "evangelical" => Field::EvangelicalFraction,
        _ => return None,
    })
}

fn remote_registry(header: &str) -> Option<Field> {
    Some(match header {
        "peopnameincountry" => Field::Name,
        "ctry" => Field::Country,
        "latitude" => Field::Latitude,
        "longitude" => Field::Longitude,
        "pronunciation" => Field::Pronunciation,
        "population" => Field::Population,
        "primarylanguagename" => Field::Language,
        "primaryreligion" => Field::Religion,
        "percentevangelical" => Field::EvangelicalPercent,
        _ => return None,
    })
}
