//! The canonical people-group record shared by every data source.

use thiserror::Error;

use crate::Coordinates;

/// Evangelical fraction below which a group is a frontier people group.
pub const FPG_THRESHOLD: f64 = 0.10;

/// Engagement classification of a people group.
///
/// # Examples
/// ```
/// use frontier_core::GroupType;
///
/// assert_eq!(GroupType::classify(0.05), GroupType::Fpg);
/// assert_eq!(GroupType::classify(0.10), GroupType::Uupg);
/// assert_eq!(GroupType::Uupg.to_string(), "UUPG");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupType {
    /// Frontier people group.
    #[cfg_attr(feature = "serde", serde(rename = "FPG"))]
    Fpg,
    /// Unengaged unreached people group.
    #[cfg_attr(feature = "serde", serde(rename = "UUPG"))]
    Uupg,
}

impl GroupType {
    /// Classify a group from its evangelical fraction.
    ///
    /// The threshold is strict: exactly [`FPG_THRESHOLD`] is a UUPG.
    #[must_use]
    pub fn classify(evangelical: f64) -> Self {
        if evangelical < FPG_THRESHOLD {
            Self::Fpg
        } else {
            Self::Uupg
        }
    }

    /// Upper-case label (`"FPG"` or `"UUPG"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fpg => "FPG",
            Self::Uupg => "UUPG",
        }
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FPG" => Ok(Self::Fpg),
            "UUPG" => Ok(Self::Uupg),
            _ => Err(format!("unknown group type '{s}'")),
        }
    }
}

/// Derive the stable record identifier from a name and country.
///
/// Both parts are lower-cased and joined with a hyphen; every run of
/// characters outside `[a-z0-9]` collapses to a single hyphen and leading or
/// trailing hyphens are dropped. Distinct groups sharing a name and country
/// therefore share an id.
///
/// # Examples
/// ```
/// use frontier_core::derive_id;
///
/// assert_eq!(derive_id("Amdo Tibetan", "China"), "amdo-tibetan-china");
/// assert_eq!(derive_id("  Arab, Shuwa ", "Chad"), "arab-shuwa-chad");
/// ```
#[must_use]
pub fn derive_id(name: &str, country: &str) -> String {
    let raw = format!("{}-{}", name.to_lowercase(), country.to_lowercase());
    let mut id = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !id.is_empty() {
                id.push('-');
            }
            pending_separator = false;
            id.push(ch);
        } else {
            pending_separator = true;
        }
    }
    id
}

/// Errors returned by [`PeopleGroupRecord::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The name was empty after trimming.
    #[error("people group name must not be empty")]
    EmptyName,
}

/// A people group normalised from any registry source.
///
/// `group_type` is `None` until a classification is known; remote records
/// arrive pre-classified and local records are classified by the matcher.
/// `distance` is only set by a matcher pass and is expressed in the unit
/// requested for that pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeopleGroupRecord {
    /// Identifier derived from `(name, country)`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Pronunciation hint; empty when unknown.
    pub pronunciation: String,
    /// Country name.
    pub country: String,
    /// Position, absent when the source lacked a valid coordinate pair.
    pub location: Option<Coordinates>,
    /// Population estimate.
    pub population: u64,
    /// Primary language.
    pub language: String,
    /// Primary religion.
    pub religion: String,
    /// Evangelical fraction in `[0, 1]`.
    pub evangelical: f64,
    /// Engagement classification, when known.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub group_type: Option<GroupType>,
    /// Distance from the last search origin.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub distance: Option<f64>,
}

impl PeopleGroupRecord {
    /// Construct a record with default attributes.
    ///
    /// # Examples
    /// ```
    /// use frontier_core::PeopleGroupRecord;
    ///
    /// let record = PeopleGroupRecord::new("Kanembu", "Chad")?;
    /// assert_eq!(record.id, "kanembu-chad");
    /// assert_eq!(record.population, 0);
    /// assert!(record.location.is_none());
    /// # Ok::<(), frontier_core::RecordError>(())
    /// ```
    pub fn new(name: &str, country: &str) -> Result<Self, RecordError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RecordError::EmptyName);
        }
        let country = country.trim();
        Ok(Self {
            id: derive_id(name, country),
            name: name.to_owned(),
            pronunciation: String::new(),
            country: country.to_owned(),
            location: None,
            population: 0,
            language: String::new(),
            religion: String::new(),
            evangelical: 0.0,
            group_type: None,
            distance: None,
        })
    }

    /// Attach a validated position.
    #[must_use]
    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the evangelical fraction.
    #[must_use]
    pub fn with_evangelical(mut self, evangelical: f64) -> Self {
        self.evangelical = evangelical;
        self
    }

    /// The known classification, or one derived from the evangelical fraction.
    #[must_use]
    pub fn classification(&self) -> GroupType {
        self.group_type
            .unwrap_or_else(|| GroupType::classify(self.evangelical))
    }

    /// Name followed by the pronunciation hint in parentheses, when present.
    ///
    /// # Examples
    /// ```
    /// use frontier_core::PeopleGroupRecord;
    ///
    /// let mut record = PeopleGroupRecord::new("Tubu", "Chad")?;
    /// assert_eq!(record.display_name(), "Tubu");
    /// record.pronunciation = "TOO-boo".into();
    /// assert_eq!(record.display_name(), "Tubu (TOO-boo)");
    /// # Ok::<(), frontier_core::RecordError>(())
    /// ```
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.pronunciation.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.pronunciation.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Amdo Tibetan", "China", "amdo-tibetan-china")]
    #[case("Arab, Shuwa", "Chad", "arab-shuwa-chad")]
    #[case("--Fulani--", "  Niger ", "fulani-niger")]
    #[case("Kanuri (Yerwa)", "Nigeria", "kanuri-yerwa-nigeria")]
    #[case("Tamang", "", "tamang")]
    #[case("Bédouin", "Égypte", "b-douin-gypte")]
    fn derives_ids(#[case] name: &str, #[case] country: &str, #[case] expected: &str) {
        assert_eq!(derive_id(name, country), expected);
    }

    #[rstest]
    fn id_derivation_is_deterministic() {
        let first = derive_id("Amdo Tibetan", "China");
        assert_eq!(first, derive_id("Amdo Tibetan", "China"));
        assert_eq!(first, derive_id("AMDO  tibetan", "china"));
    }

    #[rstest]
    #[case(0.05, GroupType::Fpg)]
    #[case(0.0999, GroupType::Fpg)]
    #[case(0.10, GroupType::Uupg)]
    #[case(0.15, GroupType::Uupg)]
    fn classifies_with_strict_threshold(#[case] evangelical: f64, #[case] expected: GroupType) {
        assert_eq!(GroupType::classify(evangelical), expected);
    }

    #[rstest]
    fn explicit_type_wins_over_derived() {
        let mut record = PeopleGroupRecord::new("Hausa", "Niger")
            .expect("valid record")
            .with_evangelical(0.5);
        assert_eq!(record.classification(), GroupType::Uupg);
        record.group_type = Some(GroupType::Fpg);
        assert_eq!(record.classification(), GroupType::Fpg);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_empty_names(#[case] name: &str) {
        assert_eq!(
            PeopleGroupRecord::new(name, "Chad"),
            Err(RecordError::EmptyName)
        );
    }

    #[rstest]
    fn parses_group_types_case_insensitively() {
        assert_eq!("fpg".parse::<GroupType>(), Ok(GroupType::Fpg));
        assert_eq!(" Uupg".parse::<GroupType>(), Ok(GroupType::Uupg));
        assert!("both".parse::<GroupType>().is_err());
    }
}
