use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic build status behind a Jenkins ball color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
    Unstable,
    Pending,
    Disabled,
    Aborted,
    NotBuilt,
    Unknown,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Unstable => "unstable",
            Status::Pending => "pending",
            Status::Disabled => "disabled",
            Status::Aborted => "aborted",
            Status::NotBuilt => "notbuilt",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub building: bool,
    pub status: Status,
}

impl StatusInfo {
    const fn idle(status: Status) -> Self {
        Self {
            building: false,
            status,
        }
    }

    const fn building(status: Status) -> Self {
        Self {
            building: true,
            status,
        }
    }
}

const UNKNOWN_CODE: &str = "unknown";

/// Every status code Jenkins reports for a job. `_anime` variants are the
/// animated balls shown while a build is running; they keep the status of
/// the previous build.
const CATALOG: &[(&str, StatusInfo)] = &[
    ("blue", StatusInfo::idle(Status::Success)),
    ("blue_anime", StatusInfo::building(Status::Success)),
    ("red", StatusInfo::idle(Status::Failure)),
    ("red_anime", StatusInfo::building(Status::Failure)),
    ("yellow", StatusInfo::idle(Status::Unstable)),
    ("yellow_anime", StatusInfo::building(Status::Unstable)),
    ("grey", StatusInfo::idle(Status::Pending)),
    ("grey_anime", StatusInfo::building(Status::Pending)),
    ("disabled", StatusInfo::idle(Status::Disabled)),
    ("disabled_anime", StatusInfo::building(Status::Disabled)),
    ("aborted", StatusInfo::idle(Status::Aborted)),
    ("aborted_anime", StatusInfo::building(Status::Aborted)),
    ("notbuilt", StatusInfo::idle(Status::NotBuilt)),
    ("notbuilt_anime", StatusInfo::building(Status::NotBuilt)),
    (UNKNOWN_CODE, StatusInfo::idle(Status::Unknown)),
];

/// A status code that is known to be present in the catalog.
///
/// The only way to obtain one is through [`JobColor::parse`] or
/// [`JobColor::from_code`], so [`lookup`] never sees an unmapped code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobColor(&'static str);

impl JobColor {
    pub const UNKNOWN: JobColor = JobColor(UNKNOWN_CODE);

    /// Strict parse: `None` for codes the catalog does not know.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        CATALOG
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code))
            .map(|(known, _)| JobColor(known))
    }

    /// Normalizing parse: absent, empty and unrecognized codes become `unknown`.
    pub fn from_code(code: Option<&str>) -> Self {
        code.and_then(Self::parse).unwrap_or(Self::UNKNOWN)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for JobColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Resolves a normalized status code to its semantic attributes.
pub fn lookup(color: JobColor) -> StatusInfo {
    CATALOG
        .iter()
        .find(|(code, _)| *code == color.0)
        .map(|(_, info)| *info)
        .unwrap_or(StatusInfo::idle(Status::Unknown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_matching_building_variant() {
        for (code, info) in CATALOG.iter().filter(|(code, _)| !code.ends_with("_anime")) {
            if *code == UNKNOWN_CODE {
                continue;
            }
            let anime = JobColor::parse(&format!("{code}_anime")).expect("anime variant");
            let anime_info = lookup(anime);
            assert!(anime_info.building);
            assert!(!info.building);
            assert_eq!(anime_info.status, info.status);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(JobColor::parse(" Blue_Anime ").map(JobColor::as_str), Some("blue_anime"));
        assert_eq!(JobColor::parse("purple"), None);
    }
}
