use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use typed_builder::TypedBuilder;

/// Placeholder for a title or artist that could not be recovered.
pub const UNKNOWN: &str = "Unknown";

/// A saved tab, normalized across sites.
///
/// `url` is always absolute and non-empty; entries without one are dropped by the parsers.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, Serialize, Deserialize)]
pub struct Song {
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub artist: String,
    #[builder(setter(into))]
    pub url: String,
    pub source: Source,
    #[builder(default = source.lang())]
    pub lang: Lang,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, Serialize, Deserialize)]
pub enum Source {
    #[strum(serialize = "Ultimate Guitar")]
    #[serde(rename = "Ultimate Guitar")]
    UltimateGuitar,
    #[strum(serialize = "Tab4u")]
    #[serde(rename = "Tab4u")]
    Tab4u,
}
impl Source {
    pub fn lang(self) -> Lang {
        match self {
            Source::UltimateGuitar => Lang::En,
            Source::Tab4u => Lang::He,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    He,
}
