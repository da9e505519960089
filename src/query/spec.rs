use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::RawGeometry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("unsupported containment mode {0:?}")]
    Containment(String),

    #[error("unsupported geometric relation {0:?}")]
    Relation(String),
}

/// How a patch's labels must relate to the requested label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainmentMode {
    /// Patch carries every requested label, possibly more.
    #[serde(rename = "CONTAINS_ALL")]
    All,
    /// Patch carries exactly the requested labels.
    #[serde(rename = "CONTAINS_ONLY")]
    Only,
    /// Patch carries at least one requested label.
    #[serde(rename = "CONTAINS_SOME")]
    Some,
}

impl ContainmentMode {
    pub const ALL: [ContainmentMode; 3] = [Self::All, Self::Only, Self::Some];

    pub fn to_str(&self) -> &'static str {
        match self {
            Self::All => "CONTAINS_ALL",
            Self::Only => "CONTAINS_ONLY",
            Self::Some => "CONTAINS_SOME",
        }
    }
}

impl FromStr for ContainmentMode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONTAINS_ALL" | "all" => Ok(Self::All),
            "CONTAINS_ONLY" | "only" => Ok(Self::Only),
            "CONTAINS_SOME" | "some" => Ok(Self::Some),
            _ => Err(ModeError::Containment(s.into())),
        }
    }
}

impl fmt::Display for ContainmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

/// How a patch's footprint must relate to the query rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeoRelation {
    /// Footprint lies entirely inside the rectangle.
    #[serde(rename = "GEO_WITHIN")]
    Within,
    /// Footprint overlaps the rectangle, boundaries included.
    #[serde(rename = "GEO_INTERSECTS")]
    Intersects,
}

impl GeoRelation {
    pub const ALL: [GeoRelation; 2] = [Self::Within, Self::Intersects];

    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Within => "GEO_WITHIN",
            Self::Intersects => "GEO_INTERSECTS",
        }
    }
}

impl FromStr for GeoRelation {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GEO_WITHIN" | "within" => Ok(Self::Within),
            "GEO_INTERSECTS" | "intersects" => Ok(Self::Intersects),
            _ => Err(ModeError::Relation(s.into())),
        }
    }
}

impl fmt::Display for GeoRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

/// Query request as received at the request boundary.
///
/// Modes are kept as raw strings so that unsupported values are rejected by
/// [`QueryRequest::parse`] (and answered with an empty result) rather than
/// failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<RawGeometry>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub query_type: String,
    #[serde(default)]
    pub geospatial_query_operator: String,
}

impl QueryRequest {
    pub fn new(
        labels: Vec<String>,
        geometry: Option<RawGeometry>,
        mode: ContainmentMode,
        relation: GeoRelation,
    ) -> Self {
        Self {
            geometry,
            labels,
            query_type: mode.to_str().into(),
            geospatial_query_operator: relation.to_str().into(),
        }
    }

    /// Check both modes and produce a typed query spec.
    pub fn parse(&self) -> Result<QuerySpec, ModeError> {
        Ok(QuerySpec {
            labels: self.labels.clone(),
            rectangle: self.geometry.clone(),
            mode: self.query_type.parse()?,
            relation: self.geospatial_query_operator.parse()?,
        })
    }
}

/// A request whose modes are known to be supported; the rectangle is still unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub labels: Vec<String>,
    pub rectangle: Option<RawGeometry>,
    pub mode: ContainmentMode,
    pub relation: GeoRelation,
}
