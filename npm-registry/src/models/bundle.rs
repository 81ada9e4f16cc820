use serde::{Deserialize, Serialize};

use crate::schema::{Field, Shape, Validated};

/// Bundle size of one resolved version, in bytes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeReport {
    pub name: String,
    pub version: String,
    pub size: u64,
    pub gzip: u64,
    pub dependency_count: u64,
}

impl Validated for SizeReport {
    fn shape() -> Shape {
        Shape::object([
            Field::required("name", Shape::String),
            Field::required("version", Shape::String),
            Field::required("size", Shape::Count),
            Field::required("gzip", Shape::Count),
            Field::required("dependencyCount", Shape::Count),
        ])
    }
}
