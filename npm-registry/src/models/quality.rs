use serde::{Deserialize, Serialize};

use crate::schema::{Field, Shape, Validated};

/// Raw quality service payload; only `score` is consumed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QualityResponse {
    pub score: ScoreBlock,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScoreBlock {
    #[serde(rename = "final")]
    pub final_score: f64,
    pub detail: ScoreDetail,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScoreDetail {
    pub quality: f64,
    pub popularity: f64,
    pub maintenance: f64,
}

impl Validated for QualityResponse {
    fn shape() -> Shape {
        Shape::object([Field::required(
            "score",
            Shape::object([
                Field::required("final", Shape::Fraction),
                Field::required(
                    "detail",
                    Shape::object([
                        Field::required("quality", Shape::Fraction),
                        Field::required("popularity", Shape::Fraction),
                        Field::required("maintenance", Shape::Fraction),
                    ]),
                ),
            ]),
        )])
    }
}

/// Four scores, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QualityScore {
    #[serde(rename = "final")]
    pub final_score: f64,
    pub quality: f64,
    pub popularity: f64,
    pub maintenance: f64,
}

impl From<QualityResponse> for QualityScore {
    fn from(response: QualityResponse) -> Self {
        let ScoreBlock {
            final_score,
            detail,
        } = response.score;
        Self {
            final_score,
            quality: detail.quality,
            popularity: detail.popularity,
            maintenance: detail.maintenance,
        }
    }
}
