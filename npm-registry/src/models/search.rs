use serde::{Deserialize, Serialize};

use crate::models::package::Person;
use crate::schema::{Field, Shape, Validated};

/// Registry search results in service order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub objects: Vec<SearchObject>,
    pub total: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchObject {
    pub package: SearchPackage,
    #[serde(default)]
    pub score: Option<SearchScore>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchPackage {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<Person>,
    #[serde(default)]
    pub publisher: Option<Publisher>,
    #[serde(default)]
    pub links: Option<Links>,
}

impl SearchPackage {
    /// Author name, falling back to the publishing account.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(Person::name)
            .filter(|name| !name.is_empty())
            .or_else(|| self.publisher.as_ref().map(|p| p.username.as_str()))
    }

    pub fn npm_url(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.npm.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub npm: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchScore {
    #[serde(rename = "final", default)]
    pub final_score: Option<f64>,
}

impl Validated for SearchResponse {
    fn shape() -> Shape {
        let package = Shape::object([
            Field::required("name", Shape::String),
            Field::required("version", Shape::String),
            Field::optional("description", Shape::String),
            Field::optional("author", Person::shape()),
            Field::optional(
                "publisher",
                Shape::object([Field::required("username", Shape::String)]),
            ),
            Field::optional(
                "links",
                Shape::object([
                    Field::optional("npm", Shape::String),
                    Field::optional("homepage", Shape::String),
                    Field::optional("repository", Shape::String),
                ]),
            ),
        ]);
        Shape::object([
            Field::required(
                "objects",
                Shape::array_of(Shape::object([
                    Field::required("package", package),
                    Field::optional(
                        "score",
                        Shape::object([Field::optional("final", Shape::Number)]),
                    ),
                ])),
            ),
            Field::required("total", Shape::Count),
        ])
    }
}
