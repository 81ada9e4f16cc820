pub mod bundle;
pub mod downloads;
pub mod package;
pub mod quality;
pub mod search;

pub use bundle::SizeReport;
pub use downloads::{DownloadPoint, Period};
pub use package::{
    DependencyMap, DependencyTriple, License, PackageDocument, PackageVersion, Person,
    RegistryRecord, Repository, RepositoryField,
};
pub use quality::{QualityResponse, QualityScore, ScoreBlock, ScoreDetail};
pub use search::{Links, Publisher, SearchObject, SearchPackage, SearchResponse, SearchScore};
