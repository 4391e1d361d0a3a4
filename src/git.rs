//! Git repository access and contributor extraction.

pub mod contributors;
pub mod repository;

pub use contributors::{
    parse_since, CommitPolicy, ContributorExtractor, ContributorSet, DEFAULT_SINCE, SINCE_FORMAT,
};
pub use repository::GitRepository;
