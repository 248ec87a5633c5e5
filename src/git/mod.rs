mod identity;
mod query;

pub use identity::{resolve_author, AuthorPattern};
pub use query::{collect, CollectWarning, CollectionOutcome, RepoCommits};
