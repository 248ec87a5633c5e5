use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitweekError>;

#[derive(Error, Debug)]
pub enum GitweekError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Repository '{repo}' is not accessible: {message}")]
    RepoAccess { repo: String, message: String },
    #[error("History query failed for '{repo}': {message}")]
    VcsQuery { repo: String, message: String },
    #[error("Malformed report data: {0}")]
    Render(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// Manual From implementation for unboxed to boxed conversion
impl From<gix::discover::Error> for GitweekError {
    fn from(err: gix::discover::Error) -> Self {
        GitweekError::GitDiscover(Box::new(err))
    }
}
