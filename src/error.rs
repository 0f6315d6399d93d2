use thiserror::Error;

#[derive(Debug, Error)]
pub enum FamlyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid data file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not signed in, run `famly login <uid>` first")]
    NotSignedIn,
    #[error("no family selected, create, join or use one first")]
    NoCurrentFamily,
    #[error("family {0} not found")]
    FamilyNotFound(u64),
    #[error("you are not a member of family {0}")]
    NotAMember(u64),
    #[error("no family uses join code '{0}'")]
    UnknownJoinCode(String),
    #[error("'{0}' is not a valid join code (6 characters, A-Z and 0-9)")]
    InvalidJoinCode(String),
    #[error("list {0} not found")]
    ListNotFound(u64),
    #[error("item {item} not found in list {list}")]
    ItemNotFound { list: u64, item: u64 },
    #[error("recipe {0} not found")]
    RecipeNotFound(u64),
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("invalid date '{0}', use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("unknown reset interval '{0}', supported: daily, weekly, monthly, custom")]
    InvalidInterval(String),
}
