use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),
}
