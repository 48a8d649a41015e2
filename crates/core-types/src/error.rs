use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("History series '{series}' is not ordered by timestamp at index {index}")]
    UnorderedHistory { series: String, index: usize },
}
