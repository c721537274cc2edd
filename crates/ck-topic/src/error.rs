use ck_core::TopicId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("request priority for topic {topic} must be a number, got NaN")]
    InvalidPriority { topic: TopicId },
}

pub type TopicResult<T> = Result<T, TopicError>;
