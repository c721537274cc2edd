use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior tree node id {0:?} is used more than once")]
    DuplicateNodeId(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
