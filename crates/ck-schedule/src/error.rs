use ck_core::ProcessId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("process {0} is already registered")]
    DuplicateProcess(ProcessId),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
