use ck_core::CoreError;
use ck_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("kernel configuration error: {0}")]
    Config(#[from] CoreError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type KernelResult<T> = Result<T, KernelError>;
