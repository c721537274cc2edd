//! The `Runnable` trait: the only thing a body must implement to be
//! schedulable.

/// What a runnable asks the scheduler to do with its process next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Run again next cycle.
    Running,
    /// Do not run for this many cycles.
    Sleeping(u64),
    /// Done for good; the process is removed on the next tick.
    Terminated,
}

/// Caller-supplied logic executed once per process execution.
///
/// `C` is whatever the kernel hands every body (topic store, durable
/// memory, …).  A runnable is re-invoked from the top every cycle it runs,
/// so it should re-derive its position from cheap state rather than from
/// anything held across cycles.
///
/// # Example
///
/// ```rust,ignore
/// struct Janitor;
///
/// impl Runnable<Services<Task>> for Janitor {
///     fn run(&mut self, ctx: &mut Services<Task>) -> RunOutcome {
///         ctx.memory.retain_agents(|_, record| record.field("role").is_some());
///         RunOutcome::Sleeping(100)
///     }
/// }
/// ```
pub trait Runnable<C: ?Sized> {
    fn run(&mut self, ctx: &mut C) -> RunOutcome;
}

/// A [`Runnable`] built from a closure.  Create with [`runnable_fn`].
pub struct FnRunnable<F>(F);

/// Wrap a closure as a [`Runnable`].
pub fn runnable_fn<C, F>(f: F) -> FnRunnable<F>
where
    C: ?Sized,
    F: FnMut(&mut C) -> RunOutcome,
{
    FnRunnable(f)
}

impl<C, F> Runnable<C> for FnRunnable<F>
where
    C: ?Sized,
    F: FnMut(&mut C) -> RunOutcome,
{
    #[inline]
    fn run(&mut self, ctx: &mut C) -> RunOutcome {
        (self.0)(ctx)
    }
}
