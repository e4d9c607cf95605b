//! A sample executor that drives a continuable from plain code
//!
//! It's not necessary to use this, invoking a continuable with a closure is
//! all you need, but it is handy at the edges of a program and in tests.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TryRecvError};
use thiserror::Error;
use tracing::debug;

use crate::*;

/// Why no outcome could be read from a continuable
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The continuable has not delivered yet
    #[error("the continuable has not delivered yet")]
    Pending,
    /// The continuation was dropped without ever being called
    #[error("the continuation was dropped without a delivery")]
    Abandoned,
    /// Nothing was delivered in time
    #[error("no delivery within {0:?}")]
    TimedOut(Duration),
}

/// Invokes `co` once, returning a receiver for its single delivery
fn start<'a, T, E>(co: &Continuable<'a, T, E>) -> Receiver<Result<T, E>>
where
    T: Send + 'a,
    E: Send + 'a,
{
    let (tx, rx) = bounded(1);
    co.invoke(move |outcome| {
        if tx.send(outcome).is_err() {
            debug!("delivery arrived after the executor stopped waiting");
        }
    });
    rx
}

/// Invokes the continuable and reads a synchronous delivery
///
/// Leaves built with [of](function@crate::of) and [error](function@crate::error),
/// and anything composed only from them, deliver during the invocation.
/// ```
/// use continuable::*;
/// use continuable::executor::*;
///
/// let co: Continuable<i32, ()> = map(of(20), |a| a + 1);
/// assert_eq!(settle(&co), Ok(Ok(21)));
///
/// let never: Continuable<i32, ()> = from_fn(|_k| ());
/// assert_eq!(settle(&never), Err(WaitError::Abandoned));
/// ```
pub fn settle<'a, T, E>(co: &Continuable<'a, T, E>) -> Result<Result<T, E>, WaitError>
where
    T: Send + 'a,
    E: Send + 'a,
{
    match start(co).try_recv() {
        Ok(outcome) => Ok(outcome),
        Err(TryRecvError::Empty) => Err(WaitError::Pending),
        Err(TryRecvError::Disconnected) => {
            debug!("continuation dropped without a delivery");
            Err(WaitError::Abandoned)
        }
    }
}

/// Invokes the continuable and blocks the current thread until it delivers
///
/// Returns [WaitError::Abandoned] if the continuation is dropped instead.
/// This blocks forever on a continuable that keeps its continuation alive
/// without calling it, see [wait_timeout].
pub fn wait<'a, T, E>(co: &Continuable<'a, T, E>) -> Result<Result<T, E>, WaitError>
where
    T: Send + 'a,
    E: Send + 'a,
{
    start(co).recv().map_err(|_| {
        debug!("continuation dropped without a delivery");
        WaitError::Abandoned
    })
}

/// Like [wait], giving up after `timeout`
pub fn wait_timeout<'a, T, E>(
    co: &Continuable<'a, T, E>,
    timeout: Duration,
) -> Result<Result<T, E>, WaitError>
where
    T: Send + 'a,
    E: Send + 'a,
{
    match start(co).recv_timeout(timeout) {
        Ok(outcome) => Ok(outcome),
        Err(RecvTimeoutError::Timeout) => Err(WaitError::TimedOut(timeout)),
        Err(RecvTimeoutError::Disconnected) => {
            debug!("continuation dropped without a delivery");
            Err(WaitError::Abandoned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    type Cont<T, E> = Continuable<'static, T, E>;

    /// A leaf that delivers from another thread after a delay
    fn timer(after: Duration, value: u64) -> Cont<u64, String> {
        from_fn(move |k| {
            thread::spawn(move || {
                thread::sleep(after);
                k(Ok(value))
            });
        })
    }

    #[test]
    fn settle_sees_synchronous_delivery() {
        let co: Cont<i32, ()> = chain(of(2), |x| of(x * x));

        assert_eq!(settle(&co), Ok(Ok(4)));
    }

    #[test]
    fn settle_reports_pending() {
        // keeps every continuation alive without ever calling it
        let (park, parked) = crossbeam_channel::unbounded::<Continuation<'static, u64, String>>();
        let co: Cont<u64, String> = from_fn(move |k| {
            let _ = park.send(k);
        });

        assert_eq!(settle(&co), Err(WaitError::Pending));
        assert_eq!(parked.len(), 1);
    }

    #[test]
    fn wait_blocks_for_other_thread() {
        let co = map(timer(Duration::from_millis(10), 20), |a| a + 1);

        assert_eq!(wait(&co), Ok(Ok(21)));
    }

    #[test]
    fn stages_run_in_order_across_threads() {
        let co = chain(timer(Duration::from_millis(5), 1), |a| {
            map(timer(Duration::from_millis(5), 2), move |b| a * 10 + b)
        });

        assert_eq!(wait(&co), Ok(Ok(12)));
    }

    #[test]
    fn wait_reports_abandoned_continuation() {
        let co: Cont<i32, ()> = from_fn(drop);

        assert_eq!(wait(&co), Err(WaitError::Abandoned));
    }

    #[test]
    fn wait_timeout_gives_up() {
        let co = timer(Duration::from_millis(500), 1);
        let timeout = Duration::from_millis(10);

        assert_eq!(wait_timeout(&co, timeout), Err(WaitError::TimedOut(timeout)));
    }

    #[test]
    fn wait_error_messages() {
        assert_eq!(
            WaitError::Abandoned.to_string(),
            "the continuation was dropped without a delivery"
        );
        assert_eq!(
            WaitError::TimedOut(Duration::from_secs(1)).to_string(),
            "no delivery within 1s"
        );
    }
}
