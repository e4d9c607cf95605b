//! This module contains the combinators built on top of the core
//! continuable operations.
//! These could be written outside the crate, but are here for convenience.
use std::sync::Arc;

use super::*;

/// Transforms the value of a continuable
///
/// Errors are forwarded untouched and `transform` is never called for them.
/// A panic in `transform` unwinds out of the invocation, it is not turned
/// into an error delivery.
/// ```
/// use continuable::*;
/// let co: Continuable<String, ()> = map(of(1), |a: i32| a.to_string());
/// ```
pub fn map<'a, A, B, E, F>(source: Continuable<'a, A, E>, transform: F) -> Continuable<'a, B, E>
where
    A: 'a,
    B: 'a,
    E: 'a,
    F: Fn(A) -> B + Send + Sync + 'a,
{
    let transform = Arc::new(transform);
    from_fn(move |k: Continuation<'a, B, E>| {
        let transform = Arc::clone(&transform);
        source.drive(Box::new(move |outcome: Result<A, E>| {
            k(outcome.map(|value| transform(value)))
        }))
    })
}

/// Curried [map](function@map)
///
/// Builds a function from continuables to continuables, which can be
/// stored and applied later, or given to [pipe](Continuable::pipe).
/// ```
/// use continuable::*;
/// let double = fmap(|a: i32| a * 2);
/// let co: Continuable<i32, ()> = double(of(21));
/// ```
pub fn fmap<'a, A, B, E, F>(transform: F) -> impl Fn(Continuable<'a, A, E>) -> Continuable<'a, B, E>
where
    A: 'a,
    B: 'a,
    E: 'a,
    F: Fn(A) -> B + Send + Sync + 'a,
{
    let transform = Arc::new(transform);
    move |source: Continuable<'a, A, E>| {
        let transform = Arc::clone(&transform);
        map(source, move |value| transform(value))
    }
}

/// Curried sequencing of continuables
///
/// This is [map](function@map) followed by [join](function@join), so it
/// delivers the same as [chain](function@chain).
/// ```
/// use continuable::*;
/// let square = bind(|x: i32| of(x * x));
/// let co: Continuable<i32, ()> = square(of(3));
/// ```
pub fn bind<'a, A, B, E, F>(transform: F) -> impl Fn(Continuable<'a, A, E>) -> Continuable<'a, B, E>
where
    A: 'a,
    B: 'a,
    E: 'a,
    F: Fn(A) -> Continuable<'a, B, E> + Send + Sync + 'a,
{
    let transform = Arc::new(transform);
    move |source: Continuable<'a, A, E>| {
        let transform = Arc::clone(&transform);
        join(map(source, move |value| transform(value)))
    }
}

/// Branches on the outcome of a continuable
///
/// On error `left` is called, on success `right`. The continuable returned by
/// whichever branch fired is invoked with the original continuation, the
/// other branch is never called. This is the only combinator that may
/// intercept the error channel, so the error type may change here.
/// ```
/// use continuable::*;
/// let co: Continuable<i32, String> = either(
///     error("missing"),
///     |_e: &str| of(0),
///     |a: i32| of(a + 1),
/// );
/// ```
pub fn either<'a, A, B, E1, E2, L, R>(
    source: Continuable<'a, A, E1>,
    left: L,
    right: R,
) -> Continuable<'a, B, E2>
where
    A: 'a,
    B: 'a,
    E1: 'a,
    E2: 'a,
    L: Fn(E1) -> Continuable<'a, B, E2> + Send + Sync + 'a,
    R: Fn(A) -> Continuable<'a, B, E2> + Send + Sync + 'a,
{
    let left = move |err: E1, k: Continuation<'a, B, E2>| left(err).drive(k);
    either_with(source, left, right)
}

/// Branches on the outcome, handing the continuation to the error branch
///
/// `left` receives the error and the continuation. It can deliver to the
/// continuation itself, or invoke another continuable with it. Otherwise
/// behaves as [either](function@either).
pub fn either_with<'a, A, B, E1, E2, L, R>(
    source: Continuable<'a, A, E1>,
    left: L,
    right: R,
) -> Continuable<'a, B, E2>
where
    A: 'a,
    B: 'a,
    E1: 'a,
    E2: 'a,
    L: Fn(E1, Continuation<'a, B, E2>) + Send + Sync + 'a,
    R: Fn(A) -> Continuable<'a, B, E2> + Send + Sync + 'a,
{
    let branches = Arc::new((left, right));
    from_fn(move |k: Continuation<'a, B, E2>| {
        let branches = Arc::clone(&branches);
        source.drive(Box::new(move |outcome: Result<A, E1>| {
            let (left, right) = &*branches;
            match outcome {
                Ok(value) => right(value).drive(k),
                Err(err) => left(err, k),
            }
        }))
    })
}

/// Recovers from an error, passing values through
///
/// [either](function@either) with [of](function@of) as the success branch.
/// ```
/// use continuable::*;
/// let co: Continuable<i32, ()> = recover(error("oops"), |_e: &str| of(0));
/// ```
pub fn recover<'a, A, E1, E2, L>(source: Continuable<'a, A, E1>, left: L) -> Continuable<'a, A, E2>
where
    A: Clone + Send + Sync + 'a,
    E1: 'a,
    E2: 'a,
    L: Fn(E1) -> Continuable<'a, A, E2> + Send + Sync + 'a,
{
    either(source, left, of)
}

/// Recovers from an error by driving the continuation directly
///
/// [either_with](function@either_with) with [of](function@of) as the success
/// branch. Handy when only some errors are recoverable.
/// ```
/// use continuable::*;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Fs { NotFound, Disk }
///
/// // a missing file is not an error, it is just absent
/// let maybe_file = |stat: Continuable<'static, Option<u64>, Fs>| {
///     recover_with(stat, |err, cb| match err {
///         Fs::NotFound => cb(Ok(None)),
///         other => cb(Err(other)),
///     })
/// };
///
/// let co = maybe_file(error(Fs::NotFound));
/// co.invoke(|outcome| assert_eq!(outcome, Ok(None)));
/// ```
pub fn recover_with<'a, A, E1, E2, L>(
    source: Continuable<'a, A, E1>,
    left: L,
) -> Continuable<'a, A, E2>
where
    A: Clone + Send + Sync + 'a,
    E1: 'a,
    E2: 'a,
    L: Fn(E1, Continuation<'a, A, E2>) + Send + Sync + 'a,
{
    either_with(source, left, of)
}

/// Transforms the value with a callback-style function
///
/// `lambda` gets the value and the continuation, and delivers to it when
/// done. Errors from `source` skip `lambda`.
/// ```
/// use continuable::*;
/// let co: Continuable<usize, ()> = map_async(of("four"), |s: &str, cb| cb(Ok(s.len())));
/// ```
pub fn map_async<'a, A, B, E, F>(source: Continuable<'a, A, E>, lambda: F) -> Continuable<'a, B, E>
where
    A: 'a,
    B: 'a,
    E: 'a,
    F: Fn(A, Continuation<'a, B, E>) + Send + Sync + 'a,
{
    let lambda = Arc::new(lambda);
    from_fn(move |k: Continuation<'a, B, E>| {
        let lambda = Arc::clone(&lambda);
        source.drive(Box::new(move |outcome: Result<A, E>| match outcome {
            Ok(value) => lambda(value, k),
            Err(e) => k(Err(e)),
        }))
    })
}

/// Moves the outcome of a continuable into its value
///
/// The result always succeeds, carrying either the value or the error of
/// `source`. Lets an error be looked at inside `map` or `chain`.
/// ```
/// use continuable::*;
/// let failed: Continuable<i32, &str> = error("nope");
/// let co: Continuable<Result<i32, &str>, ()> = attempt(failed);
/// co.invoke(|outcome| assert_eq!(outcome, Ok(Err("nope"))));
/// ```
pub fn attempt<'a, A, E1, E2>(source: Continuable<'a, A, E1>) -> Continuable<'a, Result<A, E1>, E2>
where
    A: 'a,
    E1: 'a,
    E2: 'a,
{
    from_fn(move |k: Continuation<'a, Result<A, E1>, E2>| {
        source.drive(Box::new(move |outcome: Result<A, E1>| k(Ok(outcome))))
    })
}
