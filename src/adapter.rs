//! Adapters between callback-style functions and continuables
//!
//! A function written as "arguments plus a trailing callback" is wrapped by
//! [to], and a function that already returns a continuable by
//! [maybe_callback]. Both give the same two entry points: `call` runs
//! immediately with a callback, `defer` returns a continuable. `invoke`
//! picks between them based on whether a callback was supplied.
//!
//! Arguments are passed as a single value, usually a tuple.
use std::sync::Arc;

use tracing::trace;

use crate::*;

/// A callback-style function usable directly or as a continuable
///
/// See [to](function@to)
pub struct To<F> {
    function: Arc<F>,
}

impl<F> Clone for To<F> {
    fn clone(&self) -> Self {
        let function = Arc::clone(&self.function);
        To { function }
    }
}

/// Wraps a function taking arguments and a trailing continuation
///
/// ```
/// use continuable::*;
///
/// let add = to(|(a, b): (i32, i32), cb: Continuation<'static, i32, ()>| cb(Ok(a + b)));
///
/// // straight away, just like the plain function
/// add.call((1, 2), |outcome| assert_eq!(outcome, Ok(3)));
///
/// // or as a value to compose first
/// let co = map(add.defer((1, 2)), |sum| sum * 10);
/// co.invoke(|outcome| assert_eq!(outcome, Ok(30)));
/// ```
pub fn to<F>(function: F) -> To<F> {
    let function = Arc::new(function);
    To { function }
}

/// Wraps a function that needs a receiver, capturing it now
///
/// The receiver is shared by every direct call and every invocation of a
/// deferred continuable.
/// ```
/// use continuable::*;
///
/// struct Store { prefix: String }
///
/// let store = Store { prefix: "key:".into() };
/// let lookup = to_method(store, |store: &Store, id: u32, cb: Continuation<'static, String, ()>| {
///     cb(Ok(format!("{}{}", store.prefix, id)))
/// });
/// lookup.defer(7).invoke(|outcome| assert_eq!(outcome, Ok(String::from("key:7"))));
/// ```
pub fn to_method<'a, R, Args, T, E, F>(
    receiver: R,
    function: F,
) -> To<impl Fn(Args, Continuation<'a, T, E>) + Send + Sync + 'a>
where
    R: Send + Sync + 'a,
    F: Fn(&R, Args, Continuation<'a, T, E>) + Send + Sync + 'a,
    T: 'a,
    E: 'a,
{
    to(move |args: Args, k: Continuation<'a, T, E>| function(&receiver, args, k))
}

impl<F> To<F> {
    /// Calls the wrapped function straight away with `callback`
    pub fn call<'a, Args, T, E, K>(&self, args: Args, callback: K)
    where
        F: Fn(Args, Continuation<'a, T, E>),
        K: FnOnce(Result<T, E>) + Send + 'a,
    {
        (self.function)(args, Box::new(callback))
    }

    /// Builds a continuable that calls the wrapped function when invoked
    ///
    /// Every invocation calls the function again with a clone of `args`.
    pub fn defer<'a, Args, T, E>(&self, args: Args) -> Continuable<'a, T, E>
    where
        F: Fn(Args, Continuation<'a, T, E>) + Send + Sync + 'a,
        Args: Clone + Send + Sync + 'a,
        T: 'a,
        E: 'a,
    {
        let function = Arc::clone(&self.function);
        from_fn(move |k: Continuation<'a, T, E>| {
            trace!("invoking deferred callback-style call");
            function(args.clone(), k)
        })
    }

    /// Calls straight away when given a callback, otherwise defers
    ///
    /// Returns the continuable only in the deferred case.
    pub fn invoke<'a, Args, T, E>(
        &self,
        args: Args,
        callback: Option<Continuation<'a, T, E>>,
    ) -> Option<Continuable<'a, T, E>>
    where
        F: Fn(Args, Continuation<'a, T, E>) + Send + Sync + 'a,
        Args: Clone + Send + Sync + 'a,
        T: 'a,
        E: 'a,
    {
        match callback {
            Some(callback) => {
                (self.function)(args, callback);
                None
            }
            None => Some(self.defer(args)),
        }
    }
}

/// A continuable-returning function that also accepts a callback
///
/// See [maybe_callback](function@maybe_callback)
pub struct MaybeCallback<F> {
    function: Arc<F>,
}

impl<F> Clone for MaybeCallback<F> {
    fn clone(&self) -> Self {
        let function = Arc::clone(&self.function);
        MaybeCallback { function }
    }
}

/// Wraps a function returning a continuable
///
/// The result can be called with a callback, running at once, or without,
/// returning the continuable.
/// ```
/// use continuable::*;
///
/// let read = maybe_callback(|uri: &'static str| -> Continuable<'static, String, ()> {
///     of(format!("contents of {uri}"))
/// });
///
/// read.call("./foo", |outcome| assert!(outcome.is_ok()));
/// let co = read.defer("./foo");
/// ```
pub fn maybe_callback<F>(function: F) -> MaybeCallback<F> {
    let function = Arc::new(function);
    MaybeCallback { function }
}

impl<F> MaybeCallback<F> {
    /// Obtains the continuable and invokes it with `callback` at once
    pub fn call<'a, Args, T, E, K>(&self, args: Args, callback: K)
    where
        F: Fn(Args) -> Continuable<'a, T, E>,
        K: FnOnce(Result<T, E>) + Send + 'a,
    {
        (self.function)(args).invoke(callback)
    }

    /// Returns the continuable without invoking it
    pub fn defer<'a, Args, T, E>(&self, args: Args) -> Continuable<'a, T, E>
    where
        F: Fn(Args) -> Continuable<'a, T, E>,
        T: 'a,
        E: 'a,
    {
        let co = (self.function)(args);
        from_fn(move |k: Continuation<'a, T, E>| {
            trace!("invoking deferred continuable");
            co.drive(k)
        })
    }

    /// Calls straight away when given a callback, otherwise defers
    pub fn invoke<'a, Args, T, E>(
        &self,
        args: Args,
        callback: Option<Continuation<'a, T, E>>,
    ) -> Option<Continuable<'a, T, E>>
    where
        F: Fn(Args) -> Continuable<'a, T, E>,
        T: 'a,
        E: 'a,
    {
        match callback {
            Some(callback) => {
                (self.function)(args).drive(callback);
                None
            }
            None => Some(self.defer(args)),
        }
    }
}
