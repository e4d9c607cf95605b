use std::fmt;
use std::sync::Arc;

/// The callback a continuable delivers its outcome to.
///
/// Error-first delivery is expressed as a [`Result`], so a delivery is
/// always exactly one of a value or an error.
pub type Continuation<'a, T, E> = Box<dyn FnOnce(Result<T, E>) + Send + 'a>;

/// A deferred computation that delivers a `Result<T, E>` to a continuation
///
/// Nothing runs until the continuable is invoked. Each invocation runs the
/// wrapped work again and delivers at most once to the continuation it was
/// given, so a continuable is a value that can be returned, stored, cloned
/// and composed before anyone asks for the result.
///
/// The algebra never schedules anything itself. Whether the delivery
/// happens during the invocation or later (from a timer, another thread,
/// an I/O completion) is up to whatever the leaf wraps.
pub struct Continuable<'a, T, E> {
    run: Arc<dyn Fn(Continuation<'a, T, E>) + Send + Sync + 'a>,
}

impl<'a, T, E> Clone for Continuable<'a, T, E> {
    fn clone(&self) -> Self {
        let run = Arc::clone(&self.run);
        Continuable { run }
    }
}

impl<'a, T, E> fmt::Debug for Continuable<'a, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuable").finish_non_exhaustive()
    }
}

impl<'a, T, E> Continuable<'a, T, E> {
    /// Runs the deferred work, delivering the outcome to `continuation`
    ///
    /// ```
    /// use continuable::*;
    /// let co: Continuable<i32, String> = of(1);
    /// co.invoke(|outcome| assert_eq!(outcome, Ok(1)));
    /// ```
    pub fn invoke<K>(&self, continuation: K)
    where
        K: FnOnce(Result<T, E>) + Send + 'a,
    {
        (self.run)(Box::new(continuation))
    }

    /// Invokes with an already boxed continuation, without boxing it again
    pub(crate) fn drive(&self, continuation: Continuation<'a, T, E>) {
        (self.run)(continuation)
    }
}

/// Wraps a function taking a continuation as a continuable
///
/// This is how external operations enter the algebra. The function is
/// called once per invocation and must call the continuation at most once.
/// ```
/// use continuable::*;
/// let co: Continuable<&str, ()> = from_fn(|k| k(Ok("hello")));
/// ```
pub fn from_fn<'a, T, E, F>(f: F) -> Continuable<'a, T, E>
where
    F: Fn(Continuation<'a, T, E>) + Send + Sync + 'a,
{
    let run = Arc::new(f);
    Continuable { run }
}

/// Lifts a value into a continuable
///
/// Every invocation synchronously delivers a clone of the value.
/// ```
/// use continuable::*;
/// let co: Continuable<i32, String> = of(1);
/// ```
pub fn of<'a, T, E>(value: T) -> Continuable<'a, T, E>
where
    T: Clone + Send + Sync + 'a,
    E: 'a,
{
    from_fn(move |k: Continuation<'a, T, E>| k(Ok(value.clone())))
}

/// Lifts an error into a continuable
///
/// Every invocation synchronously delivers a clone of the error. Useful to
/// fail early in a function that otherwise returns a composed continuable.
/// ```
/// use continuable::*;
/// let co: Continuable<i32, &str> = error("need a destination");
/// ```
pub fn error<'a, T, E>(err: E) -> Continuable<'a, T, E>
where
    T: 'a,
    E: Clone + Send + Sync + 'a,
{
    from_fn(move |k: Continuation<'a, T, E>| k(Err(err.clone())))
}

/// Flattens a continuable of a continuable by one layer
///
/// An error from the outer layer is delivered as is. Otherwise the inner
/// continuable is invoked with the same continuation, and whatever it
/// delivers is passed through untouched.
/// ```
/// use continuable::*;
/// let nested: Continuable<Continuable<i32, ()>, ()> = of(of(3));
/// let co = join(nested);
/// ```
pub fn join<'a, T, E>(source: Continuable<'a, Continuable<'a, T, E>, E>) -> Continuable<'a, T, E>
where
    T: 'a,
    E: 'a,
{
    from_fn(move |k: Continuation<'a, T, E>| {
        source.drive(Box::new(move |outer: Result<Continuable<'a, T, E>, E>| match outer {
            Ok(inner) => inner.drive(k),
            Err(e) => k(Err(e)),
        }))
    })
}

/// Sequences a continuable with a function producing the next one
///
/// The value of `source` is handed to `f`, and the continuable it returns
/// is invoked with the original continuation. Errors skip `f` entirely.
/// Together with [of](function@of) this makes `Continuable` a monad.
/// ```
/// use continuable::*;
/// let co: Continuable<i32, ()> = chain(of(2), |x| of(x * x));
/// ```
pub fn chain<'a, A, B, E, F>(source: Continuable<'a, A, E>, f: F) -> Continuable<'a, B, E>
where
    A: 'a,
    B: 'a,
    E: 'a,
    F: Fn(A) -> Continuable<'a, B, E> + Send + Sync + 'a,
{
    let f = Arc::new(f);
    from_fn(move |k: Continuation<'a, B, E>| {
        let f = Arc::clone(&f);
        source.drive(Box::new(move |outcome: Result<A, E>| match outcome {
            Ok(value) => f(value).drive(k),
            Err(e) => k(Err(e)),
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::settle;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Cont<T, E> = Continuable<'static, T, E>;

    #[test]
    fn of_delivers_synchronously() {
        let co: Cont<&str, ()> = of("value");

        let (tx, rx) = crossbeam_channel::unbounded();
        co.invoke(move |outcome| tx.send(outcome).unwrap());

        // nothing else runs in between, so the value is already there
        assert_eq!(rx.try_recv(), Ok(Ok("value")));
    }

    #[test]
    fn error_delivers_error() {
        let co: Cont<i32, &str> = error("Some error");

        assert_eq!(settle(&co), Ok(Err("Some error")));
    }

    #[test]
    fn from_fn_runs_on_every_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let co: Cont<usize, ()> = from_fn(move |k| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            k(Ok(n))
        });

        assert_eq!(settle(&co), Ok(Ok(0)));
        assert_eq!(settle(&co), Ok(Ok(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn join_keeps_inner_identity() {
        let value = Arc::new(String::from("shared"));
        let inner: Cont<Arc<String>, ()> = of(Arc::clone(&value));
        let joined = join(of(inner));

        let delivered = settle(&joined).unwrap().unwrap();

        assert!(Arc::ptr_eq(&delivered, &value));
    }

    #[test]
    fn join_forwards_inner_error() {
        let inner: Cont<i32, &str> = error("inner");
        let joined = join(of(inner));

        assert_eq!(settle(&joined), Ok(Err("inner")));
    }

    #[test]
    fn join_forwards_outer_error() {
        let outer: Cont<Cont<i32, &str>, &str> = error("outer");

        assert_eq!(settle(&join(outer)), Ok(Err("outer")));
    }

    #[test]
    fn chain_squares() {
        let co: Cont<i32, ()> = chain(of(2), |x| of(x * x));

        assert_eq!(settle(&co), Ok(Ok(4)));
    }

    #[test]
    fn chain_skips_function_on_error() {
        let called = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&called);
        let co: Cont<i32, &str> = chain(error("Broken"), move |x: i32| {
            seen.fetch_add(1, Ordering::SeqCst);
            of(x)
        });

        assert_eq!(settle(&co), Ok(Err("Broken")));
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn chain_reruns_source_each_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source: Cont<(), ()> = from_fn(move |k| {
            counter.fetch_add(1, Ordering::SeqCst);
            k(Ok(()))
        });
        let co = chain(source, of);

        settle(&co).unwrap().unwrap();
        settle(&co).unwrap().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "transform fault")]
    fn chain_lets_function_panics_unwind() {
        let co = chain(of(1), |_: i32| -> Cont<i32, ()> { panic!("transform fault") });

        let _ = settle(&co);
    }
}
