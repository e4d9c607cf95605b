//! Method syntax and compatibility with do-notation
//!
//! The free functions are the primary API, these methods let a pipeline
//! read left to right. Rust currently lacks a generic 'bind', so
//! do-notation's `m!` relies on an `and_then` method and the `Lift` trait.
//!```
//! use continuable::*;
//! use ::do_notation::m;
//!
//! let total: Continuable<i32, ()> =
//!        m! {
//!            value_1 <- of(1);
//!            value_2 <- of(2);
//!            let sum = i32::wrapping_add(value_1, value_2);
//!            of(sum)
//!        };
//!
//! total.invoke(|outcome| assert_eq!(outcome, Ok(3)));
//!```
use crate::*;
use ::do_notation::Lift;

impl<'a, T, E> Lift<T> for Continuable<'a, T, E>
where
    T: Clone + Send + Sync + 'a,
    E: 'a,
{
    /// Creates a continuable from a value
    ///
    /// see [of](function@of)
    fn lift(a: T) -> Self {
        of(a)
    }
}

impl<'a, T: 'a, E: 'a> Continuable<'a, T, E> {
    /// Chains continuables
    ///
    /// see [chain](function@chain)
    pub fn and_then<B: 'a, F>(self, f: F) -> Continuable<'a, B, E>
    where
        F: Fn(T) -> Continuable<'a, B, E> + Send + Sync + 'a,
    {
        chain(self, f)
    }

    /// Transforms the value
    ///
    /// see [map](function@map)
    pub fn map<B: 'a, F>(self, f: F) -> Continuable<'a, B, E>
    where
        F: Fn(T) -> B + Send + Sync + 'a,
    {
        map(self, f)
    }

    /// Branches on error or value
    ///
    /// see [either](function@either)
    pub fn either<B: 'a, E2: 'a, L, R>(self, left: L, right: R) -> Continuable<'a, B, E2>
    where
        L: Fn(E) -> Continuable<'a, B, E2> + Send + Sync + 'a,
        R: Fn(T) -> Continuable<'a, B, E2> + Send + Sync + 'a,
    {
        either(self, left, right)
    }

    /// Recovers from errors
    ///
    /// see [recover](function@recover)
    pub fn recover<E2: 'a, L>(self, left: L) -> Continuable<'a, T, E2>
    where
        T: Clone + Send + Sync,
        L: Fn(E) -> Continuable<'a, T, E2> + Send + Sync + 'a,
    {
        recover(self, left)
    }

    /// Applies a function taking a continuable, such as [fmap] or [bind]
    /// ```
    /// use continuable::*;
    /// let co: Continuable<i32, ()> = of(3)
    ///     .pipe(fmap(|a: i32| a + 1))
    ///     .pipe(bind(|a: i32| of(a * a)));
    /// co.invoke(|outcome| assert_eq!(outcome, Ok(16)));
    /// ```
    pub fn pipe<R, D>(self, duplex: D) -> R
    where
        D: FnOnce(Self) -> R,
    {
        duplex(self)
    }
}

impl<'a, T: 'a, E: 'a> Continuable<'a, Continuable<'a, T, E>, E> {
    /// Removes one layer of nesting
    ///
    /// see [join](function@join)
    pub fn flatten(self) -> Continuable<'a, T, E> {
        join(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::settle;
    use ::do_notation::m;

    type Cont<T, E> = Continuable<'static, T, E>;

    #[test]
    fn methods_compose_left_to_right() {
        let co: Cont<String, ()> = of(2)
            .map(|a: i32| a + 1)
            .and_then(|a| of(a * 2))
            .map(|a| a.to_string());

        assert_eq!(settle(&co), Ok(Ok(String::from("6"))));
    }

    #[test]
    fn method_either_and_recover() {
        let failed: Cont<i32, &str> = error("E");
        let recovered = failed.clone().recover(|_| -> Cont<i32, ()> { of(0) });
        let branched: Cont<bool, ()> = failed.either(|_| of(false), |_| of(true));

        assert_eq!(settle(&recovered), Ok(Ok(0)));
        assert_eq!(settle(&branched), Ok(Ok(false)));
    }

    #[test]
    fn flatten_is_join() {
        let nested: Cont<Cont<i32, ()>, ()> = of(of(9));

        assert_eq!(settle(&nested.flatten()), Ok(Ok(9)));
    }

    #[test]
    fn do_notation_short_circuits() {
        let co: Cont<i32, &str> = m! {
            a <- of(1);
            _b <- error::<i32, &str>("stop");
            of(a)
        };

        assert_eq!(settle(&co), Ok(Err("stop")));
    }

    #[test]
    fn lift_is_of() {
        let co: Cont<i32, ()> = Lift::lift(5);

        assert_eq!(settle(&co), Ok(Ok(5)));
    }
}
