use crate::{error, of, Continuable};

/// `Ok` becomes [of](function@of), `Err` becomes [error](function@error)
impl<'a, T, E> From<Result<T, E>> for Continuable<'a, T, E>
where
    T: Clone + Send + Sync + 'a,
    E: Clone + Send + Sync + 'a,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => of(value),
            Err(err) => error(err),
        }
    }
}
