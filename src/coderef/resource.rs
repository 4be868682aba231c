//! Observable state of a lazily-loaded resource.

/// State machine for one cached asynchronous load.
///
/// Transitions are one-way: `NotRequested -> Pending -> Ready | Error`.
/// The only way back to `NotRequested` is an explicit cache invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T, E> {
    /// Nothing has asked for this resource yet.
    NotRequested,
    /// A load is in flight.
    Pending,
    /// The load completed.
    Ready(T),
    /// The load failed; the error stays until invalidated.
    Error(E),
}

impl<T, E> Resource<T, E> {
    /// Whether a load is currently in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Resource::Pending)
    }

    /// Whether the resource loaded successfully.
    pub fn is_ready(&self) -> bool {
        matches!(self, Resource::Ready(_))
    }

    /// Whether the load failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error(_))
    }

    /// The loaded value, if ready.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The load error, if failed.
    pub fn error(&self) -> Option<&E> {
        match self {
            Resource::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_predicates() {
        let pending: Resource<i32, String> = Resource::Pending;
        assert!(pending.is_pending());
        assert!(pending.ready().is_none());

        let ready: Resource<i32, String> = Resource::Ready(7);
        assert!(ready.is_ready());
        assert_eq!(ready.ready(), Some(&7));

        let error: Resource<i32, String> = Resource::Error("boom".into());
        assert!(error.is_error());
        assert_eq!(error.error().map(String::as_str), Some("boom"));
    }
}
