use crate::ConnectorError;

/// Result of one external call, as seen by an operation.
///
/// Operations never propagate errors; they match on the outcome of each call and record it in
/// the diagnostic log instead.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    Success(T),
    /// The call completed but returned nothing usable.
    SoftFailure,
    /// The call raised.
    HardFailure(ConnectorError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T> From<Result<Option<T>, ConnectorError>> for Outcome<T> {
    fn from(res: Result<Option<T>, ConnectorError>) -> Self {
        match res {
            Ok(Some(value)) => Self::Success(value),
            Ok(None) => Self::SoftFailure,
            Err(err) => Self::HardFailure(err),
        }
    }
}

impl<T> From<Result<Vec<T>, ConnectorError>> for Outcome<Vec<T>> {
    /// An empty list counts as a soft failure.
    fn from(res: Result<Vec<T>, ConnectorError>) -> Self {
        match res {
            Ok(items) if items.is_empty() => Self::SoftFailure,
            Ok(items) => Self::Success(items),
            Err(err) => Self::HardFailure(err),
        }
    }
}
