use crate::period::Period;
use futures::future::{self, BoxFuture, FutureExt};
use std::time::Duration;
use thiserror::Error;

/// Why a single remote attempt produced no payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("source answered with status {0}")]
    Status(u16),
}

impl FetchError {
    /// A status answer means the host is reachable, so an earlier period may
    /// still be published. Transport failures and timeouts will not improve
    /// by asking about an older month.
    pub fn is_period_specific(&self) -> bool {
        matches!(self, Self::Status(_))
    }
}

/// Something that can be asked for the raw remote payload covering `period`.
///
/// Dropping the returned future abandons the attempt.
///
/// The provider puts no deadline of its own around `attempt_fetch`, so an
/// implementation must bound its own latency and report an overrun as
/// [`FetchError::Timeout`]. A source that never resolves stalls
/// `fetch_series` until the caller drops it.
pub trait StatisticsSource {
    fn attempt_fetch(&self, period: Period) -> BoxFuture<'_, Result<String, FetchError>>;
}

impl<S: StatisticsSource + ?Sized> StatisticsSource for Box<S> {
    fn attempt_fetch(&self, period: Period) -> BoxFuture<'_, Result<String, FetchError>> {
        (**self).attempt_fetch(period)
    }
}

impl<S: StatisticsSource + ?Sized> StatisticsSource for &S {
    fn attempt_fetch(&self, period: Period) -> BoxFuture<'_, Result<String, FetchError>> {
        (**self).attempt_fetch(period)
    }
}

/// A source that never answers; sessions built on it always use the bundled dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl StatisticsSource for OfflineSource {
    fn attempt_fetch(&self, _period: Period) -> BoxFuture<'_, Result<String, FetchError>> {
        future::ready(Err(FetchError::Transport("offline".to_string()))).boxed()
    }
}
