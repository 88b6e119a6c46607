//! Bounded-wait origin acquisition.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::point::Point;
use crate::traits::LocationSource;

/// How long to wait for a device fix before planning without one.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(8);

/// Asks `source` for the current position, waiting at most `timeout`.
///
/// Errors, non-finite fixes and timeouts all resolve to `None`. A source
/// that outlives the timeout keeps running on its own thread; its late
/// answer is dropped.
pub fn acquire_origin<L>(source: L, timeout: Duration) -> Option<Point>
where
    L: LocationSource + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("location-fix".to_string())
        .spawn(move || {
            let _ = sender.send(source.current_location());
        });

    if let Err(err) = spawned {
        tracing::warn!(error = %err, "could not start location lookup");
        return None;
    }

    match receiver.recv_timeout(timeout) {
        Ok(Ok(point)) if point.is_finite() => Some(point),
        Ok(Ok(point)) => {
            tracing::warn!(%point, "location source returned a non-finite fix");
            None
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "location unavailable");
            None
        }
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "location lookup timed out");
            None
        }
    }
}

/// A source that always reports the same point.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Point);

impl LocationSource for FixedLocation {
    fn current_location(&self) -> crate::Result<Point> {
        Ok(self.0)
    }
}
