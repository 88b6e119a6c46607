//! Deep links into a map application for an ordered list of stops.

use reqwest::Url;

use crate::error::{Error, Result};
use crate::point::Point;
use crate::traits::Stop;

pub const GOOGLE_MAPS_DIR: &str = "https://www.google.com/maps/dir/";

/// Origin segment that asks the map app to use the device position.
pub const CURRENT_LOCATION: &str = "current+location";

/// Builds `.../maps/dir/<origin>/<stop 1>/.../<destination>`.
///
/// Each stop becomes `lat,lng` when it has coordinates, otherwise its
/// address; stops with neither are left out.
pub fn directions_url<T: Stop>(origin: Option<Point>, stops: &[T]) -> Result<Url> {
    let mut url = Url::parse(GOOGLE_MAPS_DIR).map_err(|err| Error::invalid_input(err.to_string()))?;

    let origin = origin
        .filter(Point::is_finite)
        .map(format_point)
        .unwrap_or_else(|| CURRENT_LOCATION.to_string());

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::invalid_input("map base url cannot take path segments"))?;
        segments.pop_if_empty().push(&origin);
        for segment in stops.iter().filter_map(waypoint) {
            segments.push(&segment);
        }
    }

    Ok(url)
}

fn waypoint<T: Stop>(stop: &T) -> Option<String> {
    stop.finite_location()
        .map(format_point)
        .or_else(|| stop.address().map(|address| address.trim().to_string()))
        .filter(|segment| !segment.is_empty())
}

fn format_point(point: Point) -> String {
    format!("{:.6},{:.6}", point.lat, point.lng)
}
