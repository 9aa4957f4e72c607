use crate::timeline::error::TimelineError;

/// Parses a `"<scheme>:<lat>,<lng>"` geo-point (e.g. `"geo:52.370216,4.895168"`).
///
/// The string is split once on the first `:` and the remainder once on `,`.
/// Both halves must be finite decimal numbers within the latitude/longitude ranges.
pub fn parse_geo_point(geo_point: &str) -> Result<(f64, f64), TimelineError> {
    let malformed = || TimelineError::MalformedGeoPoint(geo_point.to_string());

    let (_scheme, coordinates) = geo_point.split_once(':').ok_or_else(malformed)?;
    let (lat, lng) = coordinates.split_once(',').ok_or_else(malformed)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| malformed())?;
    let longitude: f64 = lng.trim().parse().map_err(|_| malformed())?;

    if !latitude.is_finite()
        || !longitude.is_finite()
        || !(-90.0..=90.0).contains(&latitude)
        || !(-180.0..=180.0).contains(&longitude)
    {
        return Err(malformed());
    }
    Ok((latitude, longitude))
}
