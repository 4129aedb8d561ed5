//! Location resolution.

use crate::error::InvalidLocation;
use crate::model::Location;

/// Resolve raw caller input into a [`Location`].
///
/// Coordinates win when both are finite and in range; a supplied address is
/// then kept as the label. Otherwise a non-blank address yields an
/// address-only location. Anything else is rejected.
pub fn resolve(
    raw_lat: Option<f64>,
    raw_lng: Option<f64>,
    raw_address: Option<&str>,
) -> Result<Location, InvalidLocation> {
    let address = raw_address
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string);

    if let (Some(lat), Some(lng)) = (raw_lat, raw_lng) {
        if valid_latitude(lat) && valid_longitude(lng) {
            return Ok(Location::from_coordinates(lat, lng, address));
        }
    }

    address.map(Location::from_address).ok_or(InvalidLocation)
}

/// Parse a textual coordinate component. Only finite decimals are accepted.
pub fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

fn valid_longitude(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_get_rounded_label() {
        let location = resolve(Some(34.052235), Some(-118.243683), None).unwrap();
        assert_eq!(location.coordinates(), Some((34.052235, -118.243683)));
        assert_eq!(location.label(), "34.0522, -118.2437");
        assert_eq!(location.address(), None);
    }

    #[test]
    fn coordinates_keep_address_as_label() {
        let location = resolve(Some(34.0522), Some(-118.2437), Some("  200 N Spring St ")).unwrap();
        assert!(location.coordinates().is_some());
        assert_eq!(location.label(), "200 N Spring St");
        assert_eq!(location.address(), Some("200 N Spring St"));
    }

    #[test]
    fn range_boundaries_are_valid() {
        for (lat, lng) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
            let location = resolve(Some(lat), Some(lng), None).unwrap();
            assert_eq!(location.coordinates(), Some((lat, lng)));
        }
    }

    #[test]
    fn address_only() {
        let location = resolve(None, None, Some("Union Station, Los Angeles")).unwrap();
        assert_eq!(location.coordinates(), None);
        assert_eq!(location.label(), "Union Station, Los Angeles");
    }

    #[test]
    fn out_of_range_falls_back_to_address() {
        let location = resolve(Some(91.0), Some(10.0), Some("somewhere")).unwrap();
        assert_eq!(location.coordinates(), None);
        assert_eq!(location.address(), Some("somewhere"));
    }

    #[test]
    fn single_coordinate_is_not_enough() {
        assert_eq!(resolve(Some(34.0), None, None), Err(InvalidLocation));
        assert_eq!(resolve(None, Some(-118.0), Some("   ")), Err(InvalidLocation));
    }

    #[test]
    fn nothing_usable_is_rejected() {
        assert_eq!(resolve(None, None, None), Err(InvalidLocation));
        assert_eq!(resolve(None, None, Some("")), Err(InvalidLocation));
        assert_eq!(resolve(Some(f64::NAN), Some(0.0), Some(" \t")), Err(InvalidLocation));
        assert_eq!(resolve(Some(-90.5), Some(181.0), None), Err(InvalidLocation));
    }

    #[test]
    fn parse_coordinate_rejects_garbage() {
        assert_eq!(parse_coordinate(Some(" 34.0522 ")), Some(34.0522));
        assert_eq!(parse_coordinate(Some("abc")), None);
        assert_eq!(parse_coordinate(Some("inf")), None);
        assert_eq!(parse_coordinate(Some("NaN")), None);
        assert_eq!(parse_coordinate(None), None);
    }
}
