//! Los Angeles emergency departments for realistic test fixtures.
//!
//! Approximate coordinates of real hospitals around downtown Los Angeles.

use emergency_router::Facility;

/// A named hospital with coordinates and a switchboard number.
#[derive(Debug, Clone)]
pub struct Hospital {
    pub id: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Hospital {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        address: &'static str,
        phone: &'static str,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            id,
            name,
            address,
            phone,
            lat,
            lng,
        }
    }

    pub fn facility(&self) -> Facility {
        Facility::new(self.id, self.name, self.address)
            .with_phone(self.phone)
            .with_coordinates(self.lat, self.lng)
    }
}

// ============================================================================
// Downtown origins
// ============================================================================

/// Los Angeles City Hall.
pub const CITY_HALL: (f64, f64) = (34.0537, -118.2427);

/// Santa Monica Pier, west side.
pub const SANTA_MONICA_PIER: (f64, f64) = (34.0083, -118.4988);

// ============================================================================
// Hospitals
// ============================================================================

pub const HOSPITALS: &[Hospital] = &[
    Hospital::new(
        "good-samaritan",
        "Good Samaritan Hospital",
        "1225 Wilshire Blvd, Los Angeles, CA 90017",
        "(213) 977-2121",
        34.0528,
        -118.2650,
    ),
    Hospital::new(
        "california-hospital",
        "California Hospital Medical Center",
        "1401 S Grand Ave, Los Angeles, CA 90015",
        "(213) 748-2411",
        34.0377,
        -118.2658,
    ),
    Hospital::new(
        "lac-usc",
        "LAC+USC Medical Center",
        "2051 Marengo St, Los Angeles, CA 90033",
        "(323) 409-1000",
        34.0590,
        -118.2095,
    ),
    Hospital::new(
        "white-memorial",
        "Adventist Health White Memorial",
        "1720 E Cesar E Chavez Ave, Los Angeles, CA 90033",
        "(323) 268-5000",
        34.0489,
        -118.2171,
    ),
    Hospital::new(
        "hollywood-presbyterian",
        "Hollywood Presbyterian Medical Center",
        "1300 N Vermont Ave, Los Angeles, CA 90027",
        "(213) 413-3000",
        34.0962,
        -118.2913,
    ),
    Hospital::new(
        "cedars-sinai",
        "Cedars-Sinai Medical Center",
        "8700 Beverly Blvd, Los Angeles, CA 90048",
        "(310) 423-3277",
        34.0753,
        -118.3804,
    ),
    Hospital::new(
        "ucla-santa-monica",
        "UCLA Medical Center, Santa Monica",
        "1250 16th St, Santa Monica, CA 90404",
        "(424) 259-6000",
        34.0276,
        -118.4860,
    ),
];

pub fn facilities() -> Vec<Facility> {
    HOSPITALS.iter().map(Hospital::facility).collect()
}
