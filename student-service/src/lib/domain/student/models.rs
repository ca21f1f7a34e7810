use std::fmt;

use crate::student::errors::LocationError;
use crate::student::errors::NameError;
use crate::student::errors::StudentIdError;

/// Student record served by the transport backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub location: Option<Location>,
}

/// Database-assigned student identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentId(pub i64);

impl StudentId {
    /// Parse a student ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a positive integer
    pub fn from_string(s: &str) -> Result<Self, StudentIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(StudentIdError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name, trimmed and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MAX_LENGTH: usize = 100;

    /// Create a validated name.
    ///
    /// # Arguments
    /// * `field` - Field name used in error messages
    /// * `name` - Raw name
    ///
    /// # Errors
    /// * `Blank` - Empty after trimming
    /// * `TooLong` - Longer than 100 characters
    pub fn new(field: &'static str, name: String) -> Result<Self, NameError> {
        let name = name.trim();
        let length = name.chars().count();

        if length == 0 {
            Err(NameError::Blank { field })
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                field,
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pickup position of a student.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build an optional location from optional coordinates.
    ///
    /// # Errors
    /// * `Incomplete` - Only one coordinate is present
    /// * `LatitudeOutOfRange` / `LongitudeOutOfRange` - Coordinate outside WGS84 bounds
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, LocationError> {
        let (latitude, longitude) = match (latitude, longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            (None, None) => return Ok(None),
            _ => return Err(LocationError::Incomplete),
        };

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::LongitudeOutOfRange(longitude));
        }

        Ok(Some(Self {
            latitude,
            longitude,
        }))
    }
}

/// Validated student fields, used for both creation and full replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDetails {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub location: Option<Location>,
}

impl StudentDetails {
    /// Attach an identifier, producing the stored record.
    pub fn with_id(self, id: StudentId) -> Student {
        Student {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            location: self.location,
        }
    }
}
