use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::principal::errors::EmailError;
use crate::principal::errors::LocationError;
use crate::principal::errors::RoleError;

/// Principal aggregate entity.
///
/// A registered account able to authenticate. The identifier is assigned at
/// creation and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub enabled: bool,
    pub location: Option<GeoLocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Principal unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Generate a new random principal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Comparison is
/// exact: `A@x.com` and `a@x.com` are different principals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role held by a principal. Exactly one per principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Driver,
    Parent,
    Student,
}

impl Role {
    /// Wire and storage name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Driver => "DRIVER",
            Role::Parent => "PARENT",
            Role::Student => "STUDENT",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "DRIVER" => Ok(Role::Driver),
            "PARENT" => Ok(Role::Parent),
            "STUDENT" => Ok(Role::Student),
            _ => Err(RoleError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GPS position of a principal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

impl GeoLocation {
    /// Create a validated position.
    ///
    /// # Errors
    /// * `LatitudeOutOfRange` - Latitude outside [-90, 90]
    /// * `LongitudeOutOfRange` - Longitude outside [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build an optional position from optional coordinates.
    ///
    /// # Errors
    /// * `Incomplete` - Only one of the two coordinates is present
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, LocationError> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => Err(LocationError::Incomplete),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Command to register a new principal with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub location: Option<GeoLocation>,
}

/// A principal together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub principal: Principal,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("a@x.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_email_is_case_sensitive() {
        let lower = EmailAddress::new("a@x.com".to_string()).unwrap();
        let upper = EmailAddress::new("A@x.com".to_string()).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("STUDENT".parse::<Role>(), Ok(Role::Student));
        assert_eq!("driver".parse::<Role>(), Ok(Role::Driver));
        assert_eq!(
            "PILOT".parse::<Role>(),
            Err(RoleError::Unknown("PILOT".to_string()))
        );
        assert_eq!(Role::Parent.to_string(), "PARENT");
    }

    #[test]
    fn test_location_from_parts() {
        let location = GeoLocation::from_parts(Some(36.8), Some(10.18)).unwrap();
        assert_eq!(location.map(|l| l.latitude()), Some(36.8));

        assert_eq!(GeoLocation::from_parts(None, None), Ok(None));
        assert_eq!(
            GeoLocation::from_parts(Some(1.0), None),
            Err(LocationError::Incomplete)
        );
        assert_eq!(
            GeoLocation::from_parts(Some(91.0), Some(0.0)),
            Err(LocationError::LatitudeOutOfRange(91.0))
        );
    }
}
