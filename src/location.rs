//! Finding out where the user is.
//!
//! Errors carry the numeric codes of the browser geolocation API so callers
//! can tell a refusal (code 1) apart from everything else.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::weather::Coordinates;

pub const IP_LOOKUP_URL: &str = "http://ip-api.com/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const PERMISSION_DENIED: u16 = 1;
pub const POSITION_UNAVAILABLE: u16 = 2;
pub const TIMEOUT: u16 = 3;

pub const PERMISSION_DENIED_MESSAGE: &str = "Permission required to proceed with acquisition of the geolocation information. Please give permission and try again.";
pub const LOCATION_FAILED_MESSAGE: &str =
    "Acquisition of the geolocation information failed. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub struct GeoError {
    pub code: u16,
    pub message: String,
}

impl GeoError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geolocation error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for GeoError {}

pub trait Locator {
    fn locate(&self) -> Result<Coordinates, GeoError>;
}

/// Why `locate` gave up, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoFailure {
    PermissionDenied,
    Other,
}

impl GeoFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => PERMISSION_DENIED_MESSAGE,
            Self::Other => LOCATION_FAILED_MESSAGE,
        }
    }
}

impl From<&GeoError> for GeoFailure {
    fn from(err: &GeoError) -> Self {
        if err.code == PERMISSION_DENIED {
            Self::PermissionDenied
        } else {
            Self::Other
        }
    }
}

pub fn locate(locator: &impl Locator) -> Result<Coordinates, GeoFailure> {
    locator.locate().map_err(|err| {
        log::error!("{err}");
        GeoFailure::from(&err)
    })
}

/// Coordinates given up front (command line or config).
pub struct FixedLocator(pub Coordinates);

impl Locator for FixedLocator {
    fn locate(&self) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate position from the public IP address. `enabled = false` plays
/// the part of a refused permission prompt.
pub struct IpLocator {
    client: Client,
    url: String,
    enabled: bool,
}

impl IpLocator {
    pub fn new(url: &str, enabled: bool) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("wxdash")
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            enabled,
        })
    }
}

impl Locator for IpLocator {
    fn locate(&self) -> Result<Coordinates, GeoError> {
        if !self.enabled {
            return Err(GeoError::new(
                PERMISSION_DENIED,
                "geolocation is disabled in the configuration",
            ));
        }

        let response = self.client.get(&self.url).send().map_err(|e| {
            let code = if e.is_timeout() {
                TIMEOUT
            } else {
                POSITION_UNAVAILABLE
            };
            GeoError::new(code, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::new(
                POSITION_UNAVAILABLE,
                format!("lookup answered {status}"),
            ));
        }

        let body: IpLookup = response
            .json()
            .map_err(|e| GeoError::new(POSITION_UNAVAILABLE, e.to_string()))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(latitude), Some(longitude)) => {
                log::info!("located at {latitude}, {longitude}");
                Ok(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(GeoError::new(
                POSITION_UNAVAILABLE,
                body.message.unwrap_or_else(|| "lookup failed".to_string()),
            )),
        }
    }
}

/// The locator the binary runs with: fixed coordinates when configured,
/// otherwise the IP lookup.
pub enum SystemLocator {
    Fixed(FixedLocator),
    Ip(IpLocator),
}

impl SystemLocator {
    pub fn new(
        url: &str,
        enabled: bool,
        fixed: Option<Coordinates>,
    ) -> Result<Self, reqwest::Error> {
        Ok(match fixed {
            Some(here) if enabled => Self::Fixed(FixedLocator(here)),
            _ => Self::Ip(IpLocator::new(url, enabled)?),
        })
    }
}

impl Locator for SystemLocator {
    fn locate(&self) -> Result<Coordinates, GeoError> {
        match self {
            Self::Fixed(locator) => locator.locate(),
            Self::Ip(locator) => locator.locate(),
        }
    }
}
