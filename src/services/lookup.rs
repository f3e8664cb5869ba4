// NetCommand - Public IP and Geolocation Lookups
// SPDX-License-Identifier: MIT

//! Public-IP echo, IP geolocation, and reverse geocoding.
//!
//! All lookups are attempt-once with short caller-side timeouts. Transport
//! failures degrade to sentinels (`"Unavailable"`, `None`); the one
//! exception is [`LookupClient::geolocate`], whose business-level failure
//! (`status != "success"`) surfaces as [`Error::Lookup`] for the top-level
//! diagnostic path.

use std::net::UdpSocket;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{AppConfig, Error, LocationInfo, Result};

/// Sentinel returned when the public IP cannot be determined.
pub const UNAVAILABLE: &str = "Unavailable";

const IP_ECHO_URL: &str = "https://api.ipify.org?format=json";
const GEO_BASE_URL: &str = "http://ip-api.com/json/";
const GEO_FIELDS: &str =
    "status,message,country,regionName,city,lat,lon,timezone,isp,org,as,query,proxy,hosting";
const GEOCODE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

const IP_ECHO_TIMEOUT: Duration = Duration::from_secs(2);
const LOCATE_TIMEOUT: Duration = Duration::from_secs(5);
const GEOLOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct IpEcho {
    ip: String,
}

/// Geolocation service envelope: a `status` discriminator plus, on
/// success, the location fields themselves.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    location: LocationInfo,
}

impl GeoResponse {
    fn is_success(&self) -> bool {
        self.status == "success"
    }

    fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "IP lookup failed".to_string())
    }
}

/// Reverse-geocoded street address details consumed from the first result.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetAddress {
    pub formatted: String,
    pub continent: Option<String>,
    pub postcode: Option<String>,
    pub currency: Option<String>,
    pub calling_code: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted: String,
    #[serde(default)]
    components: GeocodeComponents,
    #[serde(default)]
    annotations: GeocodeAnnotations,
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeComponents {
    continent: Option<String>,
    postcode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeocodeAnnotations {
    currency: Option<GeocodeCurrency>,
    callingcode: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeocodeCurrency {
    name: Option<String>,
}

/// Interpret the geolocation envelope for the routine status path:
/// anything but a business-level success is "no data".
fn location_from_response(response: GeoResponse) -> Option<LocationInfo> {
    if response.is_success() {
        Some(response.location)
    } else {
        debug!("Geolocation reported no data: {}", response.failure_message());
        None
    }
}

/// Interpret the geolocation envelope for the diagnostic path: a
/// business-level failure carries the service's own message.
fn location_from_response_strict(response: GeoResponse) -> Result<LocationInfo> {
    if response.is_success() {
        Ok(response.location)
    } else {
        Err(Error::Lookup(response.failure_message()))
    }
}

/// Pick the first reverse-geocoding result; an empty list is a valid
/// "no match".
fn first_address(response: GeocodeResponse) -> Option<StreetAddress> {
    let result = response.results.into_iter().next()?;
    Some(StreetAddress {
        formatted: result.formatted,
        continent: result.components.continent,
        postcode: result.components.postcode,
        currency: result.annotations.currency.and_then(|c| c.name),
        calling_code: result.annotations.callingcode,
    })
}

/// Client for the external identity and geolocation services.
pub struct LookupClient {
    http: reqwest::Client,
    geocode_api_key: Option<String>,
}

impl LookupClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("netcommand/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            geocode_api_key: config.geocode_api_key.clone(),
        })
    }

    /// Resolve the public IP via the echo service. Returns the literal
    /// sentinel `"Unavailable"` on any error, timeout, or non-2xx response.
    pub async fn public_ip(&self) -> String {
        let response = match self
            .http
            .get(IP_ECHO_URL)
            .timeout(IP_ECHO_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                debug!("Public IP lookup failed: {}", e);
                return UNAVAILABLE.to_string();
            }
        };
        if !response.status().is_success() {
            debug!("Public IP lookup got HTTP {}", response.status());
            return UNAVAILABLE.to_string();
        }
        match response.json::<IpEcho>().await {
            Ok(echo) => echo.ip,
            Err(e) => {
                debug!("Public IP response unparsable: {}", e);
                UNAVAILABLE.to_string()
            }
        }
    }

    /// Best-effort local address discovery: the bound address of a UDP
    /// socket pointed at a public resolver. No packet is sent.
    pub fn local_ip(&self) -> String {
        let probe = || -> std::io::Result<String> {
            let socket = UdpSocket::bind("0.0.0.0:0")?;
            socket.connect("8.8.8.8:80")?;
            Ok(socket.local_addr()?.ip().to_string())
        };
        probe().unwrap_or_else(|e| {
            debug!("Local IP discovery failed: {}", e);
            UNAVAILABLE.to_string()
        })
    }

    /// Geolocate our own public IP for the routine status path. Any
    /// transport or business failure is "no data", a legitimate steady
    /// state when offline.
    pub async fn locate(&self) -> Option<LocationInfo> {
        let url = format!("{}?fields={}", GEO_BASE_URL, GEO_FIELDS);
        let response = match self.http.get(&url).timeout(LOCATE_TIMEOUT).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Geolocation request failed: {}", e);
                return None;
            }
        };
        match response.json::<GeoResponse>().await {
            Ok(envelope) => location_from_response(envelope),
            Err(e) => {
                debug!("Geolocation response unparsable: {}", e);
                None
            }
        }
    }

    /// Geolocate a specific IP for the diagnostic path. Transport errors
    /// and business-level failures both surface as errors here.
    pub async fn geolocate(&self, ip: &str) -> Result<LocationInfo> {
        let url = format!("{}{}?fields={}", GEO_BASE_URL, ip, GEO_FIELDS);
        let response = self
            .http
            .get(&url)
            .timeout(GEOLOCATE_TIMEOUT)
            .send()
            .await?;
        let envelope = response.json::<GeoResponse>().await?;
        location_from_response_strict(envelope)
    }

    /// Reverse-geocode coordinates via OpenCage. Requires the API key from
    /// configuration; an empty results list is `Ok(None)`.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Option<StreetAddress>> {
        let key = self
            .geocode_api_key
            .as_deref()
            .ok_or(Error::MissingGeocodeKey)?;
        let response = self
            .http
            .get(GEOCODE_URL)
            .query(&[
                ("q", format!("{},{}", lat, lon).as_str()),
                ("key", key),
                ("language", "en"),
                ("no_annotations", "0"),
            ])
            .timeout(GEOLOCATE_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            warn!("Reverse geocoding got HTTP {}", response.status());
            return Ok(None);
        }
        let body = response.json::<GeocodeResponse>().await?;
        Ok(first_address(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_PAYLOAD: &str = r#"{
        "status": "success",
        "country": "Greece",
        "regionName": "Attica",
        "city": "Athens",
        "lat": 37.98,
        "lon": 23.72,
        "timezone": "Europe/Athens",
        "isp": "Example ISP",
        "org": "Example Org",
        "as": "AS64500 Example",
        "query": "203.0.113.9",
        "proxy": true,
        "hosting": false
    }"#;

    const FAILURE_PAYLOAD: &str = r#"{
        "status": "fail",
        "message": "reserved range",
        "query": "192.168.1.1"
    }"#;

    #[test]
    fn success_envelope_yields_location() {
        let envelope: GeoResponse = serde_json::from_str(SUCCESS_PAYLOAD).unwrap();
        let location = location_from_response(envelope).unwrap();
        assert_eq!(location.city, "Athens");
        assert_eq!(location.public_ip, "203.0.113.9");
        assert!(location.proxy);
        assert_eq!(location.anonymity_verdict(), "VPN/PROXY");
    }

    #[test]
    fn business_failure_is_no_data_on_routine_path() {
        let envelope: GeoResponse = serde_json::from_str(FAILURE_PAYLOAD).unwrap();
        assert!(location_from_response(envelope).is_none());
    }

    #[test]
    fn business_failure_is_error_on_diagnostic_path() {
        let envelope: GeoResponse = serde_json::from_str(FAILURE_PAYLOAD).unwrap();
        let err = location_from_response_strict(envelope).unwrap_err();
        assert!(matches!(err, Error::Lookup(ref m) if m == "reserved range"));
    }

    #[test]
    fn failure_without_message_has_fallback() {
        let envelope: GeoResponse = serde_json::from_str(r#"{"status": "fail"}"#).unwrap();
        let err = location_from_response_strict(envelope).unwrap_err();
        assert!(matches!(err, Error::Lookup(ref m) if m == "IP lookup failed"));
    }

    #[test]
    fn ip_echo_parses() {
        let echo: IpEcho = serde_json::from_str(r#"{"ip": "203.0.113.9"}"#).unwrap();
        assert_eq!(echo.ip, "203.0.113.9");
    }

    #[test]
    fn first_geocode_result_is_consumed() {
        let body: GeocodeResponse = serde_json::from_str(
            r#"{
                "results": [
                    {
                        "formatted": "Syntagma Square, Athens 105 63, Greece",
                        "components": {"continent": "Europe", "postcode": "105 63"},
                        "annotations": {"currency": {"name": "Euro"}, "callingcode": 30}
                    },
                    {"formatted": "second result, ignored"}
                ]
            }"#,
        )
        .unwrap();
        let address = first_address(body).unwrap();
        assert_eq!(address.formatted, "Syntagma Square, Athens 105 63, Greece");
        assert_eq!(address.continent.as_deref(), Some("Europe"));
        assert_eq!(address.currency.as_deref(), Some("Euro"));
        assert_eq!(address.calling_code, Some(30));
    }

    #[test]
    fn empty_geocode_results_is_no_match() {
        let body: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(first_address(body).is_none());
    }

    #[tokio::test]
    async fn reverse_geocode_without_key_is_an_error() {
        let client = LookupClient::new(&AppConfig::default()).unwrap();
        let err = client.reverse_geocode(37.98, 23.72).await.unwrap_err();
        assert!(matches!(err, Error::MissingGeocodeKey));
    }
}
