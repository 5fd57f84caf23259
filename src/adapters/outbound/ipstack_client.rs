//! ipstack Lookup Client
//!
//! Implements GeolocationLookup against an ipstack-compatible HTTP API.
//! Every transport, parse, and application failure is normalized into a
//! LookupOutcome; nothing escapes as an error.

use crate::domain::ports::GeolocationLookup;
use crate::domain::value_objects::LookupOutcome;
use async_trait::async_trait;
use serde_json::Value;
use std::net::IpAddr;

/// HTTP client for the external geolocation provider.
///
/// Requests are keyed by IP: `GET {base_url}/{ip}?access_key={key}`.
/// The access key comes from configuration, never from code.
pub struct IpstackClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl IpstackClient {
    pub fn new(base_url: String, access_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            access_key,
        }
    }

    fn request_url(&self, ip: IpAddr) -> String {
        format!(
            "{}/{}?access_key={}",
            self.base_url.trim_end_matches('/'),
            ip,
            self.access_key
        )
    }
}

/// Render a JSON value as a present field value, or None when blank.
///
/// Null, blank strings, false, and empty collections count as absent;
/// other scalars are rendered to their JSON text.
fn present_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::String(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Value::Array(items) if items.is_empty() => None,
        Value::Object(members) if members.is_empty() => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl GeolocationLookup for IpstackClient {
    async fn fetch(&self, ip: IpAddr, fields: &[&str]) -> LookupOutcome {
        let url = self.request_url(ip);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("geolocation request failed for {}: {}", ip, e);
                return LookupOutcome::NoData;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("failed reading geolocation response for {}: {}", ip, e);
                return LookupOutcome::NoData;
            }
        };

        // Non-success responses carry their body verbatim as the error
        if !status.is_success() {
            tracing::debug!("geolocation provider returned {} for {}", status, ip);
            return LookupOutcome::Error(body);
        }

        let parsed: Value = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("unparsable geolocation response for {}", ip);
                return LookupOutcome::NoData;
            }
        };

        // A `detail` member marks the provider's not-found shape
        if parsed.get("detail").and_then(present_value).is_some() {
            return LookupOutcome::Error("Resource not found".to_string());
        }

        if let Some(info) = parsed
            .get("error")
            .and_then(|error| error.get("info"))
            .and_then(present_value)
        {
            return LookupOutcome::Error(info);
        }

        let extracted: Vec<(String, String)> = fields
            .iter()
            .filter_map(|field| {
                parsed
                    .get(*field)
                    .and_then(present_value)
                    .map(|value| ((*field).to_string(), value))
            })
            .collect();

        if extracted.is_empty() {
            // parseable body, no requested fields, no error markers
            LookupOutcome::NoData
        } else {
            LookupOutcome::Fields(extracted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_url_is_keyed_by_ip() {
        let client = IpstackClient::new(
            "https://api.ipstack.com".to_string(),
            "secret".to_string(),
        );
        let ip: IpAddr = "77.46.83.45".parse().unwrap();
        assert_eq!(
            client.request_url(ip),
            "https://api.ipstack.com/77.46.83.45?access_key=secret"
        );
    }

    #[test]
    fn test_request_url_trims_trailing_slash() {
        let client = IpstackClient::new("http://localhost:4000/".to_string(), "k".to_string());
        let ip: IpAddr = "::1".parse().unwrap();
        assert_eq!(client.request_url(ip), "http://localhost:4000/::1?access_key=k");
    }

    #[test]
    fn test_present_value_blankness() {
        assert_eq!(present_value(&Value::Null), None);
        assert_eq!(present_value(&json!("")), None);
        assert_eq!(present_value(&json!("   ")), None);
        assert_eq!(present_value(&json!(false)), None);
        assert_eq!(present_value(&json!([])), None);
        assert_eq!(present_value(&json!({})), None);

        assert_eq!(present_value(&json!("Warsaw")), Some("Warsaw".to_string()));
        assert_eq!(present_value(&json!(15668)), Some("15668".to_string()));
        assert_eq!(present_value(&json!(true)), Some("true".to_string()));
    }
}
