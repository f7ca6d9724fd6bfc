//! Yandex-compatible HTTP geocoder.
//!
//! `GET {base_url}?geocode=<address>&apikey=<key>&format=json`; candidates
//! arrive ranked by relevance and only the first one is used.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::domain::location::{Coordinates, GeocodeError};
use crate::domain::ports::Geocoder;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    response: GeocodeBody,
}

#[derive(Debug, Deserialize)]
struct GeocodeBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    feature_member: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: GeoPoint,
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    /// `"<longitude> <latitude>"`
    pos: String,
}

pub struct YandexGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YandexGeocoder {
    /// Must be called outside of an async runtime; the blocking client owns
    /// one internally.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl Geocoder for YandexGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("geocode", address),
                ("apikey", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: GeocodeResponse = response
            .json()
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;
        most_relevant(body)
    }
}

fn most_relevant(body: GeocodeResponse) -> Result<Option<Coordinates>, GeocodeError> {
    body.response
        .collection
        .feature_member
        .into_iter()
        .next()
        .map(|member| parse_position(&member.geo_object.point.pos))
        .transpose()
}

fn parse_position(pos: &str) -> Result<Coordinates, GeocodeError> {
    let mut parts = pos.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GeocodeError::Malformed(format!("unexpected position '{pos}'")));
    };
    let parse = |value: &str| {
        value
            .parse::<f64>()
            .map_err(|e| GeocodeError::Malformed(format!("bad coordinate '{value}': {e}")))
    };
    let (longitude, latitude) = (parse(lon)?, parse(lat)?);
    if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
        return Err(GeocodeError::Malformed(format!(
            "position '{pos}' is outside the WGS-84 range"
        )));
    }
    Ok(Coordinates::new(longitude, latitude))
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use super::*;

    /// Serves exactly one HTTP response and hands back the request line.
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
        let url = format!("http://{}/1.x", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap_or(0);
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&buf[..n])
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        (url, handle)
    }

    fn geocoder(base_url: String) -> YandexGeocoder {
        YandexGeocoder::new(&GeocoderConfig {
            base_url,
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn body(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).expect("valid geocoder payload")
    }

    #[test]
    fn takes_first_candidate() {
        let response = body(
            r#"{"response": {"GeoObjectCollection": {"featureMember": [
                {"GeoObject": {"name": "Red Square", "Point": {"pos": "37.620795 55.753930"}}},
                {"GeoObject": {"name": "Red Square, Tver", "Point": {"pos": "35.9 56.8"}}}
            ]}}}"#,
        );

        let coordinates = most_relevant(response).unwrap().unwrap();

        assert_eq!(coordinates, Coordinates::new(37.620795, 55.753930));
    }

    #[test]
    fn no_candidates_is_not_an_error() {
        let response = body(r#"{"response": {"GeoObjectCollection": {"featureMember": []}}}"#);
        assert_eq!(most_relevant(response).unwrap(), None);
    }

    #[test]
    fn malformed_position_is_rejected() {
        assert!(matches!(
            parse_position("37.62"),
            Err(GeocodeError::Malformed(_))
        ));
        assert!(matches!(
            parse_position("east north"),
            Err(GeocodeError::Malformed(_))
        ));
        assert!(matches!(
            parse_position("1 2 3"),
            Err(GeocodeError::Malformed(_))
        ));
    }

    #[test]
    fn non_finite_or_out_of_range_position_is_rejected() {
        for pos in ["nan inf", "NaN 55.75", "37.62 -inf", "200 100", "37.62 91", "-180.5 0"] {
            assert!(
                matches!(parse_position(pos), Err(GeocodeError::Malformed(_))),
                "{pos} should be rejected"
            );
        }
        assert_eq!(
            parse_position("-180 90").unwrap(),
            Coordinates::new(-180.0, 90.0)
        );
    }

    #[test]
    fn unusable_provider_position_is_an_error() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"response": {"GeoObjectCollection": {"featureMember": [
                {"GeoObject": {"Point": {"pos": "nan inf"}}}
            ]}}}"#,
        );

        let err = geocoder(url).geocode("Nowhere").unwrap_err();

        assert!(matches!(err, GeocodeError::Malformed(_)));
        server.join().unwrap();
    }

    #[test]
    fn queries_provider_and_parses_position() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"response": {"GeoObjectCollection": {"featureMember": [
                {"GeoObject": {"Point": {"pos": "37.6156 55.7575"}}}
            ]}}}"#,
        );

        let coordinates = geocoder(url).geocode("Tverskaya 1").unwrap();

        assert_eq!(coordinates, Some(Coordinates::new(37.6156, 55.7575)));
        let request_line = server.join().unwrap();
        assert!(request_line.contains("apikey=test-key"));
        assert!(request_line.contains("format=json"));
    }

    #[test]
    fn provider_error_status_is_reported() {
        let (url, server) = serve_once("403 Forbidden", "{}");

        let err = geocoder(url).geocode("Tverskaya 1").unwrap_err();

        assert!(matches!(err, GeocodeError::Status(403)));
        server.join().unwrap();
    }
}
