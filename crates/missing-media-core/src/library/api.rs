//! Plex HTTP API client.
//!
//! Every request carries `Accept: application/json` and the token as the
//! `X-Plex-Token` query parameter. Responses are wrapped in a
//! `MediaContainer` envelope.

use std::time::Instant;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::transport::HttpTransport;
use super::LibraryIndex;
use crate::error::Error;
use crate::media::SectionKind;
use crate::path::{normalize, FileSet};
use crate::progress::ProgressReporter;
use crate::section::Section;

const TOKEN_PARAM: &str = "X-Plex-Token";
const CONTAINER_KEY: &str = "MediaContainer";
const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Deserialize)]
struct SectionList {
    size: Option<u64>,
    #[serde(rename = "Directory")]
    directory: Option<Vec<Directory>>,
}

#[derive(Debug, Deserialize)]
struct Directory {
    #[serde(deserialize_with = "deserialize_key")]
    key: i64,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "Location", default)]
    locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    path: String,
}

#[derive(Debug, Deserialize)]
struct ItemList {
    size: Option<u64>,
    #[serde(rename = "Metadata")]
    metadata: Option<Vec<MediaItem>>,
}

#[derive(Debug, Deserialize)]
struct MediaItem {
    #[serde(rename = "ratingKey", default)]
    rating_key: String,
    #[serde(default)]
    guid: String,
    #[serde(rename = "Media", default)]
    media: Vec<Media>,
    #[serde(rename = "Extras")]
    extras: Option<Extras>,
}

#[derive(Debug, Deserialize)]
struct Extras {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct Media {
    #[serde(rename = "Part", default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    file: Option<String>,
}

impl MediaItem {
    /// Files of every (version, part) pair.
    fn files(&self) -> impl Iterator<Item = &str> {
        self.media
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter_map(|p| p.file.as_deref())
    }

    /// Extras backed by a local file; others (e.g. streamed trailers) have
    /// nothing on disk to compare against.
    fn local_extras(&self) -> impl Iterator<Item = &MediaItem> {
        self.extras
            .iter()
            .flat_map(|e| e.metadata.iter())
            .filter(|extra| extra.guid.starts_with("file://"))
    }
}

impl ItemList {
    /// Plex omits `Metadata` for empty containers. Anything else missing it
    /// is a response we do not understand.
    fn into_items(self, path: &str) -> Result<Vec<MediaItem>, Error> {
        match (self.metadata, self.size) {
            (Some(items), _) => Ok(items),
            (None, Some(0)) => Ok(Vec::new()),
            (None, _) => Err(Error::Protocol(format!(
                "{} returned a MediaContainer without Metadata",
                path
            ))),
        }
    }
}

fn deserialize_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Number(i64),
        Text(String),
    }

    match Key::deserialize(deserializer)? {
        Key::Number(n) => Ok(n),
        Key::Text(s) => s.parse().map_err(de::Error::custom),
    }
}

/// Library index backed by a Plex server's HTTP API.
pub struct PlexApi<T> {
    host: String,
    token: String,
    transport: T,
}

impl<T: HttpTransport> PlexApi<T> {
    pub fn new(host: &str, token: &str, transport: T) -> Result<Self, Error> {
        let host = host.trim().trim_end_matches('/').to_string();
        if token.trim().is_empty() {
            return Err(Error::Configuration(
                "a Plex token is required when not reading the database".to_string(),
            ));
        }
        let parsed = Url::parse(&host)
            .map_err(|e| Error::Configuration(format!("invalid Plex host '{}': {}", host, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Configuration(format!("invalid Plex host '{}'", host)));
        }

        Ok(Self {
            host,
            token: token.trim().to_string(),
            transport,
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("{}{}", self.host, path))
            .map_err(|e| Error::Configuration(format!("invalid Plex URL for {}: {}", path, e)))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair(TOKEN_PARAM, &self.token);
        Ok(url)
    }

    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String, Error> {
        let url = self.url(path, params)?;
        debug!("GET {}", redact(&url));

        let response = self.transport.get(&url)?;
        match response.status {
            200..=299 => Ok(response.body),
            401 | 403 => Err(Error::Auth {
                status: response.status,
            }),
            status => Err(Error::Protocol(format!(
                "bad response from Plex for {} (HTTP {})",
                path, status
            ))),
        }
    }

    fn get_container<C: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<C, Error> {
        let body = self.get(path, params)?;
        let mut envelope: Value = serde_json::from_str(&body)
            .map_err(|e| Error::Protocol(format!("{} did not return JSON: {}", path, e)))?;

        let container = envelope
            .get_mut(CONTAINER_KEY)
            .map(Value::take)
            .ok_or_else(|| {
                Error::Protocol(format!("{} returned no {}", path, CONTAINER_KEY))
            })?;

        serde_json::from_value(container).map_err(|e| {
            Error::Protocol(format!("unexpected {} from {}: {}", CONTAINER_KEY, path, e))
        })
    }

    fn extra_files(&self, item: &MediaItem, in_library: &mut FileSet) -> Result<(), Error> {
        if item.rating_key.is_empty() {
            return Err(Error::Protocol(
                "library item without a ratingKey".to_string(),
            ));
        }

        let path = format!("/library/metadata/{}", item.rating_key);
        let detail: ItemList = self.get_container(&path, &[("includeExtras", "1".to_string())])?;
        for entry in detail.into_items(&path)? {
            for extra in entry.local_extras() {
                in_library.extend(extra.files().map(normalize));
            }
        }
        Ok(())
    }
}

impl<T: HttpTransport> LibraryIndex for PlexApi<T> {
    fn check_connection(&self) -> Result<(), Error> {
        self.get("/", &[])?;
        info!("Connected to Plex at {}", self.host);
        Ok(())
    }

    fn sections(&self) -> Result<Vec<Section>, Error> {
        let path = "/library/sections";
        let list: SectionList = self.get_container(path, &[])?;
        let directories = match (list.directory, list.size) {
            (Some(directories), _) => directories,
            (None, Some(0)) => Vec::new(),
            (None, _) => {
                return Err(Error::Protocol(format!(
                    "{} returned a MediaContainer without Directory",
                    path
                )))
            }
        };

        Ok(directories
            .into_iter()
            .map(|d| Section {
                key: d.key,
                title: d.title,
                kind: SectionKind::from_api(&d.kind),
                locations: d.locations.into_iter().map(|l| l.path).collect(),
            })
            .collect())
    }

    fn collect(
        &self,
        section: &Section,
        find_extras: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<FileSet, Error> {
        let type_code = section.kind.item_type_code().ok_or_else(|| {
            Error::Resolution(format!(
                "section {} is not a Movie, TV, or Music library",
                section.key
            ))
        })?;

        let start = Instant::now();
        let path = format!("/library/sections/{}/all", section.key);
        let items: ItemList = self.get_container(&path, &[("type", type_code.to_string())])?;
        let items = items.into_items(&path)?;

        info!("Reading {} library items", items.len());
        reporter.on_library_start(items.len());

        let mut in_library = FileSet::new();
        for (done, item) in items.iter().enumerate() {
            in_library.extend(item.files().map(normalize));
            if find_extras {
                self.extra_files(item, &mut in_library)?;
            }

            if (done + 1) % PROGRESS_EVERY == 0 {
                debug!("Processed {} items", done + 1);
                reporter.on_library_progress(done + 1, items.len());
            }
        }
        reporter.on_library_progress(items.len(), items.len());

        reporter.on_library_complete(in_library.len(), start.elapsed().as_secs_f64());
        Ok(in_library)
    }
}

/// `url` with the token value masked, for logging.
fn redact(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == TOKEN_PARAM {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_token() {
        let url = Url::parse("http://plex:32400/library/sections?type=1&X-Plex-Token=abc123")
            .unwrap();
        let shown = redact(&url);
        assert!(!shown.contains("abc123"));
        assert!(shown.contains("type=1"));
    }

    #[test]
    fn test_key_accepts_string_or_number() {
        let d: Directory =
            serde_json::from_str(r#"{"key":"7","title":"Movies","type":"movie"}"#).unwrap();
        assert_eq!(d.key, 7);
        let d: Directory =
            serde_json::from_str(r#"{"key":8,"title":"TV","type":"show"}"#).unwrap();
        assert_eq!(d.key, 8);
        assert!(d.locations.is_empty());
    }

    #[test]
    fn test_only_file_backed_extras_count() {
        let item: MediaItem = serde_json::from_str(
            r#"{
                "ratingKey": "10",
                "Media": [{"Part": [{"file": "/m/Film.mkv"}]}],
                "Extras": {"Metadata": [
                    {"guid": "file:///m/Film-trailer.mkv",
                     "Media": [{"Part": [{"file": "/m/Film-trailer.mkv"}]}]},
                    {"guid": "plex://extra/abc",
                     "Media": [{"Part": [{"file": "http://cdn/trailer.mp4"}]}]}
                ]}
            }"#,
        )
        .unwrap();
        let extras: Vec<&str> = item.local_extras().flat_map(|e| e.files()).collect();
        assert_eq!(extras, vec!["/m/Film-trailer.mkv"]);
    }

    #[test]
    fn test_empty_container_without_metadata() {
        let list: ItemList = serde_json::from_str(r#"{"size":0}"#).unwrap();
        assert!(list.into_items("/x").unwrap().is_empty());

        let list: ItemList = serde_json::from_str(r#"{"size":3}"#).unwrap();
        assert!(matches!(list.into_items("/x"), Err(Error::Protocol(_))));
    }
}
