pub mod config;
pub(crate) mod response;
pub mod search;

use reqwest::blocking::Client as HttpClient;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::bulk::{BulkRequest, BulkResult};
use crate::codec::DocumentCodec;
use crate::data::Document;
use crate::error::{Result, TernError};
use crate::index::{IndexSettings, Mapping};

use self::config::ClientConfig;
use self::response::{
    AckResponse, BulkResponse, GetResponse, IndexResponse, SearchResponse, WriteResponse,
    error_reason, map_bulk_response, map_search_response,
};
use self::search::{SearchRequest, SearchResult};

/// Outcome of an update: the engine either applied the patch, found
/// nothing to change, or found no document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    Updated,
    /// The patch changed nothing; the document is untouched.
    Noop,
    NotFound,
}

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteResult {
    Deleted,
    NotFound,
}

/// Blocking client for a JSON document search engine.
///
/// Constructed once from a [`ClientConfig`] and shared by reference;
/// every operation is an independent blocking round-trip. The client
/// performs no caching and no retries. Ordering between concurrent
/// callers and retry policy belong to the caller and the transport
/// configuration.
#[derive(Debug)]
pub struct SearchClient {
    http: HttpClient,
    base: Url,
    legacy_type: Option<String>,
    codec: DocumentCodec,
}

impl SearchClient {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.endpoint)
            .map_err(|e| TernError::invalid_config(format!("bad endpoint '{}': {e}", config.endpoint)))?;
        if base.cannot_be_a_base() {
            return Err(TernError::invalid_config(format!(
                "endpoint '{}' cannot carry request paths",
                config.endpoint
            )));
        }

        let http = HttpClient::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TernError::invalid_config(format!("http client: {e}")))?;

        Ok(Self {
            http,
            base,
            legacy_type: config.legacy_type,
            codec: DocumentCodec::new(),
        })
    }

    /// Replace the document codec, e.g. with a mapping-aware one so
    /// writes are validated and dates decode typed.
    pub fn with_codec(mut self, codec: DocumentCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Create an index with the given settings and mapping.
    ///
    /// Returns the engine's acknowledgment flag; `false` means the
    /// engine accepted the request but did not confirm it in time, and
    /// is the caller's to handle.
    pub fn create_index(
        &self,
        name: &str,
        settings: &IndexSettings,
        mapping: &Mapping,
    ) -> Result<bool> {
        let mappings = match &self.legacy_type {
            Some(doc_type) => {
                // Legacy engines key the mapping by the type name.
                let mut typed = serde_json::Map::new();
                typed.insert(doc_type.clone(), serde_json::to_value(mapping)?);
                serde_json::Value::Object(typed)
            }
            None => serde_json::to_value(mapping)?,
        };
        let body = json!({ "settings": settings, "mappings": mappings });

        let url = self.url(&[name])?;
        let (status, text) = self.send(self.http.put(url).json(&body))?;
        if status.is_success() {
            Ok(parse::<AckResponse>(&text)?.acknowledged)
        } else {
            Err(self.fail(status, &text))
        }
    }

    /// Delete an index. Returns the engine's acknowledgment flag.
    pub fn delete_index(&self, name: &str) -> Result<bool> {
        let url = self.url(&[name])?;
        let (status, text) = self.send(self.http.delete(url))?;
        if status.is_success() {
            Ok(parse::<AckResponse>(&text)?.acknowledged)
        } else {
            Err(self.fail(status, &text))
        }
    }

    /// Index a document, creating or replacing it. Returns the document
    /// id, assigned by the engine when the document carries none.
    pub fn index_document(&self, index: &str, document: &Document) -> Result<String> {
        let body = self.codec.source_value(document)?;
        let (status, text) = match &document.id {
            Some(id) => {
                let url = self.doc_url(index, id)?;
                self.send(self.http.put(url).json(&body))?
            }
            None => {
                let url = self.url(&self.doc_segments(index))?;
                self.send(self.http.post(url).json(&body))?
            }
        };

        if status.is_success() {
            Ok(parse::<IndexResponse>(&text)?.id)
        } else {
            Err(self.fail(status, &text))
        }
    }

    /// Fetch a document by id. `Ok(None)` when it does not exist.
    pub fn get_document(&self, index: &str, id: &str) -> Result<Option<Document>> {
        let url = self.doc_url(index, id)?;
        let (status, text) = self.send(self.http.get(url))?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(self.fail(status, &text));
        }

        let body = parse::<GetResponse>(&text)?;
        if !body.found {
            return Ok(None);
        }

        let mut document = match &body.source {
            Some(source) => self.codec.document_from_value(source)?,
            None => Document::new(),
        };
        document.id = body.id.or_else(|| Some(id.to_string()));
        Ok(Some(document))
    }

    /// Merge a partial document into an existing one.
    ///
    /// A missing id is reported as [`UpdateResult::NotFound`], not an
    /// error.
    pub fn update_document(&self, index: &str, id: &str, patch: &Document) -> Result<UpdateResult> {
        let body = json!({ "doc": self.codec.source_value(patch)? });
        let url = self.update_url(index, id)?;
        let (status, text) = self.send(self.http.post(url).json(&body))?;

        if status == StatusCode::NOT_FOUND {
            return Ok(UpdateResult::NotFound);
        }
        if !status.is_success() {
            return Err(self.fail(status, &text));
        }

        match parse::<WriteResponse>(&text)?.result.as_str() {
            "updated" => Ok(UpdateResult::Updated),
            "noop" => Ok(UpdateResult::Noop),
            other => Err(TernError::malformed_response(format!(
                "unexpected update result '{other}'"
            ))),
        }
    }

    /// Delete a document by id.
    ///
    /// A missing id is reported as [`DeleteResult::NotFound`], not an
    /// error.
    pub fn delete_document(&self, index: &str, id: &str) -> Result<DeleteResult> {
        let url = self.doc_url(index, id)?;
        let (status, text) = self.send(self.http.delete(url))?;

        if status == StatusCode::NOT_FOUND {
            return Ok(DeleteResult::NotFound);
        }
        if !status.is_success() {
            return Err(self.fail(status, &text));
        }

        match parse::<WriteResponse>(&text)?.result.as_str() {
            "deleted" => Ok(DeleteResult::Deleted),
            "not_found" => Ok(DeleteResult::NotFound),
            other => Err(TernError::malformed_response(format!(
                "unexpected delete result '{other}'"
            ))),
        }
    }

    /// Run a search and map the response into a [`SearchResult`].
    pub fn search(&self, index: &str, request: &SearchRequest) -> Result<SearchResult> {
        let mut segments = self.index_segments(index);
        segments.push("_search");
        let url = self.url(&segments)?;

        let (status, text) = self.send(self.http.post(url).json(&request.body_json()))?;
        if !status.is_success() {
            return Err(self.fail(status, &text));
        }

        map_search_response(parse::<SearchResponse>(&text)?, &self.codec)
    }

    /// Submit a batch of write operations as one request.
    ///
    /// Per-item failures come back as data inside the [`BulkResult`];
    /// only transport-level problems are errors.
    pub fn bulk(&self, request: &BulkRequest) -> Result<BulkResult> {
        if request.is_empty() {
            return Err(TernError::invalid_argument(
                "bulk request must contain at least one operation",
            ));
        }

        let body = request.body(&self.codec, self.legacy_type.as_deref())?;
        let url = self.url(&["_bulk"])?;
        let (status, text) = self.send(
            self.http
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
                .body(body),
        )?;

        if !status.is_success() {
            return Err(self.fail(status, &text));
        }

        let result = map_bulk_response(parse::<BulkResponse>(&text)?, request.len())?;
        if result.has_failures {
            log::warn!(
                "bulk batch of {} completed with {} failed items",
                request.len(),
                result.failures().count()
            );
        }
        Ok(result)
    }

    // -- request plumbing --

    fn send(&self, builder: reqwest::blocking::RequestBuilder) -> Result<(StatusCode, String)> {
        let request = builder.build()?;
        log::debug!("{} {}", request.method(), request.url());
        let response = self.http.execute(request)?;
        let status = response.status();
        let text = response.text()?;
        Ok((status, text))
    }

    fn fail(&self, status: StatusCode, body: &str) -> TernError {
        let reason = error_reason(body);
        if status == StatusCode::NOT_FOUND {
            TernError::not_found(reason)
        } else if status == StatusCode::CONFLICT {
            TernError::conflict(reason)
        } else {
            TernError::server(status.as_u16(), reason)
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| TernError::invalid_config("endpoint cannot carry request paths"))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn index_segments<'a>(&'a self, index: &'a str) -> Vec<&'a str> {
        match &self.legacy_type {
            Some(doc_type) => vec![index, doc_type.as_str()],
            None => vec![index],
        }
    }

    fn doc_segments<'a>(&'a self, index: &'a str) -> Vec<&'a str> {
        match &self.legacy_type {
            Some(doc_type) => vec![index, doc_type.as_str()],
            None => vec![index, "_doc"],
        }
    }

    fn doc_url(&self, index: &str, id: &str) -> Result<Url> {
        let mut segments = self.doc_segments(index);
        segments.push(id);
        self.url(&segments)
    }

    fn update_url(&self, index: &str, id: &str) -> Result<Url> {
        match &self.legacy_type {
            Some(doc_type) => self.url(&[index, doc_type.as_str(), id, "_update"]),
            None => self.url(&[index, "_update", id]),
        }
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| TernError::malformed_response(format!("unexpected response body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(legacy_type: Option<&str>) -> SearchClient {
        let mut builder = ClientConfig::builder().endpoint("http://localhost:9200");
        if let Some(t) = legacy_type {
            builder = builder.legacy_type(t);
        }
        SearchClient::new(builder.build()).unwrap()
    }

    #[test]
    fn test_modern_paths() {
        let client = client(None);
        assert_eq!(
            client.doc_url("catalog", "1").unwrap().as_str(),
            "http://localhost:9200/catalog/_doc/1"
        );
        assert_eq!(
            client.update_url("catalog", "1").unwrap().as_str(),
            "http://localhost:9200/catalog/_update/1"
        );
        let mut segments = client.index_segments("catalog");
        segments.push("_search");
        assert_eq!(
            client.url(&segments).unwrap().as_str(),
            "http://localhost:9200/catalog/_search"
        );
    }

    #[test]
    fn test_legacy_type_paths() {
        let client = client(Some("argin"));
        assert_eq!(
            client.doc_url("java2002", "1").unwrap().as_str(),
            "http://localhost:9200/java2002/argin/1"
        );
        assert_eq!(
            client.update_url("java2002", "1").unwrap().as_str(),
            "http://localhost:9200/java2002/argin/1/_update"
        );
        let mut segments = client.index_segments("java2002");
        segments.push("_search");
        assert_eq!(
            client.url(&segments).unwrap().as_str(),
            "http://localhost:9200/java2002/argin/_search"
        );
    }

    #[test]
    fn test_path_segments_are_escaped() {
        let client = client(None);
        let url = client.doc_url("catalog", "a/b c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9200/catalog/_doc/a%2Fb%20c");
    }

    #[test]
    fn test_bad_endpoint_is_invalid_config() {
        let err = SearchClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, TernError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_bulk_is_invalid_argument() {
        let client = client(None);
        let err = client.bulk(&BulkRequest::new()).unwrap_err();
        assert!(matches!(err, TernError::InvalidArgument(_)));
    }
}
