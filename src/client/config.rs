use std::time::Duration;

/// Configuration for a [`SearchClient`](crate::SearchClient).
///
/// Constructed once per process; the client built from it is shared by
/// reference across call sites.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the engine, e.g. `http://localhost:9200`.
    pub endpoint: String,

    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,

    /// Total timeout for a request round-trip.
    pub timeout: Duration,

    /// Legacy per-index type name.
    ///
    /// Older engines partition an index into exactly one named type and
    /// address documents as `/{index}/{type}/{id}`. When unset, the
    /// modern `/{index}/_doc/{id}` paths are used and the type concept
    /// collapses into the index identity.
    pub legacy_type: Option<String>,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
            legacy_type: None,
        }
    }
}

#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn legacy_type(mut self, doc_type: impl Into<String>) -> Self {
        self.config.legacy_type = Some(doc_type.into());
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = ClientConfig::builder()
            .endpoint("http://search.internal:9200")
            .connect_timeout(Duration::from_secs(1))
            .timeout(Duration::from_secs(10))
            .legacy_type("argin")
            .build();

        assert_eq!(config.endpoint, "http://search.internal:9200");
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.legacy_type.as_deref(), Some("argin"));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "http://localhost:9200");
        assert!(config.legacy_type.is_none());
    }
}
