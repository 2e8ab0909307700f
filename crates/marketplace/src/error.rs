/// Why a single plugin could not be fetched. Always recovered by the collector.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),
    #[error("marketplace returned HTTP {status}")]
    Http { status: u16 },
    #[error("failed to parse marketplace response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("timestamp {0:?} does not match YYYY-MM-DDTHH:MM:SS[.ffffff][Z]")]
    Malformed(String),
    #[error("timestamp {input:?} is not a valid date: {source}")]
    Invalid {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}
