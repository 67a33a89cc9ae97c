use crate::classify::EventRecord;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

/// Number of error records kept in `error_details`.
pub const ERROR_SAMPLES: usize = 10;

/// Per-bucket counts in the order each bucket was first hit.
pub type BucketCounts = Vec<(ErrorBucket, usize)>;

/// Error buckets, declared in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorBucket {
    #[serde(rename = "crashes")]
    Crash,
    #[serde(rename = "exceptions")]
    Exception,
    #[serde(rename = "errors")]
    Error,
    #[serde(rename = "fatal_errors")]
    Fatal,
}

impl ErrorBucket {
    const PRIORITY: [(ErrorBucket, &'static str); 4] = [
        (ErrorBucket::Crash, "crash"),
        (ErrorBucket::Exception, "exception"),
        (ErrorBucket::Error, "error"),
        (ErrorBucket::Fatal, "fatal"),
    ];

    /// First bucket whose keyword occurs in the text, ignoring case.
    pub fn classify(text: &str) -> Option<ErrorBucket> {
        let lower = text.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|(_, keyword)| lower.contains(keyword))
            .map(|(bucket, _)| bucket)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorBucket::Crash => "crashes",
            ErrorBucket::Exception => "exceptions",
            ErrorBucket::Error => "errors",
            ErrorBucket::Fatal => "fatal_errors",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub total_errors: usize,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "bucket_counts_as_map")]
    pub error_types: Option<BucketCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Vec<EventRecord>>,
}

fn bucket_counts_as_map<S>(counts: &Option<BucketCounts>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let counts = counts.as_deref().unwrap_or_default();
    let mut map = serializer.serialize_map(Some(counts.len()))?;
    for (bucket, count) in counts {
        map.serialize_entry(bucket, count)?;
    }
    map.end()
}

impl ErrorReport {
    pub fn none() -> Self {
        Self {
            total_errors: 0,
            error_types: None,
            error_details: None,
        }
    }
}

#[derive(Default)]
pub struct ErrorAnalyzer;

impl ErrorAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, errors: &[&EventRecord]) -> ErrorReport {
        if errors.is_empty() {
            return ErrorReport::none();
        }

        let mut error_types: BucketCounts = Vec::new();
        for record in errors {
            let Some(bucket) = ErrorBucket::classify(&record.raw_text) else {
                debug!("Line {} has no error keyword", record.line_number);
                continue;
            };
            match error_types.iter_mut().find(|(seen, _)| *seen == bucket) {
                Some((_, count)) => *count += 1,
                None => error_types.push((bucket, 1)),
            }
        }

        debug!("Errors: {} total, buckets {:?}", errors.len(), error_types);

        ErrorReport {
            total_errors: errors.len(),
            error_types: Some(error_types),
            error_details: Some(errors.iter().take(ERROR_SAMPLES).map(|r| (*r).clone()).collect()),
        }
    }
}
