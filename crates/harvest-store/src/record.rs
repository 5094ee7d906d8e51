//! Email record model.

use harvest_core::{RecordId, Timestamp, Verified};
use serde::{Deserialize, Serialize};

/// One observation of an email address at a point in time.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Unique identifier, assigned at creation
    pub id: RecordId,
    /// Address as extracted
    pub email: String,
    /// Journal the address was found for
    pub journal: String,
    /// Research topic the address was found for
    pub topic: String,
    /// Deliverability verdict
    pub verified: Verified,
    /// Whether the address had already been seen when this record was created
    pub duplicate: bool,
    /// Page the address was found on
    pub source_url: String,
    /// Creation time
    pub timestamp_utc: Timestamp,
}

impl EmailRecord {
    pub(crate) fn observed(email: String, meta: &RecordMeta, duplicate: bool) -> Self {
        Self {
            id: RecordId::generate(),
            email,
            journal: meta.journal.clone(),
            topic: meta.topic.clone(),
            verified: Verified::Unknown,
            duplicate,
            source_url: meta.source_url.clone(),
            timestamp_utc: Timestamp::now(),
        }
    }

    /// Lower-cased address used as the dedup key.
    #[must_use]
    pub fn email_key(&self) -> String {
        self.email.to_lowercase()
    }
}

/// Provenance attached to every record of one batch.
///
/// All fields may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Journal name
    pub journal: String,
    /// Research topic
    pub topic: String,
    /// Page URL
    pub source_url: String,
}

impl RecordMeta {
    /// Metadata with every field empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the journal.
    #[must_use]
    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = journal.into();
        self
    }

    /// Set the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Set the source page URL.
    #[must_use]
    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = source_url.into();
        self
    }
}
