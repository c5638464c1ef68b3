//! Append-only log of sent requests and their responses.
//!
//! Every resolved request is recorded before it is sent; the entry is
//! completed with the response when one arrives, or marked failed when the
//! transport errors. Insertion order is chronological send order. The log
//! lives in memory for the duration of the process; persistence, if a host
//! wants it, is the host's concern.

use crate::models::{HttpResponse, ResolvedRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single request/response record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this entry (UUID v4).
    pub id: String,

    /// When the request was sent, UTC.
    pub timestamp: DateTime<Utc>,

    /// Name of the chain this request belonged to.
    pub chain: String,

    /// 1-based step position within the chain.
    pub step: usize,

    /// The request exactly as it was handed to the transport.
    pub request: ResolvedRequest,

    /// The response, once received. `None` while in flight or after a
    /// transport failure.
    pub response: Option<HttpResponse>,

    /// Transport failure description, if the send failed.
    pub error: Option<String>,
}

impl HistoryEntry {
    /// Creates a pending entry for a request about to be sent.
    fn pending(chain: impl Into<String>, step: usize, request: ResolvedRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            chain: chain.into(),
            step,
            request,
            response: None,
            error: None,
        }
    }

    /// Checks if this entry holds a response.
    pub fn is_complete(&self) -> bool {
        self.response.is_some()
    }

    /// Checks if this entry records a failed send.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Append-only, chronologically ordered request history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Creates a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pending entry for a request about to be sent.
    ///
    /// # Returns
    ///
    /// The index of the new entry, for completing it later.
    pub fn begin(
        &mut self,
        chain: impl Into<String>,
        step: usize,
        request: ResolvedRequest,
    ) -> usize {
        self.entries.push(HistoryEntry::pending(chain, step, request));
        self.entries.len() - 1
    }

    /// Records the response for a pending entry.
    pub fn record_response(
        &mut self,
        index: usize,
        response: HttpResponse,
    ) -> Option<&HistoryEntry> {
        let entry = self.entries.get_mut(index)?;
        entry.response = Some(response);
        Some(&self.entries[index])
    }

    /// Records a transport failure for a pending entry.
    pub fn record_failure(&mut self, index: usize, error: impl Into<String>) -> Option<&HistoryEntry> {
        let entry = self.entries.get_mut(index)?;
        entry.error = Some(error.into());
        Some(&self.entries[index])
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use std::collections::HashMap;

    fn test_request(url: &str) -> ResolvedRequest {
        ResolvedRequest {
            method: HttpMethod::GET,
            url: url.to_string(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    #[test]
    fn test_begin_appends_pending_entry() {
        let mut log = HistoryLog::new();
        let index = log.begin("login-flow", 1, test_request("https://example.com/a"));

        assert_eq!(index, 0);
        assert_eq!(log.len(), 1);

        let entry = &log.entries()[0];
        assert_eq!(entry.chain, "login-flow");
        assert_eq!(entry.step, 1);
        assert!(!entry.is_complete());
        assert!(!entry.is_failure());
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn test_record_response_completes_entry() {
        let mut log = HistoryLog::new();
        let index = log.begin("c", 1, test_request("https://example.com"));

        let entry = log.record_response(index, HttpResponse::new(200, "OK")).unwrap();
        assert!(entry.is_complete());
        assert_eq!(entry.response.as_ref().unwrap().status_code, 200);
        assert!(!entry.is_failure());
    }

    #[test]
    fn test_record_failure_marks_entry() {
        let mut log = HistoryLog::new();
        let index = log.begin("c", 2, test_request("https://example.com"));

        let entry = log.record_failure(index, "connection refused").unwrap();
        assert!(entry.is_failure());
        assert!(!entry.is_complete());
        assert_eq!(entry.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_record_on_bad_index_is_none() {
        let mut log = HistoryLog::new();
        assert!(log.record_response(5, HttpResponse::new(200, "OK")).is_none());
        assert!(log.record_failure(5, "x").is_none());
    }

    #[test]
    fn test_chronological_order() {
        let mut log = HistoryLog::new();
        log.begin("c", 1, test_request("https://example.com/1"));
        log.begin("c", 2, test_request("https://example.com/2"));
        log.begin("c", 3, test_request("https://example.com/3"));

        let urls: Vec<&str> = log
            .entries()
            .iter()
            .map(|e| e.request.url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/1",
                "https://example.com/2",
                "https://example.com/3"
            ]
        );
        assert_eq!(log.last().unwrap().step, 3);
    }

    #[test]
    fn test_clear() {
        let mut log = HistoryLog::new();
        log.begin("c", 1, test_request("https://example.com"));
        assert!(!log.is_empty());

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_serialization() {
        let mut log = HistoryLog::new();
        let index = log.begin("c", 1, test_request("https://example.com"));
        log.record_response(index, HttpResponse::new(201, "Created"));

        let json = serde_json::to_string(&log).unwrap();
        let back: HistoryLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(
            back.entries()[0].response.as_ref().unwrap().status_code,
            201
        );
    }
}
