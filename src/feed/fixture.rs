// src/feed/fixture.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{AlertsError, Result};
use crate::feed::types::{FeedKind, FeedSource, RawFeedPayload};

/// Serves canned payloads per feed. Unset feeds answer with an empty 200,
/// which the pipeline reads as "no alert". Request counts are kept so callers
/// can check how often each feed was hit.
#[derive(Default)]
pub struct FixtureFeedSource {
    payloads: Mutex<HashMap<FeedKind, FixtureReply>>,
    live_hits: AtomicUsize,
    history_hits: AtomicUsize,
}

#[derive(Clone)]
enum FixtureReply {
    Payload(RawFeedPayload),
    Fail(String),
}

impl FixtureFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, feed: FeedKind, body: impl Into<Vec<u8>>) -> Self {
        self.with_payload(feed, RawFeedPayload::ok(body))
    }

    pub fn with_payload(self, feed: FeedKind, payload: RawFeedPayload) -> Self {
        self.set(feed, FixtureReply::Payload(payload));
        self
    }

    /// Make `feed` fail as if the network were down.
    pub fn with_transport_failure(self, feed: FeedKind, reason: &str) -> Self {
        self.set(feed, FixtureReply::Fail(reason.to_string()));
        self
    }

    fn set(&self, feed: FeedKind, reply: FixtureReply) {
        if let Ok(mut map) = self.payloads.lock() {
            map.insert(feed, reply);
        }
    }

    pub fn hits(&self, feed: FeedKind) -> usize {
        match feed {
            FeedKind::Live => self.live_hits.load(Ordering::SeqCst),
            FeedKind::History => self.history_hits.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl FeedSource for FixtureFeedSource {
    async fn fetch(&self, feed: FeedKind) -> Result<RawFeedPayload> {
        match feed {
            FeedKind::Live => self.live_hits.fetch_add(1, Ordering::SeqCst),
            FeedKind::History => self.history_hits.fetch_add(1, Ordering::SeqCst),
        };

        let reply = self
            .payloads
            .lock()
            .map_err(|_| AlertsError::transport("fixture lock poisoned"))?
            .get(&feed)
            .cloned();

        match reply {
            Some(FixtureReply::Payload(p)) => Ok(p),
            Some(FixtureReply::Fail(reason)) => Err(AlertsError::transport(reason)),
            None => Ok(RawFeedPayload::ok(Vec::new())),
        }
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
