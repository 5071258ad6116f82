// src/feed/types.rs
use async_trait::async_trait;

use crate::error::Result;

/// The two upstream endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    /// Near-real-time active alert object.
    Live,
    /// Recent alert events, used as fallback.
    History,
}

impl FeedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::History => "history",
        }
    }
}

/// Raw HTTP result before any decoding. Dropped once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFeedPayload {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl RawFeedPayload {
    pub fn ok(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            bytes: bytes.into(),
        }
    }
}

/// Where feed bytes come from. The HTTP implementation talks to the upstream;
/// fixtures serve canned bodies.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, feed: FeedKind) -> Result<RawFeedPayload>;
    fn name(&self) -> &'static str;
}
