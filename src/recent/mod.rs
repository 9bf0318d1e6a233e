use log::info;

/// One entry for the "recent searches" feed.
#[derive(Debug, Clone)]
pub struct SearchRecord {
    pub steam_id: String,
    pub nickname: String,
    pub avatar: Option<String>,
    pub level: Option<i64>,
    pub country: Option<String>,
    pub has_bans: bool,
    pub success: bool,
}

/// Fire-and-forget sink for recent searches. Persistent storage lives
/// outside this crate; the aggregation never depends on the outcome.
#[allow(async_fn_in_trait)]
pub trait RecentSearchSink {
    async fn record(&self, record: SearchRecord);
}

/// Sink that only writes a log line. The default when no store is wired in.
pub struct LogSink;

impl RecentSearchSink for LogSink {
    async fn record(&self, record: SearchRecord) {
        info!(
            "Recent search: steam_id={} nickname={} success={} has_bans={}",
            record.steam_id, record.nickname, record.success, record.has_bans
        );
    }
}
