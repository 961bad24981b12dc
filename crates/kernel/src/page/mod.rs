//! Page aggregation.
//!
//! A page is the content items and charts sharing a `page_type`, shown in a
//! single sequence ordered by `order_id`. Each collection arrives already
//! sorted from its repository, so the page is built with one linear merge.
//! On equal `order_id` the content item comes first.

use serde::Serialize;
use tracing::debug;

use crate::content::{ChartRepository, ContentRepository, RepositoryResult};
use crate::models::{ChartItem, ContentItem};

/// One entry of an aggregated page.
///
/// Serializes as `{"type": "content" | "chart", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PageEntry {
    Content(ContentItem),
    Chart(ChartItem),
}

impl PageEntry {
    /// Position of the entry on its page.
    pub fn order_id(&self) -> i64 {
        match self {
            PageEntry::Content(item) => item.order_id,
            PageEntry::Chart(item) => item.order_id,
        }
    }
}

/// Merge two `order_id`-ascending sequences into one page.
///
/// Content is emitted while it is not behind the next chart, so a content
/// item wins an exact tie. Runs in O(n + m) and never re-sorts.
pub fn merge_by_order(contents: Vec<ContentItem>, charts: Vec<ChartItem>) -> Vec<PageEntry> {
    let mut entries = Vec::with_capacity(contents.len() + charts.len());
    let mut contents = contents.into_iter().peekable();
    let mut charts = charts.into_iter().peekable();

    loop {
        let take_content = match (contents.peek(), charts.peek()) {
            (None, None) => break,
            (Some(content), Some(chart)) => content.order_id <= chart.order_id,
            (Some(_), None) => true,
            (None, Some(_)) => false,
        };

        if take_content {
            entries.extend(contents.next().map(PageEntry::Content));
        } else {
            entries.extend(charts.next().map(PageEntry::Chart));
        }
    }

    entries
}

/// Builds ordered pages from the content and chart repositories.
#[derive(Clone)]
pub struct PageAggregator {
    contents: ContentRepository,
    charts: ChartRepository,
}

impl PageAggregator {
    /// Create an aggregator over both repositories.
    pub fn new(contents: ContentRepository, charts: ChartRepository) -> Self {
        Self { contents, charts }
    }

    /// Aggregate one page.
    ///
    /// Both collections are read concurrently. If either read fails the whole
    /// page fails with that collection's error; nothing partial is returned.
    /// An unknown page type yields an empty page.
    pub async fn aggregate(&self, page_type: &str) -> RepositoryResult<Vec<PageEntry>> {
        let (contents, charts) = tokio::try_join!(
            self.contents.list_by_page_type(page_type),
            self.charts.list_by_page_type(page_type),
        )?;

        debug!(
            page_type,
            contents = contents.len(),
            charts = charts.len(),
            "aggregating page"
        );

        Ok(merge_by_order(contents, charts))
    }
}
