//! Database models.

pub mod chart;
pub mod content;
pub mod user;

use std::fmt;

use uuid::Uuid;

pub use chart::{ChartInput, ChartItem};
pub use content::{ContentInput, ContentItem};
pub use user::User;

/// The two independently stored item collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Content,
    Charts,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collection::Content => "content",
            Collection::Charts => "charts",
        })
    }
}

impl Collection {
    /// Singular name of one item in the collection.
    pub fn item_noun(&self) -> &'static str {
        match self {
            Collection::Content => "content item",
            Collection::Charts => "chart",
        }
    }
}

/// An item that occupies one position on one page.
///
/// `(page_type, order_id)` is unique within a collection; stores enforce it.
pub trait Positioned {
    /// Collection the item kind is stored in.
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;

    fn page_type(&self) -> &str;

    fn order_id(&self) -> i64;
}
