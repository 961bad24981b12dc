//! Text content items.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Collection, Positioned};

/// A block of rich-text content placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub page_type: String,
    /// Editor source document.
    pub content: serde_json::Value,
    /// Rendering of `content`, recomputed on every write.
    pub html_content: String,
    pub order_id: i64,
}

/// Validated fields for creating or replacing a content item.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentInput {
    pub page_type: String,
    pub content: serde_json::Value,
    pub order_id: i64,
}

impl ContentItem {
    /// Build an item from validated input and its rendered HTML.
    pub fn from_input(id: Uuid, input: ContentInput, html_content: String) -> Self {
        Self {
            id,
            page_type: input.page_type,
            content: input.content,
            html_content,
            order_id: input.order_id,
        }
    }
}

impl Positioned for ContentItem {
    const COLLECTION: Collection = Collection::Content;

    fn id(&self) -> Uuid {
        self.id
    }

    fn page_type(&self) -> &str {
        &self.page_type
    }

    fn order_id(&self) -> i64 {
        self.order_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_id_as_underscore_id() {
        let item = ContentItem::from_input(
            Uuid::nil(),
            ContentInput {
                page_type: "summary".to_string(),
                content: serde_json::json!("<p>Hi</p>"),
                order_id: 2,
            },
            "<p>Hi</p>".to_string(),
        );

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["_id"], Uuid::nil().to_string());
        assert_eq!(json["order_id"], 2);
        assert!(json.get("id").is_none());
    }
}
