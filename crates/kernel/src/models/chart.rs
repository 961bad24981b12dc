//! Chart items.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Collection, Positioned};

/// A chart placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChartItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub page_type: String,
    /// Rendering discriminator ("bar", "line", "pie", ...).
    pub chart_type: String,
    /// Chart definition as an encoded JSON string.
    pub chart_data: String,
    pub order_id: i64,
}

/// Validated fields for creating or replacing a chart item.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInput {
    pub page_type: String,
    pub chart_type: String,
    pub chart_data: serde_json::Value,
    pub order_id: i64,
}

impl ChartItem {
    /// Build an item from validated input, encoding the chart payload.
    pub fn from_input(id: Uuid, input: ChartInput) -> Self {
        Self {
            id,
            page_type: input.page_type,
            chart_type: input.chart_type,
            chart_data: input.chart_data.to_string(),
            order_id: input.order_id,
        }
    }
}

impl Positioned for ChartItem {
    const COLLECTION: Collection = Collection::Charts;

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
    fn chart_data_is_stored_encoded() {
        let item = ChartItem::from_input(
            Uuid::now_v7(),
            ChartInput {
                page_type: "reports".to_string(),
                chart_type: "bar".to_string(),
                chart_data: serde_json::json!({ "series": [1, 2, 3] }),
                order_id: 1,
            },
        );

        let decoded: serde_json::Value = serde_json::from_str(&item.chart_data).unwrap();
        assert_eq!(decoded["series"][2], 3);
    }

    #[test]
    fn string_chart_data_is_json_quoted() {
        let item = ChartItem::from_input(
            Uuid::now_v7(),
            ChartInput {
                page_type: "reports".to_string(),
                chart_type: "pie".to_string(),
                chart_data: serde_json::json!("raw"),
                order_id: 1,
            },
        );

        assert_eq!(item.chart_data, "\"raw\"");
    }
}
