//! Folio test utilities.
//!
//! Builders for admin API request bodies used by integration tests.

use serde_json::{Value as JsonValue, json};

/// Create a content request body with default values.
pub fn test_content(page_type: &str, order_id: i64) -> TestContent {
    TestContent {
        page_type: Some(page_type.to_string()),
        content: Some(json!(format!("<p>{page_type} #{order_id}</p>"))),
        order_id: Some(order_id),
    }
}

/// Create a chart request body with default values.
pub fn test_chart(page_type: &str, order_id: i64) -> TestChart {
    TestChart {
        page_type: Some(page_type.to_string()),
        chart_type: Some("bar".to_string()),
        chart_data: Some(json!({
            "chart": {
                "type": "bar",
                "series": [{ "data": [65, 59, 80], "labels": ["Jan", "Feb", "Mar"] }],
                "title": format!("{page_type} chart #{order_id}")
            }
        })),
        order_id: Some(order_id),
    }
}

/// Content request body builder.
#[derive(Debug, Clone)]
pub struct TestContent {
    pub page_type: Option<String>,
    pub content: Option<JsonValue>,
    pub order_id: Option<i64>,
}

impl TestContent {
    /// Set the editor document.
    pub fn with_content(mut self, content: JsonValue) -> Self {
        self.content = Some(content);
        self
    }

    /// Move to another page.
    pub fn on_page(mut self, page_type: &str) -> Self {
        self.page_type = Some(page_type.to_string());
        self
    }

    /// Set the position.
    pub fn at(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Drop the page type.
    pub fn without_page_type(mut self) -> Self {
        self.page_type = None;
        self
    }

    /// Drop the editor document.
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }

    /// Drop the position.
    pub fn without_order_id(mut self) -> Self {
        self.order_id = None;
        self
    }

    /// Request body JSON. Unset fields are omitted.
    pub fn to_json(&self) -> JsonValue {
        let mut body = serde_json::Map::new();
        if let Some(page_type) = &self.page_type {
            body.insert("page_type".into(), json!(page_type));
        }
        if let Some(content) = &self.content {
            body.insert("content".into(), content.clone());
        }
        if let Some(order_id) = self.order_id {
            body.insert("order_id".into(), json!(order_id));
        }
        JsonValue::Object(body)
    }
}

/// Chart request body builder.
#[derive(Debug, Clone)]
pub struct TestChart {
    pub page_type: Option<String>,
    pub chart_type: Option<String>,
    pub chart_data: Option<JsonValue>,
    pub order_id: Option<i64>,
}

impl TestChart {
    /// Set the chart type.
    pub fn with_type(mut self, chart_type: &str) -> Self {
        self.chart_type = Some(chart_type.to_string());
        self
    }

    /// Set the chart definition.
    pub fn with_data(mut self, chart_data: JsonValue) -> Self {
        self.chart_data = Some(chart_data);
        self
    }

    /// Move to another page.
    pub fn on_page(mut self, page_type: &str) -> Self {
        self.page_type = Some(page_type.to_string());
        self
    }

    /// Set the position.
    pub fn at(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    /// Drop the chart type.
    pub fn without_type(mut self) -> Self {
        self.chart_type = None;
        self
    }

    /// Request body JSON. Unset fields are omitted.
    pub fn to_json(&self) -> JsonValue {
        let mut body = serde_json::Map::new();
        if let Some(page_type) = &self.page_type {
            body.insert("page_type".into(), json!(page_type));
        }
        if let Some(chart_type) = &self.chart_type {
            body.insert("chart_type".into(), json!(chart_type));
        }
        if let Some(chart_data) = &self.chart_data {
            body.insert("chart_data".into(), chart_data.clone());
        }
        if let Some(order_id) = self.order_id {
            body.insert("order_id".into(), json!(order_id));
        }
        JsonValue::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_dropped_fields() {
        let body = test_content("summary", 1).without_order_id().to_json();
        assert!(body.get("order_id").is_none());
        assert_eq!(body["page_type"], "summary");
    }

    #[test]
    fn chart_builder_sets_fields() {
        let body = test_chart("reports", 2).with_type("pie").at(7).to_json();
        assert_eq!(body["chart_type"], "pie");
        assert_eq!(body["order_id"], 7);
        assert!(body["chart_data"].is_object());
    }
}
