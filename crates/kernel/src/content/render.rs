//! Content renderers.
//!
//! A renderer turns a content item's editor document into the HTML stored
//! alongside it. Repositories receive one as `Arc<dyn Renderer>`.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;

/// Converts an editor document into HTML.
pub trait Renderer: Send + Sync {
    /// Renderer name for logging.
    fn name(&self) -> &str;

    /// Render the document.
    fn render(&self, content: &serde_json::Value) -> String;
}

/// Renderer selection from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Passthrough,
    Sanitized,
}

impl FromStr for RenderMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" => Ok(RenderMode::Passthrough),
            "sanitized" => Ok(RenderMode::Sanitized),
            other => bail!("unknown render mode '{other}' (expected passthrough or sanitized)"),
        }
    }
}

/// Build the renderer for a mode.
pub fn for_mode(mode: RenderMode) -> Arc<dyn Renderer> {
    match mode {
        RenderMode::Passthrough => Arc::new(PassthroughRenderer),
        RenderMode::Sanitized => Arc::new(SanitizingRenderer),
    }
}

/// String documents are already HTML from the editor; anything else is
/// emitted as its JSON text.
fn document_text(content: &serde_json::Value) -> String {
    match content {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Emits the document unchanged.
pub struct PassthroughRenderer;

impl Renderer for PassthroughRenderer {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn render(&self, content: &serde_json::Value) -> String {
        document_text(content)
    }
}

/// Strips scripts, event handlers and other unsafe markup.
pub struct SanitizingRenderer;

impl Renderer for SanitizingRenderer {
    fn name(&self) -> &str {
        "sanitized"
    }

    fn render(&self, content: &serde_json::Value) -> String {
        ammonia::clean(&document_text(content))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passthrough_keeps_html_verbatim() {
        let html = "<p>Hello</p><script>alert('x')</script>";
        assert_eq!(PassthroughRenderer.render(&json!(html)), html);
    }

    #[test]
    fn passthrough_encodes_structured_documents() {
        let doc = json!({ "type": "doc", "content": [] });
        assert_eq!(PassthroughRenderer.render(&doc), doc.to_string());
    }

    #[test]
    fn sanitizer_removes_scripts_and_handlers() {
        let out = SanitizingRenderer.render(&json!(
            r#"<p>Hello</p><script>alert('x')</script><a href="/p" onclick="x()">Link</a>"#
        ));

        assert!(out.contains("<p>Hello</p>"));
        assert!(!out.contains("<script>"));
        assert!(!out.contains("onclick"));
        assert!(out.contains(r#"href="/p""#));
    }

    #[test]
    fn parses_render_modes() {
        assert_eq!("passthrough".parse::<RenderMode>().unwrap(), RenderMode::Passthrough);
        assert_eq!(" Sanitized ".parse::<RenderMode>().unwrap(), RenderMode::Sanitized);
        assert!("markdown".parse::<RenderMode>().is_err());
    }

    #[test]
    fn for_mode_selects_renderer() {
        assert_eq!(for_mode(RenderMode::Passthrough).name(), "passthrough");
        assert_eq!(for_mode(RenderMode::Sanitized).name(), "sanitized");
    }
}
