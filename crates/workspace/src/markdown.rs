//! Markdown viewer state for a pane.
//!
//! Rendering itself is an external collaborator behind [`MarkdownRenderer`];
//! this module only decides when to fetch and when a re-render is warranted.
//! A periodic refresh re-fetches the file and re-renders only when the text
//! actually changed, so an unchanged file costs one read and zero renders
//! per tick. A user-forced refresh always re-renders.

use parking_lot::Mutex;
use session::SessionBackend;
use std::sync::Arc;

/// Opaque markdown-to-display converter (parsing/sanitization out of scope).
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, source: &str) -> String;
}

/// What the markdown pane body shows.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownBody {
    /// Inline message: nothing selected yet, or a failed fetch.
    Placeholder(String),
    /// Rendered output from the last successful fetch.
    Rendered(String),
}

/// Viewer state for one pane while it is in markdown mode.
pub struct MarkdownView {
    session_id: Option<String>,
    path: Option<String>,
    last_source: Option<String>,
    body: MarkdownBody,
}

impl MarkdownView {
    pub fn new(session_id: Option<String>, path: Option<String>) -> Self {
        let body = match &path {
            Some(_) => MarkdownBody::Placeholder("Loading...".to_string()),
            None => MarkdownBody::Placeholder("No markdown file selected".to_string()),
        };
        Self {
            session_id,
            path,
            last_source: None,
            body,
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn body(&self) -> &MarkdownBody {
        &self.body
    }
}

/// Fetch and (maybe) re-render one view.
///
/// Fetch errors become inline placeholder text, never a fault. The caller
/// owns cancellation: detaching or switching modes aborts the task driving
/// this, so a stale result cannot land on a pane that moved on.
pub async fn refresh_view(
    view: &Arc<Mutex<MarkdownView>>,
    backend: &Arc<dyn SessionBackend>,
    renderer: &Arc<dyn MarkdownRenderer>,
    forced: bool,
) {
    let (session_id, path) = {
        let view = view.lock();
        match (view.session_id.clone(), view.path.clone()) {
            (Some(session_id), Some(path)) => (session_id, path),
            _ => return,
        }
    };

    let max_bytes = settings::constants::session::MAX_READ_BYTES;
    match backend.read_file(&session_id, &path, Some(max_bytes)).await {
        Ok(read) => {
            let text = String::from_utf8_lossy(&read.bytes).into_owned();
            let mut view = view.lock();
            if !forced && view.last_source.as_deref() == Some(text.as_str()) {
                return;
            }
            let rendered = renderer.render(&text);
            view.last_source = Some(text);
            view.body = MarkdownBody::Rendered(rendered);
        }
        Err(error) => {
            tracing::warn!("markdown fetch failed for {path}: {error}");
            view.lock().body = MarkdownBody::Placeholder(format!("Failed to load {path}: {error}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use session::{BackendError, FileEntry, ReadFileResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedBackend {
        content: Mutex<String>,
        fail: bool,
    }

    impl FixedBackend {
        fn serving(content: &str) -> Arc<Self> {
            Arc::new(Self {
                content: Mutex::new(content.to_string()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                content: Mutex::new(String::new()),
                fail: true,
            })
        }

        fn set_content(&self, content: &str) {
            *self.content.lock() = content.to_string();
        }
    }

    #[async_trait]
    impl SessionBackend for FixedBackend {
        async fn list_directory(
            &self,
            _session_id: &str,
            _path: &str,
        ) -> Result<Vec<FileEntry>, BackendError> {
            Ok(Vec::new())
        }

        async fn read_file(
            &self,
            _session_id: &str,
            path: &str,
            _max_bytes: Option<u64>,
        ) -> Result<ReadFileResult, BackendError> {
            if self.fail {
                return Err(BackendError::Request("io error".to_string()));
            }
            Ok(ReadFileResult {
                path: path.to_string(),
                bytes: self.content.lock().clone().into_bytes(),
                truncated: false,
            })
        }

        async fn reconnect(&self, _session_id: &str) -> Result<(), BackendError> {
            Ok(())
        }
    }

    struct CountingRenderer {
        renders: AtomicUsize,
    }

    impl CountingRenderer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                renders: AtomicUsize::new(0),
            })
        }

        fn count(&self) -> usize {
            self.renders.load(Ordering::SeqCst)
        }
    }

    impl MarkdownRenderer for CountingRenderer {
        fn render(&self, source: &str) -> String {
            self.renders.fetch_add(1, Ordering::SeqCst);
            format!("<doc>{source}</doc>")
        }
    }

    fn view_for(path: Option<&str>) -> Arc<Mutex<MarkdownView>> {
        Arc::new(Mutex::new(MarkdownView::new(
            Some("s1".to_string()),
            path.map(str::to_string),
        )))
    }

    #[tokio::test]
    async fn renders_fetched_content() {
        let backend: Arc<dyn SessionBackend> = FixedBackend::serving("# Title");
        let renderer = CountingRenderer::new();
        let renderer_dyn: Arc<dyn MarkdownRenderer> = renderer.clone();
        let view = view_for(Some("/doc/readme.md"));

        refresh_view(&view, &backend, &renderer_dyn, true).await;

        assert_eq!(
            *view.lock().body(),
            MarkdownBody::Rendered("<doc># Title</doc>".to_string())
        );
        assert_eq!(renderer.count(), 1);
    }

    #[tokio::test]
    async fn unchanged_content_renders_exactly_once() {
        let backend: Arc<dyn SessionBackend> = FixedBackend::serving("stable");
        let renderer = CountingRenderer::new();
        let renderer_dyn: Arc<dyn MarkdownRenderer> = renderer.clone();
        let view = view_for(Some("/doc/readme.md"));

        refresh_view(&view, &backend, &renderer_dyn, false).await;
        refresh_view(&view, &backend, &renderer_dyn, false).await;

        assert_eq!(renderer.count(), 1, "second non-forced refresh is a no-op");
    }

    #[tokio::test]
    async fn forced_refresh_always_re_renders() {
        let backend: Arc<dyn SessionBackend> = FixedBackend::serving("stable");
        let renderer = CountingRenderer::new();
        let renderer_dyn: Arc<dyn MarkdownRenderer> = renderer.clone();
        let view = view_for(Some("/doc/readme.md"));

        refresh_view(&view, &backend, &renderer_dyn, false).await;
        refresh_view(&view, &backend, &renderer_dyn, true).await;

        assert_eq!(renderer.count(), 2);
    }

    #[tokio::test]
    async fn changed_content_re_renders() {
        let fixed = FixedBackend::serving("v1");
        let backend: Arc<dyn SessionBackend> = fixed.clone();
        let renderer = CountingRenderer::new();
        let renderer_dyn: Arc<dyn MarkdownRenderer> = renderer.clone();
        let view = view_for(Some("/doc/readme.md"));

        refresh_view(&view, &backend, &renderer_dyn, false).await;
        fixed.set_content("v2");
        refresh_view(&view, &backend, &renderer_dyn, false).await;

        assert_eq!(renderer.count(), 2);
        assert_eq!(
            *view.lock().body(),
            MarkdownBody::Rendered("<doc>v2</doc>".to_string())
        );
    }

    #[tokio::test]
    async fn fetch_failure_becomes_inline_placeholder() {
        let backend: Arc<dyn SessionBackend> = FixedBackend::failing();
        let renderer = CountingRenderer::new();
        let renderer_dyn: Arc<dyn MarkdownRenderer> = renderer.clone();
        let view = view_for(Some("/doc/readme.md"));

        refresh_view(&view, &backend, &renderer_dyn, true).await;

        match view.lock().body() {
            MarkdownBody::Placeholder(message) => {
                assert!(message.contains("Failed to load /doc/readme.md"));
            }
            other => panic!("expected placeholder, got {other:?}"),
        }
        assert_eq!(renderer.count(), 0);
    }

    #[tokio::test]
    async fn view_without_path_keeps_its_placeholder() {
        let backend: Arc<dyn SessionBackend> = FixedBackend::serving("ignored");
        let renderer = CountingRenderer::new();
        let renderer_dyn: Arc<dyn MarkdownRenderer> = renderer.clone();
        let view = view_for(None);

        refresh_view(&view, &backend, &renderer_dyn, true).await;

        assert_eq!(
            *view.lock().body(),
            MarkdownBody::Placeholder("No markdown file selected".to_string())
        );
        assert_eq!(renderer.count(), 0);
    }
}
