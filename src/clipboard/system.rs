// ABOUTME: System clipboard access through arboard

use super::ClipboardWriter;
use arboard::Clipboard;
use async_trait::async_trait;
use tracing::debug;

/// Platform clipboard. A handle is opened per write on a blocking thread,
/// since some platforms tie the handle to the thread that created it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = Clipboard::new().map_err(|e| e.to_string())?;
            clipboard.set_text(text).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| e.to_string())??;

        debug!("Wrote line to system clipboard");
        Ok(())
    }
}
