//! # 剪贴板复制与提示模块
//!
//! ## 设计思路
//!
//! 点击色块后把颜色值写入系统剪贴板，成功时显示短暂提示，固定时长后自动隐藏。
//! 写入失败不打扰用户，只记录日志。
//!
//! ## 实现思路
//!
//! - `ClipboardWriter` 隔离平台剪贴板，`ArboardClipboard` 在阻塞线程执行写入并有限重试。
//! - 每次成功复制递增代数（generation），只有最新一次复制的计时器负责隐藏提示，
//!   连续复制时提示不会被旧计时器提前收起。

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::PaletteError;
use crate::ui::PaletteUi;

/// 文本写入系统剪贴板的能力。
pub trait ClipboardWriter: Send + Sync + 'static {
    fn write_text(&self, text: String) -> impl Future<Output = Result<(), PaletteError>> + Send;
}

/// 基于 `arboard` 的剪贴板写入器。
#[derive(Debug, Clone)]
pub struct ArboardClipboard {
    retries: u32,
    retry_delay: Duration,
}

impl ArboardClipboard {
    pub fn new(retries: u32, retry_delay: Duration) -> Self {
        Self {
            retries: retries.max(1),
            retry_delay,
        }
    }

    fn write_with_retry(text: &str, retries: u32, retry_delay: Duration) -> Result<(), PaletteError> {
        let mut last_error = None;

        for attempt in 1..=retries {
            if attempt > 1 {
                log::debug!("🔄 重试 {}/{}", attempt, retries);
                std::thread::sleep(retry_delay);
            }

            match Self::try_write(text) {
                Ok(()) => {
                    log::debug!("✅ 复制成功 (尝试 {})", attempt);
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("❌ 尝试 {} 失败: {}", attempt, e);
                    last_error = Some(e);
                }
            }
        }

        Err(PaletteError::Clipboard(
            last_error.unwrap_or_else(|| "未知错误".to_string()),
        ))
    }

    fn try_write(text: &str) -> Result<(), String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("无法访问剪贴板：{}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| format!("复制失败：{}", e))
    }
}

impl ClipboardWriter for ArboardClipboard {
    async fn write_text(&self, text: String) -> Result<(), PaletteError> {
        let retries = self.retries;
        let retry_delay = self.retry_delay;
        tokio::task::spawn_blocking(move || Self::write_with_retry(&text, retries, retry_delay))
            .await
            .map_err(|e| PaletteError::Clipboard(format!("线程执行失败：{}", e)))?
    }
}

/// 复制颜色值并负责提示的生命周期。
pub struct ClipboardNotifier<C, U> {
    writer: Arc<C>,
    ui: Arc<U>,
    generation: Arc<AtomicU64>,
    display_for: Duration,
}

impl<C, U> Clone for ClipboardNotifier<C, U> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            ui: Arc::clone(&self.ui),
            generation: Arc::clone(&self.generation),
            display_for: self.display_for,
        }
    }
}

impl<C: ClipboardWriter, U: PaletteUi> ClipboardNotifier<C, U> {
    pub fn new(writer: Arc<C>, ui: Arc<U>, display_for: Duration) -> Self {
        Self {
            writer,
            ui,
            generation: Arc::new(AtomicU64::new(0)),
            display_for,
        }
    }

    /// 写入剪贴板，成功后显示提示并在 `display_for` 后隐藏。
    ///
    /// future 在提示隐藏（或被更新的复制接管）后才结束，调用方通常 `tokio::spawn` 它。
    pub async fn copy(&self, text: &str) {
        if let Err(e) = self.writer.write_text(text.to_string()).await {
            log::warn!("📋 复制失败（静默）: {} - {}", text, e);
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("📋 已复制: {}", text);
        self.ui.show_copied_notice(true);

        tokio::time::sleep(self.display_for).await;

        if self.generation.load(Ordering::SeqCst) == generation {
            self.ui.show_copied_notice(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_are_at_least_one() {
        let clipboard = ArboardClipboard::new(0, Duration::from_millis(10));
        assert_eq!(clipboard.retries, 1);
    }

    #[tokio::test]
    #[ignore = "requires system clipboard access"]
    async fn writes_text_to_live_clipboard() {
        let clipboard = ArboardClipboard::new(3, Duration::from_millis(100));
        clipboard
            .write_text("#ff0000".to_string())
            .await
            .expect("clipboard write should succeed");
    }
}
