//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `Orchestrator` 持有唯一的 `SessionState`，把采集、参数、提取、渲染、复制串成一条循环：
//!
//! ```text
//! 采集图片 ──→ 替换 ImageSource ──→ 提取（当前参数）──→ 渲染
//!     ↑                                  ↑
//!     │            修改参数 ─────────────┘（已有图片时重新提取）
//!     └── 点击色块 ──→ 复制到剪贴板（不触发提取）
//! ```
//!
//! ## 实现思路
//!
//! - 会话用 `std::sync::Mutex` 保护，锁只在同步片段内持有，从不跨 `.await`，也不在 UI 回调期间持有。
//! - 在途请求不取消；响应按序号裁决，过期响应丢弃（见 `session`）。
//! - 预览与复制提示通过 `tokio::spawn` 后台执行，不阻塞提取。
//! - 错误统一经 `report` 处理：需要告知用户的走 `show_notification`，其余只记日志。

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::capture::{self, ClipboardItem, ImageSource};
use crate::config::ClientConfig;
use crate::error::PaletteError;
use crate::extraction::ColorExtractor;
use crate::notify::{ClipboardNotifier, ClipboardWriter};
use crate::params::{ExtractionParameters, SortKey};
use crate::render::{RenderedPalette, ResultRenderer};
use crate::session::{RequestTicket, SessionState};
use crate::ui::PaletteUi;

/// 一次编排调用的结果：`Some` 表示本次响应已渲染，`None` 表示无需请求或响应已过期。
pub type Rendered = Result<Option<RenderedPalette>, PaletteError>;

struct Inner<E, U, C> {
    extractor: E,
    ui: Arc<U>,
    notifier: ClipboardNotifier<C, U>,
    renderer: ResultRenderer,
    session: Mutex<SessionState>,
    render_gate: Mutex<()>,
    config: ClientConfig,
}

/// 提取流程编排器，克隆后共享同一会话。
pub struct Orchestrator<E, U, C> {
    inner: Arc<Inner<E, U, C>>,
}

impl<E, U, C> Clone for Orchestrator<E, U, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E, U, C> Orchestrator<E, U, C>
where
    E: ColorExtractor,
    U: PaletteUi,
    C: ClipboardWriter,
{
    pub fn new(extractor: E, ui: Arc<U>, clipboard: Arc<C>, config: ClientConfig) -> Self {
        Self::with_params(extractor, ui, clipboard, config, ExtractionParameters::default())
    }

    /// 使用指定初始参数创建编排器。
    pub fn with_params(
        extractor: E,
        ui: Arc<U>,
        clipboard: Arc<C>,
        config: ClientConfig,
        params: ExtractionParameters,
    ) -> Self {
        let notifier = ClipboardNotifier::new(
            clipboard,
            Arc::clone(&ui),
            Duration::from_millis(config.notice_duration_ms),
        );
        ui.set_limit_editable(!params.auto_limit);

        Self {
            inner: Arc::new(Inner {
                extractor,
                ui,
                notifier,
                renderer: ResultRenderer::new(config.thousands_separator),
                session: Mutex::new(SessionState::new(params)),
                render_gate: Mutex::new(()),
                config,
            }),
        }
    }

    // ------------------------------------------------------------------------
    // 图片采集
    // ------------------------------------------------------------------------

    /// 选择本地文件。
    pub async fn open_file(&self, path: &Path) -> Rendered {
        let source = capture::load_image_file(path, &self.inner.config)
            .await
            .map_err(|e| self.report(e))?;
        self.capture(source).await
    }

    /// 处理粘贴事件：取第一个图片条目，没有图片时什么也不做。
    pub async fn paste(&self, items: &[ClipboardItem]) -> Rendered {
        let Some(source) = capture::select_image_item(items) else {
            log::debug!("⏭️ 粘贴内容不含图片，忽略（{} 条）", items.len());
            return Ok(None);
        };
        self.capture(source).await
    }

    /// 从系统剪贴板粘贴。
    pub async fn paste_from_system_clipboard(&self) -> Rendered {
        let items = capture::read_system_clipboard()
            .await
            .map_err(|e| self.report(e))?;
        self.paste(&items).await
    }

    /// 采集入口：确认体积 → 预览 → 替换图片 → 提取。
    ///
    /// 用户拒绝大文件时整体放弃，会话不变。
    pub async fn capture(&self, source: ImageSource) -> Rendered {
        if !self.confirm_size(source.size()).await {
            return Err(self.report(PaletteError::UserAborted));
        }

        self.spawn_preview(source.clone());

        let (ticket, params) = {
            let mut session = self.lock_session()?;
            session.replace_image(source.clone());
            (session.begin_request(), session.params().resolved())
        };
        log::info!(
            "🖼️ 已采集图片 - {} ({}, {} bytes)",
            source.file_name(),
            source.mime_type(),
            source.size()
        );

        self.dispatch(ticket, source, params).await
    }

    // ------------------------------------------------------------------------
    // 参数变更
    // ------------------------------------------------------------------------

    pub async fn set_sort_by(&self, sort_by: SortKey) -> Rendered {
        log::debug!("⚙️ 排序方式 -> {}", sort_by);
        let trigger = self.lock_session()?.params_mut().set_sort_by(sort_by);
        self.refresh_if(trigger).await
    }

    /// 设置数量输入框文本；无法解析时保留原值并通知用户。
    pub async fn set_limit_input(&self, input: &str) -> Rendered {
        let outcome = self.lock_session()?.params_mut().set_limit_input(input);
        let trigger = outcome.map_err(|e| self.report(e))?;
        log::debug!("⚙️ 数量上限输入 -> {:?}（触发提取: {}）", input, trigger);
        self.refresh_if(trigger).await
    }

    pub async fn set_auto_limit(&self, auto_limit: bool) -> Rendered {
        log::debug!("⚙️ 自动上限 -> {}", auto_limit);
        let trigger = self.lock_session()?.params_mut().set_auto_limit(auto_limit);
        self.inner.ui.set_limit_editable(!auto_limit);
        self.refresh_if(trigger).await
    }

    /// 当前参数快照。
    pub fn params(&self) -> Result<ExtractionParameters, PaletteError> {
        Ok(self.lock_session()?.params().resolved())
    }

    /// 重新渲染最近一次结果（不发请求）。
    pub fn current_palette(&self) -> Result<Option<RenderedPalette>, PaletteError> {
        let session = self.lock_session()?;
        Ok(session
            .last_result()
            .map(|(result, params)| self.inner.renderer.render(result, params)))
    }

    // ------------------------------------------------------------------------
    // 复制
    // ------------------------------------------------------------------------

    /// 复制第 `index` 个色块的颜色值；提示的显示与隐藏在后台任务完成。
    pub fn copy_swatch(&self, index: usize) -> Result<Option<JoinHandle<()>>, PaletteError> {
        let hex = {
            let session = self.lock_session()?;
            session
                .last_result()
                .and_then(|(result, _)| result.colors.get(index))
                .map(|color| color.hex.clone())
        };

        let Some(hex) = hex else {
            log::debug!("⏭️ 色块 {} 不存在", index);
            return Ok(None);
        };

        let notifier = self.inner.notifier.clone();
        Ok(Some(tokio::spawn(async move { notifier.copy(&hex).await })))
    }

    // ------------------------------------------------------------------------
    // 内部流程
    // ------------------------------------------------------------------------

    /// 参数变化后，若已有图片则用现有图片重新提取。
    async fn refresh_if(&self, trigger: bool) -> Rendered {
        if !trigger {
            return Ok(None);
        }

        let size = self.lock_session()?.image().map(ImageSource::size);
        let Some(size) = size else {
            log::debug!("⏭️ 尚无图片，仅记录参数");
            return Ok(None);
        };

        if !self.confirm_size(size).await {
            return Err(self.report(PaletteError::UserAborted));
        }

        let request = {
            let mut session = self.lock_session()?;
            match session.image().cloned() {
                Some(image) => Some((session.begin_request(), image, session.params().resolved())),
                None => None,
            }
        };

        match request {
            Some((ticket, image, params)) => self.dispatch(ticket, image, params).await,
            None => Ok(None),
        }
    }

    async fn dispatch(
        &self,
        ticket: RequestTicket,
        image: ImageSource,
        params: ExtractionParameters,
    ) -> Rendered {
        let started = Instant::now();
        self.inner.ui.set_loading(true);
        log::debug!(
            "📡 提取请求 seq={} sort_by={} mode={:?}",
            ticket.seq,
            params.sort_by,
            params.limit_mode()
        );

        let outcome = self.inner.extractor.extract(image, params.clone()).await;

        let remaining = self.lock_session()?.finish_request();
        if remaining == 0 {
            self.inner.ui.set_loading(false);
        }

        match outcome {
            Ok(result) => {
                let rendered = self.inner.renderer.render(&result, &params);
                // 裁决与渲染按同一顺序进行；UI 回调期间不持有会话锁
                let _render_gate = self.lock_render_gate()?;
                let applied = self.lock_session()?.apply_result(ticket, result, params);
                if !applied {
                    log::info!("⏭️ 丢弃过期响应 seq={}", ticket.seq);
                    return Ok(None);
                }
                self.inner.ui.render_swatches(&rendered.swatches);
                self.inner.ui.show_summary(&rendered.summary);

                log::info!(
                    "✅ 渲染完成 seq={} swatches={} elapsed={}ms",
                    ticket.seq,
                    rendered.swatches.len(),
                    started.elapsed().as_millis()
                );
                Ok(Some(rendered))
            }
            Err(e) => {
                let current = self.lock_session()?.is_current(ticket);
                if current {
                    Err(self.report(e))
                } else {
                    log::info!("⏭️ 过期请求失败，忽略 seq={}: {}", ticket.seq, e);
                    Err(e)
                }
            }
        }
    }

    async fn confirm_size(&self, size: u64) -> bool {
        if size <= self.inner.config.large_upload_threshold {
            return true;
        }
        log::info!(
            "⚠️ 图片体积 {:.2} MB 超过确认阈值，等待用户确认",
            size as f64 / 1024.0 / 1024.0
        );
        self.inner.ui.confirm_large_upload(size).await
    }

    fn spawn_preview(&self, source: ImageSource) {
        let ui = Arc::clone(&self.inner.ui);
        tokio::spawn(async move {
            match capture::build_preview(source).await {
                Ok(preview) => ui.show_preview(&preview),
                Err(e) => log::warn!("⚠️ 预览生成失败: {}", e),
            }
        });
    }

    fn report(&self, error: PaletteError) -> PaletteError {
        if error.is_user_visible() {
            log::warn!("❌ [{}:{}] {}", error.stage(), error.code(), error);
            self.inner.ui.show_notification(&error.to_string());
        } else {
            log::debug!("🔇 [{}:{}] {}", error.stage(), error.code(), error);
        }
        error
    }

    fn lock_render_gate(&self) -> Result<MutexGuard<'_, ()>, PaletteError> {
        self.inner
            .render_gate
            .lock()
            .map_err(|_| PaletteError::ResourceLimit("渲染顺序锁已中毒".to_string()))
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, SessionState>, PaletteError> {
        self.inner
            .session
            .lock()
            .map_err(|_| PaletteError::ResourceLimit("会话状态锁已中毒".to_string()))
    }
}
