//! # UI 能力接口
//!
//! ## 设计思路
//!
//! 编排逻辑与具体平台 UI 解耦：平台层（终端、桌面窗口、测试桩）实现 [`PaletteUi`]，
//! 编排器只通过这些回调驱动界面，因而可以在没有任何界面的情况下做单元测试。

use std::future::Future;

use crate::capture::ImagePreview;
use crate::render::SwatchRecord;

/// 平台 UI 需要提供的能力。
///
/// 回调执行时编排器不持有会话锁，回调内可以读取 `params()` / `current_palette()`。
pub trait PaletteUi: Send + Sync + 'static {
    /// 显示本地预览。
    fn show_preview(&self, preview: &ImagePreview);

    /// 是否有提取请求在途。
    fn set_loading(&self, loading: bool);

    /// 整体替换色块网格。
    fn render_swatches(&self, swatches: &[SwatchRecord]);

    fn show_summary(&self, summary: &str);

    /// 阻断式通知（网络失败等）。
    fn show_notification(&self, message: &str);

    /// 大文件上传确认，返回 `false` 表示放弃。
    fn confirm_large_upload(&self, size_bytes: u64) -> impl Future<Output = bool> + Send;

    /// 数量输入框是否可编辑（自动上限开启时不可编辑）。
    fn set_limit_editable(&self, editable: bool);

    /// “已复制”提示的显示与隐藏。
    fn show_copied_notice(&self, visible: bool);
}
