//! # 图片采集模块（capture）
//!
//! ## 设计思路
//!
//! 两个互相独立的采集通道（选择文件 / 粘贴）最终归一为同一个 `ImageSource`，
//! 后续链路无需关心来源。
//!
//! - `source`：`ImageSource` 与粘贴条目模型
//! - `loader`：文件读取 + MIME 嗅探、粘贴条目挑选
//! - `preview`：非阻塞本地预览
//! - `system_clipboard`：平台剪贴板 → 粘贴条目
//!
//! ```text
//! 选择文件 ──→ loader::load_image_file ──┐
//!                                        ├──→ ImageSource ──→ Orchestrator
//! 粘贴事件 ──→ loader::select_image_item ─┘
//!                                        └──→ preview（后台，不阻塞请求）
//! ```

mod loader;
mod preview;
mod source;
mod system_clipboard;

pub use loader::{load_image_file, select_image_item};
pub use preview::{ImagePreview, build_preview};
pub use source::{ClipboardItem, ImageSource};
pub use system_clipboard::read_system_clipboard;
