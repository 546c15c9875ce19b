//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入形态”和“会话持有的图片”解耦：
//! - `ClipboardItem` 表示粘贴事件中的单个条目（声明类型 + 原始字节）
//! - `ImageSource` 表示已采集、可直接上传的图片负载

use bytes::Bytes;

/// 当前会话持有的图片负载。
///
/// 整体替换、从不原地修改；`Bytes` 克隆为引用计数，可廉价传给并发请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    bytes: Bytes,
    mime_type: String,
    file_name: String,
}

impl ImageSource {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// 负载体积（字节）。
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// multipart 上传时使用的文件名。
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// 粘贴事件中的单个条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    /// 声明的 MIME 类型，例如 `text/plain`、`image/png`。
    pub kind: String,
    pub data: Bytes,
}

impl ClipboardItem {
    pub fn new(kind: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new("text/plain", text.into().into_bytes())
    }

    /// 声明类型是否为图片。
    pub fn is_image(&self) -> bool {
        self.kind.to_ascii_lowercase().contains("image")
    }
}
