//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `PaletteError` 枚举，覆盖“采集 → 参数 → 请求 → 渲染 → 复制”整条链路，
//! 替代分散的字符串错误。编排器根据 [`PaletteError::is_user_visible`] 决定是否通知用户。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - `code()` / `stage()` 输出稳定标识，便于日志检索与前端分支处理。
//! - 实现 `Serialize` 将错误序列化为字符串，方便 UI 层直接展示。

use serde::Serialize;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    /// 用户拒绝上传大文件，静默终止
    #[error("用户取消了上传")]
    UserAborted,

    /// 网络传输失败（连接 / 请求构建 / 读取响应）
    #[error("网络错误：{0}")]
    Network(String),

    /// 请求超时
    #[error("超时错误：{0}")]
    Timeout(String),

    /// 响应体不是合法 JSON 或字段类型不符
    #[error("响应解析失败：{0}")]
    Decode(String),

    /// 响应合法但缺少 `colors` 字段
    #[error("服务未返回调色板：{0}")]
    MalformedResponse(String),

    /// 剪贴板读写失败
    #[error("剪贴板错误：{0}")]
    Clipboard(String),

    /// 数量上限输入无法解析
    #[error("无效的颜色数量：{0}")]
    InvalidLimit(String),

    /// 输入不是可识别的图片
    #[error("格式错误：{0}")]
    InvalidFormat(String),

    /// 文件读取失败
    #[error("文件错误：{0}")]
    FileSystem(String),

    /// 体积或锁等资源限制
    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 配置加载或校验失败
    #[error("配置错误：{0}")]
    Config(String),
}

impl PaletteError {
    /// 稳定错误码，供日志聚合与 UI 分支使用。
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserAborted => "E_USER_ABORTED",
            Self::Network(_) => "E_NETWORK",
            Self::Timeout(_) => "E_TIMEOUT",
            Self::Decode(_) => "E_DECODE",
            Self::MalformedResponse(_) => "E_MALFORMED_RESPONSE",
            Self::Clipboard(_) => "E_CLIPBOARD",
            Self::InvalidLimit(_) => "E_INVALID_LIMIT",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Config(_) => "E_CONFIG",
        }
    }

    /// 错误发生的链路阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::UserAborted | Self::InvalidFormat(_) | Self::FileSystem(_) => "capture",
            Self::InvalidLimit(_) => "params",
            Self::Network(_) | Self::Timeout(_) | Self::Decode(_) | Self::MalformedResponse(_) => {
                "extract"
            }
            Self::Clipboard(_) => "clipboard",
            Self::ResourceLimit(_) | Self::Config(_) => "runtime",
        }
    }

    /// 是否需要以通知形式告知用户。
    ///
    /// 用户主动取消与剪贴板写入失败保持静默。
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::UserAborted | Self::Clipboard(_))
    }
}

impl From<PaletteError> for String {
    fn from(error: PaletteError) -> Self {
        error.to_string()
    }
}

impl Serialize for PaletteError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
