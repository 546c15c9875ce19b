//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ClientConfig`：服务地址、超时、大文件确认阈值、
//! 复制提示时长与剪贴板重试参数。`Default` 提供开箱可用的本地配置。
//!
//! ## 实现思路
//!
//! - 支持从 JSON 设置文件加载（缺省字段回落到默认值）。
//! - `validate` 在启动时统一做范围校验，避免运行期才暴露问题。
//! - `RequestEncoding` 决定上传方式：multipart 或 base64 JSON。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PaletteError;

/// 超过该体积（字节）时需用户确认才上传。
pub const LARGE_UPLOAD_THRESHOLD: u64 = 10 * 1024 * 1024;

/// 上传编码方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestEncoding {
    /// `POST /extract-colors`，单个 `file` 字段。
    #[default]
    Multipart,
    /// `POST /extract-colors-base64`，JSON 体携带 Data URL。
    Base64Json,
}

/// 客户端运行配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 提取服务根地址。
    pub service_url: String,
    /// 上传编码方式。
    pub encoding: RequestEncoding,
    /// 单次请求总超时（秒）。
    pub request_timeout_secs: u64,
    /// 建立连接超时（秒）。
    pub connect_timeout_secs: u64,
    /// 本地读取文件的硬性体积上限（字节）；`None` 表示不设上限，只走大文件确认。
    pub max_file_size: Option<u64>,
    /// 大文件确认阈值（字节）。
    pub large_upload_threshold: u64,
    /// “已复制”提示显示时长（毫秒）。
    pub notice_duration_ms: u64,
    /// 剪贴板写入最大尝试次数。
    pub clipboard_retries: u32,
    /// 剪贴板重试间隔（毫秒）。
    pub clipboard_retry_delay_ms: u64,
    /// 像素计数的千位分隔符。
    pub thousands_separator: char,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8000".to_string(),
            encoding: RequestEncoding::Multipart,
            request_timeout_secs: 120,
            connect_timeout_secs: 8,
            max_file_size: None,
            large_upload_threshold: LARGE_UPLOAD_THRESHOLD,
            notice_duration_ms: 2_000,
            clipboard_retries: 3,
            clipboard_retry_delay_ms: 100,
            thousands_separator: ',',
        }
    }
}

impl ClientConfig {
    /// 从 JSON 设置文件加载配置；未提供路径时使用默认值。
    pub fn load(path: Option<&Path>) -> Result<Self, PaletteError> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    PaletteError::Config(format!("读取设置文件失败（{}）：{}", path.display(), e))
                })?;
                serde_json::from_str::<Self>(&content)
                    .map_err(|e| PaletteError::Config(format!("解析设置文件失败：{}", e)))?
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// 校验各字段取值范围。
    pub fn validate(&self) -> Result<(), PaletteError> {
        let url = reqwest::Url::parse(&self.service_url)
            .map_err(|e| PaletteError::Config(format!("service_url 格式错误：{}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PaletteError::Config("service_url 仅支持 HTTP/HTTPS".to_string()));
        }
        if !(1..=600).contains(&self.request_timeout_secs) {
            return Err(PaletteError::Config(
                "request_timeout_secs 必须在 1~600 秒之间".to_string(),
            ));
        }
        if !(1..=600).contains(&self.connect_timeout_secs) {
            return Err(PaletteError::Config(
                "connect_timeout_secs 必须在 1~600 秒之间".to_string(),
            ));
        }
        if self.connect_timeout_secs > self.request_timeout_secs {
            return Err(PaletteError::Config(
                "connect_timeout_secs 不能大于 request_timeout_secs".to_string(),
            ));
        }
        if self.max_file_size == Some(0) {
            return Err(PaletteError::Config("max_file_size 不能为 0".to_string()));
        }
        if !(100..=60_000).contains(&self.notice_duration_ms) {
            return Err(PaletteError::Config(
                "notice_duration_ms 必须在 100~60000 毫秒之间".to_string(),
            ));
        }
        if !(1..=10).contains(&self.clipboard_retries) {
            return Err(PaletteError::Config("clipboard_retries 必须在 1~10 之间".to_string()));
        }
        Ok(())
    }

    /// 提取接口完整地址。
    pub(crate) fn endpoint(&self) -> Result<reqwest::Url, PaletteError> {
        let path = match self.encoding {
            RequestEncoding::Multipart => "extract-colors",
            RequestEncoding::Base64Json => "extract-colors-base64",
        };
        let mut base = reqwest::Url::parse(&self.service_url)
            .map_err(|e| PaletteError::Config(format!("service_url 格式错误：{}", e)))?;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|e| PaletteError::Config(format!("无法拼接提取接口地址：{}", e)))
    }
}
