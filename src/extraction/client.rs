//! # HTTP 提取客户端
//!
//! ## 设计思路
//!
//! `ExtractionClient` 只负责“参数 → 请求 → 响应 → 结果”的一次往返，不持有会话状态，
//! 可被多个并发请求共享（内部 `reqwest::Client` 自带连接池）。
//!
//! ## 实现思路
//!
//! - 构造时按配置设置总超时与连接超时。
//! - multipart 模式：单个 `file` 字段，体积已知，直接复用 `Bytes` 避免拷贝。
//! - base64 模式：JSON 体携带 Data URL。
//! - 先读完整响应体再统一解析，状态码只用于错误信息。

use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};

use super::request::{Base64Body, FILE_FIELD, build_request_url};
use super::response::{ExtractionResult, parse_response};
use super::ColorExtractor;
use crate::capture::ImageSource;
use crate::config::{ClientConfig, RequestEncoding};
use crate::error::PaletteError;
use crate::params::ExtractionParameters;

/// 基于 HTTP 的颜色提取客户端。
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    encoding: RequestEncoding,
    request_timeout_secs: u64,
}

impl ExtractionClient {
    /// 根据配置创建客户端。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use palette_extractor::config::ClientConfig;
    /// use palette_extractor::extraction::ExtractionClient;
    ///
    /// let client = ExtractionClient::new(&ClientConfig::default())?;
    /// # Ok::<(), palette_extractor::error::PaletteError>(())
    /// ```
    pub fn new(config: &ClientConfig) -> Result<Self, PaletteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| PaletteError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint()?,
            encoding: config.encoding,
            request_timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// 执行一次提取请求。
    pub async fn extract(
        &self,
        image: &ImageSource,
        params: &ExtractionParameters,
    ) -> Result<ExtractionResult, PaletteError> {
        let started = Instant::now();
        let request = match self.encoding {
            RequestEncoding::Multipart => {
                let url = build_request_url(&self.endpoint, params);
                log::info!(
                    "🌐 发送提取请求 - {} ({} bytes)",
                    url,
                    image.size()
                );
                self.http.post(url).multipart(Self::multipart_form(image)?)
            }
            RequestEncoding::Base64Json => {
                log::info!(
                    "🌐 发送 base64 提取请求 - {} ({} bytes)",
                    self.endpoint,
                    image.size()
                );
                self.http
                    .post(self.endpoint.clone())
                    .json(&Base64Body::new(image, params))
            }
        };

        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let result = parse_response(status, &body)?;
        log::info!(
            "✅ 提取完成 - HTTP {} colors={} total={} elapsed={}ms",
            status,
            result.colors.len(),
            result.total_colors,
            started.elapsed().as_millis()
        );

        Ok(result)
    }

    fn multipart_form(image: &ImageSource) -> Result<Form, PaletteError> {
        let body = reqwest::Body::from(image.bytes().clone());
        let part = Part::stream_with_length(body, image.size())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| PaletteError::InvalidFormat(format!("无效的 MIME 类型：{}", e)))?;
        Ok(Form::new().part(FILE_FIELD, part))
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> PaletteError {
        if e.is_timeout() {
            PaletteError::Timeout(format!("请求超时（{}秒）", self.request_timeout_secs))
        } else if e.is_connect() {
            PaletteError::Network(format!("无法连接：{}", e))
        } else {
            PaletteError::Network(format!("请求失败：{}", e))
        }
    }
}

impl ColorExtractor for ExtractionClient {
    async fn extract(
        &self,
        image: ImageSource,
        params: ExtractionParameters,
    ) -> Result<ExtractionResult, PaletteError> {
        ExtractionClient::extract(self, &image, &params).await
    }
}
