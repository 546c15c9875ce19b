//! # 颜色提取模块（extraction）
//!
//! ## 设计思路
//!
//! 像素分析完全由外部服务完成，本模块只负责线上协议：
//!
//! - `request`：查询参数与 base64 请求体构建
//! - `response`：响应解析与领域模型
//! - `client`：基于 `reqwest` 的 HTTP 实现
//!
//! 编排器只依赖 [`ColorExtractor`] trait，测试可注入假实现。

mod client;
mod request;
mod response;

use std::future::Future;

pub use client::ExtractionClient;
pub use request::{FILE_FIELD, build_request_url, query_pairs};
pub use response::{ColorSwatch, ExtractionResult, parse_response};

use crate::capture::ImageSource;
use crate::error::PaletteError;
use crate::params::ExtractionParameters;

/// 颜色提取能力。
pub trait ColorExtractor: Send + Sync + 'static {
    fn extract(
        &self,
        image: ImageSource,
        params: ExtractionParameters,
    ) -> impl Future<Output = Result<ExtractionResult, PaletteError>> + Send;
}
