//! # 请求构建
//!
//! 查询参数规则：
//! - `sort_by` 始终存在
//! - 自动上限 → `auto_limit=true`
//! - 固定上限 → `limit=<n>`
//! - 服务默认 → 两者都不发送

use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

use crate::capture::ImageSource;
use crate::params::{ExtractionParameters, LimitMode};

/// multipart 中承载图片的字段名。
pub const FILE_FIELD: &str = "file";

/// 根据参数生成查询对。
pub fn query_pairs(params: &ExtractionParameters) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("sort_by", params.sort_by.wire_name().to_string())];
    match params.limit_mode() {
        LimitMode::Auto => pairs.push(("auto_limit", "true".to_string())),
        LimitMode::Fixed(limit) => pairs.push(("limit", limit.to_string())),
        LimitMode::ServiceDefault => {}
    }
    pairs
}

/// 将查询参数附加到提取接口地址上。
pub fn build_request_url(endpoint: &reqwest::Url, params: &ExtractionParameters) -> reqwest::Url {
    let mut url = endpoint.clone();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in query_pairs(params) {
            query.append_pair(key, &value);
        }
    }
    url
}

/// base64 接口的 JSON 请求体。
#[derive(Debug, Serialize)]
pub(crate) struct Base64Body {
    pub(crate) image: String,
    pub(crate) sort_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) limit: Option<u8>,
    pub(crate) auto_limit: bool,
}

impl Base64Body {
    pub(crate) fn new(image: &ImageSource, params: &ExtractionParameters) -> Self {
        let encoded = general_purpose::STANDARD.encode(image.bytes());
        let (limit, auto_limit) = match params.limit_mode() {
            LimitMode::Auto => (None, true),
            LimitMode::Fixed(limit) => (Some(limit.get()), false),
            LimitMode::ServiceDefault => (None, false),
        };
        Self {
            image: format!("data:{};base64,{}", image.mime_type(), encoded),
            sort_by: params.sort_by.wire_name().to_string(),
            limit,
            auto_limit,
        }
    }
}
