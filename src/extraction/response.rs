//! # 响应解析
//!
//! ## 设计思路
//!
//! 线上格式与领域模型分离：`WireResponse` 宽松接收（字段均可缺省），
//! 再收敛为 `ExtractionResult`。缺少 `colors` 时给出显式错误，而不是静默忽略。

use serde::{Deserialize, Serialize};

use crate::error::PaletteError;

/// 单个颜色条目，收到后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSwatch {
    pub hex: String,
    pub rgb: String,
    /// 占整图像素的百分比（0–100）。
    pub percentage: f64,
    /// 像素计数。
    pub count: u64,
}

/// 一次提取的结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// 顺序由服务决定，客户端不重排。
    pub colors: Vec<ColorSwatch>,
    /// 服务发现的不同颜色数量，可能大于 `colors.len()`。
    pub total_colors: u64,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    colors: Option<Vec<ColorSwatch>>,
    total_colors: Option<u64>,
    detail: Option<serde_json::Value>,
}

/// 解析响应体。
///
/// - 非 JSON 或字段类型不符 → `Decode`
/// - 缺少 `colors`（含 `{"detail": ...}` 错误体）→ `MalformedResponse`
pub fn parse_response(status: u16, body: &[u8]) -> Result<ExtractionResult, PaletteError> {
    let wire: WireResponse = serde_json::from_slice(body)
        .map_err(|e| PaletteError::Decode(format!("HTTP {}：{}", status, e)))?;

    let Some(colors) = wire.colors else {
        let detail = match wire.detail {
            Some(serde_json::Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => "响应缺少 colors 字段".to_string(),
        };
        return Err(PaletteError::MalformedResponse(format!("HTTP {}：{}", status, detail)));
    };

    let total_colors = wire.total_colors.unwrap_or(colors.len() as u64);
    Ok(ExtractionResult { colors, total_colors })
}
