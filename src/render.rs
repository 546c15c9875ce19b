//! # 结果渲染模块
//!
//! ## 设计思路
//!
//! 将 `ExtractionResult` 转为 UI 可直接展示的记录：色块列表 + 一行摘要。
//! 顺序完全由服务决定（按频率 / 色相 / 亮度），这里不做任何重排。
//! 每次渲染整体替换之前的色块，不做增量比对。

use crate::extraction::{ColorSwatch, ExtractionResult};
use crate::params::{ColorLimit, ExtractionParameters, LimitMode};

/// 单个色块的展示记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwatchRecord {
    pub hex: String,
    pub rgb: String,
    /// 例如 `50%`、`12.5%`。
    pub percentage: String,
    /// 例如 `Pixels: 1,234,567`。
    pub pixels: String,
}

/// 一次渲染的完整输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPalette {
    pub swatches: Vec<SwatchRecord>,
    pub summary: String,
}

/// 结果渲染器。
#[derive(Debug, Clone, Copy)]
pub struct ResultRenderer {
    thousands_separator: char,
}

impl Default for ResultRenderer {
    fn default() -> Self {
        Self::new(',')
    }
}

impl ResultRenderer {
    pub fn new(thousands_separator: char) -> Self {
        Self { thousands_separator }
    }

    pub fn render(&self, result: &ExtractionResult, params: &ExtractionParameters) -> RenderedPalette {
        RenderedPalette {
            swatches: result.colors.iter().map(|color| self.swatch(color)).collect(),
            summary: summary(result.total_colors, params),
        }
    }

    fn swatch(&self, color: &ColorSwatch) -> SwatchRecord {
        SwatchRecord {
            hex: color.hex.clone(),
            rgb: color.rgb.clone(),
            percentage: format!("{}%", color.percentage),
            pixels: format!("Pixels: {}", group_thousands(color.count, self.thousands_separator)),
        }
    }
}

/// 摘要文案：说明找到多少颜色以及数量来源。
pub fn summary(total_colors: u64, params: &ExtractionParameters) -> String {
    let reason = match params.limit_mode() {
        LimitMode::Auto => format!("auto-detected: {}", total_colors),
        LimitMode::Fixed(limit) => format!("limited to {}", limit),
        LimitMode::ServiceDefault => format!("max {}", ColorLimit::MAX),
    };
    format!("Found {} unique colors ({})", total_colors, reason)
}

/// 按三位一组插入分隔符。
pub fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
