//! # 参数控制模块
//!
//! ## 设计思路
//!
//! 持有排序方式、数量上限与自动上限三个参数，并将用户输入解析为“可直接发请求”的参数。
//! 自动上限开启时，数量上限在请求层面被忽略，但其值保留，关闭自动上限后恢复生效。
//!
//! ## 实现思路
//!
//! - `ColorLimit` 构造时即钳制到 `[1, 64]`，下游无需重复校验。
//! - `parse_limit_input` 只取前导整数（允许符号，忽略尾随字符），溢出时饱和到边界。
//! - `LimitMode` 将“自动 / 固定 / 服务默认”三态显式化，请求构建与摘要渲染共用。

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::PaletteError;

static LEADING_INTEGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?)(\d+)").expect("leading integer pattern is valid")
});

/// 服务端排序方式。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    /// 按像素占比降序。
    #[default]
    Frequency,
    /// 按色相排列（彩虹序）。
    Hue,
    /// 按亮度降序。
    Brightness,
    /// 服务端自定义的其他排序键，原样透传。
    Other(String),
}

impl SortKey {
    /// 解析外部输入的排序键。
    pub fn parse(key: &str) -> Result<Self, PaletteError> {
        let trimmed = key.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Err(PaletteError::InvalidFormat("排序方式不能为空".to_string())),
            "frequency" => Ok(Self::Frequency),
            "hue" | "rainbow" => Ok(Self::Hue),
            "brightness" | "luminosity" => Ok(Self::Brightness),
            _ => Ok(Self::Other(trimmed.to_string())),
        }
    }

    /// 线上协议使用的取值。
    pub fn wire_name(&self) -> &str {
        match self {
            Self::Frequency => "frequency",
            Self::Hue => "rainbow",
            Self::Brightness => "luminosity",
            Self::Other(key) => key,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// 已钳制到 `[1, 64]` 的颜色数量上限。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColorLimit(u8);

impl ColorLimit {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 64;

    /// 将任意整数钳制为合法上限。
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ColorLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 解析数量输入框文本。
///
/// - `""` 或恰为 `"0"` → `None`（使用服务默认值）
/// - 其余整数（含 `"00"`、`"-0"`）→ 钳制到 `[1, 64]`
/// - 无前导数字 → `InvalidLimit`
pub fn parse_limit_input(input: &str) -> Result<Option<ColorLimit>, PaletteError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "0" {
        return Ok(None);
    }

    let captures = LEADING_INTEGER
        .captures(input)
        .ok_or_else(|| PaletteError::InvalidLimit(trimmed.to_string()))?;
    let negative = &captures[1] == "-";
    let digits = captures[2].trim_start_matches('0');

    let magnitude = if digits.is_empty() {
        0
    } else {
        digits.parse::<i64>().unwrap_or(i64::MAX)
    };
    let value = if negative { -magnitude } else { magnitude };
    Ok(Some(ColorLimit::clamped(value)))
}

/// 请求层面的数量策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitMode {
    /// 由服务自行决定数量（`auto_limit=true`）。
    Auto,
    /// 显式上限（`limit=<n>`）。
    Fixed(ColorLimit),
    /// 两者都不发送，使用服务默认上限。
    ServiceDefault,
}

/// 一次提取所使用的参数。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionParameters {
    pub sort_by: SortKey,
    pub limit: Option<ColorLimit>,
    pub auto_limit: bool,
}

impl ExtractionParameters {
    /// 解析出请求层面的数量策略；自动上限优先于存储的上限。
    pub fn limit_mode(&self) -> LimitMode {
        match (self.auto_limit, self.limit) {
            (true, _) => LimitMode::Auto,
            (false, Some(limit)) => LimitMode::Fixed(limit),
            (false, None) => LimitMode::ServiceDefault,
        }
    }
}

/// 参数控制器。
///
/// 每个 setter 返回“是否需要重新提取”，由编排器决定是否真正发请求。
#[derive(Debug, Clone, Default)]
pub struct ParameterController {
    params: ExtractionParameters,
}

impl ParameterController {
    pub fn new(params: ExtractionParameters) -> Self {
        Self { params }
    }

    /// 当前参数快照。
    pub fn resolved(&self) -> ExtractionParameters {
        self.params.clone()
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) -> bool {
        self.params.sort_by = sort_by;
        true
    }

    /// 设置数量输入框文本。
    ///
    /// 解析失败时保留原值；自动上限开启期间只记录不触发请求。
    pub fn set_limit_input(&mut self, input: &str) -> Result<bool, PaletteError> {
        let limit = parse_limit_input(input)?;
        self.params.limit = limit;
        Ok(!self.params.auto_limit)
    }

    pub fn set_auto_limit(&mut self, auto_limit: bool) -> bool {
        self.params.auto_limit = auto_limit;
        true
    }

    /// 数量输入框是否可编辑。
    pub fn limit_editable(&self) -> bool {
        !self.params.auto_limit
    }
}
