//! # 本地预览模块
//!
//! ## 设计思路
//!
//! 预览与网络请求完全解耦：采集后立即在阻塞线程生成预览，编排器不等待其结果。
//! 预览失败只影响展示，不影响提取。
//!
//! ## 实现思路
//!
//! - Data URL：`data:<mime>;base64,<payload>`，供 UI 层直接显示。
//! - 尺寸：仅读取图片头信息，不做完整解码；无法识别时为 `None`。

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};

use super::source::ImageSource;
use crate::error::PaletteError;

/// 供 UI 展示的本地预览。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub data_url: String,
    /// 图片头中读到的宽高。
    pub dimensions: Option<(u32, u32)>,
    pub size_bytes: u64,
}

/// 在阻塞线程中生成预览。
pub async fn build_preview(source: ImageSource) -> Result<ImagePreview, PaletteError> {
    tokio::task::spawn_blocking(move || preview_from_source(&source))
        .await
        .map_err(|e| PaletteError::ResourceLimit(format!("预览线程执行失败：{}", e)))
}

pub(crate) fn preview_from_source(source: &ImageSource) -> ImagePreview {
    let encoded = general_purpose::STANDARD.encode(source.bytes());
    let data_url = format!("data:{};base64,{}", source.mime_type(), encoded);

    let dimensions = inspect_dimensions(source.bytes());
    if dimensions.is_none() {
        log::debug!("⚠️ 无法读取图片尺寸 - {}", source.file_name());
    }

    ImagePreview {
        data_url,
        dimensions,
        size_bytes: source.size(),
    }
}

fn inspect_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
