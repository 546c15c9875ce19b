//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理两种来源（本地文件 / 粘贴条目）的原始字节，并尽早执行输入校验，
//! 目标是尽快失败，不把明显无效的负载送到网络层。
//!
//! ## 实现思路
//!
//! - 文件：存在性 + 可选的 metadata 体积上限 + 读取 + 魔数嗅探 MIME（`infer`），失败时回退扩展名。
//! - 粘贴：按顺序取第一个声明为图片的条目，其余忽略；生成带时间戳的文件名。

use std::path::Path;

use chrono::Local;

use super::source::{ClipboardItem, ImageSource};
use crate::config::ClientConfig;
use crate::error::PaletteError;

/// 从本地路径加载图片。
pub async fn load_image_file(path: &Path, config: &ClientConfig) -> Result<ImageSource, PaletteError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| PaletteError::FileSystem(format!("无法读取文件信息（{}）：{}", path.display(), e)))?;

    if !metadata.is_file() {
        return Err(PaletteError::FileSystem(format!("不是文件：{}", path.display())));
    }

    if let Some(max_file_size) = config.max_file_size.filter(|max| metadata.len() > *max) {
        return Err(PaletteError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PaletteError::FileSystem(format!("无法读取图片文件：{}", e)))?;

    let mime_type = detect_image_mime(&bytes, path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("image.{}", extension_for_mime(&mime_type)));

    log::info!(
        "✅ 本地图片读取成功 - {} ({}, {} bytes)",
        file_name,
        mime_type,
        bytes.len()
    );

    Ok(ImageSource::new(bytes, mime_type, file_name))
}

/// 从粘贴条目中挑出第一个图片条目。
///
/// 文本及其他条目一律忽略；没有图片时返回 `None`。
pub fn select_image_item(items: &[ClipboardItem]) -> Option<ImageSource> {
    let item = items.iter().find(|item| item.is_image())?;
    let mime_type = item.kind.trim().to_ascii_lowercase();
    let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
    let file_name = format!("pasted_{}.{}", timestamp, extension_for_mime(&mime_type));

    log::debug!(
        "📋 粘贴条目中选中图片 - 类型: {} 体积: {} bytes（共 {} 条）",
        mime_type,
        item.data.len(),
        items.len()
    );

    Some(ImageSource::new(item.data.clone(), mime_type, file_name))
}

/// 通过魔数识别图片 MIME；无法识别时按扩展名兜底。
fn detect_image_mime(bytes: &[u8], path: &Path) -> Result<String, PaletteError> {
    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() == infer::MatcherType::Image {
            return Ok(kind.mime_type().to_string());
        }
        return Err(PaletteError::InvalidFormat(format!(
            "不是图片类型：{}",
            kind.mime_type()
        )));
    }

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "svg" => Ok("image/svg+xml".to_string()),
        "png" => Ok("image/png".to_string()),
        "jpg" | "jpeg" => Ok("image/jpeg".to_string()),
        "gif" => Ok("image/gif".to_string()),
        "webp" => Ok("image/webp".to_string()),
        "bmp" => Ok("image/bmp".to_string()),
        _ => Err(PaletteError::InvalidFormat(format!(
            "无法识别的图片格式：{}",
            path.display()
        ))),
    }
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/svg+xml" => "svg",
        "image/tiff" => "tiff",
        _ => "png",
    }
}
