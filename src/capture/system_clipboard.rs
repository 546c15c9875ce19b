//! # 系统剪贴板读取
//!
//! ## 设计思路
//!
//! 将平台剪贴板内容转换为与浏览器粘贴事件一致的条目列表（文本在前、图片在后），
//! 交由 `select_image_item` 统一挑选，保证两种平台下选择规则一致。
//!
//! ## 实现思路
//!
//! - `arboard` 读取在阻塞线程执行，避免阻塞 async 运行时。
//! - 剪贴板图片为裸 RGBA，需经 `image` 重新编码为 PNG 才能上传。

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use super::source::ClipboardItem;
use crate::error::PaletteError;

/// 读取系统剪贴板，返回按顺序排列的条目。
pub async fn read_system_clipboard() -> Result<Vec<ClipboardItem>, PaletteError> {
    tokio::task::spawn_blocking(read_items_blocking)
        .await
        .map_err(|e| PaletteError::Clipboard(format!("线程执行失败：{}", e)))?
}

fn read_items_blocking() -> Result<Vec<ClipboardItem>, PaletteError> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| PaletteError::Clipboard(format!("无法访问剪贴板：{}", e)))?;

    let mut items = Vec::new();

    match clipboard.get_text() {
        Ok(text) => items.push(ClipboardItem::text(text)),
        Err(e) => log::debug!("剪贴板无文本：{}", e),
    }

    match clipboard.get_image() {
        Ok(image_data) => {
            let png = encode_rgba_as_png(
                image_data.width as u32,
                image_data.height as u32,
                image_data.bytes.into_owned(),
            )?;
            items.push(ClipboardItem::new("image/png", png));
        }
        Err(e) => log::debug!("剪贴板无图片：{}", e),
    }

    log::debug!("📋 读取剪贴板完成 - {} 条", items.len());
    Ok(items)
}

pub(crate) fn encode_rgba_as_png(width: u32, height: u32, rgba: Vec<u8>) -> Result<Vec<u8>, PaletteError> {
    let image = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| PaletteError::Clipboard("创建图像缓冲区失败".to_string()))?;

    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| PaletteError::Clipboard(format!("PNG 编码失败：{}", e)))?;
    Ok(cursor.into_inner())
}
