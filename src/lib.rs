//! # 图片调色板提取客户端 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │             平台 UI（终端 / 桌面窗口 / 测试桩）           │
//! │                 实现 ui::PaletteUi 能力接口               │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ 回调（预览 / 色块 / 摘要 / 通知 / 确认 / 复制提示）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            编排层 (Rust)                         │
//! │                                                          │
//! │  orchestrator ── SessionState（唯一可变存储 + 请求序号）   │
//! │   ├─ capture        文件 / 粘贴 → ImageSource + 预览      │
//! │   ├─ params         排序 · 数量上限 · 自动上限            │
//! │   ├─ extraction     reqwest → 提取服务 → ExtractionResult │
//! │   ├─ render         色块记录 + 摘要文案                   │
//! │   └─ notify         复制颜色值 + 2 秒提示                 │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ HTTP: POST /extract-colors?sort_by=…[&limit=…|&auto_limit=true]
//! ┌───────┴──────────────────────────────────────────────────┐
//! │                 外部颜色提取服务（黑盒）                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `PaletteError` |
//! | [`config`] | 运行配置 `ClientConfig`（JSON 设置文件 + 默认值） |
//! | [`capture`] | 文件 / 粘贴采集、MIME 嗅探、本地预览 |
//! | [`params`] | 参数控制器、数量上限解析与钳制 |
//! | [`extraction`] | 线上协议与 HTTP 客户端 |
//! | [`render`] | 色块展示记录与摘要 |
//! | [`notify`] | 剪贴板写入与复制提示 |
//! | [`session`] | 会话状态与过期响应裁决 |
//! | [`ui`] | 平台 UI 能力接口 |
//! | [`orchestrator`] | 串联以上模块的事件循环 |

pub mod capture;
pub mod config;
pub mod error;
pub mod extraction;
pub mod notify;
pub mod orchestrator;
pub mod params;
pub mod render;
pub mod session;
pub mod ui;
