//! # 调色板提取工具 — 终端入口
//!
//! 本文件仅负责日志 / 配置初始化，以及实现终端版 `PaletteUi`。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。
//!
//! 用法：`palette-extractor [settings.json]`

use std::collections::VecDeque;
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use palette_extractor::capture::ImagePreview;
use palette_extractor::config::ClientConfig;
use palette_extractor::extraction::ExtractionClient;
use palette_extractor::notify::ArboardClipboard;
use palette_extractor::orchestrator::{Orchestrator, Rendered};
use palette_extractor::params::SortKey;
use palette_extractor::render::{RenderedPalette, SwatchRecord};
use palette_extractor::ui::PaletteUi;
use tokio::sync::{mpsc, oneshot};

/// 终端版 UI：输出到 stdout。
///
/// 大文件确认通过独立的 oneshot 通道作答，命令循环把下一行输入转交给最早的待确认提示。
#[derive(Default)]
struct TerminalUi {
    pending_confirms: Mutex<VecDeque<oneshot::Sender<bool>>>,
}

impl TerminalUi {
    fn has_pending_confirm(&self) -> bool {
        self.pending_confirms
            .lock()
            .map(|queue| !queue.is_empty())
            .unwrap_or(false)
    }

    /// 若有等待中的确认提示，用这一行作答并返回 `true`。
    fn answer_pending_confirm(&self, line: &str) -> bool {
        let sender = match self.pending_confirms.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(_) => None,
        };
        match sender {
            Some(tx) => {
                let _ = tx.send(is_yes(line));
                true
            }
            None => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl PaletteUi for TerminalUi {
    fn show_preview(&self, preview: &ImagePreview) {
        match preview.dimensions {
            Some((width, height)) => {
                println!("🖼️  预览: {}x{}, {} bytes", width, height, preview.size_bytes)
            }
            None => println!("🖼️  预览: {} bytes（尺寸未知）", preview.size_bytes),
        }
    }

    fn set_loading(&self, loading: bool) {
        if loading {
            println!("⏳ 正在提取颜色...");
        }
    }

    fn render_swatches(&self, swatches: &[SwatchRecord]) {
        print_swatches(swatches);
    }

    fn show_summary(&self, summary: &str) {
        println!("{}", summary);
    }

    fn show_notification(&self, message: &str) {
        eprintln!("❗ {}", message);
    }

    async fn confirm_large_upload(&self, size_bytes: u64) -> bool {
        let (tx, rx) = oneshot::channel();
        match self.pending_confirms.lock() {
            Ok(mut queue) => queue.push_back(tx),
            Err(_) => return false,
        }

        print!(
            "图片大小为 {:.2}MB，处理可能较慢，是否继续？[y/N] ",
            size_bytes as f64 / (1024.0 * 1024.0)
        );
        let _ = std::io::stdout().flush();

        rx.await.unwrap_or(false)
    }

    fn set_limit_editable(&self, editable: bool) {
        if !editable {
            println!("🔒 自动上限已开启，数量上限暂不生效");
        }
    }

    fn show_copied_notice(&self, visible: bool) {
        if visible {
            println!("📋 Copied!");
        }
    }
}

/// 终端命令。
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Open(PathBuf),
    Paste,
    Sort(String),
    Limit(String),
    Auto(bool),
    Copy(usize),
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match name.to_lowercase().as_str() {
            "" => Self::Empty,
            "open" if !arg.is_empty() => Self::Open(PathBuf::from(arg)),
            "paste" => Self::Paste,
            "sort" if !arg.is_empty() => Self::Sort(arg.to_string()),
            "limit" => Self::Limit(arg.to_string()),
            "auto" => match arg.to_lowercase().as_str() {
                "on" | "true" | "1" => Self::Auto(true),
                "off" | "false" | "0" => Self::Auto(false),
                _ => Self::Unknown(line.to_string()),
            },
            "copy" => match arg.parse::<usize>() {
                Ok(index) => Self::Copy(index),
                Err(_) => Self::Unknown(line.to_string()),
            },
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

fn print_help() {
    println!("命令：");
    println!("  open <路径>        选择本地图片并提取");
    println!("  paste              从系统剪贴板粘贴图片");
    println!("  sort <方式>        frequency / hue / brightness / 服务端自定义");
    println!("  limit [数量]       1~64，留空或 0 使用服务默认值");
    println!("  auto on|off        自动决定颜色数量");
    println!("  copy <序号>        复制色块颜色值");
    println!("  show               重新显示当前结果");
    println!("  quit               退出");
}

fn print_swatches(swatches: &[SwatchRecord]) {
    for (index, swatch) in swatches.iter().enumerate() {
        println!(
            "[{:>2}] {}  {:<20} {:>8}  {}",
            index, swatch.hex, swatch.rgb, swatch.percentage, swatch.pixels
        );
    }
}

fn print_palette(palette: &RenderedPalette) {
    print_swatches(&palette.swatches);
    println!("{}", palette.summary);
}

/// 在独立线程读取 stdin，按行转发到 async 侧。
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::warn!("读取输入失败: {err}");
                    break;
                }
            }
        }
    });
    rx
}

/// 后台执行会发起提取的命令，命令循环继续读取输入。
fn spawn_command<F>(name: &'static str, task: F)
where
    F: Future<Output = Rendered> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = task.await {
            log::debug!("命令 {} 结束 [{}]: {err}", name, err.code());
        }
    });
}

async fn run(config: ClientConfig) {
    let client = match ExtractionClient::new(&config) {
        Ok(client) => client,
        Err(err) => {
            log::error!("提取客户端初始化失败: {err}");
            return;
        }
    };
    log::info!("🔗 提取服务: {}", client.endpoint());

    let mut lines = spawn_stdin_reader();
    let ui = Arc::new(TerminalUi::default());
    let clipboard = Arc::new(ArboardClipboard::new(
        config.clipboard_retries,
        Duration::from_millis(config.clipboard_retry_delay_ms),
    ));
    let orchestrator = Orchestrator::new(client, Arc::clone(&ui), clipboard, config);

    print_help();

    while let Some(line) = lines.recv().await {
        if ui.answer_pending_confirm(&line) {
            continue;
        }

        match Command::parse(&line) {
            Command::Open(path) => {
                let orchestrator = orchestrator.clone();
                spawn_command("open", async move { orchestrator.open_file(&path).await });
            }
            Command::Paste => {
                let orchestrator = orchestrator.clone();
                spawn_command("paste", async move {
                    orchestrator.paste_from_system_clipboard().await
                });
            }
            Command::Sort(key) => match SortKey::parse(&key) {
                Ok(sort_by) => {
                    let orchestrator = orchestrator.clone();
                    spawn_command("sort", async move { orchestrator.set_sort_by(sort_by).await });
                }
                Err(err) => eprintln!("❗ {err}"),
            },
            Command::Limit(input) => {
                let orchestrator = orchestrator.clone();
                spawn_command("limit", async move { orchestrator.set_limit_input(&input).await });
            }
            Command::Auto(enabled) => {
                let orchestrator = orchestrator.clone();
                spawn_command("auto", async move { orchestrator.set_auto_limit(enabled).await });
            }
            Command::Copy(index) => match orchestrator.copy_swatch(index) {
                Ok(Some(_notice)) => {}
                Ok(None) => eprintln!("❗ 没有序号为 {index} 的色块"),
                Err(err) => log::debug!("复制失败 [{}]: {err}", err.code()),
            },
            Command::Show => match orchestrator.current_palette() {
                Ok(Some(palette)) => print_palette(&palette),
                Ok(None) => println!("尚无提取结果"),
                Err(err) => log::debug!("读取结果失败 [{}]: {err}", err.code()),
            },
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(input) => eprintln!("❗ 未知命令: {input}（输入 help 查看用法）"),
        }
    }

    log::info!("👋 退出");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match ClientConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("配置加载失败: {err}");
            std::process::exit(2);
        }
    };

    // 单线程协作式调度：所有事件在同一线程上交替推进
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("创建运行时失败: {err}");
            std::process::exit(1);
        }
    };

    runtime.block_on(run(config));
}
