mod config;
mod error;
mod filter;
mod models;
mod source;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, default_config_path, load_config};
use crate::error::AppError;
use crate::models::Character;
use crate::source::{HttpSource, spawn_fetch};
use crate::ui::{App, render};

/// 动画刷新间隔
const TICK: Duration = Duration::from_millis(100);

type PendingFetch = oneshot::Receiver<Result<Vec<Character>, AppError>>;

/// 获取数据目录路径 (~/.local/share/thrones/)
fn get_data_dir() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "无法获取用户数据目录"))?
        .join("thrones");

    fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// 日志写入文件，终端由 TUI 占用
fn init_logging(config: &Config) -> anyhow::Result<PathBuf> {
    let log_path = get_data_dir()?.join("thrones.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("无法打开日志文件 {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(log_path)
}

fn main() -> anyhow::Result<()> {
    let config = match default_config_path() {
        Some(path) => load_config(&path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?,
        None => Config::default(),
    };
    let log_path = init_logging(&config)?;
    tracing::info!(log = %log_path.display(), "starting");

    // 拉取在运行时上进行，UI 循环留在主线程
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("无法创建 tokio 运行时")?;
    let source = HttpSource::from_config(&config).context("无法创建 HTTP 客户端")?;
    tracing::info!(endpoint = %source.endpoint(), "data source ready");
    let mut pending = Some(spawn_fetch(runtime.handle(), source));

    let mut app = App::new();

    // panic 时先恢复终端
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app, &mut pending);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    runtime.shutdown_timeout(Duration::from_millis(200));
    tracing::info!("exiting");

    result.map_err(Into::into)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    pending: &mut Option<PendingFetch>,
) -> io::Result<()> {
    loop {
        if let Some(rx) = pending.as_mut() {
            match rx.try_recv() {
                Ok(result) => {
                    app.on_loaded(result);
                    *pending = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    app.on_loaded(Err(AppError::Io(io::Error::other(
                        "fetch task ended without a result",
                    ))));
                    *pending = None;
                }
            }
        }

        terminal.draw(|f| render(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && ui::handle_key_event(app, key.code) {
                    break;
                }
            }
        } else {
            app.tick();
        }
    }
    Ok(())
}
