use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;
use log::{info, warn};
use std::io::{self, BufRead};
use std::path::PathBuf;

use myy_control::command::{execute, parse_command, LoopControl};
use myy_control::core::ControlConfig;
use myy_control::player::edl::EdlRecorder;
use myy_control::player::{PlaybackContext, StatusChannel};
use myy_control::property::Registry;

/// 从标准输入读取播放控制命令
#[derive(Parser, Debug)]
#[command(name = "myy_control", version, about = "播放器属性与命令控制核心")]
struct Cli {
    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 打印属性列表后退出
    #[arg(long)]
    list_properties: bool,

    /// 当前媒体文件名
    media: Option<String>,
}

fn print_status(rx: &Receiver<String>) {
    for line in rx.try_iter() {
        println!("{}", line);
    }
}

fn run_line(line: &str, ctx: &mut PlaybackContext, rx: &Receiver<String>) -> LoopControl {
    let control = match parse_command(line) {
        Ok(cmd) => execute(&cmd, ctx),
        Err(e) => {
            warn!("{}", e);
            LoopControl::Continue
        }
    };
    print_status(rx);
    control
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    if cli.list_properties {
        print!("{}", Registry::format_help());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => ControlConfig::load(path)
            .with_context(|| format!("无法加载配置 {}", path.display()))?,
        None => ControlConfig::default(),
    };

    let edl = match &config.edl_output {
        Some(path) => EdlRecorder::open(path)
            .with_context(|| format!("无法创建 EDL 文件 {}", path.display()))?,
        None => EdlRecorder::new(),
    };

    let (status, rx) = StatusChannel::new();
    let mut ctx = PlaybackContext::new(config);
    ctx.status = status;
    ctx.edl = edl;
    ctx.filename = cli.media;

    info!("🎬 控制核心启动，共 {} 个属性", Registry::all().count());

    for line in io::stdin().lock().lines() {
        let line = line.context("读取标准输入失败")?;
        if line.trim().is_empty() {
            continue;
        }
        let mut control = run_line(&line, &mut ctx, &rx);
        // 命令内部排队的后续命令
        while let Some(queued) = ctx.queued.pop_front() {
            control = run_line(&queued, &mut ctx, &rx);
        }
        match control {
            LoopControl::Continue => {}
            LoopControl::Break => {
                if let Some(seek) = ctx.seek.take() {
                    info!("seek 请求: {:?}", seek);
                }
                if let Some(reason) = ctx.eof.take() {
                    info!("结束当前文件: {:?}", reason);
                }
            }
            LoopControl::Reinit => info!("重新初始化播放"),
        }
        if let Some(code) = ctx.exit_code {
            std::process::exit(code);
        }
    }

    Ok(())
}
