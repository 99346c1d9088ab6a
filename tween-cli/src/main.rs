//! # Tween CLI
//!
//! 补间动画场景播放工具：按固定帧率驱动调度器，打印属性随时间的变化。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p tween-cli -- run tween-cli/scenarios/demo.json
//! cargo run -p tween-cli -- run tween-cli/scenarios/demo.json --fps 10 --every 2
//! cargo run -p tween-cli -- easings
//!
//! # 查看调度日志
//! RUST_LOG=debug cargo run -p tween-cli -- run tween-cli/scenarios/demo.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tween_runtime::EasingFunction;

mod scenario;

use scenario::{Frame, Scenario};

#[derive(Parser)]
#[command(name = "tween-cli")]
#[command(about = "补间动画场景播放工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 播放场景文件并打印属性值
    Run {
        /// 场景文件路径（JSON）
        scenario: PathBuf,

        /// 覆盖场景中的帧率
        #[arg(long)]
        fps: Option<f32>,

        /// 每隔多少帧打印一行（默认：1）
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        every: u32,
    },

    /// 列出内置缓动曲线
    Easings,
}

fn main() -> ExitCode {
    init_tracing();

    if let Err(e) = real_main() {
        eprintln!("tween-cli error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            fps,
            every,
        } => {
            let loaded = Scenario::load(&scenario)?;
            let frame_rate = fps.unwrap_or(loaded.frame_rate);
            tracing::info!(path = %scenario.display(), frame_rate, "播放场景");
            let frames = loaded.play(frame_rate, every)?;
            print_frames(&frames);
        }
        Commands::Easings => {
            for easing in EasingFunction::ALL {
                println!("{}", easing.name());
            }
        }
    }
    Ok(())
}

fn print_frames(frames: &[Frame]) {
    let Some(first) = frames.first() else {
        return;
    };

    let mut header = format!("{:>6} {:>8}", "frame", "time");
    for (name, _) in &first.values {
        header.push_str(&format!(" {name:>12}"));
    }
    println!("{header}");

    for frame in frames {
        let mut line = format!("{:>6} {:>8.3}", frame.index, frame.time);
        for (_, value) in &frame.values {
            line.push_str(&format!(" {value:>12.3}"));
        }
        println!("{line}");
    }
}
