use std::path::PathBuf;

use clap::Parser;
use tokio::signal;

use xa_preview::app::{parse_assignments, slot_inputs, App};
use xa_preview::config::Config;
use xa_preview::decode::{default_factory, CallingConvention};
use xa_preview::playback::SinkKind;
use xa_preview::report;
use xa_preview::SlotId;

/// Decode XA files and preview-play them.
#[derive(Parser, Debug)]
#[command(name = "xa-preview", version)]
struct Cli {
    /// SLOT=PATH pairs (slots: bass, highTom, midTom, lowTom, hiHat), or a single PATH
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    /// Play a slot after decoding (repeatable)
    #[arg(long = "play", value_name = "SLOT")]
    play: Vec<SlotId>,

    /// Play every slot that decoded successfully
    #[arg(long)]
    play_all: bool,

    /// Engine calling convention: header-first or decode-then-query
    #[arg(long)]
    convention: Option<CallingConvention>,

    /// Output sink: wav or alsa
    #[arg(long)]
    sink: Option<SinkKind>,

    /// ALSA playback device
    #[arg(long, env = "XA_PREVIEW_DEVICE")]
    device: Option<String>,

    /// Directory for rendered WAV files
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Decode slots one at a time
    #[arg(long)]
    sequential: bool,

    /// Number of PCM samples shown per slot
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    // 命令行参数覆盖编译时配置
    fn apply(&self, config: &mut Config) {
        if let Some(convention) = self.convention {
            config.convention = convention;
        }
        if let Some(sink) = self.sink {
            config.sink = sink;
        }
        if let Some(device) = &self.device {
            config.device = device.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = out_dir.clone();
        }
        if self.sequential {
            config.parallel = false;
        }
        if let Some(n) = self.preview {
            config.preview_samples = n;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    env_logger::init();

    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::new().unwrap_or_default();
    cli.apply(&mut config);
    log::info!(
        "{} {} (engine: {}, sink: {})",
        config.app_name,
        config.app_version,
        config.convention,
        config.sink
    );

    let factory = default_factory().ok_or_else(|| {
        anyhow::anyhow!("built without a decoder engine; rebuild with --features xadec")
    })?;

    let assignments = parse_assignments(&cli.inputs)?;
    if assignments.is_empty() {
        anyhow::bail!("no input files given (try `bass=bass.xa`)");
    }

    let app = App::new(config, factory);

    // 解码所有输入，逐个槽位输出结果
    let results = app.decode_all(slot_inputs(assignments)).await;
    let reports = report::build(&results, app.config().preview_samples);
    if cli.json {
        println!("{}", report::render_json(&reports)?);
    } else {
        print!("{}", report::render_text(&reports));
    }

    let to_play = if cli.play_all {
        app.registry().slots().await
    } else {
        cli.play.clone()
    };

    if !to_play.is_empty() {
        let player = app.player()?;
        let mut handles = Vec::new();
        for slot in to_play {
            match player.play(slot).await {
                Ok(handle) => {
                    println!("Playing {} -> {}", slot, handle.target());
                    handles.push(handle);
                }
                // 某个槽位没有缓冲区不影响其他槽位
                Err(e) => eprintln!("Cannot play {}: {}", slot, e),
            }
        }

        let wait_all = async {
            for handle in handles {
                let slot = handle.slot();
                if let Err(e) = handle.wait().await {
                    eprintln!("Playback of {} failed: {:#}", slot, e);
                }
            }
        };

        tokio::select! {
            // 监听 Ctrl+C 信号
            _ = signal::ctrl_c() => {
                println!("Received Ctrl+C, shutting down...");
            }
            _ = wait_all => {}
        }
    }

    app.shutdown().await;

    let failed = results.values().filter(|o| !o.is_success()).count();
    if failed > 0 {
        log::warn!("{} of {} slot(s) failed to decode", failed, results.len());
    }
    Ok(())
}
