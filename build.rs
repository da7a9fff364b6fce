use std::fs;
use std::path::Path;
use serde::Deserialize;

#[derive(Deserialize)]
struct Config {
    application: Application,
    engine: Engine,
    batch: Batch,
    playback: Playback,
}

#[derive(Deserialize)]
struct Application {
    name: String,
    version: String,
}

#[derive(Deserialize)]
struct Engine {
    convention: String,
}

#[derive(Deserialize)]
struct Batch {
    parallel: bool,
    preview_samples: usize,
}

#[derive(Deserialize)]
struct Playback {
    sink: String,
    device: String,
    period_size: usize,
    out_dir: String,
}

// 在编译时读取 config.toml 并设置环境变量
fn main() {
    println!("cargo:rerun-if-changed=config.toml");

    let config_path = Path::new("config.toml");
    if !config_path.exists() {
        panic!("config.toml not found!");
    }

    let config_str = fs::read_to_string(config_path).expect("Failed to read config.toml");
    let config: Config = toml::from_str(&config_str).expect("Failed to parse config.toml");

    // 应用信息
    println!("cargo:rustc-env=APP_NAME={}", config.application.name);
    println!("cargo:rustc-env=APP_VERSION={}", config.application.version);

    // 解码引擎配置
    println!("cargo:rustc-env=ENGINE_CONVENTION={}", config.engine.convention);

    // 批量解码配置
    println!("cargo:rustc-env=BATCH_PARALLEL={}", config.batch.parallel);
    println!("cargo:rustc-env=BATCH_PREVIEW_SAMPLES={}", config.batch.preview_samples);

    // 播放配置
    println!("cargo:rustc-env=PLAYBACK_SINK={}", config.playback.sink);
    println!("cargo:rustc-env=PLAYBACK_DEVICE={}", config.playback.device);
    println!("cargo:rustc-env=PLAYBACK_PERIOD_SIZE={}", config.playback.period_size);
    println!("cargo:rustc-env=PLAYBACK_OUT_DIR={}", config.playback.out_dir);

    if std::env::var_os("CARGO_FEATURE_XADEC").is_some() {
        link_xadec();
    }
}

// 链接外部 XA 解码引擎 libxadec
fn link_xadec() {
    let target = std::env::var("TARGET").unwrap_or_default();

    if target.contains("musl") {
        // musl 目标：使用手动编译的静态库，不依赖 pkg-config
        if let Ok(sysroot) = std::env::var("MUSL_SYSROOT") {
            println!("cargo:rustc-link-search=native={}/usr/lib", sysroot);
        }
        println!("cargo:rustc-link-lib=static=xadec");
        return;
    }

    pkg_config::Config::new()
        .probe("xadec")
        .expect("Failed to find xadec. Please install the libxadec development package.");
}
