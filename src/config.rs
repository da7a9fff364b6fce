use std::path::PathBuf;

use crate::decode::CallingConvention;
use crate::playback::SinkKind;

#[derive(Debug, Clone)]
pub struct Config {
    // 应用信息（静态部分）
    pub app_name: &'static str,
    pub app_version: &'static str,

    // 解码引擎调用方式
    pub convention: CallingConvention,

    // 批量解码参数
    pub parallel: bool,
    pub preview_samples: usize,

    // 播放参数（可在运行时由命令行覆盖）
    pub sink: SinkKind,
    pub device: String,
    pub period_size: usize,
    pub out_dir: PathBuf,
}

impl Config {
    /// 从编译时设置的环境变量创建配置
    /// 所有参数都在编译时从 config.toml 中读取
    pub fn new() -> Result<Self, &'static str> {
        Ok(Self {
            app_name: env!("APP_NAME"),
            app_version: env!("APP_VERSION"),

            convention: env!("ENGINE_CONVENTION").parse()
                .map_err(|_| "Failed to parse ENGINE_CONVENTION")?,

            parallel: env!("BATCH_PARALLEL").parse()
                .map_err(|_| "Failed to parse BATCH_PARALLEL")?,
            preview_samples: env!("BATCH_PREVIEW_SAMPLES").parse()
                .map_err(|_| "Failed to parse BATCH_PREVIEW_SAMPLES")?,

            sink: env!("PLAYBACK_SINK").parse()
                .map_err(|_| "Failed to parse PLAYBACK_SINK")?,
            device: env!("PLAYBACK_DEVICE").to_string(),
            period_size: env!("PLAYBACK_PERIOD_SIZE").parse()
                .map_err(|_| "Failed to parse PLAYBACK_PERIOD_SIZE")?,
            out_dir: PathBuf::from(env!("PLAYBACK_OUT_DIR")),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new().expect("Failed to create default Config from build-time environment variables")
    }
}
