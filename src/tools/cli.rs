//! 命令行接口模块
//!
//! 负责命令行参数解析、配置构建和程序信息展示。

use super::config::ConvertConfig;
use super::constants::defaults;
use crate::audio::codec::CodecKind;
use crate::error::{ConvertError, ConvertResult};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 命令行解析结果
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 转换配置
    pub convert: ConvertConfig,

    /// 是否显示详细信息
    pub verbose: bool,

    /// JSON报告输出路径
    pub report_path: Option<PathBuf>,
}

/// 构建命令定义
pub fn build_command() -> Command {
    Command::new("batch-audio-converter")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("MacinMeter Team")
        .arg(
            Arg::new("ROOT")
                .help("要扫描的根目录（递归） / Root directory to scan recursively")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("input-ext")
                .long("input-ext")
                .short('i')
                .help("输入扩展名，可重复或逗号分隔 / Input extensions (repeatable, comma separated)")
                .value_name("EXT")
                .value_delimiter(',')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("输出格式 / Output format")
                .value_name("FORMAT")
                .default_value(defaults::OUTPUT_FORMAT),
        )
        .arg(
            Arg::new("bitrate")
                .long("bitrate")
                .short('b')
                .help("码率，仅对 mp3/ogg/m4a/aac 生效 / Bitrate for lossy formats")
                .value_name("RATE")
                .default_value(defaults::BITRATE),
        )
        .arg(
            Arg::new("sample-rate")
                .long("sample-rate")
                .help("目标采样率 / Target sample rate (Hz)")
                .value_name("HZ")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("channels")
                .long("channels")
                .help("目标声道数 / Target channel count")
                .value_name("N")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .short('j')
                .help("并行worker数量（默认CPU核心数） / Worker count (default: CPU cores)")
                .value_name("N")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("keep-originals")
                .long("keep-originals")
                .short('k')
                .help("转换成功后保留源文件 / Keep source files after conversion")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .help("输出根目录（镜像源目录结构） / Output root mirroring the source tree")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("codec")
                .long("codec")
                .help("编解码器 / Codec backend")
                .value_parser(["auto", "ffmpeg", "native"])
                .default_value("auto"),
        )
        .arg(
            Arg::new("ffmpeg")
                .long("ffmpeg")
                .help("ffmpeg可执行文件路径 / Path to the ffmpeg binary")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("写出JSON报告 / Write a JSON report")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息 / Verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// 解析进程参数
pub fn parse_args() -> ConvertResult<AppConfig> {
    config_from_matches(&build_command().get_matches())
}

/// 从参数列表解析（便于测试）
pub fn parse_from<I, T>(args: I) -> ConvertResult<AppConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_command()
        .try_get_matches_from(args)
        .map_err(|e| ConvertError::InvalidInput(e.to_string()))?;
    config_from_matches(&matches)
}

fn config_from_matches(matches: &ArgMatches) -> ConvertResult<AppConfig> {
    let root = matches
        .get_one::<String>("ROOT")
        .map(PathBuf::from)
        .ok_or_else(|| ConvertError::InvalidInput("缺少根目录 / missing ROOT".to_string()))?;

    let mut convert = ConvertConfig::new(root)
        .with_output_format(matches.get_one::<String>("format").map_or(defaults::OUTPUT_FORMAT, String::as_str))
        .with_bitrate(matches.get_one::<String>("bitrate").map_or(defaults::BITRATE, String::as_str))
        .with_sample_rate(matches.get_one::<u32>("sample-rate").copied())
        .with_channels(matches.get_one::<u16>("channels").copied())
        .with_worker_count(matches.get_one::<usize>("workers").copied())
        .with_delete_originals(!matches.get_flag("keep-originals"))
        .with_output_dir(matches.get_one::<String>("output-dir").map(PathBuf::from));

    if let Some(exts) = matches.get_many::<String>("input-ext") {
        let exts: Vec<&String> = exts.filter(|e| !e.trim().is_empty()).collect();
        convert = convert.with_input_extensions(exts);
    }

    if let Some(codec) = matches.get_one::<String>("codec") {
        convert = convert.with_codec(CodecKind::parse(codec)?);
    }
    convert.ffmpeg_path = matches.get_one::<String>("ffmpeg").map(PathBuf::from);

    convert.validate()?;

    Ok(AppConfig {
        convert,
        verbose: matches.get_flag("verbose"),
        report_path: matches.get_one::<String>("report").map(PathBuf::from),
    })
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("[START] Batch Audio Converter v{VERSION}");
    println!("[START] {DESCRIPTION}");
    if config.verbose {
        let c = &config.convert;
        let exts: Vec<&str> = c.input_extensions.iter().map(String::as_str).collect();
        println!("   输入扩展名 / inputs: {}", exts.join(", "));
        println!("   输出格式 / format: {} ({})", c.output_format, c.bitrate);
        if let Some(rate) = c.sample_rate {
            println!("   采样率 / sample rate: {rate} Hz");
        }
        if let Some(channels) = c.channels {
            println!("   声道 / channels: {channels}");
        }
        println!("   编解码器 / codec: {}", c.codec.as_str());
        println!(
            "   源文件 / originals: {}",
            if c.delete_originals { "delete" } else { "keep" }
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_defaults_from_minimal_args() {
        let app = parse_from(["bac", "/music"]).unwrap();
        assert_eq!(app.convert.root_directory, PathBuf::from("/music"));
        assert_eq!(app.convert.output_format, "mp3");
        assert_eq!(app.convert.bitrate, "192k");
        assert!(app.convert.delete_originals);
        assert_eq!(app.convert.input_extensions.len(), 7);
        assert!(!app.verbose);
        assert!(app.report_path.is_none());
    }

    #[test]
    fn test_full_argument_set() {
        let app = parse_from([
            "bac",
            "/music",
            "-i",
            "WAV,flac",
            "--input-ext",
            ".aiff",
            "--format",
            "OGG",
            "--bitrate",
            "320k",
            "--sample-rate",
            "44100",
            "--channels",
            "2",
            "-j",
            "3",
            "--keep-originals",
            "--codec",
            "ffmpeg",
            "--report",
            "out.json",
            "-v",
        ])
        .unwrap();

        let c = &app.convert;
        assert_eq!(
            c.input_extensions.iter().cloned().collect::<Vec<_>>(),
            vec![".aiff".to_string(), ".flac".to_string(), ".wav".to_string()]
        );
        assert_eq!(c.output_format, "ogg");
        assert_eq!(c.bitrate, "320k");
        assert_eq!(c.sample_rate, Some(44100));
        assert_eq!(c.channels, Some(2));
        assert_eq!(c.worker_count, Some(3));
        assert!(!c.delete_originals);
        assert_eq!(c.codec, CodecKind::Ffmpeg);
        assert_eq!(app.report_path, Some(PathBuf::from("out.json")));
        assert!(app.verbose);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_from(["bac", "/music", "--workers", "0"]).is_err());
        assert!(parse_from(["bac", "/music", "--channels", "zero"]).is_err());
        assert!(parse_from(["bac", "/music", "--codec", "sox"]).is_err());
        assert!(parse_from(["bac"]).is_err());
    }
}
