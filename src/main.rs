//! Batch Audio Converter - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成批量转换任务。

use anyhow::Context;
use batch_audio_converter::{
    audio::ffmpeg_bridge::FFMPEG_INSTALL_GUIDE,
    error::{ConvertError, ErrorCategory},
    tools::{self, AppConfig, ConsoleOptions},
};
use std::io::Write;
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 参数/配置错误
    pub const CONFIG_ERROR: i32 = 2;
    /// 根目录不可读
    pub const FILESYSTEM_ERROR: i32 = 3;
    /// 资源/并发错误
    pub const RESOURCE_ERROR: i32 = 5;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &ConvertError) -> &'static str {
    match ErrorCategory::from_convert_error(error) {
        ErrorCategory::Config => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check command-line arguments, use --help to see full usage"
        }
        ErrorCategory::Filesystem => {
            "检查根目录是否存在且可读 / Check that the root directory exists and is readable"
        }
        ErrorCategory::Resource => {
            "资源不可用，请降低并发度（--workers） / Resource unavailable, reduce parallelism (--workers)"
        }
        ErrorCategory::Conversion | ErrorCategory::Cleanup => {
            "请检查输入文件和参数设置 / Please check input files and parameter settings"
        }
    }
}

/// 错误处理和建议
fn handle_error(error: anyhow::Error) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error:#}");

    let exit_code = match error.downcast_ref::<ConvertError>() {
        Some(convert_error) => {
            eprintln!(
                "[INFO] 建议 / Suggestion: {}",
                get_error_suggestion(convert_error)
            );
            if matches!(convert_error, ConvertError::FfmpegNotFound { .. }) {
                eprintln!("{FFMPEG_INSTALL_GUIDE}");
            }
            match ErrorCategory::from_convert_error(convert_error) {
                ErrorCategory::Config => exit_codes::CONFIG_ERROR,
                ErrorCategory::Filesystem => exit_codes::FILESYSTEM_ERROR,
                ErrorCategory::Resource => exit_codes::RESOURCE_ERROR,
                ErrorCategory::Conversion | ErrorCategory::Cleanup => exit_codes::GENERAL_ERROR,
            }
        }
        None => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 初始化日志：`[LEVEL] message`，verbose时输出debug
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// 应用程序主逻辑（便于测试和复用）
fn run(config: &AppConfig) -> anyhow::Result<()> {
    // 1. 显示启动信息
    tools::show_startup_info(config);

    // 2. 执行批量转换（单个文件失败不会中止批次）
    let report = tools::run_batch(
        &config.convert,
        ConsoleOptions {
            progress: true,
            verbose: config.verbose,
        },
    )?;

    // 3. 汇总
    report.print_summary();

    // 4. 可选JSON报告
    if let Some(path) = &config.report_path {
        report
            .write_json(path)
            .with_context(|| format!("无法写入报告 / failed to write report {}", path.display()))?;
        println!("[INFO] 报告已保存 / Report saved: {}", path.display());
    }

    Ok(())
}

fn main() {
    // 1. 解析命令行参数
    let config = match tools::parse_args() {
        Ok(config) => config,
        Err(error) => handle_error(error.into()),
    };

    init_logging(config.verbose);

    if let Err(error) = run(&config) {
        handle_error(error);
    }
}
