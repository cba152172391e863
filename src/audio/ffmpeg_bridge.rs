//! FFmpeg桥接编解码器
//!
//! 为原生路径无法编码的格式（MP3、AAC、OGG等）调用外部ffmpeg进程。
//! 解码、重采样、重混、编码全部由ffmpeg一次完成。

use super::codec::AudioCodec;
use super::format::normalize_format;
use crate::error::{ConvertError, ConvertResult};
use crate::processing::job::ConversionJob;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// FFmpeg安装指南（跨平台）
pub const FFMPEG_INSTALL_GUIDE: &str = r#"
FFmpeg is required for MP3/AAC/OGG/M4A output / 需要安装FFmpeg以输出MP3/AAC/OGG/M4A

Installation / 安装方法:
  macOS:   brew install ffmpeg
  Windows: https://www.gyan.dev/ffmpeg/builds/
           或使用: winget install Gyan.FFmpeg
  Linux:
    - Ubuntu/Debian: sudo apt install ffmpeg
    - Fedora/RHEL:   sudo dnf install ffmpeg
    - Arch:          sudo pacman -S ffmpeg

Official site / 官方网站: https://ffmpeg.org/download.html
"#;

/// ffmpeg可写出的常用音频格式
const FFMPEG_OUTPUT_FORMATS: &[&str] = &[
    "mp3", "ogg", "opus", "m4a", "aac", "flac", "wav", "wma", "aiff", "ac3",
];

/// stderr保留的最大字符数
const STDERR_TAIL_CHARS: usize = 2000;

/// 外部ffmpeg编解码器
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    /// 显式指定的ffmpeg路径（None则自动查找）
    ffmpeg_path: Option<PathBuf>,
}

impl Default for FfmpegCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCodec {
    /// 使用自动查找的ffmpeg
    pub fn new() -> Self {
        Self { ffmpeg_path: None }
    }

    /// 使用指定路径的ffmpeg
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: Some(path.into()),
        }
    }

    /// 检测FFmpeg是否可用
    pub fn is_available() -> bool {
        Self::find_ffmpeg_path().is_some()
    }

    /// 查找FFmpeg可执行文件路径（跨平台）
    fn find_ffmpeg_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let candidates = vec![
                PathBuf::from("ffmpeg.exe"),
                PathBuf::from(r"C:\Program Files\ffmpeg\bin\ffmpeg.exe"),
                PathBuf::from(r"C:\ffmpeg\bin\ffmpeg.exe"),
                // 便携部署：与可执行文件同目录
                std::env::current_exe().ok()?.parent()?.join("ffmpeg.exe"),
            ];

            candidates.into_iter().find(|p| Self::probe_binary(p))
        }

        #[cfg(not(target_os = "windows"))]
        {
            let path = PathBuf::from("ffmpeg");
            Self::probe_binary(&path).then_some(path)
        }
    }

    fn probe_binary(path: &Path) -> bool {
        Command::new(path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn resolve_path(&self) -> ConvertResult<PathBuf> {
        match &self.ffmpeg_path {
            Some(path) => Ok(path.clone()),
            None => Self::find_ffmpeg_path().ok_or_else(|| ConvertError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            }),
        }
    }

    /// 构建ffmpeg命令参数
    pub fn build_args(job: &ConversionJob) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(), // 覆盖已有目标
            "-v".to_string(),
            "error".to_string(),
            "-i".to_string(),
            job.source_path.to_string_lossy().to_string(),
            "-vn".to_string(), // 丢弃封面/视频流
        ];

        if let Some(rate) = job.sample_rate {
            args.extend(["-ar".to_string(), rate.to_string()]);
        }

        if let Some(channels) = job.channels {
            args.extend(["-ac".to_string(), channels.to_string()]);
        }

        if let Some(bitrate) = job.effective_bitrate() {
            args.extend(["-b:a".to_string(), bitrate.to_string()]);
        }

        args.push(job.dest_path.to_string_lossy().to_string());
        args
    }

    /// 截取stderr末尾，避免日志过长
    fn stderr_tail(stderr: &[u8]) -> String {
        let text = String::from_utf8_lossy(stderr);
        let text = text.trim();
        let count = text.chars().count();
        if count <= STDERR_TAIL_CHARS {
            text.to_string()
        } else {
            text.chars().skip(count - STDERR_TAIL_CHARS).collect()
        }
    }
}

impl AudioCodec for FfmpegCodec {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn supports_output(&self, format: &str) -> bool {
        let format = normalize_format(format);
        FFMPEG_OUTPUT_FORMATS.contains(&format.as_str())
    }

    fn convert(&self, job: &ConversionJob) -> ConvertResult<()> {
        let ffmpeg_path = self.resolve_path()?;
        let args = Self::build_args(job);
        log::debug!("ffmpeg命令 / command: {} {}", ffmpeg_path.display(), args.join(" "));

        let output = Command::new(&ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    log::error!("{FFMPEG_INSTALL_GUIDE}");
                    ConvertError::FfmpegNotFound {
                        path: ffmpeg_path.clone(),
                    }
                } else {
                    ConvertError::conversion_failed(
                        format!("无法启动FFmpeg / failed to spawn FFmpeg: {e}"),
                        None,
                    )
                }
            })?;

        if !output.status.success() {
            let stderr = Self::stderr_tail(&output.stderr);
            let reason = if stderr.is_empty() {
                format!("FFmpeg退出 / FFmpeg exited with {}", output.status)
            } else {
                format!("FFmpeg退出 / FFmpeg exited with {}: {stderr}", output.status)
            };
            return Err(ConvertError::conversion_failed(reason, Some(stderr)));
        }

        Ok(())
    }
}
