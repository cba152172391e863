//! 转换任务构建
//!
//! 把扫描得到的源文件映射为不可变的 [`ConversionJob`]。纯函数，无I/O。

use crate::audio::format::{is_lossy_format, normalize_format};
use crate::error::ConvertError;
use crate::processing::outcome::ConversionOutcome;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// 单个转换任务（创建后不可变，仅被一个worker消费一次）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// 源文件路径
    pub source_path: PathBuf,

    /// 目标文件路径（由源路径确定性推导）
    pub dest_path: PathBuf,

    /// 输出格式（小写，无前导点）
    pub output_format: String,

    /// 码率字符串（如 "192k"），仅对有损格式生效
    pub bitrate: String,

    /// 目标采样率（Hz）
    pub sample_rate: Option<u32>,

    /// 目标声道数
    pub channels: Option<u16>,
}

impl ConversionJob {
    /// 编码器实际应使用的码率（无损格式返回None）
    pub fn effective_bitrate(&self) -> Option<&str> {
        if is_lossy_format(&self.output_format) && !self.bitrate.is_empty() {
            Some(&self.bitrate)
        } else {
            None
        }
    }
}

/// 编码参数（所有任务共享）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub output_format: String,
    pub bitrate: String,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

impl EncodeSettings {
    pub fn new(output_format: &str, bitrate: &str) -> Self {
        Self {
            output_format: normalize_format(output_format),
            bitrate: bitrate.to_string(),
            sample_rate: None,
            channels: None,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: Option<u32>) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, channels: Option<u16>) -> Self {
        self.channels = channels;
        self
    }
}

/// 目标目录策略
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputDirPolicy {
    /// 与源文件同目录（默认）
    #[default]
    SameAsSource,

    /// 在 `output_root` 下镜像 `source_root` 的相对目录结构
    Mirror {
        source_root: PathBuf,
        output_root: PathBuf,
    },
}

/// 推导目标路径：替换扩展名，目录由策略决定
pub fn derive_dest_path(source: &Path, output_format: &str, policy: &OutputDirPolicy) -> PathBuf {
    let format = normalize_format(output_format);
    match policy {
        OutputDirPolicy::SameAsSource => source.with_extension(&format),
        OutputDirPolicy::Mirror {
            source_root,
            output_root,
        } => {
            let relative = source
                .strip_prefix(source_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(source.file_name().unwrap_or_default()));
            output_root.join(relative).with_extension(&format)
        }
    }
}

/// 构建单个任务
pub fn build_job(source: &Path, settings: &EncodeSettings, policy: &OutputDirPolicy) -> ConversionJob {
    ConversionJob {
        source_path: source.to_path_buf(),
        dest_path: derive_dest_path(source, &settings.output_format, policy),
        output_format: settings.output_format.clone(),
        bitrate: settings.bitrate.clone(),
        sample_rate: settings.sample_rate,
        channels: settings.channels,
    }
}

/// 任务规划结果
#[derive(Debug, Default)]
pub struct JobPlan {
    /// 待分发的任务
    pub jobs: Vec<ConversionJob>,

    /// 被拒绝的源文件（目标冲突或原地覆盖），直接记为失败
    pub rejected: Vec<ConversionOutcome>,
}

/// 路径比较键（大小写折叠）
///
/// macOS/Windows 默认文件系统大小写不敏感，`a.WAV` 与 `a.wav` 视为同一文件。
fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// 批量构建任务并检测目标路径冲突
///
/// 源文件先排序；同一目标路径上先到者胜出，其余被拒绝。
/// 目标与自身或其他源文件相同的任务同样被拒绝，源文件永远不会被当作输出覆盖。
pub fn plan_jobs(sources: &[PathBuf], settings: &EncodeSettings, policy: &OutputDirPolicy) -> JobPlan {
    let mut sorted: Vec<&PathBuf> = sources.iter().collect();
    sorted.sort();
    sorted.dedup();

    let mut plan = JobPlan::default();
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let source_set: HashSet<String> = sorted.iter().map(|p| path_key(p)).collect();

    for source in sorted {
        let job = build_job(source, settings, policy);

        let dest_key = path_key(&job.dest_path);

        if dest_key == path_key(&job.source_path) {
            let message = format!(
                "源文件已是目标格式，跳过以避免原地覆盖 / source already in output format: {}",
                job.source_path.display()
            );
            log::warn!("{message}");
            plan.rejected
                .push(ConversionOutcome::failure(job.source_path, message));
            continue;
        }

        if source_set.contains(&dest_key) {
            let err = ConvertError::DestinationCollision {
                dest: job.dest_path.clone(),
                winner: job.dest_path.clone(),
            };
            let message = format!("{err} (目标是另一个源文件 / destination is another source file)");
            log::warn!("{}: {message}", job.source_path.display());
            plan.rejected
                .push(ConversionOutcome::failure(job.source_path, message));
            continue;
        }

        if let Some(winner) = claimed.get(&dest_key) {
            let err = ConvertError::DestinationCollision {
                dest: job.dest_path.clone(),
                winner: winner.clone(),
            };
            let message = format!("{err} (已由 / already claimed by {})", winner.display());
            log::warn!("{}: {message}", job.source_path.display());
            plan.rejected
                .push(ConversionOutcome::failure(job.source_path, message));
            continue;
        }

        claimed.insert(dest_key, job.source_path.clone());
        plan.jobs.push(job);
    }

    plan
}
