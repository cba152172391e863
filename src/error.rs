//! 统一错误处理框架
//!
//! 批量转换只有一条致命路径（根目录不可读），其余错误都被隔离在单个任务内部，
//! 以 `ConversionOutcome::Failure` 的形式汇总。

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 转换流程相关的统一错误类型
#[derive(Debug, Error)]
pub enum ConvertError {
    /// 根目录不存在或不可读（致命，批次不会开始）
    #[error("文件系统错误 / Filesystem error: {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 配置或输入参数无效
    #[error("输入验证失败 / Invalid input: {0}")]
    InvalidInput(String),

    /// 源文件解码失败
    #[error("音频解码失败 / Decoding failed: {0}")]
    Decoding(String),

    /// 编码或写出目标文件失败
    #[error("音频编码失败 / Encoding failed: {0}")]
    Encoding(String),

    /// 当前编解码器不支持该输出格式
    #[error("不支持的输出格式 / Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    /// 找不到ffmpeg可执行文件
    #[error("找不到FFmpeg / FFmpeg not found: {}", path.display())]
    FfmpegNotFound { path: PathBuf },

    /// 外部编解码器进程返回失败
    #[error("转换失败 / Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// 转换成功后删除源文件失败
    #[error("清理源文件失败 / Cleanup failed: {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 多个源文件映射到同一目标路径
    #[error("目标路径冲突 / Destination collision: {}", dest.display())]
    DestinationCollision { dest: PathBuf, winner: PathBuf },

    /// 线程池等资源创建失败
    #[error("资源访问错误 / Resource error: {0}")]
    Resource(String),

    /// 其他I/O错误
    #[error("文件I/O错误 / I/O error: {0}")]
    Io(#[from] io::Error),
}

/// 转换操作的标准Result类型
pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// 创建外部进程失败错误（附带stderr）
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// 根目录相关的文件系统错误
    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

// ==================== 错误转换Helper函数 ====================

/// 创建解码错误的helper函数
#[inline]
pub fn decoding_error<E: fmt::Display>(context: &str, err: E) -> ConvertError {
    ConvertError::Decoding(format!("{context}: {err}"))
}

/// 创建编码错误的helper函数
#[inline]
pub fn encoding_error<E: fmt::Display>(context: &str, err: E) -> ConvertError {
    ConvertError::Encoding(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================

/// 错误类别枚举（用于批量统计和退出码）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// 根目录不可读
    Filesystem,
    /// 解码/重采样/混音/编码失败
    Conversion,
    /// 源文件删除失败
    Cleanup,
    /// 参数或配置错误
    Config,
    /// 线程池等资源错误
    Resource,
}

impl ErrorCategory {
    /// 从ConvertError提取错误类别
    pub fn from_convert_error(e: &ConvertError) -> Self {
        match e {
            ConvertError::Filesystem { .. } => Self::Filesystem,
            ConvertError::Decoding(_)
            | ConvertError::Encoding(_)
            | ConvertError::UnsupportedOutputFormat(_)
            | ConvertError::FfmpegNotFound { .. }
            | ConvertError::ConversionFailed { .. }
            | ConvertError::DestinationCollision { .. }
            | ConvertError::Io(_) => Self::Conversion,
            ConvertError::Cleanup { .. } => Self::Cleanup,
            ConvertError::InvalidInput(_) => Self::Config,
            ConvertError::Resource(_) => Self::Resource,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Filesystem => "文件系统错误 / Filesystem",
            Self::Conversion => "转换错误 / Conversion",
            Self::Cleanup => "清理错误 / Cleanup",
            Self::Config => "配置错误 / Config",
            Self::Resource => "资源错误 / Resource",
        }
    }
}
