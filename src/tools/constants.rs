//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 默认配置值
pub mod defaults {
    /// 默认输入扩展名
    pub const INPUT_EXTENSIONS: &[&str] = &[".wav", ".flac", ".ogg", ".m4a", ".aac", ".mp4", ".wma"];

    /// 默认输出格式
    pub const OUTPUT_FORMAT: &str = "mp3";

    /// 默认码率（仅有损格式生效）
    pub const BITRATE: &str = "192k";

    /// 默认删除源文件
    pub const DELETE_ORIGINALS: bool = true;
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    ///
    /// 任何并行处理至少需要1个worker
    pub const MIN_PARALLEL_DEGREE: usize = 1;
}
