//! 工具函数模块
//!
//! 文件路径处理等通用工具函数。

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 相对根目录的显示路径（不在根目录下时返回完整路径）
    pub fn display_relative(path: &Path, root: &Path) -> String {
        path.strip_prefix(root)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }
}

pub use path::{display_relative, extract_filename_lossy};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename_lossy(Path::new("/a/b/song.wav")), "song.wav");
        assert_eq!(extract_filename_lossy(Path::new("/")), "");
    }

    #[test]
    fn test_display_relative() {
        assert_eq!(
            display_relative(Path::new("/music/a/b.wav"), Path::new("/music")),
            Path::new("a/b.wav").display().to_string()
        );
        assert_eq!(
            display_relative(Path::new("/other/b.wav"), Path::new("/music")),
            "/other/b.wav"
        );
    }
}
