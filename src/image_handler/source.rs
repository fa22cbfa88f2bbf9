//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示前端传来的来源（上传内容或本地路径）
//! - `RawImageData` 表示已加载、已识别类型但未解码的字节
//! - `Bitmap` 表示解码后的 RGBA 位图
//!
//! 下载文件名只取决于来源声明的文件名与识别出的 MIME，和解码结果无关，
//! 因此解码缓存可以在同一内容、不同文件名之间共享。

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// 解码后的位图：宽、高与 `width * height * 4` 字节的 RGBA 缓冲。
pub type Bitmap = image::RgbaImage;

/// 没有文件名时使用的主干。
pub const FALLBACK_STEM: &str = "imagem";

/// 图片输入来源。
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImageSource {
    /// 前端读取的文件内容（Data URL 或纯 Base64），附带原始文件名。
    Upload {
        data: String,
        #[serde(default)]
        name: Option<String>,
    },
    /// 本地文件路径（文件选择框或拖放）。
    FilePath { path: String },
}

impl ImageSource {
    pub fn upload(data: impl Into<String>, name: Option<&str>) -> Self {
        Self::Upload {
            data: data.into(),
            name: name.map(str::to_string),
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::FilePath { path: path.into() }
    }

    /// 缓存键：文件按路径 + 大小 + 修改时间，上传内容按内容哈希。
    ///
    /// 读取 metadata 失败时返回 `None`，调用方应跳过缓存。
    pub(crate) fn fingerprint(&self) -> Option<String> {
        match self {
            Self::Upload { data, .. } => {
                let mut hasher = DefaultHasher::new();
                data.hash(&mut hasher);
                Some(format!("upload:{:016x}:{}", hasher.finish(), data.len()))
            }
            Self::FilePath { path } => {
                let metadata = std::fs::metadata(path).ok()?;
                let modified = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                    .map(|d| d.as_nanos())
                    .unwrap_or(0);
                Some(format!("file:{}:{}:{}", path, metadata.len(), modified))
            }
        }
    }

    /// 来源自带的文件名（上传时的名字或路径最后一段）。
    pub fn declared_name(&self) -> Option<&str> {
        let name = match self {
            Self::Upload { name, .. } => name.as_deref()?,
            Self::FilePath { path } => Path::new(path).file_name()?.to_str()?,
        };
        let name = name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// 下载文件名的主干与扩展名。
    ///
    /// 优先使用声明的文件名；缺失部分由识别出的 MIME 补齐。
    pub fn name_parts(&self, mime: &str) -> (String, String) {
        let declared = self.declared_name().map(Path::new);
        let stem = declared
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_STEM.to_string());
        let extension = declared
            .and_then(|p| p.extension())
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| mime_extension(mime).to_string());
        (stem, extension)
    }
}

/// `image/png` → `png`，`image/svg+xml` → `svg`。
pub fn mime_extension(mime: &str) -> &str {
    match mime.strip_prefix("image/").unwrap_or(mime) {
        "svg+xml" => "svg",
        "x-icon" | "vnd.microsoft.icon" => "ico",
        other => other,
    }
}

/// 加载阶段输出：原始字节与识别出的类型。
pub(crate) struct RawImageData {
    pub(crate) bytes: Vec<u8>,
    /// 按文件签名识别的 MIME。
    pub(crate) mime: &'static str,
    /// 来源提示（用于日志）。
    pub(crate) origin: &'static str,
}
