//! # 加载模块
//!
//! ## 设计思路
//!
//! 把 `ImageSource` 变成“已识别类型的原始字节”。体积上限在读取之前就检查：
//! 上传内容按 Base64 长度推算解码后的最大字节数，本地文件按 metadata 长度判断。
//!
//! ## 实现思路
//!
//! - Data URL 拆成“声明的 MIME + Base64 正文”，纯 Base64 直接当正文。
//! - 图片类型以文件签名（`infer`）为准，声明的 MIME 只用于日志比对。
//! - 识别出的 MIME 随 `RawImageData` 向后传递，决定转换器“原图”的处理方式与默认扩展名。

use std::io::ErrorKind;

use base64::{Engine as _, engine::general_purpose};

use super::export::format_file_size;
use super::source::RawImageData;
use super::{ImageConfig, ImageError, ImageSource};

/// Data URL 拆分结果。
#[derive(Debug, PartialEq, Eq)]
struct Payload<'a> {
    declared_mime: Option<&'a str>,
    base64: &'a str,
}

fn split_data_url(input: &str) -> Result<Payload<'_>, ImageError> {
    let input = input.trim();
    let Some(rest) = input.strip_prefix("data:") else {
        return Ok(Payload {
            declared_mime: None,
            base64: input,
        });
    };

    let (meta, body) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidFormat("Data URL 缺少数据部分".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| ImageError::InvalidFormat("Data URL 不是 base64 编码".to_string()))?;

    Ok(Payload {
        declared_mime: (!mime.is_empty()).then_some(mime),
        base64: body,
    })
}

/// Base64 正文解码后最多可能的字节数。
fn max_decoded_len(encoded_len: usize) -> u64 {
    (encoded_len as u64).div_ceil(4).saturating_mul(3)
}

fn ensure_within_limit(size: u64, limit: u64, what: &str) -> Result<(), ImageError> {
    if size > limit {
        return Err(ImageError::ResourceLimit(format!(
            "{}过大：{}（上限 {}）",
            what,
            format_file_size(size),
            format_file_size(limit)
        )));
    }
    Ok(())
}

/// 按文件签名识别图片 MIME。
fn sniff_image_mime(bytes: &[u8]) -> Result<&'static str, ImageError> {
    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(kind.mime_type()),
        Some(kind) => Err(ImageError::InvalidFormat(format!(
            "不是图片文件（识别为 {}）",
            kind.mime_type()
        ))),
        None if bytes.is_empty() => Err(ImageError::InvalidFormat("图片内容为空".to_string())),
        None => Err(ImageError::InvalidFormat("无法识别的图片内容".to_string())),
    }
}

fn load_upload(data: &str, config: &ImageConfig) -> Result<RawImageData, ImageError> {
    let payload = split_data_url(data)?;
    ensure_within_limit(max_decoded_len(payload.base64.len()), config.max_file_size, "上传图片")?;

    let bytes = general_purpose::STANDARD
        .decode(payload.base64)
        .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))?;
    let mime = sniff_image_mime(&bytes)?;

    if let Some(declared) = payload.declared_mime {
        if !declared.eq_ignore_ascii_case(mime) {
            log::debug!("🔎 Data URL 声明为 {}，实际内容为 {}", declared, mime);
        }
    }

    Ok(RawImageData {
        bytes,
        mime,
        origin: "upload",
    })
}

fn load_file(path: &str, config: &ImageConfig) -> Result<RawImageData, ImageError> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ImageError::FileSystem(format!("文件不存在：{}", path)),
        _ => ImageError::FileSystem(format!("无法读取文件信息：{}", e)),
    })?;
    if !metadata.is_file() {
        return Err(ImageError::FileSystem(format!("不是文件：{}", path)));
    }
    ensure_within_limit(metadata.len(), config.max_file_size, "图片文件")?;

    let bytes = std::fs::read(path).map_err(|e| ImageError::FileSystem(format!("读取图片失败：{}", e)))?;
    let mime = sniff_image_mime(&bytes)?;

    Ok(RawImageData {
        bytes,
        mime,
        origin: "file",
    })
}

/// 读取来源的原始字节并识别类型。
pub(super) fn load_source(source: &ImageSource, config: &ImageConfig) -> Result<RawImageData, ImageError> {
    match source {
        ImageSource::Upload { data, name } => {
            log::info!("📝 读取上传图片 - {}", name.as_deref().unwrap_or("(未命名)"));
            load_upload(data, config)
        }
        ImageSource::FilePath { path } => {
            log::info!("📁 读取本地图片 - {}", path);
            load_file(path, config)
        }
    }
}
