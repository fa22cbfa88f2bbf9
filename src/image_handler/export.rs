//! # 导出编码模块
//!
//! ## 设计思路
//!
//! 所有工具最终都把位图编码成 PNG / JPEG / WEBP / SVG 之一，再以 Data URL 预览或写入下载目录。
//! 编码细节集中在这里，工具模块只关心“要什么格式、什么质量”。
//!
//! ## 实现思路
//!
//! - PNG：无损。
//! - JPEG：质量 1~100（0 视为 1）；透明像素按预乘 alpha 压到黑底，与画布导出 JPEG 的表现一致。
//! - WEBP：`image` 仅提供无损编码器，质量参数被忽略。
//! - SVG：将 PNG 以 Data URL 形式嵌入同尺寸 `<svg>`。

use base64::{Engine as _, engine::general_purpose};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::ImageError;
use super::source::Bitmap;

/// 导出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Webp,
    Svg,
}

impl ExportFormat {
    /// 按扩展名解析（大小写不敏感，`jpg` 与 `jpeg` 等价）。
    pub fn from_extension(ext: &str) -> Result<Self, ImageError> {
        match ext.trim().trim_start_matches('.').to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "svg" => Ok(Self::Svg),
            other => Err(ImageError::InvalidParameter(format!(
                "未知导出格式：{}（可选：png / jpeg / webp / svg）",
                other
            ))),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Svg => "image/svg+xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Svg => "svg",
        }
    }
}

/// 编码后的图片。
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// 转为前端预览载荷。
    pub fn preview(&self) -> ImagePreview {
        ImagePreview {
            data_url: self.to_data_url(),
            width: self.width,
            height: self.height,
            size_bytes: self.bytes.len() as u64,
            size_label: format_file_size(self.bytes.len() as u64),
        }
    }
}

/// 前端预览载荷：Data URL + 尺寸 + 体积。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePreview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub size_label: String,
}

/// 三种栅格格式的预计下载体积。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileSizes {
    pub png: String,
    pub jpeg: String,
    pub webp: String,
}

/// 将位图编码为指定格式。
pub fn encode(bitmap: &Bitmap, format: ExportFormat, quality: u8) -> Result<EncodedImage, ImageError> {
    let (width, height) = bitmap.dimensions();
    let bytes = match format {
        ExportFormat::Png => encode_png(bitmap)?,
        ExportFormat::Jpeg => encode_jpeg(bitmap, quality)?,
        ExportFormat::Webp => encode_webp(bitmap)?,
        ExportFormat::Svg => embed_png_in_svg(bitmap)?.into_bytes(),
    };

    Ok(EncodedImage {
        format,
        width,
        height,
        bytes,
    })
}

fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            bitmap.as_raw(),
            bitmap.width(),
            bitmap.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ImageError::Encode(format!("PNG 编码失败：{}", e)))?;
    Ok(buf)
}

fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, ImageError> {
    let rgb = flatten_onto_black(bitmap);
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .write_image(&rgb, bitmap.width(), bitmap.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ImageError::Encode(format!("JPEG 编码失败：{}", e)))?;
    Ok(buf)
}

fn encode_webp(bitmap: &Bitmap) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    WebPEncoder::new_lossless(&mut buf)
        .write_image(
            bitmap.as_raw(),
            bitmap.width(),
            bitmap.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ImageError::Encode(format!("WEBP 编码失败：{}", e)))?;
    Ok(buf)
}

fn embed_png_in_svg(bitmap: &Bitmap) -> Result<String, ImageError> {
    let png = encode_png(bitmap)?;
    let (w, h) = bitmap.dimensions();
    Ok(format!(
        "<?xml version='1.0' encoding='UTF-8'?>\n<svg width='{w}' height='{h}' viewBox='0 0 {w} {h}' xmlns='http://www.w3.org/2000/svg'><image width='{w}' height='{h}' href='data:image/png;base64,{}'/></svg>",
        general_purpose::STANDARD.encode(png)
    ))
}

/// RGBA → RGB，颜色按 alpha 预乘（等价于合成到黑底）。
fn flatten_onto_black(bitmap: &Bitmap) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bitmap.as_raw().len() / 4 * 3);
    for pixel in bitmap.pixels() {
        let [r, g, b, a] = pixel.0;
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        rgb.extend_from_slice(&[scale(r), scale(g), scale(b)]);
    }
    rgb
}

/// JPEG 往返一次，用于让“原图”预览体现质量设置。
pub fn jpeg_round_trip(bitmap: &Bitmap, quality: u8) -> Result<Bitmap, ImageError> {
    let jpeg = encode_jpeg(bitmap, quality)?;
    let decoded = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg)
        .map_err(|e| ImageError::Decode(format!("JPEG 回读失败：{}", e)))?;
    Ok(decoded.to_rgba8())
}

/// 计算三种栅格格式的体积（`x.xx KB`）。
pub fn file_sizes(bitmap: &Bitmap, quality: u8) -> Result<FileSizes, ImageError> {
    Ok(FileSizes {
        png: format_kilobytes(encode_png(bitmap)?.len() as u64),
        jpeg: format_kilobytes(encode_jpeg(bitmap, quality)?.len() as u64),
        webp: format_kilobytes(encode_webp(bitmap)?.len() as u64),
    })
}

pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// `N B` / `x.xx KB` / `x.xx MB`。
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// 转换器下载文件名：原图 `{stem}.{ext}`，效果图 `{stem}.{ext}.blur.{ext}`。
pub fn converter_file_name(stem: &str, format: ExportFormat, with_effect: bool) -> String {
    let ext = format.extension();
    if with_effect {
        format!("{stem}.{ext}.blur.{ext}")
    } else {
        format!("{stem}.{ext}")
    }
}
