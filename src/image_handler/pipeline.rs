//! # 解码模块
//!
//! ## 设计思路
//!
//! 先读图片头拿到宽高，确认像素数与 RGBA 内存占用都在上限内，再做完整解码。
//! 解码器本身也挂上 `image::Limits`，防止头信息与实际数据不一致时越界分配。
//!
//! ## 实现思路
//!
//! `ImageReader` → 猜测格式 → 设置 limits → `into_decoder` 读取宽高 → 预算检查
//! → `DynamicImage::from_decoder` → RGBA8。

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader};

use super::source::{Bitmap, RawImageData};
use super::{ImageConfig, ImageError};

/// 解码结果：位图与按签名识别的 MIME。
pub(crate) struct DecodedImage {
    pub(crate) bitmap: Bitmap,
    pub(crate) mime: &'static str,
}

impl DecodedImage {
    /// 格式短名，例如 `png`、`jpeg`。
    pub(crate) fn format_name(&self) -> &'static str {
        self.mime.strip_prefix("image/").unwrap_or(self.mime)
    }

    /// 转换器“原图”能否直接使用解码像素（无损或自带透明度的格式）。
    pub(crate) fn is_lossless_source(&self) -> bool {
        matches!(self.mime, "image/png" | "image/webp")
    }
}

fn decoder_limits(config: &ImageConfig) -> image::Limits {
    let mut limits = image::Limits::default();
    limits.max_alloc = Some(config.max_decoded_bytes);
    limits
}

fn map_image_error(error: image::ImageError) -> ImageError {
    match error {
        image::ImageError::Limits(e) => ImageError::ResourceLimit(format!("解码超出内存上限：{}", e)),
        image::ImageError::Unsupported(e) => ImageError::InvalidFormat(format!("不支持的图片格式：{}", e)),
        other => ImageError::Decode(format!("图片解码失败：{}", other)),
    }
}

/// 像素数与 RGBA 内存预算检查。
fn check_decode_budget(config: &ImageConfig, width: u32, height: u32) -> Result<(), ImageError> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels > config.max_decoded_pixels {
        return Err(ImageError::ResourceLimit(format!(
            "图片像素过多：{}x{}（上限 {} 像素）",
            width, height, config.max_decoded_pixels
        )));
    }

    let rgba_bytes = pixels.saturating_mul(4);
    if rgba_bytes > config.max_decoded_bytes {
        return Err(ImageError::ResourceLimit(format!(
            "图片解码需要 {} 字节内存（上限 {} 字节）",
            rgba_bytes, config.max_decoded_bytes
        )));
    }
    Ok(())
}

/// 将原始字节解码为 RGBA 位图。
pub(crate) fn decode(raw: RawImageData, config: &ImageConfig) -> Result<DecodedImage, ImageError> {
    let mut reader = ImageReader::new(Cursor::new(raw.bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片：{}", e)))?;
    if reader.format().is_none() {
        return Err(ImageError::InvalidFormat(format!("暂不支持解码 {}", raw.mime)));
    }
    reader.limits(decoder_limits(config));

    let decoder = reader.into_decoder().map_err(map_image_error)?;
    let (width, height) = decoder.dimensions();
    check_decode_budget(config, width, height)?;

    let bitmap = DynamicImage::from_decoder(decoder)
        .map_err(map_image_error)?
        .into_rgba8();

    log::info!(
        "✅ 解码完成 - 来源: {} 类型: {} 尺寸: {}x{}",
        raw.origin,
        raw.mime,
        width,
        height
    );

    Ok(DecodedImage {
        bitmap,
        mime: raw.mime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};

    fn png_raw(width: u32, height: u32) -> RawImageData {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        });
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");

        RawImageData {
            bytes: cursor.into_inner(),
            mime: "image/png",
            origin: "test",
        }
    }

    #[test]
    fn decode_keeps_dimensions_pixels_and_mime() {
        let decoded = decode(png_raw(31, 17), &ImageConfig::default()).expect("decode should succeed");

        assert_eq!(decoded.format_name(), "png");
        assert!(decoded.is_lossless_source());
        assert_eq!(decoded.bitmap.dimensions(), (31, 17));
        assert_eq!(decoded.bitmap.get_pixel(3, 5).0, [3, 5, 8, 255]);
    }

    #[test]
    fn pixel_budget_is_checked_from_header() {
        let config = ImageConfig {
            max_decoded_pixels: 100,
            ..ImageConfig::default()
        };
        assert!(matches!(decode(png_raw(20, 20), &config), Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn memory_budget_rejects_large_images() {
        let config = ImageConfig {
            max_decoded_bytes: 1024,
            ..ImageConfig::default()
        };
        assert!(matches!(decode(png_raw(64, 64), &config), Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn budget_allows_exact_limits() {
        let config = ImageConfig {
            max_decoded_pixels: 6,
            max_decoded_bytes: 24,
            ..ImageConfig::default()
        };
        assert!(check_decode_budget(&config, 3, 2).is_ok());
        assert!(check_decode_budget(&config, 7, 1).is_err());
    }
}
