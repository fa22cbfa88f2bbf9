//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责流程编排，不直接与 Tauri 绑定。
//! 每个工具的处理链路都是：
//! 1. 按来源加载并解码（命中缓存则跳过）
//! 2. 执行变换（效果 / 缩放 / 裁剪）
//! 3. 编码为预览或下载文件
//!
//! ## 实现思路
//!
//! - 配置在创建时确定，之后只读。
//! - 下载文件名由来源声明的文件名与识别出的 MIME 决定。
//! - 解码结果按来源指纹放入 LRU，拖动滑块时不重复解码同一文件。
//! - 记录 `load/decode/effect/encode/total` 阶段耗时，便于性能诊断。
//! - 所有方法都是同步 CPU 任务，由 `service` 放到阻塞线程执行。

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use lru::LruCache;

use super::crop::{self, CropRect};
use super::effects::Effect;
use super::export::{self, EncodedImage, ExportFormat, FileSizes, ImagePreview};
use super::pipeline::{self, DecodedImage};
use super::resize::{self, ResizeControls, ResizeDimensions};
use super::source::Bitmap;
use super::{ImageConfig, ImageError, ImageSource, config, loader};

/// 缩放工具下载文件名主干。
pub const RESIZED_FILE_STEM: &str = "imagem-redimensionada";

/// 载入图片后返回给前端的基础信息。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub file_stem: String,
    pub extension: String,
    /// 缩放控件的初始状态。
    pub resize: ResizeControls,
}

/// 转换器请求：来源 + 效果 + 强度 + 质量。
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub source: ImageSource,
    pub effect: Effect,
    #[serde(default = "default_effect_level")]
    pub level: u32,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_effect_level() -> u32 {
    config::DEFAULT_EFFECT_LEVEL
}

fn default_quality() -> u8 {
    config::DEFAULT_QUALITY
}

/// 转换器输出：原图与效果图的预览及各格式体积。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOutput {
    pub original: ImagePreview,
    pub processed: ImagePreview,
    pub original_sizes: FileSizes,
    pub processed_sizes: FileSizes,
}

/// 缩放输出：PNG 预览 + 体积表。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOutput {
    pub preview: ImagePreview,
    pub sizes: FileSizes,
}

/// 裁剪输出：PNG 预览 + 实际生效的裁剪框。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropOutput {
    pub preview: ImagePreview,
    pub rect: CropRect,
}

/// 带下载文件名的编码结果。
#[derive(Debug, Clone)]
pub struct NamedImage {
    pub file_name: String,
    pub image: EncodedImage,
}

/// 图片处理器。
///
/// 封装了配置与解码缓存，并编排各子模块实现完整流程。
pub struct ImageHandler {
    config: ImageConfig,
    decode_cache: Mutex<Option<LruCache<String, Arc<DecodedImage>>>>,
}

impl ImageHandler {
    /// 根据初始配置创建处理器。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use dev_tools::image_handler::{ImageConfig, ImageHandler};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default())?;
    /// # Ok::<(), dev_tools::image_handler::ImageError>(())
    /// ```
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        let cache = NonZeroUsize::new(config.decode_cache_capacity).map(LruCache::new);
        Ok(Self {
            config,
            decode_cache: Mutex::new(cache),
        })
    }

    fn cache_get(&self, key: &str) -> Option<Arc<DecodedImage>> {
        let mut guard = self.decode_cache.lock().ok()?;
        guard.as_mut()?.get(key).cloned()
    }

    fn cache_put(&self, key: String, decoded: Arc<DecodedImage>) {
        if let Ok(mut guard) = self.decode_cache.lock() {
            if let Some(cache) = guard.as_mut() {
                cache.put(key, decoded);
            }
        }
    }

    /// 按来源加载并解码，命中缓存时直接复用。
    pub(crate) fn load_decoded(&self, source: &ImageSource) -> Result<Arc<DecodedImage>, ImageError> {
        let key = source.fingerprint();
        if let Some(hit) = key.as_deref().and_then(|k| self.cache_get(k)) {
            log::debug!("♻️ 解码缓存命中");
            return Ok(hit);
        }

        let load_start = Instant::now();
        let raw = loader::load_source(source, &self.config)?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let decoded = Arc::new(pipeline::decode(raw, &self.config)?);
        let decode_elapsed = decode_start.elapsed();

        log::info!(
            "✅ 图片载入完成 - load={}ms decode={}ms",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis()
        );

        if let Some(key) = key {
            self.cache_put(key, Arc::clone(&decoded));
        }
        Ok(decoded)
    }

    /// 读取图片基础信息，用于初始化缩放与裁剪控件。
    pub fn inspect(&self, source: &ImageSource) -> Result<ImageInfo, ImageError> {
        let decoded = self.load_decoded(source)?;
        let (width, height) = decoded.bitmap.dimensions();
        let (file_stem, extension) = source.name_parts(decoded.mime);
        Ok(ImageInfo {
            width,
            height,
            format: decoded.format_name().to_string(),
            file_stem,
            extension,
            resize: ResizeDimensions::for_original(width, height).into(),
        })
    }

    /// 转换器“原图”：PNG/WEBP 原样使用，其余格式先按质量做一次 JPEG 往返。
    fn original_bitmap(decoded: &DecodedImage, quality: u8) -> Result<Bitmap, ImageError> {
        if decoded.is_lossless_source() {
            Ok(decoded.bitmap.clone())
        } else {
            export::jpeg_round_trip(&decoded.bitmap, quality)
        }
    }

    fn effect_bitmap(decoded: &DecodedImage, effect: Effect, level: u32) -> Bitmap {
        let start = Instant::now();
        let out = effect.apply(&decoded.bitmap, level);
        log::info!(
            "🎨 效果 {} level={} 完成 - effect={}ms",
            effect.as_str(),
            level,
            start.elapsed().as_millis()
        );
        out
    }

    /// 转换器主入口：生成原图与效果图预览。
    pub fn convert(&self, request: &ConvertRequest) -> Result<ConvertOutput, ImageError> {
        let level = config::validate_effect_level(request.level)?;
        let quality = config::validate_quality(request.quality)?;
        let total_start = Instant::now();

        let decoded = self.load_decoded(&request.source)?;
        let original = Self::original_bitmap(&decoded, quality)?;
        let processed = Self::effect_bitmap(&decoded, request.effect, level);

        let encode_start = Instant::now();
        let output = ConvertOutput {
            original: export::encode(&original, ExportFormat::Png, quality)?.preview(),
            processed: export::encode(&processed, ExportFormat::Png, quality)?.preview(),
            original_sizes: export::file_sizes(&original, quality)?,
            processed_sizes: export::file_sizes(&processed, quality)?,
        };

        log::info!(
            "✅ 转换完成 - encode={}ms total={}ms",
            encode_start.elapsed().as_millis(),
            total_start.elapsed().as_millis()
        );
        Ok(output)
    }

    /// 转换器下载：原图或效果图，按目标格式编码。
    pub fn export_converted(
        &self,
        request: &ConvertRequest,
        format: ExportFormat,
        with_effect: bool,
    ) -> Result<NamedImage, ImageError> {
        let level = config::validate_effect_level(request.level)?;
        let quality = config::validate_quality(request.quality)?;

        let decoded = self.load_decoded(&request.source)?;
        let bitmap = if with_effect {
            Self::effect_bitmap(&decoded, request.effect, level)
        } else {
            Self::original_bitmap(&decoded, quality)?
        };

        let (stem, _) = request.source.name_parts(decoded.mime);
        Ok(NamedImage {
            file_name: export::converter_file_name(&stem, format, with_effect),
            image: export::encode(&bitmap, format, quality)?,
        })
    }

    fn resized_bitmap(&self, source: &ImageSource, width: u32, height: u32) -> Result<Bitmap, ImageError> {
        let decoded = self.load_decoded(source)?;

        let mut dims = ResizeDimensions::for_original(decoded.bitmap.width(), decoded.bitmap.height());
        dims.keep_aspect_ratio = false;
        dims.set_width(width, false);
        dims.set_height(height);

        let start = Instant::now();
        let out = resize::resize_bitmap(&decoded.bitmap, dims.width, dims.height)?;
        log::info!(
            "📐 缩放 {}x{} -> {}x{} - resize={}ms",
            dims.original_width,
            dims.original_height,
            dims.width,
            dims.height,
            start.elapsed().as_millis()
        );
        Ok(out)
    }

    /// 缩放工具：目标尺寸按原图 2 倍封顶。
    pub fn resize(&self, source: &ImageSource, width: u32, height: u32) -> Result<ResizeOutput, ImageError> {
        let resized = self.resized_bitmap(source, width, height)?;
        Ok(ResizeOutput {
            preview: export::encode(&resized, ExportFormat::Png, config::RESIZE_ESTIMATE_QUALITY)?.preview(),
            sizes: export::file_sizes(&resized, config::RESIZE_ESTIMATE_QUALITY)?,
        })
    }

    pub fn export_resized(
        &self,
        source: &ImageSource,
        width: u32,
        height: u32,
        format: ExportFormat,
    ) -> Result<NamedImage, ImageError> {
        let resized = self.resized_bitmap(source, width, height)?;
        let image = export::encode(&resized, format, config::RESIZE_ESTIMATE_QUALITY)?;
        Ok(NamedImage {
            file_name: format!("{}.{}", RESIZED_FILE_STEM, format.extension()),
            image,
        })
    }

    fn cropped_bitmap(&self, source: &ImageSource, rect: CropRect) -> Result<(Bitmap, CropRect), ImageError> {
        let decoded = self.load_decoded(source)?;
        crop::crop_bitmap(&decoded.bitmap, rect)
    }

    /// 裁剪工具：输出 PNG。
    pub fn crop(&self, source: &ImageSource, rect: CropRect) -> Result<CropOutput, ImageError> {
        let (cropped, rect) = self.cropped_bitmap(source, rect)?;
        Ok(CropOutput {
            preview: export::encode(&cropped, ExportFormat::Png, 100)?.preview(),
            rect,
        })
    }

    pub fn export_cropped(&self, source: &ImageSource, rect: CropRect) -> Result<NamedImage, ImageError> {
        let (cropped, _) = self.cropped_bitmap(source, rect)?;
        Ok(NamedImage {
            file_name: crop::CROPPED_FILE_NAME.to_string(),
            image: export::encode(&cropped, ExportFormat::Png, 100)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose};
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn create_image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        });

        let dyn_img = DynamicImage::ImageRgba8(img);
        let dyn_img = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(dyn_img.to_rgb8())
        } else {
            dyn_img
        };
        let mut cursor = Cursor::new(Vec::new());
        dyn_img
            .write_to(&mut cursor, format)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn data_url(width: u32, height: u32) -> ImageSource {
        let png = create_image_bytes(width, height, ImageFormat::Png);
        ImageSource::upload(
            format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png)),
            None,
        )
    }

    fn request(source: ImageSource, effect: Effect) -> ConvertRequest {
        ConvertRequest {
            source,
            effect,
            level: 4,
            quality: 90,
        }
    }

    #[test]
    fn convert_returns_previews_of_source_size() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let output = handler
            .convert(&request(data_url(64, 48), Effect::PixelateGray))
            .expect("convert should succeed");

        assert_eq!((output.original.width, output.original.height), (64, 48));
        assert_eq!((output.processed.width, output.processed.height), (64, 48));
        assert!(output.processed.data_url.starts_with("data:image/png;base64,"));
        assert!(output.original_sizes.png.ends_with(" KB"));
    }

    #[test]
    fn convert_rejects_out_of_range_level() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let mut req = request(data_url(8, 8), Effect::Blur);
        req.level = 51;
        assert!(matches!(handler.convert(&req), Err(ImageError::InvalidParameter(_))));
    }

    #[test]
    fn jpeg_source_goes_through_quality_round_trip() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let jpeg = create_image_bytes(32, 32, ImageFormat::Jpeg);
        let source = ImageSource::upload(general_purpose::STANDARD.encode(jpeg), None);

        let info = handler.inspect(&source).expect("inspect");
        assert_eq!(info.format, "jpeg");
        assert_eq!((info.file_stem.as_str(), info.extension.as_str()), ("imagem", "jpeg"));

        let exported = handler
            .export_converted(&request(source, Effect::Blur), ExportFormat::Png, false)
            .expect("export");
        assert_eq!(exported.file_name, "imagem.png");
    }

    #[test]
    fn export_effect_uses_blur_suffix() {
        let dir = std::env::temp_dir().join(format!("dev-tools-handler-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("gato.png");
        std::fs::write(&path, create_image_bytes(16, 16, ImageFormat::Png)).expect("write temp png");

        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let source = ImageSource::file(path.to_string_lossy());
        let exported = handler
            .export_converted(&request(source, Effect::Pixelate), ExportFormat::Webp, true)
            .expect("export");

        assert_eq!(exported.file_name, "gato.webp.blur.webp");
        assert_eq!(exported.image.format, ExportFormat::Webp);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn decode_cache_reuses_same_source() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let source = data_url(10, 10);

        let first = handler.load_decoded(&source).expect("first load");
        let second = handler.load_decoded(&source).expect("second load");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let mut config = ImageConfig::default();
        config.decode_cache_capacity = 0;
        let handler = ImageHandler::new(config).expect("handler init failed");
        let source = data_url(10, 10);

        let first = handler.load_decoded(&source).expect("first load");
        let second = handler.load_decoded(&source).expect("second load");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn resize_caps_target_at_twice_original() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let output = handler.resize(&data_url(20, 10), 100, 15).expect("resize");
        assert_eq!((output.preview.width, output.preview.height), (40, 15));

        let named = handler
            .export_resized(&data_url(20, 10), 10, 5, ExportFormat::Jpeg)
            .expect("export resized");
        assert_eq!(named.file_name, "imagem-redimensionada.jpeg");
    }

    #[test]
    fn crop_clamps_and_names_output() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let source = data_url(120, 80);
        let output = handler
            .crop(&source, CropRect { x: 100, y: 70, width: 10, height: 10 })
            .expect("crop");

        assert_eq!(output.rect, CropRect { x: 70, y: 30, width: 50, height: 50 });
        assert_eq!((output.preview.width, output.preview.height), (50, 50));

        let named = handler.export_cropped(&source, CropRect::full(120, 80)).expect("export");
        assert_eq!(named.file_name, "imagem-cortada.png");
    }

    #[test]
    fn uploaded_file_name_flows_into_downloads() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let png = create_image_bytes(12, 12, ImageFormat::Png);
        let source = ImageSource::upload(general_purpose::STANDARD.encode(png), Some("foto.png"));

        let info = handler.inspect(&source).expect("inspect");
        assert_eq!((info.file_stem.as_str(), info.extension.as_str()), ("foto", "png"));

        let exported = handler
            .export_converted(&request(source, Effect::Blur), ExportFormat::Png, true)
            .expect("export");
        assert_eq!(exported.file_name, "foto.png.blur.png");
    }

    #[test]
    fn inspect_reports_initial_resize_controls() {
        let handler = ImageHandler::new(ImageConfig::default()).expect("handler init failed");
        let info = handler.inspect(&data_url(30, 20)).expect("inspect");

        assert_eq!((info.resize.dims.width, info.resize.dims.height), (30, 20));
        assert!(info.resize.dims.keep_aspect_ratio);
        assert_eq!((info.resize.max_width, info.resize.slider_min_width), (60, 15));
    }

    #[test]
    fn stress_rejects_too_many_pixels() {
        let config = ImageConfig {
            max_decoded_pixels: 1_000_000,
            ..ImageConfig::default()
        };
        let handler = ImageHandler::new(config).expect("handler init failed");

        let result = handler.inspect(&data_url(1200, 1000));
        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }
}
