//! # 缩放模块
//!
//! ## 设计思路
//!
//! 缩放工具分两层：
//! - `ResizeDimensions`：宽高输入的联动规则（上限为原图 2 倍、保持比例时按原图比例换算）
//! - `resize_bitmap`：真正的像素重采样，优先 `fast_image_resize`，失败回退 `image::imageops`
//!
//! ## 实现思路
//!
//! 使用双线性卷积；目标尺寸为 0 时直接拒绝。

use fast_image_resize as fr;
use image::imageops::{self, FilterType};

use super::ImageError;
use super::source::Bitmap;

/// 宽高输入状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeDimensions {
    pub original_width: u32,
    pub original_height: u32,
    pub width: u32,
    pub height: u32,
    pub keep_aspect_ratio: bool,
}

impl ResizeDimensions {
    /// 新载入图片：目标尺寸等于原图尺寸，默认保持比例。
    pub fn for_original(width: u32, height: u32) -> Self {
        Self {
            original_width: width,
            original_height: height,
            width,
            height,
            keep_aspect_ratio: true,
        }
    }

    pub fn max_width(&self) -> u32 {
        self.original_width.saturating_mul(2)
    }

    pub fn max_height(&self) -> u32 {
        self.original_height.saturating_mul(2)
    }

    /// 宽度滑块的下限（原图宽度的一半，四舍五入）。
    pub fn slider_min_width(&self) -> u32 {
        (self.original_width as f64 * 0.5).round() as u32
    }

    /// 设置宽度。`from_slider` 为真时额外应用滑块下限。
    pub fn set_width(&mut self, width: u32, from_slider: bool) {
        let mut width = width.min(self.max_width());
        if from_slider {
            width = width.max(self.slider_min_width());
        }
        self.width = width;

        if self.keep_aspect_ratio && self.original_width > 0 {
            let ratio = self.original_height as f64 / self.original_width as f64;
            self.height = (width as f64 * ratio).round() as u32;
        }
    }

    pub fn set_height(&mut self, height: u32) {
        let height = height.min(self.max_height());
        self.height = height;

        if self.keep_aspect_ratio && self.original_height > 0 {
            let ratio = self.original_width as f64 / self.original_height as f64;
            self.width = (height as f64 * ratio).round() as u32;
        }
    }

    /// 解析文本输入，非数字按 0 处理。
    pub fn parse_input(value: &str) -> u32 {
        value.trim().parse::<u32>().unwrap_or(0)
    }

    /// 处理一次控件输入：文本先解析，再按字段联动另一边。
    pub fn apply_input(&mut self, field: DimensionField, raw: &str) {
        let value = Self::parse_input(raw);
        match field {
            DimensionField::Width => self.set_width(value, false),
            DimensionField::WidthSlider => self.set_width(value, true),
            DimensionField::Height => self.set_height(value),
        }
    }
}

/// 触发联动的控件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionField {
    Width,
    WidthSlider,
    Height,
}

/// 前端控件状态：当前尺寸 + 输入框与滑块的取值范围。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeControls {
    #[serde(flatten)]
    pub dims: ResizeDimensions,
    pub slider_min_width: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl From<ResizeDimensions> for ResizeControls {
    fn from(dims: ResizeDimensions) -> Self {
        Self {
            dims,
            slider_min_width: dims.slider_min_width(),
            max_width: dims.max_width(),
            max_height: dims.max_height(),
        }
    }
}

/// 将位图重采样到目标尺寸。
pub fn resize_bitmap(bitmap: &Bitmap, width: u32, height: u32) -> Result<Bitmap, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidParameter(format!(
            "目标尺寸无效：{}x{}",
            width, height
        )));
    }
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(ImageError::InvalidParameter("源图片尺寸为空".to_string()));
    }
    if bitmap.dimensions() == (width, height) {
        return Ok(bitmap.clone());
    }

    match resize_with_fast_image_resize(bitmap, width, height) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 imageops::resize：{}", err);
            Ok(imageops::resize(bitmap, width, height, FilterType::Triangle))
        }
    }
}

fn resize_with_fast_image_resize(
    bitmap: &Bitmap,
    target_width: u32,
    target_height: u32,
) -> Result<Bitmap, ImageError> {
    let src_image = fr::images::Image::from_vec_u8(
        bitmap.width(),
        bitmap.height(),
        bitmap.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Bilinear));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    Bitmap::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}
