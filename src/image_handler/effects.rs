//! # 像素效果模块
//!
//! ## 设计思路
//!
//! 四种效果都是纯函数：`(位图, 整数参数) -> 新位图`，不持有任何状态，
//! 输入位图保持只读，便于在滑块拖动时反复对同一张原图重新计算。
//!
//! - 马赛克：按边长为 `block` 的方块切分，取方块左上角像素颜色（含 alpha）整块填充，
//!   越界的边缘方块直接裁剪。
//! - 模糊：高斯模糊，标准差为 `level / 10`，与 CSS `blur()` 半径一致。
//! - 灰度：RGB 按 0.3 / 0.59 / 0.11 加权平均后写回三个通道，alpha 不变。

use image::Rgba;
use image::imageops;

use super::source::Bitmap;

/// 转换器支持的效果类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Effect {
    #[serde(rename = "pixel")]
    Pixelate,
    #[serde(rename = "blur")]
    Blur,
    #[serde(rename = "pixelGray")]
    PixelateGray,
    #[serde(rename = "blurGray")]
    BlurGray,
}

impl Effect {
    /// 对位图应用效果，返回新位图。
    pub fn apply(self, bitmap: &Bitmap, level: u32) -> Bitmap {
        match self {
            Self::Pixelate => pixelate(bitmap, level),
            Self::Blur => blur(bitmap, level),
            Self::PixelateGray => {
                let mut out = pixelate(bitmap, level);
                grayscale_in_place(&mut out);
                out
            }
            Self::BlurGray => {
                let mut out = blur(bitmap, level);
                grayscale_in_place(&mut out);
                out
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pixelate => "pixel",
            Self::Blur => "blur",
            Self::PixelateGray => "pixelGray",
            Self::BlurGray => "blurGray",
        }
    }
}

/// 马赛克。`block == 0` 按 1 处理。
pub fn pixelate(bitmap: &Bitmap, block: u32) -> Bitmap {
    let block = block.max(1);
    let (width, height) = bitmap.dimensions();
    let mut out = Bitmap::new(width, height);

    for block_y in (0..height).step_by(block as usize) {
        let y_end = block_y.saturating_add(block).min(height);
        for block_x in (0..width).step_by(block as usize) {
            let x_end = block_x.saturating_add(block).min(width);
            let color = *bitmap.get_pixel(block_x, block_y);

            for y in block_y..y_end {
                for x in block_x..x_end {
                    out.put_pixel(x, y, color);
                }
            }
        }
    }

    out
}

/// 高斯模糊，标准差 `level / 10`；`level == 0` 或空位图返回原图副本。
pub fn blur(bitmap: &Bitmap, level: u32) -> Bitmap {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return bitmap.clone();
    }
    let sigma = level as f32 / 10.0;
    if sigma <= 0.0 {
        return bitmap.clone();
    }
    imageops::blur(bitmap, sigma)
}

/// 返回灰度化后的新位图。
pub fn grayscale(bitmap: &Bitmap) -> Bitmap {
    let mut out = bitmap.clone();
    grayscale_in_place(&mut out);
    out
}

pub fn grayscale_in_place(bitmap: &mut Bitmap) {
    for pixel in bitmap.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let gray = luminance(r, g, b);
        *pixel = Rgba([gray, gray, gray, a]);
    }
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let value = 0.3 * r as f64 + 0.59 * g as f64 + 0.11 * b as f64;
    value.round().clamp(0.0, 255.0) as u8
}
