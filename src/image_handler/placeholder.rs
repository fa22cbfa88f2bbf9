//! # 占位图生成模块
//!
//! ## 设计思路
//!
//! 生成纯色背景 + 居中 `宽x高` 文字的占位图。
//! - SVG：直接拼接字符串，文字交给查看器渲染。
//! - 栅格：文字只会包含 `0-9` 与 `x`，因此内置一套 5x7 点阵字形按字号放大绘制，
//!   不依赖系统字体。

use std::ops::RangeInclusive;

use image::Rgba;
use rand::Rng;

use super::ImageError;
use super::export::{self, EncodedImage, ExportFormat};
use super::source::Bitmap;

pub const DIMENSION_RANGE: RangeInclusive<u32> = 1..=2000;
pub const EXTENSIONS: [&str; 5] = ["webp", "png", "jpg", "jpeg", "svg"];
pub const DEFAULT_BACKGROUND: &str = "#cccccc";
pub const DEFAULT_TEXT_COLOR: &str = "#222222";
pub const PREVIEW_MAX_DIM: u32 = 400;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// 占位图参数。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceholderOptions {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub text_color: String,
    pub extension: String,
    pub quality: u8,
}

impl Default for PlaceholderOptions {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            background: DEFAULT_BACKGROUND.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            extension: "webp".to_string(),
            quality: 100,
        }
    }
}

impl PlaceholderOptions {
    pub fn label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// 字号：`max(10, floor(min(w, h) / 4))`。
    pub fn font_size(&self) -> u32 {
        (self.width.min(self.height) / 4).max(10)
    }

    pub fn file_name(&self) -> String {
        format!("{}x{}.{}", self.width, self.height, self.extension.to_lowercase())
    }

    pub fn validate(&self) -> Result<ExportFormat, ImageError> {
        for (name, value) in [("宽度", self.width), ("高度", self.height)] {
            if !DIMENSION_RANGE.contains(&value) {
                return Err(ImageError::InvalidParameter(format!(
                    "{}必须在 {}~{} 之间：{}",
                    name,
                    DIMENSION_RANGE.start(),
                    DIMENSION_RANGE.end(),
                    value
                )));
            }
        }

        let ext = self.extension.to_lowercase();
        if !EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImageError::InvalidParameter(format!("不支持的扩展名：{}", self.extension)));
        }
        parse_hex_color(&self.background)?;
        parse_hex_color(&self.text_color)?;
        ExportFormat::from_extension(&ext)
    }
}

/// 生成 SVG 文本。
pub fn placeholder_svg(options: &PlaceholderOptions) -> String {
    let (w, h) = (options.width, options.height);
    format!(
        "<?xml version='1.0' encoding='UTF-8'?>\n<svg viewBox='0 0 {w} {h}' xmlns='http://www.w3.org/2000/svg'><rect width='100%' height='100%' fill='{}'/><text x='50%' y='50%' dy='.35em' text-anchor='middle' font-size='{}' fill='{}' font-family='Arial, sans-serif'>{}</text></svg>",
        options.background,
        options.font_size(),
        options.text_color,
        options.label()
    )
}

/// 绘制栅格占位图。
pub fn placeholder_bitmap(options: &PlaceholderOptions) -> Result<Bitmap, ImageError> {
    let background = parse_hex_color(&options.background)?;
    let foreground = parse_hex_color(&options.text_color)?;
    let mut bitmap = Bitmap::from_pixel(options.width, options.height, background);

    let label = options.label();
    // 数字高度约为字号的 0.7
    let scale = ((options.font_size() as f64 * 0.7) / GLYPH_HEIGHT as f64).round().max(1.0) as u32;
    let advance = (GLYPH_WIDTH + 1) * scale;
    let text_width = advance * label.len() as u32 - scale;
    let text_height = GLYPH_HEIGHT * scale;

    let origin_x = options.width as i64 / 2 - text_width as i64 / 2;
    let origin_y = options.height as i64 / 2 - text_height as i64 / 2;

    for (index, ch) in label.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let glyph_x = origin_x + (index as u32 * advance) as i64;
        draw_glyph(&mut bitmap, rows, glyph_x, origin_y, scale, foreground);
    }

    Ok(bitmap)
}

/// 按参数生成最终文件。
pub fn render_placeholder(options: &PlaceholderOptions) -> Result<EncodedImage, ImageError> {
    let format = options.validate()?;

    if format == ExportFormat::Svg {
        return Ok(EncodedImage {
            format,
            width: options.width,
            height: options.height,
            bytes: placeholder_svg(options).into_bytes(),
        });
    }

    let bitmap = placeholder_bitmap(options)?;
    export::encode(&bitmap, format, options.quality)
}

/// 随机颜色：`#` + 6 位小写十六进制。
pub fn random_hex_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..16_777_215);
    format!("#{:06x}", value)
}

/// 预览框尺寸：最长边 400，保持比例。
pub fn preview_size(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (PREVIEW_MAX_DIM, PREVIEW_MAX_DIM);
    }

    let max = PREVIEW_MAX_DIM as f64;
    let preview_height = (height as f64 / width as f64 * max).round();
    if preview_height > max {
        let preview_width = (width as f64 / height as f64 * max).round();
        (preview_width as u32, PREVIEW_MAX_DIM)
    } else {
        (PREVIEW_MAX_DIM, preview_height as u32)
    }
}

/// 解析 `#rgb` / `#rrggbb`。
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, ImageError> {
    let invalid = || ImageError::InvalidParameter(format!("颜色格式无效：{}", value));
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(invalid()),
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

fn draw_glyph(bitmap: &mut Bitmap, rows: [u8; 7], x0: i64, y0: i64, scale: u32, color: Rgba<u8>) {
    let (width, height) = (bitmap.width() as i64, bitmap.height() as i64);

    for (row, &bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                continue;
            }
            let px = x0 + (col * scale) as i64;
            let py = y0 + (row as u32 * scale) as i64;
            for dy in 0..scale as i64 {
                for dx in 0..scale as i64 {
                    let (x, y) = (px + dx, py + dy);
                    if (0..width).contains(&x) && (0..height).contains(&y) {
                        bitmap.put_pixel(x as u32, y as u32, color);
                    }
                }
            }
        }
    }
}

fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'x' => [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        _ => return None,
    };
    Some(rows)
}
