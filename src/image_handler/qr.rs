//! # 二维码生成模块
//!
//! ## 设计思路
//!
//! 编码交给 `qrcode` crate（纠错等级 Q），本模块只负责把模块矩阵渲染成
//! 栅格位图（PNG / WEBP）或 SVG 路径，并处理静区（margin）与输出尺寸。
//!
//! ## 实现思路
//!
//! - 栅格：输出像素按比例映射回模块坐标，最近邻取色，保证任意尺寸都铺满。
//! - SVG：按行合并连续深色模块为一条 `h` 路径，viewBox 以模块为单位。

use image::Rgba;
use qrcode::{Color, EcLevel, QrCode};

use super::ImageError;
use super::export::{self, EncodedImage, ExportFormat};
use super::source::Bitmap;

pub const SIZES: [u32; 5] = [100, 200, 300, 400, 500];
pub const DEFAULT_SIZE: u32 = 200;
pub const DEFAULT_MARGIN: u32 = 1;
pub const MAX_MARGIN: u32 = 5;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// 二维码参数。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QrOptions {
    pub text: String,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_margin")]
    pub margin: u32,
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

fn default_margin() -> u32 {
    DEFAULT_MARGIN
}

impl QrOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
        }
    }

    fn validate(&self) -> Result<(), ImageError> {
        if self.text.trim().is_empty() {
            return Err(ImageError::InvalidParameter("二维码内容不能为空".to_string()));
        }
        if !SIZES.contains(&self.size) {
            return Err(ImageError::InvalidParameter(format!(
                "不支持的二维码尺寸：{}（可选：{:?}）",
                self.size, SIZES
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(ImageError::InvalidParameter(format!(
                "边距必须在 0~{} 之间：{}",
                MAX_MARGIN, self.margin
            )));
        }
        Ok(())
    }
}

/// 带静区的模块矩阵。
#[derive(Debug, Clone)]
pub struct QrMatrix {
    /// 含静区的边长（模块数）。
    pub dimension: u32,
    dark: Vec<bool>,
}

impl QrMatrix {
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        self.dark[(y * self.dimension + x) as usize]
    }
}

/// 编码文本为模块矩阵。
pub fn encode_matrix(text: &str, margin: u32) -> Result<QrMatrix, ImageError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::Q)
        .map_err(|e| ImageError::InvalidParameter(format!("二维码编码失败：{}", e)))?;

    let width = code.width() as u32;
    let dimension = width + margin * 2;
    let colors = code.to_colors();
    let mut dark = vec![false; (dimension * dimension) as usize];

    for y in 0..width {
        for x in 0..width {
            if colors[(y * width + x) as usize] == Color::Dark {
                dark[((y + margin) * dimension + x + margin) as usize] = true;
            }
        }
    }

    Ok(QrMatrix { dimension, dark })
}

/// 把矩阵栅格化为 `size x size` 位图。
pub fn rasterize(matrix: &QrMatrix, size: u32) -> Bitmap {
    let dim = matrix.dimension as u64;
    Bitmap::from_fn(size, size, |px, py| {
        let mx = (px as u64 * dim / size as u64) as u32;
        let my = (py as u64 * dim / size as u64) as u32;
        if matrix.is_dark(mx, my) { DARK } else { LIGHT }
    })
}

/// 生成 SVG 文本。
pub fn to_svg(matrix: &QrMatrix, size: u32) -> String {
    let dim = matrix.dimension;
    let mut path = String::new();

    for y in 0..dim {
        let mut x = 0;
        while x < dim {
            if !matrix.is_dark(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < dim && matrix.is_dark(x, y) {
                x += 1;
            }
            path.push_str(&format!("M{} {}h{}v1H{}z", start, y, x - start, start));
        }
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" height=\"{size}\" width=\"{size}\" viewBox=\"0 0 {dim} {dim}\" shape-rendering=\"crispEdges\"><path fill=\"#FFFFFF\" d=\"M0,0 h{dim}v{dim}H0z\"/><path fill=\"#000000\" d=\"{path}\"/></svg>"
    )
}

/// 按参数生成二维码文件。
pub fn render_qr(options: &QrOptions, format: ExportFormat) -> Result<EncodedImage, ImageError> {
    options.validate()?;
    let matrix = encode_matrix(&options.text, options.margin)?;

    match format {
        ExportFormat::Svg => Ok(EncodedImage {
            format,
            width: options.size,
            height: options.size,
            bytes: to_svg(&matrix, options.size).into_bytes(),
        }),
        ExportFormat::Png | ExportFormat::Webp => {
            export::encode(&rasterize(&matrix, options.size), format, 100)
        }
        ExportFormat::Jpeg => Err(ImageError::InvalidParameter(
            "二维码仅支持 png / webp / svg".to_string(),
        )),
    }
}

pub fn file_name(format: ExportFormat) -> String {
    format!("qrcode.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_adds_light_border() {
        let matrix = encode_matrix("https://example.com", 2).expect("encode");
        for i in 0..matrix.dimension {
            assert!(!matrix.is_dark(i, 0));
            assert!(!matrix.is_dark(0, i));
            assert!(!matrix.is_dark(i, matrix.dimension - 1));
        }
        // 定位图案左上角在静区之后
        assert!(matrix.is_dark(2, 2));
    }

    #[test]
    fn raster_has_requested_size_and_finder_pattern() {
        let options = QrOptions::new("olá mundo");
        let matrix = encode_matrix(&options.text, 0).expect("encode");
        let bitmap = rasterize(&matrix, 300);

        assert_eq!(bitmap.dimensions(), (300, 300));
        assert_eq!(*bitmap.get_pixel(0, 0), DARK);
        assert!(bitmap.pixels().all(|p| *p == DARK || *p == LIGHT));
    }

    #[test]
    fn blank_text_is_rejected() {
        let result = render_qr(&QrOptions::new("   "), ExportFormat::Png);
        assert!(matches!(result, Err(ImageError::InvalidParameter(_))));
    }

    #[test]
    fn unsupported_size_and_margin_are_rejected() {
        let mut options = QrOptions::new("abc");
        options.size = 250;
        assert!(render_qr(&options, ExportFormat::Png).is_err());

        options.size = 200;
        options.margin = 6;
        assert!(render_qr(&options, ExportFormat::Png).is_err());
    }

    #[test]
    fn svg_output_uses_module_view_box() {
        let options = QrOptions::new("abc");
        let encoded = render_qr(&options, ExportFormat::Svg).expect("svg");
        let svg = String::from_utf8(encoded.bytes).expect("utf8");
        let matrix = encode_matrix("abc", DEFAULT_MARGIN).expect("encode");

        assert!(svg.contains(&format!("viewBox=\"0 0 {0} {0}\"", matrix.dimension)));
        assert!(svg.contains("width=\"200\""));
        assert_eq!(file_name(ExportFormat::Svg), "qrcode.svg");
    }

    #[test]
    fn png_output_decodes_to_square() {
        let encoded = render_qr(&QrOptions::new("abc"), ExportFormat::Png).expect("png");
        let decoded = image::load_from_memory(&encoded.bytes).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (200, 200));
    }

    #[test]
    fn jpeg_is_not_offered() {
        assert!(render_qr(&QrOptions::new("abc"), ExportFormat::Jpeg).is_err());
    }
}
