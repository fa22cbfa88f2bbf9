//! # 裁剪模块
//!
//! 裁剪框以源图像素为单位。框始终被限制在图片内部，最小 50x50
//! （图片本身更小时以图片尺寸为准），初始框覆盖整张图片。

use image::imageops;

use super::ImageError;
use super::source::Bitmap;

pub const MIN_CROP_SIZE: u32 = 50;
pub const CROPPED_FILE_NAME: &str = "imagem-cortada.png";

/// 裁剪框。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// 覆盖整张图片的初始裁剪框。
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// 把裁剪框限制到图片内部并满足最小尺寸。
    ///
    /// 先保证尺寸（不小于最小值、不超过图片），再平移原点使框不越界。
    pub fn clamp_to(self, image_width: u32, image_height: u32) -> Self {
        let min_w = MIN_CROP_SIZE.min(image_width);
        let min_h = MIN_CROP_SIZE.min(image_height);

        let width = self.width.clamp(min_w, image_width);
        let height = self.height.clamp(min_h, image_height);
        let x = self.x.min(image_width - width);
        let y = self.y.min(image_height - height);

        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// 按裁剪框截取位图。
pub fn crop_bitmap(bitmap: &Bitmap, rect: CropRect) -> Result<(Bitmap, CropRect), ImageError> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidParameter("源图片尺寸为空".to_string()));
    }

    let rect = rect.clamp_to(width, height);
    let cropped = imageops::crop_imm(bitmap, rect.x, rect.y, rect.width, rect.height).to_image();

    log::debug!(
        "✂️ 裁剪 {}x{} -> x={} y={} {}x{}",
        width,
        height,
        rect.x,
        rect.y,
        rect.width,
        rect.height
    );

    Ok((cropped, rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn clamp_enforces_minimum_size() {
        let rect = CropRect { x: 0, y: 0, width: 10, height: 20 }.clamp_to(400, 300);
        assert_eq!((rect.width, rect.height), (50, 50));
    }

    #[test]
    fn clamp_shifts_origin_inside_image() {
        let rect = CropRect { x: 380, y: 290, width: 100, height: 60 }.clamp_to(400, 300);
        assert_eq!(rect, CropRect { x: 300, y: 240, width: 100, height: 60 });
    }

    #[test]
    fn small_images_use_their_own_size_as_minimum() {
        let rect = CropRect { x: 5, y: 5, width: 1, height: 1 }.clamp_to(20, 30);
        assert_eq!((rect.width, rect.height), (20, 30));
        assert_eq!((rect.x, rect.y), (0, 0));
    }

    #[test]
    fn crop_copies_the_selected_region() {
        let src = Bitmap::from_fn(100, 80, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let (out, rect) = crop_bitmap(&src, CropRect { x: 10, y: 20, width: 60, height: 50 })
            .expect("crop");

        assert_eq!(rect, CropRect { x: 10, y: 20, width: 60, height: 50 });
        assert_eq!(out.dimensions(), (60, 50));
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 0, 255]);
        assert_eq!(out.get_pixel(59, 49).0, [69, 69, 0, 255]);
    }

    #[test]
    fn full_rect_covers_image() {
        let src = Bitmap::from_pixel(64, 64, Rgba([1, 2, 3, 4]));
        let (out, _) = crop_bitmap(&src, CropRect::full(64, 64)).expect("crop");
        assert_eq!(out, src);
    }
}
