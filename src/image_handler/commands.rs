//! # Tauri 命令层
//!
//! ## 设计思路
//!
//! 命令层仅做 IPC 参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `ImageServiceState`，保持命令函数薄、稳定、易测试。
//! `save_*` 命令把编码结果写入下载目录，替代浏览器下载。

use tauri::{AppHandle, State};

use super::crop::CropRect;
use super::export::{ExportFormat, ImagePreview};
use super::handler::{ConvertOutput, ConvertRequest, CropOutput, ImageInfo, NamedImage, ResizeOutput};
use super::placeholder::{self, PlaceholderOptions};
use super::qr::QrOptions;
use super::resize::{DimensionField, ResizeControls, ResizeDimensions};
use super::service::{ImageServiceState, PlaceholderPreview};
use super::ImageSource;
use crate::downloads::{self, SavedFile};
use crate::error::AppError;

async fn save_named(app: &AppHandle, dir: Option<String>, named: NamedImage) -> Result<SavedFile, AppError> {
    let dir = downloads::resolve_download_dir(app, dir)?;
    downloads::save_bytes_async(dir, named.file_name, named.image.bytes).await
}

/// 读取图片尺寸与文件名信息。
#[tauri::command]
pub async fn inspect_image(
    state: State<'_, ImageServiceState>,
    source: ImageSource,
) -> Result<ImageInfo, AppError> {
    Ok(state.inspect(source).await?)
}

/// 转换器：生成原图与效果图预览。
#[tauri::command]
pub async fn convert_image(
    state: State<'_, ImageServiceState>,
    request: ConvertRequest,
) -> Result<ConvertOutput, AppError> {
    Ok(state.convert(request).await?)
}

/// 转换器：下载原图或效果图。
#[tauri::command]
pub async fn save_converted_image(
    app: AppHandle,
    state: State<'_, ImageServiceState>,
    request: ConvertRequest,
    format: String,
    with_effect: bool,
    dir: Option<String>,
) -> Result<SavedFile, AppError> {
    let format = ExportFormat::from_extension(&format)?;
    let named = state.export_converted(request, format, with_effect).await?;
    save_named(&app, dir, named).await
}

/// 转换器：全部下载。
#[tauri::command]
pub async fn save_converted_images(
    app: AppHandle,
    state: State<'_, ImageServiceState>,
    requests: Vec<ConvertRequest>,
    format: String,
    with_effect: bool,
    dir: Option<String>,
) -> Result<Vec<SavedFile>, AppError> {
    let format = ExportFormat::from_extension(&format)?;
    let files = state.export_converted_batch(requests, format, with_effect).await?;
    let mut saved = Vec::with_capacity(files.len());
    for named in files {
        saved.push(save_named(&app, dir.clone(), named).await?);
    }
    Ok(saved)
}

/// 缩放工具：宽高输入联动。
#[tauri::command]
pub fn adjust_resize_dimensions(
    dims: ResizeDimensions,
    field: DimensionField,
    value: String,
) -> ResizeControls {
    let mut dims = dims;
    dims.apply_input(field, &value);
    dims.into()
}

#[tauri::command]
pub async fn resize_image(
    state: State<'_, ImageServiceState>,
    source: ImageSource,
    width: u32,
    height: u32,
) -> Result<ResizeOutput, AppError> {
    Ok(state.resize(source, width, height).await?)
}

#[tauri::command]
pub async fn save_resized_image(
    app: AppHandle,
    state: State<'_, ImageServiceState>,
    source: ImageSource,
    width: u32,
    height: u32,
    format: String,
    dir: Option<String>,
) -> Result<SavedFile, AppError> {
    let format = ExportFormat::from_extension(&format)?;
    let named = state.export_resized(source, width, height, format).await?;
    save_named(&app, dir, named).await
}

#[tauri::command]
pub async fn crop_image(
    state: State<'_, ImageServiceState>,
    source: ImageSource,
    rect: CropRect,
) -> Result<CropOutput, AppError> {
    Ok(state.crop(source, rect).await?)
}

#[tauri::command]
pub async fn save_cropped_image(
    app: AppHandle,
    state: State<'_, ImageServiceState>,
    source: ImageSource,
    rect: CropRect,
    dir: Option<String>,
) -> Result<SavedFile, AppError> {
    let named = state.export_cropped(source, rect).await?;
    save_named(&app, dir, named).await
}

/// 占位图预览。
#[tauri::command]
pub async fn generate_placeholder(
    state: State<'_, ImageServiceState>,
    options: PlaceholderOptions,
) -> Result<PlaceholderPreview, AppError> {
    Ok(state.placeholder_preview(options).await?)
}

#[tauri::command]
pub async fn save_placeholder(
    app: AppHandle,
    state: State<'_, ImageServiceState>,
    options: PlaceholderOptions,
    dir: Option<String>,
) -> Result<SavedFile, AppError> {
    let named = state.placeholder(options).await?;
    save_named(&app, dir, named).await
}

#[tauri::command]
pub fn random_placeholder_color() -> String {
    placeholder::random_hex_color()
}

/// 二维码预览。
#[tauri::command]
pub async fn generate_qr_code(
    state: State<'_, ImageServiceState>,
    options: QrOptions,
    format: String,
) -> Result<ImagePreview, AppError> {
    let format = ExportFormat::from_extension(&format)?;
    Ok(state.qr_code(options, format).await?.image.preview())
}

#[tauri::command]
pub async fn save_qr_code(
    app: AppHandle,
    state: State<'_, ImageServiceState>,
    options: QrOptions,
    format: String,
    dir: Option<String>,
) -> Result<SavedFile, AppError> {
    let format = ExportFormat::from_extension(&format)?;
    let named = state.qr_code(options, format).await?;
    save_named(&app, dir, named).await
}
