//! # 视频 Tauri 命令
//!
//! 命令层只做参数适配；`VideoClient` 作为托管状态注入。

use tauri::{AppHandle, State};

use super::{DownloadedVideo, VideoClient, VideoInfo};
use crate::downloads;
use crate::error::AppError;

/// 查询视频信息。
#[tauri::command]
pub async fn fetch_tiktok_video(state: State<'_, VideoClient>, url: String) -> Result<VideoInfo, AppError> {
    Ok(state.fetch_video(&url).await?)
}

/// 下载视频到下载目录（或用户指定目录）。
#[tauri::command]
pub async fn download_tiktok_video(
    app: AppHandle,
    state: State<'_, VideoClient>,
    info: VideoInfo,
    dir: Option<String>,
) -> Result<DownloadedVideo, AppError> {
    let dir = downloads::resolve_download_dir(&app, dir)?;
    Ok(state.download_video(&info, &dir).await?)
}
