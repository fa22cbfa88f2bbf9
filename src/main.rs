// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # Dev Tools 开发者工具箱 — 应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use dev_tools::{clipboard, image_handler, navigation, text_tools, video};
use tauri::Manager;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        // 插件初始化
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            log::info!("setup: begin");

            match image_handler::ImageServiceState::new() {
                Ok(image_service_state) => {
                    app.manage(image_service_state);
                    log::info!("setup: image service managed");
                }
                Err(err) => {
                    log::error!("setup: 图片服务初始化失败，图片工具将不可用: {err}");
                }
            }

            match video::VideoClient::new(video::VideoConfig::default()) {
                Ok(video_client) => {
                    app.manage(video_client);
                    log::info!("setup: video client managed");
                }
                Err(err) => {
                    log::error!("setup: 视频客户端初始化失败，视频下载将不可用: {err}");
                }
            }

            log::info!("setup: done");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // 导航
            navigation::list_routes,
            navigation::resolve_page,
            // 文本工具
            text_tools::commands::generate_lorem,
            text_tools::commands::process_base64,
            text_tools::commands::generate_document,
            text_tools::commands::normalize_document_input,
            text_tools::commands::validate_document,
            text_tools::commands::format_whatsapp_phone,
            text_tools::commands::build_whatsapp_link,
            // 图片处理
            image_handler::commands::inspect_image,
            image_handler::commands::convert_image,
            image_handler::commands::save_converted_image,
            image_handler::commands::save_converted_images,
            image_handler::commands::adjust_resize_dimensions,
            image_handler::commands::resize_image,
            image_handler::commands::save_resized_image,
            image_handler::commands::crop_image,
            image_handler::commands::save_cropped_image,
            image_handler::commands::generate_placeholder,
            image_handler::commands::save_placeholder,
            image_handler::commands::random_placeholder_color,
            image_handler::commands::generate_qr_code,
            image_handler::commands::save_qr_code,
            // 视频下载
            video::commands::fetch_tiktok_video,
            video::commands::download_tiktok_video,
            // 剪贴板
            clipboard::write_text_to_clipboard,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
