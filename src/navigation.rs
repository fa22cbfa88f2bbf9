//! 侧边栏导航模块
//!
//! # 设计思路
//!
//! 路由表是固定的 `(url, label)` 列表，顺序即侧边栏显示顺序。
//! 侧边栏的过滤框按标签做不区分大小写的子串匹配；未知地址解析为 404 页面。

use serde::Serialize;

/// 侧边栏条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub url: &'static str,
    pub label: &'static str,
}

pub const NOT_FOUND_TITLE: &str = "404 - Página não encontrada";

pub const ROUTES: [Route; 11] = [
    Route { url: "/", label: "Página inicial" },
    Route { url: "/gerador-de-lorem", label: "Gerador de Lorem Ipsum" },
    Route { url: "/conversor-de-imagens", label: "Conversor de imagens" },
    Route { url: "/base64", label: "Encoder/Decoder Base64" },
    Route { url: "/gerador-de-imagem", label: "Gerador de imagem" },
    Route { url: "/baixar-tiktok", label: "Baixar TikTok" },
    Route { url: "/qrcode", label: "Gerador de QR Code" },
    Route { url: "/redimensionar-imagem", label: "Redimensionar Imagem" },
    Route { url: "/recortar-imagem", label: "Recortar Imagem" },
    Route { url: "/gerador-de-link-wpp", label: "Gerador de link WPP" },
    Route { url: "/gerador-de-cpf-cnpj", label: "Gerador de CPF e CNPJ" },
];

/// 路由解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "route", rename_all = "camelCase")]
pub enum Resolved {
    Page(Route),
    NotFound,
}

/// 按标签过滤；空查询返回全部路由。
pub fn filter_routes(query: &str) -> Vec<Route> {
    let needle = query.trim().to_lowercase();
    ROUTES
        .iter()
        .filter(|route| needle.is_empty() || route.label.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

/// 解析地址，忽略末尾的 `/`（根路径除外）。
pub fn resolve_route(url: &str) -> Resolved {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    ROUTES
        .iter()
        .find(|route| route.url == path)
        .map_or(Resolved::NotFound, |route| Resolved::Page(*route))
}

/// 页面标题：已知路由取其标签，否则为 404 标题。
pub fn page_title(url: &str) -> &'static str {
    match resolve_route(url) {
        Resolved::Page(route) => route.label,
        Resolved::NotFound => NOT_FOUND_TITLE,
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn list_routes(query: Option<String>) -> Vec<Route> {
    filter_routes(query.as_deref().unwrap_or_default())
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn resolve_page(url: String) -> Resolved {
    resolve_route(&url)
}
