//! 起動時設定（表示するテナント）

const TENANT_KEY: &str = "roster_contracts_tenant_id";

/// クエリ文字列から tenant パラメータを取り出す (`?tenant=3`, `?foo=1&tenant=3`)
pub fn parse_tenant_param(search: &str) -> Option<u32> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "tenant")
        .and_then(|(_, value)| value.parse().ok())
}

/// tenant を除いたクエリ文字列（空なら空文字）
pub fn strip_tenant_param(search: &str) -> String {
    let rest: Vec<&str> = search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("tenant="))
        .collect();
    if rest.is_empty() {
        String::new()
    } else {
        format!("?{}", rest.join("&"))
    }
}

/// テナントIDを保存
pub fn save_tenant_id(tenant_id: u32) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(TENANT_KEY, &tenant_id.to_string());
        }
    }
}

/// 保存済みのテナントIDを取得
pub fn load_tenant_id() -> Option<u32> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let value = storage.get_item(TENANT_KEY).ok()??;
    value.parse().ok()
}

/// URLパラメータからテナントIDを読み込んで保存し、URLからは取り除く
pub fn init_tenant_from_url_params() -> Option<u32> {
    let window = web_sys::window()?;
    let location = window.location();
    let search = location.search().ok()?;
    let tenant_id = parse_tenant_param(&search)?;
    save_tenant_id(tenant_id);

    let pathname = location.pathname().ok()?;
    let hash = location.hash().ok().unwrap_or_default();
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(
            &wasm_bindgen::JsValue::NULL,
            "",
            Some(&format!("{}{}{}", pathname, strip_tenant_param(&search), hash)),
        );
    }
    Some(tenant_id)
}

/// URLパラメータ → LocalStorage → 既定値 の順で決める
pub fn resolve_tenant_id(fallback: u32) -> u32 {
    init_tenant_from_url_params()
        .or_else(load_tenant_id)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tenant_param() {
        assert_eq!(parse_tenant_param("?tenant=3"), Some(3));
        assert_eq!(parse_tenant_param("?view=table&tenant=12"), Some(12));
        assert_eq!(parse_tenant_param(""), None);
        assert_eq!(parse_tenant_param("?tenant="), None);
        assert_eq!(parse_tenant_param("?tenant=abc"), None);
        assert_eq!(parse_tenant_param("?tenants=3"), None);
    }

    #[test]
    fn test_strip_tenant_param() {
        assert_eq!(strip_tenant_param("?tenant=3"), "");
        assert_eq!(strip_tenant_param("?view=table&tenant=3"), "?view=table");
        assert_eq!(strip_tenant_param("?tenant=3&debug=1&view=x"), "?debug=1&view=x");
    }
}
