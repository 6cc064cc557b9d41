//! 時系列トレースログ
//! 画面操作とディスパッチを記録し、コンソール・LocalStorage・JSON ダウンロードで確認できるようにする

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const MAX_LOG_ENTRIES: usize = 1000;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const STORAGE_KEY: &str = "roster_contracts_log_trace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub category: String, // "data-table", "host", "config" など
    pub message: String,
    pub data: Option<serde_json::Value>,
}

pub struct LogTrace {
    logs: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogTrace {
    pub fn new() -> Self {
        let mut trace = LogTrace::with_capacity(MAX_LOG_ENTRIES);
        trace.load_from_storage();
        trace
    }

    fn with_capacity(capacity: usize) -> Self {
        LogTrace {
            logs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn log(&mut self, level: LogLevel, category: &str, message: &str, data: Option<serde_json::Value>) {
        write_console(level, category, message);

        if self.logs.len() >= self.capacity {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            timestamp: now_iso(),
            level,
            category: category.to_string(),
            message: message.to_string(),
            data,
        });

        self.save_to_storage();
    }

    pub fn get_logs_json(&self) -> String {
        serde_json::to_string_pretty(&self.logs).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn clear(&mut self) {
        self.logs.clear();
        self.save_to_storage();
    }

    #[cfg(target_arch = "wasm32")]
    fn load_from_storage(&mut self) {
        let Some(storage) = local_storage() else { return };
        if let Ok(Some(json_str)) = storage.get_item(STORAGE_KEY) {
            if let Ok(logs) = serde_json::from_str::<Vec<LogEntry>>(&json_str) {
                let skip = logs.len().saturating_sub(self.capacity);
                self.logs = logs.into_iter().skip(skip).collect();
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from_storage(&mut self) {}

    #[cfg(target_arch = "wasm32")]
    fn save_to_storage(&self) {
        if let Some(storage) = local_storage() {
            let json_str = serde_json::to_string(&self.logs).unwrap_or_else(|_| "[]".to_string());
            let _ = storage.set_item(STORAGE_KEY, &json_str);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_to_storage(&self) {}

    /// ログを JSON ファイルとしてダウンロード
    #[cfg(target_arch = "wasm32")]
    pub fn download_logs(&self) {
        use wasm_bindgen::{JsCast, JsValue};

        let json_str = self.get_logs_json();
        let filename = format!("log_trace_{}.json", now_iso().replace([':', '.'], "-"));

        let Some(document) = web_sys::window().and_then(|w| w.document()) else { return };
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&JsValue::from_str(&json_str));

        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/json");

        let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options) else { return };
        let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else { return };
        if let Ok(a) = document.create_element("a") {
            let _ = a.set_attribute("href", &url);
            let _ = a.set_attribute("download", &filename);
            if let Some(element) = a.dyn_ref::<web_sys::HtmlElement>() {
                element.click();
            }
        }
        let _ = web_sys::Url::revoke_object_url(&url);
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn download_logs(&self) {}
}

impl Default for LogTrace {
    fn default() -> Self {
        LogTrace::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_iso() -> String {
    String::new()
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: LogLevel, category: &str, message: &str) {
    let line: wasm_bindgen::JsValue = format!("[{}] {}", category, message).into();
    match level {
        LogLevel::Error => web_sys::console::error_1(&line),
        LogLevel::Warn => web_sys::console::warn_1(&line),
        LogLevel::Info => web_sys::console::log_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: LogLevel, _category: &str, _message: &str) {}

// グローバルなログトレースインスタンス
thread_local! {
    static LOG_TRACE: std::cell::RefCell<LogTrace> = std::cell::RefCell::new(LogTrace::new());
}

pub fn log_info(category: &str, message: &str) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log(LogLevel::Info, category, message, None));
}

pub fn log_info_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log(LogLevel::Info, category, message, Some(data)));
}

pub fn log_warn(category: &str, message: &str) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log(LogLevel::Warn, category, message, None));
}

pub fn log_error(category: &str, message: &str) {
    LOG_TRACE.with(|trace| trace.borrow_mut().log(LogLevel::Error, category, message, None));
}

pub fn download_logs() {
    LOG_TRACE.with(|trace| trace.borrow().download_logs());
}

pub fn clear_logs() {
    LOG_TRACE.with(|trace| trace.borrow_mut().clear());
}
