//! 任意入力の数値欄
//!
//! 「上限なし」チェックと数字のみのテキスト入力を組み合わせた入力欄

use leptos::*;
use regex::Regex;
use std::sync::OnceLock;

fn digits_only() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^[0-9]+$").expect("digit pattern"))
}

/// 数字のみの文字列を整数に変換。それ以外（空文字・符号付き・桁あふれ）は None
pub fn parse_limit(text: &str) -> Option<u32> {
    if !digits_only().is_match(text) {
        return None;
    }
    text.parse().ok()
}

/// 入力欄の状態からドラフト値を決める
pub fn optional_input_value(enabled: bool, text: &str) -> Option<Option<u32>> {
    if !enabled {
        return Some(None);
    }
    parse_limit(text).map(Some)
}

/// 任意入力の数値欄コンポーネント
#[component]
pub fn OptionalInput<F>(
    label: &'static str,
    initial: Option<Option<u32>>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(Option<Option<u32>>) + 'static + Clone,
{
    let (enabled, set_enabled) = create_signal(initial != Some(None));
    let (text, set_text) = create_signal(
        initial.flatten().map(|v| v.to_string()).unwrap_or_default(),
    );

    let on_change_1 = on_change.clone();
    let on_change_2 = on_change;

    view! {
        <div class="optional-input">
            <input type="checkbox"
                title="Limit enabled"
                prop:checked=move || enabled.get()
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    set_enabled.set(checked);
                    on_change_1(optional_input_value(checked, &text.get_untracked()));
                }
            />
            <input type="text" class="limit-input"
                aria-label=label
                placeholder=label
                inputmode="numeric"
                prop:value=move || text.get()
                prop:disabled=move || !enabled.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    set_text.set(value.clone());
                    on_change_2(optional_input_value(enabled.get_untracked(), &value));
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_limit("42"), Some(42));
        assert_eq!(parse_limit("0"), Some(0));
        assert_eq!(parse_limit("007"), Some(7));
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert_eq!(parse_limit("abc"), None);
        assert_eq!(parse_limit(""), None);
        assert_eq!(parse_limit("-5"), None);
        assert_eq!(parse_limit("4 2"), None);
        assert_eq!(parse_limit("+3"), None);
        assert_eq!(parse_limit("12.5"), None);
    }

    #[test]
    fn test_parse_overflow_is_unset() {
        assert_eq!(parse_limit("99999999999"), None);
    }

    #[test]
    fn test_disabled_means_no_limit() {
        assert_eq!(optional_input_value(false, "abc"), Some(None));
        assert_eq!(optional_input_value(false, "42"), Some(None));
    }

    #[test]
    fn test_enabled_follows_text() {
        assert_eq!(optional_input_value(true, "480"), Some(Some(480)));
        assert_eq!(optional_input_value(true, ""), None);
        assert_eq!(optional_input_value(true, "-5"), None);
    }
}
