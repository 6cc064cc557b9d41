use leptos::*;
use std::rc::Rc;

mod components;
mod errors;
mod models;
mod utils;
mod views;

use models::{AppState, Contract};
use utils::config::{resolve_tenant_id, save_tenant_id};
use utils::log_trace::{clear_logs, download_logs, log_error, log_info, log_info_with_data, log_warn};
use views::{ContractDispatch, ContractsPage};

const SAMPLE_STATE: &str = include_str!("../data/sample_state.json");

// ============================================
// デモ用ホスト
// ページを動かすための最小限の反映先。永続化・通信は行わない
// ============================================

fn initial_state() -> AppState {
    let mut state = match serde_json::from_str::<AppState>(SAMPLE_STATE) {
        Ok(state) => state,
        Err(e) => {
            log_error("host", &format!("サンプル状態の読込失敗: {}", e));
            AppState::default()
        }
    };
    state.tenant_data.current_tenant_id = resolve_tenant_id(state.tenant_data.current_tenant_id);
    state
}

/// 新しい id を振って末尾に追加し、振った id を返す
fn host_add(state: &mut AppState, mut contract: Contract) -> u32 {
    let list = &mut state.contract_list.contract_list;
    let id = list.iter().filter_map(|c| c.id).max().map_or(1, |max| max + 1);
    contract.id = Some(id);
    contract.version = Some(0);
    list.push(contract);
    id
}

/// 同じ id の行を置き換える。見つからなければ false
fn host_update(state: &mut AppState, mut contract: Contract) -> bool {
    let list = &mut state.contract_list.contract_list;
    match list.iter_mut().find(|c| c.id.is_some() && c.id == contract.id) {
        Some(slot) => {
            contract.version = Some(slot.version.map_or(0, |v| v + 1));
            *slot = contract;
            true
        }
        None => false,
    }
}

/// 同じ id の行を取り除く。見つからなければ false
fn host_remove(state: &mut AppState, contract: &Contract) -> bool {
    if contract.id.is_none() {
        return false;
    }
    let list = &mut state.contract_list.contract_list;
    let before = list.len();
    list.retain(|c| c.id != contract.id);
    list.len() != before
}

fn host_dispatch(set_state: WriteSignal<AppState>) -> ContractDispatch {
    ContractDispatch {
        add_contract: Rc::new(move |contract: Contract| {
            let name = contract.name.clone();
            let mut id = 0;
            set_state.update(|s| id = host_add(s, contract));
            log_info_with_data("host", &format!("契約を追加: {}", name), serde_json::json!({ "id": id }));
        }),
        update_contract: Rc::new(move |contract: Contract| {
            let id = contract.id;
            let mut found = false;
            set_state.update(|s| found = host_update(s, contract));
            if found {
                log_info_with_data("host", "契約を更新", serde_json::json!({ "id": id }));
            } else {
                log_warn("host", &format!("更新対象の契約が見つかりません: {:?}", id));
            }
        }),
        remove_contract: Rc::new(move |contract: Contract| {
            let mut found = false;
            set_state.update(|s| found = host_remove(s, &contract));
            if found {
                log_info_with_data("host", "契約を削除", serde_json::json!({ "id": contract.id }));
            } else {
                log_warn("host", &format!("削除対象の契約が見つかりません: {:?}", contract.id));
            }
        }),
    }
}

// ============================================
// メインアプリ
// ============================================

#[component]
fn App() -> impl IntoView {
    let (state, set_state) = create_signal(initial_state());
    let dispatch = host_dispatch(set_state);

    let on_tenant_change = move |ev: web_sys::Event| {
        match event_target_value(&ev).parse::<u32>() {
            Ok(tenant_id) => {
                set_state.update(|s| s.tenant_data.current_tenant_id = tenant_id);
                save_tenant_id(tenant_id);
                log_info("config", &format!("テナントを切替: {}", tenant_id));
            }
            Err(_) => log_warn("config", "テナントIDは数字で入力してください"),
        }
    };

    view! {
        <div class="app">
            <header class="app-header">
                <h1>"Employee Rostering"</h1>
                <label class="tenant-select">
                    "Tenant "
                    <input type="number" min="0"
                        prop:value=move || state.with(|s| s.tenant_data.current_tenant_id.to_string())
                        on:change=on_tenant_change
                    />
                </label>
                <div class="log-actions">
                    <button on:click=move |_| download_logs()>"Download log"</button>
                    <button on:click=move |_| clear_logs()>"Clear log"</button>
                </div>
            </header>

            <main class="container">
                <ContractsPage state=state dispatch=dispatch />
            </main>
        </div>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(id: Option<u32>, name: &str) -> Contract {
        Contract {
            tenant_id: 0,
            id,
            version: id.map(|_| 0),
            name: name.to_string(),
            maximum_minutes_per_day: Some(480),
            maximum_minutes_per_week: None,
            maximum_minutes_per_month: None,
            maximum_minutes_per_year: None,
        }
    }

    #[test]
    fn test_sample_state_parses() {
        let state: AppState = serde_json::from_str(SAMPLE_STATE).unwrap();
        assert_eq!(state.contract_list.contract_list.len(), 3);
    }

    #[test]
    fn test_host_add_assigns_next_id() {
        let mut state = AppState::default();
        assert_eq!(host_add(&mut state, contract(None, "A")), 1);
        assert_eq!(host_add(&mut state, contract(None, "B")), 2);

        let added = &state.contract_list.contract_list[1];
        assert_eq!(added.id, Some(2));
        assert_eq!(added.version, Some(0));
        assert_eq!(added.name, "B");
    }

    #[test]
    fn test_host_update_replaces_by_id() {
        let mut state = AppState::default();
        state.contract_list.contract_list = vec![contract(Some(1), "A"), contract(Some(2), "B")];

        assert!(host_update(&mut state, contract(Some(2), "B2")));
        let updated = &state.contract_list.contract_list[1];
        assert_eq!(updated.name, "B2");
        assert_eq!(updated.version, Some(1));

        assert!(!host_update(&mut state, contract(Some(9), "missing")));
        assert!(!host_update(&mut state, contract(None, "no id")));
    }

    #[test]
    fn test_host_remove_by_id() {
        let mut state = AppState::default();
        state.contract_list.contract_list = vec![contract(Some(1), "A"), contract(Some(2), "B")];

        assert!(host_remove(&mut state, &contract(Some(1), "A")));
        assert_eq!(state.contract_list.contract_list.len(), 1);
        assert!(!host_remove(&mut state, &contract(Some(1), "A")));
        assert!(!host_remove(&mut state, &contract(None, "B")));
        assert_eq!(state.contract_list.contract_list.len(), 1);
    }
}
