//! 契約一覧ページ
//!
//! 汎用テーブルに Contract の表示・編集・検証を与え、
//! 確定した操作を外部から渡されたディスパッチへそのまま渡す。

use leptos::*;
use std::rc::Rc;

use crate::components::data_table::{ControlKind, EditControl, RowCommands, RowConfig};
use crate::components::DataTable;
use crate::errors::DraftError;
use crate::models::{AppState, Contract, ContractDraft, LimitField};

pub const TITLE: &str = "Contracts";

// 列見出しは「Hours」だが値は分単位（既存の表記のまま）
pub const COLUMN_TITLES: [&str; 5] = [
    "Name",
    "Max Hours Per Day",
    "Max Hours Per Week",
    "Max Hours Per Month",
    "Max Hours Per Year",
];

/// 状態スナップショットから取り出すページの入力
#[derive(Debug, Clone, PartialEq)]
pub struct ContractsPageData {
    pub title: &'static str,
    pub column_titles: Vec<&'static str>,
    pub table_data: Vec<Contract>,
    pub tenant_id: u32,
}

pub fn page_props(state: &AppState) -> ContractsPageData {
    ContractsPageData {
        title: TITLE,
        column_titles: COLUMN_TITLES.to_vec(),
        table_data: state.contract_list.contract_list.clone(),
        tenant_id: state.tenant_data.current_tenant_id,
    }
}

/// Contract 用のテーブル設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractTable {
    tenant_id: u32,
}

impl ContractTable {
    pub fn new(tenant_id: u32) -> Self {
        ContractTable { tenant_id }
    }
}

fn limit_cell(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl RowConfig for ContractTable {
    type Row = Contract;
    type Key = Option<u32>;
    type Draft = ContractDraft;
    type Error = DraftError;

    fn row_key(&self, row: &Contract) -> Option<u32> {
        row.id
    }

    fn new_draft(&self) -> ContractDraft {
        ContractDraft::for_tenant(self.tenant_id)
    }

    fn to_draft(&self, row: &Contract) -> ContractDraft {
        ContractDraft::from(row.clone())
    }

    fn display_row(&self, row: &Contract) -> Vec<String> {
        std::iter::once(row.name.clone())
            .chain(LimitField::ALL.iter().map(|&field| limit_cell(row.limit(field))))
            .collect()
    }

    fn edit_row(&self, draft: &ContractDraft) -> Vec<EditControl<ContractDraft>> {
        let name = EditControl {
            label: "Name",
            kind: ControlKind::Text {
                name: "name",
                value: draft.name.clone().unwrap_or_default(),
                apply: Rc::new(|d: &mut ContractDraft, v| d.name = Some(v)),
            },
        };
        let limits = LimitField::ALL.into_iter().map(|field| EditControl {
            label: field.label(),
            kind: ControlKind::OptionalNumber {
                value: draft.limit(field),
                apply: Rc::new(move |d: &mut ContractDraft, v| d.set_limit(field, v)),
            },
        });
        std::iter::once(name).chain(limits).collect()
    }

    fn validate(&self, draft: &ContractDraft) -> Result<Contract, DraftError> {
        Contract::try_from(draft.clone())
    }
}

/// 外部の状態管理への追加・更新・削除の入口
#[derive(Clone)]
pub struct ContractDispatch {
    pub add_contract: Rc<dyn Fn(Contract)>,
    pub update_contract: Rc<dyn Fn(Contract)>,
    pub remove_contract: Rc<dyn Fn(Contract)>,
}

impl RowCommands<Contract> for ContractDispatch {
    fn add(&self, row: Contract) {
        (self.add_contract)(row);
    }

    fn update(&self, row: Contract) {
        (self.update_contract)(row);
    }

    fn remove(&self, row: Contract) {
        (self.remove_contract)(row);
    }
}

/// 契約一覧ページコンポーネント
#[component]
pub fn ContractsPage(
    #[prop(into)] state: Signal<AppState>,
    dispatch: ContractDispatch,
) -> impl IntoView {
    let props = create_memo(move |_| state.with(page_props));
    let rows = Signal::derive(move || props.with(|p| p.table_data.clone()));
    let tenant_id = create_memo(move |_| props.with(|p| p.tenant_id));

    // テナントが切り替わったときだけテーブルを作り直す（編集中の行は破棄）
    view! {
        <div class="contracts-page">
            {move || {
                let p = props.get_untracked();
                view! {
                    <DataTable
                        title=p.title
                        column_titles=p.column_titles
                        rows=rows
                        config=ContractTable::new(tenant_id.get())
                        commands=dispatch.clone()
                    />
                }
            }}
        </div>
    }
}
