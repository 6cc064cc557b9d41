//! データ構造体モジュール

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DraftError;

// ============================================
// 契約（勤務時間の上限セット）
// ============================================

/// 従業員に適用される勤務時間上限（単位は分）。
/// 上限が `None` の項目は「上限なし」を表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(default)]
    pub tenant_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub maximum_minutes_per_day: Option<u32>,
    #[serde(default)]
    pub maximum_minutes_per_week: Option<u32>,
    #[serde(default)]
    pub maximum_minutes_per_month: Option<u32>,
    #[serde(default)]
    pub maximum_minutes_per_year: Option<u32>,
}

impl Contract {
    pub fn limit(&self, field: LimitField) -> Option<u32> {
        match field {
            LimitField::Day => self.maximum_minutes_per_day,
            LimitField::Week => self.maximum_minutes_per_week,
            LimitField::Month => self.maximum_minutes_per_month,
            LimitField::Year => self.maximum_minutes_per_year,
        }
    }
}

/// 4つの上限項目。変換・検証ルールは共通で、ラベルだけが異なる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitField {
    Day,
    Week,
    Month,
    Year,
}

impl LimitField {
    pub const ALL: [LimitField; 4] = [
        LimitField::Day,
        LimitField::Week,
        LimitField::Month,
        LimitField::Year,
    ];

    /// 編集欄のラベル
    pub fn label(self) -> &'static str {
        match self {
            LimitField::Day => "Max minutes per day",
            LimitField::Week => "Max minutes per week",
            LimitField::Month => "Max minutes per month",
            LimitField::Year => "Max minutes per year",
        }
    }
}

impl fmt::Display for LimitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================
// 編集中ドラフト
// ============================================

/// 編集途中の Contract。
///
/// 上限項目は `Option<Option<u32>>`:
/// - `None` … 未入力（確定不可）
/// - `Some(None)` … 上限なし
/// - `Some(Some(n))` … n 分
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractDraft {
    pub tenant_id: u32,
    pub id: Option<u32>,
    pub version: Option<u32>,
    pub name: Option<String>,
    pub maximum_minutes_per_day: Option<Option<u32>>,
    pub maximum_minutes_per_week: Option<Option<u32>>,
    pub maximum_minutes_per_month: Option<Option<u32>>,
    pub maximum_minutes_per_year: Option<Option<u32>>,
}

impl ContractDraft {
    /// 新規行用の空ドラフト
    pub fn for_tenant(tenant_id: u32) -> Self {
        ContractDraft {
            tenant_id,
            ..Default::default()
        }
    }

    pub fn limit(&self, field: LimitField) -> Option<Option<u32>> {
        match field {
            LimitField::Day => self.maximum_minutes_per_day,
            LimitField::Week => self.maximum_minutes_per_week,
            LimitField::Month => self.maximum_minutes_per_month,
            LimitField::Year => self.maximum_minutes_per_year,
        }
    }

    pub fn set_limit(&mut self, field: LimitField, value: Option<Option<u32>>) {
        let slot = match field {
            LimitField::Day => &mut self.maximum_minutes_per_day,
            LimitField::Week => &mut self.maximum_minutes_per_week,
            LimitField::Month => &mut self.maximum_minutes_per_month,
            LimitField::Year => &mut self.maximum_minutes_per_year,
        };
        *slot = value;
    }

    pub fn is_valid(&self) -> bool {
        Contract::try_from(self.clone()).is_ok()
    }
}

impl From<Contract> for ContractDraft {
    fn from(contract: Contract) -> Self {
        ContractDraft {
            tenant_id: contract.tenant_id,
            id: contract.id,
            version: contract.version,
            name: Some(contract.name),
            maximum_minutes_per_day: Some(contract.maximum_minutes_per_day),
            maximum_minutes_per_week: Some(contract.maximum_minutes_per_week),
            maximum_minutes_per_month: Some(contract.maximum_minutes_per_month),
            maximum_minutes_per_year: Some(contract.maximum_minutes_per_year),
        }
    }
}

impl TryFrom<ContractDraft> for Contract {
    type Error = DraftError;

    fn try_from(draft: ContractDraft) -> Result<Self, Self::Error> {
        let name = draft.name.ok_or(DraftError::MissingName)?;
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }
        let limit = |field: LimitField, value: Option<Option<u32>>| {
            value.ok_or(DraftError::MissingLimit(field))
        };

        Ok(Contract {
            tenant_id: draft.tenant_id,
            id: draft.id,
            version: draft.version,
            name,
            maximum_minutes_per_day: limit(LimitField::Day, draft.maximum_minutes_per_day)?,
            maximum_minutes_per_week: limit(LimitField::Week, draft.maximum_minutes_per_week)?,
            maximum_minutes_per_month: limit(LimitField::Month, draft.maximum_minutes_per_month)?,
            maximum_minutes_per_year: limit(LimitField::Year, draft.maximum_minutes_per_year)?,
        })
    }
}

// ============================================
// アプリ全体の状態スナップショット
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub tenant_data: TenantData,
    pub contract_list: ContractListState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantData {
    pub current_tenant_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractListState {
    #[serde(default)]
    pub contract_list: Vec<Contract>,
}
