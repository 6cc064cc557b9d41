//! ビューモジュール

pub mod contracts_page;

pub use contracts_page::{ContractDispatch, ContractsPage};
