//! UIコンポーネントモジュール

pub mod data_table;
pub mod optional_input;

pub use data_table::DataTable;
pub use optional_input::OptionalInput;
