//! レポート出力（CLI から利用）

#[cfg(feature = "excel")]
pub mod excel_core;
