//! フィールド正規化モジュール
//!
//! 生の文字列（モデル名、規格、ねじ、径、角度・シリーズ表記）を
//! 型付きの正規値に変換する純粋関数群。
//!
//! どの関数も不正な入力で失敗せず、判定できなければ `None` を返す。

pub mod numeric;
pub mod size;
pub mod standard;
pub mod construction;
pub mod fitting;
pub mod thread;
pub mod category;

pub use numeric::{clean_text, normalize_decimal, round1};
pub use size::{
    dash_to_mm, find_dn, inch_from_dash, inch_to_mm, normalize_inch, parse_dash_code, parse_dn, resolve_size_mm,
};
pub use standard::{find_standard_text, infer_standard_from_model, normalize_standard, standard_lookahead};
pub use construction::normalize_construction;
pub use fitting::{normalize_angle, normalize_gender, normalize_seat_type, normalize_series};
pub use thread::{extract_thread_size, normalize_thread_size, parse_tube_od, series_from_article, series_from_lookup};
pub use category::{
    category_from_text, connection_from, seat_from_category, standard_from_category, thread_family_from,
};
