//! 住所の前処理モジュール
//!
//! 先頭の都道府県名を取り除き、検索フォームが受け付ける表記へ置換する

mod normalizer;
pub mod prefectures;
mod types;

pub use normalizer::{canonicalize, normalize, normalize_query, strip_prefecture};
pub use prefectures::{Prefecture, PREFECTURES};
pub use types::{AddressQuery, NormalizedQuery, RegionCode, MAX_ADDRESS_CHARS};
