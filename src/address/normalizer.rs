//! 住所の前処理
//!
//! 入力のヒントは https://www.post.japanpost.jp/cgi-zip/zipcode.php を参照。

use tracing::debug;

use super::prefectures::{self, Prefecture};
use super::types::{AddressQuery, NormalizedQuery};

/// 検索フォームが受け付けない表記 → 受け付ける表記
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("霞ヶ関", "霞が関"),
    ("紀ノ川市", "紀の川市"),
    // 新字 → 旧字
    ("桧原村", "檜原村"),
];

/// 先頭の都道府県名を取り除く
pub fn strip_prefecture(address: &str) -> (&str, Option<&'static Prefecture>) {
    match prefectures::match_prefix(address) {
        Some(pref) => (address[pref.name.len()..].trim(), Some(pref)),
        None => (address.trim(), None),
    }
}

/// 表記ゆれを置換する
pub fn canonicalize(text: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(text.to_string(), |acc, (old, new)| acc.replace(old, new))
}

pub fn normalize(raw: &str) -> NormalizedQuery {
    let (rest, pref) = strip_prefecture(raw);
    let town = canonicalize(rest);
    debug!("住所を正規化: {} -> {} (都道府県: {:?})", raw, town, pref.map(|p| p.name));

    NormalizedQuery {
        town,
        prefecture: pref.map(|p| p.name),
        region: pref.map(|p| p.code),
    }
}

/// 呼び出し元が都道府県コードを指定していればそちらを優先する
pub fn normalize_query(query: &AddressQuery) -> NormalizedQuery {
    let mut normalized = normalize(query.address());
    if let Some(region) = query.region() {
        normalized.region = Some(region);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::types::RegionCode;

    #[test]
    fn test_chiba_example() {
        let q = normalize("千葉県山武郡横芝光町宮川");
        assert_eq!(q.town, "山武郡横芝光町宮川");
        assert_eq!(q.prefecture, Some("千葉県"));
        assert_eq!(q.region.map(RegionCode::get), Some(12));
    }

    #[test]
    fn test_tokyo_kasumigaseki_example() {
        let q = normalize("東京都霞ヶ関");
        assert_eq!(q.town, "霞が関");
        assert_eq!(q.prefecture, Some("東京都"));
        assert_eq!(q.region.map(RegionCode::get), Some(13));
    }

    #[test]
    fn test_all_substitutions_applied() {
        assert_eq!(canonicalize("和歌山県紀ノ川市"), "和歌山県紀の川市");
        assert_eq!(canonicalize("西多摩郡桧原村"), "西多摩郡檜原村");
        assert_eq!(canonicalize("霞ヶ関霞ヶ関"), "霞が関霞が関");
        for (old, _) in SUBSTITUTIONS {
            assert!(!canonicalize(old).contains(old));
        }
    }

    #[test]
    fn test_idempotent_on_canonical_text() {
        for input in ["霞が関", "紀の川市", "檜原村", "山武郡横芝光町宮川"] {
            assert_eq!(canonicalize(input), input);
            let once = normalize(input);
            assert_eq!(normalize(&once.town).town, once.town);
        }
    }

    #[test]
    fn test_without_prefecture() {
        let q = normalize("千代田区霞ヶ関");
        assert_eq!(q.town, "千代田区霞が関");
        assert!(q.prefecture.is_none());
        assert!(q.region.is_none());
    }

    #[test]
    fn test_prefecture_not_at_start_is_kept() {
        let q = normalize("新宿区東京都庁前");
        assert_eq!(q.town, "新宿区東京都庁前");
        assert!(q.prefecture.is_none());
    }

    #[test]
    fn test_whitespace_after_prefecture_is_trimmed() {
        let (rest, pref) = strip_prefecture("大阪府 大阪市北区");
        assert_eq!(rest, "大阪市北区");
        assert_eq!(pref.map(|p| p.name), Some("大阪府"));
    }

    #[test]
    fn test_explicit_region_wins() {
        let query = AddressQuery::new("千葉県山武郡横芝光町宮川", Some(RegionCode::new(13).unwrap()))
            .unwrap();
        let q = normalize_query(&query);
        assert_eq!(q.prefecture, Some("千葉県"));
        assert_eq!(q.region.map(RegionCode::get), Some(13));

        let query = AddressQuery::new("霞ヶ関", None).unwrap();
        assert!(normalize_query(&query).region.is_none());
    }
}
