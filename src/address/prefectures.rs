//! 都道府県名と都道府県コード (JIS X 0401) の対応表

use super::types::RegionCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefecture {
    pub name: &'static str,
    pub code: RegionCode,
}

const fn pref(name: &'static str, code: u8) -> Prefecture {
    Prefecture {
        name,
        code: RegionCode::from_static(code),
    }
}

/// コード順。先頭一致はこの順で判定する
pub static PREFECTURES: [Prefecture; 47] = [
    pref("北海道", 1),
    pref("青森県", 2),
    pref("岩手県", 3),
    pref("宮城県", 4),
    pref("秋田県", 5),
    pref("山形県", 6),
    pref("福島県", 7),
    pref("茨城県", 8),
    pref("栃木県", 9),
    pref("群馬県", 10),
    pref("埼玉県", 11),
    pref("千葉県", 12),
    pref("東京都", 13),
    pref("神奈川県", 14),
    pref("新潟県", 15),
    pref("富山県", 16),
    pref("石川県", 17),
    pref("福井県", 18),
    pref("山梨県", 19),
    pref("長野県", 20),
    pref("岐阜県", 21),
    pref("静岡県", 22),
    pref("愛知県", 23),
    pref("三重県", 24),
    pref("滋賀県", 25),
    pref("京都府", 26),
    pref("大阪府", 27),
    pref("兵庫県", 28),
    pref("奈良県", 29),
    pref("和歌山県", 30),
    pref("鳥取県", 31),
    pref("島根県", 32),
    pref("岡山県", 33),
    pref("広島県", 34),
    pref("山口県", 35),
    pref("徳島県", 36),
    pref("香川県", 37),
    pref("愛媛県", 38),
    pref("高知県", 39),
    pref("福岡県", 40),
    pref("佐賀県", 41),
    pref("長崎県", 42),
    pref("熊本県", 43),
    pref("大分県", 44),
    pref("宮崎県", 45),
    pref("鹿児島県", 46),
    pref("沖縄県", 47),
];

/// 都道府県名からコードを引く
pub fn lookup(name: &str) -> Option<RegionCode> {
    PREFECTURES.iter().find(|p| p.name == name).map(|p| p.code)
}

/// 先頭に一致する都道府県を返す
pub fn match_prefix(text: &str) -> Option<&'static Prefecture> {
    PREFECTURES.iter().find(|p| text.starts_with(p.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_sequential() {
        for (i, p) in PREFECTURES.iter().enumerate() {
            assert_eq!(usize::from(p.code.get()), i + 1, "{}", p.name);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("東京都").map(RegionCode::get), Some(13));
        assert_eq!(lookup("沖縄県").map(RegionCode::get), Some(47));
        assert_eq!(lookup("東京"), None);
    }

    #[test]
    fn test_no_name_is_prefix_of_another() {
        for a in PREFECTURES.iter() {
            for b in PREFECTURES.iter().filter(|b| b.name != a.name) {
                assert!(!b.name.starts_with(a.name), "{} / {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_match_prefix_only_at_start() {
        assert_eq!(match_prefix("京都府京都市").map(|p| p.name), Some("京都府"));
        assert_eq!(match_prefix("東京都千代田区").map(|p| p.name), Some("東京都"));
        assert!(match_prefix("千代田区東京都").is_none());
    }
}
