//! 住所検索まわりの型定義

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// 住所入力の最大文字数
pub const MAX_ADDRESS_CHARS: usize = 100;

/// 都道府県コード (1〜47)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RegionCode(u8);

impl RegionCode {
    pub fn new(code: u8) -> Result<Self, LookupError> {
        if (1..=47).contains(&code) {
            Ok(Self(code))
        } else {
            Err(LookupError::InvalidInput(format!(
                "都道府県コードは1〜47で指定してください: {}",
                code
            )))
        }
    }

    pub(crate) const fn from_static(code: u8) -> Self {
        Self(code)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for RegionCode {
    type Error = LookupError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<RegionCode> for u8 {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 呼び出し元から受け取った住所
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    address: String,
    region: Option<RegionCode>,
}

impl AddressQuery {
    pub fn new(address: impl Into<String>, region: Option<RegionCode>) -> Result<Self, LookupError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(LookupError::InvalidInput("住所が空です".into()));
        }
        let len = address.chars().count();
        if len > MAX_ADDRESS_CHARS {
            return Err(LookupError::InvalidInput(format!(
                "住所は{}文字以内で指定してください ({}文字)",
                MAX_ADDRESS_CHARS, len
            )));
        }
        Ok(Self { address, region })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn region(&self) -> Option<RegionCode> {
        self.region
    }
}

/// 検索フォームに入力する形に整えた住所
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// 市区町村・町名
    pub town: String,
    /// 先頭から取り除いた都道府県名
    pub prefecture: Option<&'static str>,
    pub region: Option<RegionCode>,
}

impl NormalizedQuery {
    pub fn new(town: impl Into<String>) -> Self {
        Self {
            town: town.into(),
            prefecture: None,
            region: None,
        }
    }

    pub fn with_region(mut self, region: Option<RegionCode>) -> Self {
        self.region = region;
        self
    }
}
