//! 検索結果の分類

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// 郵便番号（数字とハイフンのみ）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// 表示テキスト（"〒 123-4567" など）から数字とハイフンだけを取り出す。
    /// 全角数字・全角ハイフンは半角にそろえる
    pub fn extract(raw: &str) -> Self {
        let code = raw
            .chars()
            .filter_map(|c| match c {
                '0'..='9' | '-' => Some(c),
                '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32),
                '－' => Some('-'),
                _ => None,
            })
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `NNN-NNNN` 形式かどうか
    pub fn is_well_formed(&self) -> bool {
        match self.0.split_once('-') {
            Some((head, tail)) => {
                head.len() == 3
                    && tail.len() == 4
                    && head.bytes().all(|b| b.is_ascii_digit())
                    && tail.bytes().all(|b| b.is_ascii_digit())
            }
            None => false,
        }
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 1回の検索の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Success { postal_code: PostalCode },
    NoMatch { message: String },
    InteractionError { message: String },
    UnexpectedError { message: String },
}

impl ResolutionOutcome {
    pub fn unexpected(message: impl fmt::Display) -> Self {
        Self::UnexpectedError {
            message: format!("郵便番号取得中に予期しないエラーが発生しました: {}", message),
        }
    }

    pub fn postal_code(&self) -> Option<&PostalCode> {
        match self {
            Self::Success { postal_code } => Some(postal_code),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::NoMatch { message }
            | Self::InteractionError { message }
            | Self::UnexpectedError { message } => Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// セッション内の処理段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Launch,
    Navigate,
    SelectRegion,
    FillAndSubmit,
    AwaitResult,
    OpenDetail,
}

impl Step {
    pub fn label(self) -> &'static str {
        match self {
            Self::Launch => "ブラウザ起動",
            Self::Navigate => "ページ遷移",
            Self::SelectRegion => "都道府県選択",
            Self::FillAndSubmit => "住所入力・検索",
            Self::AwaitResult => "検索結果待機",
            Self::OpenDetail => "郵便番号取得",
        }
    }

    /// ページ操作の段階かどうか（起動・遷移以外）
    pub fn is_interaction(self) -> bool {
        !matches!(self, Self::Launch | Self::Navigate)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 失敗した段階とエラーから結果を決める
pub fn classify(step: Step, error: &LookupError) -> ResolutionOutcome {
    match (step, error) {
        (Step::AwaitResult, LookupError::Timeout(detail)) => ResolutionOutcome::NoMatch {
            message: format!("検索した住所は見つかりませんでした ({})", detail),
        },
        (Step::OpenDetail, LookupError::Timeout(detail)) => ResolutionOutcome::InteractionError {
            message: format!("郵便番号要素が見つかりませんでした: {}", detail),
        },
        (step, error) if step.is_interaction() && error.is_interaction() => {
            ResolutionOutcome::InteractionError {
                message: format!("{}に失敗しました: {}", step, error),
            }
        }
        (step, error) => ResolutionOutcome::unexpected(format!("{}: {}", step, error)),
    }
}
