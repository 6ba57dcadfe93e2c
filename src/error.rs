use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("要素の操作中にエラーが発生しました: {0}")]
    Interaction(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("入力エラー: {0}")]
    InvalidInput(String),

    #[error("設定エラー: {0}")]
    Config(String),
}

impl LookupError {
    /// ページ操作層で想定されるエラーかどうか
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound(_) | Self::Interaction(_) | Self::JavaScript(_) | Self::Timeout(_)
        )
    }
}
