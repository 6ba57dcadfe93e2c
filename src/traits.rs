use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ResolverConfig;
use crate::error::LookupError;

/// アクセシブルロール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaRole {
    Textbox,
    Button,
}

impl AriaRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Textbox => "textbox",
            Self::Button => "button",
        }
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ブラウザ起動
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, config: &ResolverConfig)
        -> Result<Box<dyn AutomationBrowser>, LookupError>;
}

#[async_trait]
pub trait AutomationBrowser: Send {
    /// Cookie等を共有しない独立したブラウザコンテキストを作成
    async fn new_context(&mut self) -> Result<Box<dyn AutomationContext>, LookupError>;

    async fn close(&mut self) -> Result<(), LookupError>;
}

#[async_trait]
pub trait AutomationContext: Send {
    async fn new_page(&mut self) -> Result<Box<dyn AutomationPage>, LookupError>;

    async fn close(&mut self) -> Result<(), LookupError>;
}

#[async_trait]
pub trait AutomationPage: Send {
    async fn goto(&mut self, url: &str) -> Result<(), LookupError>;

    /// `<select>` の選択肢を value もしくはラベルで選ぶ
    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), LookupError>;

    /// ロールとアクセシブルネームで特定した要素にフォーカスして値を設定
    async fn fill_by_role(&mut self, role: AriaRole, name: &str, text: &str)
        -> Result<(), LookupError>;

    async fn click_by_role(&mut self, role: AriaRole, name: &str) -> Result<(), LookupError>;

    /// 要素の出現を待つ。時間内に現れなければ `LookupError::Timeout`
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), LookupError>;

    /// 最初に一致した要素をクリック
    async fn click(&mut self, selector: &str) -> Result<(), LookupError>;

    async fn text_content(&mut self, selector: &str) -> Result<String, LookupError>;

    /// PNGスクリーンショット（デバッグ用）
    async fn screenshot(&mut self) -> Result<Vec<u8>, LookupError> {
        Err(LookupError::Interaction("スクリーンショット未対応".into()))
    }

    async fn close(&mut self) -> Result<(), LookupError>;
}
