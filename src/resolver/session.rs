//! 1回の検索に専有されるブラウザ・コンテキスト・ページ

use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::error::LookupError;
use crate::traits::{AutomationBrowser, AutomationContext, AutomationPage, BrowserLauncher};

/// `teardown` で消費されるまで資源を保持する
#[derive(Default)]
pub(crate) struct Session {
    browser: Option<Box<dyn AutomationBrowser>>,
    context: Option<Box<dyn AutomationContext>>,
    page: Option<Box<dyn AutomationPage>>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 起動 → 独立コンテキスト → ページ。途中で失敗しても取得済みの分は保持する
    pub(crate) async fn acquire(
        &mut self,
        launcher: &dyn BrowserLauncher,
        config: &ResolverConfig,
    ) -> Result<(), LookupError> {
        let browser = self.browser.insert(launcher.launch(config).await?);
        let context = self.context.insert(browser.new_context().await?);
        self.page = Some(context.new_page().await?);
        debug!("セッション取得完了");
        Ok(())
    }

    pub(crate) fn page(&mut self) -> Result<&mut Box<dyn AutomationPage>, LookupError> {
        self.page
            .as_mut()
            .ok_or_else(|| LookupError::BrowserInit("ページが初期化されていません".into()))
    }

    /// ページ → コンテキスト → ブラウザの順に閉じる。失敗はログのみ
    pub(crate) async fn teardown(mut self) {
        debug!("セッションを終了中...");

        if let Some(mut page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("ページの終了に失敗しました: {}", e);
            }
        }
        if let Some(mut context) = self.context.take() {
            if let Err(e) = context.close().await {
                warn!("ブラウザコンテキストの終了に失敗しました: {}", e);
            }
        }
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("ブラウザの終了に失敗しました: {}", e);
            }
        }

        debug!("セッション終了完了");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.page.is_some() || self.context.is_some() || self.browser.is_some() {
            warn!("セッションがteardownされずに破棄されました");
        }
    }
}
