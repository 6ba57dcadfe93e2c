//! テスト用のブラウザ層。呼び出しを記録する

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ResolverConfig;
use crate::error::LookupError;
use crate::traits::{AriaRole, AutomationBrowser, AutomationContext, AutomationPage, BrowserLauncher};

#[derive(Debug, Clone)]
pub(crate) struct FakeBehavior {
    pub fail_launch: bool,
    pub fail_context: bool,
    pub fail_goto: bool,
    pub hang_goto: bool,
    pub fail_fill: bool,
    pub fail_select: bool,
    /// 検索ボタンのクリック
    pub fail_click: bool,
    /// 結果リンク (a.line) のクリック
    pub fail_open: bool,
    /// 結果待機中の評価エラー
    pub fail_wait: bool,
    pub fail_close: bool,
    pub has_result: bool,
    pub has_detail: bool,
    /// 未指定なら選択中の都道府県から決める
    pub zip_text: Option<String>,
}

impl Default for FakeBehavior {
    fn default() -> Self {
        Self {
            fail_launch: false,
            fail_context: false,
            fail_goto: false,
            hang_goto: false,
            fail_fill: false,
            fail_select: false,
            fail_click: false,
            fail_open: false,
            fail_wait: false,
            fail_close: false,
            has_result: true,
            has_detail: true,
            zip_text: None,
        }
    }
}

#[derive(Clone)]
pub(crate) struct FakeLauncher {
    behavior: Arc<FakeBehavior>,
    events: Arc<Mutex<Vec<String>>>,
}

impl FakeLauncher {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior: Arc::new(behavior),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.lock().unwrap().iter().filter(|e| *e == event).count()
    }

    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    fn close_result(&self, what: &str) -> Result<(), LookupError> {
        self.record(format!("close:{}", what));
        if self.behavior.fail_close {
            Err(LookupError::Interaction(format!("{} close failed", what)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(
        &self,
        _config: &ResolverConfig,
    ) -> Result<Box<dyn AutomationBrowser>, LookupError> {
        if self.behavior.fail_launch {
            return Err(LookupError::BrowserInit("chromium not found".into()));
        }
        self.record("launch");
        Ok(Box::new(FakeBrowser {
            launcher: self.clone(),
        }))
    }
}

struct FakeBrowser {
    launcher: FakeLauncher,
}

#[async_trait]
impl AutomationBrowser for FakeBrowser {
    async fn new_context(&mut self) -> Result<Box<dyn AutomationContext>, LookupError> {
        if self.launcher.behavior.fail_context {
            return Err(LookupError::BrowserInit("context refused".into()));
        }
        self.launcher.record("new_context");
        Ok(Box::new(FakeContext {
            launcher: self.launcher.clone(),
        }))
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        self.launcher.close_result("browser")
    }
}

struct FakeContext {
    launcher: FakeLauncher,
}

#[async_trait]
impl AutomationContext for FakeContext {
    async fn new_page(&mut self) -> Result<Box<dyn AutomationPage>, LookupError> {
        self.launcher.record("new_page");
        Ok(Box::new(FakePage {
            launcher: self.launcher.clone(),
            selected: None,
            filled: None,
            submitted: false,
            detail_open: false,
        }))
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        self.launcher.close_result("context")
    }
}

/// ページごとにフォームの状態を持つ
struct FakePage {
    launcher: FakeLauncher,
    selected: Option<String>,
    filled: Option<String>,
    submitted: bool,
    detail_open: bool,
}

impl FakePage {
    fn behavior(&self) -> &FakeBehavior {
        &self.launcher.behavior
    }

    fn zip_text(&self) -> String {
        if let Some(text) = &self.behavior().zip_text {
            return text.clone();
        }
        match self.selected.as_deref() {
            Some("12") => "〒 289-1712".to_string(),
            Some("13") => "〒 100-0013".to_string(),
            _ => "〒 000-0000".to_string(),
        }
    }
}

#[async_trait]
impl AutomationPage for FakePage {
    async fn goto(&mut self, url: &str) -> Result<(), LookupError> {
        self.launcher.record(format!("goto:{}", url));
        if self.behavior().hang_goto {
            std::future::pending::<()>().await;
        }
        if self.behavior().fail_goto {
            return Err(LookupError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()));
        }
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), LookupError> {
        if self.behavior().fail_select {
            return Err(LookupError::Interaction(format!("{} に選択肢 {} がありません", selector, value)));
        }
        self.launcher.record(format!("select:{}", value));
        tokio::task::yield_now().await;
        self.selected = Some(value.to_string());
        Ok(())
    }

    async fn fill_by_role(
        &mut self,
        role: AriaRole,
        _name: &str,
        text: &str,
    ) -> Result<(), LookupError> {
        if self.behavior().fail_fill {
            return Err(LookupError::ElementNotFound(format!("role={}", role)));
        }
        self.launcher.record(format!("fill:{}", text));
        tokio::task::yield_now().await;
        self.filled = Some(text.to_string());
        Ok(())
    }

    async fn click_by_role(&mut self, role: AriaRole, name: &str) -> Result<(), LookupError> {
        self.launcher.record(format!("click_role:{}:{}", role, name));
        if self.behavior().fail_click {
            return Err(LookupError::ElementNotFound(format!("role={} name={}", role, name)));
        }
        if self.filled.is_none() {
            return Err(LookupError::Interaction("検索語が未入力です".into()));
        }
        self.submitted = true;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), LookupError> {
        self.launcher.record(format!("wait:{}", selector));
        tokio::task::yield_now().await;
        if selector == "a.line" && self.behavior().fail_wait {
            return Err(LookupError::JavaScript(format!(
                "{} の待機中に評価が失敗しました: Target closed",
                selector
            )));
        }
        let visible = match selector {
            "a.line" => self.submitted && self.behavior().has_result,
            "span.zip-code" => self.detail_open && self.behavior().has_detail,
            _ => false,
        };
        if visible {
            Ok(())
        } else {
            tokio::time::sleep(timeout).await;
            Err(LookupError::Timeout(format!(
                "{} が{}ms以内に表示されませんでした",
                selector,
                timeout.as_millis()
            )))
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), LookupError> {
        self.launcher.record(format!("click:{}", selector));
        if self.behavior().fail_open {
            return Err(LookupError::Interaction(format!("{} クリック: detached", selector)));
        }
        if selector == "a.line" {
            self.detail_open = true;
        }
        Ok(())
    }

    async fn text_content(&mut self, selector: &str) -> Result<String, LookupError> {
        self.launcher.record(format!("text:{}", selector));
        Ok(self.zip_text())
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        self.launcher.close_result("page")
    }
}
