use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::script;
use crate::config::ResolverConfig;
use crate::error::LookupError;
use crate::traits::{AriaRole, AutomationBrowser, AutomationContext, AutomationPage, BrowserLauncher};

/// 要素待機のポーリング間隔
const WAIT_POLL_INTERVAL_MS: u64 = 100;
/// ブラウザ終了後に子プロセスの終了を待つ上限
const BROWSER_EXIT_WAIT_SECS: u64 = 10;

/// `check` が true を返すまでポーリングする。1回ごとの評価も期限で打ち切る。
/// 期限切れ時、直前の評価が失敗していれば `Timeout` ではなく `JavaScript` エラー
async fn poll_until<F, Fut>(selector: &str, timeout: Duration, mut check: F) -> Result<(), LookupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, LookupError>>,
{
    let deadline = Instant::now() + timeout;
    let mut last_error: Option<LookupError> = None;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, check()).await {
            Ok(Ok(true)) => {
                debug!("要素検出: {}", selector);
                return Ok(());
            }
            Ok(Ok(false)) => last_error = None,
            // 画面遷移中は評価に失敗することがあるので期限までは続行
            Ok(Err(e)) => {
                debug!("要素待機中の評価エラー: {}", e);
                last_error = Some(e);
            }
            Err(_) => debug!("要素待機中の評価が期限内に終わりませんでした: {}", selector),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(match last_error {
                Some(e) => LookupError::JavaScript(format!(
                    "{} の待機中に評価が失敗しました: {}",
                    selector, e
                )),
                None => LookupError::Timeout(format!(
                    "{} が{}ms以内に表示されませんでした",
                    selector,
                    timeout.as_millis()
                )),
            });
        }
        sleep(Duration::from_millis(WAIT_POLL_INTERVAL_MS).min(deadline - now)).await;
    }
}

/// 子プロセスの終了待ちを `limit` で打ち切る
async fn wait_for_exit<T, Fut>(exit: Fut, limit: Duration) -> Result<(), String>
where
    Fut: Future<Output = std::io::Result<T>>,
{
    match tokio::time::timeout(limit, exit).await {
        Ok(result) => result.map(|_| ()).map_err(|e| e.to_string()),
        Err(_) => {
            warn!("ブラウザプロセスが{:?}以内に終了しませんでした", limit);
            Err(format!(
                "ブラウザプロセスが{}ms以内に終了しませんでした",
                limit.as_millis()
            ))
        }
    }
}

/// chromiumoxide でChromiumを起動する
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(
        &self,
        config: &ResolverConfig,
    ) -> Result<Box<dyn AutomationBrowser>, LookupError> {
        info!("ブラウザを起動中...");

        // 起動ごとにユーザーデータディレクトリを分ける
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("postal-lookup-{}", unique_id));

        let mut builder = BrowserConfig::builder()
            .user_data_dir(&user_data_dir)
            .window_size(1280, 800)
            .no_sandbox()
            .request_timeout(config.navigation_timeout)
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if let Some(path) = &config.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if !config.headless {
            builder = builder.with_head();
        }
        if config.debug {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        let browser_config = builder
            .build()
            .map_err(|e| LookupError::BrowserInit(format!("ブラウザ設定エラー: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| LookupError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser event error: {:?}", e);
                }
            }
        });

        info!("ブラウザ起動完了");
        Ok(Box::new(ChromiumBrowser {
            browser: Arc::new(Mutex::new(browser)),
            handler_task,
            user_data_dir,
        }))
    }
}

pub struct ChromiumBrowser {
    browser: Arc<Mutex<Browser>>,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
}

#[async_trait]
impl AutomationBrowser for ChromiumBrowser {
    async fn new_context(&mut self) -> Result<Box<dyn AutomationContext>, LookupError> {
        let response = self
            .browser
            .lock()
            .await
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| LookupError::BrowserInit(format!("コンテキスト作成エラー: {}", e)))?;

        let id = response.result.browser_context_id;
        debug!("ブラウザコンテキスト作成: {:?}", id);

        Ok(Box::new(ChromiumContext {
            browser: Arc::clone(&self.browser),
            id: Some(id),
        }))
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        let result = {
            let mut browser = self.browser.lock().await;
            match browser.close().await {
                Ok(_) => {
                    wait_for_exit(browser.wait(), Duration::from_secs(BROWSER_EXIT_WAIT_SECS))
                        .await
                }
                Err(e) => Err(e.to_string()),
            }
        };

        self.handler_task.abort();

        if let Err(e) = std::fs::remove_dir_all(&self.user_data_dir) {
            debug!("ユーザーデータディレクトリ削除失敗: {:?}: {}", self.user_data_dir, e);
        }

        result.map_err(|e| LookupError::BrowserInit(format!("ブラウザ終了エラー: {}", e)))
    }
}

pub struct ChromiumContext {
    browser: Arc<Mutex<Browser>>,
    id: Option<BrowserContextId>,
}

#[async_trait]
impl AutomationContext for ChromiumContext {
    async fn new_page(&mut self) -> Result<Box<dyn AutomationPage>, LookupError> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| LookupError::BrowserInit("コンテキストは終了済みです".into()))?;

        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(id)
            .build()
            .map_err(LookupError::BrowserInit)?;

        let page = self
            .browser
            .lock()
            .await
            .new_page(params)
            .await
            .map_err(|e| LookupError::BrowserInit(e.to_string()))?;

        Ok(Box::new(ChromiumPage { page: Some(page) }))
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        let Some(id) = self.id.take() else {
            return Ok(());
        };
        self.browser
            .lock()
            .await
            .execute(DisposeBrowserContextParams::new(id))
            .await
            .map(|_| ())
            .map_err(|e| LookupError::BrowserInit(format!("コンテキスト破棄エラー: {}", e)))
    }
}

pub struct ChromiumPage {
    page: Option<Page>,
}

impl ChromiumPage {
    fn get_page(&self) -> Result<&Page, LookupError> {
        self.page
            .as_ref()
            .ok_or_else(|| LookupError::Interaction("ページは閉じられています".into()))
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, js: String) -> Result<T, LookupError> {
        self.get_page()?
            .evaluate(js)
            .await
            .map_err(|e| LookupError::JavaScript(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| LookupError::JavaScript(e.to_string()))
    }

    /// ロールとネームで要素を探し、目印の属性を付ける
    async fn mark_by_role(&self, role: AriaRole, name: &str) -> Result<(), LookupError> {
        let found: bool = self.eval(script::find_by_role(role, name)).await?;
        if !found {
            return Err(LookupError::ElementNotFound(format!(
                "role={} name={}",
                role, name
            )));
        }
        Ok(())
    }

    async fn click_selector(&self, selector: &str) -> Result<(), LookupError> {
        self.get_page()?
            .find_element(selector)
            .await
            .map_err(|e| LookupError::ElementNotFound(format!("{}: {}", selector, e)))?
            .click()
            .await
            .map_err(|e| LookupError::Interaction(format!("{} クリック: {}", selector, e)))?;
        Ok(())
    }
}

#[async_trait]
impl AutomationPage for ChromiumPage {
    async fn goto(&mut self, url: &str) -> Result<(), LookupError> {
        self.get_page()?
            .goto(url)
            .await
            .map_err(|e| LookupError::Navigation(e.to_string()))?;
        debug!("ページ遷移完了: {}", url);
        Ok(())
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), LookupError> {
        let status: String = self.eval(script::select_option(selector, value)).await?;
        match status.as_str() {
            "ok" => Ok(()),
            "missing" => Err(LookupError::ElementNotFound(selector.to_string())),
            _ => Err(LookupError::Interaction(format!(
                "{} に選択肢 {} がありません",
                selector, value
            ))),
        }
    }

    async fn fill_by_role(
        &mut self,
        role: AriaRole,
        name: &str,
        text: &str,
    ) -> Result<(), LookupError> {
        self.mark_by_role(role, name).await?;
        self.click_selector(script::TARGET_SELECTOR).await?;

        let filled: bool = self
            .eval(script::set_value(script::TARGET_SELECTOR, text))
            .await?;
        if !filled {
            return Err(LookupError::Interaction(format!("{} への入力に失敗", name)));
        }
        Ok(())
    }

    async fn click_by_role(&mut self, role: AriaRole, name: &str) -> Result<(), LookupError> {
        self.mark_by_role(role, name).await?;
        self.click_selector(script::TARGET_SELECTOR).await
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), LookupError> {
        let check_js = script::exists(selector);
        let page: &ChromiumPage = self;
        poll_until(selector, timeout, move || page.eval::<bool>(check_js.clone())).await
    }

    async fn click(&mut self, selector: &str) -> Result<(), LookupError> {
        self.click_selector(selector).await
    }

    async fn text_content(&mut self, selector: &str) -> Result<String, LookupError> {
        let text: Option<String> = self.eval(script::text_content(selector)).await?;
        text.ok_or_else(|| LookupError::ElementNotFound(selector.to_string()))
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, LookupError> {
        self.get_page()?
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| LookupError::Interaction(format!("スクリーンショット: {}", e)))
    }

    async fn close(&mut self) -> Result<(), LookupError> {
        match self.page.take() {
            Some(page) => page
                .close()
                .await
                .map_err(|e| LookupError::Interaction(format!("ページ終了エラー: {}", e))),
            None => Ok(()),
        }
    }
}
