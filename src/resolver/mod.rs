//! 郵便番号検索ページを操作して郵便番号を取得する
//!
//! 1回の検索ごとにブラウザを起動し、独立したコンテキストで
//! 都道府県選択 → 住所入力 → 検索 → 結果リンク → 郵便番号表示 と進める。
//! 結果は [`ResolutionOutcome`] に分類され、資源はどの経路でも解放される。

mod outcome;
mod session;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use base64::Engine;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::address::NormalizedQuery;
use crate::browser::ChromiumLauncher;
use crate::config::ResolverConfig;
use crate::error::LookupError;
use crate::traits::{AriaRole, BrowserLauncher};

pub use outcome::{classify, PostalCode, ResolutionOutcome, Step};
use session::Session;

const PREF_SELECTOR: &str = r#"select[name="pref"]"#;
const TOWN_INPUT_NAME: &str = "市区町村・町名";
const SEARCH_BUTTON_NAME: &str = "郵便番号を検索";
const RESULT_LINK_SELECTOR: &str = "a.line";
const ZIP_CODE_SELECTOR: &str = "span.zip-code";

struct StepFailure {
    step: Step,
    error: LookupError,
}

trait StepResultExt<T> {
    fn at(self, step: Step) -> Result<T, StepFailure>;
}

impl<T> StepResultExt<T> for Result<T, LookupError> {
    fn at(self, step: Step) -> Result<T, StepFailure> {
        self.map_err(|error| StepFailure { step, error })
    }
}

/// 検索ごとに専用セッションを作る。設定とランチャー以外の状態は持たない
#[derive(Clone)]
pub struct Resolver {
    config: Arc<ResolverConfig>,
    launcher: Arc<dyn BrowserLauncher>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_launcher(config, Arc::new(ChromiumLauncher::new()))
    }

    pub fn with_launcher(config: ResolverConfig, launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            config: Arc::new(config),
            launcher,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub async fn resolve(&self, query: &NormalizedQuery) -> ResolutionOutcome {
        self.resolve_with_cancel(query, CancellationToken::new()).await
    }

    /// `cancel` が発火した場合も後始末をしてから `UnexpectedError` を返す
    pub async fn resolve_with_cancel(
        &self,
        query: &NormalizedQuery,
        cancel: CancellationToken,
    ) -> ResolutionOutcome {
        info!(
            "郵便番号検索開始: town={}, region={:?}",
            query.town, query.region
        );

        let mut session = Session::new();
        let outcome = {
            let run = self.run(&mut session, query);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("郵便番号検索がキャンセルされました");
                    ResolutionOutcome::unexpected("キャンセルされました")
                }
                _ = sleep(self.config.session_timeout) => {
                    warn!("郵便番号検索が{:?}以内に完了しませんでした", self.config.session_timeout);
                    ResolutionOutcome::unexpected(format!(
                        "{}ms以内に完了しませんでした",
                        self.config.session_timeout.as_millis()
                    ))
                }
                outcome = run => outcome,
            }
        };
        session.teardown().await;

        match &outcome {
            ResolutionOutcome::Success { postal_code } => {
                info!("郵便番号検索完了: {} -> {}", query.town, postal_code)
            }
            ResolutionOutcome::NoMatch { message } => info!("{}: {}", message, query.town),
            ResolutionOutcome::InteractionError { message }
            | ResolutionOutcome::UnexpectedError { message } => warn!("{}", message),
        }
        outcome
    }

    async fn run(&self, session: &mut Session, query: &NormalizedQuery) -> ResolutionOutcome {
        match self.steps(session, query).await {
            Ok(postal_code) => ResolutionOutcome::Success { postal_code },
            Err(StepFailure { step, error }) => {
                debug!("{}で失敗: {:?}", step, error);
                if self.config.debug && step.is_interaction() {
                    self.capture_screenshot(session).await;
                }
                classify(step, &error)
            }
        }
    }

    async fn steps(
        &self,
        session: &mut Session,
        query: &NormalizedQuery,
    ) -> Result<PostalCode, StepFailure> {
        let config = &self.config;

        session
            .acquire(self.launcher.as_ref(), config)
            .await
            .at(Step::Launch)?;
        let page = session.page().at(Step::Launch)?;

        timeout(config.navigation_timeout, page.goto(&config.entry_url))
            .await
            .map_err(|_| {
                LookupError::Timeout(format!(
                    "{} の読み込みが{}ms以内に完了しませんでした",
                    config.entry_url,
                    config.navigation_timeout.as_millis()
                ))
            })
            .and_then(|result| result)
            .at(Step::Navigate)?;

        if let Some(region) = query.region {
            page.select_option(PREF_SELECTOR, &region.to_string())
                .await
                .at(Step::SelectRegion)?;
            debug!("都道府県選択完了: {}", region);
        }

        page.fill_by_role(AriaRole::Textbox, TOWN_INPUT_NAME, &query.town)
            .await
            .at(Step::FillAndSubmit)?;
        page.click_by_role(AriaRole::Button, SEARCH_BUTTON_NAME)
            .await
            .at(Step::FillAndSubmit)?;
        debug!("検索ボタンクリック完了");

        page.wait_for(RESULT_LINK_SELECTOR, config.result_timeout)
            .await
            .at(Step::AwaitResult)?;

        page.click(RESULT_LINK_SELECTOR).await.at(Step::OpenDetail)?;
        page.wait_for(ZIP_CODE_SELECTOR, config.detail_timeout)
            .await
            .at(Step::OpenDetail)?;
        let text = page
            .text_content(ZIP_CODE_SELECTOR)
            .await
            .at(Step::OpenDetail)?;

        let postal_code = PostalCode::extract(&text);
        if !postal_code.is_well_formed() {
            return Err(StepFailure {
                step: Step::OpenDetail,
                error: LookupError::Interaction(format!(
                    "郵便番号を読み取れませんでした: {:?}",
                    text.trim()
                )),
            });
        }
        Ok(postal_code)
    }

    async fn capture_screenshot(&self, session: &mut Session) {
        let Ok(page) = session.page() else {
            return;
        };
        match page.screenshot().await {
            Ok(png) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
                debug!("失敗時のスクリーンショット: data:image/png;base64,{}", encoded);
            }
            Err(e) => debug!("スクリーンショット取得失敗: {}", e),
        }
    }
}
