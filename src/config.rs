use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::LookupError;

/// 日本郵便 郵便番号検索ページ
pub const JPPOST_URL: &str = "https://www.post.japanpost.jp/zipcode/";

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub entry_url: String,
    pub headless: bool,
    /// 未指定の場合は chromiumoxide の自動検出に任せる
    pub chrome_path: Option<PathBuf>,
    pub navigation_timeout: Duration,
    /// 検索結果リンク (a.line) の待機時間
    pub result_timeout: Duration,
    /// 郵便番号表示要素 (span.zip-code) の待機時間
    pub detail_timeout: Duration,
    /// ナビゲーションから抽出までの全体上限
    pub session_timeout: Duration,
    /// 操作失敗時にスクリーンショットをdebugログへ出力
    pub debug: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            entry_url: JPPOST_URL.to_string(),
            headless: true,
            chrome_path: None,
            navigation_timeout: Duration::from_secs(30),
            result_timeout: Duration::from_millis(1000),
            detail_timeout: Duration::from_millis(1000),
            session_timeout: Duration::from_secs(60),
            debug: false,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 環境変数から設定を読み込む（未設定の項目はデフォルト値）
    pub fn from_env() -> Result<Self, LookupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, LookupError> {
        let mut config = Self::default();

        if let Some(path) = get("CHROME_PATH").or_else(|| get("CHROMIUM_PATH")) {
            config.chrome_path = Some(PathBuf::from(path));
        }
        if let Some(headless) = parse_var::<bool>(&get, "HEADLESS")? {
            config.headless = headless;
        }
        if let Some(debug) = parse_var::<bool>(&get, "SCRAPER_DEBUG")? {
            config.debug = debug;
        }
        if let Some(ms) = parse_var::<u64>(&get, "NAVIGATION_TIMEOUT_MS")? {
            config.navigation_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&get, "RESULT_TIMEOUT_MS")? {
            config.result_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&get, "DETAIL_TIMEOUT_MS")? {
            config.detail_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&get, "SESSION_TIMEOUT_MS")? {
            config.session_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn with_entry_url(mut self, url: impl Into<String>) -> Self {
        self.entry_url = url.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_result_timeout(mut self, timeout: Duration) -> Self {
        self.result_timeout = timeout;
        self
    }

    pub fn with_detail_timeout(mut self, timeout: Duration) -> Self {
        self.detail_timeout = timeout;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn parse_var<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, LookupError> {
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| LookupError::Config(format!("{}の値が不正です: {}", key, raw))),
    }
}
