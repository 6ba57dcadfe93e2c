//! 郵便番号検索ライブラリ
//!
//! 日本郵便の郵便番号検索ページ（APIなし、フォームのみ）をブラウザで操作し、
//! 住所から郵便番号を取得する。
//!
//! - 住所の前処理（都道府県の切り出し、表記ゆれの置換）
//! - 1検索1セッションのブラウザ操作と後始末
//! - 結果を `Success` / `NoMatch` / `InteractionError` / `UnexpectedError` に分類
//!
//! # 使用例
//!
//! ```rust,ignore
//! use postal_code_service::{LookupRequest, PostalCodeService, ResolverConfig};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = PostalCodeService::new(ResolverConfig::from_env().unwrap());
//!
//!     let outcome = service
//!         .call(LookupRequest::new("千葉県山武郡横芝光町宮川"))
//!         .await
//!         .unwrap();
//!     println!("{:?}", outcome.postal_code());
//! }
//! ```

pub mod address;
pub mod browser;
pub mod config;
pub mod error;
pub mod resolver;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use address::{normalize, AddressQuery, NormalizedQuery, RegionCode};
pub use browser::ChromiumLauncher;
pub use config::ResolverConfig;
pub use error::LookupError;
pub use resolver::{PostalCode, ResolutionOutcome, Resolver};
pub use service::{LookupBody, LookupRequest, LookupResponse, PostalCodeService};
pub use traits::{AriaRole, AutomationBrowser, AutomationContext, AutomationPage, BrowserLauncher};
