use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tower::Service;
use tracing::{error, info};

use crate::address::{normalize_query, AddressQuery, RegionCode};
use crate::config::ResolverConfig;
use crate::error::LookupError;
use crate::resolver::{ResolutionOutcome, Resolver};

/// 郵便番号検索リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// 郵便番号を検索したい住所（都道府県を含むほうが望ましい）。最大100文字
    pub address: String,
    #[serde(default)]
    pub region_code: Option<RegionCode>,
}

impl LookupRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            region_code: None,
        }
    }

    pub fn with_region_code(mut self, region_code: RegionCode) -> Self {
        self.region_code = Some(region_code);
        self
    }
}

/// HTTPレスポンスの本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupBody {
    Found { postal_code: String },
    Failed { detail: String },
}

/// 検索結果をHTTPステータスと本文に対応づけたもの
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResponse {
    #[serde(skip)]
    pub status: u16,
    #[serde(flatten)]
    pub body: LookupBody,
}

impl From<&ResolutionOutcome> for LookupResponse {
    fn from(outcome: &ResolutionOutcome) -> Self {
        match outcome {
            ResolutionOutcome::Success { postal_code } => Self {
                status: 200,
                body: LookupBody::Found {
                    postal_code: postal_code.to_string(),
                },
            },
            ResolutionOutcome::NoMatch { message }
            | ResolutionOutcome::InteractionError { message } => Self {
                status: 404,
                body: LookupBody::Failed {
                    detail: message.clone(),
                },
            },
            ResolutionOutcome::UnexpectedError { message } => Self {
                status: 500,
                body: LookupBody::Failed {
                    detail: message.clone(),
                },
            },
        }
    }
}

impl From<&LookupError> for LookupResponse {
    fn from(err: &LookupError) -> Self {
        let status = match err {
            LookupError::InvalidInput(_) => 422,
            _ => 500,
        };
        Self {
            status,
            body: LookupBody::Failed {
                detail: err.to_string(),
            },
        }
    }
}

/// tower::Serviceを実装した郵便番号検索サービス
#[derive(Clone)]
pub struct PostalCodeService {
    resolver: Resolver,
}

impl PostalCodeService {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            resolver: Resolver::new(config),
        }
    }

    pub fn with_resolver(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// 住所から郵便番号を取得する。入力チェックに失敗した場合のみ `Err`
    pub async fn resolve_postal_code(
        &self,
        address: &str,
        region_code: Option<RegionCode>,
    ) -> Result<ResolutionOutcome, LookupError> {
        let query = AddressQuery::new(address, region_code).map_err(|e| {
            error!("郵便番号取得リクエストが不正です: {}", e);
            e
        })?;
        let normalized = normalize_query(&query);
        Ok(self.resolver.resolve(&normalized).await)
    }
}

impl Service<LookupRequest> for PostalCodeService {
    type Response = ResolutionOutcome;
    type Error = LookupError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: LookupRequest) -> Self::Future {
        info!("郵便番号検索リクエスト受信: address={}", req.address);

        let service = self.clone();
        Box::pin(async move {
            service
                .resolve_postal_code(&req.address, req.region_code)
                .await
        })
    }
}
