use postal_code_service::{LookupResponse, PostalCodeService, RegionCode, ResolverConfig};

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 使い方: cargo run --example lookup -- <住所> [都道府県コード]
    let mut args = std::env::args().skip(1);
    let address = args
        .next()
        .unwrap_or_else(|| "千葉県山武郡横芝光町宮川".to_string());
    let region = match args.next().map(|s| s.parse::<u8>()) {
        None => None,
        Some(Ok(code)) => match RegionCode::new(code) {
            Ok(code) => Some(code),
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(2);
            }
        },
        Some(Err(e)) => {
            eprintln!("エラー: 都道府県コードが数値ではありません: {}", e);
            std::process::exit(2);
        }
    };

    let config = match ResolverConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("エラー: {}", e);
            std::process::exit(2);
        }
    };
    let service = PostalCodeService::new(config);

    println!("=== 郵便番号検索: {} ===", address);

    let response = match service.resolve_postal_code(&address, region).await {
        Ok(outcome) => LookupResponse::from(&outcome),
        Err(e) => LookupResponse::from(&e),
    };

    println!(
        "{} {}",
        response.status,
        serde_json::to_string(&response).unwrap_or_default()
    );
}
