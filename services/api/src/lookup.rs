use std::sync::Arc;

use candidate_intake::config::AppConfig;
use candidate_intake::error::AppError;
use candidate_intake::lookup::{MokaLookupCache, PostalLookupService, RetryPolicy, ViaCepClient};
use candidate_intake::postal::digits_only;
use clap::Args;
use serde_json::json;

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    /// Postal code to resolve; punctuation is ignored
    pub(crate) cep: String,
}

pub(crate) async fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let client = ViaCepClient::from_config(&config.lookup)?;
    let service = PostalLookupService::new(
        Arc::new(client),
        Arc::new(MokaLookupCache::from_config(&config.lookup)),
        RetryPolicy::from(&config.lookup),
    );

    let record = service.lookup(&args.cep).await?;
    let rendered = serde_json::to_string_pretty(&json!({ "cep": digits_only(&args.cep), "data": record }))
        .unwrap_or_default();
    println!("{rendered}");
    Ok(())
}
