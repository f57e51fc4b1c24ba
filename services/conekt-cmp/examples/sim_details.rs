//! Fetch an access token from CMP and look up SIM details for one EID.
//!
//! ```shell
//! CMP_ACCESS_KEY=... CMP_SECRET=... cargo run -p reqsign-conekt-cmp --example sim_details -- <EID>
//! ```

use anyhow::Result;
use log::info;
use reqsign_conekt_cmp::{
    Client, Config, ConfigCredentialProvider, RequestSigner, DEFAULT_TIMEOUT,
};
use reqsign_core::{Context, OsEnv, Signer};
use reqsign_http_send_reqwest::ReqwestHttpSend;
use std::sync::Arc;

const DEFAULT_EID: &str = "89033023321190000000025961688934";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let eid = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_EID.to_string());

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::with_timeout(DEFAULT_TIMEOUT)?)
        .with_env(OsEnv);

    let config = Config::new().from_env(&ctx);
    info!("using cmp config: {config:?}");

    let endpoint = config.endpoint();
    let signer = Signer::new(
        ctx,
        ConfigCredentialProvider::new(Arc::new(config)),
        RequestSigner::new(),
    );
    let client = Client::new(&endpoint, signer);

    let token = client.fetch_token().await?;
    println!("Access token: {token}");

    let details = client.sim_details(&token, &[eid]).await?;
    println!("{details}");

    Ok(())
}
