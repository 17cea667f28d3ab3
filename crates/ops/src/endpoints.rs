//! HTTP liveness checks

use futures::stream::{self, StreamExt};
use vigil_errors::NetworkError;
use vigil_events::AuditSink;
use vigil_net::NetClient;

use crate::{CheckResults, CheckStatus, Failure};

/// Request every URL with a GET; only status `200` passes.
///
/// Up to `jobs` requests are in flight at once. Results and audit records
/// always follow input order, whatever order the responses arrive in.
pub async fn check_endpoints(
    client: &NetClient,
    urls: &[String],
    jobs: usize,
    log: &dyn AuditSink,
) -> CheckResults {
    let mut results = CheckResults::new();

    let mut requests = stream::iter(urls)
        .map(|url| async move { (url, client.fetch_status(url).await) })
        .buffered(jobs.max(1));

    while let Some((url, outcome)) = requests.next().await {
        let status = match outcome {
            Ok(code) if code.as_u16() == 200 => {
                log.info(&format!("API check passed for {url}"));
                CheckStatus::Pass
            }
            Ok(code) => {
                let code = code.as_u16();
                log.error(&format!("API check failed for {url}: status {code}"));
                CheckStatus::Fail(Failure::Network(NetworkError::HttpError {
                    status: code,
                    message: format!("unexpected status {code}"),
                }))
            }
            Err(e) => {
                log.error(&format!("API error for {url}: {e}"));
                CheckStatus::Fail(Failure::Network(e))
            }
        };
        results.insert(url.clone(), status);
    }

    results
}
