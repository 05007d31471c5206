//! IPFS agent-card resolution through public HTTP gateways.
//!
//! An `ipfs://<cid>[/path]` URI is mapped onto each gateway in a fixed
//! priority order; see [`IpfsFetcher`] for the fallback procedure.

mod fetcher;

pub use fetcher::{fetch_with_fallback, IpfsFetcher, DEFAULT_ATTEMPT_TIMEOUT};

/// Scheme prefix of content-addressed URIs.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Public gateways, most preferred first. Order is never shuffled.
pub const DEFAULT_GATEWAYS: [&str; 4] = [
    "https://ipfs.io/ipfs/",
    "https://gateway.pinata.cloud/ipfs/",
    "https://cloudflare-ipfs.com/ipfs/",
    "https://dweb.link/ipfs/",
];

/// True iff `uri` starts with `ipfs://`.
pub fn is_content_addressed(uri: &str) -> bool {
    uri.starts_with(IPFS_SCHEME)
}

/// Gateway URLs for `uri` using [`DEFAULT_GATEWAYS`], in try order.
///
/// Empty when `uri` is not content-addressed.
pub fn candidate_urls(uri: &str) -> Vec<String> {
    candidates_for(uri, DEFAULT_GATEWAYS.iter().copied())
}

pub(crate) fn candidates_for<'a, I>(uri: &str, gateways: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let Some(hash) = uri.strip_prefix(IPFS_SCHEME) else {
        return Vec::new();
    };
    gateways
        .into_iter()
        .map(|base| format!("{}{}", base, hash))
        .collect()
}
