//! Request identity: randomized browser User-Agent and cache policy.

use rand::Rng;

use super::request::{CachePolicy, Request};

/// Realistic desktop browser signatures.
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36",
];

/// Uniformly random entry of [`USER_AGENTS`].
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::rng();
    USER_AGENTS[rng.random_range(0..USER_AGENTS.len())]
}

/// API endpoints are never served from cache; everything else may be.
pub fn cache_policy_for(url: &str) -> CachePolicy {
    if url.contains("api") {
        CachePolicy::NoStore
    } else {
        CachePolicy::Default
    }
}

/// Fill in identity headers the caller left unset.
pub fn apply_identity(request: &mut Request) {
    if request.header_value("User-Agent").is_none() {
        request.set_header("User-Agent", random_user_agent());
    }
    if request.cache_policy().is_none() {
        let policy = cache_policy_for(request.url());
        request.set_cache(policy);
    }
}
