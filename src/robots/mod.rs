//! Robots.txt handling module
//!
//! The policy is loaded once per seed and consulted for every URL the frontier
//! crawler dequeues. Loading never fails: an unreachable or unreadable
//! robots.txt yields a permissive policy.

mod parser;

pub use parser::RobotsPolicy;

use crate::crawler::{fetch_url, ContentKind, FetchResult};
use crate::url::origin_of;
use reqwest::Client;
use url::Url;

/// Loads the robots.txt policy for a seed's origin
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `seed` - Any URL on the site; only its origin is used
///
/// # Returns
///
/// The parsed policy, or [`RobotsPolicy::allow_all`] on any failure
pub async fn load(client: &Client, seed: &Url) -> RobotsPolicy {
    let robots_url = match origin_of(seed).join("robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", seed, e);
            return RobotsPolicy::allow_all();
        }
    };

    match fetch_url(client, robots_url.as_str(), ContentKind::Any).await {
        FetchResult::Success { body, .. } => {
            tracing::debug!("Loaded robots.txt from {} ({} bytes)", robots_url, body.len());
            RobotsPolicy::from_content(&body)
        }
        other => {
            tracing::debug!(
                "No usable robots.txt at {} ({}), allowing everything",
                robots_url,
                other.describe()
            );
            RobotsPolicy::allow_all()
        }
    }
}
