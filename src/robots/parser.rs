//! Robots.txt policy evaluation
//!
//! Rules are matched with the robotstxt crate (a port of Google's matcher);
//! the raw file is kept and parsed on demand for each check.

use robotstxt::DefaultMatcher;

/// Crawl permissions of one site
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// Raw robots.txt content
    content: String,
    /// Fail-open policy used when robots.txt is unavailable
    allow_all: bool,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// This is the policy when robots.txt cannot be fetched or read.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Checks if `url` may be fetched by `agent`
    ///
    /// # Arguments
    ///
    /// * `agent` - The product token matched against `User-agent` groups
    /// * `url` - The absolute URL to check
    pub fn allows(&self, agent: &str, url: &str) -> bool {
        if self.allow_all || self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, agent, url)
    }

    /// Gets the `Crawl-delay` for an agent, in seconds
    ///
    /// A group naming the agent wins over the `*` group. The crawler keeps its
    /// own fixed interval; the value is only reported.
    pub fn crawl_delay(&self, agent: &str) -> Option<f64> {
        if self.allow_all {
            return None;
        }

        let agent = agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut in_agent_lines = false;
        let mut wildcard_delay = None;
        let mut agent_delay = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                // Consecutive User-agent lines share one group
                if !in_agent_lines {
                    group.clear();
                }
                group.push(value.to_lowercase());
                in_agent_lines = true;
                continue;
            }
            in_agent_lines = false;

            if key == "crawl-delay" {
                let Ok(delay) = value.parse::<f64>() else {
                    continue;
                };
                if group
                    .iter()
                    .any(|ua| ua != "*" && !ua.is_empty() && agent.contains(ua.as_str()))
                {
                    agent_delay = Some(delay);
                } else if group.iter().any(|ua| ua == "*") {
                    wildcard_delay = Some(delay);
                }
            }
        }

        agent_delay.or(wildcard_delay)
    }
}

impl Default for RobotsPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://example.com";

    fn url(path: &str) -> String {
        format!("{}{}", SITE, path)
    }

    #[test]
    fn test_allow_all() {
        let robots = RobotsPolicy::allow_all();
        assert!(robots.allows("docmirror", &url("/any/path")));
    }

    #[test]
    fn test_disallow_all() {
        let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.allows("docmirror", &url("/")));
        assert!(!robots.allows("docmirror", &url("/page")));
    }

    #[test]
    fn test_disallow_specific() {
        let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /docs/private");
        assert!(robots.allows("docmirror", &url("/docs/")));
        assert!(!robots.allows("docmirror", &url("/docs/private")));
        assert!(!robots.allows("docmirror", &url("/docs/private/keys")));
    }

    #[test]
    fn test_allow_overrides_longer_match() {
        let robots =
            RobotsPolicy::from_content("User-agent: *\nDisallow: /private\nAllow: /private/public");
        assert!(!robots.allows("docmirror", &url("/private")));
        assert!(robots.allows("docmirror", &url("/private/public")));
    }

    #[test]
    fn test_agent_specific_group() {
        let robots =
            RobotsPolicy::from_content("User-agent: docmirror\nDisallow: /\n\nUser-agent: *\nAllow: /");
        assert!(!robots.allows("docmirror", &url("/page")));
        assert!(robots.allows("otherbot", &url("/page")));
    }

    #[test]
    fn test_garbage_content_allows() {
        let robots = RobotsPolicy::from_content("This is not valid robots.txt {{{");
        assert!(robots.allows("docmirror", &url("/any/path")));
    }

    #[test]
    fn test_empty_content_allows() {
        let robots = RobotsPolicy::from_content("");
        assert!(robots.allows("docmirror", &url("/any/path")));
    }

    #[test]
    fn test_crawl_delay_wildcard() {
        let robots = RobotsPolicy::from_content("User-agent: *\nCrawl-delay: 10\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("docmirror"), Some(10.0));
    }

    #[test]
    fn test_crawl_delay_prefers_agent_group() {
        let robots = RobotsPolicy::from_content(
            "User-agent: docmirror\nCrawl-delay: 2.5\n\nUser-agent: *\nCrawl-delay: 10",
        );
        assert_eq!(robots.crawl_delay("docmirror"), Some(2.5));
        assert_eq!(robots.crawl_delay("otherbot"), Some(10.0));
    }

    #[test]
    fn test_crawl_delay_shared_group() {
        let robots = RobotsPolicy::from_content("User-agent: BotA\nUser-agent: BotB\nCrawl-delay: 3");
        assert_eq!(robots.crawl_delay("bota"), Some(3.0));
        assert_eq!(robots.crawl_delay("BotB"), Some(3.0));
        assert_eq!(robots.crawl_delay("BotC"), None);
    }

    #[test]
    fn test_crawl_delay_absent() {
        let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("docmirror"), None);
        assert_eq!(RobotsPolicy::allow_all().crawl_delay("docmirror"), None);
    }
}
