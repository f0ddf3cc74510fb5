// ABOUTME: Configuration options for the HTTP renderer, with a fluent RendererBuilder.
// ABOUTME: Covers timeout, user agent, extra headers and the private-network opt-in.

use std::collections::HashMap;
use std::time::Duration;

use crate::render::Renderer;

/// Default browser-like user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) sift/0.1";

/// Configuration options for the renderer.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub headers: HashMap<String, String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_networks: false,
            headers: HashMap::new(),
        }
    }
}

/// Builder for constructing Renderer instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct RendererBuilder {
    opts: RenderOptions,
}

impl RendererBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    /// Build the Renderer with the configured options.
    pub fn build(self) -> anyhow::Result<Renderer> {
        Renderer::new(self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let builder = RendererBuilder::new()
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent")
            .allow_private_networks(true)
            .header("Accept-Language", "en");
        let opts = builder.options();
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert_eq!(opts.user_agent, "test-agent");
        assert!(opts.allow_private_networks);
        assert_eq!(opts.headers.get("Accept-Language").map(String::as_str), Some("en"));
    }

    #[test]
    fn defaults_are_conservative() {
        let opts = RenderOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(30));
        assert!(!opts.allow_private_networks);
        assert!(opts.headers.is_empty());
    }
}
