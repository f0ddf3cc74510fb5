// ABOUTME: HTTP renderer that turns a URL into decoded HTML for extraction.
// ABOUTME: Enforces http(s) only, a private-network guard, a 10 MB body cap, and charset decoding.

use std::net::{IpAddr, ToSocketAddrs};

use ipnet::{Ipv4Net, Ipv6Net};
use once_cell::sync::Lazy;
use sift::Page;
use tracing::debug;
use url::Url;

use crate::error::NavigationError;
use crate::error::NavigationErrorKind::{Fetch, InvalidUrl, Ssrf, Timeout};
use crate::options::RenderOptions;

/// Maximum allowed body size (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

static PRIVATE_V4: Lazy<Vec<Ipv4Net>> = Lazy::new(|| {
    // RFC1918, loopback, link-local
    ["10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16", "127.0.0.0/8", "169.254.0.0/16"]
        .iter()
        .map(|net| net.parse().unwrap())
        .collect()
});

static PRIVATE_V6: Lazy<Vec<Ipv6Net>> = Lazy::new(|| {
    // unique local, link-local
    ["fc00::/7", "fe80::/10"]
        .iter()
        .map(|net| net.parse().unwrap())
        .collect()
});

/// Check if an IP address is in a private/reserved range.
pub(crate) fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => PRIVATE_V4.iter().any(|net| net.contains(ip)),
        IpAddr::V6(ip) => ip.is_loopback() || PRIVATE_V6.iter().any(|net| net.contains(ip)),
    }
}

fn default_port(url: &Url) -> u16 {
    url.port()
        .unwrap_or(if url.scheme() == "https" { 443 } else { 80 })
}

/// HTML produced for one URL.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The URL that was requested.
    pub url: String,
    /// The URL after redirects.
    pub final_url: String,
    pub html: String,
}

impl RenderedPage {
    /// Parses the HTML, carrying the final URL for link resolution.
    pub fn to_page(&self) -> Page {
        Page::parse(&self.html).with_url(self.final_url.clone())
    }
}

/// Fetches pages over HTTP.
#[derive(Debug, Clone)]
pub struct Renderer {
    opts: RenderOptions,
    http: reqwest::Client,
}

impl Renderer {
    pub fn new(opts: RenderOptions) -> anyhow::Result<Self> {
        let allow_private = opts.allow_private_networks;
        let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
            if allow_private {
                return attempt.follow();
            }
            let next = attempt.url().clone();
            let Some(host) = next.host_str() else {
                return attempt.follow();
            };
            if let Ok(ip) = host.parse::<IpAddr>() {
                if is_private_ip(&ip) {
                    return attempt.error("redirect to private IP blocked");
                }
                return attempt.follow();
            }
            // redirect policies are synchronous, so resolve with std
            match (host, default_port(&next)).to_socket_addrs() {
                Ok(mut addrs) => {
                    if addrs.any(|sa| is_private_ip(&sa.ip())) {
                        attempt.error("redirect to private IP blocked")
                    } else {
                        attempt.follow()
                    }
                }
                Err(_) => attempt.error("DNS lookup failed during redirect"),
            }
        });

        let http = reqwest::Client::builder()
            .redirect(redirect_policy)
            .user_agent(&opts.user_agent)
            .timeout(opts.timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { opts, http })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    /// Fetches `url` and decodes the body to text.
    pub async fn render(&self, url: &str) -> Result<RenderedPage, NavigationError> {
        if url.is_empty() {
            return Err(NavigationError::new(InvalidUrl, url));
        }

        let parsed = Url::parse(url).map_err(|e| {
            NavigationError::new(InvalidUrl, url).caused_by(e)
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(NavigationError::new(InvalidUrl, url)
                .caused_by(anyhow::anyhow!("scheme must be http or https")));
        }

        if !self.opts.allow_private_networks {
            self.guard_host(url, &parsed).await?;
        }

        let mut request = self.http.get(parsed.as_str());
        for (key, value) in &self.opts.headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| request_error(url, e))?;

        if !self.opts.allow_private_networks {
            let final_url = response.url().clone();
            self.guard_host(url, &final_url).await?;
        }

        if let Some(len) = response.content_length() {
            if len as usize > MAX_CONTENT_LENGTH {
                return Err(too_large(url));
            }
        }

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());

        let body = response.bytes().await.map_err(|e| request_error(url, e))?;
        if body.len() > MAX_CONTENT_LENGTH {
            return Err(too_large(url));
        }

        if status != 200 {
            return Err(NavigationError::new(Fetch, url)
                .caused_by(anyhow::anyhow!("HTTP status {}", status)));
        }

        debug!(url, final_url = %final_url, bytes = body.len(), "rendered");
        Ok(RenderedPage {
            url: url.to_string(),
            final_url,
            html: decode_body(&body, content_type.as_deref()),
        })
    }

    /// Rejects hosts that are, or resolve to, private addresses.
    async fn guard_host(&self, url: &str, target: &Url) -> Result<(), NavigationError> {
        let Some(host) = target.host_str() else {
            return Ok(());
        };
        let blocked = || {
            NavigationError::new(Ssrf, url)
                .caused_by(anyhow::anyhow!("{} resolves to a private address", host))
        };

        // IPv6 literals come back bracketed
        let literal = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = literal.parse::<IpAddr>() {
            return if is_private_ip(&ip) { Err(blocked()) } else { Ok(()) };
        }

        let addrs = tokio::net::lookup_host((host, default_port(target)))
            .await
            .map_err(|e| {
                NavigationError::new(Fetch, url).caused_by(anyhow::anyhow!("DNS lookup failed: {}", e))
            })?;
        for socket_addr in addrs {
            if is_private_ip(&socket_addr.ip()) {
                return Err(blocked());
            }
        }
        Ok(())
    }
}

fn request_error(url: &str, err: reqwest::Error) -> NavigationError {
    let kind = if err.is_timeout() { Timeout } else { Fetch };
    NavigationError::new(kind, url).caused_by(err)
}

fn too_large(url: &str) -> NavigationError {
    NavigationError::new(Fetch, url).caused_by(anyhow::anyhow!(
        "body exceeds {} bytes",
        MAX_CONTENT_LENGTH
    ))
}

/// Decode body bytes using the charset from content-type, or detection.
pub(crate) fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim().to_ascii_lowercase();
        part.strip_prefix("charset=")
            .map(|c| c.trim_matches('"').trim_matches('\'').to_string())
    })
}
