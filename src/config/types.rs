use serde::Deserialize;

/// Main configuration structure for Seoran
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// usable configuration once a seed URL is supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute http/https URL where the crawl starts
    #[serde(rename = "seed-url", default)]
    pub seed_url: String,

    /// Maximum number of pages to fetch successfully
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Explicit hostnames the crawl may visit (empty: seed hostname only)
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,

    /// Pause between successive fetch attempts (seconds)
    #[serde(rename = "request-delay-seconds", default = "default_request_delay")]
    pub request_delay_seconds: f64,
}

/// HTTP fetch limits
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Largest body accepted (bytes)
    #[serde(rename = "max-content-length", default = "default_max_content_length")]
    pub max_content_length: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory under which one sub-directory per host is created
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            max_pages: default_max_pages(),
            allowed_domains: Vec::new(),
            request_delay_seconds: default_request_delay(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_content_length: default_max_content_length(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_max_pages() -> u32 {
    10
}

fn default_request_delay() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    20
}

fn default_max_content_length() -> u64 {
    5 * 1024 * 1024
}

fn default_crawler_name() -> String {
    "SeoranBot".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}

fn default_contact_url() -> String {
    "http://sajjadakbari.ir/seoran-bot-info".to_string()
}

fn default_output_directory() -> String {
    "downloaded_pages".to_string()
}
