use serde::Deserialize;

/// Main configuration structure for the site loader
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which site to crawl and which parts of it to keep
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Crawl root, e.g. "https://docs.hummingbot.org"
    pub url: String,

    /// Path joined to `url` to obtain the first page
    #[serde(rename = "start-path", default = "default_start_path")]
    pub start_path: String,

    /// URL substrings a discovered link must contain to be followed
    #[serde(rename = "sections-filter", default)]
    pub sections_filter: Vec<String>,

    /// URL substrings that stop a discovered link from being followed
    #[serde(rename = "sections-exclude", default)]
    pub sections_exclude: Vec<String>,

    /// Follow every link when `sections-filter` is empty
    #[serde(rename = "allow-all-when-no-filter", default)]
    pub allow_all_when_no_filter: bool,

    /// Metadata keys removed from every returned document
    #[serde(rename = "metadata-filter", default)]
    pub metadata_filter: Vec<String>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// TCP/TLS connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of page fetches in flight in concurrent mode
    #[serde(rename = "max-in-flight", default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Wall-clock budget for one crawl (seconds); unbounded when absent
    #[serde(rename = "crawl-deadline-secs", default)]
    pub crawl_deadline_secs: Option<u64>,

    /// Separator placed between text nodes of a page
    #[serde(rename = "text-separator", default = "default_text_separator")]
    pub text_separator: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON-lines document file
    #[serde(rename = "documents-path", default = "default_documents_path")]
    pub documents_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            crawl_deadline_secs: None,
            text_separator: default_text_separator(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            documents_path: default_documents_path(),
        }
    }
}

fn default_start_path() -> String {
    "/".to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_in_flight() -> usize {
    8
}

fn default_text_separator() -> String {
    "\n".to_string()
}

fn default_documents_path() -> String {
    "./documents.jsonl".to_string()
}
