/// Decides which discovered URLs the crawl may recurse into
///
/// Sections are plain substrings matched anywhere in the normalized URL.
/// Exclusions always win. With no inclusion list, `allow_all_when_empty`
/// decides whether every URL passes or none does.
///
/// The crawl root is never gated by this filter.
///
/// # Examples
///
/// ```
/// use mkdocs_site_loader::SectionFilter;
///
/// let filter = SectionFilter::new(vec!["/docs/".to_string()], vec![], false);
/// assert!(filter.allows("https://example.com/docs/intro"));
/// assert!(!filter.allows("https://example.com/blog/post"));
///
/// let empty = SectionFilter::new(vec![], vec![], false);
/// assert!(!empty.allows("https://example.com/docs/intro"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    allow_all_when_empty: bool,
}

impl SectionFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>, allow_all_when_empty: bool) -> Self {
        Self {
            include,
            exclude,
            allow_all_when_empty,
        }
    }

    /// Returns true if the crawl may recurse into `url`
    pub fn allows(&self, url: &str) -> bool {
        if self.exclude.iter().any(|section| url.contains(section.as_str())) {
            return false;
        }

        if self.include.is_empty() {
            return self.allow_all_when_empty;
        }

        self.include.iter().any(|section| url.contains(section.as_str()))
    }

    /// Returns true if the filter stops recursion everywhere
    pub fn blocks_everything(&self) -> bool {
        self.include.is_empty() && !self.allow_all_when_empty
    }

    pub(crate) fn set_exclude(&mut self, exclude: Vec<String>) {
        self.exclude = exclude;
    }

    pub(crate) fn set_allow_all_when_empty(&mut self, allow: bool) {
        self.allow_all_when_empty = allow;
    }
}
