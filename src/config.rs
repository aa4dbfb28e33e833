//! Configuration types for a scrape run.
//!
//! All run behaviour is controlled through [`ScrapeConfig`], built via its
//! [`ScrapeConfigBuilder`]. The school → URL list is plain data on the
//! config, passed explicitly into [`crate::scrape::scrape`]; nothing reads it
//! from global state.

use crate::error::SkillsError;
use crate::progress::ProgressCallback;
use page_cache::PageCache;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Root of the wiki; relative skill links are resolved against it.
pub const DEFAULT_BASE_URL: &str = "https://divinityoriginalsin2.wiki.fextralife.com";

/// File written by [`crate::scrape::scrape_to_file`] when no path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "dos2_skills.xlsx";

/// The ten skill schools, in output order.
const DOS2_SCHOOLS: [&str; 10] = [
    "Aerotheurge",
    "Geomancer",
    "Huntsman",
    "Hydrosophist",
    "Necromancer",
    "Polymorph",
    "Pyrokinetic",
    "Scoundrel",
    "Summoning",
    "Warfare",
];

/// One skill school and the page listing its skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub url: String,
}

impl School {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The fixed school list of the DOS2 wiki, e.g.
    /// `Aerotheurge → {base}/Aerotheurge+Skills`.
    pub fn dos2_defaults() -> Vec<School> {
        DOS2_SCHOOLS
            .iter()
            .map(|name| School::new(*name, format!("{DEFAULT_BASE_URL}/{name}+Skills")))
            .collect()
    }
}

/// Response cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Serve and store pages through the on-disk cache. Default: true.
    pub enabled: bool,

    /// Cache directory. `None` uses [`page_cache::default_cache_dir`].
    pub dir: Option<PathBuf>,

    /// Entries older than this are refetched. `None` keeps entries forever.
    pub max_age_secs: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            max_age_secs: None,
        }
    }
}

impl CacheSettings {
    /// Open the configured cache, or `None` when caching is disabled.
    pub fn open(&self) -> Option<PageCache> {
        if !self.enabled {
            return None;
        }
        let cache = match self.dir {
            Some(ref dir) => PageCache::new(dir),
            None => PageCache::open_default(),
        };
        Some(match self.max_age_secs {
            Some(secs) => cache.with_max_age(Duration::from_secs(secs)),
            None => cache,
        })
    }
}

/// Configuration for a scrape run.
///
/// Built via [`ScrapeConfig::builder()`] or using [`ScrapeConfig::default()`].
///
/// # Example
/// ```rust
/// use dos2_skills::{ScrapeConfig, School};
///
/// let config = ScrapeConfig::builder()
///     .schools(vec![School::new("Warfare", "https://example.com/Warfare+Skills")])
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.schools.len(), 1);
/// ```
#[derive(Clone)]
pub struct ScrapeConfig {
    /// Base URL that relative skill links are resolved against.
    pub base_url: String,

    /// Schools to scrape, in output order. Default: [`School::dos2_defaults`].
    pub schools: Vec<School>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Per-request timeout in seconds. Default: 60.
    pub timeout_secs: u64,

    /// Response cache settings.
    pub cache: CacheSettings,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            schools: School::dos2_defaults(),
            user_agent: concat!("dos2-skills/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 60,
            cache: CacheSettings::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ScrapeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrapeConfig")
            .field("base_url", &self.base_url)
            .field("schools", &self.schools)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("cache", &self.cache)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ScrapeProgressCallback>"),
            )
            .finish()
    }
}

impl ScrapeConfig {
    /// Create a new builder for `ScrapeConfig`.
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder {
            config: Self::default(),
            unknown_schools: Vec::new(),
        }
    }

    /// Parsed [`Self::base_url`].
    pub fn base(&self) -> Result<Url, SkillsError> {
        Url::parse(&self.base_url).map_err(|e| {
            SkillsError::InvalidConfig(format!("base URL '{}': {}", self.base_url, e))
        })
    }
}

/// Builder for [`ScrapeConfig`].
#[derive(Debug)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
    unknown_schools: Vec<String>,
}

impl ScrapeConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn schools(mut self, schools: Vec<School>) -> Self {
        self.config.schools = schools;
        self
    }

    /// Keep only the schools whose names match `names` (case-insensitive),
    /// preserving the configured order.
    ///
    /// An unknown name is reported by [`Self::build`].
    pub fn only_schools<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        if names.is_empty() {
            return self;
        }
        let wanted: Vec<String> = names.iter().map(|n| n.as_ref().to_lowercase()).collect();
        for (name, lower) in names.iter().zip(&wanted) {
            if !self.config.schools.iter().any(|s| s.name.to_lowercase() == *lower) {
                self.unknown_schools.push(name.as_ref().to_string());
            }
        }
        self.config
            .schools
            .retain(|s| wanted.contains(&s.name.to_lowercase()));
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn cache_enabled(mut self, v: bool) -> Self {
        self.config.cache.enabled = v;
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache.dir = Some(dir.into());
        self
    }

    pub fn cache_max_age_secs(mut self, secs: u64) -> Self {
        self.config.cache.max_age_secs = Some(secs);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScrapeConfig, SkillsError> {
        if let Some(name) = self.unknown_schools.first() {
            return Err(SkillsError::InvalidConfig(format!(
                "unknown school '{name}'"
            )));
        }
        let c = &self.config;
        if c.schools.is_empty() {
            return Err(SkillsError::InvalidConfig(
                "at least one school is required".into(),
            ));
        }
        if c.timeout_secs == 0 {
            return Err(SkillsError::InvalidConfig(
                "timeout must be ≥ 1 second".into(),
            ));
        }
        c.base()?;
        for school in &c.schools {
            Url::parse(&school.url).map_err(|e| {
                SkillsError::InvalidConfig(format!(
                    "URL for {} '{}': {}",
                    school.name, school.url, e
                ))
            })?;
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schools_are_ordered_and_linked() {
        let schools = School::dos2_defaults();
        assert_eq!(schools.len(), 10);
        assert_eq!(schools[0].name, "Aerotheurge");
        assert_eq!(schools[9].name, "Warfare");
        assert_eq!(
            schools[2].url,
            "https://divinityoriginalsin2.wiki.fextralife.com/Huntsman+Skills"
        );
    }

    #[test]
    fn default_config_builds() {
        let config = ScrapeConfig::builder().build().unwrap();
        assert_eq!(config.timeout_secs, 60);
        assert!(config.cache.enabled);
        assert_eq!(config.base().unwrap().host_str(), Some("divinityoriginalsin2.wiki.fextralife.com"));
    }

    #[test]
    fn only_schools_filters_case_insensitively_in_order() {
        let config = ScrapeConfig::builder()
            .only_schools(&["warfare", "AEROTHEURGE"])
            .build()
            .unwrap();
        let names: Vec<&str> = config.schools.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Aerotheurge", "Warfare"]);
    }

    #[test]
    fn only_schools_rejects_unknown_name() {
        let err = ScrapeConfig::builder()
            .only_schools(&["Witchcraft"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Witchcraft"), "got: {err}");
    }

    #[test]
    fn empty_school_list_is_rejected() {
        let err = ScrapeConfig::builder().schools(vec![]).build().unwrap_err();
        assert!(matches!(err, SkillsError::InvalidConfig(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(ScrapeConfig::builder().timeout_secs(0).build().is_err());
    }

    #[test]
    fn bad_school_url_is_rejected() {
        let err = ScrapeConfig::builder()
            .schools(vec![School::new("Warfare", "not a url")])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Warfare"), "got: {err}");
    }

    #[test]
    fn disabled_cache_opens_nothing() {
        let settings = CacheSettings {
            enabled: false,
            ..CacheSettings::default()
        };
        assert!(settings.open().is_none());
    }

    #[test]
    fn cache_settings_apply_dir_and_age() {
        let settings = CacheSettings {
            enabled: true,
            dir: Some(PathBuf::from("/tmp/dos2-pages")),
            max_age_secs: Some(60),
        };
        let cache = settings.open().unwrap();
        assert_eq!(cache.dir(), std::path::Path::new("/tmp/dos2-pages"));
        assert_eq!(cache.max_age(), Some(Duration::from_secs(60)));
    }
}
