/// Default cap on the byte length of an author list handed to the normalizer.
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024;

/// arXiv categories that force the matching service to require a match.
pub const DEFAULT_MUST_MATCH_CATEGORIES: &[&str] = &["Astrophysics", "Physics"];

/// Settings for author-list normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Inputs longer than this are returned unchanged.
    pub(crate) max_input_len: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}

impl NormalizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }

    pub fn input_limit(&self) -> usize {
        self.max_input_len
    }
}

/// Settings for building a matching payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadConfig {
    pub normalizer: NormalizerConfig,
    /// A record whose keywords mention any of these must be matched.
    pub must_match_categories: Vec<String>,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            must_match_categories: DEFAULT_MUST_MATCH_CATEGORIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
