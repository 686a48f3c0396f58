//! Engine configuration.

/// Symbol of the runtime's string class descriptor.
pub const DEFAULT_STRING_CLASS_SYMBOL: &str = "kclass:kotlin.String";

/// Byte bound for C strings returned by composite queries.
pub const DEFAULT_CSTRING_READ_LIMIT: u32 = 0x1000;

/// Number of `(address, child count)` pairs the revisit tracker remembers.
pub const DEFAULT_REVISIT_CAPACITY: usize = 256;

/// Tunables for one [`crate::Session`].
///
/// The maximum number of children to render is deliberately absent: it is a
/// host display setting and is queried at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig
{
    /// Symbol passed as the auxiliary argument of the composite shape query
    pub string_class_symbol: String,
    /// Maximum length of composite responses and type names
    pub cstring_read_limit: u32,
    /// Capacity of the revisit tracker
    pub revisit_capacity: usize,
    /// Purge every cache when the host reports a resume
    pub purge_on_resume: bool,
}

impl Default for EngineConfig
{
    fn default() -> Self
    {
        Self {
            string_class_symbol: DEFAULT_STRING_CLASS_SYMBOL.to_string(),
            cstring_read_limit: DEFAULT_CSTRING_READ_LIMIT,
            revisit_capacity: DEFAULT_REVISIT_CAPACITY,
            purge_on_resume: true,
        }
    }
}

impl EngineConfig
{
    /// Override the string class symbol.
    #[must_use]
    pub fn with_string_class_symbol(mut self, symbol: impl Into<String>) -> Self
    {
        self.string_class_symbol = symbol.into();
        self
    }

    /// Override the C-string read limit.
    #[must_use]
    pub fn with_cstring_read_limit(mut self, limit: u32) -> Self
    {
        self.cstring_read_limit = limit;
        self
    }

    /// Override the revisit tracker capacity. Zero is raised to one.
    #[must_use]
    pub fn with_revisit_capacity(mut self, capacity: usize) -> Self
    {
        self.revisit_capacity = capacity.max(1);
        self
    }

    /// Keep caches across resumes.
    #[must_use]
    pub fn keep_caches_on_resume(mut self) -> Self
    {
        self.purge_on_resume = false;
        self
    }
}
