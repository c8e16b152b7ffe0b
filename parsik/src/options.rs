/// Default limit on nested expression evaluations in one session.
///
/// One level costs a handful of stack frames. In an unoptimised build that
/// is a few kilobytes, so the default stays well inside the 2 MB stack of a
/// spawned thread.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Per-parse configuration.
///
/// ```
/// use parsik::ParseOptions;
///
/// let options = ParseOptions::default()
///     .with_max_depth(4096)
///     .with_max_input_len(64 * 1024);
/// assert!(options.memoize);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Cache rule outcomes per position (packrat parsing). Turning this off
    /// changes timing only, never the result.
    pub memoize: bool,

    /// Maximum nesting of expression evaluations before the session gives
    /// up with [`ParseError::RecursionLimit`](crate::ParseError::RecursionLimit).
    /// Left-recursive grammars run into this limit. Raising it needs a
    /// correspondingly larger stack.
    pub max_depth: usize,

    /// Maximum input length in atoms, checked before parsing starts.
    pub max_input_len: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = Some(len);
        self
    }
}
