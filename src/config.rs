/// Limits and presentation settings for a shell session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Longest accepted command line in bytes.
    pub max_line_len: usize,
    /// Maximum number of shell variables; `None` for no limit.
    pub max_vars: Option<usize>,
    /// Text shown before the working directory in the prompt.
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_line_len: 1024,
            max_vars: Some(128),
            prompt: "xsh".to_string(),
        }
    }
}
