mod formatter;

pub use formatter::{Formatter, FormatterConfig, LineEnding};

/// Formats template source with the default configuration.
#[allow(clippy::result_large_err)]
pub fn format(code: &str, config: Option<FormatterConfig>) -> Result<String, metagen_lang::Error> {
    Formatter::new(config).format(code)
}
