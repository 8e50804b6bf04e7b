use scribe_html::{convert_html_to_blocks, BlockRenderRules};
use scribe_model::{Fragment, KeyGenerator};

/// HTML → block conversion service
pub trait HtmlImporter: Send + Sync {
    /// `None` when the markup yields no blocks
    fn convert_html_to_blocks(
        &self,
        html: &str,
        rules: &BlockRenderRules,
        keys: &mut KeyGenerator,
    ) -> Option<Fragment>;
}

/// Converter backed by `scribe-html`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHtmlImporter;

impl HtmlImporter for DefaultHtmlImporter {
    fn convert_html_to_blocks(
        &self,
        html: &str,
        rules: &BlockRenderRules,
        keys: &mut KeyGenerator,
    ) -> Option<Fragment> {
        convert_html_to_blocks(html, rules, keys)
    }
}
