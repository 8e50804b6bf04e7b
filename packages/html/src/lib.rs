//! # Scribe HTML
//!
//! Converts clipboard markup into document blocks.
//!
//! ```rust,ignore
//! use scribe_html::{convert_html_to_blocks, BlockRenderRules};
//!
//! let fragment = convert_html_to_blocks("<h1>Title</h1><p>Body</p>", &BlockRenderRules::default(), &mut keys);
//! ```

pub mod converter;
pub mod entities;
pub mod error;
pub mod lexer;
pub mod rules;

pub use converter::{
    convert_html_to_blocks, HtmlConverter, BOLD, CODE, IMAGE_PLACEHOLDER, ITALIC, STRIKETHROUGH,
    UNDERLINE,
};
pub use entities::decode_entities;
pub use error::{HtmlError, HtmlResult};
pub use lexer::{end_tag_name, parse_start_tag, tokenize, StartTag, Token};
pub use rules::BlockRenderRules;
