use logos::{Lexer, Logos};
use std::fmt;

/// Token types for clipboard HTML
///
/// The lexer is deliberately forgiving: anything that is not a well-formed
/// tag falls out as text or a stray `<`, so malformed markup still converts.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[token("<!--", skip_comment)]
    Comment,

    #[regex(r"<![a-zA-Z][^>]*>")]
    Doctype,

    #[regex(r"<\?[^>]*>")]
    ProcessingInstruction,

    // Raw `<name attr=...>` including the angle brackets
    #[regex(r"<[a-zA-Z][^>]*>", |lex| lex.slice())]
    StartTag(&'src str),

    #[regex(r"</[a-zA-Z][^>]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    #[token("<")]
    StrayAngle,
}

/// Consume everything up to and including the closing `-->`
fn skip_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> bool {
    let consumed = match lex.remainder().find("-->") {
        Some(end) => end + 3,
        None => lex.remainder().len(),
    };
    lex.bump(consumed);
    true
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Comment => write!(f, "comment"),
            Token::Doctype => write!(f, "doctype"),
            Token::ProcessingInstruction => write!(f, "processing instruction"),
            Token::StartTag(s) => write!(f, "start tag {}", s),
            Token::EndTag(s) => write!(f, "end tag {}", s),
            Token::Text(s) => write!(f, "text '{}'", s),
            Token::StrayAngle => write!(f, "<"),
        }
    }
}

/// Tokenize a markup string
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}

/// Tokens inside a start tag, after the element name
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\x0C]+")]
enum AttrToken<'src> {
    #[regex(r#"[^ \t\n\r\x0C"'<>=]+"#, |lex| lex.slice())]
    Word(&'src str),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'[^']*'"#, |lex| unquote(lex.slice()))]
    Quoted(&'src str),
}

fn unquote(raw: &str) -> &str {
    &raw[1..raw.len() - 1]
}

/// A parsed start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased element name
    pub name: String,

    /// Attributes in source order, names lowercased, values undecoded
    pub attributes: Vec<(String, String)>,

    pub self_closing: bool,
}

impl StartTag {
    /// First value of attribute `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a raw start tag token such as `<a href="x" target=_blank>`
pub fn parse_start_tag(raw: &str) -> StartTag {
    let inner = raw.trim_start_matches('<').trim_end_matches('>');
    let trimmed = inner.trim_end();
    let self_closing = trimmed.ends_with('/');
    let inner = trimmed.trim_end_matches('/');

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut pending: Option<String> = None;
    let mut awaiting_value = false;

    for token in AttrToken::lexer(&inner[name_end..]).flatten() {
        match token {
            AttrToken::Word(word) if awaiting_value => {
                if let Some(key) = pending.take() {
                    attributes.push((key, word.to_string()));
                }
                awaiting_value = false;
            }
            AttrToken::Quoted(value) if awaiting_value => {
                if let Some(key) = pending.take() {
                    attributes.push((key, value.to_string()));
                }
                awaiting_value = false;
            }
            AttrToken::Word(word) => {
                if let Some(key) = pending.take() {
                    attributes.push((key, String::new()));
                }
                let word = word.trim_matches('/');
                if !word.is_empty() {
                    pending = Some(word.to_ascii_lowercase());
                }
            }
            AttrToken::Equals => awaiting_value = pending.is_some(),
            AttrToken::Quoted(_) => {}
        }
    }
    if let Some(key) = pending {
        attributes.push((key, String::new()));
    }

    StartTag {
        name,
        attributes,
        self_closing,
    }
}

/// Lowercased element name of a raw end tag such as `</P >`
pub fn end_tag_name(raw: &str) -> String {
    raw.trim_start_matches("</")
        .trim_end_matches('>')
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_and_text() {
        let tokens = tokenize("<p class=\"x\">Hello</p>");

        assert_eq!(tokens[0].0, Token::StartTag("<p class=\"x\">"));
        assert_eq!(tokens[1].0, Token::Text("Hello"));
        assert_eq!(tokens[2].0, Token::EndTag("</p>"));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_comments_and_doctype_are_tokens() {
        let tokens = tokenize("<!DOCTYPE html><!-- a <b>bold</b> comment -->text");

        assert_eq!(tokens[0].0, Token::Doctype);
        assert_eq!(tokens[1].0, Token::Comment);
        assert_eq!(tokens[2].0, Token::Text("text"));
    }

    #[test]
    fn test_unterminated_comment_swallows_rest() {
        let tokens = tokenize("before<!-- never closed <p>x</p>");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].0, Token::Comment);
    }

    #[test]
    fn test_stray_angle_bracket() {
        let tokens = tokenize("a < b");

        assert_eq!(tokens[0].0, Token::Text("a "));
        assert_eq!(tokens[1].0, Token::StrayAngle);
        assert_eq!(tokens[2].0, Token::Text(" b"));
    }

    #[test]
    fn test_parse_start_tag_attributes() {
        let tag = parse_start_tag(r#"<A HREF="https://example.com/a" target=_blank data-x='y z' hidden>"#);

        assert_eq!(tag.name, "a");
        assert_eq!(tag.attribute("href"), Some("https://example.com/a"));
        assert_eq!(tag.attribute("target"), Some("_blank"));
        assert_eq!(tag.attribute("data-x"), Some("y z"));
        assert_eq!(tag.attribute("hidden"), Some(""));
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_parse_self_closing_tag() {
        let tag = parse_start_tag(r#"<img src="cat.png" alt="A cat"/>"#);

        assert_eq!(tag.name, "img");
        assert_eq!(tag.attribute("alt"), Some("A cat"));
        assert!(tag.self_closing);

        assert_eq!(parse_start_tag("<br/>").name, "br");
    }

    #[test]
    fn test_end_tag_name() {
        assert_eq!(end_tag_name("</P >"), "p");
        assert_eq!(end_tag_name("</strong>"), "strong");
    }
}
