//! # Key/Value Request Item Arguments
//!
//! Splits raw command line items like `X-API-Token:123`, `q==rust` or
//! `user[name]=bob` into key, separator and value.

use super::RequestItemError;
use std::fmt;

/// Separator between the key and the value of a request item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `Header:value`
    Header,
    /// `Header;` sends a header with an empty value
    HeaderEmpty,
    /// `Header:@file`
    HeaderEmbed,
    /// `name==value`
    QueryParam,
    /// `name==@file`
    QueryEmbedFile,
    /// `field=value`
    DataString,
    /// `field=@file`
    DataEmbedFileContents,
    /// `field:=json`
    DataRawJson,
    /// `field:=@file.json`
    DataEmbedRawJsonFile,
    /// `field@path[;type=mime]`
    FileUpload,
}

impl Separator {
    /// Every separator a request item may use
    pub const ALL: [Separator; 10] = [
        Separator::Header,
        Separator::HeaderEmpty,
        Separator::HeaderEmbed,
        Separator::QueryParam,
        Separator::QueryEmbedFile,
        Separator::DataString,
        Separator::DataEmbedFileContents,
        Separator::DataRawJson,
        Separator::DataEmbedRawJsonFile,
        Separator::FileUpload,
    ];

    /// Separators whose items end up in the JSON body
    pub const NESTED_JSON: [Separator; 4] = [
        Separator::DataString,
        Separator::DataEmbedFileContents,
        Separator::DataRawJson,
        Separator::DataEmbedRawJsonFile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Header => ":",
            Separator::HeaderEmpty => ";",
            Separator::HeaderEmbed => ":@",
            Separator::QueryParam => "==",
            Separator::QueryEmbedFile => "==@",
            Separator::DataString => "=",
            Separator::DataEmbedFileContents => "=@",
            Separator::DataRawJson => ":=",
            Separator::DataEmbedRawJsonFile => ":=@",
            Separator::FileUpload => "@",
        }
    }

    pub fn is_nested_json(self) -> bool {
        Self::NESTED_JSON.contains(&self)
    }

    pub fn is_data(self) -> bool {
        self.is_nested_json() || self == Separator::FileUpload
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request item split at its separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueArg {
    pub key: String,
    pub value: String,
    pub sep: Separator,
    /// The item exactly as given on the command line
    pub orig: String,
}

impl KeyValueArg {
    /// Parse a request item using every known separator
    pub fn parse(s: &str) -> Result<Self, RequestItemError> {
        Self::parse_with(s, &Separator::ALL)
    }

    /// Parse `s` looking only for `separators`.
    ///
    /// A backslash in front of a separator character makes it literal. The
    /// earliest separator wins; among separators starting at the same place
    /// the longest one wins.
    pub fn parse_with(s: &str, separators: &[Separator]) -> Result<Self, RequestItemError> {
        let special: Vec<char> = separators
            .iter()
            .flat_map(|sep| sep.as_str().chars())
            .collect();
        let chunks = split_escaped(s, &special);

        for (i, chunk) in chunks.iter().enumerate() {
            let Chunk::Plain(text) = chunk else {
                continue;
            };
            let Some((pos, sep)) = find_separator(text, separators) else {
                continue;
            };

            let mut key = join_chunks(&chunks[..i]);
            key.push_str(&text[..pos]);
            let mut value = text[pos + sep.as_str().len()..].to_string();
            value.push_str(&join_chunks(&chunks[i + 1..]));

            tracing::debug!("Parsed request item {:?} as {:?} {} {:?}", s, key, sep, value);
            return Ok(Self {
                key,
                value,
                sep,
                orig: s.to_string(),
            });
        }

        Err(RequestItemError::InvalidItem(s.to_string()))
    }
}

impl fmt::Display for KeyValueArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.orig)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk {
    Plain(String),
    Escaped(char),
}

fn split_escaped(s: &str, special: &[char]) -> Vec<Chunk> {
    let mut chunks = vec![Chunk::Plain(String::new())];
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        let mut plain = String::new();
        if ch == '\\' {
            match chars.next() {
                Some(next) if special.contains(&next) => {
                    chunks.push(Chunk::Escaped(next));
                    chunks.push(Chunk::Plain(String::new()));
                    continue;
                }
                Some(next) => {
                    plain.push(ch);
                    plain.push(next);
                }
                None => plain.push(ch),
            }
        } else {
            plain.push(ch);
        }

        if let Some(Chunk::Plain(last)) = chunks.last_mut() {
            last.push_str(&plain);
        }
    }
    chunks
}

fn find_separator(text: &str, separators: &[Separator]) -> Option<(usize, Separator)> {
    separators
        .iter()
        .filter_map(|sep| text.find(sep.as_str()).map(|pos| (pos, *sep)))
        .min_by(|(a_pos, a_sep), (b_pos, b_sep)| {
            a_pos
                .cmp(b_pos)
                .then(b_sep.as_str().len().cmp(&a_sep.as_str().len()))
        })
}

fn join_chunks(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .fold(String::new(), |mut joined, chunk| {
            match chunk {
                Chunk::Plain(text) => joined.push_str(text),
                Chunk::Escaped(ch) => joined.push(*ch),
            }
            joined
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> KeyValueArg {
        KeyValueArg::parse(s).unwrap()
    }

    #[test]
    fn parse_should_split_header() {
        let arg = parse("Accept:application/json");
        assert_eq!(arg.key, "Accept");
        assert_eq!(arg.sep, Separator::Header);
        assert_eq!(arg.value, "application/json");
        assert_eq!(arg.orig, "Accept:application/json");
    }

    #[test]
    fn parse_should_prefer_earliest_separator() {
        let arg = parse("search==a=b");
        assert_eq!(arg.sep, Separator::QueryParam);
        assert_eq!(arg.value, "a=b");

        let arg = parse("url=http://example.org");
        assert_eq!(arg.sep, Separator::DataString);
        assert_eq!(arg.value, "http://example.org");
    }

    #[test]
    fn parse_should_prefer_longest_separator_at_same_position() {
        assert_eq!(parse("a:=1").sep, Separator::DataRawJson);
        assert_eq!(parse("a:=@f.json").sep, Separator::DataEmbedRawJsonFile);
        assert_eq!(parse("a==@q.txt").sep, Separator::QueryEmbedFile);
        assert_eq!(parse("a=@f.txt").sep, Separator::DataEmbedFileContents);
        assert_eq!(parse("X-Token:@token.txt").sep, Separator::HeaderEmbed);
    }

    #[test]
    fn parse_should_read_empty_header_and_upload() {
        let arg = parse("X-Empty;");
        assert_eq!(arg.sep, Separator::HeaderEmpty);
        assert_eq!(arg.value, "");

        let arg = parse("avatar@~/me.png;type=image/png");
        assert_eq!(arg.sep, Separator::FileUpload);
        assert_eq!(arg.value, "~/me.png;type=image/png");
    }

    #[test]
    fn parse_should_honor_escaped_separators() {
        let arg = parse("a\\=b=c");
        assert_eq!(arg.key, "a=b");
        assert_eq!(arg.sep, Separator::DataString);
        assert_eq!(arg.value, "c");

        let arg = parse("key=v\\=al");
        assert_eq!(arg.value, "v=al");
    }

    #[test]
    fn parse_should_keep_nested_json_escapes() {
        let arg = parse("a\\[b\\]=1");
        assert_eq!(arg.key, "a\\[b\\]");
        assert_eq!(arg.value, "1");
    }

    #[test]
    fn parse_should_keep_double_backslash_before_separator() {
        let arg = parse("a\\\\=b");
        assert_eq!(arg.key, "a\\\\");
        assert_eq!(arg.value, "b");
    }

    #[test]
    fn parse_should_reject_item_without_separator() {
        let error = KeyValueArg::parse("no-separator").unwrap_err();
        assert_eq!(error.to_string(), "\"no-separator\" is not a valid value");

        assert!(KeyValueArg::parse("only\\=escaped").is_err());
    }

    #[test]
    fn parse_with_should_restrict_separators() {
        let arg = KeyValueArg::parse_with("user:pa=ss", &[Separator::Header]).unwrap();
        assert_eq!(arg.key, "user");
        assert_eq!(arg.value, "pa=ss");
    }

    #[test]
    fn separator_should_classify_data_items() {
        assert!(Separator::DataRawJson.is_nested_json());
        assert!(Separator::FileUpload.is_data());
        assert!(!Separator::FileUpload.is_nested_json());
        assert!(!Separator::Header.is_data());
    }
}
