// Query parameter encoding for the crawler's `urls` argument
use serde::Deserialize;

/// Separator the crawler splits the `urls` parameter on.
pub const URL_SEPARATOR: &str = ";";

/// How the URL list is turned into the `urls` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EscapeMode {
    /// Percent-encode the joined list as is.
    #[default]
    Joined,
    /// Unicode-escape every URL before joining, then percent-encode.
    PerUrl,
}

pub fn join_urls<S: AsRef<str>>(urls: &[S]) -> String {
    urls.iter()
        .map(|u| u.as_ref())
        .collect::<Vec<_>>()
        .join(URL_SEPARATOR)
}

/// Replaces backslashes, control characters and everything outside ASCII
/// with `\\`, `\t`, `\xNN`, `\uNNNN` or `\UNNNNNNNN` escapes.
pub fn unicode_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' '..='~' => out.push(ch),
            _ if code < 0x100 => out.push_str(&format!("\\x{:02x}", code)),
            _ if code < 0x10000 => out.push_str(&format!("\\u{:04x}", code)),
            _ => out.push_str(&format!("\\U{:08x}", code)),
        }
    }
    out
}

/// Builds the value of the `urls` query parameter.
pub fn encode_urls<S: AsRef<str>>(urls: &[S], mode: EscapeMode) -> String {
    let joined = match mode {
        EscapeMode::Joined => join_urls(urls),
        EscapeMode::PerUrl => {
            let escaped: Vec<String> = urls.iter().map(|u| unicode_escape(u.as_ref())).collect();
            join_urls(&escaped)
        }
    };
    urlencoding::encode(&joined).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_semicolon() {
        assert_eq!(join_urls(&["http://a.com/", "http://b.com/"]), "http://a.com/;http://b.com/");
        assert_eq!(join_urls::<&str>(&[]), "");
    }

    #[test]
    fn encodes_joined_list() {
        let encoded = encode_urls(&["http://a.com/", "http://b.com/"], EscapeMode::Joined);
        assert_eq!(encoded, urlencoding::encode("http://a.com/;http://b.com/"));
        assert_eq!(encoded, "http%3A%2F%2Fa.com%2F%3Bhttp%3A%2F%2Fb.com%2F");
    }

    #[test]
    fn empty_list_encodes_to_empty_value() {
        assert_eq!(encode_urls::<String>(&[], EscapeMode::Joined), "");
        assert_eq!(encode_urls::<String>(&[], EscapeMode::PerUrl), "");
    }

    #[test]
    fn unicode_escape_leaves_ascii_alone() {
        assert_eq!(unicode_escape("https://github.com/x?q=1&b=2"), "https://github.com/x?q=1&b=2");
    }

    #[test]
    fn unicode_escape_covers_all_widths() {
        assert_eq!(unicode_escape("caf\u{e9}"), "caf\\xe9");
        assert_eq!(unicode_escape("\u{43f}"), "\\u043f");
        assert_eq!(unicode_escape("\u{1f600}"), "\\U0001f600");
        assert_eq!(unicode_escape("a\\b\tc\n\u{1}"), "a\\\\b\\tc\\n\\x01");
    }

    #[test]
    fn modes_differ_only_for_non_ascii() {
        let ascii = ["http://a.com/"];
        assert_eq!(
            encode_urls(&ascii, EscapeMode::Joined),
            encode_urls(&ascii, EscapeMode::PerUrl)
        );

        let cyrillic = ["http://\u{43f}.com/"];
        assert_eq!(encode_urls(&cyrillic, EscapeMode::Joined), "http%3A%2F%2F%D0%BF.com%2F");
        assert_eq!(encode_urls(&cyrillic, EscapeMode::PerUrl), "http%3A%2F%2F%5Cu043f.com%2F");
    }
}
