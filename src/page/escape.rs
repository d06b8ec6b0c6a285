use regex::Regex;
use std::sync::OnceLock;

// Entities escape() emits. A '&' that already starts one of these is
// left alone, which keeps escape() idempotent.
const ENTITIES: &[&str] = &["amp;", "lt;", "gt;", "quot;", "#39;"];

/// HTML-escapes `& < > " '`. Every upstream-supplied string interpolated
/// into a page goes through here, whether it lands in a text node or an
/// attribute value.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, c) in input.char_indices() {
        match c {
            '&' => {
                let rest = &input[i + 1..];
                if ENTITIES.iter().any(|e| rest.starts_with(e)) {
                    out.push('&');
                } else {
                    out.push_str("&amp;");
                }
            }
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Removes embedded markup. Review bodies may carry raw HTML from
/// upstream; they get stripped before they are escaped.
pub fn strip_tags(input: &str) -> String {
    tag_pattern().replace_all(input, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape(input: &str) -> String {
        input
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    #[test]
    fn test_escapes_all_special_chars() {
        assert_eq!(
            escape(r#"<b>Tom & Jerry's "show"</b>"#),
            "&lt;b&gt;Tom &amp; Jerry&#39;s &quot;show&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_is_idempotent() {
        let samples = [
            "plain text",
            "<script>alert(1)</script>",
            "Tom & Jerry",
            r#"a "quoted" 'string'"#,
            "already &amp; escaped &lt;here&gt;",
        ];
        for s in samples {
            let once = escape(s);
            assert_eq!(escape(&once), once, "double escape changed: {}", s);
        }
    }

    #[test]
    fn test_escape_round_trips() {
        let samples = ["<script>", "a & b", "\"it's\"", "no special chars"];
        for s in samples {
            assert_eq!(unescape(&escape(s)), s);
        }
    }

    #[test]
    fn test_no_raw_script_survives() {
        let escaped = escape("<script>document.cookie</script>");
        assert!(!escaped.contains("<script>"));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Great <em>movie</em>!</p>"), "Great movie!");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("<img src=x onerror=alert(1)>"), "");
    }

    #[test]
    fn test_strip_then_escape() {
        let body = "<p>5 > 4 & 3 < 4</p>";
        assert_eq!(escape(&strip_tags(body)), "5 &gt; 4 &amp; 3 &lt; 4");
    }
}
