use crate::dom::Document;

/// Cookie the server's CSRF middleware sets.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Read one named cookie from the document's cookie string. Returns
/// `None` when the cookie is absent or the string is empty.
pub fn get_cookie(doc: &Document, name: &str) -> Option<String> {
    if doc.cookie.is_empty() {
        return None;
    }
    let prefix = format!("{}=", name);
    doc.cookie
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(percent_decode)
}

pub fn csrf_token(doc: &Document) -> Option<String> {
    get_cookie(doc, CSRF_COOKIE)
}

/// Minimal percent-decoding for cookie values. Malformed escapes pass
/// through untouched.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_cookie(cookie: &str) -> Document {
        let mut doc = Document::new();
        doc.cookie = cookie.to_string();
        doc
    }

    #[test]
    fn test_reads_named_cookie() {
        let doc = doc_with_cookie("sessionid=abc123; csrftoken=tok-42; theme=dark");
        assert_eq!(csrf_token(&doc), Some("tok-42".to_string()));
        assert_eq!(get_cookie(&doc, "theme"), Some("dark".to_string()));
    }

    #[test]
    fn test_missing_cookie_is_none() {
        let doc = doc_with_cookie("sessionid=abc123");
        assert_eq!(csrf_token(&doc), None);
        assert_eq!(get_cookie(&Document::new(), "anything"), None);
    }

    #[test]
    fn test_name_must_match_exactly() {
        // "xcsrftoken" must not satisfy a "csrftoken" lookup
        let doc = doc_with_cookie("xcsrftoken=wrong; csrftoken=right");
        assert_eq!(csrf_token(&doc), Some("right".to_string()));
    }

    #[test]
    fn test_value_is_percent_decoded() {
        let doc = doc_with_cookie("csrftoken=a%2Fb%20c");
        assert_eq!(csrf_token(&doc), Some("a/b c".to_string()));
    }

    #[test]
    fn test_malformed_escape_passes_through() {
        let doc = doc_with_cookie("csrftoken=50%25; other=%zz");
        assert_eq!(csrf_token(&doc), Some("50%".to_string()));
        assert_eq!(get_cookie(&doc, "other"), Some("%zz".to_string()));
    }
}
