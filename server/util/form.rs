/// Decodes a form value: `%XX` escapes, and `+` as space.
///
/// Decoded bytes are reassembled as UTF-8; invalid sequences are replaced.
pub fn url_decode(s: &str) -> String {
    decode(s, true)
}

/// Decodes a URL path segment. Only `%XX` escapes are expanded; `+` is literal.
pub fn path_decode(s: &str) -> String {
    decode(s, false)
}

fn decode(s: &str, plus_is_space: bool) -> String {
    let mut out: Vec<u8> = Vec::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' if plus_is_space => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hi = (bytes[i + 1] as char).to_digit(16);
                let lo = (bytes[i + 2] as char).to_digit(16);
                match (hi, lo) {
                    (Some(h), Some(l)) => {
                        out.push(((h << 4) | l) as u8);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parses `key=value&key2=value2` into a `Vec` of `(key, value)` pairs.
pub fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut it = pair.splitn(2, '=');
            let k = it.next()?.to_owned();
            let v = it.next().unwrap_or("").to_owned();
            Some((url_decode(&k), url_decode(&v)))
        })
        .collect()
}

/// Looks up a key in parsed form pairs, returning the value if found.
pub fn form_get<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// Interprets an HTML form checkbox / boolean field.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_percent_and_plus() {
        assert_eq!(url_decode("a+b%2Fc%3D%3D"), "a b/c==");
        assert_eq!(url_decode("caf%C3%A9"), "café");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn path_segments_keep_plus() {
        assert_eq!(path_decode("a+b%20c.jpg"), "a+b c.jpg");
        assert_eq!(path_decode("..%2Fsecret"), "../secret");
    }

    #[test]
    fn parses_pairs() {
        let pairs = parse_form("k=3&image_data=abc%2B&empty=");
        assert_eq!(form_get(&pairs, "k"), Some("3"));
        assert_eq!(form_get(&pairs, "image_data"), Some("abc+"));
        assert_eq!(form_get(&pairs, "empty"), Some(""));
        assert_eq!(form_get(&pairs, "missing"), None);
        assert!(parse_form("").is_empty());
    }

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag("On"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
