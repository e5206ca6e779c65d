/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    if !content_type.trim_start().to_ascii_lowercase().starts_with("multipart/form-data") {
        return None;
    }
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// One decoded part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    /// Present only for file inputs.
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// Parses every part of a multipart/form-data body that carries a
/// `Content-Disposition` name.
pub fn parse_parts(body: &[u8], boundary: &str) -> Vec<Part> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";
    let mut result = Vec::new();

    for part in split_on(body, delimiter.as_bytes()) {
        let Some(sep_pos) = find_subsequence(part, sep) else { continue };
        let headers_str = String::from_utf8_lossy(&part[..sep_pos]);
        let Some(disposition) = headers_str
            .lines()
            .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))
        else {
            continue;
        };
        let Some(name) = disposition_param(disposition, "name") else { continue };

        let raw = &part[sep_pos + sep.len()..];
        let data = raw.strip_suffix(b"\r\n").unwrap_or(raw).to_vec();
        result.push(Part { name, filename: disposition_param(disposition, "filename"), data });
    }
    result
}

/// Returns the named part, file or text.
pub fn find_part(body: &[u8], boundary: &str, field_name: &str) -> Option<Part> {
    parse_parts(body, boundary).into_iter().find(|p| p.name == field_name)
}

/// Extracts a plain-text (non-file) field from a multipart body.
pub fn extract_text_field(body: &[u8], boundary: &str, field_name: &str) -> Option<String> {
    parse_parts(body, boundary)
        .into_iter()
        .find(|p| p.name == field_name && p.filename.is_none())
        .and_then(|p| String::from_utf8(p.data).ok())
}

/// Reads `key="value"` (or unquoted `key=value`) from a Content-Disposition
/// header line. Matches whole parameter names, so `name` never matches
/// inside `filename`.
fn disposition_param(disposition: &str, key: &str) -> Option<String> {
    disposition.split(';').skip(1).find_map(|param| {
        let (k, v) = param.trim().split_once('=')?;
        if k.trim().eq_ignore_ascii_case(key) {
            Some(v.trim().trim_matches('"').to_owned())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----bloomtest";

    fn body() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(b"------bloomtest\r\n");
        b.extend_from_slice(b"Content-Disposition: form-data; name=\"use_camera\"\r\n\r\n");
        b.extend_from_slice(b"true\r\n");
        b.extend_from_slice(b"------bloomtest\r\n");
        b.extend_from_slice(b"Content-Disposition: form-data; name=\"file\"; filename=\"file\"\r\n");
        b.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        b.extend_from_slice(&[0, 159, 146, 150, b'\r', b'\n', 7]);
        b.extend_from_slice(b"\r\n------bloomtest--\r\n");
        b
    }

    #[test]
    fn boundary_is_extracted() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"abc\"").as_deref(),
            Some("abc")
        );
        assert!(extract_boundary("application/x-www-form-urlencoded").is_none());
        assert!(extract_boundary("multipart/form-data").is_none());
    }

    #[test]
    fn file_part_keeps_binary_content_and_filename() {
        let part = find_part(&body(), BOUNDARY, "file").unwrap();
        assert_eq!(part.filename.as_deref(), Some("file"));
        assert_eq!(part.data, vec![0, 159, 146, 150, b'\r', b'\n', 7]);
    }

    #[test]
    fn text_field_is_read() {
        assert_eq!(extract_text_field(&body(), BOUNDARY, "use_camera").as_deref(), Some("true"));
        // A file part is never returned as text.
        assert!(extract_text_field(&body(), BOUNDARY, "file").is_none());
    }

    #[test]
    fn name_does_not_match_inside_filename() {
        assert_eq!(
            disposition_param("Content-Disposition: form-data; filename=\"x.png\"", "name"),
            None
        );
    }
}
