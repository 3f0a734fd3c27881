//! Parse HTTP response header lines into HeadResult.

use super::HeadResult;

/// Parse collected header lines into HeadResult.
///
/// With redirects, curl reports headers of every hop. Each `HTTP/` status
/// line starts a new hop and clears what came before, so only the final
/// response's headers count.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut content_length = None;
    let mut etag = None;
    let mut last_modified = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            etag = None;
            last_modified = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("etag") {
                etag = Some(value.trim_matches('"').to_string());
            }
            if name.eq_ignore_ascii_case("last-modified") {
                last_modified = Some(value.to_string());
            }
        }
    }

    HeadResult {
        content_length,
        etag,
        last_modified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_headers_content_length() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 10485760".to_string(),
            "x-ms-blob-type: BlockBlob".to_string(),
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.content_length, Some(10_485_760));
        assert!(r.etag.is_none());
    }

    #[test]
    fn parse_headers_etag_and_last_modified() {
        let lines = [
            "ETag: \"0x8DD1\"".to_string(),
            "Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT".to_string(),
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.etag.as_deref(), Some("0x8DD1"));
        assert_eq!(
            r.last_modified.as_deref(),
            Some("Wed, 21 Oct 2015 07:28:00 GMT")
        );
        assert!(r.content_length.is_none());
    }

    #[test]
    fn parse_headers_last_hop_wins() {
        let lines = [
            "HTTP/1.1 302 Found".to_string(),
            "Content-Length: 0".to_string(),
            "".to_string(),
            "HTTP/1.1 200 OK".to_string(),
            "Content-Length: 999".to_string(),
        ];
        assert_eq!(parse_headers(&lines).content_length, Some(999));
    }

    #[test]
    fn parse_headers_redirect_length_not_carried_over() {
        let lines = [
            "HTTP/1.1 302 Found".to_string(),
            "Content-Length: 0".to_string(),
            "ETag: \"hop\"".to_string(),
            "".to_string(),
            "HTTP/1.1 200 OK".to_string(),
            "Transfer-Encoding: chunked".to_string(),
        ];
        let r = parse_headers(&lines);
        assert!(r.content_length.is_none());
        assert!(r.etag.is_none());
    }

    #[test]
    fn parse_headers_garbage_length_ignored() {
        let lines = ["Content-Length: lots".to_string()];
        assert!(parse_headers(&lines).content_length.is_none());
    }
}
