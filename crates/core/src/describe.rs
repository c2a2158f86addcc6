/// One piece of a segmented description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionSegment {
    /// Plain text, rendered as-is.
    Text(String),
    /// An `http://`/`https://` URL, rendered as a link.
    Link(String),
    /// A line break.
    Break,
}

/// Split raw multi-line description text into renderable segments.
///
/// Lines are split on `\r\n`, `\r` or `\n`; within each line, runs starting
/// with `http://` or `https://` and extending to the next whitespace become
/// [`DescriptionSegment::Link`]s. Trailing breaks are trimmed. The host
/// renderer decides how the segments materialize; this is the pure half of
/// description rendering.
pub fn segment_description(text: &str) -> Vec<DescriptionSegment> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut segments = Vec::new();
    for line in normalized.split('\n') {
        segment_line(line, &mut segments);
        segments.push(DescriptionSegment::Break);
    }
    while segments.last() == Some(&DescriptionSegment::Break) {
        segments.pop();
    }
    segments
}

fn segment_line(line: &str, out: &mut Vec<DescriptionSegment>) {
    let mut rest = line;
    loop {
        let Some(start) = find_scheme(rest) else {
            if !rest.is_empty() {
                out.push(DescriptionSegment::Text(rest.to_string()));
            }
            return;
        };
        if start > 0 {
            out.push(DescriptionSegment::Text(rest[..start].to_string()));
        }
        let link = &rest[start..];
        let end = link
            .find(char::is_whitespace)
            .unwrap_or(link.len());
        out.push(DescriptionSegment::Link(link[..end].to_string()));
        rest = &link[end..];
    }
}

/// Byte offset of the first `http://` or `https://` occurrence, if any.
fn find_scheme(s: &str) -> Option<usize> {
    let http = s.find("http://");
    let https = s.find("https://");
    match (http, https) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
