use percent_encoding::percent_decode_str;

/// Name used when the response does not suggest one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "analysis.csv";

/// Suggested filename from a `Content-Disposition` header value.
///
/// `filename*=UTF-8''…` wins over `filename=…` / `filename="…"`. The value is
/// percent-decoded; anything absent, empty or undecodable yields
/// [`DEFAULT_DOWNLOAD_NAME`].
pub fn filename_from_disposition(header: Option<&str>) -> String {
    header
        .and_then(parse_filename)
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

fn parse_filename(header: &str) -> Option<String> {
    let mut extended = None;
    let mut plain = None;
    for (name, value) in split_params(header) {
        if name.eq_ignore_ascii_case("filename*") {
            extended.get_or_insert(value);
        } else if name.eq_ignore_ascii_case("filename") {
            plain.get_or_insert(value);
        }
    }

    extended
        .as_deref()
        .and_then(strip_utf8_prefix)
        .and_then(percent_decode)
        .or_else(|| plain.as_deref().and_then(percent_decode))
}

fn strip_utf8_prefix(value: &str) -> Option<&str> {
    const PREFIX: &str = "UTF-8''";
    value
        .get(..PREFIX.len())
        .filter(|head| head.eq_ignore_ascii_case(PREFIX))
        .map(|_| &value[PREFIX.len()..])
}

fn percent_decode(value: &str) -> Option<String> {
    let decoded = percent_decode_str(value).decode_utf8().ok()?;
    let decoded = decoded.trim();
    (!decoded.is_empty()).then(|| decoded.to_string())
}

/// `name=value` pairs separated by `;`, honouring quoted values.
fn split_params(header: &str) -> Vec<(String, String)> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    for c in header.chars() {
        match c {
            _ if escaped => {
                current.push(c);
                escaped = false;
            }
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);

    segments
        .into_iter()
        .filter_map(|segment| {
            let (name, value) = segment.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
