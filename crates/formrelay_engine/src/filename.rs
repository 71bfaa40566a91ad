use crate::disposition::DEFAULT_DOWNLOAD_NAME;

const MAX_FILENAME_BYTES: usize = 120;

/// Filesystem-safe version of a server-suggested download name.
///
/// Path separators and other characters Windows rejects become `_`, so the
/// result always names a file directly inside the download directory.
pub fn safe_filename(suggested: &str) -> String {
    let cleaned: String = suggested
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut name = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if name.is_empty() {
        return DEFAULT_DOWNLOAD_NAME.to_string();
    }
    if name.len() > MAX_FILENAME_BYTES {
        name = truncate_keeping_extension(&name, MAX_FILENAME_BYTES);
    }
    if is_reserved_windows_name(stem(&name)) {
        name.insert(stem(&name).len(), '_');
    }
    name
}

fn truncate_keeping_extension(name: &str, max: usize) -> String {
    let ext = name
        .rfind('.')
        .map(|idx| &name[idx..])
        .filter(|ext| ext.len() <= 16)
        .unwrap_or("");
    let mut end = max.saturating_sub(ext.len());
    while end > 0 && !name.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &name[..end], ext)
}

fn stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
