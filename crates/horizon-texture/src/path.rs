//! Texture references are authored by hand or by exporters, these helpers turn them into stable cache identities.

const BUMP_MULTIPLIER_TOKEN: &str = "-bm ";

/// Removes a leading bump multiplier option (`-bm 0.5 normal.png`), keeping only the file reference.
pub fn strip_decorations(reference: &str) -> &str {
    if let Some(token_pos) = reference.find(BUMP_MULTIPLIER_TOKEN) {
        let value_start = token_pos + BUMP_MULTIPLIER_TOKEN.len();
        if let Some(value_len) = reference[value_start..].find(' ') {
            return &reference[value_start + value_len + 1..];
        }
    }

    reference
}

/// Strips decorations and uses forward slashes as the only separator.
pub fn normalize_reference(reference: &str) -> String {
    strip_decorations(reference.trim()).trim().replace('\\', "/")
}

fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/') || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Cache identity of a texture reference found in an asset stored in `directory`.
pub fn resolve_identity(reference: &str, directory: &str) -> String {
    let reference = normalize_reference(reference);
    let directory = directory.replace('\\', "/");
    let directory = directory.trim_end_matches('/');

    if directory.is_empty() || is_absolute(&reference) {
        reference
    } else {
        format!("{}/{}", directory, reference.trim_start_matches("./"))
    }
}

/// Containing directory of an asset path, everything before the last separator of either kind.
pub fn directory_of(path: &str) -> &str {
    path.rfind(|c: char| c == '/' || c == '\\').map_or("", |separator| &path[..separator])
}
