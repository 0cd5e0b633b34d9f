use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes a Base64 string, accepting the standard and URL-safe alphabets
/// with or without padding. Embedded whitespace and line breaks are ignored.
///
/// # Returns
/// The decoded text (invalid UTF-8 replaced), or `None` if no alphabet fits.
pub fn base64_decode(input: &str) -> Option<String> {
    let clean: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if clean.is_empty() {
        return None;
    }

    let engines = [
        &general_purpose::STANDARD,
        &general_purpose::STANDARD_NO_PAD,
        &general_purpose::URL_SAFE,
        &general_purpose::URL_SAFE_NO_PAD,
    ];
    engines
        .iter()
        .find_map(|engine| engine.decode(&clean).ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
