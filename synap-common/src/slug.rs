//! URL slug generation

/// Convert a display name into a URL slug
///
/// Lower-cases and trims the input, turns whitespace runs into `-`, drops
/// everything that is not an ASCII word character or `-`, then collapses
/// repeated dashes.
///
/// # Examples
///
/// ```
/// use synap_common::slug::slugify;
///
/// assert_eq!(slugify("Apps & Tools"), "apps-tools");
/// assert_eq!(slugify("  Gen AI  "), "gen-ai");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let mut dashed = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                dashed.push('-');
            }
            in_space = true;
        } else {
            dashed.push(c);
            in_space = false;
        }
    }

    let mut slug = String::with_capacity(dashed.len());
    for c in dashed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
    {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    slug
}
