//! Name-casing helpers for artifact names.
//!
//! Artifact names arrive as user input (`my-dir`, `myDir`, `my_dir`) and are
//! turned into file names, class names and selectors.

fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(['-', '_', ' ']).filter(|w| !w.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

fn decapitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a string to camelCase (e.g., "my-dir" -> "myDir")
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    for (i, word) in words(s).enumerate() {
        if i == 0 {
            result.push_str(&decapitalize(word));
        } else {
            result.push_str(&capitalize(word));
        }
    }
    result
}

/// Convert a string to PascalCase (e.g., "my-dir" -> "MyDir")
pub fn to_pascal_case(s: &str) -> String {
    words(s).map(capitalize).collect()
}

/// Convert a string to kebab-case (e.g., "myDir" -> "my-dir")
///
/// A dash is inserted before an uppercase letter that follows a lowercase
/// letter or digit; underscores and spaces become dashes.
pub fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        match c {
            '_' | ' ' | '-' => {
                if !result.is_empty() && !result.ends_with('-') {
                    result.push('-');
                }
            }
            c if c.is_uppercase() => {
                if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                    result.push('-');
                }
                result.extend(c.to_lowercase());
            }
            c => result.push(c),
        }
        prev = Some(c);
    }
    while result.ends_with('-') {
        result.pop();
    }
    result
}
