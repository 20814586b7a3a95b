//! Physical resource name derivation.
//!
//! Every resource gets a deterministic physical name derived from its
//! logical name and the stack-wide prefix: `<prefix><kebab(logical)>`.
//! Early revisions of the stack used a prefix (e.g. `thetatrim-`), later
//! ones dropped it, so the prefix may be empty.

/// Convert a logical name like `PostJobHandler` or `job_object_bucket`
/// into kebab case (`post-job-handler`, `job-object-bucket`).
pub fn kebab_case(logical: &str) -> String {
    let mut out = String::with_capacity(logical.len() + 4);
    let mut prev_lower = false;

    for ch in logical.chars() {
        if ch == '_' || ch == ' ' || ch == '-' {
            if !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        } else if ch.is_ascii_uppercase() {
            if prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }

    out.trim_matches('-').to_string()
}

/// Derive the physical name for a logical name under the given prefix.
/// The prefix is used verbatim, so it usually ends with a separator.
pub fn physical_name(prefix: &str, logical: &str) -> String {
    format!("{}{}", prefix, kebab_case(logical))
}
