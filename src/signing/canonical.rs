//! Canonical query and string-to-sign construction.

use crate::request::{EncodingProfile, FormParams};

/// RFC 3986 encoding of parameters that are already sorted by name.
pub fn canonical_query(sorted: &FormParams) -> String {
    sorted.encode(EncodingProfile::Rfc3986)
}

/// `<method>\n<host>\n<path>\n<canonical query>`.
pub fn string_to_sign(method: &str, host: &str, path: &str, sorted: &FormParams) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method,
        host.to_ascii_lowercase(),
        if path.is_empty() { "/" } else { path },
        canonical_query(sorted)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_sign_layout() {
        let params: FormParams = vec![("Action", "DescribeImages"), ("Name", "a b")]
            .into_iter()
            .collect();
        assert_eq!(
            string_to_sign("POST", "EC2.amazonaws.com", "", &params),
            "POST\nec2.amazonaws.com\n/\nAction=DescribeImages&Name=a%20b"
        );
    }
}
