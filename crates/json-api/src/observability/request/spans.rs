//! Route normalisation for request spans.

use uuid::Uuid;

/// Replace uuid path segments so per-entity requests share one route label.
pub(super) fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else if is_order_number(segment) {
            normalised.push_str("{order_number}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

fn is_order_number(segment: &str) -> bool {
    segment
        .strip_prefix("ISP-")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_identifiers() {
        assert_eq!(
            normalise_path("/orders/0190d6c4-8a4e-7b3c-9d2e-1f2a3b4c5d6e"),
            "/orders/{uuid}"
        );
        assert_eq!(normalise_path("/orders/ISP-1000"), "/orders/{order_number}");
        assert_eq!(normalise_path("/products/flash-cards"), "/products/flash-cards");
        assert_eq!(normalise_path("/"), "/");
    }
}
