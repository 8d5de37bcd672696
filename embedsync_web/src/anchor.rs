// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fragment links as written in markup.

use std::borrow::Cow;

/// Percent-decode the fragment of a same-page link, so `#S%C3%A9ction` targets the id `Séction`.
///
/// Other links, and fragments that do not decode to UTF-8, are returned unchanged.
pub fn decode_fragment(href: &str) -> Cow<'_, str> {
    let Some(fragment) = href.strip_prefix('#') else {
        return Cow::Borrowed(href);
    };
    match urlencoding::decode(fragment) {
        Ok(Cow::Owned(decoded)) => Cow::Owned(format!("#{decoded}")),
        Ok(Cow::Borrowed(_)) | Err(_) => Cow::Borrowed(href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_fragment_is_decoded() {
        assert_eq!(decode_fragment("#S%C3%A9ction"), "#Séction");
        assert_eq!(decode_fragment("#a%20b"), "#a b");
    }

    #[test]
    fn plain_fragment_is_borrowed() {
        assert!(matches!(decode_fragment("#intro"), Cow::Borrowed("#intro")));
    }

    #[test]
    fn non_fragments_and_bad_utf8_are_unchanged() {
        assert_eq!(decode_fragment("guide.html#S%C3%A9ction"), "guide.html#S%C3%A9ction");
        assert_eq!(decode_fragment("#%FF"), "#%FF");
    }
}
