//! String segmentation utilities used by node matching and template parsing.
//!
//! These are pure functions over borrowed string slices; no allocation
//! happens here. The separator constants define the template grammar shared
//! by [`Router::add_route`](crate::Router::add_route) and the node matchers.

/// Boundary between URI segments.
pub const ROUTE_PATH_SEPARATOR: char = '/';

/// Auxiliary separator. Exact-literal runs are split and matched at `_` as
/// well as `/`, so templates sharing a literal run up to an underscore
/// (`orders_pending`, `orders_complete`) share a single tree node.
pub const ROUTE_STRING_SEPARATOR: char = '_';

/// The reserved catch-all token, also the parameter name of an unnamed
/// catch-all node.
pub const CATCH_ALL_PARAM_NAME: &str = "**";

/// Result of [`split_uri_by_path_separator`]: `head` runs up to and including
/// the first separator, `tail` is the remainder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SplitUri<'a> {
    pub head: &'a str,
    pub tail: &'a str,
}

/// Result of [`extract_uri_param`]: the captured substring and the text left
/// unconsumed after the postfix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtractedUriParam<'a> {
    pub param: &'a str,
    pub rest: &'a str,
}

/// Splits `text` at the first occurrence of any of `separators`.
///
/// The separator itself stays on the `head` side. If no separator occurs,
/// `head` is the whole string and `tail` is empty.
pub fn split_uri_by_path_separator<'a>(text: &'a str, separators: &[char]) -> SplitUri<'a> {
    match text.find(|c| separators.contains(&c)) {
        Some(at) => {
            // All grammar separators are ASCII, but stay correct for any char.
            let end = at + text[at..].chars().next().map_or(0, char::len_utf8);
            SplitUri {
                head: &text[..end],
                tail: &text[end..],
            }
        }
        None => SplitUri {
            head: text,
            tail: "",
        },
    }
}

/// Extracts the substring of `text` bounded by a literal `prefix` and
/// `postfix`.
///
/// Returns `None` if `text` is shorter than `prefix`, does not start with
/// `prefix`, or the remaining text does not contain `postfix`. An empty
/// `postfix` captures up to and including the next path separator, or the
/// whole remainder when no separator follows.
pub fn extract_uri_param<'a>(
    text: &'a str,
    prefix: &str,
    postfix: &str,
) -> Option<ExtractedUriParam<'a>> {
    if text.len() < prefix.len() || !text.starts_with(prefix) {
        return None;
    }

    let remainder = &text[prefix.len()..];

    if postfix.is_empty() {
        let split = split_uri_by_path_separator(remainder, &[ROUTE_PATH_SEPARATOR]);
        return Some(ExtractedUriParam {
            param: split.head,
            rest: split.tail,
        });
    }

    let at = remainder.find(postfix)?;
    Some(ExtractedUriParam {
        param: &remainder[..at],
        rest: &remainder[at + postfix.len()..],
    })
}
