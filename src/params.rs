//! Parameter records extracted during a match attempt.
//!
//! A [`UriParams`] collection is produced fresh for every match attempt and
//! never mutated afterwards: extending a collection goes through
//! [`copy_path_params`], which returns a copy. No node ever observes another
//! match attempt's parameters.

/// A single named path parameter extracted from a URI segment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathParam {
    pub name: String,
    pub value: String,
}

/// The capture groups of a regex-constrained parameter.
///
/// `groups[0]` is the whole matched substring; subsequent entries follow the
/// pattern's capture-group order. Groups that did not participate in the
/// match are recorded as empty strings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegexParam {
    pub name: String,
    pub groups: Vec<String>,
}

/// Constructs a [`PathParam`] record.
pub fn make_param(name: impl Into<String>, value: impl Into<String>) -> PathParam {
    PathParam {
        name: name.into(),
        value: value.into(),
    }
}

/// Constructs a [`RegexParam`] record from an ordered capture list.
pub fn make_regex_param(name: impl Into<String>, groups: Vec<String>) -> RegexParam {
    RegexParam {
        name: name.into(),
        groups,
    }
}

/// All parameters collected along one root-to-node match, in extraction
/// order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UriParams {
    pub path_params: Vec<PathParam>,
    pub regex_params: Vec<RegexParam>,
}

impl UriParams {
    /// Returns the value of the first path parameter with the given name.
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|param| param.name == name)
            .map(|param| param.value.as_str())
    }

    /// Returns the capture groups of the first regex parameter with the
    /// given name.
    pub fn get_regex_param(&self, name: &str) -> Option<&[String]> {
        self.regex_params
            .iter()
            .find(|param| param.name == name)
            .map(|param| param.groups.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.path_params.is_empty() && self.regex_params.is_empty()
    }
}

/// Returns a copy of `params` with `path_param` (and optionally
/// `regex_param`) appended. The source collection is left untouched.
pub fn copy_path_params(
    params: &UriParams,
    path_param: PathParam,
    regex_param: Option<RegexParam>,
) -> UriParams {
    let mut copied = params.clone();
    copied.path_params.push(path_param);
    if let Some(regex_param) = regex_param {
        copied.regex_params.push(regex_param);
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_param_builds_record() {
        let param = make_param("id", "23");
        assert_eq!(param.name, "id");
        assert_eq!(param.value, "23");
    }

    #[test]
    fn make_regex_param_keeps_group_order() {
        let param = make_regex_param("id", vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(param.name, "id");
        assert_eq!(param.groups, vec!["p1", "p2"]);
    }

    #[test]
    fn copy_path_params_leaves_source_untouched() {
        let orig = UriParams {
            path_params: vec![make_param("id", "11")],
            regex_params: Vec::new(),
        };

        let copied = copy_path_params(&orig, make_param("model", "T"), None);

        assert_eq!(copied.get_path_param("id"), Some("11"));
        assert_eq!(copied.get_path_param("model"), Some("T"));
        assert_eq!(orig.path_params.len(), 1);
        assert_eq!(orig.get_path_param("model"), None);
    }

    #[test]
    fn copy_path_params_appends_regex_param() {
        let orig = UriParams::default();
        let copied = copy_path_params(
            &orig,
            make_param("year", "2015"),
            Some(make_regex_param(
                "year",
                vec!["2015".to_string(), "2015".to_string()],
            )),
        );

        assert_eq!(
            copied.get_regex_param("year"),
            Some(&["2015".to_string(), "2015".to_string()][..])
        );
        assert!(orig.is_empty());
    }
}
