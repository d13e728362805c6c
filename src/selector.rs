use crate::Error;
use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn metric_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("regex is valid"))
}

#[allow(clippy::expect_used)]
fn label_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*$").expect("regex is valid"))
}

/// A metric's name.
///
/// Characters supported: a-z A-Z 0-9 _ : (must not start with a digit)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash, Debug)]
pub struct MetricName<'a>(&'a str);

impl std::fmt::Display for MetricName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> TryFrom<&'a str> for MetricName<'a> {
    type Error = Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if metric_name_regex().is_match(value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidArgument(format!(
                "invalid metric name {value:?}"
            )))
        }
    }
}

impl<'a> std::ops::Deref for MetricName<'a> {
    type Target = &'a str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A label's name.
///
/// Characters supported: a-z A-Z 0-9 _ (must not start with a digit)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash, Debug)]
pub struct LabelName<'a>(&'a str);

impl std::fmt::Display for LabelName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> TryFrom<&'a str> for LabelName<'a> {
    type Error = Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if label_name_regex().is_match(value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidArgument(format!("invalid label name {value:?}")))
        }
    }
}

/// Builds the series selector of a pool.
pub struct Selector;

impl Selector {
    fn escape_label_value(buf: &mut String, value: &str) {
        for c in value.chars() {
            match c {
                '\\' => buf.push_str(r"\\"),
                '"' => buf.push_str(r#"\""#),
                '\n' => buf.push_str(r"\n"),
                c => buf.push(c),
            }
        }
    }

    /// Formats `metric{label="value"}`, escaping the label value.
    ///
    /// ```
    /// use poolusage::{LabelName, MetricName, Selector};
    ///
    /// let metric = MetricName::try_from("ceph_pool_bytes_used")?;
    /// let label = LabelName::try_from("pool_id")?;
    ///
    /// assert_eq!(
    ///     r#"ceph_pool_bytes_used{pool_id="7"}"#,
    ///     Selector::format(metric, label, "7"),
    /// );
    /// #
    /// # Ok::<(), poolusage::Error>(())
    /// ```
    #[must_use]
    pub fn format(metric: MetricName, label: LabelName, value: &str) -> String {
        let mut str = String::with_capacity(metric.len() + label.0.len() + value.len() + 5);
        str.push_str(&metric);
        str.push('{');
        str.push_str(label.0);
        str.push_str("=\"");
        Self::escape_label_value(&mut str, value);
        str.push_str("\"}");
        str
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn metric_names() {
        for name in ["ceph_pool_bytes_used", "node:disk:used", "_x", "A1"] {
            assert!(MetricName::try_from(name).is_ok(), "{name}");
        }

        for name in ["", "1abc", "cpu.total", "a-b", "a b", "x{y}"] {
            assert!(
                matches!(MetricName::try_from(name), Err(Error::InvalidArgument(_))),
                "{name}",
            );
        }
    }

    #[test_log::test]
    fn label_names() {
        assert!(LabelName::try_from("pool_id").is_ok());
        assert!(LabelName::try_from("pool:id").is_err());
        assert!(LabelName::try_from("9pool").is_err());
    }

    #[test_log::test]
    fn create_selector() -> crate::Result<()> {
        assert_eq!(
            r#"ceph_pool_bytes_used{pool_id="7"}"#,
            Selector::format(
                MetricName::try_from("ceph_pool_bytes_used")?,
                LabelName::try_from("pool_id")?,
                "7",
            ),
        );
        Ok(())
    }

    #[test_log::test]
    fn escape_value() -> crate::Result<()> {
        assert_eq!(
            r#"m{pool="a\"b\\c\nd"}"#,
            Selector::format(
                MetricName::try_from("m")?,
                LabelName::try_from("pool")?,
                "a\"b\\c\nd",
            ),
        );
        Ok(())
    }
}
