use crate::{DateRange, Error, GroupBy, UsageRow};
use std::{io::Write, str::FromStr};

/// Output format of a report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Human readable lines, one per period
    #[default]
    Text,

    /// A single JSON document
    Json,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(Error::InvalidArgument(format!(
                "format must be 'text' or 'json', got {s:?}"
            ))),
        }
    }
}

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    pool_id: &'a str,
    start: String,
    end: String,
    group_by: String,
    rows: &'a [UsageRow],
}

/// Renders usage rows of one pool.
pub struct Report<'a> {
    /// Pool the rows belong to
    pub pool_id: &'a str,

    /// Queried window
    pub range: &'a DateRange,

    /// Calendar period of each row
    pub group_by: GroupBy,

    /// Rows, ordered by period
    pub rows: &'a [UsageRow],
}

impl<'a> Report<'a> {
    /// Keeps only the first `n` rows.
    #[must_use]
    pub fn limit(mut self, n: Option<usize>) -> Self {
        if let Some(n) = n {
            self.rows = self.rows.get(..n).unwrap_or(self.rows);
        }
        self
    }

    /// Formats one row, e.g. `2025-10-01: avg=1.50 GiB, max=2.00 GiB`.
    #[must_use]
    pub fn format_row(row: &UsageRow) -> String {
        format!(
            "{}: avg={:.2} GiB, max={:.2} GiB",
            row.period, row.avg_gib, row.max_gib
        )
    }

    /// Writes a header followed by one line per row.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn write_text<W: Write>(&self, mut writer: W) -> crate::Result<()> {
        writeln!(writer, "Pool ID: {}", self.pool_id)?;
        writeln!(writer, "Range : {}", self.range)?;
        writeln!(writer, "Group : {}", self.group_by)?;
        writeln!(writer, "{}", "-".repeat(60))?;

        for row in self.rows {
            writeln!(writer, "{}", Self::format_row(row))?;
        }

        Ok(())
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn write_json<W: Write>(&self, mut writer: W) -> crate::Result<()> {
        let report = JsonReport {
            pool_id: self.pool_id,
            start: self.range.start_param(),
            end: self.range.end_param(),
            group_by: self.group_by.to_string(),
            rows: self.rows,
        };

        serde_json::to_writer_pretty(&mut writer, &report).map_err(std::io::Error::from)?;
        writeln!(writer)?;

        Ok(())
    }

    /// Writes the report in the given format.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn write<W: Write>(&self, writer: W, format: Format) -> crate::Result<()> {
        match format {
            Format::Text => self.write_text(writer),
            Format::Json => self.write_json(writer),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{aggregate, Sample, BYTES_PER_GIB};

    fn rows() -> Vec<UsageRow> {
        aggregate(
            &[
                Sample::new(1_759_278_600.0, 1.0 * BYTES_PER_GIB),
                Sample::new(1_759_320_000.0, 2.0 * BYTES_PER_GIB),
                Sample::new(1_759_363_200.0, 0.5 * BYTES_PER_GIB),
            ],
            GroupBy::Day,
        )
        .unwrap()
    }

    #[test_log::test]
    fn text() -> crate::Result<()> {
        let rows = rows();
        let range = DateRange::inclusive("2025-10-01", "2025-10-02")?;
        let report = Report {
            pool_id: "7",
            range: &range,
            group_by: GroupBy::Day,
            rows: &rows,
        };

        let mut buf = vec![];
        report.write(&mut buf, Format::Text)?;

        let expected = format!(
            "Pool ID: 7\n\
             Range : 2025-10-01T00:00:00Z -> 2025-10-03T00:00:00Z\n\
             Group : day\n\
             {}\n\
             2025-10-01: avg=1.50 GiB, max=2.00 GiB\n\
             2025-10-02: avg=0.50 GiB, max=0.50 GiB\n",
            "-".repeat(60),
        );
        assert_eq!(expected, String::from_utf8(buf).unwrap());

        Ok(())
    }

    #[test_log::test]
    fn limit() -> crate::Result<()> {
        let rows = rows();
        let range = DateRange::inclusive("2025-10-01", "2025-10-02")?;
        let report = Report {
            pool_id: "7",
            range: &range,
            group_by: GroupBy::Day,
            rows: &rows,
        };

        assert_eq!(1, report.limit(Some(1)).rows.len());

        let report = Report {
            pool_id: "7",
            range: &range,
            group_by: GroupBy::Day,
            rows: &rows,
        };
        assert_eq!(2, report.limit(Some(10)).rows.len());

        Ok(())
    }

    #[test_log::test]
    fn json() -> crate::Result<()> {
        let rows = rows();
        let range = DateRange::inclusive("2025-10-01", "2025-10-02")?;
        let report = Report {
            pool_id: "7",
            range: &range,
            group_by: GroupBy::Day,
            rows: &rows,
        };

        let mut buf = vec![];
        report.write(&mut buf, Format::Json)?;

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!("7", value["pool_id"]);
        assert_eq!("2025-10-03T00:00:00Z", value["end"]);
        assert_eq!("day", value["group_by"]);
        assert_eq!("2025-10-01", value["rows"][0]["period"]);
        assert_eq!(1.5, value["rows"][0]["avg_gib"]);
        assert_eq!(2_147_483_648.0, value["rows"][0]["max_bytes"]);

        Ok(())
    }

    #[test_log::test]
    fn format_from_str() -> crate::Result<()> {
        assert_eq!(Format::Json, "json".parse()?);
        assert!("csv".parse::<Format>().is_err());
        Ok(())
    }
}
