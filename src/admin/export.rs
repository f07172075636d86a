//! CSV export of the member list.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::Member;

pub const CSV_HEADER: &str = "Name,Email,University,Course,Year,Phone,Motivation,Joined Date";

/// A rendered export, ready to be written to disk or offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub contents: String,
}

/// Export file name for the given day: `tytc-members-YYYY-MM-DD.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("tytc-members-{}.csv", date.format("%Y-%m-%d"))
}

/// Render members as CSV in the fixed column order, every field quoted.
pub fn export_csv<'a, I>(members: I, now: DateTime<Utc>) -> CsvExport
where
    I: IntoIterator<Item = &'a Member>,
{
    let mut contents = String::from(CSV_HEADER);
    contents.push('\n');

    for member in members {
        let joined = short_date(member.joined_at);
        let fields = [
            member.name.as_str(),
            member.email.as_str(),
            member.university.as_str(),
            member.course.as_str(),
            member.year.as_str(),
            member.phone.as_str(),
            member.motivation.as_str(),
            joined.as_str(),
        ];
        let row: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        contents.push_str(&row.join(","));
        contents.push('\n');
    }

    CsvExport {
        filename: export_filename(now.date_naive()),
        contents,
    }
}

/// US short date, e.g. `12/5/2024`.
fn short_date(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            id: "member_1_abcdefghi".to_string(),
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            university: "Unilag".to_string(),
            course: "Computer Science".to_string(),
            year: "2".to_string(),
            phone: String::new(),
            motivation: "I want to \"build\", ship".to_string(),
            joined_at: "2024-12-05T09:30:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_header_and_row() {
        let now = "2026-10-19T12:00:00Z".parse().unwrap();
        let export = export_csv(&[member()], now);
        let lines: Vec<_> = export.contents.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            r#""Ada","ada@x.com","Unilag","Computer Science","2","","I want to ""build"", ship","12/5/2024""#
        );
        assert_eq!(export.filename, "tytc-members-2026-10-19.csv");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let now = "2026-01-02T00:00:00Z".parse().unwrap();
        let export = export_csv(std::iter::empty(), now);
        assert_eq!(export.contents, format!("{}\n", CSV_HEADER));
        assert_eq!(export.filename, "tytc-members-2026-01-02.csv");
    }
}
