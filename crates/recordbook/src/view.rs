//! Wire and page representations of records.
//!
//! Everything here is a pure function of its input: [`RecordJson`] is the
//! JSON shape served by the API, and the `render_*` functions build the HTML
//! page with every caller-supplied string escaped.

use serde::Serialize;

use crate::record::Record;

/// JSON form of a [`Record`]: `{id, name, value, createdAt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordJson {
    /// Record id.
    pub id: i64,
    /// Record name.
    pub name: String,
    /// Record value.
    pub value: String,
    /// Creation time as RFC 3339 text.
    pub created_at: String,
}

impl From<&Record> for RecordJson {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            value: record.value.clone(),
            created_at: record.created_at_text(),
        }
    }
}

impl From<Record> for RecordJson {
    fn from(record: Record) -> Self {
        let created_at = record.created_at_text();
        Self {
            id: record.id,
            name: record.name,
            value: record.value,
            created_at,
        }
    }
}

/// Escape text for use in HTML element content or quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one record as a table row.
#[must_use]
pub fn render_record_row(record: &Record) -> String {
    format!(
        "<tr><td>{id}</td><td>{name}</td><td>{value}</td><td><time>{created}</time></td></tr>",
        id = record.id,
        name = escape_html(&record.name),
        value = escape_html(&record.value),
        created = escape_html(&record.created_at_text()),
    )
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Records</title>
<style>
body { font-family: sans-serif; margin: 2rem; }
table { border-collapse: collapse; margin-top: 1rem; }
th, td { border: 1px solid #ccc; padding: 0.25rem 0.75rem; text-align: left; }
#form-error { color: #b00; }
</style>
</head>
<body>
<h1>Records</h1>
<form id="record-form">
<label>Name <input name="name" required></label>
<label>Value <input name="value" required></label>
<button type="submit">Add</button>
<span id="form-error"></span>
</form>
"#;

const PAGE_SCRIPT: &str = r#"<script>
document.getElementById("record-form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const form = event.target;
  const body = JSON.stringify({ name: form.name.value, value: form.value.value });
  const response = await fetch("/api/records", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body,
  });
  if (response.ok) {
    window.location.reload();
  } else {
    const payload = await response.json().catch(() => ({ error: response.statusText }));
    document.getElementById("form-error").textContent = payload.error;
  }
});
</script>
</body>
</html>
"#;

/// Render the full records page, newest record first as given.
#[must_use]
pub fn render_page(records: &[Record]) -> String {
    let mut page = String::from(PAGE_HEAD);

    if records.is_empty() {
        page.push_str("<p class=\"empty\">No records yet.</p>\n");
    } else {
        page.push_str(
            "<table>\n<thead><tr><th>ID</th><th>Name</th><th>Value</th><th>Created</th></tr></thead>\n<tbody>\n",
        );
        for record in records {
            page.push_str(&render_record_row(record));
            page.push('\n');
        }
        page.push_str("</tbody>\n</table>\n");
    }

    page.push_str(PAGE_SCRIPT);
    page
}

/// Render the minimal page shown when records cannot be loaded.
#[must_use]
pub fn render_error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Error</title></head>\n<body>\n<h1>Something went wrong</h1>\n<p>{}</p>\n</body>\n</html>\n",
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn sample(id: i64, name: &str, value: &str) -> Record {
        Record {
            id,
            name: name.to_string(),
            value: value.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(RecordJson::from(&sample(7, "a", "b"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "a",
                "value": "b",
                "createdAt": "2024-03-01T12:00:00.000000Z",
            })
        );
    }

    #[test]
    fn test_record_json_owned_matches_borrowed() {
        let record = sample(1, "x", "y");
        assert_eq!(RecordJson::from(&record), RecordJson::from(record));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_record_row_escapes_fields() {
        let row = render_record_row(&sample(3, "<script>", "a&b"));
        assert!(row.contains("&lt;script&gt;"));
        assert!(row.contains("a&amp;b"));
        assert!(!row.contains("<script>"));
    }

    #[test]
    fn test_render_page_empty() {
        let page = render_page(&[]);
        assert!(page.contains("No records yet."));
        assert!(page.contains("<form id=\"record-form\">"));
    }

    #[test]
    fn test_render_page_keeps_order() {
        let page = render_page(&[sample(2, "second", "v"), sample(1, "first", "v")]);
        let second = page.find("second").unwrap();
        let first = page.find("first").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_render_page_never_injects_markup() {
        let page = render_page(&[sample(1, "<script>alert(1)</script>", "v")]);
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert(1)"));
    }

    #[test]
    fn test_render_error_page_escapes_message() {
        let page = render_error_page("disk <full>");
        assert!(page.contains("disk &lt;full&gt;"));
    }

    fn unescape_html(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    proptest! {
        #[test]
        fn escaped_text_has_no_markup_characters(text in ".*") {
            let escaped = escape_html(&text);
            prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
        }

        #[test]
        fn escaping_is_reversible(text in ".*") {
            prop_assert_eq!(unescape_html(&escape_html(&text)), text);
        }

        #[test]
        fn row_markup_does_not_depend_on_fields(name in "[<>&\"' a-z]{1,12}", value in "[<>&\"' a-z]{1,12}") {
            let plain = render_record_row(&sample(1, "a", "b"));
            let row = render_record_row(&sample(1, &name, &value));
            prop_assert_eq!(row.matches('<').count(), plain.matches('<').count());
            prop_assert_eq!(row.matches('>').count(), plain.matches('>').count());
        }
    }
}
