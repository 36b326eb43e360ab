//! Delimited-text export
//!
//! Columns are the keys of the first record, in its serialization order.
//! Later records are written in that same column order; a key they lack
//! becomes an empty field and keys the first record lacks are dropped.
//! Quoting follows RFC 4180: fields containing the delimiter, a quote or a
//! line break are quoted and embedded quotes doubled.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// A ready-to-download export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

impl ExportFile {
    pub fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }
}

/// Suggested file name: `<record type>_<YYYY-MM-DD>.csv`
pub fn export_filename(record_type: &str, today: NaiveDate) -> String {
    format!("{}_{}.csv", record_type, today.format("%Y-%m-%d"))
}

/// Serialize records to delimited text with a header row.
pub fn to_delimited_text<T: Serialize>(records: &[T], delimiter: u8) -> CoreResult<String> {
    let first = records.first().ok_or(CoreError::NothingToExport)?;
    let header: Vec<String> = as_object(first)?.keys().cloned().collect();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&header)?;
    for record in records {
        let object = as_object(record)?;
        writer.write_record(header.iter().map(|key| cell(object.get(key))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::validation("records", e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::validation("records", e.to_string()))
}

/// Export `records` as `<record type>_<today>.csv`
pub fn export_file<T: Serialize>(
    record_type: &str,
    records: &[T],
    delimiter: u8,
    today: NaiveDate,
) -> CoreResult<ExportFile> {
    let content = to_delimited_text(records, delimiter)?;
    log::debug!("Exported {} {} records", records.len(), record_type);
    Ok(ExportFile {
        filename: export_filename(record_type, today),
        content,
    })
}

fn as_object<T: Serialize>(record: &T) -> CoreResult<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CoreError::validation(
            "records",
            format!("expected a keyed record, got {}", kind_of(&other)),
        )),
        Err(e) => Err(CoreError::validation("records", e.to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested) => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_input_is_nothing_to_export() {
        let records: Vec<Value> = vec![];
        assert_eq!(to_delimited_text(&records, b','), Err(CoreError::NothingToExport));
    }

    #[test]
    fn test_header_keeps_first_record_key_order() {
        let records = vec![json!({"tipo": "entrada", "valor": 10, "data": "2024-03-01", "cliente_nome": null})];
        let text = to_delimited_text(&records, b',').unwrap();

        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let header: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(header, vec!["tipo", "valor", "data", "cliente_nome"]);
        assert_eq!(text.lines().nth(1), Some("entrada,10,2024-03-01,"));
    }

    #[test]
    fn test_quoting_of_delimiter_quote_and_newline() {
        let records = vec![json!({
            "descricao": "Armação, lente",
            "observacoes": "cliente disse \"ok\"",
            "extra": "linha 1\nlinha 2",
        })];
        let text = to_delimited_text(&records, b',').unwrap();
        assert!(text.contains("\"Armação, lente\""));
        assert!(text.contains("\"cliente disse \"\"ok\"\"\""));

        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[2], "linha 1\nlinha 2");
    }

    #[test]
    fn test_heterogeneous_records_follow_first_header() {
        let records = vec![json!({"a": 1, "b": true}), json!({"b": false, "c": "x"})];
        let text = to_delimited_text(&records, b';').unwrap();
        assert_eq!(text, "a;b\n1;true\n;false\n");
    }

    #[test]
    fn test_non_object_records_are_rejected() {
        let err = to_delimited_text(&[1, 2, 3], b',').unwrap_err();
        assert_eq!(err.field(), Some("records"));
    }

    #[test]
    fn test_export_file_name() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        let file = export_file("transacoes", &[json!({"a": 1})], b',', today).unwrap();
        assert_eq!(file.filename, "transacoes_2024-07-09.csv");
        assert_eq!(file.content, "a\n1\n");
    }
}
