use std::collections::BTreeMap;

use anyhow::Result;
use blazar::Record;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Jsonl,
    Yaml,
    KeyValue,
}

/// JSON with the four space indentation used for nested values in tables.
pub fn dumps_indented(value: &Value) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

fn decode_embedded(value: &Value) -> Option<Value> {
    let text = value.as_str()?.trim();
    if !(text.starts_with('[') || text.starts_with('{')) {
        return None;
    }
    serde_json::from_str(text).ok()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Renders a value for a table cell. Strings holding JSON are decoded
/// first, lists get one item per line, objects become indented JSON and
/// null becomes an empty cell.
pub fn display_value(value: &Value) -> Result<String> {
    let decoded = decode_embedded(value);
    let value = decoded.as_ref().unwrap_or(value);
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(_) => dumps_indented(item),
                other => Ok(scalar_text(other)),
            })
            .collect::<Result<Vec<_>>>()?
            .join("\n"),
        Value::Object(_) => dumps_indented(value)?,
        other => scalar_text(other),
    })
}

/// Rewrites every field of `record` into its display text.
pub fn format_output_data(record: &mut Record) -> Result<()> {
    for value in record.values_mut() {
        *value = Value::String(display_value(value)?);
    }
    Ok(())
}

/// Columns of a listing: the sorted keys of the first record narrowed to
/// the requested columns, or to the default columns when none were requested.
pub fn select_columns(records: &[Record], requested: &[String], defaults: &[&str]) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    let mut available = first.keys().cloned().collect::<Vec<_>>();
    available.sort();
    if !requested.is_empty() {
        requested
            .iter()
            .filter(|x| available.contains(x))
            .cloned()
            .collect()
    } else if !defaults.is_empty() {
        defaults
            .iter()
            .filter(|x| available.iter().any(|column| column == *x))
            .map(|x| x.to_string())
            .collect()
    } else {
        available
    }
}

fn project(record: &Record, columns: &[String]) -> Record {
    columns
        .iter()
        .map(|column| {
            (
                column.clone(),
                record.get(column).cloned().unwrap_or(Value::Null),
            )
        })
        .collect()
}

pub fn kv2line(map: BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, v.replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn record2kv(record: &Record) -> Result<BTreeMap<String, String>> {
    record
        .iter()
        .map(|(key, value)| Ok((key.clone(), display_value(value)?)))
        .collect()
}

fn encode(value: &Value, format: OutputFormat) -> Result<String> {
    let encoded = match format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        _ => serde_json::to_string(value)?,
    };
    Ok(encoded.trim().to_string())
}

pub fn render_list(records: &[Record], columns: &[String], format: OutputFormat) -> Result<String> {
    let rows = records
        .iter()
        .map(|record| project(record, columns))
        .collect::<Vec<_>>();

    match format {
        OutputFormat::Table => {
            if columns.is_empty() {
                return Ok(String::new());
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(columns.to_vec());
            for row in rows {
                table.add_row(
                    columns
                        .iter()
                        .map(|column| display_value(&row[column.as_str()]))
                        .collect::<Result<Vec<_>>>()?,
                );
            }
            Ok(table.to_string())
        }

        OutputFormat::Json | OutputFormat::JsonPretty | OutputFormat::Yaml => encode(
            &Value::Array(rows.into_iter().map(Value::Object).collect()),
            format,
        ),

        OutputFormat::Jsonl => Ok(rows
            .into_iter()
            .map(|row| serde_json::to_string(&row))
            .collect::<serde_json::Result<Vec<_>>>()?
            .join("\n")),

        OutputFormat::KeyValue => Ok(rows
            .iter()
            .map(|row| record2kv(row).map(kv2line))
            .collect::<Result<Vec<_>>>()?
            .join("\n")),
    }
}

/// Renders a single record, as a field/value table sorted by field name or
/// in one of the machine formats.
pub fn render_record(record: &Record, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Field", "Value"]);
            let mut fields = record.clone();
            format_output_data(&mut fields)?;
            let sorted = fields.into_iter().collect::<BTreeMap<_, _>>();
            for (key, value) in sorted {
                table.add_row(vec![key, scalar_text(&value)]);
            }
            Ok(table.to_string())
        }

        OutputFormat::KeyValue => Ok(kv2line(record2kv(record)?)),

        OutputFormat::Json
        | OutputFormat::JsonPretty
        | OutputFormat::Yaml
        | OutputFormat::Jsonl => encode(&Value::Object(record.clone()), format),
    }
}

pub fn print_list(records: &[Record], columns: &[String], format: OutputFormat) -> Result<()> {
    let rendered = render_list(records, columns, format)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}

pub fn print_record(record: &Record, format: OutputFormat) -> Result<()> {
    println!("{}", render_record(record, format)?);
    Ok(())
}
