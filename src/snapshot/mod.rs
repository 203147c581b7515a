//! Flat columnar snapshots: an in-memory [`Table`] and its Parquet encoding.

pub mod manifest;
pub mod tables;
pub mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::basic::Type as PhysicalType;
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::file::writer::SerializedFileWriter;
use parquet::record::Field;
use parquet::schema::parser::parse_message_type;
use tracing::debug;

use crate::error::DataError;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell rendered for display; nulls become an empty string.
    pub fn display(&self, row: usize) -> String {
        match self {
            Column::Int(v) => v.get(row).copied().flatten().map(|n| n.to_string()),
            Column::Float(v) => v.get(row).copied().flatten().map(|f| format!("{f:.3}")),
            Column::Text(v) => v.get(row).cloned(),
        }
        .unwrap_or_default()
    }

    fn schema_line(&self, name: &str) -> String {
        match self {
            Column::Int(_) => format!("OPTIONAL INT64 {name};"),
            Column::Float(_) => format!("OPTIONAL DOUBLE {name};"),
            Column::Text(_) => format!("REQUIRED BYTE_ARRAY {name} (UTF8);"),
        }
    }
}

/// Named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
    source: PathBuf,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int<T: Into<i64>>(mut self, name: &str, values: impl IntoIterator<Item = Option<T>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        self.columns.push((name.to_string(), Column::Int(values)));
        self
    }

    pub fn float(mut self, name: &str, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        // NaN and infinities are stored as nulls
        let values = values
            .into_iter()
            .map(|v| v.filter(|f| f.is_finite()))
            .collect();
        self.columns.push((name.to_string(), Column::Float(values)));
        self
    }

    pub fn text<S: Into<String>>(mut self, name: &str, values: impl IntoIterator<Item = S>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.columns.push((name.to_string(), Column::Text(values)));
        self
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    fn missing(&self, name: &str) -> DataError {
        DataError::SnapshotColumn {
            path: self.source.clone(),
            column: name.to_string(),
        }
    }

    pub fn ints(&self, name: &str) -> Result<&[Option<i64>], DataError> {
        match self.column(name) {
            Some(Column::Int(v)) => Ok(v),
            _ => Err(self.missing(name)),
        }
    }

    pub fn floats(&self, name: &str) -> Result<&[Option<f64>], DataError> {
        match self.column(name) {
            Some(Column::Float(v)) => Ok(v),
            _ => Err(self.missing(name)),
        }
    }

    pub fn texts(&self, name: &str) -> Result<&[String], DataError> {
        match self.column(name) {
            Some(Column::Text(v)) => Ok(v),
            _ => Err(self.missing(name)),
        }
    }

    fn is_rectangular(&self) -> bool {
        let n = self.num_rows();
        self.columns.iter().all(|(_, c)| c.len() == n)
    }
}

fn parquet_err(path: &Path) -> impl FnOnce(ParquetError) -> DataError + '_ {
    move |source| DataError::Parquet {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `table` to `path` through a temporary file and a rename.
pub fn write_parquet(table: &Table, path: &Path) -> Result<(), DataError> {
    if !table.is_rectangular() {
        return Err(DataError::Parquet {
            path: path.to_path_buf(),
            source: ParquetError::General("columns differ in length".to_string()),
        });
    }

    let mut message = String::from("message snapshot {\n");
    for (name, col) in &table.columns {
        message.push_str("  ");
        message.push_str(&col.schema_line(name));
        message.push('\n');
    }
    message.push('}');
    let schema = Arc::new(parse_message_type(&message).map_err(parquet_err(path))?);
    let props = Arc::new(WriterProperties::builder().build());

    let tmp = path.with_extension("parquet.tmp");
    let file = fs::File::create(&tmp).map_err(|source| DataError::Io {
        path: tmp.clone(),
        source,
    })?;
    let mut writer = SerializedFileWriter::new(file, schema, props).map_err(parquet_err(path))?;

    if table.num_rows() > 0 {
        let mut row_group = writer.next_row_group().map_err(parquet_err(path))?;
        for (_, col) in &table.columns {
            let Some(mut cw) = row_group.next_column().map_err(parquet_err(path))? else {
                break;
            };
            match col {
                Column::Int(v) => {
                    let (values, defs) = split_nulls(v);
                    cw.typed::<Int64Type>()
                        .write_batch(&values, Some(&defs), None)
                        .map_err(parquet_err(path))?;
                }
                Column::Float(v) => {
                    let (values, defs) = split_nulls(v);
                    cw.typed::<DoubleType>()
                        .write_batch(&values, Some(&defs), None)
                        .map_err(parquet_err(path))?;
                }
                Column::Text(v) => {
                    let values: Vec<ByteArray> =
                        v.iter().map(|s| ByteArray::from(s.as_str())).collect();
                    cw.typed::<ByteArrayType>()
                        .write_batch(&values, None, None)
                        .map_err(parquet_err(path))?;
                }
            }
            cw.close().map_err(parquet_err(path))?;
        }
        row_group.close().map_err(parquet_err(path))?;
    }
    writer.close().map_err(parquet_err(path))?;

    fs::rename(&tmp, path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} rows to {}", table.num_rows(), path.display());
    Ok(())
}

fn split_nulls<T: Copy>(v: &[Option<T>]) -> (Vec<T>, Vec<i16>) {
    let values = v.iter().flatten().copied().collect();
    let defs = v.iter().map(|x| i16::from(x.is_some())).collect();
    (values, defs)
}

/// Reads a snapshot written by [`write_parquet`].
pub fn read_parquet(path: &Path) -> Result<Table, DataError> {
    if !path.exists() {
        return Err(DataError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let file = fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = SerializedFileReader::new(file).map_err(parquet_err(path))?;

    let mut columns: Vec<(String, Column)> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| {
            let col = match c.physical_type() {
                PhysicalType::INT64 | PhysicalType::INT32 => Column::Int(Vec::new()),
                PhysicalType::DOUBLE | PhysicalType::FLOAT => Column::Float(Vec::new()),
                _ => Column::Text(Vec::new()),
            };
            (c.name().to_string(), col)
        })
        .collect();

    for row in reader.get_row_iter(None).map_err(parquet_err(path))? {
        let row = row.map_err(parquet_err(path))?;
        for ((_, field), (_, col)) in row.get_column_iter().zip(columns.iter_mut()) {
            match col {
                Column::Int(v) => v.push(match field {
                    Field::Long(n) => Some(*n),
                    Field::Int(n) => Some(i64::from(*n)),
                    _ => None,
                }),
                Column::Float(v) => v.push(match field {
                    Field::Double(f) => Some(*f),
                    Field::Float(f) => Some(f64::from(*f)),
                    _ => None,
                }),
                Column::Text(v) => v.push(match field {
                    Field::Str(s) => s.clone(),
                    _ => String::new(),
                }),
            }
        }
    }

    let table = Table {
        columns,
        source: path.to_path_buf(),
    };
    debug!("read {} rows from {}", table.num_rows(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kleague_ignobel_snapshot_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn parquet_keeps_nulls_and_column_order() {
        let table = Table::new()
            .text("name", ["a", "b", "c"])
            .int("games", [Some(3u32), None, Some(1)])
            .float("rate", [Some(0.5), Some(f64::NAN), None]);
        let path = temp_path("nulls.parquet");
        write_parquet(&table, &path).unwrap();
        let back = read_parquet(&path).unwrap();

        assert_eq!(back.column_names().collect::<Vec<_>>(), vec!["name", "games", "rate"]);
        assert_eq!(back.texts("name").unwrap(), ["a", "b", "c"]);
        assert_eq!(back.ints("games").unwrap(), [Some(3), None, Some(1)]);
        assert_eq!(back.floats("rate").unwrap(), [Some(0.5), None, None]);
        assert!(matches!(
            back.floats("games"),
            Err(DataError::SnapshotColumn { .. })
        ));
    }

    #[test]
    fn empty_tables_still_have_a_schema() {
        let table = Table::new().text("zone", Vec::<String>::new()).int("n", Vec::<Option<i64>>::new());
        let path = temp_path("empty.parquet");
        write_parquet(&table, &path).unwrap();
        let back = read_parquet(&path).unwrap();
        assert_eq!(back.num_rows(), 0);
        assert!(back.texts("zone").unwrap().is_empty());
    }

    #[test]
    fn ragged_tables_are_rejected() {
        let table = Table::new().text("a", ["x"]).int("b", Vec::<Option<i64>>::new());
        assert!(write_parquet(&table, &temp_path("ragged.parquet")).is_err());
    }

    #[test]
    fn reading_a_missing_snapshot_is_a_missing_file() {
        let err = read_parquet(&temp_path("absent.parquet")).unwrap_err();
        assert!(err.is_missing_input());
    }
}
