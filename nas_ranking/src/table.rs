use log::debug;
use std::collections::{HashMap, HashSet};

use crate::config::CellValue;

/// The identifier used when a column name normalizes to nothing.
pub const UNNAMED_COLUMN: &str = "unnamed";

#[derive(PartialEq, Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: &str, cells: Vec<CellValue>) -> Column {
        Column {
            name: name.to_string(),
            cells,
        }
    }

    /// All the cells coerced to numbers. Non-coercible cells are None.
    pub fn numeric(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(|c| c.as_number()).collect()
    }
}

/// A table as it comes out of a loader: column names are arbitrary strings.
///
/// Columns shorter than the longest one are padded with empty cells so that
/// all the columns share the same number of rows.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<Column>,
}

impl RawTable {
    pub fn new(columns: Vec<Column>) -> RawTable {
        RawTable {
            columns: pad_columns(columns),
        }
    }

    /// Builds a table from a header and body rows, as they are read from a sheet.
    pub fn from_rows(header: &[String], rows: &[Vec<CellValue>]) -> RawTable {
        let columns = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells = rows
                    .iter()
                    .map(|row| row.get(idx).cloned().unwrap_or(CellValue::Empty))
                    .collect();
                Column::new(name, cells)
            })
            .collect();
        RawTable::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        num_rows(&self.columns)
    }

    /// A table is empty when it has no column or no row.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.num_rows() == 0
    }
}

/// A table whose column identifiers are normalized and unique.
///
/// Only built by [normalize] and [NormalizedTable::concat], which maintain the
/// uniqueness of the identifiers.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct NormalizedTable {
    columns: Vec<Column>,
}

impl NormalizedTable {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn num_rows(&self) -> usize {
        num_rows(&self.columns)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.num_rows() == 0
    }

    /// Stacks the rows of several tables.
    ///
    /// Columns are aligned by identifier. The result holds the union of the identifiers
    /// in the order they are first seen; a table that lacks a column contributes empty
    /// cells to it.
    pub fn concat(tables: &[NormalizedTable]) -> NormalizedTable {
        let mut names: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for t in tables {
            for c in t.columns.iter() {
                if seen.insert(c.name.clone()) {
                    names.push(c.name.clone());
                }
            }
        }

        let mut cells: HashMap<String, Vec<CellValue>> =
            names.iter().map(|n| (n.clone(), Vec::new())).collect();
        for t in tables {
            let nrows = t.num_rows();
            for name in names.iter() {
                let target = cells.entry(name.clone()).or_default();
                match t.column(name) {
                    Some(c) => target.extend(c.cells.iter().cloned()),
                    None => target.extend(std::iter::repeat(CellValue::Empty).take(nrows)),
                }
            }
        }

        let columns = names
            .into_iter()
            .map(|name| {
                let cs = cells.remove(&name).unwrap_or_default();
                Column { name, cells: cs }
            })
            .collect();
        NormalizedTable { columns }
    }
}

fn num_rows(columns: &[Column]) -> usize {
    columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
}

fn pad_columns(mut columns: Vec<Column>) -> Vec<Column> {
    let nrows = num_rows(&columns);
    for c in columns.iter_mut() {
        c.cells.resize(nrows, CellValue::Empty);
    }
    columns
}

/// Canonical identifier for a single column label.
///
/// The label is lowercased, every run of non-alphanumeric characters becomes a single
/// underscore and the underscores at both ends are removed.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut res = String::with_capacity(lowered.len());
    let mut pending_sep = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !res.is_empty() {
                res.push('_');
            }
            pending_sep = false;
            res.push(c);
        } else {
            pending_sep = true;
        }
    }
    if res.is_empty() {
        UNNAMED_COLUMN.to_string()
    } else {
        res
    }
}

/// Rewrites all the column names of a table into unique identifiers.
///
/// Later duplicates receive the suffixes _2, _3, ... in column order.
pub fn normalize(table: &RawTable) -> NormalizedTable {
    let mut used: HashSet<String> = HashSet::new();
    let mut columns: Vec<Column> = Vec::new();
    for c in table.columns.iter() {
        let base = normalize_name(&c.name);
        let mut name = base.clone();
        let mut i = 2;
        while used.contains(&name) {
            name = format!("{}_{}", base, i);
            i += 1;
        }
        if name != c.name {
            debug!("normalize: {:?} -> {:?}", c.name, name);
        }
        used.insert(name.clone());
        columns.push(Column {
            name,
            cells: c.cells.clone(),
        });
    }
    NormalizedTable { columns }
}
