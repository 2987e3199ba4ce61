// Primitives for reading Excel-like workbooks.

use calamine::{open_workbook_auto, DataType, Range, Reader};

use crate::survey::*;

/// Reads the worksheets of a workbook and stacks them into a single table.
///
/// All the worksheets are used unless some names are given. Each worksheet is normalized
/// on its own before stacking, so that the same question spelled slightly differently
/// across sheets lands in the same column.
pub fn read_workbook(path: &str, worksheets: &[String]) -> SurveyResult<NormalizedTable> {
    let mut workbook = open_workbook_auto(path).context(OpeningWorkbookSnafu { path })?;
    let all_names: Vec<String> = workbook.sheet_names().to_vec();
    debug!("read_workbook: path: {:?} worksheets: {:?}", path, all_names);

    let selected: Vec<String> = if worksheets.is_empty() {
        all_names.clone()
    } else {
        for name in worksheets.iter() {
            ensure!(
                all_names.contains(name),
                MissingWorksheetSnafu {
                    path,
                    sheet: name.clone(),
                    available: all_names.clone(),
                }
            );
        }
        worksheets.to_vec()
    };

    let mut tables: Vec<NormalizedTable> = Vec::new();
    for sheet in selected.iter() {
        let wrange = workbook
            .worksheet_range(sheet)
            .context(MissingWorksheetSnafu {
                path,
                sheet: sheet.clone(),
                available: all_names.clone(),
            })?
            .context(ReadingWorksheetSnafu {
                path,
                sheet: sheet.clone(),
            })?;
        let raw = range_to_table(&wrange);
        if raw.is_empty() {
            info!("read_workbook: skipping empty worksheet {:?}", sheet);
            continue;
        }
        debug!(
            "read_workbook: worksheet {:?}: {} rows, {} columns",
            sheet,
            raw.num_rows(),
            raw.columns().len()
        );
        tables.push(normalize(&raw));
    }

    ensure!(!tables.is_empty(), NoSheetsSnafu { path });
    info!(
        "read_workbook: read {} non-empty worksheets from {}",
        tables.len(),
        path
    );
    Ok(NormalizedTable::concat(&tables))
}

/// Converts a worksheet into a table. The first row is the header.
fn range_to_table(wrange: &Range<DataType>) -> RawTable {
    let mut rows = wrange.rows();
    let header: Vec<String> = match rows.next() {
        Some(h) => h
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(idx, cell))
            .collect(),
        None => return RawTable::default(),
    };
    let body: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<CellValue>>())
        // Fully blank lines are not responses.
        .filter(|row| !row.iter().all(|c| c.is_empty()))
        .collect();
    RawTable::from_rows(&header, &body)
}

fn header_name(idx: usize, cell: &DataType) -> String {
    match cell {
        DataType::String(s) if !s.trim().is_empty() => s.clone(),
        DataType::Float(f) => CellValue::Number(*f)
            .as_text()
            .unwrap_or_else(|| format!("Unnamed: {}", idx)),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        _ => format!("Unnamed: {}", idx),
    }
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Float(f) => CellValue::Number(*f),
        // Excel serial date, far outside of any rank scale.
        DataType::DateTime(f) => CellValue::Number(*f),
        DataType::String(s) if s.trim().is_empty() => CellValue::Empty,
        DataType::String(s) => CellValue::Text(s.clone()),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        _ => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn header_names() {
        assert_eq!(header_name(0, &s("ACC 201")), "ACC 201");
        assert_eq!(header_name(1, &DataType::Empty), "Unnamed: 1");
        assert_eq!(header_name(2, &s("  ")), "Unnamed: 2");
        assert_eq!(header_name(3, &DataType::Float(84.0)), "84");
        assert_eq!(header_name(4, &DataType::Int(2023)), "2023");
    }

    #[test]
    fn cell_values() {
        assert_eq!(cell_value(&DataType::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_value(&DataType::Float(4.5)), CellValue::Number(4.5));
        assert_eq!(cell_value(&s("Most")), CellValue::Text("Most".to_string()));
        assert_eq!(cell_value(&s(" ")), CellValue::Empty);
        assert_eq!(cell_value(&DataType::Empty), CellValue::Empty);
        assert_eq!(cell_value(&DataType::Bool(true)), CellValue::Text("true".to_string()));
    }

    #[test]
    fn worksheet_to_table() {
        let mut wrange: Range<DataType> = Range::new((0, 0), (3, 2));
        wrange.set_value((0, 0), s("Respondent"));
        wrange.set_value((0, 1), s("Course A"));
        wrange.set_value((1, 0), DataType::Int(1));
        wrange.set_value((1, 1), DataType::Float(2.0));
        wrange.set_value((3, 0), DataType::Int(2));
        wrange.set_value((3, 2), s("note"));

        let t = range_to_table(&wrange);
        let names: Vec<&str> = t.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Respondent", "Course A", "Unnamed: 2"]);
        // The blank line is dropped.
        assert_eq!(t.num_rows(), 2);
        assert_eq!(
            t.columns()[1].cells,
            vec![CellValue::Number(2.0), CellValue::Empty]
        );
        assert_eq!(
            t.columns()[2].cells,
            vec![CellValue::Empty, CellValue::Text("note".to_string())]
        );
    }

    // Sheets: "Responses A" (Respondent, Course A, Course B; 3 rows), "Notes" (empty),
    // "Responses B" (COURSE A, Course C; 3 rows).
    fn fixture() -> String {
        path_str(
            &Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("test_data")
                .join("ranking_2023.xlsx"),
        )
    }

    fn numbers(t: &NormalizedTable, name: &str) -> Vec<Option<f64>> {
        t.column(name).unwrap().numeric()
    }

    #[test]
    fn all_sheets_are_stacked() {
        let t = read_workbook(&fixture(), &[]).unwrap();
        assert_eq!(
            t.names(),
            vec!["respondent", "course_a", "course_b", "course_c"]
        );
        // The empty sheet contributes nothing.
        assert_eq!(t.num_rows(), 6);
        assert_eq!(
            numbers(&t, "course_a"),
            vec![Some(1.0), Some(2.0), Some(8.0), Some(4.0), Some(5.0), Some(6.0)]
        );
        assert_eq!(
            numbers(&t, "course_c"),
            vec![None, None, None, Some(1.0), Some(2.0), Some(8.0)]
        );
        assert_eq!(
            numbers(&t, "respondent"),
            vec![Some(1.0), Some(2.0), Some(3.0), None, None, None]
        );
    }

    #[test]
    fn selected_worksheets_only() {
        let t = read_workbook(&fixture(), &["Responses B".to_string()]).unwrap();
        assert_eq!(t.names(), vec!["course_a", "course_c"]);
        assert_eq!(t.num_rows(), 3);
        assert_eq!(
            numbers(&t, "course_a"),
            vec![Some(4.0), Some(5.0), Some(6.0)]
        );
    }

    #[test]
    fn only_empty_worksheets() {
        assert!(matches!(
            read_workbook(&fixture(), &["Notes".to_string()]),
            Err(SurveyError::NoSheets { .. })
        ));
    }

    #[test]
    fn unknown_worksheet() {
        match read_workbook(&fixture(), &["Responses A".to_string(), "Summary".to_string()]) {
            Err(SurveyError::MissingWorksheet {
                sheet, available, ..
            }) => {
                assert_eq!(sheet, "Summary");
                assert_eq!(available, vec!["Responses A", "Notes", "Responses B"]);
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_workbook("/nonexistent/survey_2023.xlsx", &[]),
            Err(SurveyError::OpeningWorkbook { .. })
        ));
    }
}
