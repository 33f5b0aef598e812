// ==========================================
// Academic Import System - File Parsers
// ==========================================
// Stage 0: spreadsheet file -> ordered RawRow sequence.
// Supported: Excel (.xlsx/.xls) via calamine, CSV via csv.
// Excel cell types are preserved (numbers and date serials reach the
// normalizer typed, not stringified).
// ==========================================

use crate::domain::row::{RawCell, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::normalizer::date_from_serial;
use crate::importer::traits::FileParser;
use calamine::{open_workbook, Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut rows = Vec::new();
        for (position, result) in reader.records().enumerate() {
            let record = result?;
            let mut row = RawRow::new(position);

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    let trimmed = value.trim();
                    let cell = if trimmed.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(trimmed.to_string())
                    };
                    row.cells.insert(header.clone(), cell);
                }
            }

            // blank lines keep their position but are not rows
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn cell_to_raw(cell: &Data) -> RawCell {
        match cell {
            Data::Empty => RawCell::Empty,
            Data::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(trimmed.to_string())
                }
            }
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::Bool(b) => RawCell::Text(b.to_string()),
            Data::DateTime(dt) => match date_from_serial(dt.as_f64()) {
                Some(date) => RawCell::Date(date),
                None => RawCell::Empty,
            },
            Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
            Data::Error(_) => RawCell::Empty,
        }
    }
}

impl FileParser for ExcelParser {
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "workbook has no sheets".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows.next().ok_or(ImportError::MissingHeader)?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut rows = Vec::new();
        for (position, data_row) in sheet_rows.enumerate() {
            let mut row = RawRow::new(position);

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    row.cells.insert(header.clone(), Self::cell_to_raw(cell));
                }
            }

            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse(file_path),
            "xlsx" | "xls" => ExcelParser.parse(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
