//! Fracture adjunct table loader (completion data, one row per well)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use std::collections::HashSet;

use super::{csv_split, num_field, str_field, IngestDiagnostics, IngestError};
use crate::types::FractureRecord;

/// Parsed fracture table plus row-quality counters
#[derive(Debug, Clone)]
pub struct FractureTable {
    pub records: Vec<FractureRecord>,
    pub diagnostics: IngestDiagnostics,
}

/// Maps the fracture CSV header to column indices
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    well_id: Option<usize>,
    lateral_length: Option<usize>,
    stage_count: Option<usize>,
    completion_type: Option<usize>,
    sand_domestic: Option<usize>,
    sand_imported: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Self {
        let mut map = Self::default();
        for (idx, col) in csv_split(header).iter().enumerate() {
            match col.trim().to_lowercase().as_str() {
                "sigla" => map.well_id = Some(idx),
                "longitud_rama_horizontal_m" => map.lateral_length = Some(idx),
                "cantidad_fracturas" => map.stage_count = Some(idx),
                "tipo_terminacion" => map.completion_type = Some(idx),
                "arena_bombeada_nacional_tn" => map.sand_domestic = Some(idx),
                "arena_bombeada_importada_tn" => map.sand_imported = Some(idx),
                _ => {}
            }
        }
        map
    }

    fn validate(&self) -> Result<(), IngestError> {
        let mut missing = Vec::new();
        for (name, idx) in [
            ("sigla", self.well_id),
            ("longitud_rama_horizontal_m", self.lateral_length),
            ("cantidad_fracturas", self.stage_count),
            ("arena_bombeada_nacional_tn", self.sand_domestic),
            ("arena_bombeada_importada_tn", self.sand_imported),
        ] {
            if idx.is_none() {
                missing.push(name);
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(IngestError::MissingColumns(missing.join(", ")))
        }
    }
}

/// Load the fracture CSV from a local file.
pub fn load_fracture_csv(path: impl AsRef<Path>) -> Result<FractureTable, IngestError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = parse_fracture(BufReader::new(file))?;
    tracing::info!(
        file = %path.display(),
        rows = table.records.len(),
        dropped = table.diagnostics.rows_dropped,
        duplicates = table.diagnostics.duplicate_rows,
        "Fracture table loaded"
    );
    Ok(table)
}

/// Parse the fracture CSV from any buffered reader.
///
/// The adjunct dataset occasionally repeats a well across daily updates;
/// the first occurrence wins and later ones are counted as duplicates.
pub fn parse_fracture<R: BufRead>(reader: R) -> Result<FractureTable, IngestError> {
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or(IngestError::EmptyFile)??;
    let header_line = header_line.trim_start_matches('\u{feff}');

    let col_map = ColumnMap::from_header(header_line);
    col_map.validate()?;

    let mut records: Vec<FractureRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut diagnostics = IngestDiagnostics::default();
    let mut line_num = 1usize;

    for line_result in lines {
        line_num += 1;
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        diagnostics.rows_read += 1;

        match parse_row(&line, &col_map) {
            Ok(record) => {
                if seen.insert(record.well_id.clone()) {
                    records.push(record);
                } else {
                    diagnostics.duplicate_rows += 1;
                }
            }
            Err(reason) => {
                if diagnostics.rows_dropped < 10 {
                    tracing::warn!(line = line_num, reason = %reason, "Dropping fracture row");
                }
                diagnostics.rows_dropped += 1;
            }
        }
    }

    Ok(FractureTable {
        records,
        diagnostics,
    })
}

fn parse_row(line: &str, col_map: &ColumnMap) -> Result<FractureRecord, String> {
    let fields = csv_split(line);

    let well_id = str_field(&fields, col_map.well_id);
    if well_id.is_empty() {
        return Err("empty well id".to_string());
    }

    let lateral_length_m =
        num_field(&fields, col_map.lateral_length).map_err(|e| format!("lateral length: {e}"))?;
    if lateral_length_m < 0.0 {
        return Err(format!("negative lateral length {lateral_length_m}"));
    }

    let stages = num_field(&fields, col_map.stage_count).map_err(|e| format!("stages: {e}"))?;
    if stages < 0.0 {
        return Err(format!("negative stage count {stages}"));
    }

    let sand_domestic_tn =
        num_field(&fields, col_map.sand_domestic).map_err(|e| format!("domestic sand: {e}"))?;
    let sand_imported_tn =
        num_field(&fields, col_map.sand_imported).map_err(|e| format!("imported sand: {e}"))?;
    if sand_domestic_tn < 0.0 || sand_imported_tn < 0.0 {
        return Err("negative sand tonnage".to_string());
    }

    Ok(FractureRecord {
        well_id: well_id.to_string(),
        lateral_length_m,
        stage_count: stages.round() as u32,
        completion_type: str_field(&fields, col_map.completion_type).to_string(),
        sand_domestic_tn,
        sand_imported_tn,
    })
}
