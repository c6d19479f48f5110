//! Production table loader (Capítulo IV monthly well data)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDate;

use super::{csv_split, num_field, str_field, IngestDiagnostics, IngestError};
use crate::types::{month_start, WellRecord};

/// Parsed production table plus row-quality counters
#[derive(Debug, Clone)]
pub struct ProductionTable {
    pub records: Vec<WellRecord>,
    pub diagnostics: IngestDiagnostics,
}

// ============================================================================
// Column Mapping
// ============================================================================

/// Maps the production CSV header to column indices
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    well_id: Option<usize>,
    year: Option<usize>,
    month: Option<usize>,
    oil_volume: Option<usize>,
    gas_volume: Option<usize>,
    water_volume: Option<usize>,
    gas_injection: Option<usize>,
    effective_time: Option<usize>,
    extraction_type: Option<usize>,
    well_type: Option<usize>,
    company: Option<usize>,
    formation: Option<usize>,
    field_area: Option<usize>,
    data_date: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Self {
        let mut map = Self::default();
        for (idx, col) in csv_split(header).iter().enumerate() {
            match col.trim().to_lowercase().as_str() {
                "sigla" => map.well_id = Some(idx),
                "anio" => map.year = Some(idx),
                "mes" => map.month = Some(idx),
                "prod_pet" => map.oil_volume = Some(idx),
                "prod_gas" => map.gas_volume = Some(idx),
                "prod_agua" => map.water_volume = Some(idx),
                "iny_gas" => map.gas_injection = Some(idx),
                "tef" => map.effective_time = Some(idx),
                "tipoextraccion" => map.extraction_type = Some(idx),
                "tipopozo" => map.well_type = Some(idx),
                "empresa" => map.company = Some(idx),
                "formacion" => map.formation = Some(idx),
                "areayacimiento" => map.field_area = Some(idx),
                "fecha_data" => map.data_date = Some(idx),
                _ => {}
            }
        }
        map
    }

    /// Check that the minimum column set is present
    fn validate(&self) -> Result<(), IngestError> {
        let mut missing = Vec::new();
        for (name, idx) in [
            ("sigla", self.well_id),
            ("anio", self.year),
            ("mes", self.month),
            ("prod_pet", self.oil_volume),
            ("prod_gas", self.gas_volume),
            ("prod_agua", self.water_volume),
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

    /// Report which columns were found
    fn summary(&self) -> String {
        let mut found: Vec<&str> = Vec::new();
        let mut missing: Vec<&str> = Vec::new();

        macro_rules! check_col {
            ($name:expr, $field:expr) => {
                if $field.is_some() {
                    found.push($name);
                } else {
                    missing.push($name);
                }
            };
        }

        check_col!("sigla", self.well_id);
        check_col!("anio", self.year);
        check_col!("mes", self.month);
        check_col!("prod_pet", self.oil_volume);
        check_col!("prod_gas", self.gas_volume);
        check_col!("prod_agua", self.water_volume);
        check_col!("iny_gas", self.gas_injection);
        check_col!("tef", self.effective_time);
        check_col!("tipoextraccion", self.extraction_type);
        check_col!("tipopozo", self.well_type);
        check_col!("empresa", self.company);
        check_col!("formacion", self.formation);
        check_col!("areayacimiento", self.field_area);
        check_col!("fecha_data", self.data_date);

        format!(
            "Found {}/{} columns. Present: [{}]. Missing: [{}]",
            found.len(),
            found.len() + missing.len(),
            found.join(", "),
            missing.join(", "),
        )
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load the production CSV from a local file.
pub fn load_production_csv(path: impl AsRef<Path>) -> Result<ProductionTable, IngestError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = parse_production(BufReader::new(file))?;
    tracing::info!(
        file = %path.display(),
        rows = table.records.len(),
        dropped = table.diagnostics.rows_dropped,
        "Production table loaded"
    );
    Ok(table)
}

/// Parse the production CSV from any buffered reader.
pub fn parse_production<R: BufRead>(reader: R) -> Result<ProductionTable, IngestError> {
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or(IngestError::EmptyFile)??;
    // Portal exports occasionally lead with a UTF-8 BOM
    let header_line = header_line.trim_start_matches('\u{feff}');

    let col_map = ColumnMap::from_header(header_line);
    col_map.validate()?;
    tracing::info!("{}", col_map.summary());

    let mut records = Vec::new();
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
            Ok(record) => records.push(record),
            Err(reason) => {
                if diagnostics.rows_dropped < 10 {
                    tracing::warn!(line = line_num, reason = %reason, "Dropping production row");
                }
                diagnostics.rows_dropped += 1;
            }
        }
    }

    Ok(ProductionTable {
        records,
        diagnostics,
    })
}

// ============================================================================
// Row Parsing
// ============================================================================

fn parse_row(line: &str, col_map: &ColumnMap) -> Result<WellRecord, String> {
    let fields = csv_split(line);

    let well_id = str_field(&fields, col_map.well_id);
    if well_id.is_empty() {
        return Err("empty well id".to_string());
    }

    let year = str_field(&fields, col_map.year)
        .parse::<i32>()
        .map_err(|_| format!("bad year '{}'", str_field(&fields, col_map.year)))?;
    let month = str_field(&fields, col_map.month)
        .parse::<u32>()
        .map_err(|_| format!("bad month '{}'", str_field(&fields, col_map.month)))?;
    let period =
        month_start(year, month).ok_or_else(|| format!("invalid period {year}-{month}"))?;

    let oil_volume = volume(&fields, col_map.oil_volume, "prod_pet")?;
    let gas_volume = volume(&fields, col_map.gas_volume, "prod_gas")?;
    let water_volume = volume(&fields, col_map.water_volume, "prod_agua")?;
    // Optional fields: junk reads as zero rather than rejecting the row
    let gas_injection = num_field(&fields, col_map.gas_injection)
        .unwrap_or(0.0)
        .max(0.0);

    let effective_time = num_field(&fields, col_map.effective_time)
        .map_err(|e| format!("tef: {e}"))?;
    if effective_time < 0.0 {
        return Err(format!("negative tef {effective_time}"));
    }

    let data_date = parse_data_date(str_field(&fields, col_map.data_date)).unwrap_or(period);

    Ok(WellRecord {
        well_id: well_id.to_string(),
        year,
        month,
        period,
        oil_volume,
        gas_volume,
        water_volume,
        gas_injection,
        effective_time,
        extraction_type: str_field(&fields, col_map.extraction_type).to_string(),
        well_type: str_field(&fields, col_map.well_type).to_string(),
        company: str_field(&fields, col_map.company).to_string(),
        formation: str_field(&fields, col_map.formation).to_string(),
        field_area: str_field(&fields, col_map.field_area).to_string(),
        data_date,
        oil_rate: None,
        gas_rate: None,
        water_rate: None,
        cumulative_oil: 0.0,
        cumulative_gas: 0.0,
        cumulative_water: 0.0,
    })
}

/// Production volumes must be numeric and non-negative.
fn volume(fields: &[String], idx: Option<usize>, name: &str) -> Result<f64, String> {
    let v = num_field(fields, idx).map_err(|e| format!("{name}: {e}"))?;
    if v < 0.0 {
        return Err(format!("{name}: negative volume {v}"));
    }
    Ok(v)
}

/// The allocation timestamp shows up either as a plain date or with a time
/// component depending on the export.
fn parse_data_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
