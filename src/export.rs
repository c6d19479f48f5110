//! CSV export of normalized tables
//!
//! Plain comma-separated UTF-8 with a header row. Column titles are the
//! report's fixed human-readable names — a renaming table, not logic.
//! Undefined rates export as empty fields, never as `inf` or a fake zero.

use std::io::{self, Write};

use crate::types::{WellRecord, WellSummary};

const RECORD_HEADERS: [&str; 14] = [
    "Sigla",
    "Fecha",
    "TEF",
    "Caudal de petróleo (m3/d)",
    "Caudal de gas(m3/d)",
    "Caudal de agua (m3/d)",
    "Acumulada de Petróleo (m3)",
    "Acumulada de Gas (m3)",
    "Acumulada de Agua (m3)",
    "Tipo de Extracción",
    "Tipo de Pozo",
    "Empresa",
    "Formación",
    "Área yacimiento",
];

const SUMMARY_HEADERS: [&str; 18] = [
    "Sigla",
    "Empresa",
    "Área yacimiento",
    "Formación",
    "Campaña",
    "Qo pico (m3/d)",
    "Qg pico (km3/d)",
    "Np (m3)",
    "Gp (km3)",
    "Wp (m3)",
    "GOR",
    "WOR",
    "WGR",
    "Fluido McCain",
    "Tipo de Pozo",
    "EUR_30",
    "EUR_90",
    "EUR_180",
];

/// Write the normalized per-record table.
pub fn write_records_csv<W: Write>(mut w: W, records: &[WellRecord]) -> io::Result<()> {
    write_row(&mut w, RECORD_HEADERS.iter().copied())?;
    for rec in records {
        let fields = [
            rec.well_id.clone(),
            rec.period.format("%Y-%m-%d").to_string(),
            fmt_f64(rec.effective_time),
            fmt_opt(rec.oil_rate),
            fmt_opt(rec.gas_rate),
            fmt_opt(rec.water_rate),
            fmt_f64(rec.cumulative_oil),
            fmt_f64(rec.cumulative_gas),
            fmt_f64(rec.cumulative_water),
            rec.extraction_type.clone(),
            rec.well_type.clone(),
            rec.company.clone(),
            rec.formation.clone(),
            rec.field_area.clone(),
        ];
        write_row(&mut w, fields.iter().map(String::as_str))?;
    }
    Ok(())
}

/// Write the per-well summary table.
pub fn write_summaries_csv<W: Write>(mut w: W, summaries: &[WellSummary]) -> io::Result<()> {
    write_row(&mut w, SUMMARY_HEADERS.iter().copied())?;
    for s in summaries {
        let fields = [
            s.well_id.clone(),
            s.company.clone(),
            s.field_area.clone(),
            s.formation.clone(),
            s.start_year.to_string(),
            fmt_opt(s.peak_oil_rate),
            fmt_opt(s.peak_gas_rate),
            fmt_f64(s.cumulative_oil),
            fmt_f64(s.cumulative_gas),
            fmt_f64(s.cumulative_water),
            fmt_f64(s.gor),
            fmt_f64(s.wor),
            fmt_f64(s.wgr),
            s.fluid_type.label().to_string(),
            s.resolved_type.clone(),
            fmt_f64(s.eur_30),
            fmt_f64(s.eur_90),
            fmt_f64(s.eur_180),
        ];
        write_row(&mut w, fields.iter().map(String::as_str))?;
    }
    Ok(())
}

fn fmt_f64(v: f64) -> String {
    format!("{v}")
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt_f64).unwrap_or_default()
}

fn write_row<'a, W: Write>(w: &mut W, fields: impl Iterator<Item = &'a str>) -> io::Result<()> {
    let mut first = true;
    for field in fields {
        if !first {
            w.write_all(b",")?;
        }
        first = false;
        w.write_all(escape(field).as_bytes())?;
    }
    w.write_all(b"\n")
}

/// Quote a field when it contains a separator, quote or newline.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{derive_series, summarize_wells};
    use crate::config::AnalysisConfig;
    use crate::ingest::parse_production;
    use std::io::Cursor;

    fn sample_records() -> Vec<WellRecord> {
        let csv = "sigla,anio,mes,prod_pet,prod_gas,prod_agua,tef,tipopozo,empresa,areayacimiento,formacion,fecha_data\n\
                   W-1,2020,1,100,50,10,30,Petrolífero,\"ACME, S.A.\",LOMA,VMUT,2020-02-15\n\
                   W-1,2020,2,0,0,0,0,Petrolífero,\"ACME, S.A.\",LOMA,VMUT,2020-03-15";
        let mut table = parse_production(Cursor::new(csv)).unwrap();
        derive_series(&mut table.records);
        table.records
    }

    #[test]
    fn test_record_export_headers_and_quoting() {
        let mut out = Vec::new();
        write_records_csv(&mut out, &sample_records()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Sigla,Fecha,TEF,"));
        assert!(header.contains("Acumulada de Petróleo (m3)"));

        let first = lines.next().unwrap();
        assert!(first.contains("\"ACME, S.A.\""));
        assert!(first.starts_with("W-1,2020-01-01,30,"));
    }

    #[test]
    fn test_undefined_rate_exports_as_empty() {
        let mut out = Vec::new();
        write_records_csv(&mut out, &sample_records()).unwrap();
        let text = String::from_utf8(out).unwrap();
        // Second data row is the zero-tef month: rate fields are empty
        let second = text.lines().nth(2).unwrap();
        assert!(second.starts_with("W-1,2020-02-01,0,,,,"));
        assert!(!second.contains("inf"));
        assert!(!second.contains("NaN"));
    }

    #[test]
    fn test_summary_export() {
        let records = sample_records();
        let summaries = summarize_wells(&records, &AnalysisConfig::default());
        let mut out = Vec::new();
        write_summaries_csv(&mut out, &summaries).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.contains("Fluido McCain"));
        assert!(header.contains("EUR_180"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("W-1,"));
        assert!(row.contains("Petrolífero"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
