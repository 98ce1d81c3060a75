use super::domain::ProjectRecord;
use super::DatasetError;
use serde::Deserialize;
use std::io::Read;

/// Deserializes every CSV row. Attribute validation happens when the records
/// are turned into a dataset.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<ProjectRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<ProjectRow>() {
        records.push(ProjectRecord::from(row?));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    #[serde(rename = "Proyecto", alias = "project_id")]
    project_id: String,
    #[serde(rename = "Tipo de Construcción", alias = "construction_type")]
    construction_type: String,
    #[serde(rename = "Duración (meses)", alias = "duration_months")]
    duration_months: u32,
    #[serde(rename = "Costo Total (€)", alias = "total_cost")]
    total_cost: f64,
    #[serde(rename = "Material Principal", alias = "material")]
    material: String,
    #[serde(rename = "Clima Predominante", alias = "climate")]
    climate: String,
    #[serde(rename = "Eficiencia (%)", alias = "efficiency_pct")]
    efficiency_pct: f64,
    #[serde(rename = "Satisfacción Cliente (1-5)", alias = "client_satisfaction")]
    client_satisfaction: f64,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        Self {
            project_id: row.project_id,
            construction_type: row.construction_type,
            duration_months: row.duration_months,
            total_cost: row.total_cost,
            material: row.material,
            climate: row.climate,
            efficiency_pct: row.efficiency_pct,
            client_satisfaction: row.client_satisfaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Proyecto,Tipo de Construcción,Duración (meses),Costo Total (€),Material Principal,Clima Predominante,Eficiencia (%),Satisfacción Cliente (1-5)\n";

    #[test]
    fn parses_spreadsheet_headers() {
        let csv = format!("{HEADER}P001, Residencial ,12,850000,Hormigón,Templado,82.5,4.2\n");
        let records = parse_records(Cursor::new(csv)).expect("parse");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.project_id, "P001");
        assert_eq!(record.construction_type, "Residencial");
        assert_eq!(record.duration_months, 12);
        assert_eq!(record.total_cost, 850_000.0);
        assert_eq!(record.client_satisfaction, 4.2);
    }

    #[test]
    fn accepts_snake_case_headers() {
        let csv = "project_id,construction_type,duration_months,total_cost,material,climate,efficiency_pct,client_satisfaction\nP9,Commercial,6,500000,Steel,Arid,70,3\n";
        let records = parse_records(Cursor::new(csv)).expect("parse");
        assert_eq!(records[0].material, "Steel");
    }

    #[test]
    fn missing_numeric_value_is_a_csv_error() {
        let csv = format!("{HEADER}P001,Residencial,,850000,Hormigón,Templado,82.5,4.2\n");
        let error = parse_records(Cursor::new(csv)).expect_err("missing duration");
        assert!(matches!(error, DatasetError::Csv(_)));
    }
}
