// input/csv_dir.rs
//
// Directory layout:
//   ecoregion_IDs.csv       one ID per row
//   varnames.csv            one variable name per row
//   <var>_dist_matrix.csv   one matrix row per line
// None of the files carry a header row.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use log::{debug, info};
use crate::error::{Error, Result};
use crate::types::{DistanceMatrix, EcoregionId, VariableMatrix};
use super::ClusterInput;

pub const IDS_FILE: &str = "ecoregion_IDs.csv";
pub const VARNAMES_FILE: &str = "varnames.csv";

pub fn matrix_file_name(variable: &str) -> String {
    format!("{}_dist_matrix.csv", variable)
}

fn open_csv(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file)))
}

fn read_column(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_csv(path)?;
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(0) {
            Some(value) if !value.is_empty() => values.push(value.to_string()),
            _ => continue,
        }
    }
    Ok(values)
}

pub fn read_ecoregion_ids(path: &Path) -> Result<Vec<EcoregionId>> {
    read_column(path)?
        .iter()
        .map(|value| value.parse::<EcoregionId>())
        .collect()
}

pub fn read_varnames(path: &Path) -> Result<Vec<String>> {
    read_column(path)
}

pub fn read_matrix(path: &Path) -> Result<DistanceMatrix> {
    let mut reader = open_csv(path)?;
    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let values = record.iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|e| Error::parse(format!(
                    "{:?} row {} column {}: '{}' is not a number ({})",
                    path, row + 1, col + 1, field, e
                )))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(values);
    }
    DistanceMatrix::from_rows(rows)
        .map_err(|e| Error::shape(format!("{:?}: {}", path, e)))
}

/// Reads the ID list, the variable names and every distance matrix.
/// The first `label_variables` names do not have a matrix.
pub fn load_timeseries_dir(dir: &Path, label_variables: usize) -> Result<ClusterInput> {
    if !dir.is_dir() {
        return Err(Error::InputNotFound(dir.to_path_buf()));
    }

    info!("getting ecoregion designations and variable names from {:?}", dir);
    let ecoregion_ids = read_ecoregion_ids(&dir.join(IDS_FILE))?;
    let varnames = read_varnames(&dir.join(VARNAMES_FILE))?;
    debug!("{} ecoregions, {} variable names", ecoregion_ids.len(), varnames.len());

    if varnames.len() <= label_variables {
        return Err(Error::empty(format!(
            "{} variable names with {} label variables leaves no distance variables",
            varnames.len(), label_variables
        )));
    }

    info!("reading variable-specific distance matrices from {:?}", dir);
    let mut variables = Vec::with_capacity(varnames.len() - label_variables);
    for name in varnames.into_iter().skip(label_variables) {
        let matrix = read_matrix(&dir.join(matrix_file_name(&name)))?;
        if matrix.size() != ecoregion_ids.len() {
            return Err(Error::shape(format!(
                "{} distance matrix is {}x{} but there are {} ecoregions",
                name, matrix.size(), matrix.size(), ecoregion_ids.len()
            )));
        }
        info!("- {}", name);
        variables.push(VariableMatrix { name, matrix });
    }

    Ok(ClusterInput::new(ecoregion_ids, variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn loads_ids_names_and_matrices() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), IDS_FILE, "212\n221\n");
        write(dir.path(), VARNAMES_FILE, "dates\ngdd\n");
        write(dir.path(), "gdd_dist_matrix.csv", "0.0, 0.4\n0.4, 0.0\n");

        let input = load_timeseries_dir(dir.path(), 1).unwrap();
        assert_eq!(input.ecoregion_ids, vec![EcoregionId(212), EcoregionId(221)]);
        assert_eq!(input.variables.len(), 1);
        assert_eq!(input.variables[0].name, "gdd");
        assert_eq!(input.variables[0].matrix.get(0, 1), 0.4);
    }

    #[test]
    fn missing_matrix_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), IDS_FILE, "1\n2\n");
        write(dir.path(), VARNAMES_FILE, "dates\nfrost\n");

        let result = load_timeseries_dir(dir.path(), 1);
        assert!(matches!(result, Err(Error::InputNotFound(p)) if p.ends_with("frost_dist_matrix.csv")));
    }

    #[test]
    fn non_square_matrix_is_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), IDS_FILE, "1\n2\n");
        write(dir.path(), VARNAMES_FILE, "dates\ngdd\n");
        write(dir.path(), "gdd_dist_matrix.csv", "0.0,0.4,0.1\n0.4,0.0,0.2\n");

        assert!(matches!(load_timeseries_dir(dir.path(), 1), Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn only_label_variables_is_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), IDS_FILE, "1\n2\n");
        write(dir.path(), VARNAMES_FILE, "dates\n");

        assert!(matches!(load_timeseries_dir(dir.path(), 1), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn bad_cell_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), IDS_FILE, "1\n2\n");
        write(dir.path(), VARNAMES_FILE, "dates\ngdd\n");
        write(dir.path(), "gdd_dist_matrix.csv", "0.0,abc\n0.4,0.0\n");

        assert!(matches!(load_timeseries_dir(dir.path(), 1), Err(Error::Parse(_))));
    }
}
