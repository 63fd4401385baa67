//! Delimited reading and writing for expression matrices and label tables

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use crate::cleaning::{LabeledMatrix, LABEL_ROW};
use crate::data::{ExpressionMatrix, LabelMap};
use crate::error::{Result, XpressError};

/// Cell values read as missing
const MISSING_TOKENS: [&str; 4] = ["", "NA", "NaN", "nan"];

/// Strip surrounding quotes from a string
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn detect_delimiter(header_line: &str) -> char {
    if header_line.contains('\t') {
        '\t'
    } else {
        ','
    }
}

fn parse_value(raw: &str) -> Result<f64> {
    let val = strip_quotes(raw);
    if MISSING_TOKENS.contains(&val.as_str()) {
        return Ok(f64::NAN);
    }
    val.parse::<f64>().map_err(|_| XpressError::Parse {
        reason: format!("Invalid expression value: {}", val),
    })
}

/// Read an expression matrix from a delimited file
///
/// Expected format: first row is a header whose first cell names the gene
/// column, first column is gene IDs. Tab or comma delimiters are detected
/// from the header. Empty cells and `NA`/`NaN` are read as missing.
pub fn read_expression_matrix<P: AsRef<Path>>(path: P) -> Result<ExpressionMatrix> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or_else(|| XpressError::EmptyData {
        reason: "Empty expression file".to_string(),
    })??;

    let delimiter = detect_delimiter(&header_line);
    let header: Vec<&str> = header_line.split(delimiter).collect();
    if header.len() < 2 {
        return Err(XpressError::Parse {
            reason: "Not enough columns in header".to_string(),
        });
    }

    let sample_ids: Vec<String> = header[1..].iter().map(|s| strip_quotes(s)).collect();
    let n_samples = sample_ids.len();

    let mut gene_ids: Vec<String> = Vec::new();
    let mut data: Vec<f64> = Vec::new();

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != n_samples + 1 {
            return Err(XpressError::Parse {
                reason: format!(
                    "Row '{}' has {} columns, expected {}",
                    strip_quotes(fields[0]),
                    fields.len(),
                    n_samples + 1
                ),
            });
        }

        gene_ids.push(strip_quotes(fields[0]));
        for field in &fields[1..] {
            data.push(parse_value(field)?);
        }
    }

    if gene_ids.is_empty() {
        return Err(XpressError::EmptyData {
            reason: "No genes found in expression matrix".to_string(),
        });
    }

    let values = Array2::from_shape_vec((gene_ids.len(), n_samples), data).map_err(|e| {
        XpressError::Parse {
            reason: e.to_string(),
        }
    })?;

    ExpressionMatrix::new(values, gene_ids, sample_ids)
}

/// Read a two-column (sample ID, label) table
///
/// Tab or comma delimited; extra columns are ignored. Later rows override
/// earlier rows for the same sample.
pub fn read_label_map<P: AsRef<Path>>(path: P, has_header: bool) -> Result<LabelMap> {
    let path = path.as_ref();
    let first_line = BufReader::new(File::open(path)?)
        .lines()
        .next()
        .transpose()?
        .unwrap_or_default();
    let delimiter = detect_delimiter(&first_line);

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(has_header)
        .flexible(true)
        .from_path(path)?;

    let mut labels = LabelMap::new();
    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        if record.len() < 2 {
            return Err(XpressError::Parse {
                reason: format!(
                    "Label table line {} needs a sample ID and a label",
                    record.position().map_or(0, |p| p.line())
                ),
            });
        }
        labels.insert(record[0].trim(), record[1].trim());
    }

    if labels.is_empty() {
        return Err(XpressError::EmptyData {
            reason: "No samples found in label table".to_string(),
        });
    }

    Ok(labels)
}

fn format_value(x: f64) -> String {
    if x.is_nan() {
        "NA".to_string()
    } else {
        format!("{}", x)
    }
}

/// Write an expression matrix as a tab-delimited file
pub fn write_expression_matrix<P: AsRef<Path>>(path: P, matrix: &ExpressionMatrix) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "gene_id\t{}", matrix.sample_ids().join("\t"))?;

    let values = matrix.values();
    for (i, gene_id) in matrix.gene_ids().iter().enumerate() {
        let row: Vec<String> = values.row(i).iter().map(|&x| format_value(x)).collect();
        writeln!(file, "{}\t{}", gene_id, row.join("\t"))?;
    }

    file.flush()?;
    Ok(())
}

/// Write a labeled matrix: the label row first, then the genes
pub fn write_labeled_matrix<P: AsRef<Path>>(path: P, labeled: &LabeledMatrix) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let matrix = labeled.matrix();

    writeln!(file, "gene_id\t{}", matrix.sample_ids().join("\t"))?;

    let label_cells: Vec<&str> = labeled
        .labels()
        .iter()
        .map(|l| l.as_deref().unwrap_or("NA"))
        .collect();
    writeln!(file, "{}\t{}", LABEL_ROW, label_cells.join("\t"))?;

    let values = matrix.values();
    for (i, gene_id) in matrix.gene_ids().iter().enumerate() {
        let row: Vec<String> = values.row(i).iter().map(|&x| format_value(x)).collect();
        writeln!(file, "{}\t{}", gene_id, row.join("\t"))?;
    }

    file.flush()?;
    Ok(())
}
