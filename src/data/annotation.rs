//! Gene length index built from a GTF-style feature annotation
//!
//! The annotation is a comment-prefixed ('#'), delimited table with at least
//! nine positional fields per record: feature type (index 2), start (index 3),
//! end (index 4) and a ';'-delimited attribute string (index 8).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, XpressError};

/// Number of positional fields in a GTF record
const GTF_FIELDS: usize = 9;
const FEATURE_TYPE_FIELD: usize = 2;
const START_FIELD: usize = 3;
const END_FIELD: usize = 4;
const ATTRIBUTE_FIELD: usize = 8;

/// Feature type whose records define gene lengths
const GENE_FEATURE: &str = "gene";

/// Options controlling how gene identifiers are pulled out of the annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationOptions {
    /// Token preceding the identifier inside the attribute segment
    pub feature_prefix: String,
    /// Index of the ';'-delimited attribute segment holding the identifier
    pub feature_field_index: usize,
    /// Column separator of the annotation table
    pub field_separator: char,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            feature_prefix: "gene_id \"".to_string(),
            feature_field_index: 0,
            field_separator: '\t',
        }
    }
}

/// Mapping from gene identifier to effective gene length in kilobases
///
/// Length is `|end - start| / 1000` of each record whose feature type is
/// exactly `gene`. If a gene identifier occurs on several records, the last
/// record in file order defines its length.
#[derive(Debug, Clone, Default)]
pub struct FeatureLengthIndex {
    lengths_kb: HashMap<String, f64>,
}

impl FeatureLengthIndex {
    /// Build the index from an annotation file
    pub fn from_path<P: AsRef<Path>>(path: P, options: &AnnotationOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::build(BufReader::new(file), options)
    }

    /// Build the index from any annotation source
    pub fn build<R: Read>(source: R, options: &AnnotationOptions) -> Result<Self> {
        if !options.field_separator.is_ascii() {
            return Err(XpressError::InvalidArgument {
                reason: format!(
                    "Field separator '{}' must be a single ASCII character",
                    options.field_separator
                ),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.field_separator as u8)
            .has_headers(false)
            .comment(Some(b'#'))
            .quoting(false)
            .flexible(true)
            .from_reader(source);

        let mut lengths_kb = HashMap::new();
        let mut n_records = 0usize;

        for record in reader.records() {
            let record = record.map_err(|e| XpressError::Parse {
                reason: format!(
                    "Annotation line {} is not delimited text: {}",
                    e.position().map_or(0, |p| p.line()),
                    e
                ),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }
            n_records += 1;

            if record.len() < GTF_FIELDS {
                return Err(XpressError::Parse {
                    reason: format!(
                        "Annotation line {} has {} fields, expected at least {}",
                        line,
                        record.len(),
                        GTF_FIELDS
                    ),
                });
            }

            if &record[FEATURE_TYPE_FIELD] != GENE_FEATURE {
                continue;
            }

            let gene_id = extract_gene_id(&record[ATTRIBUTE_FIELD], options).ok_or_else(|| {
                XpressError::Parse {
                    reason: format!(
                        "Annotation line {}: no gene identifier at attribute position {}",
                        line, options.feature_field_index
                    ),
                }
            })?;

            let start = parse_coordinate(&record[START_FIELD], line)?;
            let end = parse_coordinate(&record[END_FIELD], line)?;
            let length_kb = (end - start).abs() / 1e3;

            if let Some(previous) = lengths_kb.insert(gene_id.clone(), length_kb) {
                log::debug!(
                    "Gene '{}' redefined at line {} ({} kb -> {} kb)",
                    gene_id,
                    line,
                    previous,
                    length_kb
                );
            }
        }

        log::debug!(
            "Parsed {} annotation records, {} gene lengths",
            n_records,
            lengths_kb.len()
        );

        Ok(Self { lengths_kb })
    }

    /// Build directly from (gene ID, length in kb) pairs; last pair wins
    pub fn from_lengths<I, S>(lengths: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            lengths_kb: lengths.into_iter().map(|(id, kb)| (id.into(), kb)).collect(),
        }
    }

    /// Length of a gene in kilobases
    pub fn get(&self, gene_id: &str) -> Option<f64> {
        self.lengths_kb.get(gene_id).copied()
    }

    pub fn contains(&self, gene_id: &str) -> bool {
        self.lengths_kb.contains_key(gene_id)
    }

    pub fn len(&self) -> usize {
        self.lengths_kb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths_kb.is_empty()
    }

    /// Iterate over (gene ID, length in kb) in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.lengths_kb.iter().map(|(id, &kb)| (id.as_str(), kb))
    }
}

/// Pull the gene identifier out of a GTF attribute string
fn extract_gene_id(attributes: &str, options: &AnnotationOptions) -> Option<String> {
    let segment = attributes.split(';').nth(options.feature_field_index)?;
    let segment = segment.trim_start();
    let segment = segment
        .strip_prefix(options.feature_prefix.as_str())
        .or_else(|| segment.strip_prefix(options.feature_prefix.trim_start()))
        .unwrap_or(segment);
    let gene_id = segment.trim_end_matches('"').trim_end_matches(' ');

    if gene_id.is_empty() {
        None
    } else {
        Some(gene_id.to_string())
    }
}

fn parse_coordinate(field: &str, line: u64) -> Result<f64> {
    let field = field.trim();
    field
        .parse::<i64>()
        .map(|x| x as f64)
        .or_else(|_| field.parse::<f64>())
        .map_err(|_| XpressError::Parse {
            reason: format!("Annotation line {}: invalid coordinate '{}'", line, field),
        })
}
