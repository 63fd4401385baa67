//! Command-line interface for rust_xpress

use clap::{Args, Parser, Subcommand};

use crate::data::AnnotationOptions;

#[derive(Parser)]
#[command(name = "rust_xpress")]
#[command(version)]
#[command(about = "RNA-seq expression normalization and data preparation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Number of threads for row filtering (0 = auto)
    #[arg(short = 't', long, global = true, default_value = "0")]
    pub threads: usize,
}

/// GTF annotation arguments shared by the length-normalizing commands
#[derive(Args, Debug, Clone)]
pub struct AnnotationArgs {
    /// Path to GTF annotation
    #[arg(short, long)]
    pub gtf: String,

    /// Token preceding the gene identifier in the attribute column
    #[arg(long, default_value = "gene_id \"")]
    pub gene_name_prefix: String,

    /// Position of the identifier among the ';'-separated attributes
    #[arg(long, default_value = "0")]
    pub gene_name_location: usize,

    /// Column separator of the GTF
    #[arg(long, default_value = "\t")]
    pub sep: char,
}

impl AnnotationArgs {
    pub fn options(&self) -> AnnotationOptions {
        AnnotationOptions {
            feature_prefix: self.gene_name_prefix.clone(),
            feature_field_index: self.gene_name_location,
            field_separator: self.sep,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcripts per million (length first, then library size)
    #[command(
        after_long_help = "\
Examples:
  rust_xpress tpm -i counts.tsv -g genes.gtf -o counts_tpm.tsv"
    )]
    Tpm {
        /// Path to count matrix
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        annotation: AnnotationArgs,

        /// Output file path
        #[arg(short, long)]
        output: String,
    },

    /// Reads/fragments per kilobase million (library size first, then length)
    Fpkm {
        /// Path to count matrix
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        annotation: AnnotationArgs,

        /// Output file path
        #[arg(short, long)]
        output: String,
    },

    /// Reads per million
    Rpm {
        /// Path to count matrix
        #[arg(short, long)]
        input: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Let zero-count samples propagate NaN instead of failing
        #[arg(long)]
        allow_zero_library: bool,
    },

    /// Translation efficiency of consecutive sample pairs
    #[command(
        long_about = "Translation efficiency of consecutive sample pairs.\n\n\
            Columns are paired positionally (1st/2nd, 3rd/4th, ...). Each pair\n\
            yields log2((a + 1) / (b + 1)).",
        after_long_help = "\
Examples:
  rust_xpress te -i rpm.tsv -o te.tsv
  rust_xpress te -i rpm.tsv -o te.tsv --name wt --name mutant --no-log"
    )]
    Te {
        /// Path to expression matrix
        #[arg(short, long)]
        input: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Name of each ratio column, in pair order
        #[arg(long = "name", value_name = "NAME")]
        names: Vec<String>,

        /// Return raw ratios instead of log2 ratios
        #[arg(long)]
        no_log: bool,
    },

    /// Pseudocounted log scaling
    Log {
        /// Path to expression matrix
        #[arg(short, long)]
        input: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Logarithm base (2 or 10)
        #[arg(short, long, default_value = "10")]
        base: u32,
    },

    /// Drop incomplete and duplicated genes
    Clean {
        /// Path to expression matrix
        #[arg(short, long)]
        input: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Drop incomplete samples instead of incomplete genes
        #[arg(long)]
        columns: bool,
    },

    /// Keep genes whose values all lie within the given bounds
    Threshold {
        /// Path to expression matrix
        #[arg(short, long)]
        input: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Inclusive lower bound
        #[arg(long)]
        minimum: Option<f64>,

        /// Inclusive upper bound
        #[arg(long)]
        maximum: Option<f64>,
    },

    /// Clean, gene-scale and label a matrix for plotting
    Prep {
        /// Path to expression matrix
        #[arg(short, long)]
        input: String,

        /// Path to two-column sample label table
        #[arg(short, long)]
        labels: String,

        /// Label table has a header row
        #[arg(long)]
        header: bool,

        /// Output path for the gene-scaled matrix
        #[arg(long)]
        scaled_output: String,

        /// Output path for the labeled matrix
        #[arg(long)]
        labeled_output: String,

        /// Skip per-gene z-scoring
        #[arg(long)]
        no_gene_scale: bool,

        /// Print per-gene means of the scaled matrix
        #[arg(long)]
        print_means: bool,
    },

    /// Run external batch effect correction
    #[command(
        long_about = "Run external batch effect correction.\n\n\
            The input must be tab-delimited (.txt or .tsv). The corrected matrix\n\
            is written by the external script to <input>_batched.tsv.",
        after_long_help = "\
Examples:
  rust_xpress batch -i counts.tsv -b batches.txt
  rust_xpress batch -i counts.tsv -b batches.txt --script /opt/combat.r"
    )]
    Batch {
        /// Path to tab-delimited expression matrix
        #[arg(short, long)]
        input: String,

        /// Path to batch design table
        #[arg(short, long)]
        batch: String,

        /// JSON file with interpreter/script settings
        #[arg(long)]
        config: Option<String>,

        /// Interpreter override
        #[arg(long)]
        interpreter: Option<String>,

        /// Script override
        #[arg(long)]
        script: Option<String>,
    },

    /// Per-sample distribution summary (JSON)
    Summary {
        /// Path to expression matrix
        #[arg(short, long)]
        input: String,

        /// Output file path [default: stdout]
        #[arg(short, long)]
        output: Option<String>,
    },
}
