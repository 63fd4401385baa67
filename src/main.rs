//! rust_xpress command-line interface

use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};

use rust_xpress::cli::{AnnotationArgs, Cli, Commands};
use rust_xpress::prelude::*;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let result = match cli.command {
        Commands::Tpm {
            input,
            annotation,
            output,
        } => run_length_normalization(&input, &annotation, &output, false),
        Commands::Fpkm {
            input,
            annotation,
            output,
        } => run_length_normalization(&input, &annotation, &output, true),
        Commands::Rpm {
            input,
            output,
            allow_zero_library,
        } => run_rpm(&input, &output, allow_zero_library),
        Commands::Te {
            input,
            output,
            names,
            no_log,
        } => run_te(&input, &output, &names, !no_log),
        Commands::Log {
            input,
            output,
            base,
        } => run_log(&input, &output, base),
        Commands::Clean {
            input,
            output,
            columns,
        } => run_clean(&input, &output, columns),
        Commands::Threshold {
            input,
            output,
            minimum,
            maximum,
        } => run_threshold(&input, &output, minimum, maximum),
        Commands::Prep {
            input,
            labels,
            header,
            scaled_output,
            labeled_output,
            no_gene_scale,
            print_means,
        } => run_prep(
            &input,
            &labels,
            header,
            &scaled_output,
            &labeled_output,
            !no_gene_scale,
            print_means,
        ),
        Commands::Batch {
            input,
            batch,
            config,
            interpreter,
            script,
        } => run_batch(&input, &batch, config.as_deref(), interpreter, script),
        Commands::Summary { input, output } => run_summary(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_matrix(path: &str) -> Result<ExpressionMatrix> {
    info!("Loading expression matrix from: {}", path);
    let matrix = read_expression_matrix(path)?;
    info!("  {} genes, {} samples", matrix.n_genes(), matrix.n_samples());
    Ok(matrix)
}

fn save_matrix(path: &str, matrix: &ExpressionMatrix) -> Result<()> {
    info!(
        "Writing {} genes x {} samples to: {}",
        matrix.n_genes(),
        matrix.n_samples(),
        path
    );
    write_expression_matrix(path, matrix)
}

fn run_length_normalization(
    input: &str,
    annotation: &AnnotationArgs,
    output: &str,
    fpkm: bool,
) -> Result<()> {
    let matrix = load_matrix(input)?;

    info!("Building gene length index from: {}", annotation.gtf);
    let lengths = FeatureLengthIndex::from_path(&annotation.gtf, &annotation.options())?;
    info!("  {} gene lengths", lengths.len());

    let normalized = if fpkm {
        info!("Calculating FPKM...");
        r_fpkm_with_index(&matrix, &lengths)?
    } else {
        info!("Calculating TPM...");
        tpm_with_index(&matrix, &lengths)?
    };

    save_matrix(output, &normalized)
}

fn run_rpm(input: &str, output: &str, allow_zero_library: bool) -> Result<()> {
    let matrix = load_matrix(input)?;
    let policy = if allow_zero_library {
        ZeroLibraryPolicy::Propagate
    } else {
        ZeroLibraryPolicy::Error
    };
    let normalized = rpm_with(&matrix, policy)?;
    save_matrix(output, &normalized)
}

fn run_te(input: &str, output: &str, names: &[String], apply_log2: bool) -> Result<()> {
    let matrix = load_matrix(input)?;
    let names = if names.is_empty() { None } else { Some(names) };
    let scores = te(&matrix, names, apply_log2)?;
    save_matrix(output, &scores)
}

fn run_log(input: &str, output: &str, base: u32) -> Result<()> {
    let matrix = load_matrix(input)?;
    let scaled = log_scale(&matrix, base)?;
    save_matrix(output, &scaled)
}

fn run_clean(input: &str, output: &str, columns: bool) -> Result<()> {
    let matrix = load_matrix(input)?;
    let axis = if columns {
        CleanAxis::Columns
    } else {
        CleanAxis::Rows
    };
    let cleaned = clean(&matrix, axis)?;
    save_matrix(output, &cleaned)
}

fn run_threshold(
    input: &str,
    output: &str,
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Result<()> {
    let matrix = load_matrix(input)?;
    let filtered = threshold(&matrix, minimum, maximum)?;
    save_matrix(output, &filtered)
}

fn run_prep(
    input: &str,
    labels_path: &str,
    header: bool,
    scaled_output: &str,
    labeled_output: &str,
    gene_scale: bool,
    print_means: bool,
) -> Result<()> {
    let matrix = load_matrix(input)?;

    info!("Loading sample labels from: {}", labels_path);
    let labels = read_label_map(labels_path, header)?;
    info!("  {} labelled samples", labels.len());

    let (scaled, labeled) = prepare(&matrix, &labels, gene_scale, print_means)?;

    save_matrix(scaled_output, &scaled)?;
    info!("Writing labeled matrix to: {}", labeled_output);
    write_labeled_matrix(labeled_output, &labeled)
}

fn run_batch(
    input: &str,
    batch: &str,
    config_path: Option<&str>,
    interpreter: Option<String>,
    script: Option<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => BatchConfig::from_json_path(path)?,
        None => BatchConfig::default(),
    };
    if let Some(interpreter) = interpreter {
        config.interpreter = interpreter;
    }
    if let Some(script) = script {
        config.script = PathBuf::from(script);
    }

    let output = batch_normalize(input, batch, &config)?;
    info!("Batch-corrected matrix expected at: {}", output.display());
    Ok(())
}

fn run_summary(input: &str, output: Option<&str>) -> Result<()> {
    let matrix = load_matrix(input)?;
    let summary = sample_summary(&matrix);

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            serde_json::to_writer_pretty(file, &summary)?;
            info!("Wrote summary of {} samples to: {}", summary.len(), path);
        }
        None => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    info!("Done!");
    Ok(())
}
