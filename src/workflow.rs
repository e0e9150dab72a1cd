use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::document::DocumentRewriter;
use crate::error::{DpVietError, Result};
use crate::report::RewriteReport;
use crate::subtitle::{classify, decode_text, split_line_ending, LineKind, SourceEncoding};

/// Extensions picked up by batch processing. Single files of any extension
/// are accepted with a warning.
pub const SCRIPT_EXTENSIONS: [&str; 2] = ["srt", "txt"];

/// Rewritten document, re-encoded as UTF-8
#[derive(Debug, Clone)]
pub struct RewrittenBytes {
    pub bytes: Vec<u8>,
    pub encoding: SourceEncoding,
    pub report: RewriteReport,
}

/// Result of processing one file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoding: SourceEncoding,
    pub report: RewriteReport,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: Vec<FileOutcome>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

pub struct Workflow {
    config: Config,
    rewriter: DocumentRewriter,
}

fn has_script_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| DpVietError::InvalidInput(format!("No file name in {}", path.display())))
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let rewriter = DocumentRewriter::from_config(&config)?;
        Ok(Self { config, rewriter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rewriter(&self) -> &DocumentRewriter {
        &self.rewriter
    }

    /// Download name for a rewritten file: the configured prefix plus the original name
    pub fn output_file_name(&self, original_name: &str) -> String {
        format!("{}{}", self.config.output_prefix, original_name)
    }

    /// Decode, rewrite and re-encode an uploaded document
    pub fn rewrite_bytes(&self, bytes: &[u8]) -> RewrittenBytes {
        let decoded = decode_text(bytes);
        if decoded.encoding == SourceEncoding::Latin1 {
            warn!("Input is not valid UTF-8, decoded as Latin-1");
        }

        let rewritten = self.rewriter.rewrite(&decoded.text);
        RewrittenBytes {
            bytes: decoded.restore(rewritten.text).into_bytes(),
            encoding: decoded.encoding,
            report: rewritten.report,
        }
    }

    /// Rewrite a single script file.
    ///
    /// The output goes to `output` when given, otherwise to `output_dir` (or the
    /// input's directory) under the prefixed file name.
    pub async fn process_single_file<P: AsRef<Path>>(
        &self,
        input_path: P,
        output: Option<&Path>,
        output_dir: Option<&Path>,
    ) -> Result<FileOutcome> {
        let input_path = input_path.as_ref();
        info!("Processing single file: {}", input_path.display());

        if !input_path.is_file() {
            return Err(DpVietError::FileNotFound(input_path.display().to_string()));
        }
        if !has_script_extension(input_path) {
            warn!("{} is not a .srt or .txt file, processing anyway", input_path.display());
        }

        let output_path = match output {
            Some(path) => path.to_path_buf(),
            None => {
                let dir = match output_dir {
                    Some(dir) => dir.to_path_buf(),
                    None => input_path.parent()
                        .ok_or_else(|| DpVietError::Config("Cannot determine output directory".to_string()))?
                        .to_path_buf(),
                };
                dir.join(self.output_file_name(&file_name_of(input_path)?))
            }
        };

        self.rewrite_file(input_path, &output_path).await
    }

    /// Rewrite every .srt/.txt file below `input_dir`, mirroring the directory
    /// layout under `output_dir`. Failures are collected, not fatal.
    pub async fn process_directory<P: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Option<&Path>,
    ) -> Result<BatchSummary> {
        let input_dir = input_dir.as_ref();
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(DpVietError::InvalidInput(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        let output_dir = output_dir.unwrap_or(input_dir);
        fs::create_dir_all(output_dir).await?;

        let mut summary = BatchSummary::default();
        let mut script_files = Vec::new();

        for entry in WalkDir::new(input_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !has_script_extension(path) {
                continue;
            }
            // earlier output of this tool
            if entry.file_name().to_string_lossy().starts_with(&self.config.output_prefix) {
                summary.skipped.push(path.to_path_buf());
                continue;
            }
            script_files.push(path.to_path_buf());
        }
        script_files.sort();

        info!("Found {} script files to process", script_files.len());

        let pb = ProgressBar::new(script_files.len() as u64);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"));

        for script_path in script_files {
            pb.set_message(script_path.display().to_string());

            match self.batch_output_path(input_dir, output_dir, &script_path) {
                Ok(output_path) => match self.rewrite_file(&script_path, &output_path).await {
                    Ok(outcome) => {
                        info!("Successfully processed: {}", script_path.display());
                        summary.processed.push(outcome);
                    }
                    Err(e) => {
                        warn!("Failed to process {}: {}", script_path.display(), e);
                        summary.failed.push((script_path, e.to_string()));
                    }
                },
                Err(e) => {
                    warn!("Failed to process {}: {}", script_path.display(), e);
                    summary.failed.push((script_path, e.to_string()));
                }
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        info!(
            "Batch finished: {} processed, {} skipped, {} failed",
            summary.processed.len(),
            summary.skipped.len(),
            summary.failed.len()
        );

        Ok(summary)
    }

    /// Classify every line of a file without rewriting it
    pub async fn classify_file<P: AsRef<Path>>(&self, input_path: P) -> Result<Vec<(LineKind, String)>> {
        let input_path = input_path.as_ref();
        if !input_path.is_file() {
            return Err(DpVietError::FileNotFound(input_path.display().to_string()));
        }

        let bytes = fs::read(input_path).await?;
        let decoded = decode_text(&bytes);

        Ok(decoded
            .text
            .split('\n')
            .map(|line| {
                let (content, _) = split_line_ending(line);
                (classify(content), content.to_string())
            })
            .collect())
    }

    fn batch_output_path(&self, input_dir: &Path, output_dir: &Path, script_path: &Path) -> Result<PathBuf> {
        let relative = pathdiff::diff_paths(script_path, input_dir)
            .ok_or_else(|| DpVietError::InvalidInput(format!(
                "{} is not below {}",
                script_path.display(),
                input_dir.display()
            )))?;

        let target_dir = match relative.parent() {
            Some(parent) => output_dir.join(parent),
            None => output_dir.to_path_buf(),
        };

        Ok(target_dir.join(self.output_file_name(&file_name_of(script_path)?)))
    }

    async fn rewrite_file(&self, input_path: &Path, output_path: &Path) -> Result<FileOutcome> {
        let bytes = fs::read(input_path).await?;
        let rewritten = self.rewrite_bytes(&bytes);

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(output_path, &rewritten.bytes).await?;

        info!(
            "Rewrote {} -> {} ({} of {} dialogue lines changed)",
            input_path.display(),
            output_path.display(),
            rewritten.report.changed,
            rewritten.report.dialogue
        );

        Ok(FileOutcome {
            input: input_path.to_path_buf(),
            output: output_path.to_path_buf(),
            encoding: rewritten.encoding,
            report: rewritten.report,
        })
    }
}
