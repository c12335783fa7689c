//! Full run: manual pages → fragments → annotated stubs.

use crate::annotate::{self, AnnotateReport};
use crate::config::{AnnotateConfig, ExtractConfig};
use crate::error::Result;
use crate::extract::{self, ExtractReport};
use crate::walk;
use std::path::PathBuf;

/// Directories taking part in a full run.
pub struct Pipeline {
    pub raw_dir: PathBuf,
    pub fragment_dir: PathBuf,
    pub stubs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Pipeline {
    /// Regenerate the fragment corpus from scratch.
    pub fn extract(&self, config: &ExtractConfig) -> Result<ExtractReport> {
        walk::remove_dir(&self.fragment_dir)?;
        walk::ensure_dir(&self.fragment_dir)?;
        extract::extract_all(&self.raw_dir, &self.fragment_dir, config)
    }

    /// Regenerate the output corpus from scratch.
    pub fn annotate(&self, config: &AnnotateConfig) -> Result<AnnotateReport> {
        walk::remove_dir(&self.output_dir)?;
        annotate::annotate_all(&self.fragment_dir, &self.stubs_dir, &self.output_dir, config)
    }

    pub fn run(
        &self,
        extract_config: &ExtractConfig,
        annotate_config: &AnnotateConfig,
    ) -> Result<(ExtractReport, AnnotateReport)> {
        let extracted = self.extract(extract_config)?;
        let annotated = self.annotate(annotate_config)?;
        Ok((extracted, annotated))
    }
}
