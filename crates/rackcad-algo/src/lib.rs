use anyhow::{Context, Result};
use rackcad_core::model::RackConfig;
use rackcad_core::report::ValidationMessage;
use rackcad_core::validate::validate_and_complete;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

pub mod assembly;
pub mod bracing;
pub mod error;
pub mod export;
pub mod layout;
pub mod solid;
pub mod step_writer;

use assembly::Assembly;
use export::{ExportOptions, ExportReport, Exporter};
use layout::{LayoutOptions, LayoutParams, RackBuilder};

/// Everything one run of the pipeline produced.
pub struct Generation {
    pub messages: Vec<ValidationMessage>,
    pub config: RackConfig,
    pub assembly: Assembly,
    pub export: ExportReport,
}

impl Generation {
    pub fn succeeded(&self) -> bool {
        self.export.success
    }
}

/// Validates `raw` and lays out the rack it describes.
pub fn assemble(
    raw: &Value,
    layout: &LayoutOptions,
) -> Result<(Vec<ValidationMessage>, RackConfig, Assembly)> {
    let (completed, messages) = validate_and_complete(raw).into_parts();
    for message in &messages {
        warn!(kind = ?message.kind, "{message}");
    }

    let config = RackConfig::from_value(&completed).context("read completed configuration")?;
    let params = LayoutParams::from_config(&config).context("derive layout parameters")?;
    let assembly = RackBuilder::new(layout.clone())
        .build(&params)
        .context("lay out rack")?;
    Ok((messages, config, assembly))
}

/// Validate, lay out and export in one call.
///
/// Configuration and layout problems are errors; a failed export is reported in
/// [`Generation::export`] so the caller still gets the messages and the assembly.
pub fn generate(
    raw: &Value,
    path: &Path,
    layout: &LayoutOptions,
    export: &ExportOptions,
) -> Result<Generation> {
    let (messages, config, assembly) = assemble(raw, layout)?;
    let export = Exporter::new(export.clone()).export(&assembly, path);
    Ok(Generation {
        messages,
        config,
        assembly,
        export,
    })
}
