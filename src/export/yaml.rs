//! YAML export
//!
//! Exports the complete database to YAML for a human-readable backup.

use std::io::Write;

use crate::error::{FeeDeskError, FeeDeskResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> FeeDeskResult<()> {
    let export = FullExport::from_storage(storage)?;
    export.validate().map_err(FeeDeskError::Export)?;

    writeln!(writer, "# FeeDesk Full Database Export")?;
    writeln!(writer, "# School data generated {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FeeDeskError::Export(e.to_string()))?;

    Ok(())
}
