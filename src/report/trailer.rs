use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, Utc};

use crate::core::types::PipelineMode;
use crate::report::ReportError;

/// Version string recorded in tabular trailers
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (October 2026)");

/// `ctime(3)` layout, without the trailing newline
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Provenance trailer closing a tabular output file.
///
/// The final `# [ok]` line marks a file that was written to completion.
///
/// ```text
/// #
/// # Program:         tophits
/// # Version:         0.3.0 (October 2026)
/// # Pipeline mode:   SEARCH
/// # Query file:      [none]
/// # Target file:     hits.tsv
/// # Option settings: tophits report --tblout hits.tbl hits.tsv
/// # Current dir:     /data/run1
/// # Date:            Fri Oct 16 09:12:44 2026
/// # [ok]
/// ```
#[derive(Debug, Clone, Default)]
pub struct TabularTail {
    /// Program name; `[none]` when unset
    pub program: Option<String>,
    pub mode: PipelineMode,
    /// Query file; `[none]` when unset
    pub query_file: Option<String>,
    /// Target file; `[none]` when unset
    pub target_file: Option<String>,
    /// Command line reproducing the run's configuration
    pub options: String,
}

impl TabularTail {
    /// Write the trailer stamped with the current time and working directory.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::SystemEnvironment` if the system clock cannot be
    /// read or converted, `ReportError::Io` if writing fails.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> Result<(), ReportError> {
        let now = current_time()?;
        let cwd = std::env::current_dir().ok();
        self.write_at(w, &now, cwd.as_deref())
    }

    /// Write the trailer with an explicit timestamp and working directory.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Io` if writing fails.
    pub fn write_at<W: Write + ?Sized>(
        &self,
        w: &mut W,
        now: &DateTime<Local>,
        cwd: Option<&Path>,
    ) -> Result<(), ReportError> {
        let none = "[none]";
        writeln!(w, "#")?;
        writeln!(w, "# Program:         {}", self.program.as_deref().unwrap_or(none))?;
        writeln!(w, "# Version:         {VERSION}")?;
        writeln!(w, "# Pipeline mode:   {}", self.mode)?;
        writeln!(w, "# Query file:      {}", self.query_file.as_deref().unwrap_or(none))?;
        writeln!(w, "# Target file:     {}", self.target_file.as_deref().unwrap_or(none))?;
        writeln!(w, "# Option settings: {}", self.options)?;
        match cwd {
            Some(dir) => writeln!(w, "# Current dir:     {}", dir.display())?,
            None => writeln!(w, "# Current dir:     [unknown]")?,
        }
        writeln!(w, "# Date:            {}", now.format(CTIME_FORMAT))?;
        writeln!(w, "# [ok]")?;
        Ok(())
    }
}

/// Read the clock through `SystemTime`; `Local::now()` has no way to report a
/// clock before the epoch or out of chrono's range.
fn current_time() -> Result<DateTime<Local>, ReportError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ReportError::SystemEnvironment(format!("system clock before epoch: {e}")))?;
    let secs = i64::try_from(elapsed.as_secs()).map_err(|_| {
        ReportError::SystemEnvironment("system clock out of range".to_string())
    })?;
    let utc = DateTime::<Utc>::from_timestamp(secs, elapsed.subsec_nanos()).ok_or_else(|| {
        ReportError::SystemEnvironment("system clock out of range".to_string())
    })?;
    Ok(utc.with_timezone(&Local))
}
