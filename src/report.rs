/*!

CSV export of the statistics history. Each row is one recorded frame,
oldest first, with the columns of [`StatisticsSnapshot`](crate::stats::StatisticsSnapshot).

*/

use crate::context::Context;
use crate::error::EpisimError;
use crate::stats::StatsData;
use log::info;
use std::path::Path;

pub trait ContextReportExt {
    /// Writes the retained statistics history to `path` as CSV with a header
    /// row. An empty history produces an empty file.
    fn write_history_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), EpisimError>;
}

impl ContextReportExt for Context {
    fn write_history_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), EpisimError> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;
        let mut rows = 0;
        if let Some(stats_data) = self.get_data_container::<StatsData>() {
            for snapshot in &stats_data.history {
                writer.serialize(snapshot)?;
                rows += 1;
            }
        }
        writer.flush()?;
        info!("wrote {rows} history rows to {}", path.as_ref().display());
        Ok(())
    }
}
