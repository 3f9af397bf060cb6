use healthai_core::analytics::{Series, Table};
use tracing::{info, warn};

use super::input::InputBuffer;
use super::Notice;
use crate::strings::{
    read_error_notice, ANALYTICS_IDLE_NOTICE, EMPTY_PATH_NOTICE, NO_NUMERIC_NOTICE,
    UPLOAD_OK_NOTICE,
};

pub const PREVIEW_ROWS: usize = 5;

pub struct Loaded {
    pub path: String,
    pub table: Table,
    pub numeric: Vec<String>,
    pub selected: usize,
    pub series: Option<Series>,
}

pub struct AnalyticsPane {
    pub input: InputBuffer,
    pub notice: Notice,
    pub loaded: Option<Loaded>,
}

impl Default for AnalyticsPane {
    fn default() -> Self {
        Self {
            input: InputBuffer::default(),
            notice: Notice::Info(ANALYTICS_IDLE_NOTICE.to_string()),
            loaded: None,
        }
    }
}

impl AnalyticsPane {
    /// Loads the CSV named in the input box. Failures leave the pane without
    /// a table and an inline error; the rest of the app is unaffected.
    pub fn load(&mut self) {
        let path = self.input.text.trim().to_string();
        if path.is_empty() {
            self.notice = Notice::Warning(EMPTY_PATH_NOTICE.to_string());
            return;
        }
        match Table::from_path(&path) {
            Ok(table) => self.show(path, table),
            Err(e) => {
                warn!(target: "tui", "csv load failed: path={} {}", path, e);
                self.loaded = None;
                self.notice = Notice::Error(read_error_notice(&e.to_string()));
            }
        }
    }

    pub fn show(&mut self, path: String, table: Table) {
        let numeric = table.numeric_columns();
        info!(target: "tui", "csv loaded: path={} rows={} numeric={}", path, table.row_count(), numeric.len());
        self.notice = if numeric.is_empty() {
            Notice::Warning(NO_NUMERIC_NOTICE.to_string())
        } else {
            Notice::Success(UPLOAD_OK_NOTICE.to_string())
        };
        self.loaded = Some(Loaded {
            path,
            table,
            numeric,
            selected: 0,
            series: None,
        });
        self.refresh_series();
    }

    fn refresh_series(&mut self) {
        let Some(l) = &mut self.loaded else {
            return;
        };
        l.series = None;
        let Some(column) = l.numeric.get(l.selected) else {
            return;
        };
        match l.table.series(column) {
            Ok(s) => l.series = Some(s),
            Err(e) => self.notice = Notice::Error(e.to_string()),
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(l) = &mut self.loaded {
            l.selected = l.selected.saturating_sub(1);
        }
        self.refresh_series();
    }

    pub fn select_next(&mut self) {
        if let Some(l) = &mut self.loaded {
            if l.selected + 1 < l.numeric.len() {
                l.selected += 1;
            }
        }
        self.refresh_series();
    }
}
