use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use healthai_core::llm::ModelClient as _;
use healthai_core::prompts::Task;
use providers::openrouter::OpenRouterClient;
use tracing::info;

pub mod analytics;
pub mod input;
pub mod task;

use analytics::AnalyticsPane;
use input::InputBuffer;
use task::TaskPane;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Info(s) | Notice::Warning(s) | Notice::Error(s) => s,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    PatientChat,
    DiseasePrediction,
    TreatmentPlan,
    Analytics,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::PatientChat,
        Tab::DiseasePrediction,
        Tab::TreatmentPlan,
        Tab::Analytics,
    ];

    pub fn index(self) -> usize {
        match self {
            Tab::PatientChat => 0,
            Tab::DiseasePrediction => 1,
            Tab::TreatmentPlan => 2,
            Tab::Analytics => 3,
        }
    }

    pub fn task(self) -> Option<Task> {
        match self {
            Tab::PatientChat => Some(Task::PatientChat),
            Tab::DiseasePrediction => Some(Task::DiseasePrediction),
            Tab::TreatmentPlan => Some(Task::TreatmentPlan),
            Tab::Analytics => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self.task() {
            Some(t) => t.title(),
            None => "Health Analytics",
        }
    }

    fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

pub struct App {
    pub tab: Tab,
    pub panes: [TaskPane; 3],
    pub analytics: AnalyticsPane,
    pub should_quit: bool,
    pub dirty: bool,
    pub model_label: String,
    client: Arc<OpenRouterClient>,
}

impl App {
    pub fn new(client: Arc<OpenRouterClient>) -> Self {
        Self {
            tab: Tab::PatientChat,
            panes: Task::ALL.map(TaskPane::new),
            analytics: AnalyticsPane::default(),
            should_quit: false,
            dirty: true,
            model_label: client.model().to_string(),
            client,
        }
    }

    pub fn active_pane(&self) -> Option<&TaskPane> {
        match self.tab {
            Tab::Analytics => None,
            tab => Some(&self.panes[tab.index()]),
        }
    }

    fn active_pane_mut(&mut self) -> Option<&mut TaskPane> {
        match self.tab {
            Tab::Analytics => None,
            tab => Some(&mut self.panes[tab.index()]),
        }
    }

    pub fn active_input(&self) -> &InputBuffer {
        match self.active_pane() {
            Some(p) => &p.input,
            None => &self.analytics.input,
        }
    }

    fn active_input_mut(&mut self) -> &mut InputBuffer {
        match self.tab {
            Tab::Analytics => &mut self.analytics.input,
            tab => &mut self.panes[tab.index()].input,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.panes.iter().filter(|p| p.is_pending()).count()
    }

    pub fn insert_text(&mut self, s: &str) {
        // The analytics path is a single line.
        if self.tab == Tab::Analytics {
            let flat = s.replace(['\r', '\n'], "");
            self.active_input_mut().insert_text(&flat);
        } else {
            self.active_input_mut().insert_text(s);
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            info!(target: "tui", "tab: {:?} -> {:?}", self.tab, tab);
            self.tab = tab;
        }
    }

    pub fn submit(&mut self) {
        if self.tab == Tab::Analytics {
            self.analytics.load();
            return;
        }
        let client = Arc::clone(&self.client);
        if let Some(pane) = self.active_pane_mut() {
            pane.submit(&client);
        }
    }

    pub fn scroll_response(&mut self, up: bool, step: u16) {
        if let Some(p) = self.active_pane_mut() {
            p.scroll = if up {
                p.scroll.saturating_sub(step)
            } else {
                p.scroll.saturating_add(step)
            };
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.select_tab(self.tab.next()),
            KeyCode::BackTab => self.select_tab(self.tab.prev()),
            KeyCode::F(n @ 1..=4) => self.select_tab(Tab::ALL[(n - 1) as usize]),
            KeyCode::Enter
                if key.modifiers.contains(KeyModifiers::SHIFT) && self.tab != Tab::Analytics =>
            {
                self.insert_text("\n");
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.active_input_mut().delete_left_grapheme(),
            KeyCode::Delete => self.active_input_mut().delete_right_grapheme(),
            KeyCode::Char('w') if ctrl => self.active_input_mut().delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.active_input_mut().kill_to_line_start(),
            KeyCode::Char('k') if ctrl => self.active_input_mut().kill_to_line_end(),
            KeyCode::Char('a') if ctrl => self.active_input_mut().move_cursor_line_start(),
            KeyCode::Char('e') if ctrl => self.active_input_mut().move_cursor_line_end(),
            KeyCode::Char(ch) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert_text(ch.encode_utf8(&mut buf));
            }
            KeyCode::Left if ctrl => self.active_input_mut().move_cursor_word_left(),
            KeyCode::Right if ctrl => self.active_input_mut().move_cursor_word_right(),
            KeyCode::Left => self.active_input_mut().move_left(),
            KeyCode::Right => self.active_input_mut().move_right(),
            KeyCode::Home => self.active_input_mut().move_cursor_line_start(),
            KeyCode::End => self.active_input_mut().move_cursor_line_end(),
            KeyCode::Up if self.tab == Tab::Analytics => self.analytics.select_prev(),
            KeyCode::Down if self.tab == Tab::Analytics => self.analytics.select_next(),
            KeyCode::Up => self.scroll_response(true, 1),
            KeyCode::Down => self.scroll_response(false, 1),
            KeyCode::PageUp => self.scroll_response(true, 10),
            KeyCode::PageDown => self.scroll_response(false, 10),
            _ => {}
        }
        self.dirty = true;
    }

    pub fn on_tick(&mut self) {
        for pane in &mut self.panes {
            if pane.poll() {
                self.dirty = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use providers::openrouter::{Credential, OpenRouterConfig};
    use std::time::{Duration, Instant};

    fn app_for(base_url: String) -> App {
        let mut cfg = OpenRouterConfig::new(Credential::new("test-key"));
        cfg.base_url = base_url;
        App::new(Arc::new(OpenRouterClient::new(cfg).unwrap()))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, s: &str) {
        for ch in s.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn wait_idle(app: &mut App) {
        let start = Instant::now();
        while app.pending_count() > 0 && start.elapsed() < Duration::from_secs(10) {
            app.on_tick();
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    fn temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("healthai-{}-{}.csv", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn tab_keys_cycle_and_jump() {
        let mut app = app_for("http://127.0.0.1:65534".into());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::DiseasePrediction);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.tab, Tab::Analytics);
        press(&mut app, KeyCode::F(3));
        assert_eq!(app.tab, Tab::TreatmentPlan);
    }

    #[test]
    fn blank_input_warns_without_calling_out() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).body(r#"{"choices":[{"message":{"content":"X"}}]}"#);
        });
        let mut app = app_for(server.base_url());

        for tab in [Tab::PatientChat, Tab::DiseasePrediction, Tab::TreatmentPlan] {
            app.select_tab(tab);
            type_text(&mut app, "   ");
            press(&mut app, KeyCode::Enter);
            let pane = app.active_pane().unwrap();
            assert!(!pane.is_pending());
            let task = tab.task().unwrap();
            assert_eq!(
                pane.notice,
                Some(Notice::Warning(task.blank_warning().to_string()))
            );
        }
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(mock.hits(), 0);
    }

    #[test]
    fn reply_lands_in_the_submitting_tab() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_contains("Symptoms reported: fever, rash.");
            then.status(200)
                .body(r#"{"choices":[{"message":{"content":"Possibly measles (60%)."}}]}"#);
        });
        let mut app = app_for(server.base_url());
        app.select_tab(Tab::DiseasePrediction);
        type_text(&mut app, "fever, rash");
        press(&mut app, KeyCode::Enter);
        assert!(app.active_pane().unwrap().is_pending());

        // A second Enter while waiting must not start another call.
        press(&mut app, KeyCode::Enter);
        wait_idle(&mut app);

        let pane = &app.panes[Tab::DiseasePrediction.index()];
        assert_eq!(
            pane.notice,
            Some(Notice::Info("Possibly measles (60%).".to_string()))
        );
        assert_eq!(pane.input.text, "fever, rash");
        assert!(app.panes[Tab::PatientChat.index()].notice.is_none());
        mock.assert_hits(1);
    }

    #[test]
    fn upstream_failure_is_shown_inline() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(402).body("Insufficient credits");
        });
        let mut app = app_for(server.base_url());
        type_text(&mut app, "Is aspirin safe?");
        press(&mut app, KeyCode::Enter);
        wait_idle(&mut app);

        match &app.panes[0].notice {
            Some(Notice::Error(s)) => {
                assert!(s.contains("402"));
                assert!(s.contains("Insufficient credits"));
            }
            other => panic!("unexpected notice: {:?}", other),
        }
    }

    #[test]
    fn transport_failure_is_shown_inline() {
        let mut app = app_for("http://127.0.0.1:65534".into());
        app.select_tab(Tab::TreatmentPlan);
        type_text(&mut app, "Diabetes");
        press(&mut app, KeyCode::Enter);
        wait_idle(&mut app);
        assert!(matches!(
            app.panes[Tab::TreatmentPlan.index()].notice,
            Some(Notice::Error(_))
        ));
    }

    #[test]
    fn csv_with_numeric_column_is_charted() {
        let path = temp_csv("vitals", "day,heart_rate,mood\nmon,72,ok\ntue,80,good\nwed,68,ok\n");
        let mut app = app_for("http://127.0.0.1:65534".into());
        app.select_tab(Tab::Analytics);
        app.insert_text(&path.display().to_string());
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.analytics.notice, Notice::Success(_)));
        let loaded = app.analytics.loaded.as_ref().unwrap();
        assert_eq!(loaded.numeric, vec!["heart_rate"]);
        let series = loaded.series.as_ref().unwrap();
        assert_eq!(series.values(), vec![72.0, 80.0, 68.0]);
        assert_eq!(series.title(), "heart_rate Trend");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn column_selection_switches_series() {
        let path = temp_csv("two", "bp,weight\n120,80\n118,81\n");
        let mut app = app_for("http://127.0.0.1:65534".into());
        app.select_tab(Tab::Analytics);
        app.insert_text(&path.display().to_string());
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        let loaded = app.analytics.loaded.as_ref().unwrap();
        assert_eq!(loaded.selected, 1);
        assert_eq!(loaded.series.as_ref().unwrap().values(), vec![80.0, 81.0]);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.analytics.loaded.as_ref().unwrap().selected, 1);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn repeated_headers_chart_their_own_column() {
        let path = temp_csv("dupes", "bp,bp\n1,10\n2\n3,30\n");
        let mut app = app_for("http://127.0.0.1:65534".into());
        app.select_tab(Tab::Analytics);
        app.insert_text(&path.display().to_string());
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.analytics.notice, Notice::Success(_)));
        press(&mut app, KeyCode::Down);
        let loaded = app.analytics.loaded.as_ref().unwrap();
        assert_eq!(loaded.numeric, vec!["bp", "bp.1"]);
        let series = loaded.series.as_ref().unwrap();
        assert_eq!(series.points, vec![(0.0, 10.0), (2.0, 30.0)]);
        assert_eq!(series.title(), "bp.1 Trend");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn csv_without_numeric_columns_warns_and_has_no_chart() {
        let path = temp_csv("text", "name,city\nann,oslo\n");
        let mut app = app_for("http://127.0.0.1:65534".into());
        app.select_tab(Tab::Analytics);
        app.insert_text(&path.display().to_string());
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.analytics.notice, Notice::Warning(_)));
        assert!(app.analytics.loaded.as_ref().unwrap().series.is_none());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unreadable_file_errors_and_session_continues() {
        let path = temp_csv("overlong", "a,b\n1,2\n3,4,5\n");
        let mut app = app_for("http://127.0.0.1:65534".into());
        app.select_tab(Tab::Analytics);
        app.insert_text(&path.display().to_string());
        press(&mut app, KeyCode::Enter);
        match &app.analytics.notice {
            Notice::Error(s) => assert!(s.starts_with("Error reading file:")),
            other => panic!("unexpected notice: {:?}", other),
        }
        assert!(app.analytics.loaded.is_none());

        // The app keeps working: another tab still validates input.
        app.select_tab(Tab::PatientChat);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.panes[0].notice, Some(Notice::Warning(_))));
        assert!(!app.should_quit);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn analytics_path_ignores_newlines() {
        let mut app = app_for("http://127.0.0.1:65534".into());
        app.select_tab(Tab::Analytics);
        app.insert_text("/tmp/a\n.csv");
        assert_eq!(app.analytics.input.text, "/tmp/a.csv");
    }
}
