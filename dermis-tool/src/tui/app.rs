use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use dermis_oracle::{AnalysisResult, Oracle, SkinAnalyst, Verdict};
use dermis_timeline::{TimelineBackend, TimelineEntry, TimelineStore};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::warn;

use crate::error::DermError;
use crate::image_source::read_image_file;
use crate::report::{ANALYSIS_FAILED, COMPARISON_FALLBACK, DetailCategory, NEED_TWO_PHOTOS};
use crate::session::{CompareSelection, analyze_image, compare_images};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Home,
    Capture,
    Analyzing,
    Result,
    Detail,
    History,
    Compare,
    Comparing,
}

impl AppMode {
    /// A request is outstanding; only Esc is accepted.
    pub fn is_busy(self) -> bool {
        matches!(self, AppMode::Analyzing | AppMode::Comparing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareSlot {
    Baseline,
    Current,
}

enum Pending {
    Analysis {
        image_data: String,
        rx: oneshot::Receiver<Result<AnalysisResult, DermError>>,
    },
    Comparison {
        rx: oneshot::Receiver<String>,
    },
}

pub struct DermApp<O, B> {
    pub mode: AppMode,
    pub should_quit: bool,
    pub timeline: TimelineStore<B>,
    pub input: String,
    pub cursor_pos: usize,
    pub notice: Option<String>,
    pub tick: usize,

    // Result screen
    pub viewing: Option<usize>,
    pub result_origin: AppMode,
    pub category_selected: usize,

    pub history_selected: usize,

    // Compare screen
    pub selection: Option<CompareSelection>,
    pub compare_slot: CompareSlot,
    pub narrative: Option<String>,

    analyst: Arc<SkinAnalyst<O>>,
    timeout: Option<Duration>,
    pending: Option<Pending>,
}

impl<O, B> DermApp<O, B>
where
    O: Oracle + 'static,
    B: TimelineBackend,
{
    pub fn new(timeline: TimelineStore<B>, analyst: SkinAnalyst<O>, timeout: Option<Duration>) -> Self {
        Self {
            mode: AppMode::Home,
            should_quit: false,
            timeline,
            input: String::new(),
            cursor_pos: 0,
            notice: None,
            tick: 0,
            viewing: None,
            result_origin: AppMode::Home,
            category_selected: 0,
            history_selected: 0,
            selection: None,
            compare_slot: CompareSlot::Baseline,
            narrative: None,
            analyst: Arc::new(analyst),
            timeout,
            pending: None,
        }
    }

    pub fn model(&self) -> &str {
        self.analyst.model()
    }

    pub fn go_home(&mut self) {
        self.mode = AppMode::Home;
    }

    pub fn open_capture(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
        self.notice = None;
        self.mode = AppMode::Capture;
    }

    /// Reads the photo named in the input and sends it for analysis.
    pub fn start_analysis(&mut self) {
        if self.pending.is_some() {
            return;
        }

        let path = self.input.trim();
        if path.is_empty() {
            return;
        }

        let image = match read_image_file(Path::new(path)) {
            Ok(image) => image,
            Err(e) => {
                self.notice = Some(e.to_string());
                return;
            }
        };

        let image_data = image.to_data_uri();
        let (tx, rx) = oneshot::channel();
        let analyst = Arc::clone(&self.analyst);
        let timeout = self.timeout;

        tokio::spawn(async move {
            let result = analyze_image(&analyst, image, timeout).await;
            let _ = tx.send(result);
        });

        self.pending = Some(Pending::Analysis { image_data, rx });
        self.notice = None;
        self.tick = 0;
        self.mode = AppMode::Analyzing;
    }

    pub fn open_compare(&mut self) {
        self.selection = CompareSelection::spanning(self.timeline.len());
        self.compare_slot = CompareSlot::Baseline;
        self.narrative = None;
        self.notice = None;
        self.mode = AppMode::Compare;
    }

    pub fn toggle_compare_slot(&mut self) {
        self.compare_slot = match self.compare_slot {
            CompareSlot::Baseline => CompareSlot::Current,
            CompareSlot::Current => CompareSlot::Baseline,
        };
    }

    /// Moves the focused side of the comparison by `delta` entries.
    pub fn shift_compare(&mut self, delta: isize) {
        let last = self.timeline.len().saturating_sub(1);
        let slot = self.compare_slot;
        let Some(selection) = self.selection.as_mut() else {
            return;
        };

        let index = match slot {
            CompareSlot::Baseline => &mut selection.baseline,
            CompareSlot::Current => &mut selection.current,
        };
        *index = index.saturating_add_signed(delta).min(last);
        self.narrative = None;
    }

    pub fn start_comparison(&mut self) {
        if self.pending.is_some() {
            return;
        }

        let Some(selection) = self.selection else {
            self.notice = Some(NEED_TWO_PHOTOS.to_string());
            return;
        };

        let (baseline, current) = match selection.pair(self.timeline.len()) {
            Ok(pair) => pair,
            Err(DermError::SameEntry(_)) => {
                self.notice = Some("Select two different photos to compare.".to_string());
                return;
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                return;
            }
        };

        let entries = self.timeline.load_all();
        let earlier = entries[baseline].image_data().to_string();
        let later = entries[current].image_data().to_string();

        let (tx, rx) = oneshot::channel();
        let analyst = Arc::clone(&self.analyst);
        let timeout = self.timeout;

        tokio::spawn(async move {
            let narrative = compare_images(&analyst, &earlier, &later, timeout).await;
            let _ = tx.send(narrative);
        });

        self.pending = Some(Pending::Comparison { rx });
        self.narrative = None;
        self.notice = None;
        self.tick = 0;
        self.mode = AppMode::Comparing;
    }

    /// Drops the outstanding request; its result is discarded when it lands.
    pub fn abandon_request(&mut self) {
        self.pending = None;
        self.notice = Some("Request cancelled".to_string());
        self.mode = match self.mode {
            AppMode::Comparing => AppMode::Compare,
            _ => AppMode::Home,
        };
    }

    pub fn poll_response(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        match self.pending.take() {
            Some(Pending::Analysis { image_data, mut rx }) => match rx.try_recv() {
                Err(TryRecvError::Empty) => {
                    self.pending = Some(Pending::Analysis { image_data, rx });
                }
                Ok(Ok(result)) => self.finish_analysis(image_data, result),
                Ok(Err(e)) => {
                    warn!(error = %e, "Analysis failed");
                    self.fail_analysis();
                }
                Err(TryRecvError::Closed) => self.fail_analysis(),
            },
            Some(Pending::Comparison { mut rx }) => match rx.try_recv() {
                Err(TryRecvError::Empty) => {
                    self.pending = Some(Pending::Comparison { rx });
                }
                Ok(narrative) => self.finish_comparison(narrative),
                Err(TryRecvError::Closed) => self.finish_comparison(COMPARISON_FALLBACK.to_string()),
            },
            None => {}
        }
    }

    fn finish_analysis(&mut self, image_data: String, result: AnalysisResult) {
        if let Err(e) = self.timeline.record(image_data, result) {
            warn!(error = %e, "Failed to persist analysis");
            self.notice = Some(format!("Failed to save analysis: {}", e));
            self.mode = AppMode::Home;
            return;
        }

        self.input.clear();
        self.cursor_pos = 0;
        self.show_entry(self.timeline.len() - 1, AppMode::Home);
    }

    fn fail_analysis(&mut self) {
        self.notice = Some(ANALYSIS_FAILED.to_string());
        self.mode = AppMode::Home;
    }

    fn finish_comparison(&mut self, narrative: String) {
        self.narrative = Some(narrative);
        self.mode = AppMode::Compare;
    }

    pub fn show_entry(&mut self, index: usize, origin: AppMode) {
        if index >= self.timeline.len() {
            return;
        }
        self.viewing = Some(index);
        self.result_origin = origin;
        self.category_selected = 0;
        self.mode = AppMode::Result;
    }

    pub fn viewed_entry(&self) -> Option<&TimelineEntry> {
        self.viewing.and_then(|i| self.timeline.get(i))
    }

    /// Whether the viewed entry has detail categories to browse.
    pub fn has_details(&self) -> bool {
        self.viewed_entry()
            .and_then(TimelineEntry::analysis)
            .is_some_and(|a| matches!(a.verdict(), Verdict::Condition(_)))
    }

    pub fn selected_category(&self) -> DetailCategory {
        DetailCategory::ALL[self.category_selected.min(DetailCategory::ALL.len() - 1)]
    }

    pub fn category_up(&mut self) {
        self.category_selected = self.category_selected.saturating_sub(1);
    }

    pub fn category_down(&mut self) {
        if self.category_selected + 1 < DetailCategory::ALL.len() {
            self.category_selected += 1;
        }
    }

    pub fn open_detail(&mut self) {
        if self.has_details() {
            self.mode = AppMode::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.mode = AppMode::Result;
    }

    pub fn leave_result(&mut self) {
        self.mode = self.result_origin;
    }

    pub fn open_history(&mut self) {
        self.history_selected = self.timeline.len().saturating_sub(1);
        self.notice = None;
        self.mode = AppMode::History;
    }

    pub fn history_up(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn history_down(&mut self) {
        if self.history_selected + 1 < self.timeline.len() {
            self.history_selected += 1;
        }
    }

    pub fn history_select(&mut self) {
        self.show_entry(self.history_selected, AppMode::History);
    }

    pub fn input_char(&mut self, c: char) {
        self.input.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    pub fn input_backspace(&mut self) {
        if let Some((prev, _)) = self.input[..self.cursor_pos].char_indices().next_back() {
            self.input.remove(prev);
            self.cursor_pos = prev;
        }
    }

    pub fn input_delete(&mut self) {
        if self.cursor_pos < self.input.len() {
            self.input.remove(self.cursor_pos);
        }
    }

    pub fn input_left(&mut self) {
        if let Some((prev, _)) = self.input[..self.cursor_pos].char_indices().next_back() {
            self.cursor_pos = prev;
        }
    }

    pub fn input_right(&mut self) {
        if let Some(c) = self.input[self.cursor_pos..].chars().next() {
            self.cursor_pos += c.len_utf8();
        }
    }

    pub fn input_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn input_end(&mut self) {
        self.cursor_pos = self.input.len();
    }
}
