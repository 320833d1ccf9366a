// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for both pipeline phases
// reference: uses indicatif spinners and tracks indexing/evaluation counters

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub documents_indexed: u64,
    pub queries_evaluated: u64,
    pub result_lines: u64,
    pub queries_without_results: u64,
    pub duration_secs: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.documents_indexed as f64 / self.duration_secs
    }

    pub fn queries_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.queries_evaluated as f64 / self.duration_secs
    }

    pub fn mean_results_per_query(&self) -> f64 {
        if self.queries_evaluated == 0 {
            return 0.0;
        }
        self.result_lines as f64 / self.queries_evaluated as f64
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    documents_indexed: Arc<AtomicU64>,
    queries_evaluated: Arc<AtomicU64>,
    result_lines: Arc<AtomicU64>,
    queries_without_results: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(phase: &str, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_spinner(&multi_progress, colored);
        main_bar.set_prefix(phase.to_string());
        main_bar.enable_steady_tick(Duration::from_millis(120));
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(main_bar, detail_bar)
    }

    /// Tracker that counts without drawing anything.
    pub fn hidden() -> Self {
        Self::from_bars(ProgressBar::hidden(), ProgressBar::hidden())
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            documents_indexed: Arc::new(AtomicU64::new(0)),
            queries_evaluated: Arc::new(AtomicU64::new(0)),
            result_lines: Arc::new(AtomicU64::new(0)),
            queries_without_results: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_documents_indexed(&self) {
        self.documents_indexed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_query_result(&self, lines: u64) {
        self.queries_evaluated.fetch_add(1, Ordering::SeqCst);
        self.result_lines.fetch_add(lines, Ordering::SeqCst);
        if lines == 0 {
            self.queries_without_results.fetch_add(1, Ordering::SeqCst);
        }
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.detail_bar.set_message(message);
    }

    pub fn finish(&self) {
        if !self.main_bar.is_finished() {
            self.main_bar.finish_with_message("done");
        }
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            documents_indexed: self.documents_indexed.load(Ordering::SeqCst),
            queries_evaluated: self.queries_evaluated.load(Ordering::SeqCst),
            result_lines: self.result_lines.load(Ordering::SeqCst),
            queries_without_results: self.queries_without_results.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let documents = self.documents_indexed.load(Ordering::SeqCst);
        let queries = self.queries_evaluated.load(Ordering::SeqCst);
        let lines = self.result_lines.load(Ordering::SeqCst);

        let message = if queries == 0 {
            format!("Documents: {}", documents)
        } else {
            format!("Queries: {} | Result lines: {}", queries, lines)
        };

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_spinner(multi_progress: &MultiProgress, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new_spinner());
    let template = if colored {
        "{spinner:.green} {prefix:.cyan.bold} [{elapsed_precise}] {pos} ({per_sec}) {msg}"
    } else {
        "{spinner} {prefix} [{elapsed_precise}] {pos} ({per_sec}) {msg}"
    };
    let style = ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
