use crate::client::HealthStatus;
use crate::config::Config;
use crate::db::SessionStore;
use crate::documents::find_documents;
use crate::error::{QuizError, Result};
use crate::export::{write_csv, write_pdf};
use crate::models::{
    AppEvent, GenerationConfig, GenerationTicket, Phase, Question, SavedSession, SessionState,
    UploadedFile,
};
use crate::scoring::{build_review, compute_results, count_correct, QuizResults, ReviewItem};
use crate::timer::SessionTimer;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

pub const EMPTY_QUIZ_MESSAGE: &str = "Failed to generate a valid quiz from the document.";
pub const ANALYZING_MESSAGE: &str = "Analyzing PDF structure...";
/// Upper bound of lines the results screen draws per reviewed question.
pub const REVIEW_LINES_PER_ITEM: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Started,
    Failed,
    /// Superseded or abandoned request; nothing changed.
    Stale,
}

/// Owns the session and every transition between wizard phases. Drawing code
/// only reads it.
pub struct QuizController {
    state: SessionState,
    store: SessionStore,
    timer: SessionTimer,
    events: UnboundedSender<AppEvent>,
    config: GenerationConfig,
    file: Option<UploadedFile>,
    documents_dir: PathBuf,
    export_dir: PathBuf,
    documents: Vec<PathBuf>,
    selected_document: usize,
    health: Option<HealthStatus>,
    next_request_id: u64,
    pending_request: Option<u64>,
    results: Option<QuizResults>,
    option_cursor: usize,
    confirm_restart: bool,
    review_scroll: u16,
    error_message: Option<String>,
    status_message: Option<String>,
    progress_message: Option<String>,
}

impl QuizController {
    pub fn new(store: SessionStore, events: UnboundedSender<AppEvent>, config: &Config) -> Self {
        let mut controller = Self {
            state: SessionState::default(),
            store,
            timer: SessionTimer::new(),
            events,
            config: GenerationConfig::default(),
            file: None,
            documents_dir: config.documents_dir.clone(),
            export_dir: config.export_dir.clone(),
            documents: Vec::new(),
            selected_document: 0,
            health: None,
            next_request_id: 1,
            pending_request: None,
            results: None,
            option_cursor: 0,
            confirm_restart: false,
            review_scroll: 0,
            error_message: None,
            status_message: None,
            progress_message: None,
        };
        controller.rescan_documents();
        controller
    }

    // --- read access for drawing ---

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    pub fn selected_document(&self) -> usize {
        self.selected_document
    }

    pub fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.pending_request.is_some()
    }

    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    pub fn review(&self) -> Vec<ReviewItem> {
        build_review(&self.state.questions, &self.state.answers)
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn confirm_restart(&self) -> bool {
        self.confirm_restart
    }

    pub fn review_scroll(&self) -> u16 {
        self.review_scroll
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn progress_message(&self) -> Option<&str> {
        self.progress_message.as_deref()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    fn require(&self, expected: Phase) -> Result<()> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidPhase {
                expected,
                actual: self.state.phase,
            })
        }
    }

    // --- startup ---

    /// Shows the last completed session if the store has a usable one.
    pub fn restore(&mut self) -> bool {
        let Some(saved) = self.store.load() else {
            log::info!("No saved session, starting at upload");
            return false;
        };

        let recomputed = count_correct(&saved.questions, &saved.answers);
        if recomputed != saved.score {
            log::warn!(
                "Saved score {} does not match answers ({}), using answers",
                saved.score,
                recomputed
            );
        }

        let mut state = SessionState::with_questions(saved.questions, Phase::Results);
        state.answers = saved.answers;
        state.running_score = recomputed;
        self.results = Some(compute_results(&state.questions, &state.answers));
        self.state = state;
        log::info!("Restored session with {} questions", self.state.question_count());
        true
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.tick(),
            AppEvent::Generated { request_id, result } => {
                self.complete_generation(request_id, result);
            }
            AppEvent::Health(status) => self.health = Some(status),
        }
    }

    // --- upload ---

    pub fn rescan_documents(&mut self) {
        self.documents = find_documents(&self.documents_dir);
        self.selected_document = self
            .selected_document
            .min(self.documents.len().saturating_sub(1));
        log::debug!(
            "Found {} documents in {}",
            self.documents.len(),
            self.documents_dir.display()
        );
    }

    pub fn select_next_document(&mut self) {
        if self.selected_document + 1 < self.documents.len() {
            self.selected_document += 1;
        }
    }

    pub fn select_prev_document(&mut self) {
        self.selected_document = self.selected_document.saturating_sub(1);
    }

    pub fn submit_selected_document(&mut self) -> Result<()> {
        let file = self
            .documents
            .get(self.selected_document)
            .and_then(|p| UploadedFile::from_path(p));
        self.submit_upload(file)
    }

    pub fn submit_upload(&mut self, file: Option<UploadedFile>) -> Result<()> {
        self.require(Phase::Upload)?;
        let Some(file) = file else {
            self.error_message = Some(QuizError::NoFileSelected.to_string());
            return Err(QuizError::NoFileSelected);
        };

        log::info!("Selected document {}", file.path.display());
        self.file = Some(file);
        self.error_message = None;
        self.state.phase = Phase::Configure;
        Ok(())
    }

    // --- configure ---

    pub fn back_to_upload(&mut self) -> Result<()> {
        self.require(Phase::Configure)?;
        if self.is_generating() {
            return Err(QuizError::GenerationInFlight);
        }
        self.file = None;
        self.error_message = None;
        self.state.phase = Phase::Upload;
        Ok(())
    }

    /// Leaves a running generation behind; its response will be ignored.
    pub fn abandon_generation(&mut self) -> Result<()> {
        self.require(Phase::Configure)?;
        if let Some(id) = self.pending_request.take() {
            log::info!("Abandoned generation request {}", id);
        }
        self.progress_message = None;
        self.back_to_upload()
    }

    fn require_editable_config(&self) -> Result<()> {
        self.require(Phase::Configure)?;
        if self.is_generating() {
            return Err(QuizError::GenerationInFlight);
        }
        Ok(())
    }

    pub fn more_questions(&mut self) -> Result<()> {
        self.require_editable_config()?;
        self.config.more_questions();
        Ok(())
    }

    pub fn fewer_questions(&mut self) -> Result<()> {
        self.require_editable_config()?;
        self.config.fewer_questions();
        Ok(())
    }

    pub fn next_difficulty(&mut self) -> Result<()> {
        self.require_editable_config()?;
        self.config.difficulty = self.config.difficulty.next();
        Ok(())
    }

    pub fn prev_difficulty(&mut self) -> Result<()> {
        self.require_editable_config()?;
        self.config.difficulty = self.config.difficulty.prev();
        Ok(())
    }

    pub fn begin_generation(&mut self) -> Result<GenerationTicket> {
        self.require(Phase::Configure)?;
        if self.is_generating() {
            return Err(QuizError::GenerationInFlight);
        }
        let Some(file) = self.file.clone() else {
            self.error_message = Some(QuizError::NoFileSelected.to_string());
            return Err(QuizError::NoFileSelected);
        };

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_request = Some(request_id);
        self.error_message = None;
        self.progress_message = Some(ANALYZING_MESSAGE.to_string());

        Ok(GenerationTicket {
            request_id,
            file,
            config: self.config.clone(),
        })
    }

    pub fn complete_generation(
        &mut self,
        request_id: u64,
        result: Result<Vec<Question>>,
    ) -> GenerationOutcome {
        if self.pending_request != Some(request_id) || self.state.phase != Phase::Configure {
            log::info!("Ignoring stale response for request {}", request_id);
            return GenerationOutcome::Stale;
        }
        self.pending_request = None;
        self.progress_message = None;

        match result {
            Ok(questions) if questions.is_empty() => {
                log::warn!("Request {} produced no questions", request_id);
                self.error_message = Some(EMPTY_QUIZ_MESSAGE.to_string());
                GenerationOutcome::Failed
            }
            Ok(questions) => {
                self.start_quiz(questions);
                GenerationOutcome::Started
            }
            Err(e) => {
                self.error_message = Some(format!("Error: {}", e));
                GenerationOutcome::Failed
            }
        }
    }

    fn start_quiz(&mut self, questions: Vec<Question>) {
        log::info!("Starting quiz with {} questions", questions.len());
        self.state = SessionState::with_questions(questions, Phase::InProgress);
        self.results = None;
        self.option_cursor = 0;
        self.confirm_restart = false;
        self.error_message = None;
        self.status_message = None;
        self.timer.start(self.events.clone());
    }

    // --- quiz ---

    pub fn tick(&mut self) {
        if self.state.phase == Phase::InProgress {
            self.state.elapsed_seconds += 1;
        }
    }

    /// Records the answer for the current question. Answers are final: a
    /// second selection on the same question is rejected.
    pub fn select_option(&mut self, index: usize, option: &str) -> Result<bool> {
        self.require(Phase::InProgress)?;
        if index != self.state.current_index {
            return Err(QuizError::NotCurrentQuestion { number: index + 1 });
        }
        if self.state.is_answered(index) {
            return Err(QuizError::AlreadyAnswered { number: index + 1 });
        }
        let Some(question) = self.state.questions.get(index) else {
            return Err(QuizError::NotCurrentQuestion { number: index + 1 });
        };
        if !question.has_option(option) {
            return Err(QuizError::UnknownOption(option.to_string()));
        }

        let correct = question.is_correct(option);
        self.state.answers[index] = Some(option.to_string());
        if correct {
            self.state.running_score += 1;
        }
        log::debug!(
            "Question {} answered {}",
            index + 1,
            if correct { "correctly" } else { "incorrectly" }
        );
        Ok(correct)
    }

    /// Selects the `number`th option (1-based) of the current question.
    pub fn select_option_number(&mut self, number: usize) -> Result<bool> {
        let index = self.state.current_index;
        let option = self
            .state
            .current_question()
            .and_then(|q| q.options.get(number.wrapping_sub(1)))
            .cloned()
            .ok_or_else(|| QuizError::UnknownOption(number.to_string()))?;
        self.select_option(index, &option)
    }

    pub fn select_highlighted(&mut self) -> Result<bool> {
        self.select_option_number(self.option_cursor + 1)
    }

    pub fn move_option_cursor(&mut self, down: bool) {
        let count = self
            .state
            .current_question()
            .map(|q| q.options.len())
            .unwrap_or(0);
        if down {
            if self.option_cursor + 1 < count {
                self.option_cursor += 1;
            }
        } else {
            self.option_cursor = self.option_cursor.saturating_sub(1);
        }
    }

    pub fn advance(&mut self) -> Result<()> {
        self.require(Phase::InProgress)?;
        if self.state.current_index + 1 < self.state.question_count() {
            self.state.current_index += 1;
            self.option_cursor = 0;
            Ok(())
        } else {
            self.finish()
        }
    }

    pub fn retreat(&mut self) -> Result<()> {
        self.require(Phase::InProgress)?;
        if self.state.current_index > 0 {
            self.state.current_index -= 1;
            self.option_cursor = 0;
        }
        Ok(())
    }

    /// The one way a quiz ends, whether from the last question or early.
    pub fn finish(&mut self) -> Result<()> {
        self.require(Phase::InProgress)?;
        self.timer.stop();

        let results = compute_results(&self.state.questions, &self.state.answers);
        self.state.running_score = results.correct;
        self.results = Some(results);
        self.state.phase = Phase::Results;
        self.confirm_restart = false;
        self.review_scroll = 0;

        let saved = SavedSession {
            questions: self.state.questions.clone(),
            answers: self.state.answers.clone(),
            score: results.correct,
        };
        if let Err(e) = self.store.save(&saved) {
            log::error!("Failed to save session: {}", e);
            self.status_message = Some(format!("Results not saved: {}", e));
        }

        log::info!(
            "Quiz finished: {}/{} ({:.2}%) in {}s",
            results.correct,
            results.total,
            results.percentage,
            self.state.elapsed_seconds
        );
        Ok(())
    }

    pub fn request_restart(&mut self) {
        self.confirm_restart = true;
    }

    pub fn cancel_restart(&mut self) {
        self.confirm_restart = false;
    }

    /// Drops everything, saved session included, and returns to upload.
    pub fn restart(&mut self) {
        self.timer.stop();
        if let Err(e) = self.store.clear() {
            log::error!("Failed to clear saved session: {}", e);
        }
        if let Some(id) = self.pending_request.take() {
            log::info!("Abandoned generation request {} on restart", id);
        }

        self.state = SessionState::default();
        self.file = None;
        self.results = None;
        self.option_cursor = 0;
        self.confirm_restart = false;
        self.review_scroll = 0;
        self.error_message = None;
        self.status_message = None;
        self.progress_message = None;
        self.rescan_documents();
        log::info!("Session restarted");
    }

    // --- results and flashcards ---

    /// Scrolls the review list, stopping at its last line.
    pub fn scroll_review(&mut self, down: bool) {
        let lines = self.state.question_count() * REVIEW_LINES_PER_ITEM;
        let max = lines.min(u16::MAX as usize) as u16;
        self.review_scroll = if down {
            self.review_scroll.saturating_add(1).min(max)
        } else {
            self.review_scroll.saturating_sub(1)
        };
    }

    pub fn show_flashcards(&mut self) -> Result<()> {
        self.require(Phase::Results)?;
        self.state.phase = Phase::Flashcards;
        self.state.card_index = 0;
        self.state.card_flipped = false;
        Ok(())
    }

    pub fn show_results(&mut self) -> Result<()> {
        self.require(Phase::Flashcards)?;
        self.state.phase = Phase::Results;
        Ok(())
    }

    pub fn next_card(&mut self) -> Result<()> {
        self.require(Phase::Flashcards)?;
        let count = self.state.question_count();
        if count > 0 {
            self.state.card_index = (self.state.card_index + 1) % count;
            self.state.card_flipped = false;
        }
        Ok(())
    }

    pub fn prev_card(&mut self) -> Result<()> {
        self.require(Phase::Flashcards)?;
        let count = self.state.question_count();
        if count > 0 {
            self.state.card_index = (self.state.card_index + count - 1) % count;
            self.state.card_flipped = false;
        }
        Ok(())
    }

    pub fn flip_card(&mut self) -> Result<()> {
        self.require(Phase::Flashcards)?;
        self.state.card_flipped = !self.state.card_flipped;
        Ok(())
    }

    fn require_export(&self) -> Result<()> {
        match self.state.phase {
            Phase::Results | Phase::Flashcards => Ok(()),
            actual => Err(QuizError::InvalidPhase {
                expected: Phase::Flashcards,
                actual,
            }),
        }
    }

    fn report_export(&mut self, result: Result<PathBuf>) -> Result<PathBuf> {
        match &result {
            Ok(path) => {
                self.error_message = None;
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.error_message = Some(e.to_string());
            }
        }
        result
    }

    pub fn export_csv(&mut self) -> Result<PathBuf> {
        self.require_export()?;
        let result = write_csv(&self.export_dir, &self.state.questions);
        self.report_export(result)
    }

    pub fn export_pdf(&mut self) -> Result<PathBuf> {
        self.require_export()?;
        let result = write_pdf(&self.export_dir, &self.state.questions);
        self.report_export(result)
    }
}

#[derive(Debug)]
pub enum KeyAction {
    None,
    Generate(GenerationTicket),
    Quit,
}

/// Maps a key press to a controller call for the current phase. A rejected
/// action leaves the phase untouched and its message in the status line.
pub fn handle_key(controller: &mut QuizController, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    let result = match controller.phase() {
        Phase::Upload => handle_upload_key(controller, key),
        Phase::Configure => handle_configure_key(controller, key),
        Phase::InProgress => handle_quiz_key(controller, key),
        Phase::Results => handle_results_key(controller, key),
        Phase::Flashcards => handle_flashcard_key(controller, key),
    };

    match result {
        Ok(action) => action,
        Err(e) => {
            log::debug!("Key {:?} rejected: {}", key.code, e);
            // The progress line already says a request is running.
            if !matches!(e, QuizError::GenerationInFlight) {
                controller.error_message = Some(e.to_string());
            }
            KeyAction::None
        }
    }
}

fn handle_upload_key(controller: &mut QuizController, key: KeyEvent) -> Result<KeyAction> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Ok(KeyAction::Quit),
        KeyCode::Up => controller.select_prev_document(),
        KeyCode::Down => controller.select_next_document(),
        KeyCode::Char('r') => controller.rescan_documents(),
        KeyCode::Enter => controller.submit_selected_document()?,
        _ => {}
    }
    Ok(KeyAction::None)
}

fn handle_configure_key(controller: &mut QuizController, key: KeyEvent) -> Result<KeyAction> {
    match key.code {
        KeyCode::Enter => return Ok(KeyAction::Generate(controller.begin_generation()?)),
        KeyCode::Esc if controller.is_generating() => controller.abandon_generation()?,
        KeyCode::Esc => controller.back_to_upload()?,
        KeyCode::Right => controller.more_questions()?,
        KeyCode::Left => controller.fewer_questions()?,
        KeyCode::Down => controller.next_difficulty()?,
        KeyCode::Up => controller.prev_difficulty()?,
        _ => {}
    }
    Ok(KeyAction::None)
}

fn handle_quiz_key(controller: &mut QuizController, key: KeyEvent) -> Result<KeyAction> {
    if controller.confirm_restart() {
        match key.code {
            KeyCode::Char('y') => controller.restart(),
            KeyCode::Char('n') | KeyCode::Esc => controller.cancel_restart(),
            _ => {}
        }
        return Ok(KeyAction::None);
    }

    controller.error_message = None;
    match key.code {
        KeyCode::Esc => controller.request_restart(),
        KeyCode::Up => controller.move_option_cursor(false),
        KeyCode::Down => controller.move_option_cursor(true),
        KeyCode::Enter => {
            let index = controller.state().current_index;
            if controller.state().is_answered(index) {
                controller.advance()?;
            } else {
                controller.select_highlighted()?;
            }
        }
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            let number = c as usize - '0' as usize;
            controller.select_option_number(number)?;
        }
        KeyCode::Right | KeyCode::Char('n') => controller.advance()?,
        KeyCode::Left | KeyCode::Char('p') => controller.retreat()?,
        KeyCode::Char('f') => controller.finish()?,
        _ => {}
    }
    Ok(KeyAction::None)
}

fn handle_results_key(controller: &mut QuizController, key: KeyEvent) -> Result<KeyAction> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Ok(KeyAction::Quit),
        KeyCode::Char('v') => controller.show_flashcards()?,
        KeyCode::Char('c') => {
            controller.export_csv()?;
        }
        KeyCode::Char('d') => {
            controller.export_pdf()?;
        }
        KeyCode::Char('r') => controller.restart(),
        KeyCode::Up => controller.scroll_review(false),
        KeyCode::Down => controller.scroll_review(true),
        _ => {}
    }
    Ok(KeyAction::None)
}

fn handle_flashcard_key(controller: &mut QuizController, key: KeyEvent) -> Result<KeyAction> {
    match key.code {
        KeyCode::Right | KeyCode::Char('n') => controller.next_card()?,
        KeyCode::Left | KeyCode::Char('p') => controller.prev_card()?,
        KeyCode::Char(' ') | KeyCode::Enter => controller.flip_card()?,
        KeyCode::Char('c') => {
            controller.export_csv()?;
        }
        KeyCode::Char('d') => {
            controller.export_pdf()?;
        }
        KeyCode::Char('b') | KeyCode::Esc => controller.show_results()?,
        _ => {}
    }
    Ok(KeyAction::None)
}
