// ============================================
// src/app.rs
// 画面の状態と、キー入力 → クイズ操作の橋渡し
// ============================================

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use log::{info, warn};
use rand::rngs::StdRng;

use crate::catalog::{AssetSource, Catalog, SignTypes};
use crate::quiz::{
    COLUMNS, ChoiceCount, GuessOutcome, Phase, QUESTIONS_PER_QUIZ, QuizSession, QuizStats,
};
use crate::timer::Timer;

/// 不正解のときに画像を揺らす時間
pub const SHAKE_DURATION: Duration = Duration::from_millis(600);

/// 回答欄の下に出すメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    None,
    Correct(String),
    Incorrect,
}

/// 開いているダイアログ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    None,
    /// 「選択肢の数」 (選択中の行)
    Choices { selected: usize },
    /// 「標識の種類」 (選択中の行)
    SignTypes { selected: usize },
    /// 結果表示 + Reset Quiz
    Finished(QuizStats),
}

/// アプリ全体の状態を管理する
pub struct App {
    source: Box<dyn AssetSource>,
    rng: StdRng,

    pub sign_types: SignTypes,
    pub choices: ChoiceCount,
    pub catalog: Catalog,
    /// 最初の開始に失敗したときだけ None
    pub session: Option<QuizSession>,
    /// 最後にクイズを開始できた種類と選択肢の数 (失敗したらここに戻す)
    applied: Option<(SignTypes, ChoiceCount)>,

    /// 選択中のボタン (row * 3 + column)
    pub cursor: usize,
    /// 押せなくなったボタン
    pub disabled: Vec<bool>,
    pub feedback: Feedback,
    pub shake: Timer,
    /// 揺れのフレーム番号 (描画用)
    pub shake_frame: u8,
    /// 現在の標識画像のバイト数 (読めなければ None)
    pub image_len: Option<usize>,
    /// エラーなどの一行メッセージ
    pub status: Option<String>,
    pub dialog: Dialog,
    pub should_quit: bool,
}

impl App {
    /// App の初期化 (最初のクイズも始める)
    pub fn new(
        source: Box<dyn AssetSource>,
        sign_types: SignTypes,
        choices: ChoiceCount,
        rng: StdRng,
    ) -> Self {
        let mut app = Self {
            source,
            rng,
            sign_types,
            choices,
            catalog: Catalog::default(),
            session: None,
            applied: None,
            cursor: 0,
            disabled: Vec::new(),
            feedback: Feedback::None,
            shake: Timer::new(),
            shake_frame: 0,
            image_len: None,
            status: None,
            dialog: Dialog::None,
            should_quit: false,
        };
        app.reset_quiz();
        app
    }

    /// カタログを作り直して新しいクイズを始める。
    /// 標識が足りないときはメッセージを出し、今のセッションと設定は前のまま。
    pub fn reset_quiz(&mut self) {
        let catalog = Catalog::rebuild(self.source.as_ref(), &self.sign_types);

        match QuizSession::start(&catalog, self.choices, &mut self.rng) {
            Ok(session) => {
                // 古いセッションの「次の問題へ」の予約は取り消す
                if let Some(old) = self.session.as_mut() {
                    old.cancel_advance();
                }
                self.session = Some(session);
                self.catalog = catalog;
                self.applied = Some((self.sign_types.clone(), self.choices));
                self.dialog = Dialog::None;
                self.status = self.failed_types_message();
                self.load_question_view();
            }
            Err(e) => {
                warn!("cannot start quiz: {e}");
                if let Some((sign_types, choices)) = &self.applied {
                    self.sign_types = sign_types.clone();
                    self.choices = *choices;
                }
                self.status = Some(format!("Cannot start quiz: {e}"));
                self.close_dialog();
            }
        }
    }

    /// ダイアログを閉じる (クイズが終わっていれば結果表示に戻る)
    fn close_dialog(&mut self) {
        self.dialog = match self.finished_stats() {
            Some(stats) => Dialog::Finished(stats),
            None => Dialog::None,
        };
    }

    fn failed_types_message(&self) -> Option<String> {
        let failed = self.catalog.failed_types();
        if failed.is_empty() {
            None
        } else {
            Some(format!("Could not load: {}", failed.join(", ")))
        }
    }

    /// 新しい問題に合わせて表示状態をリセット
    fn load_question_view(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.disabled = vec![false; session.board().slots().len()];
        self.cursor = 0;
        self.feedback = Feedback::None;
        self.shake.cancel();
        self.image_len =
            Catalog::load_image(self.source.as_ref(), session.current()).map(|b| b.len());
    }

    /// イベントループから定期的に呼ばれる
    pub fn on_tick(&mut self, now: Instant) {
        if self.shake.is_pending() {
            self.shake_frame = self.shake_frame.wrapping_add(1);
        }
        if self.shake.fire_if_due(now) {
            self.shake_frame = 0;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.poll(now, &mut self.rng) {
            Ok(true) => self.load_question_view(),
            Ok(false) => {}
            Err(e) => {
                warn!("cannot load next question: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    /// ボタンを押した
    pub fn choose(&mut self, slot: usize, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if self.disabled.get(slot).copied().unwrap_or(true) {
            return;
        }
        let guess = session.board().slots()[slot].clone();

        match session.submit_guess(&guess, now) {
            GuessOutcome::Correct => {
                self.disabled.fill(true);
                self.feedback = Feedback::Correct(guess);
            }
            GuessOutcome::Finished(stats) => {
                self.disabled.fill(true);
                self.feedback = Feedback::Correct(guess);
                self.dialog = Dialog::Finished(stats);
            }
            GuessOutcome::Incorrect => {
                self.disabled[slot] = true;
                self.feedback = Feedback::Incorrect;
                self.shake.schedule(now, SHAKE_DURATION);
                self.shake_frame = 0;
            }
            GuessOutcome::Ignored => {}
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_pending()
    }

    /// キー入力の処理
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) {
        match self.dialog {
            Dialog::None => self.handle_quiz_key(code, now),
            Dialog::Choices { selected } => match code {
                KeyCode::Up => {
                    self.dialog = Dialog::Choices { selected: selected.saturating_sub(1) };
                }
                KeyCode::Down => {
                    let selected = (selected + 1).min(ChoiceCount::ALL.len() - 1);
                    self.dialog = Dialog::Choices { selected };
                }
                KeyCode::Enter => {
                    self.choices = ChoiceCount::ALL[selected];
                    info!("number of choices set to {}", self.choices);
                    self.reset_quiz();
                }
                KeyCode::Esc => self.close_dialog(),
                _ => {}
            },
            Dialog::SignTypes { selected } => match code {
                KeyCode::Up => {
                    self.dialog = Dialog::SignTypes { selected: selected.saturating_sub(1) };
                }
                KeyCode::Down => {
                    let last = self.sign_types.len().saturating_sub(1);
                    self.dialog = Dialog::SignTypes { selected: (selected + 1).min(last) };
                }
                KeyCode::Char(' ') => self.sign_types.toggle(selected),
                KeyCode::Enter => self.reset_quiz(),
                KeyCode::Esc => self.close_dialog(),
                _ => {}
            },
            Dialog::Finished(_) => match code {
                KeyCode::Enter | KeyCode::Char('r') => self.reset_quiz(),
                KeyCode::Char('c') => self.open_choices_dialog(),
                KeyCode::Char('t') => self.dialog = Dialog::SignTypes { selected: 0 },
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn open_choices_dialog(&mut self) {
        let selected = ChoiceCount::ALL
            .iter()
            .position(|c| *c == self.choices)
            .unwrap_or(0);
        self.dialog = Dialog::Choices { selected };
    }

    fn handle_quiz_key(&mut self, code: KeyCode, now: Instant) {
        let slots = self.disabled.len();
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') => self.open_choices_dialog(),
            KeyCode::Char('t') => self.dialog = Dialog::SignTypes { selected: 0 },
            KeyCode::Char(c @ '1'..='9') => {
                let slot = c as usize - '1' as usize;
                if slot < slots {
                    self.cursor = slot;
                    self.choose(slot, now);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.choose(self.cursor, now),
            KeyCode::Left if self.cursor % COLUMNS > 0 => self.cursor -= 1,
            KeyCode::Right if self.cursor % COLUMNS < COLUMNS - 1 && self.cursor + 1 < slots => {
                self.cursor += 1
            }
            KeyCode::Up if self.cursor >= COLUMNS => self.cursor -= COLUMNS,
            KeyCode::Down if self.cursor + COLUMNS < slots => self.cursor += COLUMNS,
            _ => {}
        }
    }

    /// 「Question N of 10」
    pub fn question_label(&self) -> String {
        match &self.session {
            Some(session) => format!(
                "Question {} of {}",
                session.question_number(),
                QUESTIONS_PER_QUIZ
            ),
            None => String::new(),
        }
    }

    fn finished_stats(&self) -> Option<QuizStats> {
        match self.session.as_ref().map(QuizSession::phase) {
            Some(Phase::Finished(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_stats().is_some()
    }
}
