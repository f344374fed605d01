// ============================================
// src/quiz.rs
// 1回分 (10問) のクイズの状態遷移
// ============================================

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SignAsset};
use crate::error::{QuizError, Result};
use crate::timer::Timer;

/// 1回のクイズの問題数
pub const QUESTIONS_PER_QUIZ: usize = 10;
/// 選択肢グリッドの列数
pub const COLUMNS: usize = 3;
/// 正解してから次の問題を出すまでの待ち時間
pub const ADVANCE_DELAY: Duration = Duration::from_secs(1);

// --------------------------------------------------
// 選択肢の数
// --------------------------------------------------

/// 選択肢の数 (3 / 6 / 9 = 1〜3行 × 3列)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChoiceCount {
    #[default]
    Three,
    Six,
    Nine,
}

impl ChoiceCount {
    pub const ALL: [ChoiceCount; 3] = [ChoiceCount::Three, ChoiceCount::Six, ChoiceCount::Nine];

    pub fn rows(self) -> usize {
        match self {
            ChoiceCount::Three => 1,
            ChoiceCount::Six => 2,
            ChoiceCount::Nine => 3,
        }
    }

    pub fn slots(self) -> usize {
        self.rows() * COLUMNS
    }
}

impl TryFrom<u8> for ChoiceCount {
    type Error = QuizError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            3 => Ok(ChoiceCount::Three),
            6 => Ok(ChoiceCount::Six),
            9 => Ok(ChoiceCount::Nine),
            other => Err(QuizError::InvalidChoiceCount(other.to_string())),
        }
    }
}

impl From<ChoiceCount> for u8 {
    fn from(count: ChoiceCount) -> Self {
        count.slots() as u8
    }
}

impl FromStr for ChoiceCount {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(|value| ChoiceCount::try_from(value).ok())
            .ok_or_else(|| QuizError::InvalidChoiceCount(s.to_string()))
    }
}

impl fmt::Display for ChoiceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slots())
    }
}

// --------------------------------------------------
// 選択肢グリッド
// --------------------------------------------------

/// 1問分の選択肢 (行優先で並ぶ)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceBoard {
    rows: usize,
    slots: Vec<String>,
    correct: usize,
}

impl ChoiceBoard {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn row(&self, row: usize) -> &[String] {
        &self.slots[row * COLUMNS..(row + 1) * COLUMNS]
    }

    /// 正解が入っているスロット番号 (row * 3 + column)
    pub fn correct_slot(&self) -> usize {
        self.correct
    }

    #[cfg(test)]
    pub fn correct_name(&self) -> &str {
        &self.slots[self.correct]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s == name)
    }
}

/// 正解1つ + 不正解 n-1 個の選択肢を作る。
///
/// カタログをシャッフルし、正解と同じ表示名を除いた先頭 n-1 個を取り、
/// 正解をランダムな行・列に差し込む。
pub fn build_choice_board<R: Rng>(
    pool: &[SignAsset],
    answer: &SignAsset,
    choices: ChoiceCount,
    rng: &mut R,
) -> Result<ChoiceBoard> {
    let n = choices.slots();
    let answer_name = answer.display_name();

    let mut shuffled: Vec<&SignAsset> = pool.iter().collect();
    shuffled.shuffle(rng);

    // 表示名が被ると見分けがつかないので重複は除外
    let mut seen = HashSet::new();
    seen.insert(answer_name.clone());
    let mut slots: Vec<String> = shuffled
        .into_iter()
        .map(SignAsset::display_name)
        .filter(|name| seen.insert(name.clone()))
        .take(n - 1)
        .collect();

    if slots.len() < n - 1 {
        return Err(QuizError::InsufficientCandidates {
            required: n,
            available: slots.len() + 1,
        });
    }

    let row = rng.random_range(0..choices.rows());
    let column = rng.random_range(0..COLUMNS);
    let correct = row * COLUMNS + column;
    slots.insert(correct, answer_name);

    Ok(ChoiceBoard {
        rows: choices.rows(),
        slots,
        correct,
    })
}

// --------------------------------------------------
// セッション
// --------------------------------------------------

/// クイズ終了時の成績
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizStats {
    pub total_guesses: u32,
    pub correct_answers: u32,
}

impl QuizStats {
    /// 正答率 (%)。分子は正解数に関係なく 1000 固定
    /// (10問正解で必ず終わるので 100 * 10 と同じになる)
    pub fn accuracy(&self) -> f64 {
        1000.0 / self.total_guesses as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 回答待ち (不正解は何回でも受け付ける)
    AwaitingAnswer,
    /// 正解して、次の問題を待っている
    Correct,
    Finished(QuizStats),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// 正解。ADVANCE_DELAY 後に次の問題へ
    Correct,
    /// 不正解。選んだボタンだけ無効にしてアニメーション
    Incorrect,
    /// 10問目に正解してクイズ終了
    Finished(QuizStats),
    /// 回答待ちではないので無視した
    Ignored,
}

/// 1回分のクイズ
#[derive(Debug, Clone)]
pub struct QuizSession {
    pool: Vec<SignAsset>,
    pending: VecDeque<SignAsset>,
    current: SignAsset,
    board: ChoiceBoard,
    choices: ChoiceCount,
    question_number: usize,
    correct_answers: u32,
    total_guesses: u32,
    phase: Phase,
    advance: Timer,
}

impl QuizSession {
    /// 新しいクイズを始める。
    /// 標識が足りなければエラーを返し、呼び出し側の古いセッションはそのまま残る。
    pub fn start<R: Rng>(catalog: &Catalog, choices: ChoiceCount, rng: &mut R) -> Result<Self> {
        let available = catalog.len();
        let required = QUESTIONS_PER_QUIZ.max(choices.slots());
        if available < required {
            return Err(QuizError::InsufficientCandidates { required, available });
        }

        // 重複しないまで引き直して10問選ぶ
        let assets = catalog.assets();
        let mut chosen: Vec<usize> = Vec::with_capacity(QUESTIONS_PER_QUIZ);
        while chosen.len() < QUESTIONS_PER_QUIZ {
            let index = rng.random_range(0..available);
            if !chosen.contains(&index) {
                chosen.push(index);
            }
        }
        let mut pending: VecDeque<SignAsset> =
            chosen.into_iter().map(|i| assets[i].clone()).collect();

        let pool = assets.to_vec();
        let first = pending.pop_front().ok_or(QuizError::NoPendingQuestions)?;
        let board = build_choice_board(&pool, &first, choices, rng)?;

        info!("new quiz: {} signs in pool, {} choices", pool.len(), choices);
        Ok(Self {
            pool,
            pending,
            current: first,
            board,
            choices,
            question_number: 1,
            correct_answers: 0,
            total_guesses: 0,
            phase: Phase::AwaitingAnswer,
            advance: Timer::new(),
        })
    }

    /// 次の問題を読み込む。選択肢が作れなければ状態は変えない
    pub fn next_question<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let next = self.pending.front().ok_or(QuizError::NoPendingQuestions)?;
        let board = build_choice_board(&self.pool, next, self.choices, rng)?;

        if let Some(next) = self.pending.pop_front() {
            self.current = next;
        }
        self.board = board;
        self.question_number += 1;
        self.phase = Phase::AwaitingAnswer;
        self.advance.cancel();
        debug!("question {}: {}", self.question_number, self.current.id);
        Ok(())
    }

    /// ボタンの文字列で回答する (大文字小文字も含めて完全一致)
    pub fn submit_guess(&mut self, guess: &str, now: Instant) -> GuessOutcome {
        if self.phase != Phase::AwaitingAnswer {
            return GuessOutcome::Ignored;
        }
        self.total_guesses += 1;

        if guess != self.current_answer() {
            if !self.board.contains(guess) {
                debug!("guess '{guess}' is not one of the choices");
            }
            return GuessOutcome::Incorrect;
        }

        self.correct_answers += 1;
        if self.correct_answers as usize == QUESTIONS_PER_QUIZ {
            let stats = self.stats();
            self.phase = Phase::Finished(stats);
            info!(
                "quiz finished: {} correct in {} guesses, {:.02}% correct",
                stats.correct_answers,
                stats.total_guesses,
                stats.accuracy()
            );
            return GuessOutcome::Finished(stats);
        }

        self.phase = Phase::Correct;
        self.advance.schedule(now, ADVANCE_DELAY);
        GuessOutcome::Correct
    }

    /// 予約された「次の問題へ」を期限が来ていれば実行する
    pub fn poll<R: Rng>(&mut self, now: Instant, rng: &mut R) -> Result<bool> {
        if !self.advance.fire_if_due(now) {
            return Ok(false);
        }
        self.next_question(rng)?;
        Ok(true)
    }

    pub fn cancel_advance(&mut self) {
        self.advance.cancel();
    }

    pub fn advance_pending(&self) -> bool {
        self.advance.is_pending()
    }

    pub fn stats(&self) -> QuizStats {
        QuizStats {
            total_guesses: self.total_guesses,
            correct_answers: self.correct_answers,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &ChoiceBoard {
        &self.board
    }

    pub fn current(&self) -> &SignAsset {
        &self.current
    }

    pub fn current_answer(&self) -> String {
        self.current.display_name()
    }

    pub fn question_number(&self) -> usize {
        self.question_number
    }

    pub fn choices(&self) -> ChoiceCount {
        self.choices
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn total_guesses(&self) -> u32 {
        self.total_guesses
    }

    /// まだ出題していない問題 (現在の問題は含まない)
    #[cfg(test)]
    pub fn pending(&self) -> impl Iterator<Item = &SignAsset> {
        self.pending.iter()
    }
}
