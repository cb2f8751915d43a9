//! Risk profiler: questionnaire state machine and answer scoring.

use serde::{Deserialize, Serialize};

use super::error::SaathiError;

/// Number of questions in the questionnaire.
pub const QUESTION_COUNT: usize = 4;

/// Answer values are option ranks 1 (cautious) through 3 (risk-seeking).
pub const MIN_ANSWER: u8 = 1;
pub const MAX_ANSWER: u8 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 3],
}

/// The fixed question bank, one option per answer rank.
pub static QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        prompt: "What is your primary goal for this investment?",
        options: [
            "Capital Preservation: I want to protect my initial investment.",
            "Steady Growth: I'm looking for balanced growth with moderate risk.",
            "High Returns: I'm aiming for maximum returns, and I'm comfortable with high risk.",
        ],
    },
    Question {
        prompt: "How would you react to a sudden 20% drop in your portfolio's value?",
        options: [
            "Sell everything to prevent further loss.",
            "Wait and see, but feel very anxious.",
            "See it as a buying opportunity and invest more.",
        ],
    },
    Question {
        prompt: "How long is your investment horizon?",
        options: [
            "Short-term (Less than 3 years)",
            "Medium-term (3-7 years)",
            "Long-term (More than 7 years)",
        ],
    },
    Question {
        prompt: "Which of these investment options are you most comfortable with?",
        options: [
            "Fixed Deposits and Government Bonds",
            "A mix of Large-Cap Stocks and Mutual Funds",
            "Small-Cap Stocks, Derivatives, and Algo-Trading",
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskCategory {
    /// Fixed numeric score for the category.
    pub fn score(self) -> i32 {
        match self {
            RiskCategory::Conservative => 35,
            RiskCategory::Moderate => 68,
            RiskCategory::Aggressive => 85,
        }
    }

    /// Bucket a stored numeric score back into its category.
    pub fn from_score(score: i32) -> Self {
        if score < 50 {
            RiskCategory::Conservative
        } else if score <= 75 {
            RiskCategory::Moderate
        } else {
            RiskCategory::Aggressive
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RiskCategory::Conservative => "Conservative Investor",
            RiskCategory::Moderate => "Moderate Investor",
            RiskCategory::Aggressive => "Aggressive Investor",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskCategory::Conservative => {
                "You prioritize capital protection over high returns. You are best suited \
                 for low-risk investments like bonds, fixed deposits, and large-cap mutual funds."
            }
            RiskCategory::Moderate => {
                "You seek a balance between risk and return. A diversified portfolio of \
                 equities, mutual funds, and some debt instruments would be a good fit for you."
            }
            RiskCategory::Aggressive => {
                "You are comfortable with high risk for the potential of high returns. You \
                 might explore small-cap stocks, derivatives, and advanced trading strategies."
            }
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskCategory::Conservative => "Conservative",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::Aggressive => "Aggressive",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskProfile {
    pub category: RiskCategory,
    pub score: i32,
}

/// Score a complete answer sheet. Pure: callers feed the resulting score
/// into the ledger themselves.
pub fn score_answers(answers: &[u8]) -> Result<RiskProfile, SaathiError> {
    if answers.len() != QUESTION_COUNT {
        return Err(SaathiError::IncompleteQuestionnaire {
            reason: format!("expected {} answers, got {}", QUESTION_COUNT, answers.len()),
        });
    }
    if let Some(bad) = answers
        .iter()
        .find(|a| !(MIN_ANSWER..=MAX_ANSWER).contains(*a))
    {
        return Err(SaathiError::IncompleteQuestionnaire {
            reason: format!("answer {bad} is outside 1-3"),
        });
    }

    let total: u32 = answers.iter().map(|&a| a as u32).sum();
    let average = total as f64 / answers.len() as f64;
    let category = if average <= 1.5 {
        RiskCategory::Conservative
    } else if average <= 2.5 {
        RiskCategory::Moderate
    } else {
        RiskCategory::Aggressive
    };

    Ok(RiskProfile {
        category,
        score: category.score(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionnaireState {
    /// Waiting on the answer to question `i` (zero-based).
    Answering(usize),
    /// All questions answered; terminal until an explicit restart.
    Complete,
}

/// Step-by-step questionnaire gating the profiler call. Answers accumulate
/// one at a time; `Complete` is terminal until `restart` discards them.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    answers: Vec<u8>,
}

impl Questionnaire {
    pub fn new() -> Self {
        Questionnaire {
            answers: Vec::with_capacity(QUESTION_COUNT),
        }
    }

    pub fn state(&self) -> QuestionnaireState {
        if self.answers.len() >= QUESTION_COUNT {
            QuestionnaireState::Complete
        } else {
            QuestionnaireState::Answering(self.answers.len())
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == QuestionnaireState::Complete
    }

    /// The question awaiting an answer, or `None` once complete.
    pub fn current_question(&self) -> Option<&'static Question> {
        match self.state() {
            QuestionnaireState::Answering(i) => Some(&QUESTIONS[i]),
            QuestionnaireState::Complete => None,
        }
    }

    /// Record one answer and advance. Rejects out-of-range values and
    /// submissions after completion, both without state change.
    pub fn answer(&mut self, value: u8) -> Result<QuestionnaireState, SaathiError> {
        if self.is_complete() {
            return Err(SaathiError::QuestionnaireComplete);
        }
        if !(MIN_ANSWER..=MAX_ANSWER).contains(&value) {
            return Err(SaathiError::IncompleteQuestionnaire {
                reason: format!("answer {value} is outside 1-3"),
            });
        }
        self.answers.push(value);
        Ok(self.state())
    }

    /// Profile for the completed sheet; errors until all answers are in.
    pub fn profile(&self) -> Result<RiskProfile, SaathiError> {
        score_answers(&self.answers)
    }

    /// Back to the first question, discarding prior answers.
    pub fn restart(&mut self) {
        self.answers.clear();
    }
}

impl Default for Questionnaire {
    fn default() -> Self {
        Questionnaire::new()
    }
}
