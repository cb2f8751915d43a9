//! Learning hub catalog: static module content that feeds the quiz generator.

use serde::{Deserialize, Serialize};

use super::error::SaathiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// One learning module. `content` is the educational text handed to the
/// quiz-generation requestor as topic material.
#[derive(Debug, Clone, Serialize)]
pub struct LearningModule {
    pub id: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub level: Level,
    pub category: &'static str,
    pub content: &'static str,
}

/// A generated multiple-choice question: four options, one correct, with an
/// optional real-world scenario for context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
}

pub static MODULES: &[LearningModule] = &[
    LearningModule {
        id: "1",
        slug: "stock-market-basics",
        title: "Stock Market Basics",
        description: "What shares are, how exchanges work, and how prices move.",
        level: Level::Beginner,
        category: "Equities",
        content: "A share represents part ownership of a company. Shares are bought and \
                  sold on exchanges such as the NSE and BSE, where prices move with supply \
                  and demand. When more investors want to buy a stock than sell it, the \
                  price rises; when sellers outnumber buyers, it falls. Indices like the \
                  NIFTY 50 track a basket of large companies to summarize the market's \
                  overall direction.",
    },
    LearningModule {
        id: "2",
        slug: "mutual-funds",
        title: "Mutual Funds & SIPs",
        description: "Pooled investing, NAV, and the discipline of systematic plans.",
        level: Level::Beginner,
        category: "Funds",
        content: "A mutual fund pools money from many investors and invests it across a \
                  portfolio of securities chosen by a fund manager. Ownership is measured \
                  in units priced at the fund's net asset value (NAV). A systematic \
                  investment plan (SIP) invests a fixed amount at regular intervals, \
                  averaging the purchase cost across market cycles instead of timing a \
                  single entry.",
    },
    LearningModule {
        id: "3",
        slug: "risk-and-diversification",
        title: "Risk & Diversification",
        description: "Why spreading investments lowers the damage any one bet can do.",
        level: Level::Intermediate,
        category: "Risk",
        content: "Every investment carries risk: company risk, sector risk, and market \
                  risk. Diversification spreads money across assets whose prices do not \
                  move together, so a loss in one holding is cushioned by others. A \
                  portfolio concentrated in a single stock or sector can lose a large \
                  share of its value from one adverse event, while a diversified one \
                  limits that damage.",
    },
    LearningModule {
        id: "4",
        slug: "reading-financial-statements",
        title: "Reading Financial Statements",
        description: "Balance sheets, income statements, and what the numbers say.",
        level: Level::Intermediate,
        category: "Analysis",
        content: "The income statement reports revenue, expenses, and profit over a \
                  period. The balance sheet lists what a company owns and owes at a point \
                  in time. The cash flow statement shows where money actually moved. \
                  Ratios built from these statements, such as earnings per share and \
                  debt-to-equity, let investors compare companies of different sizes.",
    },
    LearningModule {
        id: "5",
        slug: "derivatives-intro",
        title: "Introduction to Derivatives",
        description: "Futures and options, leverage, and why they amplify risk.",
        level: Level::Advanced,
        category: "Derivatives",
        content: "Derivatives derive their value from an underlying asset. A future \
                  obliges both parties to trade at a set price on a set date; an option \
                  gives the holder the right, but not the obligation, to do so. Because a \
                  small margin controls a large exposure, gains and losses are both \
                  amplified, which makes derivatives unsuitable without a clear hedging or \
                  strategy purpose.",
    },
    LearningModule {
        id: "6",
        slug: "behavioural-finance",
        title: "Behavioural Finance",
        description: "The biases that push investors into poor decisions.",
        level: Level::Advanced,
        category: "Psychology",
        content: "Investors are not perfectly rational. Loss aversion makes losses hurt \
                  roughly twice as much as equivalent gains please, which drives panic \
                  selling. Herding chases whatever recently rose. Anchoring fixes on a \
                  purchase price rather than current prospects. Recognizing these biases \
                  in your own decisions is the first defence against them.",
    },
];

pub fn catalog() -> &'static [LearningModule] {
    MODULES
}

pub fn find_module(slug: &str) -> Result<&'static LearningModule, SaathiError> {
    MODULES
        .iter()
        .find(|m| m.slug == slug)
        .ok_or_else(|| SaathiError::ModuleNotFound {
            slug: slug.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_slugs_are_unique() {
        let mut slugs: Vec<&str> = catalog().iter().map(|m| m.slug).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), catalog().len());
    }

    #[test]
    fn find_module_by_slug() {
        let module = find_module("mutual-funds").unwrap();
        assert_eq!(module.title, "Mutual Funds & SIPs");
    }

    #[test]
    fn find_module_unknown_slug_errors() {
        assert!(matches!(
            find_module("crypto-101"),
            Err(SaathiError::ModuleNotFound { .. })
        ));
    }
}
