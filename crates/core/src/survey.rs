//! Static survey model.
//!
//! The survey is an ordered list of [`Section`]s, each an ordered list of
//! [`Question`]s. It is compiled into the binary and never changes at
//! runtime; respondents walk the sections strictly in order.

use serde::Serialize;

use crate::form::Answer;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionType {
    /// Single-line free text.
    #[serde(rename = "short_answer")]
    ShortText,
    /// Multi-line free text.
    #[serde(rename = "paragraph")]
    Paragraph,
    /// Single choice rendered as a dropdown.
    #[serde(rename = "dropdown")]
    Dropdown,
    /// Single choice rendered as radio options.
    #[serde(rename = "multiple_choice")]
    MultipleChoice,
    /// Any number of choices.
    #[serde(rename = "checkboxes")]
    Checkboxes,
}

/// A single survey prompt.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
}

impl Question {
    pub fn is_multi_select(&self) -> bool {
        self.kind == QuestionType::Checkboxes
    }

    /// Whether `value` is one of the listed options. Questions without
    /// options take any value.
    pub fn lists_option(&self, value: &str) -> bool {
        self.options.map_or(true, |options| options.contains(&value))
    }

    /// Whether `answer` has the right shape for this question and only uses
    /// listed options (when the question has any).
    pub fn accepts(&self, answer: &Answer) -> bool {
        match (self.is_multi_select(), answer) {
            (false, Answer::Text(value)) => value.is_empty() || self.lists_option(value),
            (true, Answer::Choices(values)) => values.iter().all(|v| self.lists_option(v)),
            _ => false,
        }
    }
}

/// A group of questions shown together on one screen.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub questions: &'static [Question],
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Number of sections in the survey.
pub fn section_count() -> usize {
    SURVEY.len()
}

/// The section at a 0-based index.
pub fn section(index: usize) -> Option<&'static Section> {
    SURVEY.get(index)
}

/// Every question in survey order.
pub fn all_questions() -> impl Iterator<Item = &'static Question> {
    SURVEY.iter().flat_map(|s| s.questions.iter())
}

/// Look up a question by id.
pub fn find_question(id: &str) -> Option<&'static Question> {
    all_questions().find(|q| q.id == id)
}

// ---------------------------------------------------------------------------
// Survey definition
// ---------------------------------------------------------------------------

const fn text(
    id: &'static str,
    text: &'static str,
    kind: QuestionType,
    required: bool,
    placeholder: &'static str,
) -> Question {
    Question {
        id,
        text,
        kind,
        required,
        placeholder: Some(placeholder),
        options: None,
    }
}

const fn choice(
    id: &'static str,
    text: &'static str,
    kind: QuestionType,
    options: &'static [&'static str],
) -> Question {
    Question {
        id,
        text,
        kind,
        required: true,
        placeholder: None,
        options: Some(options),
    }
}

use QuestionType::{Checkboxes, Dropdown, MultipleChoice, Paragraph, ShortText};

/// The full onboarding survey.
pub static SURVEY: &[Section] = &[
    Section {
        id: "section-1",
        title: "Your Contact Info",
        description: Some(
            "Claim your early access & ₦5,000 credit. Note: If you skip providing your \
             contact details, we won't be able to notify you when we launch.",
        ),
        questions: &[
            text("q1", "What's your first name? (Optional)", ShortText, false, "Your Name"),
            text(
                "q2",
                "What's your WhatsApp number? (Optional)",
                ShortText,
                false,
                "e.g., 08012345678",
            ),
            text("q3", "What's your email? (Optional)", ShortText, false, "you@example.com"),
            choice(
                "q4",
                "Where do you live?",
                Dropdown,
                &[
                    "Lagos - Mainland",
                    "Lagos - Island/Lekki",
                    "Abuja",
                    "Port Harcourt",
                    "Ibadan",
                    "Kano",
                    "Other city in Nigeria",
                    "Outside Nigeria",
                ],
            ),
        ],
    },
    Section {
        id: "section-2",
        title: "About Your Crypto Usage",
        description: Some("Help us understand how you use crypto today."),
        questions: &[
            choice(
                "q5",
                "How long have you been using crypto?",
                MultipleChoice,
                &[
                    "Less than 6 months",
                    "6 months - 1 year",
                    "1-2 years",
                    "2-5 years",
                    "5+ years",
                ],
            ),
            choice(
                "q6",
                "How much crypto do you currently hold? (Approximate total value)",
                MultipleChoice,
                &[
                    "Less than $100 (Less than ₦150K)",
                    "$100 - $500 (₦150K - ₦750K)",
                    "$500 - $1,000 (₦750K - ₦1.5M)",
                    "$1,000 - $5,000 (₦1.5M - ₦7.5M)",
                    "$5,000 - $10,000 (₦7.5M - ₦15M)",
                    "More than $10,000 (₦15M+)",
                    "Prefer not to say",
                ],
            ),
            choice(
                "q7",
                "Which cryptocurrencies do you hold? (Select all)",
                Checkboxes,
                &[
                    "USDT (Tether)",
                    "USDC",
                    "Bitcoin (BTC)",
                    "Ethereum (ETH)",
                    "BNB",
                    "Solana (SOL)",
                    "Other stablecoins",
                    "Other altcoins",
                ],
            ),
            choice(
                "q8",
                "How often do you convert crypto to Naira?",
                MultipleChoice,
                &[
                    "Daily",
                    "2-3 times per week",
                    "Once a week",
                    "2-3 times per month",
                    "Once a month",
                    "Rarely",
                ],
            ),
            choice(
                "q9",
                "How much do you typically convert per month?",
                MultipleChoice,
                &[
                    "Less than ₦50,000",
                    "₦50,000 - ₦200,000",
                    "₦200,000 - ₦500,000",
                    "₦500,000 - ₦1,000,000",
                    "₦1,000,000 - ₦5,000,000",
                    "More than ₦5,000,000",
                ],
            ),
        ],
    },
    Section {
        id: "section-3",
        title: "Your Current Pain Points",
        description: Some("We want to fix what's broken. Tell us what annoys you."),
        questions: &[
            choice(
                "q10",
                "How do you currently convert crypto to Naira? (Select all you use)",
                Checkboxes,
                &[
                    "Binance P2P",
                    "Bybit P2P",
                    "Paxful / Noones",
                    "WhatsApp P2P traders",
                    "Telegram P2P traders",
                    "Local agents (physical meetup)",
                    "Friends/family",
                    "Quidax",
                    "Luno",
                    "Other exchange",
                    "Other method",
                ],
            ),
            choice(
                "q11",
                "What's your #1 BIGGEST frustration when converting crypto?",
                MultipleChoice,
                &[
                    "High fees (3-5% or more)",
                    "Bad exchange rates",
                    "Takes too long (hours/days)",
                    "Fear of getting scammed",
                    "Bank account freezing issues",
                    "Hard to find trusted traders",
                    "No easy way to spend (need card)",
                    "Too many apps needed",
                    "Other",
                ],
            ),
            choice(
                "q12",
                "Have you ever been scammed or lost money during a crypto transaction?",
                MultipleChoice,
                &[
                    "Yes, I lost money and never recovered it",
                    "Yes, but I eventually got my money back",
                    "No, but I've had very close calls",
                    "No, never had issues",
                ],
            ),
            choice(
                "q13",
                "What's the highest fee you've paid on a single transaction?",
                MultipleChoice,
                &["1-2%", "2-3%", "3-5%", "5-10%", "More than 10%", "I don't usually check"],
            ),
            choice(
                "q14",
                "What's the longest you've waited to complete a crypto-to-Naira transaction?",
                MultipleChoice,
                &[
                    "Less than 30 minutes",
                    "30 minutes - 1 hour",
                    "1-3 hours",
                    "3-6 hours",
                    "6-24 hours",
                    "More than 24 hours",
                ],
            ),
        ],
    },
    Section {
        id: "section-4",
        title: "Your Dream Solution",
        description: Some("If we could build anything for you, what would matter most?"),
        questions: &[
            choice(
                "q15",
                "Do you currently have a Dollar card? (Grey, Chipper, Geegpay, etc.)",
                MultipleChoice,
                &[
                    "Yes, I use Grey",
                    "Yes, I use Chipper Cash",
                    "Yes, I use Geegpay",
                    "Yes, I use another service",
                    "No, but I want one",
                    "No, I don't need one",
                ],
            ),
            choice(
                "q16",
                "If you have a Dollar card, what's your biggest problem with it?",
                Checkboxes,
                &[
                    "High fees",
                    "Can't fund directly with crypto",
                    "Funding is slow",
                    "Card gets declined often",
                    "Poor customer support",
                    "Account gets frozen",
                    "I don't have problems",
                    "I don't have a Dollar card",
                ],
            ),
            choice(
                "q17",
                "Flash will let you: Hold crypto + Naira, Swap instantly (1-1.5%), Get Dollar \
                 card, Cash out via agents, & Trade P2P. Would you use this?",
                MultipleChoice,
                &[
                    "Definitely yes! I need this now",
                    "Probably yes",
                    "Maybe, I'd need to try it first",
                    "Probably not",
                    "Definitely not",
                ],
            ),
            choice(
                "q18",
                "Which feature is MOST important to you? (Pick only ONE)",
                MultipleChoice,
                &[
                    "Low fees (cheaper than what I pay now)",
                    "Speed (instant conversions)",
                    "Virtual Dollar card for online shopping",
                    "Cash out via local agents",
                    "Safety (no scam risk, verified traders)",
                    "All-in-one app (everything in one place)",
                    "Earn yield on my stablecoins",
                    "Large P2P trades without limits",
                ],
            ),
            choice(
                "q19",
                "What's the MAXIMUM fee you'd pay for instant, safe, guaranteed crypto conversion?",
                MultipleChoice,
                &[
                    "0.5%",
                    "1%",
                    "1.5%",
                    "2%",
                    "2.5%",
                    "3% (same as now, but safer)",
                    "I want it free",
                ],
            ),
        ],
    },
    Section {
        id: "section-5",
        title: "Final Questions",
        description: Some("Just a few more questions to help us serve you better."),
        questions: &[
            choice(
                "q20",
                "What's your age range?",
                MultipleChoice,
                &["18-24", "25-34", "35-44", "45+"],
            ),
            choice(
                "q21",
                "What do you do for work?",
                MultipleChoice,
                &[
                    "Employed (9-5 job)",
                    "Freelancer / Remote worker",
                    "Business owner",
                    "Full-time crypto trader",
                    "Student",
                    "Unemployed / Between jobs",
                    "Other",
                ],
            ),
            choice(
                "q22",
                "How did you hear about this survey?",
                MultipleChoice,
                &["WhatsApp", "Telegram", "Twitter/X", "Friend told me", "Instagram", "Other"],
            ),
            choice(
                "q23",
                "Would you refer Flash to your friends if it solved your problems?",
                MultipleChoice,
                &[
                    "Yes, definitely! I'd tell everyone",
                    "Yes, if it actually works well",
                    "Maybe",
                    "Probably not",
                    "No",
                ],
            ),
            text(
                "q24",
                "Anything else you want us to know? Any features you'd love to see?",
                Paragraph,
                false,
                "Tell us your thoughts...",
            ),
        ],
    },
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
