//! Rules assistant chat: conversation turns in, one text reply out.
//!
//! The backend is pluggable through [`RulesAssistant`]. [`ask_assistant`] never fails: any backend
//! error is logged and replaced by [`FALLBACK_REPLY`].

use crate::logic::{POINTS_FOR_CLOSE_LOSS, POINTS_FOR_LOSS, POINTS_FOR_WIN};
use crate::models::{MIN_SET_MARGIN, SETS_TO_WIN, SET_POINTS, TIE_BREAK_POINTS};
use serde::{Deserialize, Serialize};

/// Reply used whenever the assistant cannot answer.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong while talking to the assistant.";

/// Who said a turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message of the conversation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Why a backend produced no reply.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssistantError {
    /// The backend answered with nothing.
    EmptyReply,
    /// The backend could not be reached or refused the request.
    Unavailable(String),
}

impl std::fmt::Display for AssistantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantError::EmptyReply => write!(f, "Assistant returned an empty reply"),
            AssistantError::Unavailable(msg) => write!(f, "Assistant unavailable: {}", msg),
        }
    }
}

impl std::error::Error for AssistantError {}

/// A chat backend answering volleyball rules and organisation questions.
pub trait RulesAssistant {
    fn reply(&self, history: &[ChatTurn], message: &str) -> Result<String, AssistantError>;
}

/// Ask `assistant`, falling back to [`FALLBACK_REPLY`] on any failure or empty answer.
pub fn ask_assistant(assistant: &dyn RulesAssistant, history: &[ChatTurn], message: &str) -> String {
    match assistant.reply(history, message) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log::warn!("Assistant error: {}", AssistantError::EmptyReply);
            FALLBACK_REPLY.to_string()
        }
        Err(e) => {
            log::warn!("Assistant error: {}", e);
            FALLBACK_REPLY.to_string()
        }
    }
}

/// Offline assistant that answers from the league's own scoring rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBookAssistant;

impl RuleBookAssistant {
    fn answer(question: &str) -> Option<String> {
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| question.contains(k));

        if mentions(&["tie-break", "tiebreak", "tie break", "fifth set", "5th set"]) {
            return Some(format!(
                "The fifth set is the tie-break: it is played to {} points, and the winner still needs a {}-point lead.",
                TIE_BREAK_POINTS, MIN_SET_MARGIN
            ));
        }
        if mentions(&["league point", "standings", "ranking", "table"]) {
            return Some(format!(
                "A win is worth {} league points. Losing 2-3 earns {} points, any other loss earns {}. Ties in the table are split by set difference.",
                POINTS_FOR_WIN, POINTS_FOR_CLOSE_LOSS, POINTS_FOR_LOSS
            ));
        }
        if mentions(&["libero"]) {
            return Some(
                "The libero is a back-row defensive specialist: they wear a different jersey, may not attack the ball above the net, serve or block, and libero replacements do not count as substitutions.".to_string(),
            );
        }
        if mentions(&["set", "point", "score"]) {
            return Some(format!(
                "Sets one to four go to {} points with a {}-point lead; play continues past {} until someone leads by {}.",
                SET_POINTS, MIN_SET_MARGIN, SET_POINTS, MIN_SET_MARGIN
            ));
        }
        if mentions(&["match", "win", "best of"]) {
            return Some(format!(
                "Matches are best of five: the first team to win {} sets takes the match.",
                SETS_TO_WIN
            ));
        }
        None
    }
}

impl RulesAssistant for RuleBookAssistant {
    fn reply(&self, _history: &[ChatTurn], message: &str) -> Result<String, AssistantError> {
        let question = message.to_lowercase();
        Ok(Self::answer(&question).unwrap_or_else(|| {
            "I can help with scoring, the tie-break, league points and player roles. What would you like to know?".to_string()
        }))
    }
}
