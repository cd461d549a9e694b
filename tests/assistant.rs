//! Integration tests for the rules assistant boundary.

use volleyball_league_web::{
    ask_assistant, AssistantError, ChatTurn, RuleBookAssistant, RulesAssistant, FALLBACK_REPLY,
};

struct Offline;

impl RulesAssistant for Offline {
    fn reply(&self, _history: &[ChatTurn], _message: &str) -> Result<String, AssistantError> {
        Err(AssistantError::Unavailable("no network".to_string()))
    }
}

struct Silent;

impl RulesAssistant for Silent {
    fn reply(&self, _history: &[ChatTurn], _message: &str) -> Result<String, AssistantError> {
        Ok("  ".to_string())
    }
}

struct Echo;

impl RulesAssistant for Echo {
    fn reply(&self, history: &[ChatTurn], message: &str) -> Result<String, AssistantError> {
        Ok(format!("{} turns, then: {}", history.len(), message))
    }
}

#[test]
fn failures_become_the_fallback_reply() {
    assert_eq!(ask_assistant(&Offline, &[], "hello"), FALLBACK_REPLY);
    assert_eq!(ask_assistant(&Silent, &[], "hello"), FALLBACK_REPLY);
}

#[test]
fn history_and_message_reach_the_backend() {
    let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
    assert_eq!(ask_assistant(&Echo, &history, "rules?"), "2 turns, then: rules?");
}

#[test]
fn rule_book_answers_from_league_rules() {
    let tie_break = ask_assistant(&RuleBookAssistant, &[], "How long is the TIE-BREAK?");
    assert!(tie_break.contains("15"));

    let points = ask_assistant(&RuleBookAssistant, &[], "How do league points work?");
    assert!(points.contains('3') && points.contains('2') && points.contains('1'));

    let other = ask_assistant(&RuleBookAssistant, &[], "hello there");
    assert_ne!(other, FALLBACK_REPLY);
    assert!(!other.is_empty());
}
