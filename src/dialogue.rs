//! Clarifying-question dialogue.
//!
//! One canned follow-up per patient message, chosen from the catalog's
//! ordered trigger list. The reply depends only on the message, never on
//! hidden state, so replaying a transcript reproduces it exactly.

use std::sync::Arc;

use crate::catalog::RuleCatalog;
use crate::error::EngineError;
use crate::models::{ChatRole, Transcript};

#[derive(Debug, Clone)]
pub struct DialogueAssistant {
    catalog: Arc<RuleCatalog>,
}

impl DialogueAssistant {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    /// Append the patient message and the assistant's reply.
    ///
    /// The input transcript is consumed and returned extended by exactly two
    /// turns. An empty message leaves the caller with an error and no
    /// transcript change, since the transcript is only moved on success.
    pub fn respond(
        &self,
        mut transcript: Transcript,
        message: &str,
    ) -> Result<(Transcript, String), EngineError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(EngineError::InvalidInput("chat message is empty".into()));
        }

        let reply = self.reply_for(message).to_string();
        transcript.push(ChatRole::Patient, message);
        transcript.push(ChatRole::Assistant, reply.as_str());

        tracing::debug!(turns = transcript.len(), "Dialogue reply appended");
        Ok((transcript, reply))
    }

    /// The reply a message would receive, first matching trigger wins.
    pub fn reply_for(&self, message: &str) -> &str {
        let normalized = message.to_lowercase();
        self.catalog
            .dialogue_triggers
            .iter()
            .find(|t| normalized.contains(t.keyword.as_str()))
            .map(|t| t.reply.as_str())
            .unwrap_or(self.catalog.dialogue_fallback.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::defaults::DIALOGUE_FALLBACK;

    fn assistant() -> DialogueAssistant {
        DialogueAssistant::new(RuleCatalog::builtin())
    }

    // ───────────────────────────────────────
    // trigger selection
    // ───────────────────────────────────────

    #[test]
    fn fever_asks_for_temperature() {
        let (_, reply) = assistant().respond(Transcript::new(), "I have a fever").unwrap();
        assert!(reply.starts_with("Fever noted. Have you taken your temperature?"));
    }

    #[test]
    fn pain_asks_location_and_severity() {
        let reply = assistant().reply_for("My back PAIN is bad").to_string();
        assert!(reply.starts_with("I understand you're experiencing pain."));
        assert!(reply.contains("1) Where exactly is the pain located?"));
    }

    #[test]
    fn breathing_asks_about_dyspnea() {
        let reply = assistant().reply_for("trouble breathing at night").to_string();
        assert!(reply.starts_with("Breathing difficulties can be serious."));
        assert!(reply.contains("Wheezing"));
    }

    #[test]
    fn pain_wins_over_fever() {
        let reply = assistant().reply_for("fever and pain").to_string();
        assert!(reply.starts_with("I understand you're experiencing pain."));
    }

    #[test]
    fn fever_wins_over_breathing() {
        let reply = assistant().reply_for("breathing is fine but fever").to_string();
        assert!(reply.starts_with("Fever noted."));
    }

    #[test]
    fn no_trigger_uses_fallback() {
        assert_eq!(assistant().reply_for("I feel tired"), DIALOGUE_FALLBACK);
    }

    // ───────────────────────────────────────
    // transcript handling
    // ───────────────────────────────────────

    #[test]
    fn appends_patient_then_assistant() {
        let (transcript, reply) = assistant().respond(Transcript::new(), "  I have a fever ").unwrap();
        assert_eq!(transcript.len(), 2);
        let turns = transcript.turns();
        assert_eq!(turns[0].role, ChatRole::Patient);
        assert_eq!(turns[0].content, "I have a fever");
        assert_eq!(turns[0].position, 0);
        assert_eq!(turns[1].role, ChatRole::Assistant);
        assert_eq!(turns[1].content, reply);
        assert_eq!(turns[1].position, 1);
    }

    #[test]
    fn positions_continue_across_messages() {
        let assistant = assistant();
        let (transcript, _) = assistant.respond(Transcript::new(), "hello").unwrap();
        let (transcript, _) = assistant.respond(transcript, "my head hurts").unwrap();
        let positions: Vec<usize> = transcript.turns().iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_message_is_invalid_input() {
        let err = assistant().respond(Transcript::new(), "   ").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn replay_is_deterministic() {
        let assistant = assistant();
        let messages = ["hi", "I have pain", "it started yesterday", "now a fever"];
        let run = || {
            messages.iter().fold(Transcript::new(), |t, m| assistant.respond(t, m).unwrap().0)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn custom_triggers_from_catalog() {
        let catalog = RuleCatalog::from_json_str(
            r#"{"dialogueTriggers": [{"keyword": "Rash", "reply": "Where is the rash?"}], "dialogueFallback": "Tell me more."}"#,
        )
        .unwrap();
        let assistant = DialogueAssistant::new(Arc::new(catalog));
        assert_eq!(assistant.reply_for("a red rash"), "Where is the rash?");
        assert_eq!(assistant.reply_for("I have pain"), "Tell me more.");
    }
}
