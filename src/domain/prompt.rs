//! Prompt construction for the generation step
//!
//! The actual question is carried inside the system instruction, next to the
//! knowledge block; the user turn is a fixed cue. Keeping both in one message
//! anchors model attention on the knowledge block instead of splitting it
//! across turns.

/// Fixed user-turn content sent alongside the system instruction.
pub const ANSWER_CUE: &str = "Please provide your answer now.";

/// The reply the model is instructed to produce when no knowledge context is
/// available. The confidence scorer recognizes this sentence (via
/// [`HANDOFF_MARKER`]) and forces escalation.
pub const KNOWLEDGE_UNAVAILABLE_REPLY: &str = "I don't have access to my knowledge base at the \
     moment. Let me connect you with a team member who can help you with that.";

/// Substring that identifies our own handoff reply inside generated text.
pub const HANDOFF_MARKER: &str = "let me connect you with";

/// System instruction for a turn with retrieved knowledge context.
pub fn knowledge_system_prompt(role_text: &str, context: &str, question: &str) -> String {
    format!(
        "{role_text}\n\
         \n\
         ===== KNOWLEDGE BASE (Verified Information) =====\n\
         {context}\n\
         ===== END OF KNOWLEDGE BASE =====\n\
         \n\
         Your task: Answer the user's question using the KNOWLEDGE BASE above.\n\
         \n\
         IMPORTANT:\n\
         - The KNOWLEDGE BASE contains the correct answer - use it directly\n\
         - Answer confidently and naturally based on what you read above\n\
         - Do NOT say you're unsure if the answer is clearly in the KNOWLEDGE BASE\n\
         - Be helpful and conversational\n\
         - Stay in character according to your role\n\
         \n\
         User Question: {question}\n\
         \n\
         Answer (use the KNOWLEDGE BASE information):"
    )
}

/// System instruction for a turn where retrieval came back empty. The model
/// is never asked to answer from nothing; it is told to hand off instead.
pub fn no_context_system_prompt(role_text: &str) -> String {
    format!(
        "{role_text}\n\
         \n\
         You do not have access to the knowledge base right now.\n\
         \n\
         Respond to the user by saying: \"{KNOWLEDGE_UNAVAILABLE_REPLY}\"\n\
         \n\
         Be polite and helpful."
    )
}
