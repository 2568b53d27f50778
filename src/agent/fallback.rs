//! Canned answers used when the chat API cannot be reached.

const GRANT_WRITING_REPLY: &str = "I can help you write grants! A strong grant proposal typically includes: 1) Executive Summary, 2) Statement of Need, 3) Project Description, 4) Budget, and 5) Organization Information. What specific aspect would you like help with?";

const BUDGET_REPLY: &str = "For grant budgets, make sure to include: personnel costs, equipment, supplies, travel, and indirect costs. Be realistic and justify each expense clearly. Would you like me to help you create a budget template?";

const TIMELINE_REPLY: &str = "Managing grant deadlines is crucial! I recommend creating a timeline that works backwards from the submission date, allowing time for reviews, revisions, and gathering required documents. Would you like help planning your timeline?";

const GREETING_REPLY: &str = "Hello! I'm here to help you with grant writing and applications. Feel free to ask me about proposal structure, budgets, timelines, or any other grant-related questions.";

const GENERIC_REPLY: &str = "Thank you for your question. I'm here to help with grant writing, applications, budgets, timelines, and proposal development. Could you provide more details about what you need help with?";

/// Picks a reply by case-insensitive substring match. Rules are checked in order and the first hit wins.
pub fn fallback_response(user_message: &str) -> &'static str {
    let message = user_message.to_lowercase();
    let has = |needle: &str| message.contains(needle);

    if has("grant") && has("write") {
        GRANT_WRITING_REPLY
    } else if has("budget") {
        BUDGET_REPLY
    } else if has("deadline") || has("timeline") {
        TIMELINE_REPLY
    } else if has("hello") || has("hi") {
        GREETING_REPLY
    } else {
        GENERIC_REPLY
    }
}
