// Fixed strings shown by the assistant panel.

/// Conversation starters offered while a session has no messages.
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "Explain the concept of microservices architecture",
    "Create a project plan for a mobile app",
    "What are the best practices for API design?",
    "Help me optimize my React application performance",
];

/// Transient notification raised when a turn gets no assistant reply.
pub const REPLY_FAILED_NOTIFICATION: &str = "AI response failed";
