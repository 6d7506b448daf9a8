use crate::config::defaults::UNKNOWN_WORKER;

/// Classification prompt listing every worker with its capability line.
pub(super) fn classification(workers: &[(&str, &str)], context: &str, message: &str) -> String {
    let roster = workers
        .iter()
        .map(|(name, description)| format!("- {name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n");
    let names: Vec<&str> = workers.iter().map(|(name, _)| *name).collect();
    let single = names.first().copied().unwrap_or(UNKNOWN_WORKER);
    let multiple = if names.len() > 1 {
        names[..2].join(",")
    } else {
        single.to_string()
    };

    format!(
        "Analyze this message and determine which worker agent(s) should handle it.\n\n\
         Previous conversation context:\n{context}\n\n\
         Available workers:\n{roster}\n\n\
         Current user message: {message}\n\n\
         You can respond with:\n\
         - A single worker name: {list}\n\
         - Multiple workers (comma-separated), e.g. {multiple}\n\
         - {UNKNOWN_WORKER} if you cannot determine\n\n\
         If the message requires multiple perspectives or different types of information, use multiple workers.\n\
         If the message is unclear or doesn't fit any worker, respond with {UNKNOWN_WORKER}.\n\
         Consider the conversation context when making your decision.\n\
         Respond with the worker name(s) only.\n\n\
         Examples:\n\
         - Simple query: \"{single}\"\n\
         - Query needing multiple perspectives: \"{multiple}\"",
        list = names.join(", "),
    )
}

pub(super) fn synthesis(
    judge_persona: &str,
    context: &str,
    message: &str,
    outputs: &[String],
) -> String {
    format!(
        "{judge_persona}\n\n\
         Previous conversation context:\n{context}\n\n\
         Original user request: {message}\n\n\
         Worker responses:\n{responses}\n\n\
         Synthesize these responses into a single, coherent, and comprehensive answer.\n\
         Make sure the final response directly addresses the user's original request and considers the conversation context.",
        responses = outputs.join("\n"),
    )
}

pub(super) fn fallback(fallback_persona: &str, context: &str, message: &str) -> String {
    format!(
        "{fallback_persona}\n\n\
         Previous conversation context:\n{context}\n\n\
         Current user message: {message}\n\n\
         Provide a helpful response that considers the conversation context."
    )
}
