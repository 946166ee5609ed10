//! Fixed prompts for the grammar-refinement call.
//!
//! The instructions are intentionally conservative: the service may only fix
//! grammar, cohesion and coherence, never facts, numbers or tone. Both
//! prompts are in Brazilian Portuguese to match the report.

/// Output cap for the refinement response.
pub const REFINE_MAX_TOKENS: u32 = 2000;

/// Low temperature biases the service toward deterministic, minimal edits.
pub const REFINE_TEMPERATURE: f32 = 0.3;

/// Returns the system prompt describing the correction task.
pub fn refine_system_prompt() -> &'static str {
    "Você é um assistente especializado em correção gramatical, coesão e coerência de textos \
     oficiais da Polícia Militar. Corrija apenas erros gramaticais, melhore a coesão e \
     coerência do texto, mantendo o formato original e o tom formal. Não altere informações \
     factuais ou dados específicos."
}

/// Wraps the raw report in the user-facing correction instruction.
pub fn refine_user_prompt(report: &str) -> String {
    format!(
        "Por favor, corrija este relatório policial mantendo todas as informações originais, \
         apenas melhorando a gramática, coesão e coerência:\n\n{}",
        report
    )
}
