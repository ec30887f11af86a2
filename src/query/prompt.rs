/// Assembles the single-turn prompt. Both values are inserted as-is.
pub fn build_prompt(file_info: &str, question: &str) -> String {
    format!(
        r#"You are a helpful AI assistant. You will be given some information about a file and a user's question.
Answer the user's question based *only* on the provided file information.
If the information is not available in the provided details, state that clearly.

File Information:
---
{file_info}
---

User's Question: {question}

Answer:"#
    )
}
