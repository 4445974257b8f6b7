//! The guided command-line intake dialogue.
//!
//! Mirrors the original local script: LLM greeting, a fixed sequence of
//! qualification questions read from standard input, an optional product
//! question, an LLM summary, and the lead record printed as formatted JSON.
//! Any LLM failure is fatal and aborts the run.

use sdrbot_core::{Conversation, LeadFields, LeadRecord, Role, SdrbotResult};
use sdrbot_llm::{prompts, LlmGateway};
use std::io::{BufRead, Write};

/// The fixed qualification questions, in elicitation order.
const QUESTIONS: [&str; 5] = [
    "What is your full name?",
    "Can I have your email address?",
    "Which company are you with?",
    "What is your role in the company?",
    "What challenges or pain points are you trying to solve?",
];

const PRODUCT_QUESTION: &str = "Which product or solution are you interested in?";

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> SdrbotResult<String> {
    writeln!(output, "Bot: {question}")?;
    write!(output, "You: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Runs the whole guided dialogue and returns the finished lead record.
///
/// Generic over the streams so tests can script the visitor's side; `main`
/// wires stdin/stdout and the real gateway.
pub async fn run_guided_intake<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    llm: &dyn LlmGateway,
) -> SdrbotResult<LeadRecord> {
    let mut conversation = Conversation::new();

    let greeting = llm.complete(&prompts::cli_greeting()).await?;
    writeln!(output, "Bot: {greeting}")?;
    conversation.push(Role::Bot, greeting);

    let mut answers = Vec::with_capacity(QUESTIONS.len() + 1);
    for question in QUESTIONS {
        let answer = ask(input, output, question)?;
        conversation.push(Role::User, &answer);
        answers.push(answer);
    }

    let product = ask(input, output, PRODUCT_QUESTION)?;
    conversation.push(Role::User, &product);

    let mut answers = answers.into_iter();
    let fields = LeadFields {
        name: answers.next().unwrap_or_default(),
        email: answers.next().unwrap_or_default(),
        company: answers.next().unwrap_or_default(),
        role: answers.next().unwrap_or_default(),
        pain_points: answers.next().unwrap_or_default(),
        interested_product: product,
    };

    let summary = llm.complete(&prompts::summary(&conversation)).await?;
    let record = LeadRecord::from_fields(fields).with_summary(summary);

    writeln!(output, "\n--- Generated JSON Lead Object ---")?;
    writeln!(output, "{}", serde_json::to_string_pretty(&record)?)?;

    Ok(record)
}
