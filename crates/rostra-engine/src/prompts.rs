//! Prompt text for each model-backed component.
//!
//! Every prompt asks for a single bare JSON object and spells out its
//! fields; the matching reply types declare the same field names.

use std::fmt::Write as _;

use rostra_core::argument::Argument;

// ─── Proposition review ──────────────────────────────────────────────────────

const PROPOSITION_SHAPE: &str = r#"{
  "original_input": "<the user's input, verbatim>",
  "is_valid": true,
  "rejection_reason": null,
  "interpretation": "<one sentence on what the user appears to want to debate>",
  "suggestions": [
    { "proposition": "<formal proposition>", "type": "policy" | "value" | "fact" }
  ]
}"#;

pub fn proposition_review(input: &str) -> String {
  format!(
    r#"<role>
You format debate propositions. Take the user's input, whether a question, a
vague topic or a rough statement, and turn it into formal propositions fit for
a speech and debate competition.
</role>

<guidelines>
A good proposition is a single declarative sentence, formal but accessible,
balanced enough that reasonable people could argue either side, and specific
enough to be debated without narrowing the argument.
</guidelines>

<proposition_types>
policy: advocates a specific action ("This house would ...").
value: makes a comparative or evaluative claim ("X is more important than Y").
fact: asserts that something is or will be true.
</proposition_types>

<user_proposition>
{input}
</user_proposition>

<validity_rules>
Set is_valid to false, and give a rejection_reason, if the input is
nonsensical or too vague to interpret, contains hateful or inappropriate
content, or cannot reasonably be debated. When is_valid is false, set
interpretation to null and suggestions to an empty array.
</validity_rules>

<requirements>
Provide exactly 5 suggestions, ordered from most to least aligned with the
user's apparent intent. Each should take a meaningfully different angle; vary
the proposition types where it fits.
</requirements>

<output_format>
Respond with valid JSON only, with no code fences or commentary:
{PROPOSITION_SHAPE}
</output_format>"#
  )
}

// ─── Fact-check ──────────────────────────────────────────────────────────────

const VERDICT_SHAPE: &str = r#"{
  "is_relevant": true,
  "validity_score": 0,
  "reasoning": "<two or three sentences>",
  "key_urls": ["<url supporting or refuting the central claim>"]
}"#;

pub fn fact_check(title: &str, content: &str, proposition: &str) -> String {
  format!(
    r#"<role>
You fact-check arguments submitted to a structured debate.
</role>

<debate_proposition>
{proposition}
</debate_proposition>

<argument>
<title>{title}</title>
<content>
{content}
</content>
</argument>

<instructions>
1. Decide whether the argument addresses the debate proposition. Set
   is_relevant to false for off-topic text, spam, or content with no factual
   claim bearing on the proposition.
2. Score the factual accuracy and logical soundness of its claims from 0 to
   100, regardless of which side it takes.
3. Explain the score briefly in reasoning.
4. List up to three reputable URLs relevant to the central claim in key_urls;
   use an empty array if you know of none.
</instructions>

<output_format>
Respond with valid JSON only, with no code fences or commentary:
{VERDICT_SHAPE}
</output_format>"#
  )
}

// ─── Topic analysis ──────────────────────────────────────────────────────────

const ANALYSIS_SHAPE: &str = r#"{
  "overall_summary": "<one paragraph>",
  "consensus_view": "<one paragraph>",
  "timeline_view": [
    { "period": "<stage or era>", "description": "<what shifted>" }
  ]
}"#;

fn render_side(out: &mut String, arguments: &[Argument]) {
  for (i, arg) in arguments.iter().enumerate() {
    let _ = write!(out, "\n{}. {}", i + 1, arg.title);
    if let Some(score) = arg.validity_score() {
      let _ = write!(out, " (validity {score}/100)");
    }
    let _ = write!(out, "\n{}\n", arg.content);
  }
}

pub fn topic_analysis(proposition: &str, pro: &[Argument], con: &[Argument]) -> String {
  let mut pro_text = String::new();
  render_side(&mut pro_text, pro);
  let mut con_text = String::new();
  render_side(&mut con_text, con);

  format!(
    r#"<role>
You are a neutral moderator summarising a structured debate.
</role>

<debate_proposition>
{proposition}
</debate_proposition>

<pro_arguments>{pro_text}</pro_arguments>

<con_arguments>{con_text}</con_arguments>

<instructions>
overall_summary: the strongest points of each side and where they clash.
consensus_view: where the weight of evidence currently points, and how
confident one can be.
timeline_view: how thinking on this question has developed, as an ordered
list of periods.
</instructions>

<output_format>
Respond with valid JSON only, with no code fences or commentary:
{ANALYSIS_SHAPE}
</output_format>"#
  )
}
