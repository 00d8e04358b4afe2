// ATS review LLM prompt templates.

pub const ATS_REVIEW_SYSTEM: &str = "\
You are an experienced technical recruiter reviewing a résumé for applicant tracking systems. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Only comment on what the résumé text actually contains. Never invent experience.";

pub const ATS_REVIEW_PROMPT: &str = r#"Review the résumé below. A heuristic pass has already produced a score and suggestions.
Add at most 5 NEW, specific suggestions that the heuristic pass could not detect
(weak wording, unclear scope, missing context for the target role). Do not repeat existing suggestions.

HEURISTIC SCORE: {score}/100

EXISTING SUGGESTIONS:
{suggestions}

JOB DESCRIPTION (may be empty):
{job_description}

RÉSUMÉ TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "summary": "one or two sentences on overall ATS readiness",
  "suggestions": ["string"]
}"#;
