// All LLM prompt constants for the tailoring pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Keyword extraction prompt. Replace `{job_description}` before sending.
pub const EXTRACT_KEYWORDS_PROMPT: &str = r#"Extract the hiring requirements from the job description below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "required_skills": ["Python", "Kubernetes"],
  "preferred_skills": ["GraphQL"],
  "experience_level": "Senior",
  "years_experience": 5,
  "domain": "AI/ML",
  "key_responsibilities": ["Build ML platforms", "Mentor team members"]
}

Rules:
- required_skills: explicit must-haves ("required", "must have", "strong proficiency").
- preferred_skills: nice-to-haves ("preferred", "bonus", "a plus").
- experience_level: one of "Junior", "Mid", "Senior", "Staff", "Principal", "Lead", or "" if unstated.
- years_experience: the minimum number of years asked for, or null if unstated.
- key_responsibilities: short phrases, in the order they appear.
- Skill names must be concise (1-4 words), without version numbers.

JOB DESCRIPTION:
{job_description}"#;

/// System prompt for résumé improvement.
pub const IMPROVE_RESUME_SYSTEM: &str = "You are an expert resume editor. \
    You tailor resumes to job descriptions without fabricating experience. \
    You MUST respond with valid JSON only, matching the schema you are given.";

/// Résumé improvement prompt.
/// Replace: {truthfulness_instruction}, {output_language}, {job_description},
///          {keywords_json}, {resume_json}
pub const IMPROVE_RESUME_PROMPT: &str = r#"{truthfulness_instruction}

Tailor the resume below to the job description. Write all prose in {output_language}.

JOB DESCRIPTION:
{job_description}

EXTRACTED REQUIREMENTS:
{keywords_json}

ORIGINAL RESUME (JSON):
{resume_json}

Return the COMPLETE tailored resume as a JSON object with exactly the same structure as the
original: "personalInfo", "summary", "workExperience", "education", "additional" and
"customSections". Keep every "id" unchanged so entries can be matched to the original.

Guidelines:
1. Rewrite the summary to lead with the experience most relevant to this role.
2. Rephrase work-experience bullets to surface matching skills and responsibilities.
3. Reorder technical skills so the most relevant come first.
4. Never drop a section, and never truncate the output."#;

/// Cover letter prompt. Replace: {job_description}, {resume_json}, {output_language}
pub const COVER_LETTER_PROMPT: &str = r#"Write a cover letter for the job below, based only on the candidate's resume.

JOB DESCRIPTION:
{job_description}

CANDIDATE RESUME (JSON):
{resume_json}

Requirements:
- 3 to 4 short paragraphs, under 350 words, written in {output_language}.
- Open with the role and one concrete reason the candidate fits.
- Reference specific achievements from the resume; do not invent any.
- Output the letter text only, without a subject line or placeholders."#;

pub const COVER_LETTER_SYSTEM: &str = "You are a professional career coach and resume writer. \
    Write compelling, personalized cover letters.";

/// Outreach message prompt. Replace: {job_description}, {resume_json}, {output_language}
pub const OUTREACH_MESSAGE_PROMPT: &str = r#"Write a short cold outreach message to a hiring manager or engineer at the company below.

JOB DESCRIPTION:
{job_description}

CANDIDATE RESUME (JSON):
{resume_json}

Requirements:
- Under 120 words, written in {output_language}, friendly and specific.
- Mention one relevant achievement from the resume and ask for a brief conversation.
- Output the message text only."#;

pub const OUTREACH_MESSAGE_SYSTEM: &str = "You are a professional networking coach. \
    Write genuine, engaging cold outreach messages.";

/// Title prompt. Replace: {job_description}, {output_language}
pub const GENERATE_TITLE_PROMPT: &str = r#"From the job description below, produce a short title in the form "<Role> @ <Company>".
If the company is not named, output just the role. Write it in {output_language}.
Output the title only, with no quotes or explanation.

JOB DESCRIPTION:
{job_description}"#;

pub const GENERATE_TITLE_SYSTEM: &str =
    "You extract job titles and company names from job descriptions.";
