// All LLM prompt constants for the analysis collaborators.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for CV structuring. Enforces JSON-only output.
pub const STRUCTURE_SYSTEM: &str = "You are an expert CV parser. \
    Convert raw CV text into a fixed JSON schema, normalizing section names. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// CV structuring prompt. Replace `{fidelity_instruction}` and `{cv_text}` before sending.
pub const STRUCTURE_PROMPT_TEMPLATE: &str = r#"{fidelity_instruction}

Parse the CV below and extract ALL of its information into the JSON schema that follows.

SECTION NAMES: map semantic equivalents onto the schema keys.
- "Academic Background", "Education History" -> "education"
- "Technical Skills", "Core Competencies" -> "skills"
- "Work History", "Professional Experience", "Career" -> "experience"
- "Side Projects", "Personal Projects" -> "projects"
- "Profile", "Objective", "Professional Summary" -> "summary"
Sections that fit nowhere (hobbies, volunteering, spoken languages) go into
"additional_sections" keyed by their original heading.

SKILLS: split into "languages", "frameworks", "cloud", "devops", "databases", "tools",
"other". Also pick up technologies mentioned only inside experience bullets.

DATES: "Mon YYYY" (e.g. "May 2024") or "Present".

OUTPUT SCHEMA (return exactly this structure):
{
  "contact": {"name": null, "email": null, "phone": null, "linkedin": null, "github": null, "website": null},
  "summary": {"text": null, "key_highlights": []},
  "education": [{"institution": "", "degree": null, "field": null, "start_date": null, "end_date": null, "gpa": null, "honors": []}],
  "experience": [{"company": "", "title": "", "location": null, "start_date": null, "end_date": null, "bullets": [], "technologies": []}],
  "skills": {"languages": [], "frameworks": [], "cloud": [], "devops": [], "databases": [], "tools": [], "other": []},
  "certifications": [{"name": "", "issuer": null, "date": null, "credential_id": null}],
  "projects": [{"name": "", "description": null, "technologies": [], "link": null, "start_date": null, "end_date": null}],
  "leadership": [{"role": "", "organization": "", "start_date": null, "end_date": null, "description": null}],
  "publications": [{"title": "", "venue": null, "date": null, "link": null}],
  "awards": [{"name": "", "issuer": null, "date": null}],
  "additional_sections": {}
}

RULES:
1. null for missing single values, [] for missing lists
2. Copy bullet points verbatim
3. Return ONLY the JSON object

CV TEXT:
{cv_text}"#;

/// System prompt for CV vs JD comparison. Enforces JSON-only output.
pub const COMPARE_SYSTEM: &str = "You are an experienced technical recruiter \
    comparing a candidate's structured CV against a job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Keyword comparison prompt.
/// Replace: {fidelity_instruction}, {cv_json}, {jd_text}
pub const KEYWORDS_PROMPT_TEMPLATE: &str = r#"{fidelity_instruction}

List the keywords a recruiter or ATS would look for in the job description, and split
them by whether the CV already covers them.

Return a JSON object with this EXACT schema:
{
  "technical": {"present": ["Rust"], "missing": ["Kubernetes"]},
  "soft": {"present": ["mentoring"], "missing": ["stakeholder management"]},
  "explanation": "one or two sentences on the most important gaps"
}

RULES:
1. "technical": languages, frameworks, tools, platforms, methodologies
2. "soft": interpersonal and organisational skills
3. A keyword is "present" only if the CV states it or an unambiguous equivalent
4. Each keyword appears once, in exactly one list

STRUCTURED CV:
{cv_json}

JOB DESCRIPTION:
{jd_text}"#;

/// Score comparison prompt.
/// Replace: {fidelity_instruction}, {cv_json}, {jd_text}
pub const SCORE_PROMPT_TEMPLATE: &str = r#"{fidelity_instruction}

Score how well the CV fits the job description.

Return a JSON object with this EXACT schema:
{
  "score": 72,
  "breakdown": [
    {"category": "technical_skills", "score": 80},
    {"category": "experience", "score": 70},
    {"category": "education", "score": 60},
    {"category": "soft_skills", "score": 75}
  ],
  "strengths": ["..."],
  "gaps": ["..."],
  "recommendations": ["..."]
}

RULES:
1. Every score is a number from 0 to 100
2. "score" is the overall fit, not an average you were told to compute
3. strengths and gaps cite concrete CV content or JD requirements
4. recommendations are actionable edits to the CV

STRUCTURED CV:
{cv_json}

JOB DESCRIPTION:
{jd_text}"#;
