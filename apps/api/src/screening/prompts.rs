//! Task instructions for the three screening actions.

use crate::llm_client::prompts::{STRUCTURED_PERCENTAGE_INSTRUCTION, TECH_DOMAINS};

/// Which screening action an instruction is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Narrative review of one resume.
    Review,
    /// Percentage match of one resume, with missing keywords.
    Match,
    /// Percentage only, used when ranking a batch.
    Rank,
}

const REVIEW_PROMPT: &str = "\
You are a senior technical recruiter with hands-on engineering experience in:
{domains}

Review the attached resume against the job description below, paying attention to \
the job title and the technologies it names. Structure your evaluation as:
1. **Overall Fit:** a short summary of how suitable the candidate is.
2. **Strengths:** where the candidate clearly meets the requirements.
3. **Weaknesses:** where the profile falls short of the requirements.
4. **Recommendation:** whether to move the candidate forward, and why.";

const MATCH_PROMPT: &str = "\
You are an applicant tracking system scanner tuned for these areas:
{domains}

Score the attached resume against the job description below. Answer in this format:
1. **Percentage Match:** how closely the resume matches the job description.
2. **Keywords Missing:** important skills or keywords absent from the resume.
3. **Final Thoughts:** any further observations on the candidate's alignment.

{structured}";

const RANK_PROMPT: &str = "\
You rank resumes for technical roles in these areas:
{domains}

Estimate how well the attached resume matches the job description below and \
answer with that estimate as a percentage.

{structured}";

/// Builds the full instruction for `task`, embedding the job description.
pub fn instruction(task: Task, job_description: &str) -> String {
    let template = match task {
        Task::Review => REVIEW_PROMPT,
        Task::Match => MATCH_PROMPT,
        Task::Rank => RANK_PROMPT,
    };
    let body = template
        .replace("{domains}", TECH_DOMAINS)
        .replace("{structured}", STRUCTURED_PERCENTAGE_INSTRUCTION);

    format!(
        "{}\n\nJob Description:\n{}",
        body.trim_end(),
        job_description.trim()
    )
}
