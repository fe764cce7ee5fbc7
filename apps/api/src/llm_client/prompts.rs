// Shared prompt fragments.
// Task-specific instructions live in screening/prompts.rs alongside the reporter.

/// Label the model is asked to put in front of its match estimate.
/// The extractor looks for exactly this label before falling back to a token scan.
pub const PERCENTAGE_LABEL: &str = "Percentage Match";

/// Domains the screening persona is expected to know.
pub const TECH_DOMAINS: &str = "\
    1. Data science\n\
    2. Full-stack web development\n\
    3. Big data engineering\n\
    4. Software engineering\n\
    5. Software testing\n\
    6. DevOps\n\
    7. Data analysis";

/// Instruction appended whenever a numeric match is expected back.
pub const STRUCTURED_PERCENTAGE_INSTRUCTION: &str = "\
    Begin your answer with a line of the exact form `Percentage Match: NN%`, \
    where NN is a number between 0 and 100. Do not put any other percentage \
    before that line.";
