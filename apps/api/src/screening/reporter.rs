//! MatchReporter — runs resumes through the document converter and the text
//! generator, extracts match scores, and tells a `Presenter` what to show.
//!
//! Evaluation is strictly sequential: each resume is converted, sent to the
//! model and scored before the next one starts. Collaborator failures are not
//! retried here; they end the current operation.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::document::{self, discover_resumes, DocumentConverter, DocumentSource};
use crate::llm_client::TextGenerator;
use crate::screening::bucketer::{bucket, ScoreBucketHistogram};
use crate::screening::charts::{distribution_chart, match_chart, DistributionChart, MatchChart};
use crate::screening::extractor::{score_response, ScoreSource};
use crate::screening::prompts::{instruction, Task};
use crate::screening::ScreeningError;

pub const NO_SCORE_NOTICE: &str = "Could not extract match percentage from the response.";
pub const NO_SCORES_IN_BATCH_NOTICE: &str =
    "No valid match percentages could be extracted from the responses.";

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// One resume, one task. Built per resume and consumed by a single model call.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub job_description: String,
    pub resume: Option<DocumentSource>,
    pub instruction: String,
}

impl EvaluationRequest {
    /// Builds the request with the task instruction for `job_description` embedded.
    pub fn for_task(task: Task, job_description: &str, resume: Option<DocumentSource>) -> Self {
        Self {
            job_description: job_description.to_string(),
            resume,
            instruction: instruction(task, job_description),
        }
    }
}

/// A resume in a batch. `source` is `None` when no document was supplied for it.
#[derive(Debug, Clone)]
pub struct ResumeInput {
    pub id: String,
    pub source: Option<DocumentSource>,
}

impl From<DocumentSource> for ResumeInput {
    fn from(source: DocumentSource) -> Self {
        Self {
            id: source.name(),
            source: Some(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleEvaluation {
    pub response: String,
    pub score: Option<f64>,
    pub score_source: Option<ScoreSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Scored {
        response: String,
        score: f64,
        score_source: ScoreSource,
    },
    ScoreAbsent {
        response: String,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub resume_id: String,
    #[serde(flatten)]
    pub outcome: EntryOutcome,
}

impl BatchEntry {
    pub fn score(&self) -> Option<f64> {
        match self.outcome {
            EntryOutcome::Scored { score, .. } => Some(score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEvaluation {
    /// One entry per input resume, in input order.
    pub entries: Vec<BatchEntry>,
    /// `None` when no score could be extracted from any response.
    pub histogram: Option<ScoreBucketHistogram>,
}

// ────────────────────────────────────────────────────────────────────────────
// Presentation collaborator
// ────────────────────────────────────────────────────────────────────────────

/// Receives everything the reporter wants shown, in display order.
pub trait Presenter {
    fn heading(&mut self, text: &str);
    fn text(&mut self, text: &str);
    fn notice(&mut self, text: &str);
    fn match_chart(&mut self, chart: MatchChart);
    fn distribution_chart(&mut self, chart: DistributionChart);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ReportItem {
    Heading(String),
    Text(String),
    Notice(String),
    MatchChart(MatchChart),
    DistributionChart(DistributionChart),
}

/// Presenter that records report items for a JSON response.
#[derive(Debug, Default)]
pub struct ReportCollector {
    items: Vec<ReportItem>,
}

impl ReportCollector {
    pub fn items(&self) -> &[ReportItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ReportItem> {
        self.items
    }
}

impl Presenter for ReportCollector {
    fn heading(&mut self, text: &str) {
        self.items.push(ReportItem::Heading(text.to_string()));
    }

    fn text(&mut self, text: &str) {
        self.items.push(ReportItem::Text(text.to_string()));
    }

    fn notice(&mut self, text: &str) {
        self.items.push(ReportItem::Notice(text.to_string()));
    }

    fn match_chart(&mut self, chart: MatchChart) {
        self.items.push(ReportItem::MatchChart(chart));
    }

    fn distribution_chart(&mut self, chart: DistributionChart) {
        self.items.push(ReportItem::DistributionChart(chart));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reporter
// ────────────────────────────────────────────────────────────────────────────

pub struct MatchReporter<P> {
    generator: Arc<dyn TextGenerator>,
    converter: Arc<dyn DocumentConverter>,
    presenter: P,
}

impl<P: Presenter> MatchReporter<P> {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        converter: Arc<dyn DocumentConverter>,
        presenter: P,
    ) -> Self {
        Self {
            generator,
            converter,
            presenter,
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Converts the resume, asks the model, and extracts a score. Shows nothing.
    pub async fn evaluate_single(
        &self,
        request: &EvaluationRequest,
    ) -> Result<SingleEvaluation, ScreeningError> {
        let representation =
            document::prepare(self.converter.as_ref(), request.resume.as_ref()).await?;

        debug!(
            "Evaluating resume against a {}-char job description",
            request.job_description.len()
        );

        let response = self
            .generator
            .generate(&request.instruction, &representation)
            .await?;

        let scored = score_response(&response);
        match scored {
            Some((score, source)) => debug!("Extracted match score {score} via {source:?}"),
            None => warn!("Model response contained no recognizable percentage"),
        }

        Ok(SingleEvaluation {
            response,
            score: scored.map(|(score, _)| score),
            score_source: scored.map(|(_, source)| source),
        })
    }

    /// Shows the response and, when a score was found, its match chart.
    pub fn report_single(&mut self, evaluation: &SingleEvaluation) {
        self.presenter.heading("The Response is");
        match evaluation.score {
            Some(score) => {
                self.presenter.heading("Percentage Match Graph");
                self.presenter.match_chart(match_chart(score));
            }
            None => self.presenter.notice(NO_SCORE_NOTICE),
        }
        self.presenter.text(&evaluation.response);
    }

    /// Narrative review: the response is shown as-is, no score is looked for.
    pub async fn review(&mut self, request: &EvaluationRequest) -> Result<String, ScreeningError> {
        let representation =
            document::prepare(self.converter.as_ref(), request.resume.as_ref()).await?;
        let response = self
            .generator
            .generate(&request.instruction, &representation)
            .await?;

        self.presenter.heading("The Response is");
        self.presenter.text(&response);
        Ok(response)
    }

    /// Evaluates every resume in order. Resumes without a document are skipped;
    /// the remaining scores are bucketed and shown as a distribution chart.
    pub async fn evaluate_batch(
        &mut self,
        job_description: &str,
        resumes: Vec<ResumeInput>,
        instruction: &str,
    ) -> Result<BatchEvaluation, ScreeningError> {
        if resumes.is_empty() {
            return Err(ScreeningError::NoInputsFound(
                "No resumes were supplied".to_string(),
            ));
        }

        info!("Evaluating batch of {} resume(s)", resumes.len());

        let mut entries = Vec::with_capacity(resumes.len());
        let mut scores = Vec::new();

        for resume in resumes {
            let request = EvaluationRequest {
                job_description: job_description.to_string(),
                resume: resume.source,
                instruction: instruction.to_string(),
            };

            let evaluation = match self.evaluate_single(&request).await {
                Ok(evaluation) => evaluation,
                Err(ScreeningError::MissingInput) => {
                    warn!("Skipping {}: no document supplied", resume.id);
                    self.presenter
                        .notice(&format!("Skipped {}: please upload the resume.", resume.id));
                    entries.push(BatchEntry {
                        resume_id: resume.id,
                        outcome: EntryOutcome::Skipped {
                            reason: ScreeningError::MissingInput.to_string(),
                        },
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.presenter.heading(&format!("Processing: {}", resume.id));
            self.presenter.heading("The Response is");
            self.presenter.text(&evaluation.response);

            let outcome = match (evaluation.score, evaluation.score_source) {
                (Some(score), Some(score_source)) => {
                    scores.push(score);
                    EntryOutcome::Scored {
                        response: evaluation.response,
                        score,
                        score_source,
                    }
                }
                _ => {
                    self.presenter.notice(NO_SCORE_NOTICE);
                    EntryOutcome::ScoreAbsent {
                        response: evaluation.response,
                    }
                }
            };

            entries.push(BatchEntry {
                resume_id: resume.id,
                outcome,
            });
        }

        let histogram = if scores.is_empty() {
            self.presenter.notice(NO_SCORES_IN_BATCH_NOTICE);
            None
        } else {
            let histogram = bucket(&scores);
            self.presenter.heading("Resume Ranks");
            self.presenter.distribution_chart(distribution_chart(&histogram));
            Some(histogram)
        };

        info!(
            "Batch complete: {} entries, {} scored",
            entries.len(),
            scores.len()
        );

        Ok(BatchEvaluation { entries, histogram })
    }

    /// Batch over every PDF in `dir`, in file-name order.
    pub async fn evaluate_directory(
        &mut self,
        job_description: &str,
        dir: &Path,
        instruction: &str,
    ) -> Result<BatchEvaluation, ScreeningError> {
        let files = discover_resumes(dir).await?;
        let resumes = files
            .into_iter()
            .map(|path| ResumeInput::from(DocumentSource::Path(path)))
            .collect();
        self.evaluate_batch(job_description, resumes, instruction)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::document::{DocumentError, DocumentRepresentation};
    use crate::llm_client::LlmError;

    /// Representation is the document name; the generator answers by name.
    struct NameConverter;

    #[async_trait]
    impl DocumentConverter for NameConverter {
        async fn convert(
            &self,
            source: &DocumentSource,
        ) -> Result<DocumentRepresentation, DocumentError> {
            if source.name() == "empty.pdf" {
                return Err(DocumentError::NoPages(source.name()));
            }
            Ok(DocumentRepresentation::Text(source.name()))
        }
    }

    #[derive(Default)]
    struct ScriptedGenerator {
        answers: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn with(answers: &[(&str, &str)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _instruction: &str,
            resume: &DocumentRepresentation,
        ) -> Result<String, LlmError> {
            let DocumentRepresentation::Text(name) = resume else {
                return Err(LlmError::EmptyContent);
            };
            self.calls.lock().unwrap().push(name.clone());
            self.answers.get(name).cloned().ok_or(LlmError::Api {
                status: 503,
                message: format!("no answer for {name}"),
            })
        }
    }

    fn upload(name: &str) -> DocumentSource {
        DocumentSource::Bytes {
            name: name.to_string(),
            data: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    fn reporter(generator: Arc<ScriptedGenerator>) -> MatchReporter<ReportCollector> {
        MatchReporter::new(generator, Arc::new(NameConverter), ReportCollector::default())
    }

    fn charts(items: &[ReportItem]) -> (Vec<&MatchChart>, Vec<&DistributionChart>) {
        let matches = items
            .iter()
            .filter_map(|i| match i {
                ReportItem::MatchChart(c) => Some(c),
                _ => None,
            })
            .collect();
        let distributions = items
            .iter()
            .filter_map(|i| match i {
                ReportItem::DistributionChart(c) => Some(c),
                _ => None,
            })
            .collect();
        (matches, distributions)
    }

    #[tokio::test]
    async fn test_single_evaluation_renders_match_chart() {
        let generator = Arc::new(ScriptedGenerator::with(&[(
            "cv.pdf",
            "Percentage Match: 72%\nKeywords Missing: Kubernetes\nFinal Thoughts: solid candidate",
        )]));
        let mut reporter = reporter(generator);
        let request = EvaluationRequest::for_task(Task::Match, "Platform engineer", Some(upload("cv.pdf")));

        let evaluation = reporter.evaluate_single(&request).await.unwrap();
        assert_eq!(evaluation.score, Some(72.0));
        assert_eq!(evaluation.score_source, Some(ScoreSource::Structured));
        assert!(reporter.presenter().items().is_empty());

        reporter.report_single(&evaluation);
        let items = reporter.into_presenter().into_items();
        let (matches, distributions) = charts(&items);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].values(), Some((72.0, 28.0)));
        assert!(distributions.is_empty());
    }

    #[tokio::test]
    async fn test_single_without_score_reports_notice_and_no_chart() {
        let generator = Arc::new(ScriptedGenerator::with(&[("cv.pdf", "Strong profile overall.")]));
        let mut reporter = reporter(generator);
        let request = EvaluationRequest::for_task(Task::Match, "jd", Some(upload("cv.pdf")));

        let evaluation = reporter.evaluate_single(&request).await.unwrap();
        assert_eq!(evaluation.score, None);
        reporter.report_single(&evaluation);

        let items = reporter.into_presenter().into_items();
        assert!(items.contains(&ReportItem::Notice(NO_SCORE_NOTICE.to_string())));
        assert!(charts(&items).0.is_empty());
    }

    #[tokio::test]
    async fn test_single_without_document_is_missing_input() {
        let generator = Arc::new(ScriptedGenerator::default());
        let reporter = reporter(generator.clone());
        let request = EvaluationRequest::for_task(Task::Match, "jd", None);

        let err = reporter.evaluate_single(&request).await.unwrap_err();
        assert!(matches!(err, ScreeningError::MissingInput));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_review_shows_text_only() {
        let generator = Arc::new(ScriptedGenerator::with(&[("cv.pdf", "Overall Fit: 90% aligned")]));
        let mut reporter = reporter(generator);
        let request = EvaluationRequest::for_task(Task::Review, "jd", Some(upload("cv.pdf")));

        let response = reporter.review(&request).await.unwrap();
        assert_eq!(response, "Overall Fit: 90% aligned");
        let items = reporter.into_presenter().into_items();
        assert_eq!(items.last(), Some(&ReportItem::Text(response)));
        assert!(charts(&items).0.is_empty());
    }

    #[tokio::test]
    async fn test_batch_histogram_uses_only_extracted_scores() {
        let generator = Arc::new(ScriptedGenerator::with(&[
            ("a.pdf", "Percentage Match: 10%"),
            ("b.pdf", "I would say 60% overall"),
            ("c.pdf", "Percentage Match: 95%"),
            ("d.pdf", "Hard to say without more detail."),
        ]));
        let mut reporter = reporter(generator.clone());
        let resumes = ["a.pdf", "b.pdf", "c.pdf", "d.pdf"]
            .into_iter()
            .map(|n| ResumeInput::from(upload(n)))
            .collect();

        let batch = reporter
            .evaluate_batch("jd", resumes, &instruction(Task::Rank, "jd"))
            .await
            .unwrap();

        assert_eq!(batch.entries.len(), 4);
        let ids: Vec<_> = batch.entries.iter().map(|e| e.resume_id.as_str()).collect();
        assert_eq!(ids, vec!["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);
        assert!(matches!(batch.entries[3].outcome, EntryOutcome::ScoreAbsent { .. }));
        assert_eq!(batch.histogram.unwrap().counts, [1, 0, 1, 1]);
        assert_eq!(generator.calls(), vec!["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);

        let items = reporter.into_presenter().into_items();
        let (_, distributions) = charts(&items);
        assert_eq!(distributions.len(), 1);
        let counts: Vec<_> = distributions[0].bars.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 1]);
    }

    #[tokio::test]
    async fn test_batch_skips_missing_document_and_continues() {
        let generator = Arc::new(ScriptedGenerator::with(&[("b.pdf", "Percentage Match: 40%")]));
        let mut reporter = reporter(generator.clone());
        let resumes = vec![
            ResumeInput {
                id: "a.pdf".to_string(),
                source: None,
            },
            ResumeInput::from(upload("b.pdf")),
        ];

        let batch = reporter.evaluate_batch("jd", resumes, "rank").await.unwrap();

        assert!(matches!(batch.entries[0].outcome, EntryOutcome::Skipped { .. }));
        assert_eq!(batch.entries[1].score(), Some(40.0));
        assert_eq!(batch.histogram.unwrap().counts, [0, 1, 0, 0]);
        assert_eq!(generator.calls(), vec!["b.pdf"]);
    }

    #[tokio::test]
    async fn test_batch_without_any_score_renders_no_chart() {
        let generator = Arc::new(ScriptedGenerator::with(&[("a.pdf", "no idea")]));
        let mut reporter = reporter(generator);

        let batch = reporter
            .evaluate_batch("jd", vec![ResumeInput::from(upload("a.pdf"))], "rank")
            .await
            .unwrap();

        assert!(batch.histogram.is_none());
        let items = reporter.into_presenter().into_items();
        assert!(items.contains(&ReportItem::Notice(NO_SCORES_IN_BATCH_NOTICE.to_string())));
        assert!(charts(&items).1.is_empty());
    }

    #[tokio::test]
    async fn test_batch_generation_failure_aborts_without_chart() {
        let generator = Arc::new(ScriptedGenerator::with(&[("a.pdf", "Percentage Match: 80%")]));
        let mut reporter = reporter(generator.clone());
        let resumes = ["a.pdf", "unknown.pdf", "c.pdf"]
            .into_iter()
            .map(|n| ResumeInput::from(upload(n)))
            .collect();

        let err = reporter.evaluate_batch("jd", resumes, "rank").await.unwrap_err();

        assert!(matches!(err, ScreeningError::Generation(LlmError::Api { status: 503, .. })));
        assert_eq!(generator.calls(), vec!["a.pdf", "unknown.pdf"]);
        assert!(charts(reporter.presenter().items()).1.is_empty());
    }

    #[tokio::test]
    async fn test_batch_document_failure_propagates() {
        let generator = Arc::new(ScriptedGenerator::default());
        let mut reporter = reporter(generator);

        let err = reporter
            .evaluate_batch("jd", vec![ResumeInput::from(upload("empty.pdf"))], "rank")
            .await
            .unwrap_err();
        assert!(matches!(err, ScreeningError::Document(DocumentError::NoPages(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_is_no_inputs() {
        let mut reporter = reporter(Arc::new(ScriptedGenerator::default()));
        let err = reporter.evaluate_batch("jd", vec![], "rank").await.unwrap_err();
        assert!(matches!(err, ScreeningError::NoInputsFound(_)));
        assert_eq!(err.to_string(), "No resumes were supplied");
    }

    #[tokio::test]
    async fn test_directory_without_pdfs_is_no_inputs_and_no_chart() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"not a resume").unwrap();
        let mut reporter = reporter(Arc::new(ScriptedGenerator::default()));

        let err = reporter
            .evaluate_directory("jd", dir.path(), "rank")
            .await
            .unwrap_err();

        assert!(matches!(err, ScreeningError::NoInputsFound(_)));
        assert_eq!(err.to_string(), "No PDF files found in the directory");
        assert!(reporter.presenter().items().is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut reporter = reporter(Arc::new(ScriptedGenerator::default()));
        let err = reporter
            .evaluate_directory("jd", &dir.path().join("gone"), "rank")
            .await
            .unwrap_err();
        assert!(matches!(err, ScreeningError::DirectoryNotFound(_)));
    }

    #[tokio::test]
    async fn test_directory_batch_runs_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.pdf"] {
            std::fs::write(dir.path().join(name), b"%PDF").unwrap();
        }
        let generator = Arc::new(ScriptedGenerator::with(&[
            ("a.pdf", "Percentage Match: 30%"),
            ("b.pdf", "Percentage Match: 55%"),
        ]));
        let mut reporter = reporter(generator.clone());

        let batch = reporter
            .evaluate_directory("jd", dir.path(), "rank")
            .await
            .unwrap();

        assert_eq!(generator.calls(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(batch.histogram.unwrap().counts, [0, 1, 1, 0]);
    }

    #[test]
    fn test_batch_entry_serializes_flat() {
        let entry = BatchEntry {
            resume_id: "a.pdf".to_string(),
            outcome: EntryOutcome::ScoreAbsent {
                response: "n/a".to_string(),
            },
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["status"], "score_absent");
        assert_eq!(value["resume_id"], "a.pdf");
    }
}
