use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::assemble::{Assembler, PageKind, PageTemplates};
use crate::competitor::CompetitorSynthesizer;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::store::{LocalFsPageStore, PageStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Competitor,
    Content,
    Assemble,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingest => "ingest",
            Stage::Competitor => "competitor",
            Stage::Content => "content",
            Stage::Assemble => "assemble",
        };
        f.write_str(name)
    }
}

/// Receives progress narration; the stages themselves never log it.
pub trait PipelineObserver {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_finished(&self, _stage: Stage, _detail: &str) {}
    fn stage_failed(&self, _stage: Stage, _error: &PipelineError) {}
    fn page_written(&self, _kind: PageKind, _path: &Path) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn stage_started(&self, stage: Stage) {
        tracing::info!(%stage, "stage started");
    }

    fn stage_finished(&self, stage: Stage, detail: &str) {
        tracing::info!(%stage, detail, "stage finished");
    }

    fn stage_failed(&self, stage: Stage, error: &PipelineError) {
        tracing::error!(%stage, error = %error, "stage failed");
    }

    fn page_written(&self, kind: PageKind, path: &Path) {
        tracing::info!(page_type = kind.page_type(), path = %path.display(), "page written");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub product_name: String,
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    input: PathBuf,
    templates: PageTemplates,
    synthesizer: CompetitorSynthesizer,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let templates = match config.template_dir.as_deref() {
            Some(dir) => PageTemplates::from_dir(dir)?,
            None => PageTemplates::builtin()?,
        };
        Ok(Self {
            input: config.input.clone(),
            templates,
            synthesizer: CompetitorSynthesizer::new(config.competitor.clone()),
        })
    }

    /// Runs every stage in order and stops at the first error. Pages written
    /// before a failed write are left in place.
    pub fn run(
        &self,
        store: &dyn PageStore,
        observer: &dyn PipelineObserver,
        date: NaiveDate,
    ) -> Result<RunReport> {
        let product = stage(
            observer,
            Stage::Ingest,
            || crate::ingest::ingest(&self.input),
            |product| format!("parsed {}", product.name),
        )?;

        let competitor = stage(
            observer,
            Stage::Competitor,
            || self.synthesizer.synthesize(&product),
            |competitor| format!("generated {}", competitor.product.name),
        )?;

        let content = stage(
            observer,
            Stage::Content,
            || crate::content::generate(&product),
            |content| {
                format!(
                    "{} questions, {} answers",
                    content.user_questions.len(),
                    content.faq_q_a_pairs.len()
                )
            },
        )?;

        let pages = stage(
            observer,
            Stage::Assemble,
            || {
                Assembler::new(&product, &competitor, &content, date)?
                    .assemble_all(&self.templates)
            },
            |pages| format!("{} pages", pages.len()),
        )?;

        let mut written = Vec::with_capacity(pages.len());
        for page in &pages {
            let path = store
                .put(page.kind.file_name(), &page.document)
                .inspect_err(|err| observer.stage_failed(Stage::Assemble, err))?;
            observer.page_written(page.kind, &path);
            written.push(path);
        }

        Ok(RunReport {
            product_name: product.name,
            written,
        })
    }
}

fn stage<T>(
    observer: &dyn PipelineObserver,
    stage: Stage,
    run: impl FnOnce() -> Result<T>,
    describe: impl FnOnce(&T) -> String,
) -> Result<T> {
    observer.stage_started(stage);
    match run() {
        Ok(value) => {
            observer.stage_finished(stage, &describe(&value));
            Ok(value)
        }
        Err(err) => {
            observer.stage_failed(stage, &err);
            Err(err)
        }
    }
}

/// Runs the pipeline with the local output directory, tracing narration and
/// today's date.
pub fn run(config: &PipelineConfig) -> Result<RunReport> {
    let pipeline = Pipeline::new(config)?;
    let store = LocalFsPageStore::new(&config.output_dir);
    let today = chrono::Local::now().date_naive();

    let report = pipeline.run(&store, &TracingObserver, today)?;
    tracing::info!(
        out_dir = %store.out_dir().display(),
        pages = report.written.len(),
        "all pages written"
    );
    Ok(report)
}
