use clausa_graph::DependencyGraph;
use clausa_protocol::{Document, Sentence, SentenceId};
use rayon::prelude::*;

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::extractor::{ClauseExtractor, ClauseIdSequence, Extraction, Termination};

/// What happened to one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceOutcome {
    pub sentence: SentenceId,
    pub clauses: usize,
    pub termination: Termination,
}

impl From<&Extraction> for SentenceOutcome {
    fn from(extraction: &Extraction) -> Self {
        Self {
            sentence: extraction.sentence,
            clauses: extraction.clauses.len(),
            termination: extraction.termination,
        }
    }
}

fn sequence_for(doc: &Document) -> ClauseIdSequence {
    ClauseIdSequence::after(doc.clauses.keys().next_back().copied())
}

/// Annotate a copy of `sentence`; `doc` is only read.
fn stage(
    doc: &Document,
    sentence: &Sentence,
    ids: &mut ClauseIdSequence,
    config: &ExtractorConfig,
) -> Result<(Sentence, Extraction), ExtractError> {
    let graph = DependencyGraph::for_sentence(doc, sentence);
    let mut annotated = sentence.clone();
    let extraction = ClauseExtractor::new(config).extract(&graph, &mut annotated, ids)?;
    Ok((annotated, extraction))
}

fn commit(doc: &mut Document, annotated: Sentence, extraction: Extraction) -> SentenceOutcome {
    let outcome = SentenceOutcome::from(&extraction);
    if let Some(slot) = doc.sentences.iter_mut().find(|s| s.id == annotated.id) {
        *slot = annotated;
    }
    doc.clauses.extend(extraction.clauses);
    outcome
}

/// Annotate one sentence of `doc` and merge its clauses into the clause table.
pub fn annotate_sentence(
    doc: &mut Document,
    sentence: SentenceId,
    ids: &mut ClauseIdSequence,
    config: &ExtractorConfig,
) -> Result<SentenceOutcome, ExtractError> {
    let current = doc.sentence(sentence).ok_or(ExtractError::UnknownSentence(sentence))?;
    let (annotated, extraction) = stage(doc, current, ids, config)?;
    Ok(commit(doc, annotated, extraction))
}

/// Annotate every sentence in order. Clause ids continue after any already in `doc`.
///
/// Nothing is written to `doc` unless every sentence succeeds.
pub fn annotate_document(doc: &mut Document, config: &ExtractorConfig) -> Result<Vec<SentenceOutcome>, ExtractError> {
    let mut ids = sequence_for(doc);
    let shared: &Document = doc;
    let staged = shared
        .sentences
        .iter()
        .map(|sentence| stage(shared, sentence, &mut ids, config))
        .collect::<Result<Vec<_>, _>>()?;

    let outcomes: Vec<SentenceOutcome> = staged
        .into_iter()
        .map(|(annotated, extraction)| commit(doc, annotated, extraction))
        .collect();

    tracing::debug!(document = %doc.id, sentences = outcomes.len(), clauses = doc.clauses.len(), "document annotated");
    Ok(outcomes)
}

/// Same result as [`annotate_document`], with sentences analysed on the rayon pool.
///
/// Each sentence numbers its clauses from 1; id ranges are then reserved in
/// sentence order and every extraction is rebased onto its range.
pub fn annotate_document_parallel(
    doc: &mut Document,
    config: &ExtractorConfig,
) -> Result<Vec<SentenceOutcome>, ExtractError> {
    let shared: &Document = doc;
    let staged = shared
        .sentences
        .par_iter()
        .map(|sentence| stage(shared, sentence, &mut ClauseIdSequence::new(), config))
        .collect::<Result<Vec<_>, _>>()?;

    let mut ids = sequence_for(doc);
    let mut outcomes = Vec::with_capacity(staged.len());

    for (annotated, mut extraction) in staged {
        extraction.rebase(ids.reserve(extraction.clauses.len()));
        outcomes.push(commit(doc, annotated, extraction));
    }

    tracing::debug!(document = %doc.id, sentences = outcomes.len(), clauses = doc.clauses.len(), "document annotated in parallel");
    Ok(outcomes)
}
