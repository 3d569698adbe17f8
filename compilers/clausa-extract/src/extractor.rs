use std::collections::BTreeMap;

use clausa_graph::{tokens, DependencyGraph};
use clausa_protocol::{Clause, ClauseId, ClauseType, Sentence, SentenceId, TokenId};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::roles::{RoleAnnotator, SyntacticUnit};

/// Document-global clause id allocator. Ids start at 1 and only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseIdSequence {
    next: u32,
}

impl Default for ClauseIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseIdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Continue after the highest id already in use.
    pub fn after(last: Option<ClauseId>) -> Self {
        Self {
            next: last.map_or(1, |id| id.0 + 1),
        }
    }

    pub fn next_id(&mut self) -> ClauseId {
        let id = ClauseId(self.next);
        self.next += 1;
        id
    }

    pub fn peek(&self) -> ClauseId {
        ClauseId(self.next)
    }

    /// Reserve `count` consecutive ids and return the offset to add to
    /// ids allocated from a fresh sequence.
    pub fn reserve(&mut self, count: usize) -> u32 {
        let offset = self.next - 1;
        self.next += count as u32;
        offset
    }
}

/// Why the descent stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The innermost unit is not complex.
    Simple,
    /// The unit was complex but no clause rule matched below `head`.
    /// Non-fatal; clauses built so far are kept.
    Unrecognized { head: TokenId, depth: usize },
    /// The iteration bound (sentence length) was hit. Only reachable on cyclic input.
    DepthLimit { head: TokenId, depth: usize },
}

/// Clauses found in one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub sentence: SentenceId,
    pub clauses: BTreeMap<ClauseId, Clause>,
    pub termination: Termination,
}

impl Extraction {
    /// Shift every clause id and parent link by `offset`.
    pub fn rebase(&mut self, offset: u32) {
        if offset == 0 {
            return;
        }
        let clauses = std::mem::take(&mut self.clauses);
        self.clauses = clauses
            .into_values()
            .map(|mut clause| {
                clause.id = ClauseId(clause.id.0 + offset);
                clause.parent_clause_id = clause.parent_clause_id.map(|p| ClauseId(p.0 + offset));
                (clause.id, clause)
            })
            .collect();
    }
}

/// Loop state of the descent, replaced wholesale on every step.
#[derive(Debug, Clone)]
struct Descent {
    head: TokenId,
    tokens: Vec<TokenId>,
    parent: Option<ClauseId>,
    depth: usize,
    complex: bool,
}

/// Splits a sentence into its matrix clause and nested subordinate clauses.
pub struct ClauseExtractor<'c> {
    config: &'c ExtractorConfig,
    annotator: RoleAnnotator,
}

impl<'c> ClauseExtractor<'c> {
    pub fn new(config: &'c ExtractorConfig) -> Self {
        Self {
            config,
            annotator: RoleAnnotator::new(config),
        }
    }

    pub fn annotator(&self) -> &RoleAnnotator {
        &self.annotator
    }

    /// Annotate `sentence` in place and build its clause hierarchy.
    ///
    /// One subordinate clause is taken per level, the first rule in
    /// `clause_rules` whose label occurs below the current head. The first
    /// level also yields the matrix clause: the sentence minus that clause.
    pub fn extract(
        &self,
        graph: &DependencyGraph,
        sentence: &mut Sentence,
        ids: &mut ClauseIdSequence,
    ) -> Result<Extraction, ExtractError> {
        let sentence_head = graph.head_of(sentence.id)?;
        self.annotator.annotate_unit(graph, sentence_head, sentence);
        let complex = sentence.annotation().map_or(false, |a| a.complex);

        let mut span = sentence.tokens.clone();
        tokens::normalize(&mut span);
        let limit = span.len();

        let mut state = Descent {
            head: sentence_head,
            tokens: span,
            parent: None,
            depth: 0,
            complex,
        };

        let mut clauses = BTreeMap::new();

        let termination = loop {
            if !state.complex {
                break Termination::Simple;
            }
            if state.depth >= limit {
                tracing::warn!(sentence = %sentence.id, head = %state.head, depth = state.depth, "clause descent hit its iteration bound");
                break Termination::DepthLimit {
                    head: state.head,
                    depth: state.depth,
                };
            }

            let found = self
                .config
                .clause_rules
                .iter()
                .find(|rule| graph.is_arc_present_below(state.head, &rule.label))
                .and_then(|rule| {
                    graph
                        .leaves_by_arc(&rule.label, state.head, sentence.id)
                        .map(|(head, tokens)| (rule.clause_type, head, tokens))
                });

            let Some((clause_type, clause_head, clause_tokens)) = found else {
                tracing::warn!(
                    sentence = %sentence.id,
                    head = %state.head,
                    depth = state.depth,
                    "unrecognized subordination; keeping clauses built so far"
                );
                break Termination::Unrecognized {
                    head: state.head,
                    depth: state.depth,
                };
            };

            let mut clause = Clause {
                id: ids.next_id(),
                sentence_id: sentence.id,
                parent_clause_id: state.parent,
                clause_type,
                tokens: clause_tokens,
                annotation: self.annotator.annotate(graph, clause_head),
            };

            if state.depth == 0 {
                let matrix = Clause {
                    id: ids.next_id(),
                    sentence_id: sentence.id,
                    parent_clause_id: None,
                    clause_type: ClauseType::Matrix,
                    tokens: tokens::subtract(&state.tokens, &clause.tokens),
                    annotation: self.annotator.annotate(graph, sentence_head),
                };
                clause.parent_clause_id = Some(matrix.id);

                tracing::debug!(sentence = %sentence.id, clause = %matrix.id, tokens = matrix.tokens.len(), "matrix clause");
                clauses.insert(matrix.id, matrix);
            }

            tracing::debug!(
                sentence = %sentence.id,
                clause = %clause.id,
                clause_type = %clause.clause_type,
                head = %clause_head,
                depth = state.depth,
                "subordinate clause"
            );

            state = Descent {
                head: clause_head,
                tokens: clause.tokens.clone(),
                parent: Some(clause.id),
                depth: state.depth + 1,
                complex: clause.annotation.complex,
            };
            clauses.insert(clause.id, clause);
        };

        Ok(Extraction {
            sentence: sentence.id,
            clauses,
            termination,
        })
    }
}
