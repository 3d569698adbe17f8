use clausa_graph::DependencyGraph;
use clausa_protocol::labels::{NEG, NSUBJ};
use clausa_protocol::{Annotation, Clause, GrammarObject, LabelClass, Sentence, TokenId, Transitivity, ROLE_TABLE};

use crate::config::{ExtractorConfig, RoleConflict};

/// A sentence or clause that receives an annotation.
pub trait SyntacticUnit {
    fn annotation(&self) -> Option<&Annotation>;
    fn set_annotation(&mut self, annotation: Annotation);
}

impl SyntacticUnit for Sentence {
    fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    fn set_annotation(&mut self, annotation: Annotation) {
        self.annotation = Some(annotation);
    }
}

impl SyntacticUnit for Clause {
    fn annotation(&self) -> Option<&Annotation> {
        Some(&self.annotation)
    }

    fn set_annotation(&mut self, annotation: Annotation) {
        self.annotation = annotation;
    }
}

/// Computes root, main verb, roles, compound/complex, transitivity and negation
/// for the unit headed by a token.
#[derive(Debug, Clone, Copy)]
pub struct RoleAnnotator {
    role_conflict: RoleConflict,
    verb_marker: char,
}

impl Default for RoleAnnotator {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl RoleAnnotator {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            role_conflict: config.role_conflict,
            verb_marker: config.verb_marker,
        }
    }

    pub fn annotate(&self, graph: &DependencyGraph, head: TokenId) -> Annotation {
        let mut annotation = Annotation::new(head);

        if self.is_verb(graph, head) {
            annotation.main_verb = Some(grammar_object(graph, head));
        }

        for rule in ROLE_TABLE.iter() {
            let Some(found) = graph.child_with_arc(head, rule.label, rule.follow) else {
                continue;
            };
            if self.role_conflict == RoleConflict::KeepFirst && annotation.role(rule.role).is_some() {
                continue;
            }
            *annotation.role_mut(rule.role) = Some(grammar_object(graph, found));
        }

        annotation.compound = graph.is_class_present_below(head, LabelClass::COORDINATING);
        annotation.complex = graph.is_class_present_below(head, LabelClass::SUBORDINATING);

        if annotation.main_verb.is_some() {
            annotation.transitivity = if annotation.indirect_object.is_some() {
                Some(Transitivity::Ditransitive)
            } else if annotation.object.is_some() {
                Some(Transitivity::Transitive)
            } else if !annotation.complex && graph.child_with_arc(head, NSUBJ, &[]).is_some() {
                Some(Transitivity::Intransitive)
            } else {
                None
            };
        }

        annotation.negated = graph.child_with_arc(head, NEG, &[]).is_some();

        tracing::trace!(
            head = %head,
            complex = annotation.complex,
            compound = annotation.compound,
            negated = annotation.negated,
            "unit annotated"
        );

        annotation
    }

    /// Annotate `unit` in place, replacing any previous annotation.
    pub fn annotate_unit<U: SyntacticUnit>(&self, graph: &DependencyGraph, head: TokenId, unit: &mut U) {
        unit.set_annotation(self.annotate(graph, head));
    }

    fn is_verb(&self, graph: &DependencyGraph, head: TokenId) -> bool {
        graph.token(head).map_or(false, |token| {
            token.upos.starts_with(self.verb_marker) || token.xpos.starts_with(self.verb_marker)
        })
    }
}

fn grammar_object(graph: &DependencyGraph, head: TokenId) -> GrammarObject {
    GrammarObject {
        head,
        semantic: graph.collect_compounds(head),
        phrase: graph.leaves(head),
    }
}
