use std::collections::HashMap;

use clausa_protocol::labels::{COORDINATING_LABELS, ROOT};
use clausa_protocol::{Arc, Document, LabelClass, Sentence, SentenceId, Token, TokenId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};

use crate::error::GraphError;

/// The incoming arc of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Attachment {
    governor: TokenId,
    label: String,
}

/// One sentence's tokens and arcs, indexed for subtree and child queries.
///
/// Edges run governor -> dependent and carry the arc label. The virtual root
/// (`TokenId::ROOT`) is not a node; arcs hanging from it are only recorded as
/// attachments so `head_of` can find them.
pub struct DependencyGraph {
    sentence: SentenceId,
    graph: DiGraph<Token, String>,
    index_map: HashMap<TokenId, NodeIndex>,
    attachments: HashMap<TokenId, Attachment>,
}

impl DependencyGraph {
    pub fn new<'a>(
        sentence: SentenceId,
        tokens: impl IntoIterator<Item = &'a Token>,
        arcs: impl IntoIterator<Item = &'a Arc>,
    ) -> Self {
        let mut graph = Self {
            sentence,
            graph: DiGraph::new(),
            index_map: HashMap::new(),
            attachments: HashMap::new(),
        };

        for token in tokens {
            graph.add_token(token.clone());
        }

        for arc in arcs.into_iter().filter(|a| a.sentence_id == sentence) {
            graph.add_arc(arc);
        }

        tracing::trace!(
            sentence = %sentence,
            tokens = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "dependency graph built"
        );

        graph
    }

    /// Graph for one sentence of a document: the tokens in its range and its arcs.
    pub fn for_sentence(doc: &Document, sentence: &Sentence) -> Self {
        Self::new(sentence.id, doc.sentence_tokens(sentence), doc.sentence_arcs(sentence.id))
    }

    fn add_token(&mut self, token: Token) -> NodeIndex {
        if let Some(idx) = self.index_map.get(&token.id) {
            return *idx;
        }
        let id = token.id;
        let idx = self.graph.add_node(token);
        self.index_map.insert(id, idx);
        idx
    }

    /// Arcs may mention tokens missing from the token list; they get untagged nodes.
    fn ensure_node(&mut self, id: TokenId) -> NodeIndex {
        match self.index_map.get(&id) {
            Some(idx) => *idx,
            None => self.add_token(Token::new(id.0, "", "", "")),
        }
    }

    fn add_arc(&mut self, arc: &Arc) {
        let dependent = self.ensure_node(arc.dependent);
        self.attachments.insert(
            arc.dependent,
            Attachment {
                governor: arc.governor,
                label: arc.label.clone(),
            },
        );

        if !arc.governor.is_root() {
            let governor = self.ensure_node(arc.governor);
            self.graph.add_edge(governor, dependent, arc.label.clone());
        }
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.index_map.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Label of the arc attaching `id` to its governor.
    pub fn label_of(&self, id: TokenId) -> Option<&str> {
        self.attachments.get(&id).map(|a| a.label.as_str())
    }

    pub fn governor_of(&self, id: TokenId) -> Option<TokenId> {
        self.attachments.get(&id).map(|a| a.governor)
    }

    /// The single token attached with the `root` label.
    pub fn head_of(&self, sentence: SentenceId) -> Result<TokenId, GraphError> {
        let mut roots: Vec<TokenId> = if sentence == self.sentence {
            self.attachments
                .iter()
                .filter(|(_, a)| a.label == ROOT)
                .map(|(id, _)| *id)
                .collect()
        } else {
            Vec::new()
        };

        match roots.len() {
            1 => Ok(roots.remove(0)),
            n => Err(GraphError::MalformedParse { sentence, roots: n }),
        }
    }

    /// Direct dependents of `head` with their arc labels, ascending by id.
    pub fn dependents(&self, head: TokenId) -> Vec<(TokenId, &str)> {
        let Some(idx) = self.index_map.get(&head) else {
            return Vec::new();
        };

        let mut out: Vec<(TokenId, &str)> = self
            .graph
            .edges(*idx)
            .map(|edge| (self.graph[edge.target()].id, edge.weight().as_str()))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    /// Every token dominated by `head`, `head` included, in traversal order.
    fn subtree(&self, head: TokenId) -> Vec<NodeIndex> {
        let Some(idx) = self.index_map.get(&head) else {
            return Vec::new();
        };

        let mut dfs = Dfs::new(&self.graph, *idx);
        let mut nodes = Vec::new();
        while let Some(nx) = dfs.next(&self.graph) {
            nodes.push(nx);
        }
        nodes
    }

    /// Labels of all arcs whose governor lies in the subtree of `head`.
    fn labels_below(&self, head: TokenId) -> impl Iterator<Item = &str> + '_ {
        self.subtree(head)
            .into_iter()
            .flat_map(move |nx| self.graph.edges(nx).map(|edge| edge.weight().as_str()))
    }

    /// Whether an arc labeled `label` hangs anywhere inside the subtree of `head`.
    ///
    /// The incoming arc of `head` itself is not part of its subtree.
    pub fn is_arc_present_below(&self, head: TokenId, label: &str) -> bool {
        self.labels_below(head).any(|l| l == label)
    }

    /// Whether any arc of the given class hangs inside the subtree of `head`.
    pub fn is_class_present_below(&self, head: TokenId, class: LabelClass) -> bool {
        self.labels_below(head).any(|l| LabelClass::of(l).intersects(class))
    }

    /// Lowest-id token attached with `label` to a governor inside the subtree of
    /// `head`, together with that token's own phrase span.
    pub fn leaves_by_arc(&self, label: &str, head: TokenId, sentence: SentenceId) -> Option<(TokenId, Vec<TokenId>)> {
        if sentence != self.sentence {
            return None;
        }

        let clause_head = self
            .subtree(head)
            .into_iter()
            .flat_map(|nx| self.graph.edges(nx))
            .filter(|edge| edge.weight() == label)
            .map(|edge| self.graph[edge.target()].id)
            .min()?;

        Some((clause_head, self.leaves(clause_head)))
    }

    /// Direct dependent of `head` attached with `label`.
    ///
    /// When there is none, descends depth-first through dependents whose own label
    /// is in `follow` and repeats the search there. First match wins.
    pub fn child_with_arc(&self, head: TokenId, label: &str, follow: &[&str]) -> Option<TokenId> {
        let mut visited = Vec::new();
        self.find_child(head, label, follow, &mut visited)
    }

    fn find_child(&self, head: TokenId, label: &str, follow: &[&str], visited: &mut Vec<TokenId>) -> Option<TokenId> {
        if visited.contains(&head) {
            return None;
        }
        visited.push(head);

        let dependents = self.dependents(head);
        if let Some((id, _)) = dependents.iter().find(|(_, l)| *l == label) {
            return Some(*id);
        }

        if follow.is_empty() {
            return None;
        }

        dependents
            .iter()
            .filter(|(_, l)| follow.contains(l))
            .find_map(|(id, _)| self.find_child(*id, label, follow, visited))
    }

    /// The phrase span of `head`: its subtree sorted ascending. Empty for unknown tokens.
    pub fn leaves(&self, head: TokenId) -> Vec<TokenId> {
        let mut ids: Vec<TokenId> = self.subtree(head).into_iter().map(|nx| self.graph[nx].id).collect();
        ids.sort_unstable();
        ids
    }

    /// `head` plus every direct dependent attached by a coordinating label, ascending.
    pub fn collect_compounds(&self, head: TokenId) -> Vec<TokenId> {
        let mut ids = vec![head];
        ids.extend(
            self.dependents(head)
                .into_iter()
                .filter(|(_, l)| COORDINATING_LABELS.contains(l))
                .map(|(id, _)| id),
        );
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<TokenId> {
        raw.iter().copied().map(TokenId).collect()
    }

    // "I want to buy a big red car."
    fn want_to_buy() -> DependencyGraph {
        let tokens = vec![
            Token::new(1, "I", "PRON", "PRP"),
            Token::new(2, "want", "VERB", "VBP"),
            Token::new(3, "to", "PART", "TO"),
            Token::new(4, "buy", "VERB", "VB"),
            Token::new(5, "a", "DET", "DT"),
            Token::new(6, "big", "ADJ", "JJ"),
            Token::new(7, "red", "ADJ", "JJ"),
            Token::new(8, "car", "NOUN", "NN"),
            Token::new(9, ".", "PUNCT", "."),
        ];
        let arcs = vec![
            Arc::new(1, "nsubj", 2, 1),
            Arc::new(1, "root", 0, 2),
            Arc::new(1, "aux", 4, 3),
            Arc::new(1, "xcomp", 2, 4),
            Arc::new(1, "det", 8, 5),
            Arc::new(1, "amod", 8, 6),
            Arc::new(1, "amod", 8, 7),
            Arc::new(1, "dobj", 4, 8),
            Arc::new(1, "punct", 2, 9),
        ];
        DependencyGraph::new(SentenceId(1), &tokens, &arcs)
    }

    #[test]
    fn test_head_of() {
        let graph = want_to_buy();
        assert_eq!(graph.head_of(SentenceId(1)), Ok(TokenId(2)));
        assert_eq!(graph.governor_of(TokenId(8)), Some(TokenId(4)));
        assert_eq!(graph.label_of(TokenId(4)), Some("xcomp"));
    }

    #[test]
    fn test_head_of_malformed() {
        let tokens = vec![Token::new(1, "Go", "VERB", "VB"), Token::new(2, "now", "ADV", "RB")];

        let rootless = DependencyGraph::new(SentenceId(1), &tokens, &[Arc::new(1, "advmod", 1, 2)]);
        assert_eq!(
            rootless.head_of(SentenceId(1)),
            Err(GraphError::MalformedParse { sentence: SentenceId(1), roots: 0 })
        );

        let two_roots = DependencyGraph::new(SentenceId(1), &tokens, &[Arc::new(1, "root", 0, 1), Arc::new(1, "root", 0, 2)]);
        assert_eq!(
            two_roots.head_of(SentenceId(1)),
            Err(GraphError::MalformedParse { sentence: SentenceId(1), roots: 2 })
        );

        // Arcs of other sentences are ignored
        let foreign = DependencyGraph::new(SentenceId(2), &tokens, &[Arc::new(1, "root", 0, 1)]);
        assert!(foreign.head_of(SentenceId(2)).is_err());
    }

    #[test]
    fn test_leaves() {
        let graph = want_to_buy();
        assert_eq!(graph.leaves(TokenId(2)), ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]));
        assert_eq!(graph.leaves(TokenId(4)), ids(&[3, 4, 5, 6, 7, 8]));
        assert_eq!(graph.leaves(TokenId(8)), ids(&[5, 6, 7, 8]));
        assert_eq!(graph.leaves(TokenId(1)), ids(&[1]));
        assert!(graph.leaves(TokenId(42)).is_empty());
    }

    #[test]
    fn test_arc_present_below() {
        let graph = want_to_buy();
        assert!(graph.is_arc_present_below(TokenId(2), "xcomp"));
        assert!(graph.is_arc_present_below(TokenId(2), "dobj"));
        // The head's own incoming arc does not count
        assert!(!graph.is_arc_present_below(TokenId(4), "xcomp"));
        assert!(graph.is_arc_present_below(TokenId(4), "amod"));
        assert!(!graph.is_arc_present_below(TokenId(8), "dobj"));

        assert!(graph.is_class_present_below(TokenId(2), LabelClass::SUBORDINATING));
        assert!(!graph.is_class_present_below(TokenId(4), LabelClass::SUBORDINATING));
        assert!(!graph.is_class_present_below(TokenId(2), LabelClass::COORDINATING));
    }

    #[test]
    fn test_leaves_by_arc() {
        let graph = want_to_buy();
        assert_eq!(
            graph.leaves_by_arc("xcomp", TokenId(2), SentenceId(1)),
            Some((TokenId(4), ids(&[3, 4, 5, 6, 7, 8])))
        );
        assert_eq!(graph.leaves_by_arc("xcomp", TokenId(4), SentenceId(1)), None);
        assert_eq!(graph.leaves_by_arc("xcomp", TokenId(2), SentenceId(7)), None);
    }

    #[test]
    fn test_leaves_by_arc_lowest_id() {
        // "He said she left and they stayed": two ccomp arcs, the lower id wins
        let tokens: Vec<Token> = (1..=7u32).map(|i| Token::new(i, "w", "X", "X")).collect();
        let arcs = vec![
            Arc::new(1, "nsubj", 2, 1),
            Arc::new(1, "root", 0, 2),
            Arc::new(1, "nsubj", 4, 3),
            Arc::new(1, "ccomp", 2, 7),
            Arc::new(1, "ccomp", 2, 4),
            Arc::new(1, "cc", 7, 5),
            Arc::new(1, "nsubj", 7, 6),
        ];
        let graph = DependencyGraph::new(SentenceId(1), &tokens, &arcs);
        assert_eq!(
            graph.leaves_by_arc("ccomp", TokenId(2), SentenceId(1)),
            Some((TokenId(4), ids(&[3, 4])))
        );
    }

    #[test]
    fn test_child_with_arc() {
        let graph = want_to_buy();
        assert_eq!(graph.child_with_arc(TokenId(2), "nsubj", &[]), Some(TokenId(1)));
        assert_eq!(graph.child_with_arc(TokenId(4), "dobj", &[]), Some(TokenId(8)));
        // dobj is a grandchild of 2; not found without follow labels
        assert_eq!(graph.child_with_arc(TokenId(2), "dobj", &[]), None);
        assert_eq!(graph.child_with_arc(TokenId(2), "dobj", &["xcomp"]), Some(TokenId(8)));
        assert_eq!(graph.child_with_arc(TokenId(2), "dobj", &["punct"]), None);
        assert_eq!(graph.child_with_arc(TokenId(2), "neg", &[]), None);
    }

    #[test]
    fn test_collect_compounds() {
        // "cats and dogs sleep"
        let tokens = vec![
            Token::new(1, "cats", "NOUN", "NNS"),
            Token::new(2, "and", "CCONJ", "CC"),
            Token::new(3, "dogs", "NOUN", "NNS"),
            Token::new(4, "sleep", "VERB", "VBP"),
        ];
        let arcs = vec![
            Arc::new(1, "nsubj", 4, 1),
            Arc::new(1, "cc", 1, 2),
            Arc::new(1, "conj", 1, 3),
            Arc::new(1, "root", 0, 4),
        ];
        let graph = DependencyGraph::new(SentenceId(1), &tokens, &arcs);
        assert_eq!(graph.collect_compounds(TokenId(1)), ids(&[1, 2, 3]));
        assert_eq!(graph.collect_compounds(TokenId(4)), ids(&[4]));
        assert!(graph.is_class_present_below(TokenId(4), LabelClass::COORDINATING));
    }

    #[test]
    fn test_cycle_terminates() {
        // Contract violation, but traversal must still finish
        let tokens = vec![Token::new(1, "a", "X", "X"), Token::new(2, "b", "X", "X")];
        let arcs = vec![Arc::new(1, "dep", 1, 2), Arc::new(1, "dep", 2, 1)];
        let graph = DependencyGraph::new(SentenceId(1), &tokens, &arcs);
        assert_eq!(graph.leaves(TokenId(1)), ids(&[1, 2]));
        assert_eq!(graph.child_with_arc(TokenId(1), "obj", &["dep"]), None);
    }
}
