use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::{ClauseId, DocumentId, SentenceId, TokenId};
use crate::labels::{ClauseType, Role, Transitivity};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Token {
    pub id: TokenId,
    pub text: String,
    pub upos: String,
    pub xpos: String,
}

impl Token {
    pub fn new(id: u32, text: &str, upos: &str, xpos: &str) -> Self {
        Self {
            id: TokenId(id),
            text: text.into(),
            upos: upos.into(),
            xpos: xpos.into(),
        }
    }
}

/// A labeled governor -> dependent edge. `governor == TokenId::ROOT` marks the sentence head.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
pub struct Arc {
    pub sentence_id: SentenceId,
    pub label: String,
    pub governor: TokenId,
    pub dependent: TokenId,
}

impl Arc {
    pub fn new(sentence_id: u32, label: &str, governor: u32, dependent: u32) -> Self {
        Self {
            sentence_id: SentenceId(sentence_id),
            label: label.into(),
            governor: TokenId(governor),
            dependent: TokenId(dependent),
        }
    }
}

/// Head token plus its coordinated tokens and its full phrase span.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct GrammarObject {
    pub head: TokenId,
    pub semantic: Vec<TokenId>,
    pub phrase: Vec<TokenId>,
}

/// Grammatical annotation shared by sentences and clauses.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
pub struct Annotation {
    pub root: TokenId,
    pub main_verb: Option<GrammarObject>,
    pub subject: Option<GrammarObject>,
    pub object: Option<GrammarObject>,
    pub indirect_object: Option<GrammarObject>,
    pub compound: bool,
    pub complex: bool,
    pub transitivity: Option<Transitivity>,
    pub negated: bool,
}

impl Annotation {
    /// A bare annotation carrying only its root.
    pub fn new(root: TokenId) -> Self {
        Self {
            root,
            main_verb: None,
            subject: None,
            object: None,
            indirect_object: None,
            compound: false,
            complex: false,
            transitivity: None,
            negated: false,
        }
    }

    pub fn role(&self, role: Role) -> Option<&GrammarObject> {
        match role {
            Role::Subject => self.subject.as_ref(),
            Role::Object => self.object.as_ref(),
            Role::IndirectObject => self.indirect_object.as_ref(),
        }
    }

    pub fn role_mut(&mut self, role: Role) -> &mut Option<GrammarObject> {
        match role {
            Role::Subject => &mut self.subject,
            Role::Object => &mut self.object,
            Role::IndirectObject => &mut self.indirect_object,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
pub struct Sentence {
    pub id: SentenceId,
    /// First token id (inclusive).
    pub token_from: TokenId,
    /// One past the last token id (exclusive).
    pub token_to: TokenId,
    pub tokens: Vec<TokenId>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub annotation: Option<Annotation>,
}

impl Sentence {
    pub fn new(id: u32, tokens: Vec<TokenId>) -> Self {
        let token_from = tokens.first().copied().unwrap_or(TokenId::ROOT);
        let token_to = tokens.last().map(|t| TokenId(t.0 + 1)).unwrap_or(TokenId::ROOT);
        Self {
            id: SentenceId(id),
            token_from,
            token_to,
            tokens,
            annotation: None,
        }
    }

    pub fn contains(&self, token: TokenId) -> bool {
        token >= self.token_from && token < self.token_to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
pub struct Clause {
    pub id: ClauseId,
    pub sentence_id: SentenceId,
    /// Absent for top-level clauses.
    pub parent_clause_id: Option<ClauseId>,
    pub clause_type: ClauseType,
    /// Ascending, not necessarily contiguous.
    pub tokens: Vec<TokenId>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub annotation: Annotation,
}

/// Upstream document: token list, sentences, one universal-style arc set, and the clause table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Document {
    pub id: DocumentId,
    pub tokens: Vec<Token>,
    pub sentences: Vec<Sentence>,
    pub arcs: Vec<Arc>,
    pub clauses: BTreeMap<ClauseId, Clause>,
}

impl Default for DocumentId {
    fn default() -> Self {
        DocumentId(1)
    }
}

impl Document {
    pub fn new(id: u32) -> Self {
        Self {
            id: DocumentId(id),
            ..Default::default()
        }
    }

    /// Tokens falling in the sentence's `[token_from, token_to)` range.
    pub fn sentence_tokens<'a>(&'a self, sentence: &'a Sentence) -> impl Iterator<Item = &'a Token> + 'a {
        self.tokens.iter().filter(move |t| sentence.contains(t.id))
    }

    pub fn sentence_arcs(&self, sentence: SentenceId) -> impl Iterator<Item = &Arc> + '_ {
        self.arcs.iter().filter(move |a| a.sentence_id == sentence)
    }

    pub fn sentence(&self, id: SentenceId) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.id == id)
    }
}
