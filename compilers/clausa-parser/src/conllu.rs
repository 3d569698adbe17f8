use std::str::FromStr;

use clausa_protocol::labels::ROOT;
use clausa_protocol::{Arc, Document, Sentence, Token, TokenId};
use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt},
    sequence::{separated_pair, terminated},
    IResult,
};

use crate::error::ParseError;

/// Kind of row, decided by the shape of its ID column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowId {
    Word(u32),
    /// Multiword token range, e.g. `1-2`
    Range,
    /// Empty node of the enhanced graph, e.g. `3.1`
    Empty,
}

/// A syntactic word row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WordRow<'a> {
    id: u32,
    form: &'a str,
    upos: &'a str,
    xpos: &'a str,
    head: u32,
    deprel: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row<'a> {
    Word(WordRow<'a>),
    Skipped,
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, u32::from_str)(input)
}

fn row_id(input: &str) -> IResult<&str, RowId> {
    alt((
        map(separated_pair(digit1, char('-'), digit1), |_| RowId::Range),
        map(separated_pair(digit1, char('.'), digit1), |_| RowId::Empty),
        map(number, RowId::Word),
    ))(input)
}

/// One tab-terminated column (the last column has no tab).
fn column(input: &str) -> IResult<&str, &str> {
    terminated(take_till(|c| c == '\t'), opt(char('\t')))(input)
}

fn row(input: &str) -> IResult<&str, Row<'_>> {
    let (input, id) = terminated(row_id, char('\t'))(input)?;
    let id = match id {
        RowId::Word(id) => id,
        RowId::Range | RowId::Empty => return Ok(("", Row::Skipped)),
    };

    let (input, form) = column(input)?;
    let (input, _lemma) = column(input)?;
    let (input, upos) = column(input)?;
    let (input, xpos) = column(input)?;
    let (input, _feats) = column(input)?;
    let (input, head) = terminated(number, char('\t'))(input)?;
    let (input, deprel) = column(input)?;

    Ok((
        input,
        Row::Word(WordRow {
            id,
            form,
            upos,
            xpos,
            head,
            deprel,
        }),
    ))
}

/// Rows of the sentence being read, with their line numbers.
#[derive(Default)]
struct PendingSentence<'a> {
    rows: Vec<(usize, WordRow<'a>)>,
}

impl<'a> PendingSentence<'a> {
    fn push(&mut self, line: usize, word: WordRow<'a>) -> Result<(), ParseError> {
        let expected = self.rows.len() as u32 + 1;
        if word.id != expected {
            return Err(ParseError::TokenOrder {
                line,
                expected,
                found: word.id,
            });
        }
        self.rows.push((line, word));
        Ok(())
    }

    /// Move the rows into `doc`, shifting sentence-local ids to document-global ones.
    fn flush(&mut self, doc: &mut Document) -> Result<(), ParseError> {
        if self.rows.is_empty() {
            return Ok(());
        }

        let offset = doc.tokens.len() as u32;
        let sentence_id = doc.sentences.len() as u32 + 1;
        let len = self.rows.len();
        let mut ids = Vec::with_capacity(len);

        for (line, word) in self.rows.drain(..) {
            if word.head as usize > len {
                return Err(ParseError::HeadOutOfRange {
                    line,
                    head: word.head,
                    len,
                });
            }

            let id = offset + word.id;
            let governor = if word.head == 0 { 0 } else { offset + word.head };
            // spaCy writes the root relation upper-case
            let label = if word.deprel.eq_ignore_ascii_case(ROOT) { ROOT } else { word.deprel };

            doc.tokens.push(Token::new(id, word.form, word.upos, word.xpos));
            doc.arcs.push(Arc::new(sentence_id, label, governor, id));
            ids.push(TokenId(id));
        }

        doc.sentences.push(Sentence::new(sentence_id, ids));
        Ok(())
    }
}

/// Read CoNLL-U text into a document with global 1-based token ids.
///
/// Comment lines, multiword ranges and empty nodes are skipped. Sentences are
/// separated by blank lines; a trailing sentence without one is still read.
pub fn parse_conllu(text: &str) -> Result<Document, ParseError> {
    let mut doc = Document::new(1);
    let mut pending = PendingSentence::default();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = raw.trim_end_matches('\r');

        if content.trim().is_empty() {
            pending.flush(&mut doc)?;
            continue;
        }
        if content.starts_with('#') {
            continue;
        }

        match row(content) {
            Ok((_, Row::Word(word))) => pending.push(line, word)?,
            Ok((_, Row::Skipped)) => {}
            Err(e) => {
                return Err(ParseError::Row {
                    line,
                    reason: e.to_string(),
                })
            }
        }
    }
    pending.flush(&mut doc)?;

    tracing::debug!(
        sentences = doc.sentences.len(),
        tokens = doc.tokens.len(),
        "conllu document read"
    );

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausa_protocol::SentenceId;

    const WANT_TO_BUY: &str = "\
# text = I want to buy a big red car.
1\tI\t-PRON-\tPRON\tPRP\t_\t2\tnsubj\t_\t_
2\twant\twant\tVERB\tVBP\t_\t0\tROOT\t_\t_
3\tto\tto\tPART\tTO\t_\t4\taux\t_\t_
4\tbuy\tbuy\tVERB\tVB\t_\t2\txcomp\t_\t_
5\ta\ta\tDET\tDT\t_\t8\tdet\t_\t_
6\tbig\tbig\tADJ\tJJ\t_\t8\tamod\t_\t_
7\tred\tred\tADJ\tJJ\t_\t8\tamod\t_\t_
8\tcar\tcar\tNOUN\tNN\t_\t4\tdobj\t_\t_
9\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\tSpaceAfter=No
";

    #[test]
    fn test_row_kinds() {
        assert_eq!(row_id("12\t"), Ok(("\t", RowId::Word(12))));
        assert_eq!(row_id("1-2\t"), Ok(("\t", RowId::Range)));
        assert_eq!(row_id("3.1\t"), Ok(("\t", RowId::Empty)));
        assert!(row_id("x\t").is_err());
    }

    #[test]
    fn test_single_sentence() {
        let doc = parse_conllu(WANT_TO_BUY).unwrap();

        assert_eq!(doc.sentences.len(), 1);
        assert_eq!(doc.tokens.len(), 9);
        assert_eq!(doc.arcs.len(), 9);

        let sentence = &doc.sentences[0];
        assert_eq!(sentence.id, SentenceId(1));
        assert_eq!(sentence.token_from, TokenId(1));
        assert_eq!(sentence.token_to, TokenId(10));

        assert_eq!(doc.tokens[1].text, "want");
        assert_eq!(doc.tokens[1].upos, "VERB");
        assert_eq!(doc.tokens[1].xpos, "VBP");

        // ROOT is normalized and hangs from the virtual root
        assert_eq!(doc.arcs[1], Arc::new(1, "root", 0, 2));
        assert_eq!(doc.arcs[7], Arc::new(1, "dobj", 4, 8));
    }

    #[test]
    fn test_global_ids_across_sentences() {
        let text = format!("{}\n1\tGo\tgo\tVERB\tVB\t_\t0\troot\t_\t_\n2\t!\t!\tPUNCT\t.\t_\t1\tpunct\t_\t_\n", WANT_TO_BUY);
        let doc = parse_conllu(&text).unwrap();

        assert_eq!(doc.sentences.len(), 2);
        let second = &doc.sentences[1];
        assert_eq!(second.id, SentenceId(2));
        assert_eq!(second.tokens, vec![TokenId(10), TokenId(11)]);
        assert_eq!(doc.arcs[9], Arc::new(2, "root", 0, 10));
        assert_eq!(doc.arcs[10], Arc::new(2, "punct", 10, 11));
    }

    #[test]
    fn test_skips_ranges_and_empty_nodes() {
        let text = "\
1-2\tdon't\t_\t_\t_\t_\t_\t_\t_\t_
1\tdo\tdo\tAUX\tVBP\t_\t3\taux\t_\t_
2\tn't\tnot\tPART\tRB\t_\t3\tneg\t_\t_
3\tgo\tgo\tVERB\tVB\t_\t0\troot\t_\t_
3.1\tgone\tgo\tVERB\tVBN\t_\t_\t_\t3:conj\t_";
        let doc = parse_conllu(text).unwrap();
        assert_eq!(doc.tokens.len(), 3);
        assert_eq!(doc.arcs[1], Arc::new(1, "neg", 3, 2));
    }

    #[test]
    fn test_errors() {
        let bad_head = "1\tGo\tgo\tVERB\tVB\t_\t0\troot\t_\t_\n2\t!\t!\tPUNCT\t.\t_\t5\tpunct\t_\t_\n";
        assert_eq!(
            parse_conllu(bad_head),
            Err(ParseError::HeadOutOfRange { line: 2, head: 5, len: 2 })
        );

        let gap = "1\tGo\tgo\tVERB\tVB\t_\t0\troot\t_\t_\n3\t!\t!\tPUNCT\t.\t_\t1\tpunct\t_\t_\n";
        assert_eq!(
            parse_conllu(gap),
            Err(ParseError::TokenOrder { line: 2, expected: 2, found: 3 })
        );

        assert!(matches!(parse_conllu("1\tGo\tgo\tVERB\tVB\t_\troot\n"), Err(ParseError::Row { line: 1, .. })));
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_conllu("# only a comment\n\n").unwrap();
        assert!(doc.sentences.is_empty());
        assert!(doc.tokens.is_empty());
    }
}
