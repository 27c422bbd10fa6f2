use super::{EbnfGrammar, EbnfNode, EbnfRule};
use crate::{GrammarError, TextCursor};

/// Read a grammar description.
pub fn parse_grammar(text: &str) -> Result<EbnfGrammar, GrammarError> {
    let mut reader = GrammarReader {
        cursor: TextCursor::new(text),
    };

    let mut rules = Vec::new();
    loop {
        reader.skip_trivia()?;
        if reader.cursor.is_empty() {
            break;
        }
        rules.push(reader.rule()?);
    }
    Ok(EbnfGrammar { rules })
}

struct GrammarReader<'a> {
    cursor: TextCursor<'a>,
}

impl GrammarReader<'_> {
    fn error(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::Syntax {
            message: message.into(),
            position: self.cursor.position(),
            near: self.cursor.near(),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), GrammarError> {
        loop {
            self.cursor.consume_while(char::is_whitespace);
            if !self.cursor.remaining().starts_with("(*") {
                return Ok(());
            }
            let Some(end) = self.cursor.remaining().find("*)") else {
                return Err(self.error("unterminated comment"));
            };
            self.cursor.advance(end + 2);
        }
    }

    fn eat(&mut self, expected: &str) -> Result<bool, GrammarError> {
        self.skip_trivia()?;
        Ok(self.cursor.consume_str(expected))
    }

    fn expect(&mut self, expected: &str) -> Result<(), GrammarError> {
        if self.eat(expected)? {
            Ok(())
        } else {
            Err(self.error(format!("expected {expected:?}")))
        }
    }

    fn identifier(&mut self) -> Option<String> {
        let first = self.cursor.peek()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let name = self
            .cursor
            .consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
        Some(name.to_string())
    }

    fn rule(&mut self) -> Result<EbnfRule, GrammarError> {
        let name = self
            .identifier()
            .ok_or_else(|| self.error("expected rule name"))?;
        self.expect("=")?;
        let body = self.alternatives()?;
        self.expect(";")?;
        Ok(EbnfRule { name, body })
    }

    fn alternatives(&mut self) -> Result<EbnfNode, GrammarError> {
        let mut items = vec![self.concatenation()?];
        while self.eat("|")? {
            items.push(self.concatenation()?);
        }
        Ok(collapse(items, EbnfNode::Alternatives))
    }

    fn concatenation(&mut self) -> Result<EbnfNode, GrammarError> {
        let mut items = vec![self.exception()?];
        while self.eat(",")? {
            items.push(self.exception()?);
        }
        Ok(collapse(items, EbnfNode::Concatenation))
    }

    fn exception(&mut self) -> Result<EbnfNode, GrammarError> {
        let parser = self.range()?;
        if self.eat("-")? {
            let exception = self.range()?;
            return Ok(EbnfNode::Exception {
                parser: Box::new(parser),
                exception: Box::new(exception),
            });
        }
        Ok(parser)
    }

    fn range(&mut self) -> Result<EbnfNode, GrammarError> {
        let begin = self.primary()?;
        if self.eat("..")? {
            let end = self.primary()?;
            return Ok(EbnfNode::Range {
                begin: Box::new(begin),
                end: Box::new(end),
            });
        }
        Ok(begin)
    }

    fn primary(&mut self) -> Result<EbnfNode, GrammarError> {
        self.skip_trivia()?;

        if self.cursor.consume_str("[") {
            let inner = self.alternatives()?;
            self.expect("]")?;
            return Ok(EbnfNode::Optional(Box::new(inner)));
        }
        if self.cursor.consume_str("{") {
            let inner = self.alternatives()?;
            self.expect("}")?;
            return Ok(EbnfNode::Repeated(Box::new(inner)));
        }
        if self.cursor.consume_str("(") {
            let inner = self.alternatives()?;
            self.expect(")")?;
            return Ok(EbnfNode::Group(Box::new(inner)));
        }

        match self.cursor.peek() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.cursor.save();
                self.cursor.bump();
                let text = self.cursor.consume_while(|c| c != quote);
                if self.cursor.bump() != Some(quote) {
                    self.cursor.restore(start);
                    return Err(self.error("unterminated terminal"));
                }
                if text.is_empty() {
                    self.cursor.restore(start);
                    return Err(self.error("empty terminal"));
                }
                Ok(EbnfNode::Terminal(text.to_string()))
            }
            _ => self
                .identifier()
                .map(EbnfNode::Identifier)
                .ok_or_else(|| self.error("expected identifier, terminal, or bracket")),
        }
    }
}

fn collapse(mut items: Vec<EbnfNode>, many: fn(Vec<EbnfNode>) -> EbnfNode) -> EbnfNode {
    if items.len() == 1 {
        items.remove(0)
    } else {
        many(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> EbnfNode {
        EbnfNode::Identifier(name.to_string())
    }

    #[test]
    fn reads_every_construct() {
        let grammar = parse_grammar(
            r#"
            (* a comment *)
            A = B, [ C ], { D | 'x' } ;
            E = F - G ;
            R = CELL .. ( ":", CELL ) ;
            "#,
        )
        .unwrap();

        assert_eq!(grammar.rules.len(), 3);
        assert_eq!(
            grammar.rule("A").unwrap().body,
            EbnfNode::Concatenation(vec![
                ident("B"),
                EbnfNode::Optional(Box::new(ident("C"))),
                EbnfNode::Repeated(Box::new(EbnfNode::Alternatives(vec![
                    ident("D"),
                    EbnfNode::Terminal("x".to_string()),
                ]))),
            ])
        );
        assert_eq!(
            grammar.rule("E").unwrap().body,
            EbnfNode::Exception {
                parser: Box::new(ident("F")),
                exception: Box::new(ident("G")),
            }
        );
        assert_eq!(
            grammar.rule("R").unwrap().body,
            EbnfNode::Range {
                begin: Box::new(ident("CELL")),
                end: Box::new(EbnfNode::Group(Box::new(EbnfNode::Concatenation(vec![
                    EbnfNode::Terminal(":".to_string()),
                    ident("CELL"),
                ])))),
            }
        );
    }

    #[test]
    fn alternatives_bind_looser_than_concatenation() {
        let grammar = parse_grammar("A = B, C | D ;").unwrap();
        assert_eq!(
            grammar.rules[0].body,
            EbnfNode::Alternatives(vec![
                EbnfNode::Concatenation(vec![ident("B"), ident("C")]),
                ident("D"),
            ])
        );
    }

    #[test]
    fn syntax_errors_carry_position() {
        assert_eq!(
            parse_grammar("A = B"),
            Err(GrammarError::Syntax {
                message: "expected \";\"".to_string(),
                position: 5,
                near: String::new(),
            })
        );
        assert!(matches!(
            parse_grammar("A = 'open ;"),
            Err(GrammarError::Syntax { position: 4, .. })
        ));
        assert!(matches!(
            parse_grammar("(* never closed"),
            Err(GrammarError::Syntax { .. })
        ));
        assert!(matches!(
            parse_grammar("A = '' ;"),
            Err(GrammarError::Syntax { .. })
        ));
    }
}
