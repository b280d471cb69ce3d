#[cfg(test)]
mod scanner_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::scanner::*;
    use lox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let tokens: Vec<Token> = Scanner::new(source).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn rendered(source: &str) -> Vec<String> {
        scan(source).iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class fun var orchid _tmp while this",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::FUN, "fun"),
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::IDENTIFIER, "_tmp"),
                (TokenType::WHILE, "while"),
                (TokenType::THIS, "this"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_literals_render() {
        assert_eq!(
            rendered("42 3.14 \"hi\" 8."),
            vec![
                "NUMBER 42 42.0",
                "NUMBER 3.14 3.14",
                "STRING \"hi\" hi",
                "NUMBER 8 8.0",
                "DOT . null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_05_comments_skipped() {
        assert_token_sequence(
            "// nothing here\nprint 1; // trailing\n//",
            &[
                (TokenType::PRINT, "print"),
                (TokenType::NUMBER(1.0), "1"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_06_lines_and_columns() {
        let tokens = scan("var x\n  = 1;");

        let positions: Vec<(usize, usize)> = tokens
            .iter()
            .map(|t| (t.span.line, t.span.column))
            .collect();

        assert_eq!(positions, vec![(1, 0), (1, 4), (2, 2), (2, 4), (2, 5), (2, 6)]);
    }

    #[test]
    fn test_scanner_06b_offsets_count_from_source_start() {
        let tokens = scan("var é = 1; // ünïcode\n  x;");

        let offsets: Vec<(usize, usize, usize)> = tokens
            .iter()
            .map(|t| (t.span.line, t.span.column, t.span.offset))
            .collect();

        // é is one character, two bytes; the comment's characters still count
        assert_eq!(
            offsets,
            vec![(1, 0, 0), (1, 4, 4), (1, 6, 6), (1, 8, 8), (1, 9, 9), (2, 2, 24), (2, 3, 25), (2, 4, 26)]
        );
        assert_eq!(tokens[5].span.start, 27);
    }

    #[test]
    fn test_lexical_error_col_is_source_offset() {
        let messages: Vec<String> = lexical_errors(&scan("print 1;\nprint @;"))
            .iter()
            .map(|e| e.to_string())
            .collect();

        assert_eq!(messages, vec!["[line 2, col 15] Unexpected character '@'."]);
    }

    #[test]
    fn test_scanner_07_multiline_string_advances_line() {
        let tokens = scan("\"a\nb\" x");

        assert_eq!(tokens[0].token_type, TokenType::STRING(String::new()));
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 3);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let tokens = scan(",.$(#");

        assert_eq!(tokens.len(), 6, "Expected 6 tokens");
        assert_eq!(tokens[0].token_type, TokenType::COMMA);
        assert_eq!(tokens[1].token_type, TokenType::DOT);
        assert!(tokens[2].is_error());
        assert_eq!(tokens[3].token_type, TokenType::LEFT_PAREN);
        assert!(tokens[4].is_error());
        assert_eq!(tokens[5].token_type, TokenType::EOF);

        let messages: Vec<String> = lexical_errors(&tokens)
            .iter()
            .map(|e| e.to_string())
            .collect();

        assert_eq!(
            messages,
            vec![
                "[line 1, col 2] Unexpected character '$'.",
                "[line 1, col 4] Unexpected character '#'.",
            ]
        );
    }

    #[test]
    fn test_unexpected_multibyte_character_is_one_error() {
        let tokens = scan("é;");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].lexeme, "é");
        assert_eq!(tokens[1].token_type, TokenType::SEMICOLON);
        assert_eq!(tokens[1].span.column, 1);

        let errors = lexical_errors(&tokens);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "[line 1, col 0] Unexpected character 'é'."
        );
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = scan("print \"oops");
        let errors = lexical_errors(&tokens);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "[line 1, col 6] Unterminated string."
        );
        assert_eq!(tokens.last().map(|t| t.token_type.clone()), Some(TokenType::EOF));
    }

    #[test]
    fn test_single_eof_and_fused() {
        let mut scanner = Scanner::new("");

        assert_eq!(scanner.next().map(|t| t.token_type), Some(TokenType::EOF));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
