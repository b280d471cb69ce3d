#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::ast::Stmt;
    use lox::ast_printer::AstPrinter;
    use lox::parser::{parse, Parser};
    use lox::scanner::scan;

    /// Parse `source`, which must be free of syntax errors, and print it.
    fn ast(source: &str) -> String {
        let tokens = scan(source);
        let outcome = parse(&tokens);

        assert!(
            outcome.errors.is_empty(),
            "unexpected errors: {:?}",
            outcome.errors
        );

        AstPrinter.print_program(&outcome.statements)
    }

    fn errors(source: &str) -> Vec<String> {
        let tokens = scan(source);

        parse(&tokens)
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn test_parser_01_precedence() {
        assert_eq!(ast("1 + 2 * 3;"), "(; (+ 1.0 (* 2.0 3.0)))");
        assert_eq!(ast("2 - 1 + 3;"), "(; (+ (- 2.0 1.0) 3.0))");
        assert_eq!(ast("print -(1 - 2);"), "(print (- (group (- 1.0 2.0))))");
        assert_eq!(ast("!a == b < c;"), "(; (== (! a) (< b c)))");
    }

    #[test]
    fn test_parser_02_logical_and_assignment() {
        assert_eq!(ast("a = b = 1;"), "(; (= a (= b 1.0)))");
        assert_eq!(ast("x or y and z;"), "(; (or x (and y z)))");
        assert_eq!(ast("obj.field = 2;"), "(; (= (. obj field) 2.0))");
    }

    #[test]
    fn test_parser_03_calls_and_properties() {
        assert_eq!(ast("f(1, \"two\")(3);"), "(; (call (call f 1.0 two) 3.0))");
        assert_eq!(ast("a.b.c();"), "(; (call (. (. a b) c)))");
    }

    #[test]
    fn test_parser_04_for_is_desugared() {
        assert_eq!(
            ast("for (var i = 0; i < 3; i = i + 1) print i;"),
            "(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"
        );
        assert_eq!(ast("for (;;) print 1;"), "(while true (print 1.0))");
    }

    #[test]
    fn test_parser_05_declarations() {
        assert_eq!(
            ast("fun add(a, b) { return a + b; }"),
            "(fun add (a b) (return (+ a b)))"
        );
        assert_eq!(
            ast("class B < A { init(x) { this.x = x; } say() { return super.say(); } }"),
            "(class B < A (method init (x) (; (= (. this x) x))) (method say () (return (call (super say)))))"
        );
        assert_eq!(
            ast("if (a) print 1; else { var b; }"),
            "(if-else a (print 1.0) (block (var b)))"
        );
    }

    #[test]
    fn test_missing_semicolon_at_end() {
        assert_eq!(
            errors("print 1 + 2"),
            vec!["[line 1, col 11] Error at end: Expect ';' after value."]
        );
    }

    #[test]
    fn test_errors_reported_in_source_order() {
        assert_eq!(
            errors("var a = 1\nprint a;\nprint 2"),
            vec![
                "[line 2, col 10] Error at 'print': Expect ';' after variable declaration.",
                "[line 3, col 26] Error at end: Expect ';' after value.",
            ]
        );
    }

    #[test]
    fn test_recovery_keeps_later_statements() {
        let tokens = scan("print ;\nprint 2;");
        let outcome = parse(&tokens);

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(
            outcome.errors[0].to_string(),
            "[line 1, col 6] Error at ';': Expect expression."
        );
        assert_eq!(outcome.statements.len(), 1);
        assert!(matches!(outcome.statements[0], Stmt::Print(_)));
    }

    #[test]
    fn test_invalid_assignment_target_is_not_fatal() {
        let tokens = scan("1 = 2; print 3;");
        let outcome = parse(&tokens);

        assert_eq!(
            outcome
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>(),
            vec!["[line 1, col 2] Error at '=': Invalid assignment target."]
        );
        assert_eq!(outcome.statements.len(), 2);
    }

    #[test]
    fn test_class_cannot_inherit_from_itself() {
        assert_eq!(
            errors("class A < A {}"),
            vec!["[line 1, col 10] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_too_many_arguments() {
        let args: Vec<&str> = vec!["0"; 256];
        let source = format!("f({});", args.join(","));

        let found = errors(&source);

        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("Error at '0': Can't have more than 255 arguments."));
    }

    #[test]
    fn test_too_many_parameters() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}\nclass C {{ m({}) {{}} }}", params.join(", "), params.join(", "));

        let outcome = parse(&scan(&source));
        let found: Vec<String> = outcome.errors.iter().map(|e| e.to_string()).collect();

        assert_eq!(found.len(), 2);
        assert!(found[0].starts_with("[line 1, "));
        assert!(found[0].ends_with("Error at 'p255': Can't have more than 255 parameters."));
        assert!(found[1].starts_with("[line 2, "));
        assert!(found[1].ends_with("Error at 'p255': Can't have more than 255 parameters."));

        // Still reported, not fatal: both declarations survive.
        assert_eq!(outcome.statements.len(), 2);
    }

    #[test]
    fn test_255_parameters_allowed() {
        let params: Vec<String> = (0..255).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        assert!(errors(&source).is_empty());
    }

    #[test]
    fn test_ids_continue_from_starting_point() {
        let tokens = scan("a; b = c;");
        let outcome = Parser::new(&tokens).starting_at(10).parse();

        // a, b, c, and the assignment to b
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.next_id, 14);
    }

    #[test]
    fn test_empty_token_slice() {
        let outcome = Parser::new(&[]).parse();

        assert!(outcome.statements.is_empty());
        assert!(outcome.errors.is_empty());
    }
}
