#[cfg(test)]
mod resolver_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::parser::parse;
    use lox::resolver::{resolve, Resolution};
    use lox::scanner::scan;

    fn resolve_source(source: &str) -> Resolution {
        let tokens = scan(source);
        let outcome = parse(&tokens);

        assert!(
            outcome.errors.is_empty(),
            "unexpected parse errors: {:?}",
            outcome.errors
        );

        resolve(&outcome.statements)
    }

    fn errors(source: &str) -> Vec<String> {
        resolve_source(source)
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn test_return_at_top_level() {
        assert_eq!(
            errors("return 1;"),
            vec!["[line 1, col 0] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn test_this_outside_class() {
        assert_eq!(
            errors("print this;"),
            vec!["[line 1, col 6] Error at 'this': Can't use 'this' outside of a class."]
        );
        assert_eq!(
            errors("fun f() { return this; }"),
            vec!["[line 1, col 17] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn test_super_placement() {
        assert_eq!(
            errors("print super.x;"),
            vec!["[line 1, col 6] Error at 'super': Can't use 'super' outside of a class."]
        );
        assert_eq!(
            errors("class A { f() { super.f(); } }"),
            vec!["[line 1, col 16] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
        assert!(errors("class A {} class B < A { f() { super.f(); } }").is_empty());
    }

    #[test]
    fn test_duplicate_local() {
        assert_eq!(
            errors("{ var a = 1; var a = 2; }"),
            vec!["[line 1, col 17] Error at 'a': Already a variable with this name in this scope."]
        );
        // Globals may be redeclared.
        assert!(errors("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_read_in_own_initializer() {
        assert_eq!(
            errors("{ var a = a; }"),
            vec!["[line 1, col 10] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_initializer_return() {
        assert_eq!(
            errors("class A { init() { return 1; } }"),
            vec!["[line 1, col 19] Error at 'return': Can't return a value from an initializer."]
        );
        assert!(errors("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_all_errors_collected() {
        let found = errors("return;\nprint this;\n{ var b = b; }");

        assert_eq!(found.len(), 3);
        assert!(found[0].starts_with("[line 1, col 0]"));
        assert!(found[1].starts_with("[line 2, col 14]"));
        assert!(found[2].starts_with("[line 3, col 30]"));
    }

    #[test]
    fn test_locals_record_hop_distance() {
        let resolution = resolve_source("{ var a = 1; { print a; } }");

        assert!(resolution.errors.is_empty());
        assert_eq!(resolution.locals.values().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_globals_left_unresolved() {
        let resolution = resolve_source("var g = 1; print g; g = 2;");

        assert!(resolution.errors.is_empty());
        assert!(resolution.locals.is_empty());
    }

    #[test]
    fn test_this_resolves_through_method_scope() {
        let resolution = resolve_source("class A { f() { return this; } }");

        assert!(resolution.errors.is_empty());
        // function scope → `this` scope
        assert_eq!(resolution.locals.values().copied().collect::<Vec<_>>(), vec![1]);
    }
}
