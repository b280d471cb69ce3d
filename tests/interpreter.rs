#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;
    use rox as lox;

    use lox::error::RuntimeError;
    use lox::{run, Session};

    /// Output of a program expected to run cleanly.
    fn output(source: &str) -> Vec<String> {
        let run = run(source);

        assert!(
            run.parse_errors.is_empty(),
            "unexpected compile errors: {:?}",
            run.parse_errors
        );
        assert_eq!(run.runtime_error, None);

        run.output
    }

    /// The runtime error a program is expected to stop with.
    fn runtime_error(source: &str) -> RuntimeError {
        let run = run(source);

        assert!(
            run.parse_errors.is_empty(),
            "unexpected compile errors: {:?}",
            run.parse_errors
        );

        match run.runtime_error {
            Some(err) => err,
            None => panic!("expected a runtime error, got output {:?}", run.output),
        }
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(output("print 2 - 1 + 3;"), vec!["4"]);
        assert_eq!(output("print 8 + 4 * 3;"), vec!["20"]);
        assert_eq!(output("print 2 - (1 + 3);"), vec!["-2"]);
        assert_eq!(output("print 1 + 2;"), vec!["3"]);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(
            output("print 10 / 4; print 1 / 0; print -1 / 0; print 0.1 + 0.2 > 0.3;"),
            vec!["2.5", "Infinity", "-Infinity", "true"]
        );
    }

    #[test]
    fn test_strings_and_equality() {
        assert_eq!(
            output("print \"foo\" + \"bar\"; print \"a\" == \"a\"; print nil == false; print 1 != 2;"),
            vec!["foobar", "true", "false", "true"]
        );
    }

    #[test]
    fn test_truthiness_and_logic() {
        assert_eq!(
            output("print !nil; print !0; print nil or \"x\"; print 1 and 2; print false and boom;"),
            vec!["true", "false", "x", "2", "false"]
        );
    }

    #[test]
    fn test_block_scoping() {
        let source = "
            var a = \"outer\";
            {
                var a = \"inner\";
                print a;
            }
            print a;
        ";

        assert_eq!(output(source), vec!["inner", "outer"]);
    }

    #[test]
    fn test_loops() {
        let source = "
            var i = 0;
            while (i < 3) { print i; i = i + 1; }
            var sum = 0;
            for (var j = 1; j <= 4; j = j + 1) sum = sum + j;
            print sum;
        ";

        assert_eq!(output(source), vec!["0", "1", "2", "10"]);
    }

    #[test]
    fn test_recursion() {
        let source = "
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(10);
        ";

        assert_eq!(output(source), vec!["55"]);
    }

    #[test]
    fn test_return_exits_loop() {
        let source = "
            fun first() {
                for (var i = 0; i < 10; i = i + 1) {
                    if (i == 3) return i;
                }
                return -1;
            }
            print first();
        ";

        assert_eq!(output(source), vec!["3"]);
    }

    #[test]
    fn test_counter_closure() {
        let source = "
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }

            var counter = makeCounter();
            print counter();
            print counter();
        ";

        assert_eq!(output(source), vec!["1", "2"]);
    }

    #[test]
    fn test_closure_binds_defining_scope() {
        let source = "
            var a = \"global\";
            {
                fun showA() { print a; }
                showA();
                var a = \"block\";
                showA();
            }
        ";

        assert_eq!(output(source), vec!["global", "global"]);
    }

    #[test]
    fn test_callable_display() {
        assert_eq!(
            output("fun f() {} class A {} print f; print clock; print A; print A(); print f();"),
            vec!["<fn f>", "<native fn>", "A", "A instance", "nil"]
        );
        assert_eq!(output("print clock() > 0;"), vec!["true"]);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = runtime_error("fun f(a) {}\nf(1, 2);");

        assert_eq!(err.message, "Expected 1 arguments but got 2.");
        assert_eq!(err.line, 2);
        assert_eq!(err.to_string(), "Expected 1 arguments but got 2.\n[line 2]");
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(
            runtime_error("print \"1\" + 1;").message,
            "Operands must be two numbers or two strings."
        );
        assert_eq!(runtime_error("print 1 < \"a\";").message, "Operands must be numbers.");
        assert_eq!(runtime_error("print -\"a\";").message, "Operand must be a number.");
        assert_eq!(
            runtime_error("\"x\"();").message,
            "Can only call functions and classes."
        );
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(runtime_error("print y;").message, "Undefined variable 'y'.");
        assert_eq!(runtime_error("y = 1;").message, "Undefined variable 'y'.");
    }

    #[test]
    fn test_fields_and_methods() {
        let source = "
            class Point {
                init(x) { this.x = x; }
                get() { return this.x; }
            }
            var p = Point(3);
            print p.get();
            p.x = 4;
            var m = p.get;
            print m();
        ";

        assert_eq!(output(source), vec!["3", "4"]);
    }

    #[test]
    fn test_init_returns_instance() {
        let source = "
            class A {
                init() { this.tag = 1; return; }
            }
            var a = A();
            print a.init() == a;
            print a.tag;
        ";

        assert_eq!(output(source), vec!["true", "1"]);
    }

    #[test]
    fn test_inherited_initializer() {
        let source = "
            class A { init(x) { this.x = x; } }
            class B < A {}
            print B(5).x;
        ";

        assert_eq!(output(source), vec!["5"]);
    }

    #[test]
    fn test_super_uses_defining_class() {
        let source = "
            class A { method() { print \"A method\"; } }
            class B < A {
                method() { print \"B method\"; }
                test() { super.method(); }
            }
            class C < B {}
            C().test();
        ";

        assert_eq!(output(source), vec!["A method"]);
    }

    #[test]
    fn test_super_chain_through_levels() {
        let source = "
            class A { say() { return \"A\"; } }
            class B < A { say() { return \"B\" + super.say(); } }
            class C < B { say() { return \"C\" + super.say(); } }
            print C().say();
        ";

        assert_eq!(output(source), vec!["CBA"]);
    }

    #[test]
    fn test_property_errors() {
        assert_eq!(
            runtime_error("class A {} print A().x;").message,
            "Undefined property 'x'."
        );
        assert_eq!(
            runtime_error("print 1.x;").message,
            "Only instances have properties."
        );
        assert_eq!(
            runtime_error("var a = 1; a.x = 2;").message,
            "Only instances have fields."
        );
        assert_eq!(
            runtime_error("var A = 1; class B < A {}").message,
            "Superclass must be a class."
        );
    }

    #[test]
    fn test_output_kept_before_runtime_error() {
        let run = run("print 1;\nprint nil + 1;\nprint 2;");

        assert_eq!(run.output, vec!["1"]);
        assert_eq!(
            run.runtime_error,
            Some(RuntimeError {
                message: "Operands must be two numbers or two strings.".to_string(),
                line: 2,
            })
        );
    }

    #[test]
    fn test_depth_limit() {
        let source = "fun f(n) { if (n > 0) f(n - 1); }\nf(2);\nprint \"ok\";\nf(5);";
        let run = Session::with_max_depth(3).run(source);

        assert_eq!(run.output, vec!["ok"]);
        assert_eq!(
            run.runtime_error.map(|e| e.to_string()),
            Some("Stack overflow.\n[line 1]".to_string())
        );
    }

    #[test]
    fn test_unbounded_recursion_is_stack_overflow() {
        let err = runtime_error("fun f() { f(); }\nf();");

        assert_eq!(err.to_string(), "Stack overflow.\n[line 1]");
    }

    #[test]
    fn test_deep_recursion_within_limit() {
        let source = "fun d(n) { if (n == 0) return 0; return d(n - 1) + 1; }\n\
                      print d(1000);\n\
                      class A { m(n) { if (n == 0) return \"done\"; return this.m(n - 1); } }\n\
                      print A().m(1000);";

        assert_eq!(output(source), vec!["1000", "done"]);
    }

    #[test]
    fn test_deeply_nested_source() {
        let depth = 2000;
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(output(&source), vec!["1"]);

        let source = format!("{}print -1;{}", "{".repeat(depth), "}".repeat(depth));
        assert_eq!(output(&source), vec!["-1"]);
    }
}
