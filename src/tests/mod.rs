#[cfg(test)]
mod formatting_tests {
    use crate::parser::*;
    use crate::renderer::*;
    use crate::RenderError;

    fn render(stmts: &[Stmt]) -> String {
        Printer::new(StyleConfig::default()).render(stmts).unwrap()
    }

    fn render_html(stmts: &[Stmt]) -> String {
        Printer::new(StyleConfig::default().with_annotate(true))
            .render(stmts)
            .unwrap()
    }

    // Drops every tag and decodes the five escaped characters
    fn strip_markup(html: &str) -> String {
        let mut text = String::new();
        let mut rest = html;
        while let Some(start) = rest.find('<') {
            text.push_str(&rest[..start]);
            let end = rest[start..]
                .find('>')
                .map(|i| start + i + 1)
                .unwrap_or(rest.len());
            rest = &rest[end..];
        }
        text.push_str(rest);
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#039;", "'")
            .replace("&amp;", "&")
    }

    fn function(name: &str, params: Vec<Param>, stmts: Vec<Stmt>) -> Stmt {
        Stmt::new(StmtKind::Function(FunctionDecl {
            name: name.to_string(),
            params,
            return_type: None,
            by_ref: false,
            stmts,
        }))
    }

    fn call(name: &str, args: Vec<Expr>) -> Stmt {
        Stmt::expr(Expr::call(name, args))
    }

    fn ret(expr: Option<Expr>) -> Stmt {
        Stmt::new(StmtKind::Return { expr })
    }

    fn page_callback() -> Stmt {
        let mut op = Param::new("op");
        op.default = Some(Expr::string("full view"));
        function(
            "mymodule_page",
            vec![Param::new("node"), op],
            vec![
                Stmt::expr(Expr::assign(
                    Expr::var("items"),
                    Expr::array(vec![ArrayItem::keyed(
                        Expr::string("first key"),
                        Expr::int(1),
                    )]),
                ))
                .with_comments(["// Collect items."]),
                Stmt::new(StmtKind::Foreach {
                    expr: Expr::var("items"),
                    key_var: Some(Expr::var("key")),
                    value_var: Expr::var("value"),
                    by_ref: false,
                    stmts: vec![Stmt::new(StmtKind::If {
                        cond: Expr::binary(
                            BinaryOperator::BooleanAnd,
                            Expr::binary(BinaryOperator::Greater, Expr::var("value"), Expr::int(1)),
                            Expr::Empty {
                                expr: Box::new(Expr::var("node")),
                            },
                        ),
                        stmts: vec![ret(None)],
                        elseifs: vec![],
                        else_branch: None,
                    })],
                }),
                Stmt::expr(Expr::method_call(Expr::var("node"), "save", vec![])),
                Stmt::expr(Expr::assign(
                    Expr::var("count"),
                    Expr::Cast {
                        kind: CastKind::Int,
                        expr: Box::new(Expr::var("count")),
                    },
                )),
            ],
        )
    }

    #[test]
    fn test_empty_unit_is_only_the_boundary() {
        assert_eq!(render(&[]), "<?php\n");
        assert_eq!(
            render_html(&[]),
            "<span class=\"boundary\">&lt;?php</span>\n"
        );
    }

    #[test]
    fn test_if_chain_braces_on_header_lines() {
        let tree = vec![function(
            "mymodule_init",
            vec![],
            vec![Stmt::new(StmtKind::If {
                cond: Expr::var("x"),
                stmts: vec![call("foo", vec![])],
                elseifs: vec![ElseIf {
                    cond: Expr::var("y"),
                    stmts: vec![ret(None)],
                }],
                else_branch: Some(vec![call("bar", vec![])]),
            })],
        )];

        assert_eq!(
            render(&tree),
            "<?php\n\nfunction mymodule_init() {\n  if ($x) {\n    foo();\n  }\n  elseif ($y) {\n    return;\n  }\n  else {\n    bar();\n  }\n}\n"
        );
    }

    #[test]
    fn test_class_body_ends_with_blank_line() {
        let method = Stmt::new(StmtKind::ClassMethod {
            modifiers: vec![Modifier::Public],
            function: FunctionDecl {
                name: "build".to_string(),
                params: vec![],
                return_type: None,
                by_ref: false,
                stmts: vec![ret(Some(Expr::array(vec![])))],
            },
            is_abstract: false,
        });
        let tree = vec![Stmt::new(StmtKind::Class {
            name: "ExampleBlock".to_string(),
            modifiers: vec![],
            extends: Some("BlockBase".to_string()),
            implements: vec![],
            stmts: vec![method],
        })];

        let output = render(&tree);
        assert_eq!(
            output,
            "<?php\n\nclass ExampleBlock extends BlockBase {\n  public function build() {\n    return [];\n  }\n\n}\n"
        );
        assert!(output.trim_end().ends_with("}\n\n}"));
        assert!(!output.contains("\n{"));
    }

    #[test]
    fn test_interface_and_trait_bodies_end_with_blank_line() {
        let signature = Stmt::new(StmtKind::ClassMethod {
            modifiers: vec![Modifier::Public],
            function: FunctionDecl {
                name: "label".to_string(),
                params: vec![],
                return_type: None,
                by_ref: false,
                stmts: vec![],
            },
            is_abstract: true,
        });
        let tree = vec![
            Stmt::new(StmtKind::Interface {
                name: "LabelInterface".to_string(),
                extends: vec![],
                stmts: vec![signature],
            }),
            Stmt::new(StmtKind::Trait {
                name: "LabelTrait".to_string(),
                stmts: vec![],
            }),
        ];

        assert_eq!(
            render(&tree),
            "<?php\n\ninterface LabelInterface {\n  public function label();\n\n}\ntrait LabelTrait {\n\n}\n"
        );
    }

    #[test]
    fn test_comment_groups_and_file_docblock() {
        let tree = vec![
            call("foo", vec![]).with_comments([
                "/**\n * @file\n * Main module file.\n */",
                "// Call foo.",
            ]),
            function("mymodule_menu", vec![], vec![])
                .with_comments(["/**\n     * Implements hook_menu().\n     */"]),
        ];

        assert_eq!(
            render(&tree),
            "<?php\n\n/**\n * @file\n * Main module file.\n */\n\n// Call foo.\nfoo();\n\n/**\n * Implements hook_menu().\n */\nfunction mymodule_menu() {\n}\n"
        );
    }

    #[test]
    fn test_placeholder_keeps_only_its_comments() {
        let tree = vec![function(
            "mymodule_cron",
            vec![],
            vec![
                call("foo", vec![]),
                Stmt::new(StmtKind::Nop).with_comments(["// Nothing else to do."]),
            ],
        )];

        assert_eq!(
            render(&tree),
            "<?php\n\nfunction mymodule_cron() {\n  foo();\n  // Nothing else to do.\n}\n"
        );
    }

    #[test]
    fn test_block_comment_with_non_ascii_indentation() {
        let tree = vec![Stmt::new(StmtKind::Nop).with_comments(["/*\n \u{a0}first\n  second\n  */"])];
        let output = render(&tree);
        assert!(output.contains("/*\n\u{a0}first\n second\n */\n"), "{}", output);
    }

    #[test]
    fn test_comments_are_escaped_and_marked() {
        let tree = vec![call("foo", vec![]).with_comments(["// Returns <b>bold</b> & more."])];
        let output = render_html(&tree);
        assert!(output.contains(
            "<span class=\"comment\">// Returns &lt;b&gt;bold&lt;/b&gt; &amp; more.</span>"
        ));
    }

    #[test]
    fn test_long_signature_wraps_parameters() {
        let mut third = Param::new("third_parameter");
        third.default = Some(Expr::constant("NULL"));
        let tree = vec![function(
            "mymodule_really_long_function_name_for_testing",
            vec![
                Param::new("first_parameter"),
                Param::new("second_parameter"),
                third,
            ],
            vec![],
        )];

        assert_eq!(
            render(&tree),
            "<?php\n\nfunction mymodule_really_long_function_name_for_testing(\n  $first_parameter,\n  $second_parameter,\n  $third_parameter = NULL,\n) {\n}\n"
        );

        // Annotated output keeps the single-line signature
        let stripped = strip_markup(&render_html(&tree));
        assert!(stripped.contains("($first_parameter, $second_parameter, $third_parameter = NULL) {"));
    }

    #[test]
    fn test_short_signature_stays_on_one_line() {
        let tree = vec![function("f", vec![Param::new("a"), Param::new("b")], vec![])];
        assert_eq!(render(&tree), "<?php\n\nfunction f($a, $b) {\n}\n");
    }

    #[test]
    fn test_theme_call_example() {
        let tree = vec![ret(Some(Expr::call(
            "theme",
            vec![Expr::string("user_picture"), Expr::var("variables")],
        )))];

        assert_eq!(
            render_html(&tree),
            "<span class=\"boundary\">&lt;?php</span>\n\n<span class=\"keyword\">return</span> <span class=\"name\">theme</span>(<span class=\"string possible-theme\">&#039;user_picture&#039;</span>, <span class=\"variable\">$variables</span>);\n"
        );
    }

    #[test]
    fn test_theme_key_example_ignores_call_context() {
        let build = Expr::array(vec![ArrayItem::keyed(
            Expr::string("#theme"),
            Expr::string("comment"),
        )]);
        let tree = vec![call("drupal_render", vec![build])];

        let output = render_html(&tree);
        assert!(output.contains("<span class=\"string possible-theme\">&#039;comment&#039;</span>"));
        assert_eq!(output.matches("possible-").count(), 1);
    }

    #[test]
    fn test_collection_layout_examples() {
        let tree = vec![
            Stmt::expr(Expr::assign(Expr::var("a"), Expr::array(vec![]))),
            Stmt::expr(Expr::assign(
                Expr::var("b"),
                Expr::array(vec![ArrayItem::value(Expr::string("x"))]),
            )),
        ];

        let output = render(&tree);
        assert_eq!(output, "<?php\n\n$a = [];\n$b = [\n  'x',\n];\n");
    }

    #[test]
    fn test_array_item_comments() {
        let mut item = ArrayItem::keyed(Expr::string("weight"), Expr::int(10));
        item.comments = vec![Comment::new("// Run last.")];
        let tree = vec![Stmt::expr(Expr::assign(
            Expr::var("info"),
            Expr::array(vec![item]),
        ))];

        assert_eq!(
            render(&tree),
            "<?php\n\n$info = [\n  // Run last.\n  'weight' => 10,\n];\n"
        );
    }

    #[test]
    fn test_list_stays_inline() {
        let tree = vec![Stmt::expr(Expr::assign(
            Expr::List {
                items: vec![
                    Some(ArrayItem::value(Expr::var("a"))),
                    None,
                    Some(ArrayItem::value(Expr::var("b"))),
                ],
            },
            Expr::var("pair"),
        ))];
        assert_eq!(render(&tree), "<?php\n\nlist($a, , $b) = $pair;\n");
    }

    #[test]
    fn test_call_chain_inside_block() {
        let chain = Expr::method_call(
            Expr::method_call(Expr::var("query"), "fields", vec![Expr::string("n")]),
            "execute",
            vec![],
        );
        let tree = vec![function(
            "mymodule_load",
            vec![],
            vec![Stmt::expr(Expr::assign(Expr::var("result"), chain))],
        )];

        assert_eq!(
            render(&tree),
            "<?php\n\nfunction mymodule_load() {\n  $result = $query->fields('n')\n    ->execute();\n}\n"
        );
    }

    #[test]
    fn test_switch_and_try_layout() {
        let switch = Stmt::new(StmtKind::Switch {
            cond: Expr::var("op"),
            cases: vec![
                Case {
                    cond: Some(Expr::string("view")),
                    stmts: vec![Stmt::new(StmtKind::Break { num: None })],
                    comments: vec![],
                },
                Case {
                    cond: None,
                    stmts: vec![ret(None)],
                    comments: vec![],
                },
            ],
        });
        let try_catch = Stmt::new(StmtKind::TryCatch {
            stmts: vec![call("foo", vec![])],
            catches: vec![Catch {
                types: vec!["Exception".to_string()],
                var: Some("e".to_string()),
                stmts: vec![call("watchdog_exception", vec![Expr::string("mymodule"), Expr::var("e")])],
            }],
            finally: Some(vec![call("bar", vec![])]),
        });
        let tree = vec![switch, try_catch];

        assert_eq!(
            render(&tree),
            "<?php\n\nswitch ($op) {\n  case 'view':\n    break;\n  default:\n    return;\n}\ntry {\n  foo();\n} catch (Exception $e) {\n  watchdog_exception('mymodule', $e);\n} finally {\n  bar();\n}\n"
        );

        let html = render_html(&tree);
        assert!(html.contains("<span class=\"keyword\">switch</span> ("));
        assert!(html.contains("<span class=\"keyword\">case</span> "));
        assert!(html.contains("<span class=\"keyword\">default</span>:"));
        assert!(html.contains(
            "<span class=\"keyword\">catch</span> (Exception <span class=\"variable\">$e</span>)"
        ));
        assert!(html.contains("<span class=\"keyword\">finally</span> {"));
    }

    #[test]
    fn test_interpolated_string_has_no_nested_markup() {
        let tree = vec![Stmt::new(StmtKind::Echo {
            exprs: vec![Expr::Interpolated {
                parts: vec![
                    Expr::InterpolatedText {
                        value: "Hello ".to_string(),
                    },
                    Expr::var("name"),
                ],
                kind: StringKind::Double,
                doc_label: None,
            }],
        })];

        assert_eq!(render(&tree), "<?php\n\necho \"Hello {$name}\";\n");
        let html = render_html(&tree);
        assert!(html.contains("<span class=\"string\">&quot;Hello {$name}&quot;</span>"));
        assert!(!html.contains("class=\"variable\""));
    }

    #[test]
    fn test_namespace_and_use() {
        let tree = vec![Stmt::new(StmtKind::Namespace {
            name: Some("Drupal\\mymodule".to_string()),
            stmts: vec![Stmt::new(StmtKind::Use {
                kind: UseKind::Normal,
                uses: vec![UseItem {
                    name: "Drupal\\Core\\Form\\FormBase".to_string(),
                    alias: None,
                }],
            })],
        })];

        assert_eq!(
            render(&tree),
            "<?php\n\nnamespace Drupal\\mymodule;\n\nuse Drupal\\Core\\Form\\FormBase;\n"
        );
    }

    #[test]
    fn test_annotation_only_adds_markup() {
        let tree = vec![page_callback()];
        let plain = render(&tree);
        let html = render_html(&tree);

        assert_ne!(plain, html);
        assert_eq!(strip_markup(&html), plain);
        assert!(plain.contains("foreach ($items as $key => $value) {"));
        assert!(plain.contains("if ($value > 1 && empty($node)) {"));
        assert!(plain.contains("$count = (int) $count;"));
    }

    #[test]
    fn test_repeated_renders_are_identical() {
        let tree = vec![page_callback()];
        let mut printer = Printer::new(StyleConfig::default().with_annotate(true));
        let first = printer.render(&tree).unwrap();
        let second = printer.render(&tree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_comments_do_not_change_code_text() {
        let with_comments = vec![page_callback()];
        let mut without_comments = with_comments.clone();
        if let StmtKind::Function(function) = &mut without_comments[0].kind {
            for stmt in &mut function.stmts {
                stmt.comments.clear();
            }
        }

        let code = |text: String| -> Vec<String> {
            text.lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .map(str::to_string)
                .collect()
        };
        assert_eq!(code(render(&with_comments)), code(render(&without_comments)));
    }

    #[test]
    fn test_render_state_is_balanced_after_statements() {
        let mut renderer = NodeRenderer::new(StyleConfig::default().with_annotate(true));
        let stmt = call(
            "module_invoke",
            vec![
                Expr::string("node"),
                Expr::string("view"),
                Expr::call("t", vec![Expr::string("nested")]),
            ],
        );
        let output = renderer.render_stmt(&stmt).unwrap();
        assert!(output.ends_with(");"));
        assert!(output.contains("<span class=\"string possible-hook\">&#039;view&#039;</span>"));
        assert_eq!(renderer.state().call_depth(), 0);
        assert!(renderer.state().ensure_balanced().is_ok());
    }

    #[test]
    fn test_unknown_statement_is_unsupported() {
        let tree = vec![function(
            "broken",
            vec![],
            vec![Stmt::new(StmtKind::Unknown)],
        )];
        let mut printer = Printer::new(StyleConfig::default());
        assert_eq!(
            printer.render(&tree),
            Err(RenderError::UnsupportedNode { kind: "statement" })
        );

        // The printer is usable again afterwards
        assert_eq!(printer.render(&[call("foo", vec![])]).unwrap(), "<?php\n\nfoo();\n");
    }

    mod preserving {
        use super::*;
        use mockall::mock;

        mock! {
            pub Engine {}
            impl FormatPreservingEngine for Engine {
                fn reprint(
                    &self,
                    current: &[Stmt],
                    original: &[Stmt],
                    tokens: &[Token],
                    renderer: &mut NodeRenderer,
                ) -> crate::Result<String>;
            }
        }

        #[test]
        fn test_engine_receives_snapshot_and_renderer() {
            let original = vec![call("foo", vec![])];
            let tokens = vec![
                Token {
                    kind: "T_STRING".to_string(),
                    text: "foo".to_string(),
                },
                Token {
                    kind: "(".to_string(),
                    text: "(".to_string(),
                },
            ];

            let mut engine = MockEngine::new();
            engine
                .expect_reprint()
                .times(1)
                .returning(|current, original, tokens, renderer| {
                    assert_eq!(original.len(), 1);
                    assert_eq!(tokens.len(), 2);
                    let changed = renderer.render_stmt(&current[0])?;
                    Ok(format!("<?php\n\nfoo();\n{}\n", changed))
                });

            let snapshot = OriginalSnapshot {
                stmts: original,
                tokens,
            };
            let mut printer =
                Printer::with_original(StyleConfig::default(), snapshot, Box::new(engine));

            let current = vec![call("bar", vec![Expr::int(1)])];
            assert_eq!(
                printer.render_preserving_format(&current).unwrap(),
                "<?php\n\nfoo();\nbar(1);\n"
            );
        }

        #[test]
        fn test_engine_errors_propagate() {
            let mut engine = MockEngine::new();
            engine
                .expect_reprint()
                .returning(|_, _, _, _| Err(RenderError::UnsupportedNode { kind: "statement" }));

            let mut printer = Printer::with_original(
                StyleConfig::default(),
                OriginalSnapshot::default(),
                Box::new(engine),
            );
            assert!(printer.render_preserving_format(&[]).is_err());
        }

        #[test]
        fn test_without_snapshot_falls_back_to_render() {
            let tree = vec![call("foo", vec![])];
            let mut printer = Printer::new(StyleConfig::default());
            assert_eq!(
                printer.render_preserving_format(&tree).unwrap(),
                printer.render(&tree).unwrap()
            );
        }
    }
}
