use tracing::trace;

use crate::error::{RenderError, Result};
use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::state::*;
use crate::renderer::traits::*;

/// Widest single-line function header before parameters wrap.
pub const LINE_WIDTH: usize = 80;

/// Tree-to-text visitor enforcing the Drupal layout.
///
/// Every node family is rendered by one exhaustive `match`; arms either
/// override the generic layout or produce it unchanged. Markup is only
/// added while "marking": annotation is enabled and the renderer is not
/// inside the text of an interpolated string.
#[derive(Debug, Clone)]
pub struct NodeRenderer {
    pub(crate) config: StyleConfig,
    pub(crate) state: RenderState,
    pub(crate) indentation: Indentation,
}

impl NodeRenderer {
    pub fn new(config: StyleConfig) -> Self {
        Self {
            config,
            state: RenderState::new(),
            indentation: Indentation::new(),
        }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.indentation.reset();
    }

    /// Renders a single statement, including the `;` of expression statements.
    pub fn render_stmt(&mut self, stmt: &Stmt) -> Result<String> {
        self.checked(|renderer| renderer.statement(stmt))
    }

    /// Renders statements as a block at the current indentation.
    pub fn render_stmts(&mut self, stmts: &[Stmt]) -> Result<String> {
        self.checked(|renderer| renderer.render_block(stmts, false))
    }

    /// Runs one self-contained render and verifies it left no scope open.
    pub(crate) fn checked<T>(&mut self, render: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let level = self.indentation.level();
        let output = render(self)?;
        self.state.ensure_balanced()?;
        if self.indentation.level() != level {
            return Err(RenderError::StateInvariant(format!(
                "indentation level {} after render, expected {}",
                self.indentation.level(),
                level
            )));
        }
        Ok(output)
    }

    // --- Markup helpers ---

    pub(crate) fn marking(&self) -> bool {
        self.config.annotate && !self.state.in_literal_text
    }

    /// Wraps already escaped `text` in `class` when marking.
    pub(crate) fn mark(&self, class: &str, text: &str) -> String {
        if self.marking() {
            Markup::wrap(class, text)
        } else {
            text.to_string()
        }
    }

    pub(crate) fn keyword(&self, keyword: &str) -> String {
        self.mark("keyword", keyword)
    }

    /// Punctuation or operator, escaped when marking.
    pub(crate) fn token(&self, token: &str) -> String {
        if self.marking() {
            Markup::escape(token)
        } else {
            token.to_string()
        }
    }

    /// Default rendering of an easy-override node, with its leading keyword
    /// wrapped when marking.
    pub(crate) fn keyword_led(&self, text: String) -> String {
        if self.marking() {
            Markup::wrap_leading_keyword(&text)
        } else {
            text
        }
    }

    pub(crate) fn nl(&self) -> String {
        self.indentation.newline().to_string()
    }

    // --- Blocks and comments ---

    pub(crate) fn render_block(&mut self, stmts: &[Stmt], indent: bool) -> Result<String> {
        if indent {
            let mut scope = self.indented();
            return scope.block_lines(stmts);
        }
        self.block_lines(stmts)
    }

    fn block_lines(&mut self, stmts: &[Stmt]) -> Result<String> {
        trace!(count = stmts.len(), level = self.indentation.level(), "rendering block");
        let mut output = String::new();
        for stmt in stmts {
            if !stmt.comments.is_empty() {
                output.push_str(&self.render_comments(&stmt.comments));
            }
            if matches!(stmt.kind, StmtKind::Nop) {
                continue;
            }
            output.push_str(&self.nl());
            output.push_str(&self.statement(stmt)?);
        }
        Ok(output)
    }

    /// Renders a comment group, each comment starting on its own line.
    ///
    /// Multi-line comments are preceded by a blank line, a file doc block
    /// is followed by one.
    pub(crate) fn render_comments(&self, comments: &[Comment]) -> String {
        let nl = self.nl();
        let mut output = String::new();
        let mut blank_pending = false;
        for comment in comments {
            let mut text = CommentText::join(&CommentText::reformat(&comment.text), &nl);
            if self.marking() {
                text = Markup::escape(&text);
            }
            if comment.is_multiline() && !blank_pending {
                output.push('\n');
            }
            output.push_str(&nl);
            output.push_str(&self.mark("comment", &text));
            blank_pending = CommentText::is_file_docblock(&comment.text);
            if blank_pending {
                output.push('\n');
            }
        }
        output
    }

    // --- Statements ---

    pub(crate) fn statement(&mut self, stmt: &Stmt) -> Result<String> {
        let mut output = self.stmt_text(&stmt.kind)?;
        if matches!(stmt.kind, StmtKind::Expression { .. }) {
            output.push(';');
        }
        Ok(output)
    }

    fn stmt_text(&mut self, kind: &StmtKind) -> Result<String> {
        match kind {
            StmtKind::Expression { expr } => self.expr_text(expr),
            StmtKind::If {
                cond,
                stmts,
                elseifs,
                else_branch,
            } => self.render_if(cond, stmts, elseifs, else_branch.as_deref()),
            StmtKind::Function(function) => self.render_function(&[], function, false),
            StmtKind::ClassMethod {
                modifiers,
                function,
                is_abstract,
            } => self.render_function(modifiers, function, *is_abstract),
            StmtKind::Class {
                name,
                modifiers,
                extends,
                implements,
                stmts,
            } => {
                let mut header = String::new();
                for modifier in modifiers {
                    header.push_str(&self.keyword(modifier.keyword()));
                    header.push(' ');
                }
                header.push_str(&self.keyword("class"));
                header.push(' ');
                header.push_str(name);
                if let Some(parent) = extends {
                    header.push_str(&format!(" {} {}", self.keyword("extends"), parent));
                }
                if !implements.is_empty() {
                    header.push_str(&format!(
                        " {} {}",
                        self.keyword("implements"),
                        implements.join(", ")
                    ));
                }
                self.render_class_like(header, stmts)
            }
            StmtKind::Interface {
                name,
                extends,
                stmts,
            } => {
                let mut header = format!("{} {}", self.keyword("interface"), name);
                if !extends.is_empty() {
                    header.push_str(&format!(" {} {}", self.keyword("extends"), extends.join(", ")));
                }
                self.render_class_like(header, stmts)
            }
            StmtKind::Trait { name, stmts } => {
                let header = format!("{} {}", self.keyword("trait"), name);
                self.render_class_like(header, stmts)
            }
            StmtKind::Property {
                modifiers,
                type_hint,
                props,
            } => {
                let mut output = if modifiers.is_empty() {
                    self.keyword("var")
                } else {
                    self.modifiers(modifiers)
                };
                if let Some(type_hint) = type_hint {
                    output.push(' ');
                    output.push_str(type_hint);
                }
                let mut items = Vec::with_capacity(props.len());
                for prop in props {
                    let mut item = self.mark("variable", &format!("${}", prop.name));
                    if let Some(default) = &prop.default {
                        item.push_str(" = ");
                        item.push_str(&self.expr_text(default)?);
                    }
                    items.push(item);
                }
                Ok(format!("{} {};", output, items.join(", ")))
            }
            StmtKind::ClassConst { modifiers, consts } => {
                let mut output = String::new();
                if !modifiers.is_empty() {
                    output.push_str(&self.modifiers(modifiers));
                    output.push(' ');
                }
                output.push_str(&self.render_consts(consts)?);
                Ok(output)
            }
            StmtKind::Const { consts } => self.render_consts(consts),
            StmtKind::TraitUse { traits } => {
                Ok(format!("{} {};", self.keyword("use"), traits.join(", ")))
            }
            StmtKind::Namespace { name, stmts } => match name {
                Some(name) => {
                    let body = self.render_block(stmts, false)?;
                    Ok(format!("{} {};{}{}", self.keyword("namespace"), name, self.nl(), body))
                }
                None => {
                    let body = self.render_block(stmts, true)?;
                    Ok(format!("{} {{{}{}}}", self.keyword("namespace"), body, self.nl()))
                }
            },
            StmtKind::Use { kind, uses } => {
                let mut output = self.keyword("use");
                match kind {
                    UseKind::Normal => {}
                    UseKind::Function => output.push_str(&format!(" {}", self.keyword("function"))),
                    UseKind::Const => output.push_str(&format!(" {}", self.keyword("const"))),
                }
                let items: Vec<String> = uses
                    .iter()
                    .map(|item| match &item.alias {
                        Some(alias) => format!("{} {} {}", item.name, self.keyword("as"), alias),
                        None => item.name.clone(),
                    })
                    .collect();
                Ok(format!("{} {};", output, items.join(", ")))
            }
            StmtKind::Label { name } => Ok(format!("{}:", name)),
            StmtKind::Nop => Ok(String::new()),
            StmtKind::Unknown => Err(RenderError::UnsupportedNode { kind: "statement" }),

            // Easy overrides: generic layout, leading keyword wrapped
            StmtKind::Echo { exprs } => {
                let text = format!("echo {};", self.expr_list(exprs)?);
                Ok(self.keyword_led(text))
            }
            StmtKind::For {
                init,
                cond,
                step,
                stmts,
            } => {
                let mut header = format!("for ({};", self.expr_list(init)?);
                for part in [cond, step] {
                    if !part.is_empty() {
                        header.push(' ');
                        header.push_str(&self.expr_list(part)?);
                    }
                    header.push(';');
                }
                header.pop();
                let text = self.braced(format!("{})", header), stmts)?;
                Ok(self.keyword_led(text))
            }
            StmtKind::Foreach {
                expr,
                key_var,
                value_var,
                by_ref,
                stmts,
            } => {
                let mut header = format!("foreach ({} as ", self.expr_text(expr)?);
                if let Some(key) = key_var {
                    header.push_str(&format!("{} {} ", self.expr_text(key)?, self.token("=>")));
                }
                if *by_ref {
                    header.push_str(&self.token("&"));
                }
                header.push_str(&self.expr_text(value_var)?);
                header.push(')');
                let text = self.braced(header, stmts)?;
                Ok(self.keyword_led(text))
            }
            StmtKind::While { cond, stmts } => {
                let header = format!("while ({})", self.expr_text(cond)?);
                let text = self.braced(header, stmts)?;
                Ok(self.keyword_led(text))
            }
            StmtKind::Do { cond, stmts } => {
                let body = self.braced("do".to_string(), stmts)?;
                let text = format!("{} while ({});", body, self.expr_text(cond)?);
                Ok(self.keyword_led(text))
            }
            StmtKind::Switch { cond, cases } => {
                let mut text = format!("switch ({}) {{", self.expr_text(cond)?);
                {
                    let mut scope = self.indented();
                    for case in cases {
                        if !case.comments.is_empty() {
                            text.push_str(&scope.render_comments(&case.comments));
                        }
                        text.push_str(&scope.nl());
                        text.push_str(&scope.render_case(case)?);
                    }
                }
                text.push_str(&self.nl());
                text.push('}');
                Ok(self.keyword_led(text))
            }
            StmtKind::TryCatch {
                stmts,
                catches,
                finally,
            } => {
                let body = self.braced("try".to_string(), stmts)?;
                let mut text = self.keyword_led(body);
                for catch in catches {
                    let mut header = format!("catch ({}", catch.types.join("|"));
                    if let Some(var) = &catch.var {
                        header.push(' ');
                        header.push_str(&self.mark("variable", &format!("${}", var)));
                    }
                    header.push(')');
                    let clause = self.braced(header, &catch.stmts)?;
                    text.push(' ');
                    text.push_str(&self.keyword_led(clause));
                }
                if let Some(finally) = finally {
                    let clause = self.braced("finally".to_string(), finally)?;
                    text.push(' ');
                    text.push_str(&self.keyword_led(clause));
                }
                Ok(text)
            }
            StmtKind::Throw { expr } => {
                let text = format!("throw {};", self.expr_text(expr)?);
                Ok(self.keyword_led(text))
            }
            StmtKind::Break { num } => {
                let text = self.keyword_statement("break", num.as_ref())?;
                Ok(self.keyword_led(text))
            }
            StmtKind::Continue { num } => {
                let text = self.keyword_statement("continue", num.as_ref())?;
                Ok(self.keyword_led(text))
            }
            StmtKind::Return { expr } => {
                let text = self.keyword_statement("return", expr.as_ref())?;
                Ok(self.keyword_led(text))
            }
            StmtKind::Goto { name } => Ok(self.keyword_led(format!("goto {};", name))),
            StmtKind::Static { vars } => {
                let mut items = Vec::with_capacity(vars.len());
                for var in vars {
                    let mut item = self.mark("variable", &format!("${}", var.var));
                    if let Some(default) = &var.default {
                        item.push_str(" = ");
                        item.push_str(&self.expr_text(default)?);
                    }
                    items.push(item);
                }
                Ok(self.keyword_led(format!("static {};", items.join(", "))))
            }
            StmtKind::Global { vars } => {
                let text = format!("global {};", self.expr_list(vars)?);
                Ok(self.keyword_led(text))
            }
            StmtKind::Unset { vars } => {
                let text = format!("unset({});", self.expr_list(vars)?);
                Ok(self.keyword_led(text))
            }
        }
    }

    /// `header {`, the indented body, then `}` on its own line.
    pub(crate) fn braced(&mut self, header: String, stmts: &[Stmt]) -> Result<String> {
        let body = self.render_block(stmts, true)?;
        Ok(format!("{} {{{}{}}}", header, body, self.nl()))
    }

    fn keyword_statement(&mut self, keyword: &str, operand: Option<&Expr>) -> Result<String> {
        match operand {
            Some(expr) => Ok(format!("{} {};", keyword, self.expr_text(expr)?)),
            None => Ok(format!("{};", keyword)),
        }
    }

    fn render_case(&mut self, case: &Case) -> Result<String> {
        let label = match &case.cond {
            Some(cond) => format!("case {}:", self.expr_text(cond)?),
            None => "default:".to_string(),
        };
        let body = self.render_block(&case.stmts, true)?;
        Ok(self.keyword_led(format!("{}{}", label, body)))
    }

    fn render_if(
        &mut self,
        cond: &Expr,
        stmts: &[Stmt],
        elseifs: &[ElseIf],
        else_branch: Option<&[Stmt]>,
    ) -> Result<String> {
        let header = format!("{} ({})", self.keyword("if"), self.expr_text(cond)?);
        let mut output = self.braced(header, stmts)?;

        for elseif in elseifs {
            let header = format!("{} ({})", self.keyword("elseif"), self.expr_text(&elseif.cond)?);
            let clause = self.braced(header, &elseif.stmts)?;
            output.push_str(&self.nl());
            output.push_str(&clause);
        }

        if let Some(stmts) = else_branch {
            let header = self.keyword("else");
            let clause = self.braced(header, stmts)?;
            output.push_str(&self.nl());
            output.push_str(&clause);
        }

        Ok(output)
    }

    /// Classes, interfaces and traits: brace on the header line and a blank
    /// line before the closing brace.
    fn render_class_like(&mut self, header: String, stmts: &[Stmt]) -> Result<String> {
        let body = self.render_block(stmts, true)?;
        Ok(format!("{} {{{}\n{}}}", header, body, self.nl()))
    }

    fn modifiers(&self, modifiers: &[Modifier]) -> String {
        modifiers
            .iter()
            .map(|modifier| self.keyword(modifier.keyword()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_consts(&mut self, consts: &[ConstItem]) -> Result<String> {
        let mut items = Vec::with_capacity(consts.len());
        for item in consts {
            items.push(format!("{} = {}", item.name, self.expr_text(&item.value)?));
        }
        Ok(format!("{} {};", self.keyword("const"), items.join(", ")))
    }

    fn render_function(
        &mut self,
        modifiers: &[Modifier],
        function: &FunctionDecl,
        is_abstract: bool,
    ) -> Result<String> {
        let mut prefix = String::new();
        if !modifiers.is_empty() {
            prefix.push_str(&self.modifiers(modifiers));
            prefix.push(' ');
        }
        prefix.push_str(&self.keyword("function"));
        prefix.push(' ');
        if function.by_ref {
            prefix.push_str(&self.token("&"));
        }
        prefix.push_str(&function.name);

        let suffix = match &function.return_type {
            Some(return_type) => format!(": {}", return_type),
            None => String::new(),
        };

        let params = self.render_params(&function.params)?;
        let mut header = format!("{}({}){}", prefix, params.join(", "), suffix);

        let widest = header.lines().map(str::len).max().unwrap_or(0);
        if !self.config.annotate
            && !function.params.is_empty()
            && self.indentation.width() + widest + 2 > LINE_WIDTH
        {
            let mut scope = self.indented();
            let nl = scope.nl();
            let params = scope.render_params(&function.params)?;
            drop(scope);

            header = format!("{}(", prefix);
            for param in params {
                header.push_str(&nl);
                header.push_str(&param);
                header.push(',');
            }
            header.push_str(&self.nl());
            header.push(')');
            header.push_str(&suffix);
        }

        if is_abstract {
            return Ok(format!("{};", header));
        }
        self.braced(header, &function.stmts)
    }
}
