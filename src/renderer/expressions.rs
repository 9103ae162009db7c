use crate::error::{RenderError, Result};
use crate::parser::*;
use crate::renderer::classifier::classify;
use crate::renderer::components::Markup;
use crate::renderer::renders::NodeRenderer;
use crate::renderer::state::INDENT;

/// Binding strength and associativity of an operator node. Lower binds
/// tighter; associativity is -1 left, 1 right, 0 none.
type Precedence = (u16, i8);

const UNARY: Precedence = (10, 1);
const CAST: Precedence = (10, 1);
const INSTANCEOF: Precedence = (20, 0);
const TERNARY: Precedence = (150, 0);
const ASSIGN: Precedence = (160, 1);
const PRINT: Precedence = (168, 1);
const INCLUDE: Precedence = (200, -1);

const LEFT: i8 = -1;
const RIGHT: i8 = 1;

fn binary_precedence(op: BinaryOperator) -> Precedence {
    use BinaryOperator::*;
    match op {
        Pow => (0, 1),
        Mul | Div | Mod => (40, -1),
        Plus | Minus | Concat => (50, -1),
        ShiftLeft | ShiftRight => (60, -1),
        Smaller | SmallerOrEqual | Greater | GreaterOrEqual => (70, 0),
        Equal | NotEqual | Identical | NotIdentical | Spaceship => (80, 0),
        BitwiseAnd => (90, -1),
        BitwiseXor => (100, -1),
        BitwiseOr => (110, -1),
        BooleanAnd => (120, -1),
        BooleanOr => (130, -1),
        Coalesce => (140, 1),
        LogicalAnd => (170, -1),
        LogicalXor => (180, -1),
        LogicalOr => (190, -1),
    }
}

fn unary_precedence(op: UnaryOperator) -> Precedence {
    match op {
        UnaryOperator::BooleanNot => (30, 1),
        UnaryOperator::PostInc | UnaryOperator::PostDec => (10, -1),
        _ => UNARY,
    }
}

fn precedence(expr: &Expr) -> Option<Precedence> {
    match expr {
        Expr::BinaryOp { op, .. } => Some(binary_precedence(*op)),
        Expr::Unary { op, .. } => Some(unary_precedence(*op)),
        Expr::Cast { .. } => Some(CAST),
        Expr::Instanceof { .. } => Some(INSTANCEOF),
        Expr::Ternary { .. } => Some(TERNARY),
        Expr::Assign { .. } | Expr::AssignRef { .. } | Expr::AssignOp { .. } => Some(ASSIGN),
        Expr::Print { .. } => Some(PRINT),
        Expr::Include { .. } => Some(INCLUDE),
        _ => None,
    }
}

/// Expressions that can be followed by `->`, `[` or `::` without parentheses.
fn is_dereferenceable(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Variable { .. }
            | Expr::ArrayDimFetch { .. }
            | Expr::PropertyFetch { .. }
            | Expr::StaticPropertyFetch { .. }
            | Expr::FuncCall { .. }
            | Expr::MethodCall { .. }
            | Expr::StaticCall { .. }
            | Expr::Array { .. }
            | Expr::String { .. }
            | Expr::ConstFetch { .. }
            | Expr::ClassConstFetch { .. }
    )
}

/// What the receiver of a method or static call refers to, judged only by
/// its spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    SelfMember,
    Parent,
    Class,
    Variable,
}

impl Owner {
    pub fn of_receiver(receiver: &Expr) -> Self {
        match receiver {
            Expr::Variable { name } if name == "this" => Owner::SelfMember,
            _ => Owner::Variable,
        }
    }

    pub fn of_class(class: &NameOrExpr) -> Self {
        match class.as_name() {
            Some("self") | Some("static") => Owner::SelfMember,
            Some("parent") => Owner::Parent,
            Some(_) => Owner::Class,
            None => Owner::Variable,
        }
    }

    /// Annotation class of the member name.
    pub fn class_name(self) -> &'static str {
        match self {
            Owner::SelfMember => "name member-of-self",
            Owner::Parent => "name member-of-parent",
            Owner::Class => "name member-of-class",
            Owner::Variable => "name member-of-variable",
        }
    }
}

fn single_quoted(value: &str) -> String {
    let mut output = String::with_capacity(value.len() + 2);
    output.push('\'');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => output.push_str("\\'"),
            '\\' if matches!(chars.peek(), None | Some('\\') | Some('\'')) => {
                output.push_str("\\\\")
            }
            _ => output.push(c),
        }
    }
    output.push('\'');
    output
}

/// Escapes text for a double-quoted string, or for a heredoc body when
/// `quote` is `None`.
fn escape_double(value: &str, quote: Option<char>) -> String {
    let mut output = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' if quote.is_some() => output.push_str("\\n"),
            '\r' if quote.is_some() => output.push_str("\\r"),
            '\n' | '\r' => output.push(c),
            '\t' => output.push_str("\\t"),
            '\u{0B}' => output.push_str("\\v"),
            '\u{0C}' => output.push_str("\\f"),
            '$' => output.push_str("\\$"),
            '\\' => output.push_str("\\\\"),
            c if Some(c) == quote => {
                output.push('\\');
                output.push(c);
            }
            c if (c as u32) < 0x20 => output.push_str(&format!("\\x{:02x}", c as u32)),
            _ => output.push(c),
        }
    }
    output
}

/// True when some body line would be read as the closing `label`.
fn closes_doc_string(body: &str, label: &str) -> bool {
    body.lines().any(|line| {
        line.trim_start_matches([' ', '\t'])
            .strip_prefix(label)
            .is_some_and(|rest| {
                !rest
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            })
    })
}

fn doc_label(label: Option<&str>, body: &str) -> String {
    let base = label.unwrap_or("EOT");
    let mut label = base.to_string();
    let mut suffix = 1;
    while closes_doc_string(body, &label) {
        label = format!("{}{}", base, suffix);
        suffix += 1;
    }
    label
}

fn doc_string(label: Option<&str>, nowdoc: bool, body: &str) -> String {
    let label = doc_label(label, body);
    let opener = if nowdoc {
        format!("<<<'{}'", label)
    } else {
        format!("<<<{}", label)
    };
    if body.is_empty() {
        format!("{}\n{}", opener, label)
    } else {
        format!("{}\n{}\n{}", opener, body, label)
    }
}

fn quote_string(value: &str, kind: StringKind, label: Option<&str>) -> String {
    match kind {
        StringKind::Single => single_quoted(value),
        StringKind::Double => format!("\"{}\"", escape_double(value, Some('"'))),
        StringKind::Heredoc => doc_string(label, false, &escape_double(value, None)),
        StringKind::Nowdoc => doc_string(label, true, value),
    }
}

fn int_literal(value: i64, base: IntBase) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    match base {
        IntBase::Dec => format!("{}{}", sign, magnitude),
        IntBase::Hex => format!("{}0x{:x}", sign, magnitude),
        IntBase::Oct => format!("{}0{:o}", sign, magnitude),
        IntBase::Bin => format!("{}0b{:b}", sign, magnitude),
    }
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let text = value.to_string();
    // Keep integral values floats
    if text.trim_start_matches('-').chars().all(|c| c.is_ascii_digit()) {
        format!("{}.0", text)
    } else {
        text
    }
}

impl NodeRenderer {
    /// Renders a single expression with no enclosing operator context.
    pub fn render_expr(&mut self, expr: &Expr) -> Result<String> {
        self.checked(|renderer| renderer.expr_text(expr))
    }

    /// Renders `expr` as the operand of an operator binding at `precedence`
    /// with `associativity`, in `position` (-1 left, 1 right), adding
    /// parentheses only where the operator would otherwise rebind.
    pub fn render_prec(
        &mut self,
        expr: &Expr,
        precedence: u16,
        associativity: i8,
        position: i8,
    ) -> Result<String> {
        self.checked(|renderer| renderer.operand(expr, (precedence, associativity), position))
    }

    pub(crate) fn expr_text(&mut self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Variable { name } => Ok(self.variable(name)),
            Expr::ConstFetch { name } => Ok(self.mark("name", name)),
            Expr::Int { value, base } => Ok(self.constant(&int_literal(*value, *base))),
            Expr::Float { value } => Ok(self.constant(&float_literal(*value))),
            Expr::MagicConst { kind } => Ok(self.constant(kind.spelling())),
            Expr::String {
                value,
                kind,
                doc_label,
            } => Ok(self.render_string(value, *kind, doc_label.as_deref())),
            Expr::Interpolated {
                parts,
                kind,
                doc_label,
            } => self.render_interpolated(parts, *kind, doc_label.as_deref()),
            Expr::InterpolatedText { value } => Ok(self.token(&escape_double(value, Some('"')))),
            Expr::Cast { kind, expr } => {
                let operand = self.operand(expr, CAST, RIGHT)?;
                Ok(format!("({}) {}", self.keyword(kind.type_name()), operand))
            }
            Expr::Array { items, syntax } => {
                self.render_array(items, syntax.unwrap_or(self.config.array_syntax))
            }
            Expr::FuncCall { name, args } => {
                let (callee, frame) = match name {
                    NameOrExpr::Name(name) => (
                        self.mark("name", name),
                        Some(name.trim_start_matches('\\').to_string()),
                    ),
                    NameOrExpr::Expr(expr) => (self.callee(expr)?, None),
                };
                let args = self.render_args(frame, args)?;
                Ok(format!("{}({})", callee, args))
            }
            Expr::MethodCall { var, name, args } => self.render_method_call(var, name, args),
            Expr::StaticCall { class, name, args } => {
                let class_text = self.class_ref(class)?;
                let (member, frame) = self.member_name(name, Owner::of_class(class))?;
                let args = self.render_args(frame, args)?;
                Ok(format!("{}::{}({})", class_text, member, args))
            }
            Expr::New { class, args } => {
                let class_text = self.class_ref(class)?;
                let args = self.render_args(None, args)?;
                Ok(format!("{} {}({})", self.keyword("new"), class_text, args))
            }
            Expr::PropertyFetch { var, name } => {
                let object = self.dereference_lhs(var)?;
                let property = match name {
                    NameOrExpr::Name(name) => name.clone(),
                    NameOrExpr::Expr(expr) => self.dynamic_member(expr)?,
                };
                Ok(format!("{}{}{}", object, self.token("->"), property))
            }
            Expr::ArrayDimFetch { var, dim } => {
                let array = self.dereference_lhs(var)?;
                let dim = match dim {
                    Some(dim) => self.expr_text(dim)?,
                    None => String::new(),
                };
                Ok(format!("{}[{}]", array, dim))
            }
            Expr::ClassConstFetch { class, name } => {
                let class_text = self.class_ref(class)?;
                Ok(format!("{}::{}", class_text, self.mark("name", name)))
            }
            Expr::StaticPropertyFetch { class, name } => {
                let class_text = self.class_ref(class)?;
                Ok(format!("{}::{}", class_text, self.variable(name)))
            }
            Expr::Assign { var, expr } => self.infix(ASSIGN, var, "=", expr),
            Expr::AssignRef { var, expr } => self.infix(ASSIGN, var, "=&", expr),
            Expr::AssignOp { op, var, expr } => {
                self.infix(ASSIGN, var, &format!("{}=", op.symbol()), expr)
            }
            Expr::BinaryOp { op, left, right } => {
                self.infix(binary_precedence(*op), left, op.symbol(), right)
            }
            Expr::Unary { op, expr } => self.render_unary(*op, expr),
            Expr::Ternary {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.operand(cond, TERNARY, LEFT)?;
                let middle = match then {
                    Some(then) => {
                        let then = self.expr_text(then)?;
                        format!(" ? {} : ", then)
                    }
                    None => " ?: ".to_string(),
                };
                let otherwise = self.operand(otherwise, TERNARY, RIGHT)?;
                Ok(format!("{}{}{}", cond, middle, otherwise))
            }
            Expr::Instanceof { expr, class } => {
                let object = self.operand(expr, INSTANCEOF, LEFT)?;
                let class_text = self.class_ref(class)?;
                Ok(format!("{} {} {}", object, self.keyword("instanceof"), class_text))
            }
            Expr::Print { expr } => {
                let operand = self.operand(expr, PRINT, RIGHT)?;
                Ok(format!("{} {}", self.keyword("print"), operand))
            }

            // Easy overrides: generic layout, leading keyword wrapped
            Expr::Isset { vars } => {
                let text = format!("isset({})", self.expr_list(vars)?);
                Ok(self.keyword_led(text))
            }
            Expr::Empty { expr } => {
                let text = format!("empty({})", self.expr_text(expr)?);
                Ok(self.keyword_led(text))
            }
            Expr::Eval { expr } => {
                let text = format!("eval({})", self.expr_text(expr)?);
                Ok(self.keyword_led(text))
            }
            Expr::Exit { expr, kind } => {
                let keyword = match kind {
                    ExitKind::Exit => "exit",
                    ExitKind::Die => "die",
                };
                let text = match expr {
                    Some(expr) => format!("{}({})", keyword, self.expr_text(expr)?),
                    None => keyword.to_string(),
                };
                Ok(self.keyword_led(text))
            }
            Expr::Clone { expr } => {
                let text = format!("clone {}", self.dereference_lhs(expr)?);
                Ok(self.keyword_led(text))
            }
            Expr::Include { expr, kind } => {
                let text = format!("{} {}", kind.keyword(), self.operand(expr, INCLUDE, RIGHT)?);
                Ok(self.keyword_led(text))
            }
            Expr::List { items } => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Some(item) => parts.push(self.list_item(item)?),
                        None => parts.push(String::new()),
                    }
                }
                let text = format!("list({})", parts.join(", "));
                Ok(self.keyword_led(text))
            }

            Expr::Closure {
                params,
                uses,
                return_type,
                by_ref,
                is_static,
                stmts,
            } => {
                let mut header = String::new();
                if *is_static {
                    header.push_str(&self.keyword("static"));
                    header.push(' ');
                }
                header.push_str(&self.keyword("function"));
                header.push(' ');
                if *by_ref {
                    header.push_str(&self.token("&"));
                }
                header.push_str(&format!("({})", self.render_params(params)?.join(", ")));
                if !uses.is_empty() {
                    let uses: Vec<String> = uses
                        .iter()
                        .map(|item| {
                            let var = self.variable(&item.var);
                            if item.by_ref {
                                format!("{}{}", self.token("&"), var)
                            } else {
                                var
                            }
                        })
                        .collect();
                    header.push_str(&format!(" {} ({})", self.keyword("use"), uses.join(", ")));
                }
                if let Some(return_type) = return_type {
                    header.push_str(&format!(": {}", return_type));
                }
                self.braced(header, stmts)
            }
            Expr::ArrowFunction {
                params,
                return_type,
                is_static,
                expr,
            } => {
                let mut header = String::new();
                if *is_static {
                    header.push_str(&self.keyword("static"));
                    header.push(' ');
                }
                header.push_str(&self.keyword("fn"));
                header.push_str(&format!("({})", self.render_params(params)?.join(", ")));
                if let Some(return_type) = return_type {
                    header.push_str(&format!(": {}", return_type));
                }
                let body = self.expr_text(expr)?;
                Ok(format!("{} {} {}", header, self.token("=>"), body))
            }
            Expr::Unknown => Err(RenderError::UnsupportedNode { kind: "expression" }),
        }
    }

    pub(crate) fn expr_list(&mut self, exprs: &[Expr]) -> Result<String> {
        let mut parts = Vec::with_capacity(exprs.len());
        for expr in exprs {
            parts.push(self.expr_text(expr)?);
        }
        Ok(parts.join(", "))
    }

    pub(crate) fn render_params(&mut self, params: &[Param]) -> Result<Vec<String>> {
        let mut output = Vec::with_capacity(params.len());
        for param in params {
            let mut text = String::new();
            if let Some(type_hint) = &param.type_hint {
                text.push_str(type_hint);
                text.push(' ');
            }
            if param.by_ref {
                text.push_str(&self.token("&"));
            }
            if param.variadic {
                text.push_str("...");
            }
            text.push_str(&self.variable(&param.var));
            if let Some(default) = &param.default {
                text.push_str(" = ");
                text.push_str(&self.expr_text(default)?);
            }
            output.push(text);
        }
        Ok(output)
    }

    fn variable(&self, name: &str) -> String {
        self.mark("variable", &format!("${}", name))
    }

    fn constant(&self, text: &str) -> String {
        self.mark("constant", text)
    }

    /// `expr` as an operand of an operator with `parent` precedence, in
    /// `position` (-1 left, 1 right).
    fn operand(&mut self, expr: &Expr, parent: Precedence, position: i8) -> Result<String> {
        let text = self.expr_text(expr)?;
        match precedence(expr) {
            Some((prec, _)) if prec > parent.0 || (prec == parent.0 && parent.1 != position) => {
                Ok(format!("({})", text))
            }
            _ => Ok(text),
        }
    }

    fn infix(&mut self, prec: Precedence, left: &Expr, op: &str, right: &Expr) -> Result<String> {
        let left = self.operand(left, prec, LEFT)?;
        let right = self.operand(right, prec, RIGHT)?;
        Ok(format!("{} {} {}", left, self.token(op), right))
    }

    fn render_unary(&mut self, op: UnaryOperator, expr: &Expr) -> Result<String> {
        let prec = unary_precedence(op);
        let (symbol, postfix) = match op {
            UnaryOperator::BooleanNot => ("!", false),
            UnaryOperator::Minus => ("-", false),
            UnaryOperator::Plus => ("+", false),
            UnaryOperator::BitwiseNot => ("~", false),
            UnaryOperator::PreInc => ("++", false),
            UnaryOperator::PreDec => ("--", false),
            UnaryOperator::ErrorSuppress => ("@", false),
            UnaryOperator::PostInc => ("++", true),
            UnaryOperator::PostDec => ("--", true),
        };
        if postfix {
            let operand = self.operand(expr, prec, LEFT)?;
            return Ok(format!("{}{}", operand, symbol));
        }
        let mut operand = self.operand(expr, prec, RIGHT)?;
        // `- -1` must not collapse into a decrement
        if matches!(op, UnaryOperator::Minus | UnaryOperator::Plus)
            && operand.starts_with(symbol)
        {
            operand = format!("({})", operand);
        }
        Ok(format!("{}{}", self.token(symbol), operand))
    }

    fn dereference_lhs(&mut self, expr: &Expr) -> Result<String> {
        let text = self.expr_text(expr)?;
        if is_dereferenceable(expr) {
            Ok(text)
        } else {
            Ok(format!("({})", text))
        }
    }

    fn callee(&mut self, expr: &Expr) -> Result<String> {
        let text = self.expr_text(expr)?;
        let callable = matches!(
            expr,
            Expr::Variable { .. }
                | Expr::ArrayDimFetch { .. }
                | Expr::FuncCall { .. }
                | Expr::MethodCall { .. }
                | Expr::StaticCall { .. }
                | Expr::Array { .. }
        );
        if callable {
            Ok(text)
        } else {
            Ok(format!("({})", text))
        }
    }

    fn class_ref(&mut self, class: &NameOrExpr) -> Result<String> {
        match class {
            NameOrExpr::Name(name) => Ok(self.mark("name", name)),
            NameOrExpr::Expr(expr) => self.dereference_lhs(expr),
        }
    }

    fn dynamic_member(&mut self, expr: &Expr) -> Result<String> {
        let text = self.expr_text(expr)?;
        match expr {
            Expr::Variable { .. } => Ok(text),
            _ => Ok(format!("{{{}}}", text)),
        }
    }

    /// Member name of a call, marked with its owner, and the name pushed
    /// for its arguments.
    fn member_name(
        &mut self,
        name: &NameOrExpr,
        owner: Owner,
    ) -> Result<(String, Option<String>)> {
        match name {
            NameOrExpr::Name(name) => Ok((self.mark(owner.class_name(), name), Some(name.clone()))),
            NameOrExpr::Expr(expr) => Ok((self.dynamic_member(expr)?, None)),
        }
    }

    fn render_method_call(&mut self, var: &Expr, name: &NameOrExpr, args: &[Arg]) -> Result<String> {
        let receiver = self.dereference_lhs(var)?;
        let arrow = self.token("->");
        // Only a receiver that is itself a chained call breaks the line
        let separator = if matches!(var, Expr::MethodCall { .. }) && receiver.contains(&arrow) {
            format!("{}{}{}", self.nl(), INDENT, arrow)
        } else {
            arrow
        };
        let (member, frame) = self.member_name(name, Owner::of_receiver(var))?;
        let args = self.render_args(frame, args)?;
        Ok(format!("{}{}{}({})", receiver, separator, member, args))
    }

    /// Renders an argument list with `name` as the innermost call.
    fn render_args(&mut self, name: Option<String>, args: &[Arg]) -> Result<String> {
        let mut scope = self.enter_call(name);
        let mut parts = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            scope.state.set_argument(i + 1);
            let mut text = String::new();
            if arg.by_ref {
                text.push_str(&scope.token("&"));
            }
            if arg.unpack {
                text.push_str("...");
            }
            text.push_str(&scope.expr_text(&arg.value)?);
            parts.push(text);
        }
        Ok(parts.join(", "))
    }

    fn render_string(&mut self, value: &str, kind: StringKind, label: Option<&str>) -> String {
        let text = quote_string(value, kind, label);
        if self.state.in_literal_text {
            return text;
        }
        self.state.last_literal = None;
        let role = classify(&self.config, &self.state, value);
        let output = if self.marking() {
            let class = match role {
                Some(role) => format!("string {}", role.marker()),
                None => "string".to_string(),
            };
            Markup::wrap(&class, &Markup::escape(&text))
        } else {
            text
        };
        self.state.last_literal = Some(value.to_string());
        output
    }

    fn render_interpolated(
        &mut self,
        parts: &[Expr],
        kind: StringKind,
        label: Option<&str>,
    ) -> Result<String> {
        let heredoc = matches!(kind, StringKind::Heredoc | StringKind::Nowdoc);
        let body = {
            let mut scope = self.enter_literal_text();
            let mut body = String::new();
            for part in parts {
                match part {
                    Expr::InterpolatedText { value } => {
                        let quote = if heredoc { None } else { Some('"') };
                        body.push_str(&escape_double(value, quote));
                    }
                    _ => body.push_str(&format!("{{{}}}", scope.expr_text(part)?)),
                }
            }
            body
        };
        let text = if heredoc {
            doc_string(label, false, &body)
        } else {
            format!("\"{}\"", body)
        };

        if self.state.in_literal_text {
            return Ok(text);
        }
        self.state.last_literal = None;
        if self.marking() {
            Ok(Markup::wrap("string", &Markup::escape(&text)))
        } else {
            Ok(text)
        }
    }

    fn render_array(&mut self, items: &[ArrayItem], syntax: ArraySyntax) -> Result<String> {
        let (open, close) = match syntax {
            ArraySyntax::Short => ("[".to_string(), "]"),
            ArraySyntax::Long => (format!("{}(", self.keyword("array")), ")"),
        };
        if items.is_empty() {
            return Ok(format!("{}{}", open, close));
        }

        let mut output = open;
        {
            let mut scope = self.indented();
            for item in items {
                if !item.comments.is_empty() {
                    output.push_str(&scope.render_comments(&item.comments));
                }
                output.push_str(&scope.nl());
                output.push_str(&scope.array_item(item)?);
                output.push(',');
            }
        }
        output.push_str(&self.nl());
        output.push_str(close);
        Ok(output)
    }

    fn array_item(&mut self, item: &ArrayItem) -> Result<String> {
        let mut output = String::new();
        let mut key_literal = None;
        if let Some(key) = &item.key {
            self.state.last_literal = None;
            output.push_str(&self.expr_text(key)?);
            if matches!(key, Expr::String { .. }) {
                key_literal = self.state.last_literal.take();
            }
            output.push(' ');
            output.push_str(&self.token("=>"));
            output.push(' ');
        }
        if item.by_ref {
            output.push_str(&self.token("&"));
        }
        if item.unpack {
            output.push_str("...");
        }
        let mut scope = self.enter_array_value(key_literal);
        output.push_str(&scope.expr_text(&item.value)?);
        Ok(output)
    }

    fn list_item(&mut self, item: &ArrayItem) -> Result<String> {
        let mut output = String::new();
        if let Some(key) = &item.key {
            output.push_str(&format!("{} {} ", self.expr_text(key)?, self.token("=>")));
        }
        if item.by_ref {
            output.push_str(&self.token("&"));
        }
        output.push_str(&self.expr_text(&item.value)?);
        Ok(output)
    }
}
