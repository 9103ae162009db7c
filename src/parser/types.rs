use serde::Deserialize;

// Syntax tree for the PHP subset the printer understands. Trees are built
// upstream and arrive here as JSON dumps tagged by `nodeType`; the renderer
// only ever reads them.

/// A comment attached to a statement or array item, exactly as written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }
}

/// Range of original tokens a statement was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

/// One token of the original source, kept for format-preserving reprints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stmt {
    #[serde(flatten)]
    pub kind: StmtKind,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub span: Option<TokenSpan>,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            comments: Vec::new(),
            span: None,
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expression { expr })
    }

    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comments = comments.into_iter().map(Comment::new).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "nodeType")]
pub enum StmtKind {
    #[serde(rename = "Stmt_Expression")]
    Expression { expr: Expr },
    #[serde(rename = "Stmt_Echo")]
    Echo { exprs: Vec<Expr> },
    #[serde(rename = "Stmt_If")]
    If {
        cond: Expr,
        stmts: Vec<Stmt>,
        #[serde(default)]
        elseifs: Vec<ElseIf>,
        #[serde(default, rename = "else")]
        else_branch: Option<Vec<Stmt>>,
    },
    #[serde(rename = "Stmt_For")]
    For {
        #[serde(default)]
        init: Vec<Expr>,
        #[serde(default)]
        cond: Vec<Expr>,
        #[serde(default, rename = "loop")]
        step: Vec<Expr>,
        stmts: Vec<Stmt>,
    },
    #[serde(rename = "Stmt_Foreach")]
    Foreach {
        expr: Expr,
        #[serde(default, rename = "keyVar")]
        key_var: Option<Expr>,
        #[serde(rename = "valueVar")]
        value_var: Expr,
        #[serde(default, rename = "byRef")]
        by_ref: bool,
        stmts: Vec<Stmt>,
    },
    #[serde(rename = "Stmt_While")]
    While { cond: Expr, stmts: Vec<Stmt> },
    #[serde(rename = "Stmt_Do")]
    Do { cond: Expr, stmts: Vec<Stmt> },
    #[serde(rename = "Stmt_Switch")]
    Switch { cond: Expr, cases: Vec<Case> },
    #[serde(rename = "Stmt_TryCatch")]
    TryCatch {
        stmts: Vec<Stmt>,
        #[serde(default)]
        catches: Vec<Catch>,
        #[serde(default)]
        finally: Option<Vec<Stmt>>,
    },
    #[serde(rename = "Stmt_Throw")]
    Throw { expr: Expr },
    #[serde(rename = "Stmt_Break")]
    Break {
        #[serde(default)]
        num: Option<Expr>,
    },
    #[serde(rename = "Stmt_Continue")]
    Continue {
        #[serde(default)]
        num: Option<Expr>,
    },
    #[serde(rename = "Stmt_Return")]
    Return {
        #[serde(default)]
        expr: Option<Expr>,
    },
    #[serde(rename = "Stmt_Goto")]
    Goto { name: String },
    #[serde(rename = "Stmt_Label")]
    Label { name: String },
    #[serde(rename = "Stmt_Static")]
    Static { vars: Vec<StaticVar> },
    #[serde(rename = "Stmt_Global")]
    Global { vars: Vec<Expr> },
    #[serde(rename = "Stmt_Unset")]
    Unset { vars: Vec<Expr> },
    #[serde(rename = "Stmt_Function")]
    Function(FunctionDecl),
    #[serde(rename = "Stmt_Class")]
    Class {
        name: String,
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default)]
        extends: Option<String>,
        #[serde(default)]
        implements: Vec<String>,
        stmts: Vec<Stmt>,
    },
    #[serde(rename = "Stmt_Interface")]
    Interface {
        name: String,
        #[serde(default)]
        extends: Vec<String>,
        stmts: Vec<Stmt>,
    },
    #[serde(rename = "Stmt_Trait")]
    Trait { name: String, stmts: Vec<Stmt> },
    #[serde(rename = "Stmt_ClassMethod")]
    ClassMethod {
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(flatten)]
        function: FunctionDecl,
        /// Abstract and interface methods have no body.
        #[serde(default, rename = "abstract")]
        is_abstract: bool,
    },
    #[serde(rename = "Stmt_Property")]
    Property {
        #[serde(default)]
        modifiers: Vec<Modifier>,
        #[serde(default, rename = "type")]
        type_hint: Option<String>,
        props: Vec<PropertyItem>,
    },
    #[serde(rename = "Stmt_ClassConst")]
    ClassConst {
        #[serde(default)]
        modifiers: Vec<Modifier>,
        consts: Vec<ConstItem>,
    },
    #[serde(rename = "Stmt_TraitUse")]
    TraitUse { traits: Vec<String> },
    #[serde(rename = "Stmt_Const")]
    Const { consts: Vec<ConstItem> },
    #[serde(rename = "Stmt_Namespace")]
    Namespace {
        #[serde(default)]
        name: Option<String>,
        stmts: Vec<Stmt>,
    },
    #[serde(rename = "Stmt_Use")]
    Use {
        #[serde(default)]
        kind: UseKind,
        uses: Vec<UseItem>,
    },
    /// Placeholder that only exists to carry comments.
    #[serde(rename = "Stmt_Nop")]
    Nop,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElseIf {
    pub cond: Expr,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Case {
    /// `None` for the `default:` case.
    #[serde(default)]
    pub cond: Option<Expr>,
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catch {
    pub types: Vec<String>,
    #[serde(default)]
    pub var: Option<String>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaticVar {
    pub var: String,
    #[serde(default)]
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default, rename = "returnType")]
    pub return_type: Option<String>,
    #[serde(default, rename = "byRef")]
    pub by_ref: bool,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Param {
    pub var: String,
    #[serde(default, rename = "type")]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub default: Option<Expr>,
    #[serde(default, rename = "byRef")]
    pub by_ref: bool,
    #[serde(default)]
    pub variadic: bool,
}

impl Param {
    pub fn new(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            type_hint: None,
            default: None,
            by_ref: false,
            variadic: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Readonly,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Abstract => "abstract",
            Modifier::Final => "final",
            Modifier::Readonly => "readonly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyItem {
    pub name: String,
    #[serde(default)]
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstItem {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseKind {
    #[default]
    Normal,
    Function,
    Const,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UseItem {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

/// Either a literal name as written in the source or a dynamic expression.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NameOrExpr {
    Name(String),
    Expr(Box<Expr>),
}

impl NameOrExpr {
    pub fn name(name: impl Into<String>) -> Self {
        NameOrExpr::Name(name.into())
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            NameOrExpr::Name(name) => Some(name),
            NameOrExpr::Expr(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Arg {
    pub value: Expr,
    #[serde(default, rename = "byRef")]
    pub by_ref: bool,
    #[serde(default)]
    pub unpack: bool,
}

impl From<Expr> for Arg {
    fn from(value: Expr) -> Self {
        Self {
            value,
            by_ref: false,
            unpack: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArrayItem {
    #[serde(default)]
    pub key: Option<Expr>,
    pub value: Expr,
    #[serde(default, rename = "byRef")]
    pub by_ref: bool,
    #[serde(default)]
    pub unpack: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl ArrayItem {
    pub fn value(value: Expr) -> Self {
        Self {
            key: None,
            value,
            by_ref: false,
            unpack: false,
            comments: Vec::new(),
        }
    }

    pub fn keyed(key: Expr, value: Expr) -> Self {
        Self {
            key: Some(key),
            ..Self::value(value)
        }
    }
}

/// Collection delimiters: `[...]` or `array(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArraySyntax {
    #[default]
    Short,
    Long,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClosureUse {
    pub var: String,
    #[serde(default, rename = "byRef")]
    pub by_ref: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringKind {
    #[default]
    Single,
    Double,
    Heredoc,
    Nowdoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntBase {
    #[default]
    Dec,
    Hex,
    Oct,
    Bin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MagicConst {
    Line,
    File,
    Dir,
    Function,
    Class,
    Method,
    Namespace,
    Trait,
}

impl MagicConst {
    pub fn spelling(self) -> &'static str {
        match self {
            MagicConst::Line => "__LINE__",
            MagicConst::File => "__FILE__",
            MagicConst::Dir => "__DIR__",
            MagicConst::Function => "__FUNCTION__",
            MagicConst::Class => "__CLASS__",
            MagicConst::Method => "__METHOD__",
            MagicConst::Namespace => "__NAMESPACE__",
            MagicConst::Trait => "__TRAIT__",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CastKind {
    Int,
    Float,
    String,
    Bool,
    Array,
    Object,
    Unset,
}

impl CastKind {
    pub fn type_name(self) -> &'static str {
        match self {
            CastKind::Int => "int",
            CastKind::Float => "float",
            CastKind::String => "string",
            CastKind::Bool => "bool",
            CastKind::Array => "array",
            CastKind::Object => "object",
            CastKind::Unset => "unset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum IncludeKind {
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
}

impl IncludeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            IncludeKind::Include => "include",
            IncludeKind::IncludeOnce => "include_once",
            IncludeKind::Require => "require",
            IncludeKind::RequireOnce => "require_once",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitKind {
    #[default]
    Exit,
    Die,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    BooleanAnd,
    BooleanOr,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    Equal,
    NotEqual,
    Identical,
    NotIdentical,
    Smaller,
    SmallerOrEqual,
    Greater,
    GreaterOrEqual,
    Spaceship,
    Coalesce,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "**",
            BinaryOperator::Concat => ".",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::BooleanAnd => "&&",
            BinaryOperator::BooleanOr => "||",
            BinaryOperator::LogicalAnd => "and",
            BinaryOperator::LogicalOr => "or",
            BinaryOperator::LogicalXor => "xor",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Identical => "===",
            BinaryOperator::NotIdentical => "!==",
            BinaryOperator::Smaller => "<",
            BinaryOperator::SmallerOrEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::Spaceship => "<=>",
            BinaryOperator::Coalesce => "??",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UnaryOperator {
    BooleanNot,
    Minus,
    Plus,
    BitwiseNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
    ErrorSuppress,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "nodeType")]
pub enum Expr {
    #[serde(rename = "Expr_Variable")]
    Variable { name: String },
    #[serde(rename = "Expr_ConstFetch")]
    ConstFetch { name: String },
    #[serde(rename = "Expr_ClassConstFetch")]
    ClassConstFetch { class: NameOrExpr, name: String },
    #[serde(rename = "Expr_StaticPropertyFetch")]
    StaticPropertyFetch { class: NameOrExpr, name: String },
    #[serde(rename = "Expr_PropertyFetch")]
    PropertyFetch { var: Box<Expr>, name: NameOrExpr },
    #[serde(rename = "Expr_ArrayDimFetch")]
    ArrayDimFetch {
        var: Box<Expr>,
        #[serde(default)]
        dim: Option<Box<Expr>>,
    },
    #[serde(rename = "Scalar_String")]
    String {
        value: String,
        #[serde(default)]
        kind: StringKind,
        #[serde(default, rename = "docLabel")]
        doc_label: Option<String>,
    },
    #[serde(rename = "Scalar_Encapsed")]
    Interpolated {
        parts: Vec<Expr>,
        #[serde(default)]
        kind: StringKind,
        #[serde(default, rename = "docLabel")]
        doc_label: Option<String>,
    },
    /// Literal text between the expressions of an interpolated string.
    #[serde(rename = "Scalar_EncapsedStringPart")]
    InterpolatedText { value: String },
    #[serde(rename = "Scalar_LNumber")]
    Int {
        value: i64,
        #[serde(default)]
        base: IntBase,
    },
    #[serde(rename = "Scalar_DNumber")]
    Float { value: f64 },
    #[serde(rename = "Scalar_MagicConst")]
    MagicConst { kind: MagicConst },
    #[serde(rename = "Expr_Array")]
    Array {
        items: Vec<ArrayItem>,
        #[serde(default)]
        syntax: Option<ArraySyntax>,
    },
    #[serde(rename = "Expr_List")]
    List { items: Vec<Option<ArrayItem>> },
    #[serde(rename = "Expr_FuncCall")]
    FuncCall {
        name: NameOrExpr,
        #[serde(default)]
        args: Vec<Arg>,
    },
    #[serde(rename = "Expr_MethodCall")]
    MethodCall {
        var: Box<Expr>,
        name: NameOrExpr,
        #[serde(default)]
        args: Vec<Arg>,
    },
    #[serde(rename = "Expr_StaticCall")]
    StaticCall {
        class: NameOrExpr,
        name: NameOrExpr,
        #[serde(default)]
        args: Vec<Arg>,
    },
    #[serde(rename = "Expr_New")]
    New {
        class: NameOrExpr,
        #[serde(default)]
        args: Vec<Arg>,
    },
    #[serde(rename = "Expr_Assign")]
    Assign { var: Box<Expr>, expr: Box<Expr> },
    #[serde(rename = "Expr_AssignRef")]
    AssignRef { var: Box<Expr>, expr: Box<Expr> },
    #[serde(rename = "Expr_AssignOp")]
    AssignOp {
        op: BinaryOperator,
        var: Box<Expr>,
        expr: Box<Expr>,
    },
    #[serde(rename = "Expr_BinaryOp")]
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    #[serde(rename = "Expr_UnaryOp")]
    Unary { op: UnaryOperator, expr: Box<Expr> },
    #[serde(rename = "Expr_Cast")]
    Cast { kind: CastKind, expr: Box<Expr> },
    #[serde(rename = "Expr_Ternary")]
    Ternary {
        cond: Box<Expr>,
        /// `None` for the short `?:` form.
        #[serde(default, rename = "if")]
        then: Option<Box<Expr>>,
        #[serde(rename = "else")]
        otherwise: Box<Expr>,
    },
    #[serde(rename = "Expr_Instanceof")]
    Instanceof { expr: Box<Expr>, class: NameOrExpr },
    #[serde(rename = "Expr_Isset")]
    Isset { vars: Vec<Expr> },
    #[serde(rename = "Expr_Empty")]
    Empty { expr: Box<Expr> },
    #[serde(rename = "Expr_Eval")]
    Eval { expr: Box<Expr> },
    #[serde(rename = "Expr_Exit")]
    Exit {
        #[serde(default)]
        expr: Option<Box<Expr>>,
        #[serde(default)]
        kind: ExitKind,
    },
    #[serde(rename = "Expr_Clone")]
    Clone { expr: Box<Expr> },
    #[serde(rename = "Expr_Include")]
    Include { expr: Box<Expr>, kind: IncludeKind },
    #[serde(rename = "Expr_Print")]
    Print { expr: Box<Expr> },
    #[serde(rename = "Expr_Closure")]
    Closure {
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default)]
        uses: Vec<ClosureUse>,
        #[serde(default, rename = "returnType")]
        return_type: Option<String>,
        #[serde(default, rename = "byRef")]
        by_ref: bool,
        #[serde(default, rename = "static")]
        is_static: bool,
        #[serde(default)]
        stmts: Vec<Stmt>,
    },
    #[serde(rename = "Expr_ArrowFunction")]
    ArrowFunction {
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default, rename = "returnType")]
        return_type: Option<String>,
        #[serde(default, rename = "static")]
        is_static: bool,
        expr: Box<Expr>,
    },
    #[serde(other)]
    Unknown,
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable { name: name.into() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String {
            value: value.into(),
            kind: StringKind::Single,
            doc_label: None,
        }
    }

    pub fn int(value: i64) -> Self {
        Expr::Int {
            value,
            base: IntBase::Dec,
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Expr::ConstFetch { name: name.into() }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FuncCall {
            name: NameOrExpr::name(name),
            args: args.into_iter().map(Arg::from).collect(),
        }
    }

    pub fn method_call(var: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            var: Box::new(var),
            name: NameOrExpr::name(name),
            args: args.into_iter().map(Arg::from).collect(),
        }
    }

    pub fn array(items: Vec<ArrayItem>) -> Self {
        Expr::Array {
            items,
            syntax: None,
        }
    }

    pub fn assign(var: Expr, expr: Expr) -> Self {
        Expr::Assign {
            var: Box::new(var),
            expr: Box::new(expr),
        }
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
