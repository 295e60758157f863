//! Deferred code generation for C arrow functions.
//!
//! Generation runs in two phases. While expressions of a compilation unit
//! are written, every arrow function is registered here and the call site
//! only receives a reference. Afterwards the caller asks for the stubs
//! (context types and function definitions) and, for each arrow with
//! captures, a context initializer to place in scope before the reference
//! is used.

/// Default prefix for generated names.
pub const DEFAULT_PREFIX: &str = "arrow";

/// Everything needed to register one arrow function.
#[derive(Debug, Clone)]
pub struct ArrowSpec<'a> {
    pub params: &'a [String],
    /// Already-generated C for the body (expression text or raw block).
    pub body_code: String,
    pub captures: Vec<String>,
    pub context_hint: Option<&'a str>,
    pub has_return_value: bool,
}

/// A registered arrow function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowDef {
    pub id: u32,
    /// Generated function name.
    pub name: String,
    /// Generated context struct name.
    pub ctx_type: String,
    /// Name of the context value the caller declares.
    pub ctx_var: String,
    pub params: Vec<String>,
    pub body_code: String,
    pub captures: Vec<String>,
    pub context_hint: Option<String>,
    pub has_return_value: bool,
}

impl ArrowDef {
    pub fn has_captures(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Text to emit where the arrow was written: the function name, or a
    /// callback literal pairing it with the context value.
    pub fn reference(&self) -> String {
        if self.has_captures() {
            format!(
                "(ArrowCallback){{.func = {}, .ctx = &{}}}",
                self.name, self.ctx_var
            )
        } else {
            self.name.clone()
        }
    }

    /// `arrow_ctx_0 _ctx_0 = {.a = a, .b = b}`, or `None` without captures.
    pub fn ctx_init(&self) -> Option<String> {
        if !self.has_captures() {
            return None;
        }
        let fields: Vec<String> = self
            .captures
            .iter()
            .map(|name| format!(".{name} = {name}"))
            .collect();
        Some(format!(
            "{} {} = {{{}}}",
            self.ctx_type,
            self.ctx_var,
            fields.join(", ")
        ))
    }

    fn write_stub(&self, out: &mut String) {
        // Locals in the stub must not shadow a capture or a parameter.
        let taken = |name: &str| self.captures.iter().chain(&self.params).any(|n| n == name);
        let ctx_param = fresh_name("_ctx", taken);
        let ctx_local = fresh_name("ctx", |name| taken(name) || name == ctx_param);

        if self.has_captures() {
            out.push_str(&format!("typedef struct {} {{\n", self.ctx_type));
            for name in &self.captures {
                out.push_str(&format!("    void* {name};\n"));
            }
            out.push_str(&format!("}} {};\n\n", self.ctx_type));
        }

        let ret = if self.has_return_value { "void*" } else { "void" };
        let mut args: Vec<String> = Vec::new();
        if self.has_captures() {
            args.push(format!("void* {ctx_param}"));
        }
        args.extend(self.params.iter().map(|p| format!("void* {p}")));
        let args = if args.is_empty() {
            "void".to_string()
        } else {
            args.join(", ")
        };
        out.push_str(&format!("static {ret} {}({args}) {{\n", self.name));

        if self.has_captures() {
            out.push_str(&format!(
                "    {0}* {ctx_local} = ({0}*){ctx_param};\n",
                self.ctx_type
            ));
            for name in &self.captures {
                out.push_str(&format!("    void* {name} = {ctx_local}->{name};\n"));
            }
            out.push_str(&format!("    (void){ctx_local};\n"));
        }
        for param in &self.params {
            out.push_str(&format!("    (void){param};\n"));
        }

        let body = self.body_code.trim();
        if self.has_return_value {
            let body = if body.is_empty() { "0" } else { body };
            out.push_str(&format!("    return (void*)(intptr_t)({body});\n"));
        } else if !body.is_empty() {
            out.push_str(&format!("    {body}\n"));
        }
        out.push_str("}\n\n");
    }
}

/// `base` with `_` appended until `taken` no longer holds for it.
fn fresh_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut name = base.to_string();
    while taken(&name) {
        name.push('_');
    }
    name
}

/// Append-only collection of arrow functions for one compilation unit.
#[derive(Debug, Clone)]
pub struct ArrowRegistry {
    prefix: String,
    next_id: u32,
    defs: Vec<ArrowDef>,
}

impl Default for ArrowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrowRegistry {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Registry whose generated names start with `prefix` instead of `arrow`.
    /// The prefix is reduced to C identifier characters; an empty result
    /// falls back to the default.
    pub fn with_prefix(prefix: &str) -> Self {
        let mut prefix = sanitize_identifier(prefix);
        if prefix.is_empty() {
            prefix = DEFAULT_PREFIX.to_string();
        } else if prefix.starts_with(|c: char| c.is_ascii_digit()) {
            prefix.insert(0, '_');
        }
        Self {
            prefix,
            next_id: 0,
            defs: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register an arrow function and return its id. Ids start at 0 and
    /// increase by one per registration.
    pub fn register(&mut self, spec: ArrowSpec<'_>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let hint = spec
            .context_hint
            .map(sanitize_identifier)
            .filter(|h| !h.is_empty());
        let name = match &hint {
            Some(hint) => format!("{}_fn_{id}_{hint}", self.prefix),
            None => format!("{}_fn_{id}", self.prefix),
        };

        let def = ArrowDef {
            id,
            name,
            ctx_type: format!("{}_ctx_{id}", self.prefix),
            ctx_var: format!("_ctx_{id}"),
            params: spec.params.to_vec(),
            body_code: spec.body_code,
            captures: spec.captures,
            context_hint: spec.context_hint.map(str::to_string),
            has_return_value: spec.has_return_value,
        };
        tracing::debug!(
            id,
            name = %def.name,
            captures = def.captures.len(),
            "registered arrow function"
        );
        self.defs.push(def);
        id
    }

    pub fn get(&self, id: u32) -> Option<&ArrowDef> {
        self.defs.iter().find(|def| def.id == id)
    }

    /// Registered arrows in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ArrowDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Context types and function definitions for every registered arrow.
    /// Empty when nothing was registered.
    pub fn generate_stubs(&self) -> String {
        if self.defs.is_empty() {
            return String::new();
        }

        let mut out = String::from("/* ===== Arrow Function Stubs (auto-generated) ===== */\n\n");
        if self.defs.iter().any(ArrowDef::has_captures) {
            out.push_str("#include <stdint.h>\n\n");
            out.push_str("#ifndef ARROW_CALLBACK_DEFINED\n");
            out.push_str("#define ARROW_CALLBACK_DEFINED\n");
            out.push_str("typedef struct { void* func; void* ctx; } ArrowCallback;\n");
            out.push_str("#endif\n\n");
        } else if self.defs.iter().any(|def| def.has_return_value) {
            out.push_str("#include <stdint.h>\n\n");
        }
        for def in &self.defs {
            def.write_stub(&mut out);
        }
        out
    }

    /// Context initializer for arrow `id`. `None` for unknown ids and for
    /// arrows without captures.
    pub fn generate_ctx_init(&self, id: u32) -> Option<String> {
        self.get(id)?.ctx_init()
    }
}

/// Replace characters that cannot appear in a C identifier with `_`.
fn sanitize_identifier(hint: &str) -> String {
    hint.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
