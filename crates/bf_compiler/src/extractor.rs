//! Per-file extractor.
//!
//! Parses a file once with `oxc_parser` and produces, per component: props,
//! signals, memos, module constants, local functions/variables, preserved
//! imports, and the default-export flag. Unparseable source yields a parse
//! diagnostic and the file is skipped.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPatternKind, Declaration, Expression, ExportDefaultDeclarationKind, Function,
    FunctionBody, Program, PropertyKey, Statement, VariableDeclarationKind, VariableDeclarator,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::component::{
    Component, ExtractedFile, LocalFunction, LocalVariable, Memo, ModuleConstant, Prop, Signal,
};
use crate::diagnostic::{Diagnostic, Diagnostics};

/// Parse `source_text` and extract every top-level component.
///
/// `file_path` is used only to label diagnostics and to choose the parser's
/// `SourceType` (`.tsx`/`.jsx` enable JSX; anything else is parsed as plain
/// script/module and will simply contain no components).
pub fn extract_file(
    file_path: &str,
    source_text: &str,
    diagnostics: &mut Diagnostics,
) -> Option<ExtractedFile> {
    let allocator = Allocator::default();
    let source_type = source_type_for_path(file_path);
    let ret = Parser::new(&allocator, source_text, source_type).parse();

    if !ret.errors.is_empty() {
        diagnostics.extend(Diagnostic::from_oxc_list(file_path, source_text, &ret.errors));
        // A parse error is always fatal for the file.
        if ret.errors.iter().any(|e| e.severity == oxc_diagnostics::Severity::Error) {
            return None;
        }
    }

    Some(extract_program(file_path, source_text, &ret.program, diagnostics))
}

fn source_type_for_path(path: &str) -> SourceType {
    if path.ends_with(".tsx") {
        SourceType::tsx()
    } else if path.ends_with(".ts") {
        SourceType::ts()
    } else if path.ends_with(".jsx") {
        SourceType::jsx()
    } else {
        SourceType::mjs().with_jsx(true)
    }
}

fn extract_program<'a>(
    file_path: &str,
    source_text: &'a str,
    program: &Program<'a>,
    diagnostics: &mut Diagnostics,
) -> ExtractedFile {
    let mut file = ExtractedFile::default();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(_) => {
                file.imports.push(stmt.span().source_text(source_text).to_string());
            }
            Statement::VariableDeclaration(decl) if decl.kind == VariableDeclarationKind::Const => {
                extract_top_level_const(file_path, source_text, decl, &mut file, false, diagnostics);
            }
            Statement::FunctionDeclaration(func) => {
                if let Some(component) =
                    component_from_function(file_path, source_text, func, false, false, diagnostics)
                {
                    file.components.push(component);
                }
            }
            Statement::ExportNamedDeclaration(export) => {
                if let Some(decl) = &export.declaration {
                    extract_exported_declaration(file_path, source_text, decl, &mut file, diagnostics);
                }
            }
            Statement::ExportDefaultDeclaration(export) => {
                extract_default_export(file_path, source_text, export, &mut file, diagnostics);
            }
            _ => {}
        }
    }

    file
}

fn extract_exported_declaration<'a>(
    file_path: &str,
    source_text: &'a str,
    decl: &Declaration<'a>,
    file: &mut ExtractedFile,
    diagnostics: &mut Diagnostics,
) {
    match decl {
        Declaration::FunctionDeclaration(func) => {
            if let Some(component) =
                component_from_function(file_path, source_text, func, false, true, diagnostics)
            {
                file.components.push(component);
            }
        }
        Declaration::VariableDeclaration(var_decl) if var_decl.kind == VariableDeclarationKind::Const => {
            extract_top_level_const(file_path, source_text, var_decl, file, true, diagnostics);
        }
        _ => {}
    }
}

fn extract_default_export<'a>(
    file_path: &str,
    source_text: &'a str,
    export: &oxc_ast::ast::ExportDefaultDeclaration<'a>,
    file: &mut ExtractedFile,
    diagnostics: &mut Diagnostics,
) {
    if let ExportDefaultDeclarationKind::FunctionDeclaration(func) = &export.declaration {
        if let Some(component) =
            component_from_function(file_path, source_text, func, true, true, diagnostics)
        {
            file.components.push(component);
        }
    }
    // `export default <ArrowFunctionExpression>` / `export default <Identifier>`
    // referencing a component declared earlier in the file are left for the
    // driver's principal-component selection to resolve by name; the
    // extractor does not invent a synthetic component for them.
}

/// A top-level `const NAME = ...` is a module constant unless it is a
/// capitalized arrow-function component (`const Card = (props) => <jsx/>`).
fn extract_top_level_const<'a>(
    file_path: &str,
    source_text: &'a str,
    decl: &oxc_ast::ast::VariableDeclaration<'a>,
    file: &mut ExtractedFile,
    is_exported: bool,
    diagnostics: &mut Diagnostics,
) {
    for declarator in &decl.declarations {
        let Some(name) = binding_identifier_name(declarator) else {
            continue;
        };

        let is_component_name = name.chars().next().is_some_and(char::is_uppercase);
        if is_component_name {
            if let Some(Expression::ArrowFunctionExpression(arrow)) = &declarator.init {
                if let Some(component) = component_from_arrow(
                    file_path,
                    source_text,
                    &name,
                    arrow,
                    is_exported,
                    diagnostics,
                ) {
                    file.components.push(component);
                    continue;
                }
            }
        }

        file.module_constants.push(ModuleConstant {
            name,
            full_text: declarator.span().source_text(source_text).to_string(),
        });
    }
}

fn binding_identifier_name(declarator: &VariableDeclarator) -> Option<String> {
    match &declarator.id.kind {
        BindingPatternKind::BindingIdentifier(id) => Some(id.name.as_str().to_string()),
        _ => None,
    }
}

fn component_from_function<'a>(
    file_path: &str,
    source_text: &'a str,
    func: &Function<'a>,
    is_default_export: bool,
    is_exported: bool,
    diagnostics: &mut Diagnostics,
) -> Option<Component> {
    let name = func.id.as_ref()?.name.as_str().to_string();
    if !name.chars().next().is_some_and(char::is_uppercase) {
        return None;
    }
    let body = func.body.as_ref()?;
    let props = extract_props_from_params(source_text, func.params.items.first());
    Some(build_component(
        file_path,
        source_text,
        name,
        props,
        body,
        is_default_export,
        is_exported,
        diagnostics,
    ))
}

fn component_from_arrow<'a>(
    file_path: &str,
    source_text: &'a str,
    name: &str,
    arrow: &oxc_ast::ast::ArrowFunctionExpression<'a>,
    is_exported: bool,
    diagnostics: &mut Diagnostics,
) -> Option<Component> {
    let props = extract_props_from_params(source_text, arrow.params.items.first());
    Some(build_component(
        file_path,
        source_text,
        name.to_string(),
        props,
        &arrow.body,
        false,
        is_exported,
        diagnostics,
    ))
}

/// Props come from a destructured first parameter: `({ name, age = 0 }: Props)`.
/// A non-destructured parameter (`(props: Props)`) yields no named props —
/// the analyzer then treats `props.x` member accesses as dynamic by prefix
/// match in `analyzer.rs`.
fn extract_props_from_params<'a>(
    source_text: &'a str,
    first_param: Option<&oxc_ast::ast::FormalParameter<'a>>,
) -> Vec<Prop> {
    let Some(param) = first_param else {
        return Vec::new();
    };
    let type_text = param
        .pattern
        .type_annotation
        .as_ref()
        .map(|t| t.span().source_text(source_text).trim_start_matches(':').trim().to_string());

    let BindingPatternKind::ObjectPattern(obj) = &param.pattern.kind else {
        return Vec::new();
    };

    obj.properties
        .iter()
        .filter_map(|prop| {
            let name = match &prop.key {
                PropertyKey::StaticIdentifier(id) => id.name.as_str().to_string(),
                _ => return None,
            };
            let (default_expr, type_text_for_prop) = match &prop.value.kind {
                BindingPatternKind::AssignmentPattern(assign) => (
                    Some(assign.right.span().source_text(source_text).to_string()),
                    type_text.clone(),
                ),
                _ => (None, type_text.clone()),
            };
            Some(Prop {
                name,
                type_text: type_text_for_prop,
                default_expr,
            })
        })
        .collect()
}

fn build_component<'a>(
    file_path: &str,
    source_text: &'a str,
    name: String,
    props: Vec<Prop>,
    body: &FunctionBody<'a>,
    is_default_export: bool,
    is_exported: bool,
    diagnostics: &mut Diagnostics,
) -> Component {
    // Element ids are unique within a component, so each component starts
    // its own allocator rather than sharing one across a file.
    let mut ids = crate::ir::IdAllocator::new();
    let mut signals = Vec::new();
    let mut memos = Vec::new();
    let mut local_functions = Vec::new();
    let mut local_variables = Vec::new();
    let mut jsx_source = None;
    let mut return_expr_span: Option<oxc_span::Span> = None;

    for stmt in &body.statements {
        match stmt {
            Statement::VariableDeclaration(decl) if decl.kind == VariableDeclarationKind::Const => {
                for declarator in &decl.declarations {
                    classify_component_local(
                        source_text,
                        declarator,
                        &mut signals,
                        &mut memos,
                        &mut local_functions,
                        &mut local_variables,
                    );
                }
            }
            Statement::FunctionDeclaration(inner) => {
                if let Some(id) = &inner.id {
                    local_functions.push(LocalFunction {
                        name: id.name.as_str().to_string(),
                        full_text: stmt.span().source_text(source_text).to_string(),
                    });
                }
            }
            Statement::ReturnStatement(ret) => {
                if let Some(arg) = &ret.argument {
                    jsx_source = Some(arg.span().source_text(source_text).to_string());
                    return_expr_span = Some(arg.span());
                }
            }
            _ => {}
        }
    }

    let mut component = Component {
        name,
        props,
        signals,
        memos,
        local_functions,
        local_variables,
        is_default_export,
        is_exported,
        jsx_source,
        ir: None,
    };

    if let Some(return_arg_span) = return_expr_span {
        // Re-walk the body to find the same return expression by span so we
        // can hand the transformer a live AST reference (span slicing lets
        // us avoid re-parsing, but building the IR still needs the node).
        for stmt in &body.statements {
            if let Statement::ReturnStatement(ret) = stmt {
                if let Some(arg) = &ret.argument {
                    if arg.span() == return_arg_span {
                        let prop_names: Vec<String> =
                            component.props.iter().map(|p| p.name.clone()).collect();
                        let signal_names: Vec<String> = component
                            .signals
                            .iter()
                            .flat_map(|s| [s.getter.clone(), s.setter.clone()])
                            .collect();
                        let memo_names: Vec<String> =
                            component.memos.iter().map(|m| m.getter.clone()).collect();
                        let local_var_names: Vec<String> = component
                            .local_variables
                            .iter()
                            .map(|v| v.name.clone())
                            .collect();
                        let scope = crate::transform::ReactiveScope {
                            props: &prop_names,
                            signals: &signal_names,
                            memos: &memo_names,
                            local_variables: &local_var_names,
                        };
                        component.ir = crate::transform::transform_root(
                            arg,
                            source_text,
                            file_path,
                            &component.name,
                            &scope,
                            &mut ids,
                            diagnostics,
                        );
                    }
                }
            }
        }
    }

    component
}

/// Classify one `const` binding inside a component body: a
/// `createSignal(...)` destructure is a signal; a `createMemo(...)` call is a
/// memo; a function/arrow binding is a local function; anything else is a
/// server-only local variable.
fn classify_component_local<'a>(
    source_text: &'a str,
    declarator: &VariableDeclarator<'a>,
    signals: &mut Vec<Signal>,
    memos: &mut Vec<Memo>,
    local_functions: &mut Vec<LocalFunction>,
    local_variables: &mut Vec<LocalVariable>,
) {
    if let BindingPatternKind::ArrayPattern(arr) = &declarator.id.kind {
        if let Some(Expression::CallExpression(call)) = &declarator.init {
            if callee_name(&call.callee) == Some("createSignal") {
                let getter = arr
                    .elements
                    .first()
                    .and_then(Option::as_ref)
                    .and_then(binding_pattern_name);
                let setter = arr
                    .elements
                    .get(1)
                    .and_then(Option::as_ref)
                    .and_then(binding_pattern_name);
                if let (Some(getter), Some(setter)) = (getter, setter) {
                    let initial_expr = call
                        .arguments
                        .first()
                        .map(|a| a.span().source_text(source_text).to_string())
                        .unwrap_or_default();
                    signals.push(Signal {
                        getter,
                        setter,
                        initial_expr,
                    });
                    return;
                }
            }
        }
    }

    if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
        let name = id.name.as_str().to_string();
        match &declarator.init {
            Some(Expression::CallExpression(call)) if callee_name(&call.callee) == Some("createMemo") => {
                let computation_expr = call
                    .arguments
                    .first()
                    .map(|a| a.span().source_text(source_text).to_string())
                    .unwrap_or_default();
                memos.push(Memo {
                    getter: name,
                    computation_expr,
                });
                return;
            }
            Some(Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_)) => {
                local_functions.push(LocalFunction {
                    name,
                    full_text: declarator.span().source_text(source_text).to_string(),
                });
                return;
            }
            _ => {}
        }
        local_variables.push(LocalVariable {
            name,
            full_text: declarator.span().source_text(source_text).to_string(),
        });
    }
}

fn binding_pattern_name(pattern: &oxc_ast::ast::BindingPattern) -> Option<String> {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => Some(id.name.as_str().to_string()),
        _ => None,
    }
}

fn callee_name<'a>(callee: &Expression<'a>) -> Option<&'a str> {
    match callee {
        Expression::Identifier(id) => Some(id.name.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;

    #[test]
    fn extracts_signal_and_event_handler_component() {
        let source = r#"
            function Counter() {
                const [n, setN] = createSignal(0);
                return (<><p class="c">{n()}</p><button onClick={() => setN(k => k + 1)}>+</button></>);
            }
        "#;
        let mut diagnostics = Diagnostics::new();
        let file = extract_file("Counter.tsx", source, &mut diagnostics).expect("parses");
        assert_eq!(file.components.len(), 1);
        let counter = &file.components[0];
        assert_eq!(counter.name, "Counter");
        assert_eq!(counter.signals.len(), 1);
        assert_eq!(counter.signals[0].getter, "n");
        assert_eq!(counter.signals[0].setter, "setN");
        assert!(counter.jsx_source.is_some());
    }

    #[test]
    fn classifies_props_with_defaults() {
        let source = r#"
            function Greeting({ name, emphatic = false }: Props) {
                return <p>{name}</p>;
            }
        "#;
        let mut diagnostics = Diagnostics::new();
        let file = extract_file("Greeting.tsx", source, &mut diagnostics).expect("parses");
        let greeting = &file.components[0];
        assert_eq!(greeting.props.len(), 2);
        assert_eq!(greeting.props[0].name, "name");
        assert_eq!(greeting.props[1].name, "emphatic");
        assert_eq!(greeting.props[1].default_expr.as_deref(), Some("false"));
    }

    #[test]
    fn module_constant_is_not_a_component_when_lowercase() {
        let source = r#"
            const styles = { color: "red" };
            function Widget() {
                return <div class={styles.color}>x</div>;
            }
        "#;
        let mut diagnostics = Diagnostics::new();
        let file = extract_file("Widget.tsx", source, &mut diagnostics).expect("parses");
        assert_eq!(file.module_constants.len(), 1);
        assert_eq!(file.module_constants[0].name, "styles");
        assert_eq!(file.components.len(), 1);
    }
}
