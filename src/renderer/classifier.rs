//! Contextual classification of string literals.
//!
//! A string made only of identifier characters may name a hook, theme hook,
//! callback or similar. The enclosing array key or call name decides which.

use crate::renderer::state::RenderState;
use crate::renderer::traits::StyleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Theme,
    Element,
    Hook,
    Alter,
    Callback,
    Function,
    Module,
    Variable,
    Form,
    Permission,
}

impl Role {
    /// Annotation class attached next to `string`.
    pub fn marker(self) -> &'static str {
        match self {
            Role::Theme => "possible-theme",
            Role::Element => "possible-element",
            Role::Hook => "possible-hook",
            Role::Alter => "possible-alter",
            Role::Callback => "possible-callback",
            Role::Function => "possible-function",
            Role::Module => "possible-module",
            Role::Variable => "possible-variable",
            Role::Form => "possible-form",
            Role::Permission => "possible-permission",
        }
    }
}

/// Registry entry: calls named `name` carry a `role` name in the argument
/// at 1-based `argument` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleEntry {
    pub name: &'static str,
    pub role: Role,
    pub argument: usize,
}

const fn entry(name: &'static str, role: Role, argument: usize) -> RoleEntry {
    RoleEntry {
        name,
        role,
        argument,
    }
}

pub static REGISTRY: &[RoleEntry] = &[
    entry("theme", Role::Theme, 1),
    entry("theme_get_suggestions", Role::Theme, 2),
    entry("element_info", Role::Element, 1),
    entry("element_info_property", Role::Element, 1),
    entry("module_invoke_all", Role::Hook, 1),
    entry("module_implements", Role::Hook, 1),
    entry("module_invoke", Role::Hook, 2),
    entry("module_hook", Role::Hook, 2),
    entry("invokeAll", Role::Hook, 1),
    entry("invoke", Role::Hook, 2),
    entry("drupal_alter", Role::Alter, 1),
    entry("alter", Role::Alter, 1),
    entry("call_user_func", Role::Callback, 1),
    entry("call_user_func_array", Role::Callback, 1),
    entry("drupal_get_form", Role::Form, 1),
    entry("drupal_retrieve_form", Role::Form, 1),
    entry("drupal_build_form", Role::Form, 1),
    entry("function_exists", Role::Function, 1),
    entry("module_exists", Role::Module, 1),
    entry("module_load_include", Role::Module, 2),
    entry("moduleExists", Role::Module, 1),
    entry("variable_get", Role::Variable, 1),
    entry("variable_set", Role::Variable, 1),
    entry("variable_del", Role::Variable, 1),
    entry("user_access", Role::Permission, 1),
];

/// Array key whose literal value names a theme hook.
pub const THEME_KEY: &str = "#theme";
/// Array key whose literal value names an element type.
pub const ELEMENT_KEY: &str = "#type";

pub fn lookup(name: &str) -> Option<&'static RoleEntry> {
    REGISTRY.iter().find(|entry| entry.name == name)
}

pub fn is_identifier_like(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Decides which marker, if any, a string literal with `value` carries at
/// the current point of the traversal.
pub fn classify(config: &StyleConfig, state: &RenderState, value: &str) -> Option<Role> {
    if !config.annotate || !config.target_style || !is_identifier_like(value) {
        return None;
    }

    if state.in_array_value() {
        match state.array_key() {
            Some(THEME_KEY) => return Some(Role::Theme),
            Some(ELEMENT_KEY) => return Some(Role::Element),
            _ => {}
        }
    }

    // Dynamic call targets carry no name and never classify
    let frame = state.current_call()?;
    let name = frame.name.as_deref()?;
    let entry = lookup(name)?;
    (entry.argument == frame.argument).then_some(entry.role)
}
